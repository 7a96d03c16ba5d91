//! Raw ADC conversions for the fuel sender and battery sense divider.
//!
//! Both are linear: `raw / full_scale` times a calibration multiplier.

/// Analog input channels read through [`AnalogPort`](crate::app::ports::AnalogPort).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalogChannel {
    FuelLevel,
    BatteryVoltage,
}

/// Fuel level in percent of tank capacity, clamped to `0.0..=100.0`.
pub fn fuel_percent(raw: u16, full_scale: u16, scale: f32) -> f32 {
    if full_scale == 0 {
        return 0.0;
    }
    let pct = f32::from(raw) / f32::from(full_scale) * 100.0 * scale;
    if pct.is_nan() {
        return 0.0;
    }
    pct.clamp(0.0, 100.0)
}

/// Battery voltage seen in front of the sense divider.
pub fn battery_volts(raw: u16, full_scale: u16, vref: f32, divider: f32) -> f32 {
    if full_scale == 0 {
        return 0.0;
    }
    f32::from(raw) / f32::from(full_scale) * vref * divider
}
