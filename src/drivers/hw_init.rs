//! One-shot hardware peripheral initialization.
//!
//! Configures the ADC channels and the four pulse-input GPIOs using raw
//! ESP-IDF sys calls, then hooks the pulse ISRs. Called once from `main()`
//! before the loop starts. The LCD, 1-Wire, I2C and buzzer pins are owned
//! by their `esp-idf-hal` drivers instead.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    GpioConfigFailed(i32),
    IsrInstallFailed(i32),
    IsrAddFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc)    => write!(f, "ADC1 init failed (rc={})", rc),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
            Self::IsrAddFailed(rc)     => write!(f, "GPIO ISR handler add failed (rc={})", rc),
        }
    }
}

impl core::error::Error for HwInitError {}

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

/// ADC1 channel wired to the fuel sender (GPIO 1).
pub const ADC1_CH_FUEL: u32 = 0;
/// ADC1 channel wired to the battery divider (GPIO 2).
pub const ADC1_CH_BATTERY: u32 = 1;

/// The hardware samples at 12 bits; the domain works in 10.
const ADC_NATIVE_TO_10_BIT_SHIFT: u32 = 2;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the loop; single-threaded.
    unsafe {
        init_adc()?;
        init_pulse_inputs()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single-threaded init path or the
/// main-loop ADC read path.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };

    for channel in [ADC1_CH_FUEL, ADC1_CH_BATTERY] {
        let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), channel, &chan_cfg) };
        if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }
    }

    info!("hw_init: ADC1 configured (CH0=fuel, CH1=battery)");
    Ok(())
}

/// One 10-bit sample. A failed conversion reads as 0.
#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> u16 {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract — single-threaded main-loop access only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return 0;
    }
    to_10_bit(raw.max(0) as u16)
}

#[cfg(not(target_os = "espidf"))]
pub fn adc1_read(_channel: u32) -> u16 {
    0
}

/// Scale a native 12-bit sample down to the 0..=1023 domain range.
pub fn to_10_bit(raw_12: u16) -> u16 {
    (raw_12 >> ADC_NATIVE_TO_10_BIT_SHIFT).min(1023)
}

// ── Pulse inputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_pulse_inputs() -> Result<(), HwInitError> {
    let input_pins = [
        pins::FLOW_IN_GPIO,
        pins::FLOW_OUT_GPIO,
        pins::DISTANCE_GPIO,
        pins::TACH_GPIO,
    ];

    for &pin in &input_pins {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_POSEDGE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }
    }

    info!("hw_init: pulse inputs configured (rising edge)");
    Ok(())
}

// ── GPIO ISR Service ──────────────────────────────────────────

#[cfg(target_os = "espidf")]
use crate::sensors::pulses::{distance_isr_handler, flow_in_isr_handler, flow_out_isr_handler};
#[cfg(target_os = "espidf")]
use crate::sensors::tach::tach_isr_handler;

#[cfg(target_os = "espidf")]
unsafe extern "C" fn flow_in_gpio_isr(_arg: *mut core::ffi::c_void) {
    flow_in_isr_handler();
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn flow_out_gpio_isr(_arg: *mut core::ffi::c_void) {
    flow_out_isr_handler();
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn distance_gpio_isr(_arg: *mut core::ffi::c_void) {
    distance_isr_handler();
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn tach_gpio_isr(_arg: *mut core::ffi::c_void) {
    // SAFETY: esp_timer_get_time is a RTC counter read; safe in ISR context.
    let now_us = unsafe { esp_timer_get_time() } as u32;
    tach_isr_handler(now_us);
}

/// Install the per-pin GPIO ISR service and register the pulse handlers.
/// Call after init_peripherals().
#[cfg(target_os = "espidf")]
pub fn init_isr_service() -> Result<(), HwInitError> {
    type Isr = unsafe extern "C" fn(*mut core::ffi::c_void);
    let handlers: [(i32, Isr); 4] = [
        (pins::FLOW_IN_GPIO, flow_in_gpio_isr),
        (pins::FLOW_OUT_GPIO, flow_out_gpio_isr),
        (pins::DISTANCE_GPIO, distance_gpio_isr),
        (pins::TACH_GPIO, tach_gpio_isr),
    ];

    // SAFETY: gpio_install_isr_service is idempotent; ESP_ERR_INVALID_STATE
    // means it was already installed. The handlers only touch the
    // critical-section counters and tach atomics.
    unsafe {
        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK as i32 && ret != ESP_ERR_INVALID_STATE as i32 {
            return Err(HwInitError::IsrInstallFailed(ret));
        }

        for (pin, isr) in handlers {
            let ret = gpio_isr_handler_add(pin, Some(isr), core::ptr::null_mut());
            if ret != ESP_OK as i32 { return Err(HwInitError::IsrAddFailed(ret)); }
            gpio_intr_enable(pin);
        }
    }

    info!("hw_init: ISR service installed (flow_in, flow_out, distance, tach)");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_isr_service() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): ISR service skipped");
    Ok(())
}
