//! Piezo buzzer on a GPIO (transistor driven, active HIGH).

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use log::debug;

pub struct Buzzer<P, D> {
    pin: P,
    delay: D,
}

impl<P: OutputPin, D: DelayNs> Buzzer<P, D> {
    pub fn new(mut pin: P, delay: D) -> Self {
        let _ = pin.set_low();
        Self { pin, delay }
    }

    /// Blocking beep sequence. No pause after the last beep.
    pub fn tone(&mut self, on_ms: u32, off_ms: u32, repeat: u8) {
        debug!("buzzer: {}x {}ms on / {}ms off", repeat, on_ms, off_ms);
        for i in 0..repeat {
            if i > 0 {
                self.delay.delay_ms(off_ms);
            }
            let _ = self.pin.set_high();
            self.delay.delay_ms(on_ms);
            let _ = self.pin.set_low();
        }
    }
}
