//! Basic component structs
use embedded_hal::{
    digital::{OutputPin, PinState},
    pwm::SetDutyCycle,
};

use crate::{
    config::{DAC_FULL_SCALE, DAC_STEP, DAC_WRAP},
    error::Error,
};

/// Stepped DAC output, raised by [`DAC_STEP`] after every capture.
///
/// The DAC is any duty-cycle output; on the pico this is a PWM channel behind an RC filter.
pub struct DacRamp<P> {
    /// Output channel
    dac: P,
    /// Next code to write
    value: u16,
}

impl<P: SetDutyCycle> DacRamp<P> {
    /// Take the output and set it to 0
    pub fn init(mut dac: P) -> Result<Self, Error> {
        dac.set_duty_cycle_fraction(0, DAC_FULL_SCALE)
            .map_err(Error::dac)?;
        Ok(Self { dac, value: 0 })
    }

    /// Write the next ramp value and return it.
    ///
    /// The sequence is 0, 10, ..., 3990, 0, 10, ...
    pub fn advance(&mut self) -> Result<u16, Error> {
        if self.value == DAC_WRAP {
            self.value = 0;
        }
        let code = self.value;
        self.set(code)?;
        self.value += DAC_STEP;
        Ok(code)
    }

    /// Code that the next [`advance`](Self::advance) writes, before wrapping
    pub fn value(&self) -> u16 {
        self.value
    }

    /// Drive the output to `code`, clamped to [`DAC_FULL_SCALE`]
    pub fn set(&mut self, code: u16) -> Result<(), Error> {
        self.dac
            .set_duty_cycle_fraction(code.min(DAC_FULL_SCALE), DAC_FULL_SCALE)
            .map_err(Error::dac)
    }

    /// Give back the output
    pub fn release(self) -> P {
        self.dac
    }
}

/// Heartbeat LED, toggled once per completed capture
pub struct StatusLed<P> {
    /// LED pin, active high
    led: P,
}

impl<P: OutputPin> StatusLed<P> {
    /// Take the LED pin and switch it off
    pub fn init(mut led: P) -> Result<Self, Error> {
        led.set_low().map_err(Error::led)?;
        Ok(Self { led })
    }

    /// Light the LED on odd loop counts, clear it on even ones
    pub fn show_loop(&mut self, loop_counter: u16) -> Result<(), Error> {
        self.led
            .set_state(PinState::from(loop_counter % 2 == 1))
            .map_err(Error::led)
    }

    /// The LED pin
    pub fn pin(&self) -> &P {
        &self.led
    }

    /// Give back the pin
    pub fn release(self) -> P {
        self.led
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use core::convert::Infallible;
    use std::vec::Vec;

    use embedded_hal::{digital::ErrorType as DigitalErrorType, pwm::ErrorType as PwmErrorType};

    use super::*;

    /// Duty-cycle output with the same range as the pico DAC slice
    #[derive(Default)]
    pub(crate) struct MockDac {
        pub(crate) writes: Vec<u16>,
    }

    impl PwmErrorType for MockDac {
        type Error = Infallible;
    }

    impl SetDutyCycle for MockDac {
        fn max_duty_cycle(&self) -> u16 {
            DAC_FULL_SCALE
        }

        fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
            self.writes.push(duty);
            Ok(())
        }
    }

    /// Pin that remembers its level
    #[derive(Default)]
    pub(crate) struct MockLed {
        pub(crate) high: bool,
        pub(crate) writes: usize,
    }

    impl DigitalErrorType for MockLed {
        type Error = Infallible;
    }

    impl OutputPin for MockLed {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.high = false;
            self.writes += 1;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.high = true;
            self.writes += 1;
            Ok(())
        }
    }

    #[test]
    fn init_writes_zero() {
        let ramp = DacRamp::init(MockDac::default()).unwrap();
        assert_eq!(ramp.value(), 0);
        assert_eq!(ramp.release().writes, [0]);
    }

    #[test]
    fn ramp_steps_by_ten() {
        let mut ramp = DacRamp::init(MockDac::default()).unwrap();
        assert_eq!(ramp.advance(), Ok(0));
        assert_eq!(ramp.advance(), Ok(10));
        assert_eq!(ramp.advance(), Ok(20));
        assert_eq!(ramp.release().writes, [0, 0, 10, 20]);
    }

    #[test]
    fn ramp_wraps_before_writing_4000() {
        let mut ramp = DacRamp::init(MockDac::default()).unwrap();
        let codes: Vec<u16> = (0..402).map(|_| ramp.advance().unwrap()).collect();
        assert_eq!(codes[399], 3990);
        assert_eq!(codes[400], 0);
        assert_eq!(codes[401], 10);
        assert!(codes.iter().all(|code| *code < DAC_WRAP));
    }

    #[test]
    fn set_clamps_to_full_scale() {
        let mut ramp = DacRamp::init(MockDac::default()).unwrap();
        ramp.set(u16::MAX).unwrap();
        assert_eq!(ramp.release().writes.last(), Some(&DAC_FULL_SCALE));
    }

    #[test]
    fn led_follows_loop_parity() {
        let mut led = StatusLed::init(MockLed::default()).unwrap();
        assert_eq!(led.pin().writes, 1);
        led.show_loop(1).unwrap();
        assert!(led.led.high);
        led.show_loop(2).unwrap();
        assert!(!led.led.high);
        led.show_loop(u16::MAX).unwrap();
        assert!(led.release().high);
    }
}
