//! Errors raised by the peripherals driven from the main loop.

use core::fmt;

use embedded_hal::{digital, pwm};

/// Peripheral failure while running the echoback loop.
///
/// Driver errors are reduced to their `ErrorKind` so the loop does not need to be generic over
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Writing to the serial port failed
    Serial(embedded_io::ErrorKind),
    /// Updating the DAC output failed
    Dac(pwm::ErrorKind),
    /// Driving the status LED failed
    Led(digital::ErrorKind),
}

impl Error {
    /// Map a serial driver error
    pub fn serial<E: embedded_io::Error>(err: E) -> Self {
        Self::Serial(err.kind())
    }

    /// Map a DAC (PWM channel) driver error
    pub fn dac<E: pwm::Error>(err: E) -> Self {
        Self::Dac(err.kind())
    }

    /// Map an LED (GPIO) driver error
    pub fn led<E: digital::Error>(err: E) -> Self {
        Self::Led(err.kind())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Serial(kind) => write!(f, "serial port error: {kind:?}"),
            Error::Dac(kind) => write!(f, "DAC output error: {kind:?}"),
            Error::Led(kind) => write!(f, "status LED error: {kind:?}"),
        }
    }
}

#[cfg(target_os = "none")]
impl defmt::Format for Error {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Error::Serial(kind) => {
                defmt::write!(fmt, "serial port error: {}", defmt::Debug2Format(kind))
            }
            Error::Dac(kind) => defmt::write!(fmt, "DAC output error: {}", defmt::Debug2Format(kind)),
            Error::Led(kind) => {
                defmt::write!(fmt, "status LED error: {}", defmt::Debug2Format(kind))
            }
        }
    }
}
