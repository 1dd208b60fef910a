//! Serial prompt, command input and the decimal sample report.

#[cfg(target_os = "none")]
use embedded_io::Error as _;
use embedded_io::{Read, Write};

use crate::{config::CAPTURE_COMMAND, error::Error};

/// Sent once after bring-up
pub const GREETING: &[u8] = b"\r\n\n\nHello World!";
/// Sent right after [`GREETING`]
pub const INSTRUCTIONS: &[u8] = b"\r\nYou will enter a character, and the DSP will echo it back!\n";
/// Sent before every blocking read
pub const PROMPT: &[u8] = b"\r\nEnter a character: ";
/// Precedes the decimal sample value, which starts on its own line
pub const REPORT_HEADER: &[u8] = b"\r\nadcAResults: \r\n";

/// Number of ASCII digits in a sample report
pub const REPORT_DIGITS: usize = 4;

/// Meaning of a received character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Run a capture burst and report the result
    Capture,
    /// Anything else. Dropped without a reply.
    Ignored(u8),
}

impl From<u8> for Command {
    fn from(byte: u8) -> Self {
        if byte == CAPTURE_COMMAND {
            Command::Capture
        } else {
            Command::Ignored(byte)
        }
    }
}

/// Render a sample as four zero-padded ASCII digits, most significant first.
///
/// Values above 9999 are clamped; 12-bit samples never reach that.
pub fn format_sample(sample: u16) -> [u8; REPORT_DIGITS] {
    let mut rest = sample.min(9999);
    let mut digits = [b'0'; REPORT_DIGITS];
    let mut divisor = 1000;
    for digit in digits.iter_mut() {
        *digit = b'0' + (rest / divisor) as u8;
        rest %= divisor;
        divisor /= 10;
    }
    digits
}

/// Text protocol spoken over a blocking serial port
pub struct Console<S> {
    /// Serial port, e.g. a UART peripheral
    serial: S,
}

impl<S: Read + Write> Console<S> {
    /// Wrap a configured serial port
    pub fn new(serial: S) -> Self {
        Self { serial }
    }

    /// Send the greeting and the instructions
    pub fn greet(&mut self) -> Result<(), Error> {
        self.write(GREETING)?;
        self.write(INSTRUCTIONS)
    }

    /// Ask for the next character
    pub fn prompt(&mut self) -> Result<(), Error> {
        self.write(PROMPT)
    }

    /// Block until one byte is received.
    ///
    /// Receive errors (overrun, break, parity, framing) drop the frame and keep waiting.
    pub fn read_char(&mut self) -> u8 {
        let mut byte = [0u8; 1];
        loop {
            match self.serial.read(&mut byte) {
                Ok(1) => return byte[0],
                // A blocking read only returns 0 bytes for an empty buffer
                Ok(_) => {}
                Err(_err) => {
                    #[cfg(target_os = "none")]
                    defmt::warn!(
                        "Dropping received frame: {}",
                        defmt::Debug2Format(&_err.kind())
                    );
                }
            }
        }
    }

    /// Block for one character and classify it
    pub fn read_command(&mut self) -> Command {
        Command::from(self.read_char())
    }

    /// Send the report header followed by the decimal value of `sample`
    pub fn report(&mut self, sample: u16) -> Result<(), Error> {
        self.write(REPORT_HEADER)?;
        self.write(&format_sample(sample))
    }

    /// Discard input until an `a` or `A` arrives.
    ///
    /// Hosts send this character first so the link is known to be up before the greeting.
    #[cfg(feature = "autobaud")]
    pub fn lock_autobaud(&mut self) {
        while !matches!(self.read_char(), b'a' | b'A') {}
    }

    /// Wait until all queued bytes are sent
    pub fn flush(&mut self) -> Result<(), Error> {
        self.serial.flush().map_err(Error::serial)
    }

    /// Access the serial port
    pub fn serial(&mut self) -> &mut S {
        &mut self.serial
    }

    /// Give back the serial port
    pub fn release(self) -> S {
        self.serial
    }

    /// Write all of `bytes`
    fn write(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.serial.write_all(bytes).map_err(Error::serial)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::{collections::VecDeque, vec::Vec};

    use embedded_io::{ErrorKind, ErrorType};

    use super::*;

    /// Serial port with scripted input that records everything written to it
    #[derive(Default)]
    pub(crate) struct MockSerial {
        pub(crate) rx: VecDeque<Result<u8, ErrorKind>>,
        pub(crate) tx: Vec<u8>,
        /// Writes fail once `tx` holds this many bytes
        pub(crate) tx_limit: Option<usize>,
    }

    impl MockSerial {
        pub(crate) fn with_input(input: &[u8]) -> Self {
            Self {
                rx: input.iter().copied().map(Ok).collect(),
                ..Self::default()
            }
        }

        pub(crate) fn with_script(script: &[Result<u8, ErrorKind>]) -> Self {
            Self {
                rx: script.iter().copied().collect(),
                ..Self::default()
            }
        }
    }

    impl ErrorType for MockSerial {
        type Error = ErrorKind;
    }

    impl Read for MockSerial {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            match self.rx.pop_front() {
                Some(Ok(byte)) => {
                    buf[0] = byte;
                    Ok(1)
                }
                Some(Err(kind)) => Err(kind),
                // A real port would block forever
                None => panic!("read past the end of the scripted input"),
            }
        }
    }

    impl Write for MockSerial {
        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            if self.tx_limit.is_some_and(|limit| self.tx.len() >= limit) {
                return Err(ErrorKind::BrokenPipe);
            }
            self.tx.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    #[test]
    fn format_pads_and_orders_digits() {
        assert_eq!(&format_sample(0), b"0000");
        assert_eq!(&format_sample(7), b"0007");
        assert_eq!(&format_sample(305), b"0305");
        assert_eq!(&format_sample(4095), b"4095");
        assert_eq!(&format_sample(9999), b"9999");
    }

    #[test]
    fn format_clamps_large_values() {
        assert_eq!(&format_sample(u16::MAX), b"9999");
    }

    #[test]
    fn only_capture_command_starts_capture() {
        assert_eq!(Command::from(b's'), Command::Capture);
        assert_eq!(Command::from(b'S'), Command::Ignored(b'S'));
        assert_eq!(Command::from(b'\r'), Command::Ignored(b'\r'));
    }

    #[test]
    fn greeting_is_byte_exact() {
        let mut console = Console::new(MockSerial::default());
        console.greet().unwrap();
        assert_eq!(
            console.release().tx,
            b"\r\n\n\nHello World!\r\nYou will enter a character, and the DSP will echo it back!\n"
        );
    }

    #[test]
    fn report_writes_header_and_digits() {
        let mut console = Console::new(MockSerial::default());
        console.report(1234).unwrap();
        assert_eq!(console.release().tx, b"\r\nadcAResults: \r\n1234");
    }

    #[test]
    fn read_command_consumes_one_byte() {
        let mut console = Console::new(MockSerial::with_input(b"xs"));
        assert_eq!(console.read_command(), Command::Ignored(b'x'));
        assert_eq!(console.read_command(), Command::Capture);
        assert!(console.release().rx.is_empty());
    }

    #[test]
    fn receive_errors_are_dropped() {
        let mut console = Console::new(MockSerial::with_script(&[
            Err(ErrorKind::Other),
            Err(ErrorKind::Other),
            Ok(b's'),
        ]));
        assert_eq!(console.read_command(), Command::Capture);
    }

    #[test]
    fn write_failure_is_reported() {
        let mut console = Console::new(MockSerial {
            tx_limit: Some(0),
            ..MockSerial::default()
        });
        assert_eq!(console.prompt(), Err(Error::Serial(ErrorKind::BrokenPipe)));
    }

    #[cfg(feature = "autobaud")]
    #[test]
    fn autobaud_skips_until_a() {
        let mut console = Console::new(MockSerial::with_input(b"\0xyAs"));
        console.lock_autobaud();
        assert_eq!(console.read_command(), Command::Capture);
    }
}
