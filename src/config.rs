//! Board constants: serial settings, capture sizing, trigger timing and the DAC ramp.

/// Number of ADC samples collected per capture burst
pub const RESULTS_BUFFER_SIZE: usize = 255;

/// ADC resolution. The RP2040 converter is fixed at 12 bits.
pub const ADC_RESOLUTION_BITS: u8 = 12;

/// Serial baud rate. Frames are 8 data bits, no parity, 1 stop bit, no flow control.
pub const BAUD_RATE: u32 = 9600;

/// Period of the sampling trigger in PWM counts (counter top + 1)
pub const TRIGGER_PERIOD: u16 = 0x1000;

/// Compare A value of the sampling trigger, half of [`TRIGGER_PERIOD`]
pub const TRIGGER_COMPARE: u16 = 0x0800;

/// Trigger events per ADC conversion
pub const TRIGGER_PRESCALE: u8 = 1;

/// Integer clock divider of the trigger slice.
///
/// Ex. 125 MHz system clock / 8 / 4096 counts -> ~3.8 kHz sampling, so a full burst takes ~67 ms.
pub const TRIGGER_CLOCK_DIV: u8 = 8;

/// DAC code for full-scale output (12 bit)
pub const DAC_FULL_SCALE: u16 = (1 << ADC_RESOLUTION_BITS) - 1;

/// Increase of the DAC ramp after every capture
pub const DAC_STEP: u16 = 10;

/// Ramp value which is reset to 0 before being written
pub const DAC_WRAP: u16 = 4000;

/// The only character that starts a capture. Everything else is ignored.
pub const CAPTURE_COMMAND: u8 = b's';

/// Settle time after powering up the ADC
pub const ADC_POWER_UP_US: u32 = 1000;

/// Settle time after enabling the DAC output
pub const DAC_POWER_UP_US: u32 = 10;

/// External high-speed crystal on the pico board is 12Mhz
pub const XOSC_FREQ_HZ: u32 = 12_000_000;
