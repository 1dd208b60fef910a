//! The echoback loop: prompt, wait for `s`, capture a burst, report one sample.

use core::convert::Infallible;

#[cfg(target_os = "none")]
use defmt::{debug, info, trace};
use embedded_hal::{digital::OutputPin, pwm::SetDutyCycle};
use embedded_io::{Read, Write};

use crate::{
    capture::SharedCapture,
    components::{DacRamp, StatusLed},
    console::{Command, Console},
    error::Error,
};

/// Start/stop control of the timer that paces ADC conversions
pub trait SampleTrigger {
    /// Enable trigger events and let the counter run
    fn start(&mut self);
    /// Disable trigger events and freeze the counter
    fn stop(&mut self);
}

/// Decides which trigger interrupts start a conversion.
///
/// Only wraps the slice actually flagged count, so an interrupt left pending after
/// [`SampleTrigger::stop`] cannot add a sample. Every `prescale`-th counted wrap converts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerGate {
    /// Counted wraps per conversion
    prescale: u8,
    /// Counted wraps since the last conversion
    events: u8,
}

impl TriggerGate {
    /// Gate converting on every `prescale`-th wrap. A prescale of 0 is treated as 1.
    pub const fn new(prescale: u8) -> Self {
        Self {
            prescale: if prescale == 0 { 1 } else { prescale },
            events: 0,
        }
    }

    /// Handle one trigger interrupt. `wrapped` is the slice's overflow flag, read before
    /// clearing it. Returns `true` when a conversion should start.
    pub fn on_interrupt(&mut self, wrapped: bool) -> bool {
        if !wrapped {
            return false;
        }
        self.events += 1;
        if self.events < self.prescale {
            return false;
        }
        self.events = 0;
        true
    }

    /// Forget counted wraps, so a new burst starts on a clean prescale count
    pub fn reset(&mut self) {
        self.events = 0;
    }
}

/// Result of one pass through the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A character other than the capture command was received and dropped
    Ignored(u8),
    /// A burst was captured and its first sample reported
    Captured {
        /// Reported sample
        sample: u16,
        /// Code written to the DAC during this pass
        dac: u16,
    },
}

#[cfg(target_os = "none")]
impl defmt::Format for Step {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Step::Ignored(byte) => defmt::write!(fmt, "ignored {=u8:#x}", byte),
            Step::Captured { sample, dac } => {
                defmt::write!(fmt, "captured sample {=u16}, DAC at {=u16}", sample, dac)
            }
        }
    }
}

/// Every peripheral the loop drives, plus the buffer filled by the ADC interrupt
pub struct Echoback<'a, S, T, D, L, const N: usize> {
    /// Serial prompt and report
    console: Console<S>,
    /// Paces the ADC conversions
    trigger: T,
    /// Stepped once per capture
    dac: DacRamp<D>,
    /// Toggled once per capture
    led: StatusLed<L>,
    /// Written by the ADC interrupt
    capture: &'a SharedCapture<N>,
    /// Number of completed captures, wrapping
    loop_counter: u16,
}

impl<'a, S, T, D, L, const N: usize> Echoback<'a, S, T, D, L, N>
where
    S: Read + Write,
    T: SampleTrigger,
    D: SetDutyCycle,
    L: OutputPin,
{
    /// Assemble the loop. The trigger should be stopped and the capture reset.
    pub fn new(
        console: Console<S>,
        trigger: T,
        dac: DacRamp<D>,
        led: StatusLed<L>,
        capture: &'a SharedCapture<N>,
    ) -> Self {
        Self {
            console,
            trigger,
            dac,
            led,
            capture,
            loop_counter: 0,
        }
    }

    /// Lock the link when `autobaud` is enabled, then greet
    pub fn start(&mut self) -> Result<(), Error> {
        #[cfg(feature = "autobaud")]
        {
            #[cfg(target_os = "none")]
            info!("Waiting for autobaud character");
            self.console.lock_autobaud();
        }
        self.console.greet()
    }

    /// Prompt, read one character and capture if it is the capture command
    pub fn step(&mut self) -> Result<Step, Error> {
        self.console.prompt()?;
        match self.console.read_command() {
            Command::Capture => self.capture(),
            Command::Ignored(byte) => {
                #[cfg(target_os = "none")]
                trace!("Ignoring character {=u8:#x}", byte);
                Ok(Step::Ignored(byte))
            }
        }
    }

    /// Run [`start`](Self::start), then [`step`](Self::step) until a write to a peripheral fails
    pub fn run(mut self) -> Result<Infallible, Error> {
        self.start()?;
        #[cfg(target_os = "none")]
        info!("Echoback running");
        loop {
            self.step()?;
        }
    }

    /// Captures completed so far
    pub fn loop_counter(&self) -> u16 {
        self.loop_counter
    }

    /// One capture burst: trigger, wait for the interrupt, report, step DAC and LED
    fn capture(&mut self) -> Result<Step, Error> {
        self.trigger.start();
        self.capture.wait_full();
        self.trigger.stop();

        #[cfg(all(target_os = "none", feature = "trace_samples"))]
        self.capture
            .with(|buffer| trace!("Captured samples:\n{=[u16]}", &buffer.samples()[..]));

        let dac = self.dac.advance()?;
        let sample = self.capture.first();
        self.console.report(sample)?;

        self.loop_counter = self.loop_counter.wrapping_add(1);
        self.led.show_loop(self.loop_counter)?;

        let step = Step::Captured { sample, dac };
        #[cfg(target_os = "none")]
        debug!("Capture {=u16}: {}", self.loop_counter, step);
        Ok(step)
    }
}
