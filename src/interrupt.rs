//! Interrupt handler bodies, plus static [`Mutex`].
//!
//! The `#[interrupt]` entry points live in the binary and forward here.

use core::cell::{Cell, RefCell};

use critical_section::Mutex;
use defmt::warn;
use rp2040_hal::adc::AdcFifo;

use crate::{
    board::TriggerSlice,
    capture::SharedCapture,
    config::{RESULTS_BUFFER_SIZE, TRIGGER_PRESCALE},
    echoback::TriggerGate,
};

/// ADC results of the current burst, filled by [`on_conversion`]
pub static ADC_RESULTS: SharedCapture<RESULTS_BUFFER_SIZE> = SharedCapture::new();

/// ADC FIFO, paused and converted one sample at a time, for access in interrupts
pub static READINGS_FIFO: Mutex<RefCell<Option<AdcFifo<'static, u16>>>> =
    Mutex::new(RefCell::new(None));

/// PWM slice pacing the conversions, for access in interrupts
pub static TRIGGER_SLICE: Mutex<RefCell<Option<TriggerSlice>>> = Mutex::new(RefCell::new(None));

/// Counts trigger wraps between conversions
static TRIGGER_GATE: Mutex<Cell<TriggerGate>> =
    Mutex::new(Cell::new(TriggerGate::new(TRIGGER_PRESCALE)));

/// `PWM_IRQ_WRAP`: acknowledge the trigger slice and start a conversion every
/// [`TRIGGER_PRESCALE`] wraps it flagged
pub fn on_trigger_wrap() {
    critical_section::with(|cs| {
        // Stale entries after `PwmTrigger::stop` find the flag already cleared
        let wrapped = match TRIGGER_SLICE.borrow_ref_mut(cs).as_mut() {
            Some(slice) => {
                let wrapped = slice.has_overflown();
                slice.clear_interrupt();
                wrapped
            }
            None => false,
        };

        let gate = TRIGGER_GATE.borrow(cs);
        let mut next = gate.get();
        let convert = next.on_interrupt(wrapped);
        gate.set(next);
        if !convert {
            return;
        }

        if let Some(fifo) = READINGS_FIFO.borrow_ref_mut(cs).as_mut() {
            fifo.trigger();
        }
    });
}

/// `ADC_IRQ_FIFO`: move the finished conversion into [`ADC_RESULTS`]
pub fn on_conversion() {
    let sample = critical_section::with(|cs| {
        READINGS_FIFO
            .borrow_ref_mut(cs)
            .as_mut()
            .and_then(|fifo| (fifo.len() > 0).then(|| fifo.read()))
    });

    match sample {
        Some(sample) => ADC_RESULTS.record(sample),
        None => warn!("ADC interrupt without a conversion in the FIFO"),
    }
}

/// Forget pending trigger events, so a new burst starts on a clean prescale count
pub fn reset_trigger_events() {
    critical_section::with(|cs| {
        let gate = TRIGGER_GATE.borrow(cs);
        let mut next = gate.get();
        next.reset();
        gate.set(next);
    });
}
