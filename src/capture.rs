//! Fixed-size ADC sample buffer shared between the conversion interrupt and the main loop.

use core::{
    cell::RefCell,
    sync::atomic::{AtomicBool, Ordering},
};

use critical_section::Mutex;

/// Samples of one capture burst, filled front to back by the ADC interrupt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureBuffer<const N: usize> {
    /// Converted samples, index 0 is the oldest of the current burst
    samples: [u16; N],
    /// Slot the next sample is written to
    index: usize,
}

impl<const N: usize> CaptureBuffer<N> {
    /// Zero-filled buffer with the write position at the start
    pub const fn new() -> Self {
        Self {
            samples: [0; N],
            index: 0,
        }
    }

    /// Store a sample at the write position and advance it.
    ///
    /// Returns `true` once the last slot has been written. The write position then starts over at
    /// 0, so the next burst overwrites this one.
    pub fn record(&mut self, sample: u16) -> bool {
        self.samples[self.index] = sample;
        self.index += 1;
        if self.index >= N {
            self.index = 0;
            true
        } else {
            false
        }
    }

    /// Slot the next sample is written to
    pub fn index(&self) -> usize {
        self.index
    }

    /// All samples
    pub fn samples(&self) -> &[u16; N] {
        &self.samples
    }

    /// Sample at `index`, if within the buffer
    pub fn get(&self, index: usize) -> Option<u16> {
        self.samples.get(index).copied()
    }

    /// Zero all samples and rewind the write position
    pub fn clear(&mut self) {
        self.samples = [0; N];
        self.index = 0;
    }
}

impl<const N: usize> Default for CaptureBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// A [`CaptureBuffer`] behind a [`Mutex`], plus the buffer-full flag polled by the main loop.
///
/// The flag is only set from [`record`](Self::record) (interrupt side) and only cleared by
/// [`acknowledge`](Self::acknowledge)/[`wait_full`](Self::wait_full) (main loop).
pub struct SharedCapture<const N: usize> {
    /// Samples, accessed within critical sections
    buffer: Mutex<RefCell<CaptureBuffer<N>>>,
    /// Set when the last slot of the buffer was written
    full: AtomicBool,
}

impl<const N: usize> SharedCapture<N> {
    /// Empty capture, usable in a `static`
    pub const fn new() -> Self {
        Self {
            buffer: Mutex::new(RefCell::new(CaptureBuffer::new())),
            full: AtomicBool::new(false),
        }
    }

    /// Add the latest conversion, raising the buffer-full flag when the burst is complete.
    ///
    /// Called from the ADC interrupt.
    pub fn record(&self, sample: u16) {
        let full = critical_section::with(|cs| self.buffer.borrow_ref_mut(cs).record(sample));
        if full {
            self.full.store(true, Ordering::Release);
        }
    }

    /// Check the buffer-full flag without clearing it
    pub fn is_full(&self) -> bool {
        self.full.load(Ordering::Acquire)
    }

    /// Clear the buffer-full flag
    pub fn acknowledge(&self) {
        self.full.store(false, Ordering::Release);
    }

    /// Spin until the interrupt reports a full buffer, then clear the flag
    pub fn wait_full(&self) {
        while !self.is_full() {
            core::hint::spin_loop();
        }
        self.acknowledge();
    }

    /// Sample at `index`, if within the buffer
    pub fn sample(&self, index: usize) -> Option<u16> {
        critical_section::with(|cs| self.buffer.borrow_ref(cs).get(index))
    }

    /// First sample of the burst. This is the value reported over serial.
    pub fn first(&self) -> u16 {
        critical_section::with(|cs| self.buffer.borrow_ref(cs).samples()[0])
    }

    /// Run `f` with the whole buffer inside a critical section
    pub fn with<R>(&self, f: impl FnOnce(&CaptureBuffer<N>) -> R) -> R {
        critical_section::with(|cs| f(&*self.buffer.borrow_ref(cs)))
    }

    /// Zero the buffer, rewind it and clear the flag
    pub fn reset(&self) {
        critical_section::with(|cs| self.buffer.borrow_ref_mut(cs).clear());
        self.acknowledge();
    }
}

impl<const N: usize> Default for SharedCapture<N> {
    fn default() -> Self {
        Self::new()
    }
}
