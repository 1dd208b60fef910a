//! This [RP2040](https://docs.rs/rp2040-hal) project is a peripheral demo: a serial echoback
//! console that, on request, captures a burst of PWM-paced ADC samples, reports one of them in
//! decimal and steps a PWM DAC.
//!
//! Open the serial port at 9600 baud, 8 data bits, no parity, 1 stop bit, no flow control. After
//! the greeting every `s` runs one capture; any other character is dropped and the prompt repeats.
//!
//! ## Crate features
//!
//! - `autobaud`: Waits for an `a` or `A` before sending the greeting.
//! - `trace_samples`: Logs all [`RESULTS_BUFFER_SIZE`](config::RESULTS_BUFFER_SIZE) samples after
//!   every capture. Very noisy!
//!
//! ## Host testing
//!
//! Everything except `board` and `interrupt` is written against `embedded-hal` and
//! `embedded-io` traits and builds on the host, so `cargo test` runs the unit tests without a
//! board attached.
//!
//! ## Demo
//!
//! A simplified version of the binary crate (`src/main.rs`).
//!
//! ```no_run
//! #![no_std]
//! #![no_main]
//!
//! use adc_echoback::{
//!     board::Board,
//!     components::{DacRamp, StatusLed},
//!     console::Console,
//!     echoback::Echoback,
//!     interrupt::ADC_RESULTS,
//! };
//! #[allow(unused_imports)]
//! use defmt_rtt as _;
//! #[allow(unused_imports)]
//! use panic_probe as _;
//! use rp2040_hal::{entry, pac};
//!
//! #[entry]
//! fn main() -> ! {
//!     let board = Board::init(
//!         pac::Peripherals::take().unwrap(),
//!         pac::CorePeripherals::take().unwrap(),
//!     );
//!     let echoback = Echoback::new(
//!         Console::new(board.serial),
//!         board.trigger,
//!         DacRamp::init(board.dac).unwrap(),
//!         StatusLed::init(board.led).unwrap(),
//!         &ADC_RESULTS,
//!     );
//!     match echoback.run() {
//!         Ok(never) => match never {},
//!         Err(err) => defmt::panic!("Echoback stopped: {}", err),
//!     }
//! }
//! ```

// Copyright 2024 Cameron Rodriguez
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg), feature(doc_auto_cfg), feature(doc_cfg_hide))]

#[cfg(target_os = "none")]
pub mod board;
pub mod capture;
pub mod components;
pub mod config;
pub mod console;
pub mod echoback;
pub mod error;
#[cfg(target_os = "none")]
pub mod interrupt;
