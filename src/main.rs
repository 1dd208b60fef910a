//! Serial echoback with PWM-triggered ADC capture and a PWM DAC ramp.
#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]
#![doc(html_playground_url = "https://play.rust-lang.org/")]
#![warn(missing_docs)]

#[cfg(target_os = "none")]
mod firmware {
    use adc_echoback::{
        board::Board,
        components::{DacRamp, StatusLed},
        console::Console,
        echoback::Echoback,
        interrupt::{self as handlers, ADC_RESULTS},
    };
    use defmt::info;
    #[allow(unused_imports)]
    use defmt_rtt as _;
    #[allow(unused_imports)]
    use panic_probe as _;
    use rp2040_hal::{entry, pac, pac::interrupt};

    /// Second-stage bootloader, from [rp2040-boot2](https://docs.rs/rp2040-boot2)
    #[link_section = ".boot2"]
    #[used]
    pub static BOOT2: [u8; 256] = rp2040_boot2::BOOT_LOADER_W25Q080;

    /// Main operation loop
    #[entry]
    fn main() -> ! {
        info!("Echoback startup");
        let board = Board::init(
            pac::Peripherals::take().unwrap(),
            pac::CorePeripherals::take().unwrap(),
        );

        let echoback = Echoback::new(
            Console::new(board.serial),
            board.trigger,
            DacRamp::init(board.dac).unwrap(),
            StatusLed::init(board.led).unwrap(),
            &ADC_RESULTS,
        );
        // ADC input must outlive the FIFO, which is never released
        let _adc_input = board.adc_input;

        match echoback.run() {
            Ok(never) => match never {},
            Err(err) => defmt::panic!("Echoback stopped: {}", err),
        }
    }

    /// Trigger slice wrapped: start the next conversion
    #[interrupt]
    fn PWM_IRQ_WRAP() {
        handlers::on_trigger_wrap();
    }

    /// Conversion finished: store it
    #[interrupt]
    fn ADC_IRQ_FIFO() {
        handlers::on_conversion();
    }
}

/// The firmware only runs on the RP2040 (`--target thumbv6m-none-eabi`)
#[cfg(not(target_os = "none"))]
fn main() {
    eprintln!("adc_echoback is firmware, build it with `--target thumbv6m-none-eabi`");
}
