//! RP2040 bring-up: clocks, serial port, ADC, sampling trigger, PWM DAC and LED.

use cortex_m::{delay::Delay, singleton};
use defmt::{debug, info, warn};
use embedded_hal::{digital::OutputPin, pwm::SetDutyCycle};
use rp2040_hal::{
    adc::{Adc, AdcPin},
    clocks::init_clocks_and_plls,
    fugit::RateExtU32,
    gpio::{
        bank0::{Gpio0, Gpio1, Gpio25, Gpio26},
        FunctionSio, FunctionUart, Pin, Pins, PullDown, PullNone, SioInput, SioOutput,
    },
    pac,
    prelude::*,
    pwm::{self, Slices},
    uart::{DataBits, Enabled, StopBits, UartConfig, UartPeripheral},
    Sio, Watchdog,
};

use crate::{
    config::{
        ADC_POWER_UP_US, BAUD_RATE, DAC_FULL_SCALE, DAC_POWER_UP_US, TRIGGER_CLOCK_DIV,
        TRIGGER_COMPARE, TRIGGER_PERIOD, XOSC_FREQ_HZ,
    },
    echoback::SampleTrigger,
    interrupt::{self, ADC_RESULTS, READINGS_FIFO, TRIGGER_SLICE},
};

/// UART0 on GPIO0 (TX) and GPIO1 (RX)
pub type SerialPort = UartPeripheral<
    Enabled,
    pac::UART0,
    (
        Pin<Gpio0, FunctionUart, PullDown>,
        Pin<Gpio1, FunctionUart, PullDown>,
    ),
>;
/// PWM slice 1, pacing the ADC conversions
pub type TriggerSlice = pwm::Slice<pwm::Pwm1, pwm::FreeRunning>;
/// PWM slice 2 channel A on GPIO4, filtered into an analog output
pub type DacChannel = pwm::Channel<pwm::Slice<pwm::Pwm2, pwm::FreeRunning>, pwm::A>;
/// On-board LED
pub type Led = Pin<Gpio25, FunctionSio<SioOutput>, PullDown>;
/// ADC input 0
pub type AdcInput = AdcPin<Pin<Gpio26, FunctionSio<SioInput>, PullNone>>;

/// Panic message if the trigger slice was never moved into its mutex
const NO_TRIGGER_PANIC_MSG: &str = "Trigger slice has not been initialized or is not available in mutex";

/// Starts and freezes [`TRIGGER_SLICE`]. Each wrap of the counter fires `PWM_IRQ_WRAP`, which
/// starts a conversion.
pub struct PwmTrigger;

impl SampleTrigger for PwmTrigger {
    fn start(&mut self) {
        interrupt::reset_trigger_events();
        critical_section::with(|cs| {
            let mut slice = TRIGGER_SLICE.borrow_ref_mut(cs);
            let slice = slice.as_mut().expect(NO_TRIGGER_PANIC_MSG);
            slice.clear_interrupt();
            slice.enable_interrupt();
            slice.enable();
        });
    }

    fn stop(&mut self) {
        critical_section::with(|cs| {
            let mut slice = TRIGGER_SLICE.borrow_ref_mut(cs);
            let slice = slice.as_mut().expect(NO_TRIGGER_PANIC_MSG);
            slice.disable();
            slice.disable_interrupt();
            slice.clear_interrupt();
            slice.set_counter(0);
        });
    }
}

/// Configured peripherals handed to the echoback loop
pub struct Board {
    /// Serial port at [`BAUD_RATE`], 8N1
    pub serial: SerialPort,
    /// Frozen sampling trigger
    pub trigger: PwmTrigger,
    /// DAC output, set to 0
    pub dac: DacChannel,
    /// LED pin
    pub led: Led,
    /// ADC input, kept alive for the FIFO in [`READINGS_FIFO`]
    pub adc_input: AdcInput,
}

impl Board {
    /// Bring up every peripheral and move the interrupt-owned ones into their mutexes.
    ///
    /// Interrupts are unmasked last, with the trigger still frozen.
    pub fn init(mut pac: pac::Peripherals, core: pac::CorePeripherals) -> Self {
        let mut watchdog = Watchdog::new(pac.WATCHDOG);
        let sio = Sio::new(pac.SIO);

        let clocks = init_clocks_and_plls(
            XOSC_FREQ_HZ,
            pac.XOSC,
            pac.CLOCKS,
            pac.PLL_SYS,
            pac.PLL_USB,
            &mut pac.RESETS,
            &mut watchdog,
        )
        .ok()
        .unwrap();
        let mut delay = Delay::new(core.SYST, clocks.system_clock.freq().to_Hz());
        let pins = Pins::new(
            pac.IO_BANK0,
            pac.PADS_BANK0,
            sio.gpio_bank0,
            &mut pac.RESETS,
        );

        let mut led = pins.gpio25.into_push_pull_output();
        led.set_low().unwrap();

        // Setup ADC FIFO paused, conversions are started one at a time by the trigger interrupt
        debug!("Powering up ADC");
        let adc = singleton!(: Adc = Adc::new(pac.ADC, &mut pac.RESETS)).unwrap();
        let mut adc_input = AdcPin::new(pins.gpio26.into_floating_input()).unwrap();
        let readings_fifo = adc
            .build_fifo()
            .set_channel(&mut adc_input)
            .enable_interrupt(1)
            .start_paused();
        delay.delay_us(ADC_POWER_UP_US);
        ADC_RESULTS.reset();
        debug!("critical_section: transfer readings FIFO to mutex");
        critical_section::with(|cs| READINGS_FIFO.replace(cs, Some(readings_fifo)));

        // Sampling trigger, frozen until a capture starts
        let mut pwm_slices = Slices::new(pac.PWM, &mut pac.RESETS);
        let mut trigger = pwm_slices.pwm1;
        trigger.set_div_int(TRIGGER_CLOCK_DIV);
        trigger.set_top(TRIGGER_PERIOD - 1);
        trigger
            .channel_a
            .set_duty_cycle(TRIGGER_COMPARE)
            .unwrap_or_else(|_| warn!("Unable to set trigger compare value"));
        trigger.channel_a.output_to(pins.gpio2);
        trigger.disable();
        trigger.set_counter(0);
        debug!("critical_section: transfer trigger slice to mutex");
        critical_section::with(|cs| TRIGGER_SLICE.replace(cs, Some(trigger)));

        // PWM DAC, needs an RC low-pass on GPIO4
        pwm_slices.pwm2.set_top(DAC_FULL_SCALE);
        pwm_slices.pwm2.enable();
        let mut dac = pwm_slices.pwm2.channel_a;
        dac.output_to(pins.gpio4);
        dac.set_duty_cycle(0)
            .unwrap_or_else(|_| warn!("Unable to zero DAC output"));
        delay.delay_us(DAC_POWER_UP_US);

        let uart_pins = (
            pins.gpio0.into_function::<FunctionUart>(),
            pins.gpio1.into_function::<FunctionUart>(),
        );
        let serial = UartPeripheral::new(pac.UART0, uart_pins, &mut pac.RESETS)
            .enable(
                UartConfig::new(BAUD_RATE.Hz(), DataBits::Eight, None, StopBits::One),
                clocks.peripheral_clock.freq(),
            )
            .unwrap();

        unsafe {
            pac::NVIC::unmask(pac::Interrupt::ADC_IRQ_FIFO);
            pac::NVIC::unmask(pac::Interrupt::PWM_IRQ_WRAP);
        }
        info!("Board initialization complete, {=u32} baud", BAUD_RATE);

        Self {
            serial,
            trigger: PwmTrigger,
            dac,
            led,
            adc_input,
        }
    }
}
