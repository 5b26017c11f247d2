//! fstop - darkroom exposure timer firmware
//!
//! Main firmware binary for RP2040 boards. A rotary encoder sets the
//! exposure time; a click on the encoder (or the external start switch)
//! runs the countdown on a TM1637 or MAX7219 seven-segment display,
//! selected in timer.toml.
//!
//! Build with `cargo build -p fstop-firmware --target thumbv6m-none-eabi`.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Flex, Input, Level, Output, Pull};
use embassy_rp::spi::{self, Spi};
use embassy_time::{Duration, Instant, Ticker};
use {defmt_rtt as _, panic_probe as _};

use fstop_core::app::TimerApp;
use fstop_core::config::{DisplayKind, TimerConfig, MIN_TICK_MS};
use fstop_core::exposure::{fstop_series, interval_from_hundredths};
use fstop_core::rotary::{RotaryEncoder, RotaryEvent, RotaryStatus};
use fstop_core::traits::NumericDisplay;
use fstop_drivers::{Max7219, Max7219Config, Tm1637};
use fstop_hal_rp2040::{BlockingSpiOut, FlexTwoWire, InputLine, InputPin, LatchPin};

mod config;

use crate::config::TIMER_CONFIG;

/// Operator inputs, all active low with pull-ups
struct Inputs<'d> {
    encoder_a: InputLine<'d>,
    encoder_b: InputLine<'d>,
    encoder_button: InputLine<'d>,
    start: InputLine<'d>,
}

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("fstop timer starting...");

    let config = TIMER_CONFIG;
    if let Err(e) = config.validate() {
        // build.rs enforces the same limits, so this only trips on a stale OUT_DIR
        error!("Invalid timer config: {}", e);
    }

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Pin assignments are board-specific
    let inputs = Inputs {
        encoder_a: InputLine(Input::new(p.PIN_10, Pull::Up)),
        encoder_b: InputLine(Input::new(p.PIN_11, Pull::Up)),
        encoder_button: InputLine(Input::new(p.PIN_12, Pull::Up)),
        start: InputLine(Input::new(p.PIN_13, Pull::Up)),
    };

    log_test_strip(&config);

    match config.display {
        DisplayKind::Tm1637 => {
            // TM1637: CLK=GPIO2, DIO=GPIO3
            let clk = Output::new(p.PIN_2, Level::High);
            let dio = Flex::new(p.PIN_3);
            let mut display = Tm1637::new(FlexTwoWire::new(clk, dio));

            if display.init().is_err() {
                warn!("TM1637 init failed");
            }
            if display.configure_display(config.brightness, true).is_err() {
                warn!("TM1637 configure failed");
            }
            info!("TM1637 display initialized");

            run(display, inputs, &config).await;
        }
        DisplayKind::Max7219 => {
            // MAX7219: SCK=GPIO18, MOSI=GPIO19, LOAD=GPIO17
            let bus = Spi::new_blocking_txonly(p.SPI0, p.PIN_18, p.PIN_19, spi::Config::default());
            let load = LatchPin(Output::new(p.PIN_17, Level::High));
            let mut display = Max7219::new(
                BlockingSpiOut::new(bus),
                load,
                Max7219Config {
                    digits: config.digits,
                    intensity: config.intensity,
                    ..Default::default()
                },
            );

            display.init();
            display.configure();
            info!("MAX7219 display initialized ({} digits)", display.digits());

            run(display, inputs, &config).await;
        }
    }
}

/// Log the f-stop test strip around the power-on time
fn log_test_strip(config: &TimerConfig) {
    let interval = interval_from_hundredths(config.fstop_interval_hundredths);
    let series = fstop_series(config.default_seconds as f32, interval);

    info!(
        "Test strip around {}s, {} stop steps:",
        config.default_seconds, interval
    );
    for (step, seconds) in series.iter().enumerate() {
        info!("  step {}: {}s", step, seconds);
    }
}

/// Poll inputs and drive the timer forever
async fn run<D: NumericDisplay>(display: D, inputs: Inputs<'_>, config: &TimerConfig) {
    let mut app = TimerApp::new(display, config);
    let mut encoder = RotaryEncoder::new();
    let mut last_counter = encoder.counter();
    let mut start_was_pressed = false;

    let tick = Duration::from_millis(config.tick_ms as u64);
    let mut next_tick = Instant::now();
    // Encoder sampling period; also debounces the contacts
    let mut ticker = Ticker::every(Duration::from_millis(MIN_TICK_MS as u64));

    report(app.show_idle());
    info!("Timer ready");

    loop {
        ticker.next().await;

        // Contacts pull low when closed
        let rotation = encoder.poll(
            inputs.encoder_a.is_low(),
            inputs.encoder_b.is_low(),
            inputs.encoder_button.is_low(),
        );

        if encoder.counter() != last_counter {
            info!("Counter: {} | Status: {}", encoder.counter(), encoder.status());
            last_counter = encoder.counter();
        }

        let mut events = [None, None];

        if let Some(ev @ (RotaryEvent::Increment | RotaryEvent::Decrement)) = rotation {
            events[0] = Some(ev);
        }

        // The latch also catches a click that finished alongside a detent
        if encoder.status() == RotaryStatus::Clicked {
            info!("BUTTON CLICKED!");
            encoder.reset_status();
            events[1] = Some(RotaryEvent::Click);
        }

        let start_pressed = inputs.start.is_low();
        if start_pressed && !start_was_pressed {
            info!("Start switch pressed");
            events[1] = Some(RotaryEvent::Click);
        }
        start_was_pressed = start_pressed;

        for event in events.into_iter().flatten() {
            let was_counting = app.is_counting();
            report(app.handle(event));
            if !was_counting && app.is_counting() {
                next_tick = Instant::now() + tick;
            }
        }

        // Catch up on frames if the loop was held up past a tick
        while app.is_counting() && Instant::now() >= next_tick {
            report(app.tick());
            next_tick += tick;

            if !app.is_counting() {
                info!("Exposure finished");
            }
        }
    }
}

fn report<E>(result: Result<(), E>) {
    if result.is_err() {
        warn!("Display update failed");
    }
}
