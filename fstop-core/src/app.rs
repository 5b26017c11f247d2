//! Timer application state machine
//!
//! Idle: the display shows the selected exposure time in tenths
//! (`10.0`). Turning the encoder changes it by one second per detent.
//! A click (or the external start switch) starts the countdown, which
//! advances once per [`TimerApp::tick`]. Input is ignored while counting.

use crate::config::TimerConfig;
use crate::countdown::Countdown;
use crate::rotary::RotaryEvent;
use crate::traits::NumericDisplay;

/// Fractional digits shown for exposure times
const TENTHS: u8 = 1;

/// Application state
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AppState {
    /// Waiting for input, showing the set time
    Idle,
    /// Exposure running
    Counting(Countdown),
}

/// Exposure timer driving a numeric display
pub struct TimerApp<D> {
    display: D,
    seconds: u8,
    state: AppState,
}

impl<D: NumericDisplay> TimerApp<D> {
    /// Create the app with the configured power-on time
    pub fn new(display: D, config: &TimerConfig) -> Self {
        Self {
            display,
            seconds: config.default_seconds,
            state: AppState::Idle,
        }
    }

    /// Selected exposure time in seconds
    pub fn seconds(&self) -> u8 {
        self.seconds
    }

    /// Current state
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// True while an exposure is running
    pub fn is_counting(&self) -> bool {
        matches!(self.state, AppState::Counting(_))
    }

    /// Borrow the display
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Give the display back
    pub fn release(self) -> D {
        self.display
    }

    /// Redraw the idle screen
    pub fn show_idle(&mut self) -> Result<(), D::Error> {
        self.display.show_fixed(self.seconds as i32 * 10, TENTHS)
    }

    /// Apply an input event
    pub fn handle(&mut self, event: RotaryEvent) -> Result<(), D::Error> {
        if self.is_counting() {
            return Ok(());
        }

        match event {
            RotaryEvent::Increment => {
                self.seconds = self.seconds.wrapping_add(1);
                self.show_idle()
            }
            RotaryEvent::Decrement => {
                self.seconds = self.seconds.wrapping_sub(1);
                self.show_idle()
            }
            RotaryEvent::Click => self.start(),
        }
    }

    /// Start an exposure and show its first frame
    pub fn start(&mut self) -> Result<(), D::Error> {
        #[cfg(feature = "defmt")]
        defmt::info!("exposure start: {}s", self.seconds);

        self.state = AppState::Counting(Countdown::from_seconds(self.seconds));
        self.tick()
    }

    /// Advance a running exposure by one tick
    pub fn tick(&mut self) -> Result<(), D::Error> {
        let AppState::Counting(countdown) = &mut self.state else {
            return Ok(());
        };

        match countdown.next() {
            Some(tenths) => {
                let finished = !countdown.is_running();
                if finished {
                    self.state = AppState::Idle;
                }
                self.display.show_fixed(tenths, TENTHS)
            }
            None => {
                self.state = AppState::Idle;
                Ok(())
            }
        }
    }
}
