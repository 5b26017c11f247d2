//! Rotary encoder decoding
//!
//! Decodes the two quadrature contacts and the push button of a mechanical
//! encoder. The decoder owns all of its state; the firmware polls it from
//! its main loop at a fixed rate (about every 8 ms), which also debounces
//! the contacts.
//!
//! Inputs are contact states, `true` while a contact is closed. On the
//! board the contacts pull their pins low, so the caller inverts the pin
//! level before calling [`RotaryEncoder::poll`].

/// Events produced by the decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RotaryEvent {
    /// One detent in the increasing direction (B contact leads)
    Increment,
    /// One detent in the decreasing direction (A contact leads)
    Decrement,
    /// Button pressed and released
    Click,
}

/// Latched button status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RotaryStatus {
    #[default]
    Idle,
    /// A click happened since the last [`RotaryEncoder::reset_status`]
    Clicked,
}

/// Decoder state machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    DecStep1,
    DecStep2,
    IncStep1,
    IncStep2,
}

/// Quadrature decoder with a wrapping detent counter
#[derive(Debug, Clone)]
pub struct RotaryEncoder {
    state: State,
    counter: u8,
    status: RotaryStatus,
    button_down: bool,
}

impl Default for RotaryEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl RotaryEncoder {
    /// Create a decoder at rest with the counter at zero
    pub const fn new() -> Self {
        Self {
            state: State::Idle,
            counter: 0,
            status: RotaryStatus::Idle,
            button_down: false,
        }
    }

    /// Feed one sample of the contacts
    ///
    /// Returns at most one event per call. Rotation wins over the button
    /// if both complete in the same sample; the click is then reported on
    /// the status latch only.
    pub fn poll(&mut self, a: bool, b: bool, button: bool) -> Option<RotaryEvent> {
        let clicked = self.poll_button(button);
        let rotation = self.decode(a, b);

        match rotation {
            Some(RotaryEvent::Increment) => self.counter = self.counter.wrapping_add(1),
            Some(RotaryEvent::Decrement) => self.counter = self.counter.wrapping_sub(1),
            _ => {}
        }

        rotation.or(if clicked { Some(RotaryEvent::Click) } else { None })
    }

    /// Current detent count (wraps at 256)
    pub fn counter(&self) -> u8 {
        self.counter
    }

    /// Button status latch
    pub fn status(&self) -> RotaryStatus {
        self.status
    }

    /// Clear the click latch
    pub fn reset_status(&mut self) {
        self.status = RotaryStatus::Idle;
    }

    /// Set the counter back to zero
    pub fn reset_counter(&mut self) {
        self.counter = 0;
    }

    /// Click fires on release
    fn poll_button(&mut self, pressed: bool) -> bool {
        let released = self.button_down && !pressed;
        self.button_down = pressed;

        if released {
            self.status = RotaryStatus::Clicked;
        }
        released
    }

    /// Decode contact state
    ///
    /// A full detent closes one contact, then both, then opens again. The
    /// contact that closes first gives the direction:
    ///
    /// Decrement: Idle (open,open) -> DecStep1 (A) -> DecStep2 (A+B) -> emit
    /// Increment: Idle (open,open) -> IncStep1 (B) -> IncStep2 (A+B) -> emit
    fn decode(&mut self, a: bool, b: bool) -> Option<RotaryEvent> {
        match self.state {
            State::Idle => {
                if a && !b {
                    self.state = State::DecStep1;
                } else if b && !a {
                    self.state = State::IncStep1;
                }
                None
            }
            State::DecStep1 => {
                if a && b {
                    self.state = State::DecStep2;
                } else if !a && !b {
                    // Bounce
                    self.state = State::Idle;
                }
                None
            }
            State::DecStep2 => {
                if !a || !b {
                    self.state = State::Idle;
                    return Some(RotaryEvent::Decrement);
                }
                None
            }
            State::IncStep1 => {
                if a && b {
                    self.state = State::IncStep2;
                } else if !a && !b {
                    self.state = State::Idle;
                }
                None
            }
            State::IncStep2 => {
                if !a || !b {
                    self.state = State::Idle;
                    return Some(RotaryEvent::Increment);
                }
                None
            }
        }
    }
}
