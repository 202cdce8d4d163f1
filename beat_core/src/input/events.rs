#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Left,
    Down,
    Up,
    Right,
    /// Leave the session and go back to the menu.
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputEvent {
    /// Playback time when the event occurred
    pub timestamp: f64,
    pub button: Button,
    pub pressed: bool,
}

impl InputEvent {
    pub fn press(button: Button, timestamp: f64) -> Self {
        Self {
            timestamp,
            button,
            pressed: true,
        }
    }

    pub fn release(button: Button, timestamp: f64) -> Self {
        Self {
            timestamp,
            button,
            pressed: false,
        }
    }
}
