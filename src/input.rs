//! Backend-neutral input events, in logical screen coordinates.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Fire,
    /// Keyboard shortcut for the play button.
    Play,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    Click { x: f32, y: f32 },
    PointerMoved { x: f32, y: f32 },
    /// The window (or terminal session) is going away.
    Close,
}

/// What the frame loop should do after an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}
