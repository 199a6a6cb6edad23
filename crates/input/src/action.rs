use mazewalk_common::Intent;

/// A high-level action bound to a key.
///
/// The kernel never sees keys; movement actions become `Intent`s and the
/// jump action becomes a jump request on the frame input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Forward,
    Backward,
    Left,
    Right,
    Jump,
    Quit,
}

impl Action {
    /// Resolve a key name (case-insensitive) to its default binding.
    pub fn from_key_name(name: &str) -> Option<Self> {
        Key::from_name(name).map(Key::action)
    }

    /// The movement intent for directional actions.
    pub fn intent(self) -> Option<Intent> {
        match self {
            Self::Forward => Some(Intent::Forward),
            Self::Backward => Some(Intent::Backward),
            Self::Left => Some(Intent::Left),
            Self::Right => Some(Intent::Right),
            Self::Jump | Self::Quit => None,
        }
    }
}

/// A physical key with a default binding.
///
/// Several keys can share one action (W and UP both walk forward), so held
/// state is tracked per key rather than per action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    S,
    A,
    D,
    Up,
    Down,
    Left,
    Right,
    Space,
    Escape,
}

impl Key {
    /// Parse a key name, case-insensitive. `ESC` is accepted for `ESCAPE`.
    pub fn from_name(name: &str) -> Option<Self> {
        let key = match name.to_ascii_uppercase().as_str() {
            "W" => Self::W,
            "S" => Self::S,
            "A" => Self::A,
            "D" => Self::D,
            "UP" => Self::Up,
            "DOWN" => Self::Down,
            "LEFT" => Self::Left,
            "RIGHT" => Self::Right,
            "SPACE" => Self::Space,
            "ESCAPE" | "ESC" => Self::Escape,
            _ => return None,
        };
        Some(key)
    }

    pub fn action(self) -> Action {
        match self {
            Self::W | Self::Up => Action::Forward,
            Self::S | Self::Down => Action::Backward,
            Self::A | Self::Left => Action::Left,
            Self::D | Self::Right => Action::Right,
            Self::Space => Action::Jump,
            Self::Escape => Action::Quit,
        }
    }
}
