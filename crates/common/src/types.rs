use serde::{Deserialize, Serialize};

/// A single discrete horizontal movement request for the current tick.
///
/// Several intents may be applied in one tick, one per held direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    Forward,
    Backward,
    Left,
    Right,
}

impl Intent {
    /// Fixed application order within a tick.
    pub const ALL: [Intent; 4] = [
        Intent::Forward,
        Intent::Backward,
        Intent::Left,
        Intent::Right,
    ];
}

/// Everything the navigation core consumes from the input layer for one frame.
///
/// `look` is already relative and already sign-adjusted: positive `look.1`
/// means "look up".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameInput {
    pub intents: Vec<Intent>,
    pub look: (f32, f32),
    pub jump: bool,
    /// True iff any directional key is currently held.
    pub is_moving: bool,
}

impl FrameInput {
    /// Frame input carrying only a look delta.
    pub fn look(dx: f32, dy: f32) -> Self {
        Self {
            look: (dx, dy),
            ..Self::default()
        }
    }

    /// Frame input holding the given directions.
    pub fn moving(intents: &[Intent]) -> Self {
        Self {
            intents: intents.to_vec(),
            is_moving: !intents.is_empty(),
            ..Self::default()
        }
    }
}
