use std::collections::HashSet;

use mazewalk_common::{FrameInput, Intent, JumpTrigger};

use crate::action::{Action, Key};

/// Input gathered between two frames.
///
/// Held keys persist until released; an action is held while any key bound
/// to it is down. One-shots (jump edge, quit) and the
/// accumulated mouse motion are consumed by `take_frame`.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    trigger: JumpTrigger,
    held: HashSet<Key>,
    // one-shots, cleared after each frame
    jump_pressed: bool,
    quit_requested: bool,
    mouse: (f32, f32),
}

impl InputState {
    pub fn new(trigger: JumpTrigger) -> Self {
        Self {
            trigger,
            ..Self::default()
        }
    }

    /// Record a key-down. Repeats while already held are not new edges,
    /// and neither is a second key for an action that is already held.
    pub fn press(&mut self, key: Key) {
        let action = key.action();
        let was_held = self.is_held(action);
        if self.held.insert(key) && !was_held {
            match action {
                Action::Jump => self.jump_pressed = true,
                Action::Quit => self.quit_requested = true,
                _ => {}
            }
        }
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
    }

    /// Release every held action, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    pub fn is_key_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.held.iter().any(|k| k.action() == action)
    }

    /// Accumulate raw relative mouse motion (screen coordinates, +y down).
    pub fn mouse_motion(&mut self, dx: f32, dy: f32) {
        self.mouse.0 += dx;
        self.mouse.1 += dy;
    }

    /// Quit was pressed since the last frame.
    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Build this frame's input and clear the one-shots.
    ///
    /// Intents come out in fixed order (forward, backward, left, right). The
    /// vertical mouse axis is negated so moving the mouse up looks up.
    pub fn take_frame(&mut self) -> FrameInput {
        let intents: Vec<Intent> = Intent::ALL
            .into_iter()
            .filter(|intent| self.held.iter().any(|k| k.action().intent() == Some(*intent)))
            .collect();
        let jump = match self.trigger {
            JumpTrigger::Edge => self.jump_pressed,
            JumpTrigger::WhileHeld => self.jump_pressed || self.is_held(Action::Jump),
        };
        let frame = FrameInput {
            is_moving: !intents.is_empty(),
            intents,
            look: (self.mouse.0, -self.mouse.1),
            jump,
        };
        self.clear_one_shots();
        frame
    }

    fn clear_one_shots(&mut self) {
        self.jump_pressed = false;
        self.quit_requested = false;
        self.mouse = (0.0, 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_directions_become_ordered_intents() {
        let mut input = InputState::default();
        input.press(Key::D);
        input.press(Key::W);
        let frame = input.take_frame();
        assert_eq!(frame.intents, vec![Intent::Forward, Intent::Right]);
        assert!(frame.is_moving);

        // still held next frame
        assert_eq!(input.take_frame().intents.len(), 2);

        input.release(Key::W);
        input.release(Key::D);
        let frame = input.take_frame();
        assert!(frame.intents.is_empty());
        assert!(!frame.is_moving);
    }

    #[test]
    fn edge_jump_fires_once_per_press() {
        let mut input = InputState::new(JumpTrigger::Edge);
        input.press(Key::Space);
        assert!(input.take_frame().jump);
        assert!(!input.take_frame().jump);

        // key repeat while held is not a new press
        input.press(Key::Space);
        assert!(!input.take_frame().jump);

        input.release(Key::Space);
        input.press(Key::Space);
        assert!(input.take_frame().jump);
    }

    #[test]
    fn tap_between_frames_still_jumps() {
        let mut input = InputState::new(JumpTrigger::Edge);
        input.press(Key::Space);
        input.release(Key::Space);
        assert!(input.take_frame().jump);
    }

    #[test]
    fn while_held_jump_repeats() {
        let mut input = InputState::new(JumpTrigger::WhileHeld);
        input.press(Key::Space);
        assert!(input.take_frame().jump);
        assert!(input.take_frame().jump);
        input.release(Key::Space);
        assert!(!input.take_frame().jump);
    }

    #[test]
    fn mouse_accumulates_and_flips_vertical() {
        let mut input = InputState::default();
        input.mouse_motion(3.0, 4.0);
        input.mouse_motion(1.0, -1.0);
        let frame = input.take_frame();
        assert_eq!(frame.look, (4.0, -3.0));
        assert_eq!(input.take_frame().look, (0.0, 0.0));
    }

    #[test]
    fn jump_alone_is_not_moving() {
        let mut input = InputState::default();
        input.press(Key::Space);
        let frame = input.take_frame();
        assert!(!frame.is_moving);
        assert!(frame.intents.is_empty());
    }

    #[test]
    fn quit_is_a_one_shot() {
        let mut input = InputState::default();
        input.press(Key::Escape);
        assert!(input.quit_requested());
        input.take_frame();
        assert!(!input.quit_requested());
    }

    #[test]
    fn aliased_key_keeps_direction_held() {
        let mut input = InputState::default();
        input.press(Key::W);
        input.press(Key::Up);
        input.release(Key::Up);
        let frame = input.take_frame();
        assert_eq!(frame.intents, vec![Intent::Forward]);
        assert!(frame.is_moving);
        assert!(input.is_held(Action::Forward));
        assert!(!input.is_key_held(Key::Up));

        input.release(Key::W);
        assert!(!input.take_frame().is_moving);
    }

    #[test]
    fn both_arrow_and_letter_give_one_intent() {
        let mut input = InputState::default();
        input.press(Key::D);
        input.press(Key::Right);
        assert_eq!(input.take_frame().intents, vec![Intent::Right]);
    }

    #[test]
    fn release_all_stops_movement() {
        let mut input = InputState::default();
        input.press(Key::W);
        input.press(Key::A);
        input.release_all();
        assert!(!input.take_frame().is_moving);
    }
}
