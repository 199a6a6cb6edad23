use std::path::Path;

use mazewalk_common::{FrameInput, JumpTrigger};

use crate::action::Key;
use crate::state::InputState;

/// Errors from reading an input script.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },
    #[error("line {line}: unknown key {key:?}")]
    UnknownKey { line: usize, key: String },
}

/// One script line: hold `keys` for `frames` frames, turning by `look` on
/// the first of them.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptStep {
    pub frames: u32,
    pub keys: Vec<Key>,
    /// Raw mouse motion (screen coordinates, +y down).
    pub look: Option<(f32, f32)>,
}

/// Replayable keyboard/mouse input for headless runs.
///
/// Each non-comment line reads `<frames> [KEY ...] [look <dx> <dy>]`.
/// Keys on a line are held for that line's frames and released when the
/// next line omits them. `#` starts a comment. A line holding `ESCAPE`
/// ends playback.
///
/// ```text
/// # settle, turn right, then walk and jump
/// 30
/// 1 look 900 0
/// 60 W
/// 1 W SPACE
/// 40 W
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputScript {
    steps: Vec<ScriptStep>,
}

impl InputScript {
    pub fn parse(text: &str) -> Result<Self, ScriptError> {
        let mut steps = Vec::new();
        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let content = raw.split('#').next().unwrap_or("").trim();
            if content.is_empty() {
                continue;
            }
            steps.push(parse_step(line, content)?);
        }
        Ok(Self { steps })
    }

    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn steps(&self) -> &[ScriptStep] {
        &self.steps
    }

    /// Frames the script would play, ignoring an early quit.
    pub fn total_frames(&self) -> u64 {
        self.steps.iter().map(|s| u64::from(s.frames)).sum()
    }

    /// Expand the script into per-frame input, feeding key transitions
    /// through an `InputState` with the given jump trigger.
    pub fn playback(&self, trigger: JumpTrigger) -> Vec<FrameInput> {
        let mut state = InputState::new(trigger);
        let mut frames = Vec::new();
        let mut held: Vec<Key> = Vec::new();
        for step in &self.steps {
            for key in held.iter().filter(|k| !step.keys.contains(*k)) {
                state.release(*key);
            }
            for &key in &step.keys {
                state.press(key);
            }
            held.clone_from(&step.keys);
            if state.quit_requested() {
                tracing::debug!(frames = frames.len(), "script requested quit");
                break;
            }
            for i in 0..step.frames {
                if i == 0 {
                    if let Some((dx, dy)) = step.look {
                        state.mouse_motion(dx, dy);
                    }
                }
                frames.push(state.take_frame());
            }
        }
        frames
    }
}

fn parse_step(line: usize, content: &str) -> Result<ScriptStep, ScriptError> {
    let mut tokens = content.split_whitespace();
    let count = tokens.next().unwrap_or_default();
    let frames: u32 = count.parse().map_err(|_| ScriptError::Parse {
        line,
        reason: format!("expected a frame count, found {count:?}"),
    })?;

    let mut keys = Vec::new();
    let mut look = None;
    while let Some(token) = tokens.next() {
        if token.eq_ignore_ascii_case("look") {
            let dx = parse_float(line, tokens.next())?;
            let dy = parse_float(line, tokens.next())?;
            look = Some((dx, dy));
            continue;
        }
        let key = Key::from_name(token).ok_or_else(|| ScriptError::UnknownKey {
            line,
            key: token.to_string(),
        })?;
        if !keys.contains(&key) {
            keys.push(key);
        }
    }

    Ok(ScriptStep { frames, keys, look })
}

fn parse_float(line: usize, token: Option<&str>) -> Result<f32, ScriptError> {
    let token = token.ok_or_else(|| ScriptError::Parse {
        line,
        reason: "look needs two numbers".to_string(),
    })?;
    match token.parse::<f32>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ScriptError::Parse {
            line,
            reason: format!("bad look delta {token:?}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mazewalk_common::Intent;

    #[test]
    fn parses_counts_keys_and_look() {
        let script = InputScript::parse("# idle\n30\n\n2 W d look 10 -5 # turn\n").unwrap();
        assert_eq!(script.steps().len(), 2);
        assert_eq!(script.steps()[0].frames, 30);
        assert!(script.steps()[0].keys.is_empty());
        let step = &script.steps()[1];
        assert_eq!(step.keys, vec![Key::W, Key::D]);
        assert_eq!(step.look, Some((10.0, -5.0)));
        assert_eq!(script.total_frames(), 32);
    }

    #[test]
    fn rejects_bad_count() {
        let err = InputScript::parse("W 10").unwrap_err();
        assert!(matches!(err, ScriptError::Parse { line: 1, .. }));
    }

    #[test]
    fn rejects_unknown_key() {
        let err = InputScript::parse("1\n5 W Q").unwrap_err();
        match err {
            ScriptError::UnknownKey { line, key } => {
                assert_eq!(line, 2);
                assert_eq!(key, "Q");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn rejects_incomplete_look() {
        assert!(InputScript::parse("1 look 4").is_err());
        assert!(InputScript::parse("1 look x 4").is_err());
    }

    #[test]
    fn playback_holds_and_releases() {
        let script = InputScript::parse("2 W\n1\n").unwrap();
        let frames = script.playback(JumpTrigger::Edge);
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].intents, vec![Intent::Forward]);
        assert_eq!(frames[1].intents, vec![Intent::Forward]);
        assert!(frames[2].intents.is_empty());
    }

    #[test]
    fn playback_jump_is_edge_triggered_across_lines() {
        let script = InputScript::parse("3 SPACE\n2 SPACE W\n1\n1 SPACE").unwrap();
        let jumps: Vec<bool> = script
            .playback(JumpTrigger::Edge)
            .iter()
            .map(|f| f.jump)
            .collect();
        assert_eq!(jumps, vec![true, false, false, false, false, false, true]);
    }

    #[test]
    fn playback_look_applies_once_and_flips_y() {
        let script = InputScript::parse("3 look 20 10").unwrap();
        let frames = script.playback(JumpTrigger::Edge);
        assert_eq!(frames[0].look, (20.0, -10.0));
        assert_eq!(frames[1].look, (0.0, 0.0));
    }

    #[test]
    fn switching_aliased_keys_keeps_walking() {
        let script = InputScript::parse("1 W UP\n1 W\n1 UP\n1").unwrap();
        let moving: Vec<bool> = script
            .playback(JumpTrigger::Edge)
            .iter()
            .map(|f| f.is_moving)
            .collect();
        assert_eq!(moving, vec![true, true, true, false]);
    }

    #[test]
    fn escape_ends_playback() {
        let script = InputScript::parse("2 W\n1 ESCAPE\n10 W").unwrap();
        assert_eq!(script.playback(JumpTrigger::Edge).len(), 2);
    }
}
