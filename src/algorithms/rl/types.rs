//! Core types for the pursuit Q-learning algorithm.
//!
//! Defines the discretized state key, the composite table key, and the
//! transition record passed to learning policies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grid::{Action, Position};

/// Discretized state: the pursuer's cell and the target's cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateKey {
    pub pursuer: Position,
    pub target: Position,
}

impl StateKey {
    pub fn new(pursuer: Position, target: Position) -> Self {
        Self { pursuer, target }
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.pursuer.x, self.pursuer.y, self.target.x, self.target.y
        )
    }
}

/// Composite Q-table key: a state plus the action taken in it.
///
/// The text form `px,py,tx,ty-dx-dy` is only used when persisting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QKey {
    pub state: StateKey,
    pub action: Action,
}

impl QKey {
    pub fn new(state: StateKey, action: Action) -> Self {
        Self { state, action }
    }
}

impl fmt::Display for QKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (dx, dy) = self.action.delta();
        write!(f, "{}-{}-{}", self.state, dx, dy)
    }
}

/// Error parsing the persisted text form of a [`QKey`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyParseError {
    #[error("Missing action separator in key '{0}'")]
    MissingSeparator(String),

    #[error("Expected 4 state coordinates in key '{0}'")]
    BadStateArity(String),

    #[error("Invalid number in key '{0}'")]
    InvalidNumber(String),

    #[error("Unknown action ({dx}, {dy}) in key '{key}'")]
    UnknownAction { key: String, dx: i32, dy: i32 },
}

impl FromStr for QKey {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // State coordinates are never negative, so the first '-' ends them.
        let (state_part, action_part) = s
            .split_once('-')
            .ok_or_else(|| KeyParseError::MissingSeparator(s.to_string()))?;

        let coords = state_part
            .split(',')
            .map(|c| c.trim().parse::<i32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| KeyParseError::InvalidNumber(s.to_string()))?;
        let [px, py, tx, ty] = coords[..] else {
            return Err(KeyParseError::BadStateArity(s.to_string()));
        };

        // `dx` may carry its own sign: "10-0", "-10-10", "10--10".
        let (sign, rest) = match action_part.strip_prefix('-') {
            Some(rest) => (-1, rest),
            None => (1, action_part),
        };
        let (dx_text, dy_text) = rest
            .split_once('-')
            .map(|(dx, _)| (dx, &rest[dx.len() + 1..]))
            .ok_or_else(|| KeyParseError::MissingSeparator(s.to_string()))?;
        let dx = dx_text
            .parse::<i32>()
            .map(|v| v * sign)
            .map_err(|_| KeyParseError::InvalidNumber(s.to_string()))?;
        let dy = dy_text
            .parse::<i32>()
            .map_err(|_| KeyParseError::InvalidNumber(s.to_string()))?;

        let action = Action::from_delta(dx, dy).ok_or_else(|| KeyParseError::UnknownAction {
            key: s.to_string(),
            dx,
            dy,
        })?;

        Ok(QKey::new(
            StateKey::new(Position::new(px, py), Position::new(tx, ty)),
            action,
        ))
    }
}

/// One observed step of experience.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub state: StateKey,
    pub action: Action,
    pub reward: f64,
    pub next_state: StateKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(action: Action) -> QKey {
        QKey::new(
            StateKey::new(Position::new(0, 10), Position::new(50, 990)),
            action,
        )
    }

    #[test]
    fn identical_positions_give_equal_keys() {
        let a = StateKey::new(Position::new(10, 20), Position::new(30, 40));
        let b = StateKey::new(Position::new(10, 20), Position::new(30, 40));
        assert_eq!(a, b);
        let mut set = std::collections::HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn text_form_matches_persisted_layout() {
        assert_eq!(key(Action::Right).to_string(), "0,10,50,990-10-0");
        assert_eq!(key(Action::UpLeft).to_string(), "0,10,50,990--10--10");
        assert_eq!(key(Action::UpRight).to_string(), "0,10,50,990-10--10");
    }

    #[test]
    fn every_action_parses_back() {
        for action in Action::ALL {
            let k = key(action);
            assert_eq!(k.to_string().parse::<QKey>(), Ok(k));
        }
    }

    #[test]
    fn malformed_keys_are_rejected() {
        assert!(matches!(
            "0,0,0,0".parse::<QKey>(),
            Err(KeyParseError::MissingSeparator(_))
        ));
        assert!(matches!(
            "0,0,0-10-0".parse::<QKey>(),
            Err(KeyParseError::BadStateArity(_))
        ));
        assert!(matches!(
            "0,a,0,0-10-0".parse::<QKey>(),
            Err(KeyParseError::InvalidNumber(_))
        ));
        assert!(matches!(
            "0,0,0,0-20-0".parse::<QKey>(),
            Err(KeyParseError::UnknownAction { dx: 20, dy: 0, .. })
        ));
    }
}
