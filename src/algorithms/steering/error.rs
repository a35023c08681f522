use thiserror::Error;

use crate::Id;

/// Errors raised while managing a flock.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SteeringError {
    #[error("No free spawn position found after {attempts} attempts")]
    NoFreeSpawnPosition { attempts: usize },

    #[error("Boid not found: {0}")]
    UnknownBoid(Id),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_free_spawn_display() {
        let e = SteeringError::NoFreeSpawnPosition { attempts: 500 };
        assert_eq!(e.to_string(), "No free spawn position found after 500 attempts");
    }

    #[test]
    fn unknown_boid_display() {
        let e = SteeringError::UnknownBoid("abc".to_string());
        assert_eq!(e.to_string(), "Boid not found: abc");
    }
}
