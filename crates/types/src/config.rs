//! Game configuration.
//!
//! Every field has a default matching the reference feel, so an empty JSON
//! object (`{}`) is a valid configuration.

use serde::{Deserialize, Serialize};

use crate::{
    ConfigError, Point, BOARD_HEIGHT, BOARD_WIDTH, DEFAULT_ARR_MS, DEFAULT_DAS_MS,
    DEFAULT_LOCK_DELAY_MS, DEFAULT_STEP_DELAY_MS,
};

/// Smallest board side that still fits every shape in every orientation.
pub const MIN_BOARD_SIDE: i32 = 4;

/// Strategy used by the bag randomizer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BagKind {
    /// Shuffled permutation of all shapes, refilled every 7 draws.
    #[default]
    Shuffle,
    /// Uniform draws rejected while already taken in the current window.
    Rejection,
}

/// How often the active piece may be swapped into the hold slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldPolicy {
    #[default]
    Unlimited,
    /// One hold per piece; re-armed when a piece locks.
    OncePerPiece,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub board_width: i32,
    pub board_height: i32,
    pub step_delay_ms: u32,
    pub lock_delay_ms: u32,
    pub das_ms: u32,
    pub arr_ms: u32,
    pub soft_drop_das_ms: u32,
    pub soft_drop_arr_ms: u32,
    pub spawn_anchor: Point,
    pub preview_anchor: Point,
    pub hold_anchor: Point,
    pub bag: BagKind,
    pub hold_policy: HoldPolicy,
    /// Maximum lock timer resets per piece (None = unlimited).
    pub lock_reset_limit: Option<u32>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_width: BOARD_WIDTH,
            board_height: BOARD_HEIGHT,
            step_delay_ms: DEFAULT_STEP_DELAY_MS,
            lock_delay_ms: DEFAULT_LOCK_DELAY_MS,
            das_ms: DEFAULT_DAS_MS,
            arr_ms: DEFAULT_ARR_MS,
            soft_drop_das_ms: DEFAULT_DAS_MS,
            soft_drop_arr_ms: DEFAULT_ARR_MS,
            spawn_anchor: Point::new(-1, 8),
            preview_anchor: Point::new(8, 6),
            hold_anchor: Point::new(-10, 6),
            bag: BagKind::Shuffle,
            hold_policy: HoldPolicy::Unlimited,
            lock_reset_limit: None,
        }
    }
}

impl GameConfig {
    /// Lower-left corner of the board (centered on the origin).
    pub fn board_origin(&self) -> Point {
        Point::new(-self.board_width / 2, -self.board_height / 2)
    }

    /// Check the configuration for values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_width <= 0 || self.board_height <= 0 {
            return Err(ConfigError::ZeroBoardSize {
                width: self.board_width,
                height: self.board_height,
            });
        }
        if self.board_width < MIN_BOARD_SIDE || self.board_height < MIN_BOARD_SIDE {
            return Err(ConfigError::BoardTooSmall {
                width: self.board_width,
                height: self.board_height,
                min: MIN_BOARD_SIDE,
            });
        }
        if self.step_delay_ms == 0 {
            return Err(ConfigError::ZeroStepDelay);
        }

        let origin = self.board_origin();
        let anchor = self.spawn_anchor;
        let inside = anchor.x >= origin.x
            && anchor.x < origin.x + self.board_width
            && anchor.y >= origin.y
            && anchor.y < origin.y + self.board_height;
        if !inside {
            return Err(ConfigError::SpawnOutOfBounds { anchor });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GameConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.board_origin(), Point::new(-5, -10));
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let config: GameConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_partial_json_overrides_fields() {
        let config: GameConfig =
            serde_json::from_str(r#"{"das_ms": 100, "bag": "rejection", "hold_policy": "once_per_piece"}"#)
                .unwrap();
        assert_eq!(config.das_ms, 100);
        assert_eq!(config.bag, BagKind::Rejection);
        assert_eq!(config.hold_policy, HoldPolicy::OncePerPiece);
        assert_eq!(config.arr_ms, DEFAULT_ARR_MS);
    }

    #[test]
    fn test_validate_rejects_bad_boards() {
        let config = GameConfig {
            board_width: 0,
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroBoardSize { .. })));

        let config = GameConfig {
            board_height: 3,
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::BoardTooSmall { .. })));
    }

    #[test]
    fn test_validate_rejects_spawn_outside_board() {
        let config = GameConfig {
            spawn_anchor: Point::new(0, 10),
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::SpawnOutOfBounds {
                anchor: Point::new(0, 10)
            })
        );
    }

    #[test]
    fn test_validate_rejects_zero_step_delay() {
        let config = GameConfig {
            step_delay_ms: 0,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroStepDelay));
    }
}
