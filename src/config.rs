//! Tunables for a game session.
//!
//! Everything has a default, so a missing `ocean_duel.toml` simply means the
//! stock game. A present but malformed file is a startup error.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{GameError, GameResult};

pub const DEFAULT_CONFIG_FILE: &str = "ocean_duel.toml";
pub const CONFIG_ENV_VAR: &str = "OCEAN_DUEL_CONFIG";

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ShieldStyle {
    /// Animated sprite-sheet bubble.
    Animated,
    /// Plain outline circle.
    Ring,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub width: i32,
    pub height: i32,
    pub fps: u32,
    pub asset_dir: PathBuf,

    pub ship_size: (u32, u32),
    pub ship_frames: usize,
    pub ship_speed: i32,
    pub blink_speed: i32,
    pub blink_distance: i32,
    pub blink_frames: usize,

    pub shield_style: ShieldStyle,
    pub shield_sizes: [(u32, u32); 2],
    pub shield_frames: [usize; 2],
    pub ring_radius: i32,
    pub ring_color: (u8, u8, u8),
    pub ring_width: i32,

    pub explosion_size: (u32, u32),
    pub explosion_images: usize,
    pub explosion_ticks_per_image: u32,

    pub bird_count: usize,
    pub bird_frames: usize,

    pub background_scroll: i32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            width: 1600,
            height: 900,
            fps: 50,
            asset_dir: PathBuf::from("assets"),

            ship_size: (250, 250),
            ship_frames: 10,
            ship_speed: 10,
            blink_speed: 20,
            blink_distance: 500,
            blink_frames: 8,

            shield_style: ShieldStyle::Animated,
            shield_sizes: [(300, 300), (280, 280)],
            shield_frames: [8, 7],
            ring_radius: 75,
            ring_color: (0, 0, 255),
            ring_width: 2,

            explosion_size: (100, 100),
            explosion_images: 10,
            explosion_ticks_per_image: 5,

            bird_count: 5,
            bird_frames: 6,

            background_scroll: 1,
        }
    }
}

impl GameConfig {
    /// Parse and validate a config file's contents.
    pub fn from_toml_str(text: &str, origin: &Path) -> GameResult<Self> {
        let config: GameConfig = toml::from_str(text).map_err(|e| GameError::Config {
            path: origin.to_path_buf(),
            reason: e.to_string(),
        })?;
        config.validate(origin)?;
        Ok(config)
    }

    /// Reject values the game cannot run with: empty animations, zero-sized
    /// sprites, and blinks that would never reach their distance.
    pub fn validate(&self, origin: &Path) -> GameResult<()> {
        let invalid = |reason: String| -> GameResult<()> {
            Err(GameError::Config {
                path: origin.to_path_buf(),
                reason,
            })
        };

        if self.width <= 0 || self.height <= 0 {
            return invalid(format!("arena must be positive, got {}x{}", self.width, self.height));
        }
        if self.fps == 0 {
            return invalid("fps must be at least 1".into());
        }
        if self.blink_speed <= 0 {
            return invalid(format!("blink_speed must be positive, got {}", self.blink_speed));
        }
        if self.blink_distance <= 0 {
            return invalid(format!(
                "blink_distance must be positive, got {}",
                self.blink_distance
            ));
        }
        if self.explosion_ticks_per_image == 0 {
            return invalid("explosion_ticks_per_image must be at least 1".into());
        }

        let frame_counts = [
            ("ship_frames", self.ship_frames),
            ("blink_frames", self.blink_frames),
            ("shield_frames[0]", self.shield_frames[0]),
            ("shield_frames[1]", self.shield_frames[1]),
            ("bird_frames", self.bird_frames),
            ("explosion_images", self.explosion_images),
        ];
        if let Some((name, _)) = frame_counts.iter().find(|(_, n)| *n == 0) {
            return invalid(format!("{name} must be at least 1"));
        }

        let sizes = [
            ("ship_size", self.ship_size),
            ("shield_sizes[0]", self.shield_sizes[0]),
            ("shield_sizes[1]", self.shield_sizes[1]),
            ("explosion_size", self.explosion_size),
        ];
        if let Some((name, (w, h))) = sizes.iter().find(|(_, (w, h))| *w == 0 || *h == 0) {
            return invalid(format!("{name} must be non-empty, got {w}x{h}"));
        }

        Ok(())
    }

    /// Read `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> GameResult<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml_str(&text, path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(GameError::Config {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }),
        }
    }

    /// Config location: `$OCEAN_DUEL_CONFIG` or `./ocean_duel.toml`.
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }
}
