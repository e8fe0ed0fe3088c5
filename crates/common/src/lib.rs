//! Shared types and configuration for the maze runner workspace.
//!
//! # Invariants
//! - Grid coordinates are integer cell indices; world positions derive from them.
//! - A validated [`GameConfig`] never has `speed.default > speed.max`.

pub mod config;
pub mod types;

pub use config::{ConfigError, GameConfig, LookConfig, MovementConfig, SpeedConfig};
pub use types::{CollectibleId, GridCoord};
