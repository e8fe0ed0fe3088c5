use mazerun_common::CollectibleId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Elapsed session time, rendered on the wire as `HH:MM:SS`.
///
/// Hours are not wrapped; a session longer than 99 hours prints three digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElapsedTime(pub Duration);

impl std::fmt::Display for ElapsedTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let secs = self.0.as_secs();
        write!(
            f,
            "{:02}:{:02}:{:02}",
            secs / 3600,
            (secs % 3600) / 60,
            secs % 60
        )
    }
}

/// A game-to-host notification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// Session bootstrap finished.
    Ready,
    /// Number of collectibles placed at bootstrap.
    Spawned { count: usize },
    /// A collectible was picked up.
    Collect { id: CollectibleId },
    /// Live collectibles left after the preceding pickup.
    Remaining { count: usize },
    /// Every collectible has been picked up. Sent once per session.
    Win,
    /// Reply to `get_time`.
    Time { elapsed: ElapsedTime },
}

impl std::fmt::Display for GameEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ready => f.write_str("ready"),
            Self::Spawned { count } => write!(f, "spawned|{count}"),
            Self::Collect { id } => write!(f, "collect|{id}"),
            Self::Remaining { count } => write!(f, "remaining|{count}"),
            Self::Win => f.write_str("win"),
            Self::Time { elapsed } => write!(f, "time|{elapsed}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_time_formats_hh_mm_ss() {
        assert_eq!(ElapsedTime(Duration::ZERO).to_string(), "00:00:00");
        assert_eq!(ElapsedTime(Duration::from_millis(59_999)).to_string(), "00:00:59");
        assert_eq!(ElapsedTime(Duration::from_secs(3_725)).to_string(), "01:02:05");
        assert_eq!(ElapsedTime(Duration::from_secs(360_000)).to_string(), "100:00:00");
    }

    #[test]
    fn wire_encoding() {
        assert_eq!(GameEvent::Ready.to_string(), "ready");
        assert_eq!(GameEvent::Spawned { count: 4 }.to_string(), "spawned|4");
        assert_eq!(
            GameEvent::Collect {
                id: CollectibleId(3)
            }
            .to_string(),
            "collect|3"
        );
        assert_eq!(GameEvent::Remaining { count: 0 }.to_string(), "remaining|0");
        assert_eq!(GameEvent::Win.to_string(), "win");
        assert_eq!(
            GameEvent::Time {
                elapsed: ElapsedTime(Duration::from_secs(61))
            }
            .to_string(),
            "time|00:01:01"
        );
    }
}
