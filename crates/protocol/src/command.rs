use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One of the four directional movement keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveAction {
    Forward,
    Backward,
    Left,
    Right,
}

impl MoveAction {
    pub const ALL: [MoveAction; 4] = [
        MoveAction::Forward,
        MoveAction::Backward,
        MoveAction::Left,
        MoveAction::Right,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Backward => "backward",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl FromStr for MoveAction {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "forward" => Ok(Self::Forward),
            "backward" => Ok(Self::Backward),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            other => Err(ProtocolError::UnknownAction(other.to_owned())),
        }
    }
}

/// Why an inbound message was not understood.
///
/// These never reach the host: malformed messages are dropped, and the error
/// only feeds diagnostics.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProtocolError {
    #[error("empty message")]
    Empty,
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error("`{command}` takes {expected} field(s), got {got}")]
    Arity {
        command: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("unknown move action `{0}`")]
    UnknownAction(String),
    #[error("`{0}` is not a number")]
    NotANumber(String),
    #[error("`{0}` is not a finite number")]
    NotFinite(String),
}

/// A host-to-game command decoded from the pipe-delimited wire format.
///
/// Wire forms: `move|<action>|<bool>`, `setspeed|<num>`, `resetspeed`,
/// `active|<bool>`, `xray|<bool>`, `get_time`. Booleans are `true` only for
/// the literal `true`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command {
    /// Press or release a movement key.
    Move { action: MoveAction, pressed: bool },
    /// Request a new current speed; the receiver clamps it to the profile max.
    SetSpeed { value: f32 },
    /// Restore the default speed.
    ResetSpeed,
    /// Pause (`false`) or resume (`true`) the simulation.
    Active { active: bool },
    /// Renderer-only see-through toggle.
    XRay { enabled: bool },
    /// Ask for the elapsed session time.
    GetTime,
}

impl Command {
    /// Lossy parse: anything malformed or unknown yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.parse() {
            Ok(command) => Some(command),
            Err(err) => {
                tracing::debug!(%err, raw, "dropping inbound message");
                None
            }
        }
    }
}

fn wire_bool(field: &str) -> bool {
    field == "true"
}

fn expect_fields(
    command: &'static str,
    parts: &[&str],
    expected: usize,
) -> Result<(), ProtocolError> {
    if parts.len() == expected {
        Ok(())
    } else {
        Err(ProtocolError::Arity {
            command,
            expected,
            got: parts.len(),
        })
    }
}

impl FromStr for Command {
    type Err = ProtocolError;

    fn from_str(message: &str) -> Result<Self, Self::Err> {
        let message = message.trim_end_matches(['\r', '\n']);
        if message.is_empty() {
            return Err(ProtocolError::Empty);
        }
        let parts: Vec<&str> = message.split('|').collect();
        match parts[0] {
            "move" => {
                expect_fields("move", &parts, 3)?;
                Ok(Self::Move {
                    action: parts[1].parse()?,
                    pressed: wire_bool(parts[2]),
                })
            }
            "setspeed" => {
                expect_fields("setspeed", &parts, 2)?;
                let value: f32 = parts[1]
                    .trim()
                    .parse()
                    .map_err(|_| ProtocolError::NotANumber(parts[1].to_owned()))?;
                if !value.is_finite() {
                    return Err(ProtocolError::NotFinite(parts[1].to_owned()));
                }
                Ok(Self::SetSpeed { value })
            }
            "resetspeed" => {
                expect_fields("resetspeed", &parts, 1)?;
                Ok(Self::ResetSpeed)
            }
            "active" => {
                expect_fields("active", &parts, 2)?;
                Ok(Self::Active {
                    active: wire_bool(parts[1]),
                })
            }
            "xray" => {
                expect_fields("xray", &parts, 2)?;
                Ok(Self::XRay {
                    enabled: wire_bool(parts[1]),
                })
            }
            "get_time" => {
                expect_fields("get_time", &parts, 1)?;
                Ok(Self::GetTime)
            }
            other => Err(ProtocolError::UnknownCommand(other.to_owned())),
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Move { action, pressed } => write!(f, "move|{}|{pressed}", action.as_str()),
            Self::SetSpeed { value } => write!(f, "setspeed|{value}"),
            Self::ResetSpeed => f.write_str("resetspeed"),
            Self::Active { active } => write!(f, "active|{active}"),
            Self::XRay { enabled } => write!(f, "xray|{enabled}"),
            Self::GetTime => f.write_str("get_time"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_move() {
        assert_eq!(
            Command::parse("move|forward|true"),
            Some(Command::Move {
                action: MoveAction::Forward,
                pressed: true
            })
        );
        assert_eq!(
            Command::parse("move|left|false"),
            Some(Command::Move {
                action: MoveAction::Left,
                pressed: false
            })
        );
    }

    #[test]
    fn only_literal_true_is_true() {
        for field in ["TRUE", "1", "yes", "", "True"] {
            let msg = format!("move|right|{field}");
            assert_eq!(
                Command::parse(&msg),
                Some(Command::Move {
                    action: MoveAction::Right,
                    pressed: false
                }),
                "{msg}"
            );
        }
        assert_eq!(
            Command::parse("active|false"),
            Some(Command::Active { active: false })
        );
    }

    #[test]
    fn move_requires_exactly_three_fields() {
        assert_eq!(
            "move|forward".parse::<Command>(),
            Err(ProtocolError::Arity {
                command: "move",
                expected: 3,
                got: 2
            })
        );
        assert!(Command::parse("move|forward|true|extra").is_none());
    }

    #[test]
    fn unknown_action_is_dropped() {
        assert_eq!(
            "move|jump|true".parse::<Command>(),
            Err(ProtocolError::UnknownAction("jump".into()))
        );
    }

    #[test]
    fn setspeed_requires_a_number() {
        assert_eq!(
            Command::parse("setspeed|12.5"),
            Some(Command::SetSpeed { value: 12.5 })
        );
        assert!(Command::parse("setspeed|fast").is_none());
        assert!(Command::parse("setspeed|NaN").is_none());
        assert!(Command::parse("setspeed|").is_none());
    }

    #[test]
    fn setspeed_rejects_infinities() {
        for raw in ["setspeed|inf", "setspeed|-inf", "setspeed|1e39", "setspeed|-1e39"] {
            assert!(
                matches!(raw.parse::<Command>(), Err(ProtocolError::NotFinite(_))),
                "{raw}"
            );
        }
        // Huge but finite values still decode.
        assert_eq!(
            Command::parse("setspeed|-1e30"),
            Some(Command::SetSpeed { value: -1e30 })
        );
    }

    #[test]
    fn parameterless_commands() {
        assert_eq!(Command::parse("resetspeed"), Some(Command::ResetSpeed));
        assert_eq!(Command::parse("get_time"), Some(Command::GetTime));
        assert!(Command::parse("get_time|now").is_none());
    }

    #[test]
    fn xray_is_a_plain_flag() {
        assert_eq!(
            Command::parse("xray|true"),
            Some(Command::XRay { enabled: true })
        );
    }

    #[test]
    fn garbage_is_dropped() {
        assert_eq!("".parse::<Command>(), Err(ProtocolError::Empty));
        assert!(Command::parse("teleport|1|2").is_none());
        assert!(Command::parse("|||").is_none());
    }

    #[test]
    fn trailing_newline_is_tolerated() {
        assert_eq!(Command::parse("resetspeed\r\n"), Some(Command::ResetSpeed));
    }

    #[test]
    fn display_matches_wire_form() {
        for msg in ["move|backward|true", "setspeed|3.5", "active|true", "xray|false"] {
            let cmd = Command::parse(msg).unwrap();
            assert_eq!(cmd.to_string(), msg);
        }
    }
}
