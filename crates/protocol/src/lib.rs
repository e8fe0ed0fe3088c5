//! Host protocol: pipe-delimited inbound commands and outbound game events.
//!
//! # Invariants
//! - Malformed or unknown inbound messages are dropped, never surfaced.
//! - Commands reach the simulation only through [`CommandQueue::drain`], once per frame.
//! - Event encoding is the only place the outbound wire format is defined.

pub mod command;
pub mod event;
pub mod queue;
pub mod sink;

pub use command::{Command, MoveAction, ProtocolError};
pub use event::{ElapsedTime, GameEvent};
pub use queue::{CommandQueue, CommandSender};
pub use sink::{EventSink, LineFormat, LineSink};
