//! Session kernel: authoritative maze session state and frame stepping.
//!
//! # Invariants
//! - The maze model is immutable after the session is built.
//! - Spawn cells are consumed without replacement; collectibles never come back.
//! - Player height is pinned to eye level after every frame; pitch stays within its limit.
//! - `win` is emitted exactly once, on the frame the last collectible is picked up.
//! - All state mutations flow through [`Session::apply`] and [`Session::step`].

pub mod clock;
pub mod collectible;
pub mod collision;
pub mod maze;
pub mod player;
pub mod session;
pub mod spawn;

pub use clock::SessionClock;
pub use collectible::{Collectible, CollectibleSet, Pickup};
pub use collision::{CollisionQuery, MazeCollider, OpenSpace, RayHit};
pub use maze::{LayoutError, MazeLayout, MazeModel};
pub use player::{InputState, MoveOutcome, PlayerController, SpeedProfile};
pub use session::{Session, SessionBuilder, SessionError};
pub use spawn::{SpawnError, SpawnPool};
