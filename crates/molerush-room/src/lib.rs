//! Room actors and the live-room registry.
//!
//! A room is a Tokio task owning one match: seats, match state, and a
//! set of named timers. The registry allocates join codes and hands out
//! [`RoomHandle`]s; everything after that flows through the handle's
//! command channel.

mod error;
mod registry;
mod room;

pub use error::RoomError;
pub use registry::RoomRegistry;
pub use room::{RoomHandle, SeatSender};
