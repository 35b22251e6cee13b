//! Bevy ECS Systems - Hook handlers, command handling, persistence

mod chat;
mod persistence;
mod placement;

pub use chat::*;
pub use persistence::*;
pub use placement::*;
