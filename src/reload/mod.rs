//! Live reload: WebSocket listener and client notification.

mod message;
mod server;

pub use message::ReloadMessage;
pub use server::{ReloadHandle, start};
