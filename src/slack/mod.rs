pub mod client;
pub mod events;
pub mod handlers;
pub mod verify;

pub use client::{PostMessage, SlackClient};
pub use events::{EventEnvelope, MessageEvent, SlackEvent};
