//! Background work that outlives a single backend call.
//!
//! - `poller` - fixed-interval chat refresh driving the chat event streams

pub mod poller;

pub use poller::{ChatChannel, ChatFeed, MessageFeed, dedup_snapshots, poll_messages};
