//! Trace Replay
//!
//! Frame-by-frame playback of recorded sensor-perception traces for a
//! co-simulation host.
//!
//! The host drives a [`player::Player`] through a fixed lifecycle: configure
//! the trace location through string variables, run initialization, then call
//! `step` once per simulated time advance. Each successful step decodes
//! exactly one recorded message and publishes its serialized bytes through a
//! double-buffered exchange, exporting the buffer address as a pair of
//! 32-bit words plus a length.
//!
//! This crate is an embedded component: no CLI, no background threads, one
//! operation at a time per instance.

pub mod exchange;
pub mod player;
pub mod schema;
pub mod source;
pub mod utils;

// Re-export the host-facing surface
pub use exchange::{decode_address, encode_address, OutputExchange, Published};
pub use player::{InstanceKind, LifecycleState, Player, PlayerConfig, Status, StatusKind};
pub use source::{create_source, DecodedMessage, MessageKind, TraceSource};
