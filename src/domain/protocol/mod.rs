//! Command protocol module.
//!
//! Typed commands, their wire and event representations, and the codec
//! that turns worker text into commands using the configured prefix table.

mod codec;
mod command;
mod constants;
mod errors;
mod event;
mod message;
mod role;

pub use codec::CommandCodec;
pub use command::{Command, CommandKind, KbQuery, QueryCommand};
pub use constants::ProtocolConstants;
pub use errors::CodecError;
pub use event::EventRecord;
pub use message::WireMessage;
pub use role::Role;
