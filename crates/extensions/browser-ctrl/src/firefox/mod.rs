//! Firefox debugging clients.
//!
//! - [`FirefoxClient`] speaks the remote debugging protocol: one TCP socket
//!   carrying many actors, `<len>:<json>` frames, replies matched per actor
//!   in FIFO order.
//! - [`RemoteControlClient`] speaks the line protocol of the Remote Control
//!   extension: one script per line, one JSON reply per line.

mod actors;
mod client;
mod protocol;
mod remote_control;
mod session;

pub use client::{FirefoxClient, FirefoxOptions};
pub use protocol::{EvalMode, Grip, TabDescriptor, TargetForm};
pub use remote_control::RemoteControlClient;
