//! Chrome DevTools Protocol client.
//!
//! Targets are listed over HTTP (`/json/list`), then one page's WebSocket
//! debugger URL is opened. Commands carry increasing integer ids and replies
//! are matched back to their callers by id, so any number of commands may be
//! in flight at once.

mod client;
mod discovery;
mod protocol;

pub use client::{ChromeClient, ChromeOptions};
pub use discovery::list_pages;
pub use protocol::*;
