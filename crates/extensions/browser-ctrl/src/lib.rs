//! Remote browser control for tilebot.
//!
//! Opens a session with a browser's debugging interface and exposes it as a
//! [`ScriptExecutor`](tilebot_protocols::ScriptExecutor): run a script in the
//! page, get back its JSON value or an error.
//!
//! ## Clients
//!
//! - [`FirefoxClient`] - Firefox remote debugging protocol (actors over TCP)
//! - [`RemoteControlClient`] - Firefox Remote Control extension (JSON lines)
//! - [`ChromeClient`] - Chrome DevTools protocol (WebSocket, id-matched replies)
//!
//! ## Setup
//!
//! ```bash
//! # Firefox: enable remote debugging, then listen on a port
//! firefox --start-debugger-server 32000
//!
//! # Chrome
//! google-chrome --remote-debugging-port=9222
//! ```
//!
//! Each client runs one background task that decodes inbound frames and
//! hands them to whoever is waiting. When the connection drops, every
//! waiting call fails with a connection-closed error.

pub mod chrome;
pub mod firefox;
pub mod framing;
mod receiver;
pub mod selection;

pub use chrome::{ChromeClient, ChromeOptions, PageInfo};
pub use firefox::{EvalMode, FirefoxClient, FirefoxOptions, RemoteControlClient, TabDescriptor};
pub use framing::{DelimitedCodec, FrameError, JsonCodec, JsonFraming, LengthPrefixedCodec};
pub use selection::{FixedSelector, PromptSelector, TargetDescriptor, TargetSelector, choose_target};
