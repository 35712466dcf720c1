//! rcon-client library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/` and
//! the binary entry point in `main.rs` share the same module tree.
//!
//! The client administers a game server over the Source remote console
//! protocol. Each public operation is one self-contained cycle:
//!
//! ```text
//! RconClient (facade)
//!  └─ Session::connect()      -- TCP connect under the overall timeout
//!  └─ Session::authenticate() -- one Auth frame, one reply frame
//!  └─ Session::execute()      -- one Exec frame, aggregate reply frames
//!  └─ Session::close()        -- on every exit path
//! ```
//!
//! Opening a brand-new connection per logical operation means there is no
//! cross-command state to reason about and no stale auth session to leak
//! into a retry; the cost is one extra round trip per call, which is
//! acceptable for a low-frequency administrative client.

/// TOML/environment configuration for the target server.
pub mod config;

/// One authenticated TCP connection's lifetime.
pub mod session;

/// Domain operations composed from session round trips.
pub mod client;

/// The fixed read-only query battery.
pub mod info;

pub use client::RconClient;
pub use config::{ConfigError, ServerConfig};
pub use info::ServerInfo;
pub use session::{Session, SessionError, SessionState};
