//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → connection.rs (capture peer + local address)
//!     → Hand off to HTTP layer as ConnectInfo<ConnectionAddrs>
//! ```

pub mod connection;

pub use connection::{peer_ips, ConnectionAddrs};
