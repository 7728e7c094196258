//! Per-connection address capture.
//!
//! # Responsibilities
//! - Record the peer address and the accepting socket's local address
//! - Hand both to request handlers through axum's `ConnectInfo`
//!
//! # Design Decisions
//! - Local address is best effort; a socket that cannot report it yields `None`
//! - Only IPs leave this module; ports are irrelevant to locality

use std::net::{IpAddr, SocketAddr};

use axum::extract::connect_info::{ConnectInfo, Connected};
use axum::http::Extensions;
use axum::serve::IncomingStream;
use tokio::net::TcpListener;

/// Addresses of both ends of an accepted TCP connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionAddrs {
    /// The peer that opened the connection.
    pub remote: SocketAddr,
    /// The local address the connection was accepted on.
    pub local: Option<SocketAddr>,
}

impl Connected<IncomingStream<'_, TcpListener>> for ConnectionAddrs {
    fn connect_info(stream: IncomingStream<'_, TcpListener>) -> Self {
        Self {
            remote: *stream.remote_addr(),
            local: stream.io().local_addr().ok(),
        }
    }
}

/// Peer and local IPs recorded for a request, if the server captured them.
///
/// Understands both [`ConnectionAddrs`] and a plain `ConnectInfo<SocketAddr>`
/// (remote only). Requests without connect info (in-process transports)
/// yield `(None, None)`.
pub fn peer_ips(extensions: &Extensions) -> (Option<IpAddr>, Option<IpAddr>) {
    if let Some(ConnectInfo(addrs)) = extensions.get::<ConnectInfo<ConnectionAddrs>>() {
        return (Some(addrs.remote.ip()), addrs.local.map(|a| a.ip()));
    }
    if let Some(ConnectInfo(remote)) = extensions.get::<ConnectInfo<SocketAddr>>() {
        return (Some(remote.ip()), None);
    }
    (None, None)
}
