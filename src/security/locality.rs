//! Local request detection.
//!
//! # Responsibilities
//! - Decide whether a request came from the machine serving it
//! - Refuse to call anything local once a proxy has touched the request
//!
//! # Design Decisions
//! - Addresses compare by IP only; ports never participate
//! - IPv4-mapped IPv6 addresses are canonicalized first
//! - No peer information at all means an in-process transport, which is local

use std::net::IpAddr;

/// Returns true if the request originated on this machine.
pub fn is_local(remote: Option<IpAddr>, local: Option<IpAddr>, forwarded_for: bool) -> bool {
    if forwarded_for {
        return false;
    }

    match (remote.map(|ip| ip.to_canonical()), local.map(|ip| ip.to_canonical())) {
        (Some(remote), Some(local)) => remote == local,
        (Some(remote), None) => remote.is_loopback(),
        (None, None) => true,
        (None, Some(_)) => false,
    }
}
