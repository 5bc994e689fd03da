//! Forward host name resolution.

use crate::{AddressList, Error};
use dns_lookup::{getaddrinfo, AddrInfoHints, LookupErrorKind, SockType};
use std::io;
use std::net::{IpAddr, SocketAddr};

/// Errors reported by a [`HostLookup`].
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// The host name or lookup parameters were rejected.
    #[error("invalid host name")]
    InvalidInput,
    /// The resolver could not answer right now.
    #[error("temporary failure in name resolution")]
    TemporaryFailure,
    /// The resolver ran out of memory.
    #[error("out of memory during name resolution")]
    OutOfMemory,
    /// The name is unknown or has no addresses. Not treated as a failure.
    #[error("no address data for host")]
    NoData,
    /// Any other resolver failure.
    #[error("host lookup failed")]
    Io(#[source] io::Error),
}

impl From<io::Error> for LookupError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::InvalidInput => LookupError::InvalidInput,
            io::ErrorKind::OutOfMemory => LookupError::OutOfMemory,
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted => {
                LookupError::TemporaryFailure
            }
            io::ErrorKind::NotFound => LookupError::NoData,
            _ => LookupError::Io(err),
        }
    }
}

/// Turns host names into addresses.
pub trait HostLookup: Send + Sync {
    /// Gets every address of `hostname`, in resolver order.
    fn lookup_host(&self, hostname: &str) -> Result<Vec<IpAddr>, LookupError>;
}

/// [`HostLookup`] through the operating system resolver, `getaddrinfo(3)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemHostLookup;

impl HostLookup for SystemHostLookup {
    fn lookup_host(&self, hostname: &str) -> Result<Vec<IpAddr>, LookupError> {
        // One socket type, so every address comes back once.
        let hints = AddrInfoHints {
            socktype: SockType::Stream.into(),
            ..AddrInfoHints::default()
        };
        let infos = getaddrinfo(Some(hostname), None, Some(hints)).map_err(|err| {
            translate_ai_error(err.kind()).unwrap_or_else(|| LookupError::Io(err.into()))
        })?;

        let mut ips = Vec::new();
        for info in infos {
            ips.push(info?.sockaddr.ip());
        }
        Ok(ips)
    }
}

/// Maps a `getaddrinfo(3)` failure onto [`LookupError`]. `None` means the
/// failure has no counterpart and is passed through as
/// [`LookupError::Io`].
fn translate_ai_error(kind: LookupErrorKind) -> Option<LookupError> {
    match kind {
        LookupErrorKind::NoName | LookupErrorKind::NoData => Some(LookupError::NoData),
        LookupErrorKind::Again => Some(LookupError::TemporaryFailure),
        LookupErrorKind::Memory => Some(LookupError::OutOfMemory),
        LookupErrorKind::Badflags
        | LookupErrorKind::Family
        | LookupErrorKind::Socktype
        | LookupErrorKind::Service => Some(LookupError::InvalidInput),
        _ => None,
    }
}

/// Resolves `hostname` and appends each of its addresses with `port`, and,
/// when `secondary_port` is nonzero, again with `secondary_port`.
///
/// Returns the number of addresses appended.
pub(crate) fn add_host(
    list: &mut AddressList,
    hosts: &dyn HostLookup,
    hostname: &str,
    port: u16,
    secondary_port: u16,
) -> Result<usize, Error> {
    #[cfg(feature = "log")]
    tracing::trace!(hostname, port, secondary_port, "Adding host");

    let ips = match hosts.lookup_host(hostname) {
        Ok(ips) => ips,
        Err(LookupError::NoData) => {
            #[cfg(feature = "log")]
            tracing::debug!(hostname, "Host has no addresses");
            return Ok(0);
        }
        Err(e) => return Err(e.into()),
    };

    let mut added = 0;
    for ip in ips {
        list.append(SocketAddr::new(ip, port))?;
        added += 1;

        if secondary_port == 0 {
            continue;
        }
        list.append(SocketAddr::new(ip, secondary_port))?;
        added += 1;
    }
    Ok(added)
}
