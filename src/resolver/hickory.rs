//! SRV queries and host lookups backed by [`hickory_client`] and
//! [`hickory_resolver`].

use super::{QueryError, SrvQuery};
use crate::{HostLookup, LookupError};
use hickory_client::client::{Client, SyncClient};
use hickory_client::rr::{DNSClass, Name, RecordType};
use hickory_client::udp::UdpClientConnection;
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::Resolver;
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

/// Default time to wait for a SRV response.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// [`SrvQuery`] over UDP to a single nameserver.
///
/// The response is handed back re-encoded, exactly as the locator would
/// receive it from `res_search(3)`.
#[derive(Clone, Debug)]
pub struct HickorySrvQuery {
    nameserver: SocketAddr,
    timeout: Duration,
}

impl HickorySrvQuery {
    /// Creates a backend querying `nameserver`.
    pub fn new(nameserver: SocketAddr) -> Self {
        Self {
            nameserver,
            timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    /// Creates a backend querying the first nameserver of the system
    /// resolver configuration.
    pub fn from_system_conf() -> Result<Self, QueryError> {
        let (config, _opts) = hickory_resolver::system_conf::read_system_conf()?;
        let nameserver = config
            .name_servers()
            .first()
            .map(|ns| ns.socket_addr)
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, "no nameservers configured")
            })?;
        Ok(Self::new(nameserver))
    }

    /// Sets how long to wait for a response.
    pub fn timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }
}

impl SrvQuery for HickorySrvQuery {
    fn query_srv(&self, name: &str) -> Result<Vec<u8>, QueryError> {
        let name = Name::from_str(name)?;
        let conn = UdpClientConnection::with_timeout(self.nameserver, self.timeout)?;
        let client = SyncClient::new(conn);
        let response = client.query(&name, DNSClass::IN, RecordType::SRV)?;
        Ok(response.to_vec()?)
    }
}

/// [`HostLookup`] through a synchronous [`hickory_resolver::Resolver`].
pub struct HickoryHostLookup {
    resolver: Resolver,
}

impl HickoryHostLookup {
    /// Wraps an existing resolver.
    pub fn new(resolver: Resolver) -> Self {
        Self { resolver }
    }

    /// Creates a resolver from the system configuration.
    pub fn from_system_conf() -> io::Result<Self> {
        Ok(Self::new(Resolver::from_system_conf()?))
    }
}

impl HostLookup for HickoryHostLookup {
    fn lookup_host(&self, hostname: &str) -> Result<Vec<IpAddr>, LookupError> {
        let lookup = self.resolver.lookup_ip(hostname)?;
        Ok(lookup.iter().collect())
    }
}

impl From<ResolveError> for LookupError {
    fn from(err: ResolveError) -> Self {
        let translated = match err.kind() {
            ResolveErrorKind::NoRecordsFound { .. } => Some(LookupError::NoData),
            ResolveErrorKind::Timeout | ResolveErrorKind::NoConnections => {
                Some(LookupError::TemporaryFailure)
            }
            _ => None,
        };
        translated.unwrap_or_else(|| LookupError::Io(io::Error::other(err)))
    }
}
