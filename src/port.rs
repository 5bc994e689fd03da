//! Port numbers for located services.
//!
//! Ports are looked up by service name in a [`ServiceLookup`], normally the
//! system's `/etc/services`, and fall back to built-in defaults. Ports are
//! carried in host byte order; [`std::net::SocketAddr`] handles the wire
//! representation.

use std::io;
use std::path::Path;

/// Service name of the primary KDC port.
pub const KDC_PORTNAME: &str = "kerberos";

/// Service name of the secondary KDC port.
pub const KDC_SECONDARY_PORTNAME: &str = "kerberos-sec";

/// Well-known KDC port.
pub const KRB5_DEFAULT_PORT: u16 = 88;

/// Historical secondary KDC port.
pub const KRB5_DEFAULT_SEC_PORT: u16 = 750;

/// Transport used to talk to a located server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Transport {
    /// TCP.
    Stream,
    /// UDP.
    Datagram,
}

impl Transport {
    /// Protocol label used in SRV query names (`_tcp` or `_udp`).
    pub fn srv_label(self) -> &'static str {
        match self {
            Transport::Stream => "_tcp",
            Transport::Datagram => "_udp",
        }
    }

    /// Protocol name used in the services database (`tcp` or `udp`).
    pub fn protocol(self) -> &'static str {
        match self {
            Transport::Stream => "tcp",
            Transport::Datagram => "udp",
        }
    }
}

/// Maps symbolic service names to port numbers.
///
/// Implementations must be safe to call from several threads at once.
pub trait ServiceLookup: Send + Sync {
    /// Gets the port registered for `service` over `transport`, if any.
    fn port(&self, service: &str, transport: Transport) -> Option<u16>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct ServiceEntry {
    names: Vec<String>,
    port: u16,
    protocol: String,
}

/// A services database in `/etc/services` format.
///
/// The file is read once into memory; lookups never touch shared mutable
/// state, unlike `getservbyname(3)`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ServicesFile {
    entries: Vec<ServiceEntry>,
}

impl ServicesFile {
    /// Location of the system services database.
    pub const SYSTEM_PATH: &'static str = "/etc/services";

    /// Loads the system services database, or an empty one if it cannot be
    /// read.
    pub fn system() -> Self {
        match Self::load(Self::SYSTEM_PATH) {
            Ok(services) => services,
            Err(_e) => {
                #[cfg(feature = "log")]
                tracing::debug!(error = %_e, path = Self::SYSTEM_PATH, "Cannot read services database");
                Self::default()
            }
        }
    }

    /// Loads a services database from `path`.
    pub fn load(path: impl AsRef<Path>) -> io::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(Self::parse(&contents))
    }

    /// Parses a services database. Malformed lines are ignored.
    pub fn parse(contents: &str) -> Self {
        let entries = contents
            .lines()
            .filter_map(|line| {
                let line = line.split('#').next().unwrap_or_default();
                let mut fields = line.split_whitespace();
                let name = fields.next()?;
                let (port, protocol) = fields.next()?.split_once('/')?;
                let port = port.parse().ok()?;
                let names = std::iter::once(name)
                    .chain(fields)
                    .map(str::to_owned)
                    .collect();
                Some(ServiceEntry {
                    names,
                    port,
                    protocol: protocol.to_ascii_lowercase(),
                })
            })
            .collect();
        Self { entries }
    }
}

impl ServiceLookup for ServicesFile {
    fn port(&self, service: &str, transport: Transport) -> Option<u16> {
        self.entries
            .iter()
            .find(|entry| {
                entry.protocol == transport.protocol() && entry.names.iter().any(|n| n == service)
            })
            .map(|entry| entry.port)
    }
}

/// Resolves the port for `service`, falling back to `default`.
///
/// Never fails: a missing or unknown service silently yields the default.
pub fn resolve_port(
    services: &dyn ServiceLookup,
    service: &str,
    transport: Transport,
    default: u16,
) -> u16 {
    services.port(service, transport).unwrap_or(default)
}

/// Primary and secondary ports to try on each configured KDC.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KdcPorts {
    /// Port tried first.
    pub primary: u16,
    /// Port tried second on the same host; `0` disables it.
    pub secondary: u16,
}

impl KdcPorts {
    /// Computes the KDC ports.
    ///
    /// The secondary default is [`KRB5_DEFAULT_SEC_PORT`] only while the
    /// primary port is still [`KRB5_DEFAULT_PORT`]; once an administrator has
    /// moved the primary, port 88 becomes the secondary default. A secondary
    /// equal to the primary is disabled.
    pub fn resolve(services: &dyn ServiceLookup) -> Self {
        let primary = resolve_port(
            services,
            KDC_PORTNAME,
            Transport::Datagram,
            KRB5_DEFAULT_PORT,
        );
        let secondary_default = if primary == KRB5_DEFAULT_PORT {
            KRB5_DEFAULT_SEC_PORT
        } else {
            KRB5_DEFAULT_PORT
        };
        let mut secondary = resolve_port(
            services,
            KDC_SECONDARY_PORTNAME,
            Transport::Datagram,
            secondary_default,
        );
        if secondary == primary {
            secondary = 0;
        }
        Self { primary, secondary }
    }
}
