//! SRV resolvers.

pub mod dns;
mod wire;

#[cfg(feature = "hickory")]
pub mod hickory;

pub use dns::DnsSrvResolver;

/// Errors a [`SrvQuery`] may report. They are logged, never surfaced.
pub type QueryError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Longest SRV query name that will be sent.
pub const MAX_DNS_NAMELEN: usize = 15 * (64 + 1) + 1;

/// Represents the ability to send a SRV query.
pub trait SrvQuery: Send + Sync {
    /// Sends an `IN SRV` query for the fully-qualified `name` and returns the
    /// raw response message.
    fn query_srv(&self, name: &str) -> Result<Vec<u8>, QueryError>;
}

impl<T: SrvQuery + ?Sized> SrvQuery for std::sync::Arc<T> {
    fn query_srv(&self, name: &str) -> Result<Vec<u8>, QueryError> {
        (**self).query_srv(name)
    }
}

/// Builds the query name `service.protocol.realm.`.
///
/// The trailing dot keeps the system resolver from appending its search
/// domains: realm names are absolute. Returns `None` when the name would be
/// longer than [`MAX_DNS_NAMELEN`].
pub fn srv_query_name(service: &str, protocol: &str, realm: &str) -> Option<String> {
    if service.len() + protocol.len() + realm.len() + 6 > MAX_DNS_NAMELEN {
        return None;
    }
    let mut name = format!("{service}.{protocol}.{realm}");
    if !name.ends_with('.') {
        name.push('.');
    }
    Some(name)
}
