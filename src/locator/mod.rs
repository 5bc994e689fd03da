//! Locating the servers of a realm.

use crate::port::{ServiceLookup, ServicesFile, Transport};
use crate::profile::{use_dns_kdc, Profile, ProfileError};
use crate::resolver::{DnsSrvResolver, SrvQuery};
use crate::{AddressList, HostLookup, LookupError, SystemHostLookup};
use std::io;

mod config;
pub use config::{ConfigOutcome, ConfigResolver, ADMIN_SERVER_KEY};

/// Locating KDCs.
pub mod kdc;

/// Errors encountered while locating servers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The profile has no entry for the realm or service.
    #[error("cannot find KDC for requested realm")]
    RealmUnknown,
    /// A profile entry carries a port that is not a number in `0..=65535`.
    #[error("invalid port {0:?} in profile entry")]
    InvalidPort(String),
    /// Every source was consulted and none produced an address.
    #[error("cannot resolve network address for KDC in requested realm")]
    CannotResolve,
    /// Storage for the address list could not be allocated.
    #[error("out of memory")]
    OutOfMemory,
    /// A host lookup failed, but may succeed if retried.
    #[error("temporary failure in name resolution")]
    TemporaryFailure,
    /// A host lookup rejected its input.
    #[error("invalid host name")]
    InvalidInput,
    /// The profile could not be read.
    #[error("profile lookup error")]
    Profile(#[source] ProfileError),
    /// A host lookup failed for another reason.
    #[error("host lookup error")]
    Lookup(#[source] io::Error),
}

impl From<LookupError> for Error {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::InvalidInput => Error::InvalidInput,
            LookupError::TemporaryFailure => Error::TemporaryFailure,
            LookupError::OutOfMemory => Error::OutOfMemory,
            // Callers turn NoData into "zero addresses" before it gets here.
            LookupError::NoData => Error::CannotResolve,
            LookupError::Io(e) => Error::Lookup(e),
        }
    }
}

/// What to locate: one realm/service pair and the ports to use for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ServerRequest<'a> {
    /// Realm whose servers are wanted.
    pub realm: &'a str,
    /// Relation under `[realms] REALM` listing the servers, e.g. `kdc`.
    pub profile_key: &'a str,
    /// SRV service label, e.g. `_kerberos`; `None` disables DNS.
    pub dns_tag: Option<&'a str>,
    /// Transport used to talk to the servers.
    pub transport: Transport,
    /// Port for profile entries without an explicit port.
    pub port: u16,
    /// Second port tried on profile entries without an explicit port; `0`
    /// disables it. Never applied to DNS results.
    pub secondary_port: u16,
    /// Only keep profile entries that are also listed as `admin_server`.
    pub masters_only: bool,
}

/// The capabilities and settings used to locate servers.
///
/// A context holds no per-lookup state and can be shared between threads.
///
/// # Usage
///
/// ```ignore
/// let profile = MemoryProfile::new()
///     .with(&["realms", "EXAMPLE.COM", "kdc"], "kdc1.example.com:88");
/// let kdcs = Context::new(profile).locate_kdc("EXAMPLE.COM", false)?;
/// ```
pub struct Context {
    profile: Box<dyn Profile>,
    hosts: Box<dyn HostLookup>,
    services: Box<dyn ServiceLookup>,
    srv: Option<Box<dyn SrvQuery>>,
    fallback_on_empty_config: bool,
}

impl Context {
    /// Creates a context reading `profile`, resolving hosts through the
    /// operating system and ports through `/etc/services`.
    ///
    /// With the `hickory` feature, SRV queries go to the first nameserver of
    /// the system resolver configuration. Without it, or if that
    /// configuration cannot be read, DNS SRV lookups stay off until
    /// [`Context::srv_query`] sets a backend.
    pub fn new(profile: impl Profile + 'static) -> Self {
        Self {
            profile: Box::new(profile),
            hosts: Box::new(SystemHostLookup),
            services: Box::new(ServicesFile::system()),
            srv: system_srv_query(),
            fallback_on_empty_config: false,
        }
    }

    /// Sets the profile of the context.
    pub fn profile(self, profile: impl Profile + 'static) -> Self {
        Self {
            profile: Box::new(profile),
            ..self
        }
    }

    /// Sets the host lookup of the context.
    pub fn host_lookup(self, hosts: impl HostLookup + 'static) -> Self {
        Self {
            hosts: Box::new(hosts),
            ..self
        }
    }

    /// Sets the services database of the context.
    pub fn service_lookup(self, services: impl ServiceLookup + 'static) -> Self {
        Self {
            services: Box::new(services),
            ..self
        }
    }

    /// Enables DNS SRV lookups through `srv`.
    pub fn srv_query(self, srv: impl SrvQuery + 'static) -> Self {
        Self {
            srv: Some(Box::new(srv)),
            ..self
        }
    }

    /// Disables DNS SRV lookups.
    pub fn without_srv_query(self) -> Self {
        Self { srv: None, ..self }
    }

    /// Whether a realm whose profile relation exists but lists no servers
    /// falls back to DNS. Off by default: only a failed profile lookup does.
    pub fn fallback_on_empty_config(self, fallback_on_empty_config: bool) -> Self {
        Self {
            fallback_on_empty_config,
            ..self
        }
    }

    pub(crate) fn services(&self) -> &dyn ServiceLookup {
        &*self.services
    }

    /// Locates the servers described by `request`.
    ///
    /// The profile is always consulted first. DNS is only tried when that
    /// fails (or, if enabled, finds an empty relation), a DNS tag was given,
    /// a SRV backend is configured, and `dns_lookup_kdc` allows it. DNS
    /// results are appended to the same list.
    ///
    /// Never returns an empty list: finding nothing is
    /// [`Error::CannotResolve`].
    pub fn locate_server(&self, request: &ServerRequest<'_>) -> Result<AddressList, Error> {
        #[cfg(feature = "log")]
        tracing::debug!(
            realm = request.realm,
            key = request.profile_key,
            port = request.port,
            secondary_port = request.secondary_port,
            masters_only = request.masters_only,
            "Looking up servers in profile"
        );

        let mut list = AddressList::new();
        let config = ConfigResolver::new(&*self.profile, &*self.hosts).resolve(request, &mut list);

        let fallback = match &config {
            Err(_e) => {
                #[cfg(feature = "log")]
                tracing::debug!(error = %_e, "Profile lookup failed");
                true
            }
            Ok(ConfigOutcome::Empty) => self.fallback_on_empty_config,
            Ok(ConfigOutcome::Found { .. }) => false,
        };

        let mut outcome = config.map(|_| ());
        if fallback {
            if let Some(dns) = self.dns_fallback(request, &mut list) {
                outcome = dns.map(|_| ());
            }
        }

        if let Err(err) = outcome {
            list.release();
            return Err(err);
        }
        if list.is_empty() {
            #[cfg(feature = "log")]
            tracing::debug!(realm = request.realm, "No usable servers");
            return Err(Error::CannotResolve);
        }

        #[cfg(feature = "log")]
        tracing::debug!(realm = request.realm, count = list.len(), "Located servers");
        Ok(list)
    }

    /// Runs the SRV lookup for `request`, or returns `None` when DNS is not
    /// to be used.
    fn dns_fallback(
        &self,
        request: &ServerRequest<'_>,
        list: &mut AddressList,
    ) -> Option<Result<usize, Error>> {
        let service = request.dns_tag?;
        let Some(srv) = &self.srv else {
            #[cfg(feature = "log")]
            tracing::trace!("No SRV backend configured");
            return None;
        };
        if !use_dns_kdc(&*self.profile) {
            #[cfg(feature = "log")]
            tracing::debug!("DNS lookup of KDCs is disabled");
            return None;
        }

        // Anything the profile path added before failing is not kept.
        list.release();
        let resolver = DnsSrvResolver::new(&**srv, &*self.hosts);
        Some(resolver.resolve(
            request.realm,
            service,
            request.transport.srv_label(),
            list,
        ))
    }
}

#[cfg(feature = "hickory")]
fn system_srv_query() -> Option<Box<dyn SrvQuery>> {
    match crate::resolver::hickory::HickorySrvQuery::from_system_conf() {
        Ok(query) => Some(Box::new(query)),
        Err(_e) => {
            #[cfg(feature = "log")]
            tracing::debug!(error = %_e, "Cannot read system resolver configuration");
            None
        }
    }
}

#[cfg(not(feature = "hickory"))]
fn system_srv_query() -> Option<Box<dyn SrvQuery>> {
    None
}

/// Locates the servers described by `request`. See [`Context::locate_server`].
pub fn locate_server(context: &Context, request: &ServerRequest<'_>) -> Result<AddressList, Error> {
    context.locate_server(request)
}

/// Locates the KDCs of `realm`. See [`Context::locate_kdc`].
pub fn locate_kdc(context: &Context, realm: &str, masters_only: bool) -> Result<AddressList, Error> {
    context.locate_kdc(realm, masters_only)
}
