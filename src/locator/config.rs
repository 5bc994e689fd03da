//! Servers listed in the profile.

use super::{Error, ServerRequest};
use crate::host::{add_host, HostLookup};
use crate::profile::{Profile, ProfileError};
use crate::AddressList;

/// Relation under `[realms] REALM` naming the realm's primary (admin) hosts.
pub const ADMIN_SERVER_KEY: &str = "admin_server";

/// Result of a successful profile lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigOutcome {
    /// The relation exists but lists no servers.
    Empty,
    /// The relation lists servers; `added` addresses were appended. This may
    /// be zero if no listed host resolved or none passed the masters filter.
    Found {
        /// Number of addresses appended.
        added: usize,
    },
}

/// Locates servers from `[realms] REALM = { key = host[:port] }` entries.
pub struct ConfigResolver<'a> {
    profile: &'a dyn Profile,
    hosts: &'a dyn HostLookup,
}

impl<'a> ConfigResolver<'a> {
    /// Creates a resolver reading `profile` and resolving hosts through
    /// `hosts`.
    pub fn new(profile: &'a dyn Profile, hosts: &'a dyn HostLookup) -> Self {
        Self { profile, hosts }
    }

    /// Appends the addresses of every server listed for `request` to `list`.
    ///
    /// A missing realm section or relation is [`Error::RealmUnknown`]. An
    /// entry with an explicit port uses only that port; other entries use
    /// the request's port and secondary port. Any failing entry aborts the
    /// whole lookup and empties `list`.
    pub fn resolve(
        &self,
        request: &ServerRequest<'_>,
        list: &mut AddressList,
    ) -> Result<ConfigOutcome, Error> {
        let result = self.resolve_entries(request, list);
        if result.is_err() {
            list.release();
        }
        result
    }

    fn resolve_entries(
        &self,
        request: &ServerRequest<'_>,
        list: &mut AddressList,
    ) -> Result<ConfigOutcome, Error> {
        let entries = self
            .profile
            .get_values(&["realms", request.realm, request.profile_key])
            .map_err(|e| match e {
                ProfileError::NoSection | ProfileError::NoRelation => Error::RealmUnknown,
                e => Error::Profile(e),
            })?;
        if entries.is_empty() {
            return Ok(ConfigOutcome::Empty);
        }

        let masters = request
            .masters_only
            .then(|| self.primary_servers(request.realm));

        let mut added = 0;
        for entry in &entries {
            let (host, port) = split_host_port(strip_annotation(entry));

            if let Some(masters) = &masters {
                if !masters.iter().any(|m| m.eq_ignore_ascii_case(host)) {
                    #[cfg(feature = "log")]
                    tracing::trace!(host, "Skipping non-primary server");
                    continue;
                }
            }

            let (port, secondary_port) = match port {
                Some(port) => (parse_port(port)?, 0),
                None => (request.port, request.secondary_port),
            };
            added += add_host(list, self.hosts, host, port, secondary_port)?;
        }

        Ok(ConfigOutcome::Found { added })
    }

    /// Host names listed as `admin_server` for `realm`. Any lookup failure
    /// yields an empty list, so nothing passes the masters filter.
    fn primary_servers(&self, realm: &str) -> Vec<String> {
        match self.profile.get_values(&["realms", realm, ADMIN_SERVER_KEY]) {
            Ok(values) => values
                .iter()
                .map(|value| split_host_port(strip_annotation(value)).0.to_owned())
                .collect(),
            Err(_e) => {
                #[cfg(feature = "log")]
                tracing::debug!(realm, error = %_e, "No admin_server entries");
                Vec::new()
            }
        }
    }
}

/// Drops anything from the first space or tab on.
fn strip_annotation(entry: &str) -> &str {
    let entry = entry.trim_start();
    match entry.find([' ', '\t']) {
        Some(end) => &entry[..end],
        None => entry,
    }
}

/// Splits `host[:port]`, or `[address][:port]` for IPv6 literals.
fn split_host_port(entry: &str) -> (&str, Option<&str>) {
    if let Some(rest) = entry.strip_prefix('[') {
        if let Some((host, tail)) = rest.split_once(']') {
            return (host, tail.strip_prefix(':'));
        }
    }
    match entry.split_once(':') {
        Some((host, port)) => (host, Some(port)),
        None => (entry, None),
    }
}

fn parse_port(port: &str) -> Result<u16, Error> {
    port.parse()
        .map_err(|_| Error::InvalidPort(port.to_owned()))
}
