#![deny(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

/*!
Locates the Kerberos KDCs serving a realm.

# Introduction

A client talking to a realm first has to find out which servers answer for
it. Two sources are consulted, in a fixed order:

1. The profile (`krb5.conf`), under `[realms] REALM = { kdc = host[:port] }`.
2. DNS SRV records, as defined in [RFC 2782](https://tools.ietf.org/html/rfc2782),
   of the form

   `_kerberos._udp.REALM. TTL IN SRV Priority Weight Port Target`

DNS is only consulted when the profile lookup *fails* (for instance because
the realm has no `[realms]` entry) and DNS lookups are enabled through
`[libdefaults] dns_lookup_kdc` or `dns_fallback`. SRV records are ordered by
ascending priority; records of equal priority keep the order in which the
DNS server returned them, and weights are never used to reorder them.

[`Context::locate_kdc`] returns the candidate addresses in the order they
should be tried, or an [`Error`] when nothing usable was found. An empty
result is never returned as a success.

# Capabilities

Everything that touches the outside world is reached through a trait, so the
locator itself holds no global state:

- [`Profile`] reads values from the configuration store.
- [`HostLookup`] turns host names into addresses.
- [`ServiceLookup`] maps service names to port numbers.
- [`SrvQuery`] sends a SRV query and returns the raw response.

The default [`Context`] uses [`SystemHostLookup`] and [`ServicesFile`]. It
sends SRV queries through the system nameserver only when a SRV backend is
compiled in. Backends built on `hickory` are enabled by the following
features:

- `hickory` (via [`resolver::hickory::HickorySrvQuery`] and
  [`resolver::hickory::HickoryHostLookup`])

[`SrvQuery`]: resolver::SrvQuery
*/

mod addrlist;
pub use addrlist::AddressList;

mod host;
pub use host::{HostLookup, LookupError, SystemHostLookup};

mod locator;
pub use locator::{
    kdc, locate_kdc, locate_server, ConfigOutcome, ConfigResolver, Context, Error, ServerRequest,
    ADMIN_SERVER_KEY,
};

pub mod port;
pub use port::{KdcPorts, ServiceLookup, ServicesFile, Transport};

pub mod profile;
pub use profile::{MemoryProfile, Profile, ProfileError};

mod record;
pub use record::{ServiceRecord, ServiceRecords, SrvRecord};

pub mod resolver;

#[cfg(test)]
mod test_utils;
