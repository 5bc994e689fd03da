//! SRV resolution from raw DNS responses.
//!
//! Responses are treated as untrusted input. Anything malformed, truncated
//! or oversized degrades to "no records" instead of failing the lookup, so
//! that the caller still gets a well-defined (if empty) result.

use super::wire::{Cursor, WireError};
use super::{srv_query_name, SrvQuery};
use crate::host::{add_host, HostLookup};
use crate::record::{ServiceRecord, ServiceRecords};
use crate::{AddressList, Error};

/// Size of the fixed DNS message header.
pub const HEADER_SIZE: usize = 12;

const T_SRV: u16 = 33;
const C_IN: u16 = 1;

/// Parses the SRV answers out of a response message.
///
/// Answers of other types or classes are skipped. Any bounds violation
/// discards everything parsed so far and yields no records.
pub fn parse_srv_response(msg: &[u8]) -> ServiceRecords {
    match parse_records(msg) {
        Ok(records) => records,
        Err(_e) => {
            #[cfg(feature = "log")]
            tracing::trace!(error = %_e, len = msg.len(), "Discarding malformed SRV response");
            ServiceRecords::new()
        }
    }
}

fn parse_records(msg: &[u8]) -> Result<ServiceRecords, WireError> {
    let mut cursor = Cursor::new(msg);

    // ID and flags, then the four section counts.
    cursor.skip(4)?;
    let questions = cursor.read_u16()?;
    let answers = cursor.read_u16()?;
    cursor.skip(4)?;

    for _ in 0..questions {
        cursor.skip_name()?;
        // QTYPE and QCLASS
        cursor.skip(4)?;
    }

    let mut records = ServiceRecords::new();
    for _ in 0..answers {
        cursor.skip_name()?;
        let rtype = cursor.read_u16()?;
        let class = cursor.read_u16()?;
        // TTL
        cursor.skip(4)?;
        let rdlen = cursor.read_u16()? as usize;

        // CNAMEs are followed by the records they point at, so anything
        // other than IN SRV can simply be stepped over.
        if class != C_IN || rtype != T_SRV {
            cursor.skip(rdlen)?;
            continue;
        }

        let rdata_end = cursor.position() + rdlen;
        let priority = cursor.read_u16()?;
        let weight = cursor.read_u16()?;
        let port = cursor.read_u16()?;
        let target = cursor.read_name()?;
        cursor.advance_to(rdata_end)?;

        records.insert(ServiceRecord {
            priority,
            weight,
            port,
            target,
        });
    }

    Ok(records)
}

/// Locates servers through DNS SRV records.
pub struct DnsSrvResolver<'a> {
    query: &'a dyn SrvQuery,
    hosts: &'a dyn HostLookup,
}

impl<'a> DnsSrvResolver<'a> {
    /// Creates a resolver sending queries through `query` and resolving
    /// record targets through `hosts`.
    pub fn new(query: &'a dyn SrvQuery, hosts: &'a dyn HostLookup) -> Self {
        Self { query, hosts }
    }

    /// Looks up `service.protocol.realm.` and appends the addresses of every
    /// record target, in priority order, to `list`.
    ///
    /// Returns the number of addresses appended. Query failures and bad
    /// responses append nothing and are not errors; a failing host lookup
    /// stops the walk and is returned, leaving earlier addresses in `list`.
    pub fn resolve(
        &self,
        realm: &str,
        service: &str,
        protocol: &str,
        list: &mut AddressList,
    ) -> Result<usize, Error> {
        let Some(name) = srv_query_name(service, protocol, realm) else {
            #[cfg(feature = "log")]
            tracing::debug!(realm, service, protocol, "SRV query name too long");
            return Ok(0);
        };

        #[cfg(feature = "log")]
        tracing::debug!(%name, "Sending SRV query");

        let response = match self.query.query_srv(&name) {
            Ok(response) => response,
            Err(_e) => {
                #[cfg(feature = "log")]
                tracing::debug!(%name, error = %_e, "SRV query failed");
                return Ok(0);
            }
        };
        if response.len() < HEADER_SIZE {
            return Ok(0);
        }

        let records = parse_srv_response(&response);
        let mut added = 0;
        for record in records {
            #[cfg(feature = "log")]
            tracing::trace!(
                host = %record.target,
                port = record.port,
                priority = record.priority,
                "Resolving SRV target"
            );

            // RFC 2782: a target of "." means the service is not offered.
            if record.target == "." {
                continue;
            }
            added += add_host(list, self.hosts, &record.target, record.port, 0)?;
        }
        Ok(added)
    }
}
