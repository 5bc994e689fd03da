//! Locating the KDCs of a realm.

use super::{Context, Error, ServerRequest};
use crate::port::{KdcPorts, Transport};
use crate::AddressList;

/// Relation under `[realms] REALM` listing the realm's KDCs.
pub const KDC_PROFILE_KEY: &str = "kdc";

/// SRV service label of any KDC.
pub const KDC_SRV_SERVICE: &str = "_kerberos";

/// SRV service label of the primary KDC.
pub const MASTER_KDC_SRV_SERVICE: &str = "_kerberos-master";

/// Builds the request for the KDCs of `realm`, always over UDP.
pub fn kdc_request(realm: &str, masters_only: bool, ports: KdcPorts) -> ServerRequest<'_> {
    ServerRequest {
        realm,
        profile_key: KDC_PROFILE_KEY,
        dns_tag: Some(if masters_only {
            MASTER_KDC_SRV_SERVICE
        } else {
            KDC_SRV_SERVICE
        }),
        transport: Transport::Datagram,
        port: ports.primary,
        secondary_port: ports.secondary,
        masters_only,
    }
}

impl Context {
    /// Locates the KDCs of `realm`, or only its primary KDCs when
    /// `masters_only` is set.
    ///
    /// Ports come from [`KdcPorts::resolve`] over the context's services
    /// database.
    pub fn locate_kdc(&self, realm: &str, masters_only: bool) -> Result<AddressList, Error> {
        let ports = KdcPorts::resolve(self.services());
        self.locate_server(&kdc_request(realm, masters_only, ports))
    }
}
