//! Owned lists of discovered server addresses.

use crate::Error;
use std::net::SocketAddr;

/// Addresses of the servers discovered for a realm, in discovery order.
///
/// Nothing is deduplicated: a host listed twice in the profile, or reachable
/// through both the profile and DNS, shows up twice.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AddressList {
    addrs: Vec<SocketAddr>,
}

impl AddressList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an address to the end of the list.
    ///
    /// Storage grows geometrically. If it cannot grow, [`Error::OutOfMemory`]
    /// is returned and the list is left as it was.
    pub fn append(&mut self, addr: SocketAddr) -> Result<(), Error> {
        if self.addrs.len() == self.addrs.capacity() {
            let additional = self.addrs.capacity().max(4);
            self.addrs
                .try_reserve(additional)
                .map_err(|_| Error::OutOfMemory)?;
        }
        self.addrs.push(addr);
        Ok(())
    }

    /// Drops every address and the backing storage.
    pub fn release(&mut self) {
        self.addrs = Vec::new();
    }

    /// Moves the addresses out, leaving this list empty.
    pub fn take(&mut self) -> AddressList {
        std::mem::take(self)
    }

    /// Number of addresses in the list.
    pub fn len(&self) -> usize {
        self.addrs.len()
    }

    /// Whether the list holds no addresses.
    pub fn is_empty(&self) -> bool {
        self.addrs.is_empty()
    }

    /// Iterates over the addresses in discovery order.
    pub fn iter(&self) -> std::slice::Iter<'_, SocketAddr> {
        self.addrs.iter()
    }

    /// The addresses as a slice.
    pub fn as_slice(&self) -> &[SocketAddr] {
        &self.addrs
    }

    /// Converts the list into a plain vector.
    pub fn into_vec(self) -> Vec<SocketAddr> {
        self.addrs
    }
}

impl IntoIterator for AddressList {
    type Item = SocketAddr;
    type IntoIter = std::vec::IntoIter<SocketAddr>;

    fn into_iter(self) -> Self::IntoIter {
        self.addrs.into_iter()
    }
}

impl<'a> IntoIterator for &'a AddressList {
    type Item = &'a SocketAddr;
    type IntoIter = std::slice::Iter<'a, SocketAddr>;

    fn into_iter(self) -> Self::IntoIter {
        self.addrs.iter()
    }
}
