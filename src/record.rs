//! SRV records.

use std::fmt::Display;

/// Representation of types that contain the fields of a SRV record.
pub trait SrvRecord {
    /// Type representing the SRV record's target. Must implement `Display` so
    /// it can be handed to a host lookup.
    type Target: Display + ?Sized;

    /// Gets a SRV record's target.
    fn target(&self) -> &Self::Target;

    /// Gets a SRV record's port.
    fn port(&self) -> u16;

    /// Gets a SRV record's priority.
    fn priority(&self) -> u16;

    /// Gets a SRV record's weight.
    fn weight(&self) -> u16;
}

/// A SRV record parsed from a DNS response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceRecord {
    /// Lower values are preferred.
    pub priority: u16,
    /// Recorded but never used for ordering.
    pub weight: u16,
    /// Port the service listens on.
    pub port: u16,
    /// Host providing the service, without a trailing dot.
    pub target: String,
}

impl SrvRecord for ServiceRecord {
    type Target = str;

    fn target(&self) -> &Self::Target {
        &self.target
    }

    fn port(&self) -> u16 {
        self.port
    }

    fn priority(&self) -> u16 {
        self.priority
    }

    fn weight(&self) -> u16 {
        self.weight
    }
}

/// SRV records kept in ascending priority order.
///
/// Records of equal priority stay in insertion order. Weights are not
/// consulted, so the order is deterministic for a given response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceRecords<R = ServiceRecord> {
    records: Vec<R>,
}

impl<R> Default for ServiceRecords<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<R: SrvRecord> ServiceRecords<R> {
    /// Creates an empty set of records.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `record` after every record of lower or equal priority.
    pub fn insert(&mut self, record: R) {
        let at = self
            .records
            .partition_point(|existing| existing.priority() <= record.priority());
        self.records.insert(at, record);
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether there are no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over the records in priority order.
    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }
}

impl<R> IntoIterator for ServiceRecords<R> {
    type Item = R;
    type IntoIter = std::vec::IntoIter<R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<R: SrvRecord> FromIterator<R> for ServiceRecords<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        let mut records = Self::new();
        for record in iter {
            records.insert(record);
        }
        records
    }
}
