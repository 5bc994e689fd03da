//! Access to the hierarchical configuration store (the "profile").
//!
//! Values are addressed by a path of key segments, e.g.
//! `["realms", "EXAMPLE.COM", "kdc"]`, and a relation may carry several
//! values.

use std::collections::BTreeMap;

/// Whether DNS may be used to locate KDCs when the profile says nothing.
pub const DEFAULT_LOOKUP_KDC: bool = cfg!(feature = "dns-lookup-kdc");

/// Whether DNS may be used to map hosts to realms when the profile says
/// nothing.
pub const DEFAULT_LOOKUP_REALM: bool = cfg!(feature = "dns-lookup-realm");

/// Errors reported by a [`Profile`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    /// No section exists at the parent of the requested path.
    #[error("profile section not found")]
    NoSection,
    /// The section exists but has no such relation.
    #[error("profile relation not found")]
    NoRelation,
    /// Any other failure of the underlying store.
    #[error("profile lookup failed: {0}")]
    Other(String),
}

/// A hierarchical key-value configuration store.
pub trait Profile: Send + Sync {
    /// Gets every value stored under `path`, in file order.
    ///
    /// A relation that exists but holds no values yields an empty vector.
    fn get_values(&self, path: &[&str]) -> Result<Vec<String>, ProfileError>;

    /// Gets the first value stored under `path`, treating a missing section
    /// or relation as `None`.
    fn get_string(&self, path: &[&str]) -> Result<Option<String>, ProfileError> {
        match self.get_values(path) {
            Ok(values) => Ok(values.into_iter().next()),
            Err(ProfileError::NoSection | ProfileError::NoRelation) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// A [`Profile`] held entirely in memory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryProfile {
    relations: BTreeMap<Vec<String>, Vec<String>>,
}

impl MemoryProfile {
    /// Creates an empty profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `value` to the relation at `path`.
    pub fn add(&mut self, path: &[&str], value: impl ToString) {
        self.relation_mut(path).push(value.to_string());
    }

    /// Appends `value` to the relation at `path`.
    pub fn with(mut self, path: &[&str], value: impl ToString) -> Self {
        self.add(path, value);
        self
    }

    /// Declares the relation at `path` without giving it any values.
    pub fn with_empty(mut self, path: &[&str]) -> Self {
        self.relation_mut(path);
        self
    }

    fn relation_mut(&mut self, path: &[&str]) -> &mut Vec<String> {
        let key = path.iter().map(|segment| segment.to_string()).collect();
        self.relations.entry(key).or_default()
    }
}

impl Profile for MemoryProfile {
    fn get_values(&self, path: &[&str]) -> Result<Vec<String>, ProfileError> {
        let found = self.relations.iter().find(|(key, _)| {
            key.len() == path.len() && key.iter().zip(path).all(|(a, b)| a == b)
        });
        if let Some((_, values)) = found {
            return Ok(values.clone());
        }

        let parent = &path[..path.len().saturating_sub(1)];
        let section_exists = self.relations.keys().any(|key| {
            key.len() > parent.len() && key.iter().zip(parent).all(|(a, b)| a == b)
        });
        if section_exists {
            Err(ProfileError::NoRelation)
        } else {
            Err(ProfileError::NoSection)
        }
    }
}

/// Interprets a profile value as a boolean.
///
/// `y`, `yes`, `true`, `t`, `1` and `on` are true, in any case; everything
/// else is false.
pub fn conf_boolean(value: &str) -> bool {
    const YES: [&str; 6] = ["y", "yes", "true", "t", "1", "on"];
    let value = value.trim();
    YES.iter().any(|yes| value.eq_ignore_ascii_case(yes))
}

fn maybe_use_dns(profile: &dyn Profile, name: &str, default: bool) -> bool {
    let value = match profile.get_string(&["libdefaults", name]) {
        Ok(None) => profile.get_string(&["libdefaults", "dns_fallback"]),
        other => other,
    };
    match value {
        Ok(Some(value)) => conf_boolean(&value),
        Ok(None) => default,
        Err(_e) => {
            #[cfg(feature = "log")]
            tracing::debug!(error = %_e, setting = name, "Cannot read DNS lookup setting");
            default
        }
    }
}

/// Whether KDCs may be located through DNS SRV records.
///
/// Reads `[libdefaults] dns_lookup_kdc`, then `dns_fallback`, then falls back
/// to [`DEFAULT_LOOKUP_KDC`].
pub fn use_dns_kdc(profile: &dyn Profile) -> bool {
    maybe_use_dns(profile, "dns_lookup_kdc", DEFAULT_LOOKUP_KDC)
}

/// Whether realms may be discovered through DNS.
///
/// Reads `[libdefaults] dns_lookup_realm`, then `dns_fallback`, then falls
/// back to [`DEFAULT_LOOKUP_REALM`].
pub fn use_dns_realm(profile: &dyn Profile) -> bool {
    maybe_use_dns(profile, "dns_lookup_realm", DEFAULT_LOOKUP_REALM)
}
