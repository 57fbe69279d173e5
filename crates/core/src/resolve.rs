//! Target type resolution
//!
//! Maps a container kind to the single type its elements must conform to.
//!
//! ## Algorithm
//!
//! 1. Take the kind's simple name (last path segment, no generics)
//! 2. Without the marker prefix, only the override can resolve the kind;
//!    otherwise the kind name is invalid
//! 3. Remove the marker to get the candidate type name
//! 4. A registered candidate is the target (name-derived)
//! 5. Else a registered override is the target
//! 6. Else the kind is unresolvable
//!
//! Resolution reads the type table and nothing else, so it is safe to
//! repeat and safe to memoize.

use crate::config::TypedArrayConfig;
use crate::error::{Error, Result};
use crate::kind::KindName;
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Which strategy produced a target type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionSource {
    /// Kind name with the marker removed
    NameDerived,
    /// The kind's explicit override
    Override,
}

/// What a registered name denotes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    /// Exactly one Rust type
    Concrete(TypeId),
    /// Any type registered as an implementor of the capability
    Capability,
}

/// Name lookup used during resolution
///
/// Implemented by [`TypeDirectory`](crate::TypeDirectory); tests can
/// supply a plain map.
pub trait TypeLookup {
    /// What `name` denotes, if it is registered
    fn lookup_kind(&self, name: &str) -> Option<TargetKind>;
}

impl TypeLookup for HashMap<String, TargetKind> {
    fn lookup_kind(&self, name: &str) -> Option<TargetKind> {
        self.get(name).copied()
    }
}

/// The resolved element type of a container kind
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetType {
    name: Arc<str>,
    kind: TargetKind,
    source: ResolutionSource,
}

impl TargetType {
    /// Construct a target type
    pub fn new(name: impl Into<Arc<str>>, kind: TargetKind, source: ResolutionSource) -> Self {
        TargetType {
            name: name.into(),
            kind,
            source,
        }
    }

    /// Registered name of the target
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Concrete type or capability
    #[inline]
    pub fn kind(&self) -> TargetKind {
        self.kind
    }

    /// Strategy that produced this target
    #[inline]
    pub fn source(&self) -> ResolutionSource {
        self.source
    }

    /// `TypeId` of a concrete target
    pub fn type_id(&self) -> Option<TypeId> {
        match self.kind {
            TargetKind::Concrete(id) => Some(id),
            TargetKind::Capability => None,
        }
    }

    /// True if the target is a capability
    pub fn is_capability(&self) -> bool {
        matches!(self.kind, TargetKind::Capability)
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Resolve the target type of a kind
///
/// # Errors
///
/// - `InvalidKindName` if the simple name lacks the marker and the override
///   is absent or unregistered
/// - `UnresolvableTargetType` if the marker is present but neither the
///   candidate nor the override is registered
pub fn resolve(
    kind: &KindName,
    override_name: Option<&str>,
    config: &TypedArrayConfig,
    types: &impl TypeLookup,
) -> Result<TargetType> {
    let by_override = || {
        override_name.and_then(|name| {
            types
                .lookup_kind(name)
                .map(|k| TargetType::new(name, k, ResolutionSource::Override))
        })
    };

    let simple = kind.simple();
    if !simple.starts_with(config.marker.as_str()) {
        return by_override().ok_or_else(|| Error::InvalidKindName {
            kind: kind.qualified().to_string(),
            marker: config.marker.clone(),
        });
    }

    let candidate = config.strip_mode.strip(simple, &config.marker);
    if !candidate.is_empty() {
        if let Some(k) = types.lookup_kind(&candidate) {
            return Ok(TargetType::new(
                candidate.as_ref(),
                k,
                ResolutionSource::NameDerived,
            ));
        }
    }

    by_override().ok_or_else(|| Error::UnresolvableTargetType {
        kind: kind.qualified().to_string(),
        candidate: candidate.into_owned(),
        override_name: override_name.map(str::to_string),
    })
}
