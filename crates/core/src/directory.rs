//! Type directory
//!
//! The explicit registry every typed array resolves and validates against.
//! It replaces ambient "does a type with this name exist" queries with a
//! value the caller builds and passes in.
//!
//! The directory holds:
//! - **Types**: a name bound to one Rust type
//! - **Capabilities**: a name bound to a set of implementing types
//! - **Decoders**: JSON decoders keyed by Rust type, shared by every alias
//! - **Resolutions**: memoized kind -> target type results
//!
//! # Thread Safety
//!
//! All tables are `DashMap`s, so an `Arc<TypeDirectory>` can be shared
//! across threads. Every registration bumps a generation counter before it
//! clears the resolution cache; a resolution computed under an older
//! generation is returned to its caller but never cached.

use crate::config::TypedArrayConfig;
use crate::element::Element;
use crate::error::{Error, Result};
use crate::kind::{ContainerKind, KindName};
use crate::resolve::{self, TargetKind, TargetType, TypeLookup};
use dashmap::mapref::entry::Entry as MapEntry;
use dashmap::DashMap;
use serde::de::DeserializeOwned;
use std::any::TypeId;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace, warn};

/// Decodes an untyped JSON value into a concrete element
pub type Decoder = fn(serde_json::Value) -> serde_json::Result<Box<dyn Element>>;

fn decode_as<T: Element + DeserializeOwned>(
    value: serde_json::Value,
) -> serde_json::Result<Box<dyn Element>> {
    Ok(Box::new(serde_json::from_value::<T>(value)?))
}

#[derive(Debug, Clone)]
enum Entry {
    Type {
        type_id: TypeId,
        rust_name: &'static str,
    },
    Capability {
        implementors: HashSet<TypeId>,
    },
}

/// Registry of element types and capabilities
#[derive(Debug)]
pub struct TypeDirectory {
    config: TypedArrayConfig,
    names: DashMap<String, Entry>,
    names_by_id: DashMap<TypeId, String>,
    decoders: DashMap<TypeId, Decoder>,
    resolutions: DashMap<TypeId, TargetType>,
    generation: AtomicU64,
}

impl Default for TypeDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeDirectory {
    /// Empty directory with the default config
    pub fn new() -> Self {
        TypeDirectory {
            config: TypedArrayConfig::default(),
            names: DashMap::new(),
            names_by_id: DashMap::new(),
            decoders: DashMap::new(),
            resolutions: DashMap::new(),
            generation: AtomicU64::new(0),
        }
    }

    /// Empty directory with a custom config
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the config fails validation.
    pub fn with_config(config: TypedArrayConfig) -> Result<Self> {
        config.validate()?;
        Ok(TypeDirectory {
            config,
            ..Self::new()
        })
    }

    /// Active configuration
    pub fn config(&self) -> &TypedArrayConfig {
        &self.config
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Bind `name` to the Rust type `T`
    ///
    /// Registering the same name for the same type again is a no-op. A type
    /// may be registered under several names; the first one is used when
    /// describing values in errors.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateTypeName` if `name` is bound to another type or to
    /// a capability.
    pub fn register<T: Element>(&self, name: impl Into<String>) -> Result<()> {
        self.insert_type::<T>(name.into(), None)
    }

    /// Bind `name` to `T` and allow JSON ingestion of it
    ///
    /// The decoder belongs to `T`, so every name `T` is registered under
    /// becomes decodable. Upgrades an existing plain registration.
    pub fn register_decodable<T: Element + DeserializeOwned>(
        &self,
        name: impl Into<String>,
    ) -> Result<()> {
        self.insert_type::<T>(name.into(), Some(decode_as::<T> as Decoder))
    }

    fn insert_type<T: Element>(&self, name: String, decoder: Option<Decoder>) -> Result<()> {
        let type_id = TypeId::of::<T>();
        let inserted = match self.names.entry(name.clone()) {
            MapEntry::Occupied(occupied) => match occupied.get() {
                Entry::Type {
                    type_id: existing, ..
                } if *existing == type_id => false,
                _ => return Err(Error::DuplicateTypeName { name }),
            },
            MapEntry::Vacant(vacant) => {
                vacant.insert(Entry::Type {
                    type_id,
                    rust_name: std::any::type_name::<T>(),
                });
                true
            }
        };
        if let Some(decoder) = decoder {
            self.decoders.entry(type_id).or_insert(decoder);
        }
        if !inserted {
            return Ok(());
        }
        self.names_by_id
            .entry(type_id)
            .or_insert_with(|| name.clone());
        self.invalidate();
        debug!(
            name = %name,
            rust_type = std::any::type_name::<T>(),
            decodable = decoder.is_some(),
            "Registered element type"
        );
        Ok(())
    }

    /// Declare a capability that registered types can implement
    ///
    /// # Errors
    ///
    /// Returns `DuplicateTypeName` if `name` is already a type.
    pub fn declare_capability(&self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        match self.names.entry(name.clone()) {
            MapEntry::Occupied(occupied) => match occupied.get() {
                Entry::Capability { .. } => return Ok(()),
                Entry::Type { .. } => return Err(Error::DuplicateTypeName { name }),
            },
            MapEntry::Vacant(vacant) => {
                vacant.insert(Entry::Capability {
                    implementors: HashSet::new(),
                });
            }
        }
        self.invalidate();
        debug!(name = %name, "Declared capability");
        Ok(())
    }

    /// Record that `T` satisfies `capability`
    ///
    /// # Errors
    ///
    /// Returns `UnknownType` if the capability is not declared or `T` is not
    /// registered.
    pub fn implement<T: Element>(&self, capability: &str) -> Result<()> {
        let type_id = TypeId::of::<T>();
        if !self.names_by_id.contains_key(&type_id) {
            return Err(Error::UnknownType {
                name: std::any::type_name::<T>().to_string(),
            });
        }
        match self.names.get_mut(capability).as_deref_mut() {
            Some(Entry::Capability { implementors }) => {
                implementors.insert(type_id);
            }
            _ => {
                return Err(Error::UnknownType {
                    name: capability.to_string(),
                })
            }
        }
        debug!(
            capability = capability,
            rust_type = std::any::type_name::<T>(),
            "Registered capability implementor"
        );
        Ok(())
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// What `name` denotes, if registered
    pub fn lookup(&self, name: &str) -> Option<TargetKind> {
        self.names.get(name).map(|entry| match entry.value() {
            Entry::Type { type_id, .. } => TargetKind::Concrete(*type_id),
            Entry::Capability { .. } => TargetKind::Capability,
        })
    }

    /// True if `name` is a registered type or capability
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Number of registered names
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// First name `type_id` was registered under
    pub fn name_of(&self, type_id: TypeId) -> Option<String> {
        self.names_by_id.get(&type_id).map(|name| name.value().clone())
    }

    /// Rust type name behind a registered type name
    pub fn rust_name(&self, name: &str) -> Option<&'static str> {
        self.names.get(name).and_then(|entry| match entry.value() {
            Entry::Type { rust_name, .. } => Some(*rust_name),
            Entry::Capability { .. } => None,
        })
    }

    /// True if `type_id` is a registered implementor of `capability`
    pub fn implements(&self, capability: &str, type_id: TypeId) -> bool {
        self.names
            .get(capability)
            .map(|entry| match entry.value() {
                Entry::Capability { implementors } => implementors.contains(&type_id),
                Entry::Type { .. } => false,
            })
            .unwrap_or(false)
    }

    /// True if a value of type `type_id` conforms to `target`
    pub fn conforms_type(&self, target: &TargetType, type_id: TypeId) -> bool {
        match target.kind() {
            TargetKind::Concrete(expected) => expected == type_id,
            TargetKind::Capability => self.implements(target.name(), type_id),
        }
    }

    /// True if `value` conforms to `target`
    pub fn conforms(&self, target: &TargetType, value: &dyn Element) -> bool {
        self.conforms_type(target, value.concrete_type_id())
    }

    /// Human-readable type of a value: its registered name, else its Rust name
    pub fn describe(&self, value: &dyn Element) -> String {
        self.name_of(value.concrete_type_id())
            .unwrap_or_else(|| value.element_type_name().to_string())
    }

    /// JSON decoder for a Rust type, whichever name it was registered under
    pub(crate) fn decoder(&self, type_id: TypeId) -> Option<Decoder> {
        self.decoders.get(&type_id).map(|decoder| *decoder.value())
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    /// Resolve the target type of kind `K`, memoized per kind
    ///
    /// # Errors
    ///
    /// `InvalidKindName` or `UnresolvableTargetType`; see [`resolve::resolve`].
    pub fn resolve<K: ContainerKind>(&self) -> Result<TargetType> {
        let key = TypeId::of::<K>();
        if !self.config.cache_resolutions {
            return self.resolve_uncached(&KindName::of::<K>(), K::target_type_override());
        }
        if let Some(hit) = self.resolutions.get(&key) {
            trace!(kind = K::kind_name(), target = %hit.value(), "Resolution cache hit");
            return Ok(hit.value().clone());
        }

        let generation = self.generation.load(Ordering::SeqCst);
        let target = self.resolve_uncached(&KindName::of::<K>(), K::target_type_override())?;
        // The entry guard holds the shard lock, so a concurrent clear lands
        // either before the check or after the insert.
        let entry = self.resolutions.entry(key);
        if self.generation.load(Ordering::SeqCst) == generation {
            entry.or_insert_with(|| target.clone());
        } else {
            trace!(kind = K::kind_name(), "Directory changed during resolution, not caching");
        }
        Ok(target)
    }

    /// Resolve a kind identity without touching the cache
    pub fn resolve_uncached(
        &self,
        kind: &KindName,
        override_name: Option<&str>,
    ) -> Result<TargetType> {
        match resolve::resolve(kind, override_name, &self.config, self) {
            Ok(target) => {
                debug!(
                    kind = %kind,
                    target = %target,
                    source = ?target.source(),
                    "Resolved container kind"
                );
                Ok(target)
            }
            Err(e) => {
                warn!(kind = %kind, error = %e, "Failed to resolve container kind");
                Err(e)
            }
        }
    }

    /// Number of memoized resolutions
    pub fn cached_resolutions(&self) -> usize {
        self.resolutions.len()
    }

    /// Drop all memoized resolutions
    pub fn clear_cache(&self) {
        self.resolutions.clear();
    }

    /// Registration generation, bumped whenever a name is added
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.resolutions.clear();
    }
}

impl TypeLookup for TypeDirectory {
    fn lookup_kind(&self, name: &str) -> Option<TargetKind> {
        self.lookup(name)
    }
}
