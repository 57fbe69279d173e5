//! Core types for typed arrays
//!
//! This crate provides homogeneously-typed ordered containers over
//! type-erased values:
//! - ContainerKind: Declaration surface of a container kind (name + override)
//! - KindName: Parsed kind identity
//! - TypeDirectory: Explicit registry of element types and capabilities
//! - TargetType: Resolved element type of a kind
//! - TypedArray: The container, validating every mutation
//! - Element: Type-erased element values
//! - TypedArrayConfig: Naming convention and ingestion settings (TOML)
//! - Error: Error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod array;
pub mod config;
pub mod directory;
pub mod element;
pub mod error;
pub mod ingest;
pub mod kind;
pub mod resolve;

pub use array::{Iter, TypedArray};
pub use config::{StripMode, TypedArrayConfig, DEFAULT_MARKER, DEFAULT_TYPE_TAG_FIELD};
pub use directory::{Decoder, TypeDirectory};
pub use element::Element;
pub use error::{Error, Operation, Result};
pub use kind::{ContainerKind, KindName};
pub use resolve::{resolve, ResolutionSource, TargetKind, TargetType, TypeLookup};
