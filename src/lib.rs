//! typedarray - Homogeneously-typed ordered containers
//!
//! A container kind names one element type. Every construction and every
//! mutation of a [`TypedArray`] is checked against that type, so callers get
//! one enforcement point instead of scattered runtime assertions.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use typedarray::{ContainerKind, TypeDirectory, TypedArray};
//!
//! #[derive(Debug, Clone)]
//! struct Widget(u32);
//!
//! struct ArrayOfWidget;
//! impl ContainerKind for ArrayOfWidget {}
//!
//! let dir = Arc::new(TypeDirectory::new());
//! dir.register::<Widget>("Widget")?;
//!
//! let mut widgets = TypedArray::<ArrayOfWidget>::from_values(&dir, vec![Widget(1)])?;
//! widgets.push(Widget(2))?;
//! assert!(widgets.push("not a widget").is_err());
//! ```
//!
//! # Resolution
//!
//! The element type of `ArrayOfWidget` is found by removing the `ArrayOf`
//! marker from the kind's name and looking the rest up in the
//! [`TypeDirectory`]. Kinds that do not follow the convention declare
//! [`ContainerKind::target_type_override`] instead.

pub use typedarray_core::*;
