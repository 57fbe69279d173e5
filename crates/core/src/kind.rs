//! Container kind declarations
//!
//! A container kind is a zero-sized marker type that names one typed array
//! flavour. The kind supplies two things:
//! - **Identity**: `kind_name()`, by default the fully qualified Rust path
//!   of the marker type (e.g. `app::inventory::ArrayOfWidget`)
//! - **Override**: `target_type_override()`, an explicit target type name
//!   consulted when the name-derived type does not resolve
//!
//! ## Examples
//!
//! ```text
//! struct ArrayOfWidget;
//! impl ContainerKind for ArrayOfWidget {}
//!
//! struct Shapes;
//! impl ContainerKind for Shapes {
//!     fn target_type_override() -> Option<&'static str> {
//!         Some("Shape")
//!     }
//! }
//! ```

use std::fmt;

/// Declaration surface of a container kind
pub trait ContainerKind: 'static {
    /// Fully qualified identity, used for naming resolution and in errors
    fn kind_name() -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Explicit target type name, consulted after naming resolution fails
    fn target_type_override() -> Option<&'static str> {
        None
    }
}

/// Parsed identity of a container kind
///
/// Keeps the qualified name for diagnostics and exposes the simple name
/// that naming resolution works on. The simple name is the final `::`
/// segment with any generic argument list removed:
///
/// | Qualified | Simple |
/// |-----------|--------|
/// | `app::ArrayOfWidget` | `ArrayOfWidget` |
/// | `ArrayOfWidget` | `ArrayOfWidget` |
/// | `app::ArrayOfPair<app::Left>` | `ArrayOfPair` |
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KindName {
    qualified: String,
    simple_start: usize,
    simple_end: usize,
}

impl KindName {
    /// Parse a kind identity
    pub fn new(qualified: impl Into<String>) -> Self {
        let qualified = qualified.into();
        let simple_end = qualified.find('<').unwrap_or(qualified.len());
        let simple_start = qualified[..simple_end]
            .rfind("::")
            .map(|pos| pos + 2)
            .unwrap_or(0);
        KindName {
            qualified,
            simple_start,
            simple_end,
        }
    }

    /// Identity of a declared kind
    pub fn of<K: ContainerKind>() -> Self {
        Self::new(K::kind_name())
    }

    /// Full identity as declared
    #[inline]
    pub fn qualified(&self) -> &str {
        &self.qualified
    }

    /// Final path segment without generic arguments
    #[inline]
    pub fn simple(&self) -> &str {
        &self.qualified[self.simple_start..self.simple_end]
    }

    /// Consume and return the qualified name
    pub fn into_inner(self) -> String {
        self.qualified
    }
}

impl fmt::Display for KindName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified)
    }
}

impl AsRef<str> for KindName {
    fn as_ref(&self) -> &str {
        &self.qualified
    }
}
