//! Typed arrays
//!
//! `TypedArray<K>` is an ordered, zero-indexed sequence whose elements all
//! conform to the target type of the container kind `K`.
//!
//! ## Invariant
//!
//! After any public method returns, every element conforms to the target.
//! A failing method leaves the contents exactly as they were: single values
//! are checked before they are written, and whole collections are checked in
//! full before the swap.
//!
//! ## Example
//!
//! ```text
//! struct ArrayOfWidget;
//! impl ContainerKind for ArrayOfWidget {}
//!
//! let dir = Arc::new(TypeDirectory::new());
//! dir.register::<Widget>("Widget")?;
//!
//! let mut widgets = TypedArray::<ArrayOfWidget>::new(&dir)?;
//! widgets.push(Widget::new(1))?;
//! widgets.push(42u32).unwrap_err(); // TypeMismatch
//! ```

use crate::directory::TypeDirectory;
use crate::element::Element;
use crate::error::{Error, Operation, Result};
use crate::ingest;
use crate::kind::{ContainerKind, KindName};
use crate::resolve::TargetType;
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// Homogeneously-typed ordered container for kind `K`
pub struct TypedArray<K: ContainerKind> {
    kind: KindName,
    target: TargetType,
    directory: Arc<TypeDirectory>,
    elements: Vec<Box<dyn Element>>,
    _kind: PhantomData<fn() -> K>,
}

impl<K: ContainerKind> TypedArray<K> {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Empty container
    ///
    /// # Errors
    ///
    /// `InvalidKindName` or `UnresolvableTargetType` if `K` cannot be resolved.
    pub fn new(directory: &Arc<TypeDirectory>) -> Result<Self> {
        let target = directory.resolve::<K>()?;
        Ok(TypedArray {
            kind: KindName::of::<K>(),
            target,
            directory: Arc::clone(directory),
            elements: Vec::new(),
            _kind: PhantomData,
        })
    }

    /// Container holding `elements`, in order
    ///
    /// # Errors
    ///
    /// Resolution errors as for [`new`](Self::new), or `TypeMismatch` naming
    /// the first non-conforming position.
    pub fn with_elements(
        directory: &Arc<TypeDirectory>,
        elements: Vec<Box<dyn Element>>,
    ) -> Result<Self> {
        let mut array = Self::new(directory)?;
        array.check_all(&elements, Operation::Construct)?;
        array.elements = elements;
        Ok(array)
    }

    /// Container holding the values of a homogeneous `Vec`
    pub fn from_values<T: Element>(
        directory: &Arc<TypeDirectory>,
        values: Vec<T>,
    ) -> Result<Self> {
        Self::with_elements(directory, boxed(values))
    }

    /// Container decoded from an untyped JSON array
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `value` is not an array or an item's type is not
    /// decodable; `TypeMismatch` if an item does not conform.
    pub fn from_json(directory: &Arc<TypeDirectory>, value: &serde_json::Value) -> Result<Self> {
        let mut array = Self::new(directory)?;
        array.elements = ingest::decode_array(
            &array.directory,
            &array.kind,
            &array.target,
            value,
            Operation::Construct,
        )?;
        Ok(array)
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Write `value` at `index`
    ///
    /// `index == len()` appends. The value is checked before the index.
    ///
    /// # Errors
    ///
    /// `TypeMismatch` if the value does not conform; `InvalidArgument` if
    /// `index > len()`.
    pub fn set<T: Element>(&mut self, index: usize, value: T) -> Result<()> {
        self.set_boxed(index, Box::new(value))
    }

    /// Write an already boxed value at `index`
    pub fn set_boxed(&mut self, index: usize, value: Box<dyn Element>) -> Result<()> {
        let operation = Operation::SetAt(index);
        self.check_one(value.as_ref(), operation, None)?;
        match index.cmp(&self.elements.len()) {
            std::cmp::Ordering::Less => self.elements[index] = value,
            std::cmp::Ordering::Equal => self.elements.push(value),
            std::cmp::Ordering::Greater => {
                return Err(Error::InvalidArgument {
                    kind: self.kind.qualified().to_string(),
                    operation,
                    reason: format!(
                        "index {} is past the end (len {})",
                        index,
                        self.elements.len()
                    ),
                })
            }
        }
        Ok(())
    }

    /// Append `value`
    ///
    /// # Errors
    ///
    /// `TypeMismatch` if the value does not conform.
    pub fn push<T: Element>(&mut self, value: T) -> Result<()> {
        self.push_boxed(Box::new(value))
    }

    /// Append an already boxed value
    pub fn push_boxed(&mut self, value: Box<dyn Element>) -> Result<()> {
        self.check_one(value.as_ref(), Operation::Append, None)?;
        self.elements.push(value);
        Ok(())
    }

    /// Swap the whole contents, returning the previous elements
    ///
    /// # Errors
    ///
    /// `TypeMismatch` if any new element does not conform; nothing changes.
    pub fn replace_all(
        &mut self,
        elements: Vec<Box<dyn Element>>,
    ) -> Result<Vec<Box<dyn Element>>> {
        self.check_all(&elements, Operation::ReplaceAll)?;
        Ok(std::mem::replace(&mut self.elements, elements))
    }

    /// Swap the contents for the values of a homogeneous `Vec`
    pub fn replace_all_values<T: Element>(
        &mut self,
        values: Vec<T>,
    ) -> Result<Vec<Box<dyn Element>>> {
        self.replace_all(boxed(values))
    }

    /// Swap the contents for a decoded JSON array
    ///
    /// # Errors
    ///
    /// As for [`from_json`](Self::from_json); nothing changes on failure.
    pub fn replace_all_json(
        &mut self,
        value: &serde_json::Value,
    ) -> Result<Vec<Box<dyn Element>>> {
        let decoded = ingest::decode_array(
            &self.directory,
            &self.kind,
            &self.target,
            value,
            Operation::ReplaceAll,
        )?;
        Ok(std::mem::replace(&mut self.elements, decoded))
    }

    /// Remove and return the last element
    pub fn pop(&mut self) -> Option<Box<dyn Element>> {
        self.elements.pop()
    }

    /// Remove every element
    pub fn clear(&mut self) {
        self.elements.clear();
    }

    // ========================================================================
    // Read access
    // ========================================================================

    /// Resolved target type
    pub fn target(&self) -> &TargetType {
        &self.target
    }

    /// Qualified kind identity
    pub fn kind_name(&self) -> &str {
        self.kind.qualified()
    }

    /// Directory this container validates against
    pub fn directory(&self) -> &Arc<TypeDirectory> {
        &self.directory
    }

    /// Number of elements
    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True if there are no elements
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Element at `index`
    pub fn get(&self, index: usize) -> Option<&dyn Element> {
        self.elements.get(index).map(|e| e.as_ref())
    }

    /// Element at `index`, downcast to `T`
    pub fn get_as<T: Any>(&self, index: usize) -> Option<&T> {
        self.get(index).and_then(|e| e.downcast_ref::<T>())
    }

    /// First element
    pub fn first(&self) -> Option<&dyn Element> {
        self.elements.first().map(|e| e.as_ref())
    }

    /// Last element
    pub fn last(&self) -> Option<&dyn Element> {
        self.elements.last().map(|e| e.as_ref())
    }

    /// Iterate over the elements in order
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.elements.iter(),
        }
    }

    /// Iterate over the elements that are `T`
    ///
    /// For a concrete target equal to `T` this yields every element.
    pub fn iter_as<T: Any>(&self) -> impl Iterator<Item = &T> + '_ {
        self.elements.iter().filter_map(|e| e.downcast_ref::<T>())
    }

    /// Elements as a slice
    pub fn as_slice(&self) -> &[Box<dyn Element>] {
        &self.elements
    }

    /// Consume the container, returning its elements
    pub fn into_elements(self) -> Vec<Box<dyn Element>> {
        self.elements
    }

    // ========================================================================
    // Validation
    // ========================================================================

    fn check_one(
        &self,
        value: &dyn Element,
        operation: Operation,
        position: Option<usize>,
    ) -> Result<()> {
        if self.directory.conforms(&self.target, value) {
            return Ok(());
        }
        let actual = self.directory.describe(value);
        debug!(
            kind = %self.kind,
            operation = %operation,
            expected = %self.target,
            actual = %actual,
            "Rejected non-conforming element"
        );
        Err(Error::TypeMismatch {
            kind: self.kind.qualified().to_string(),
            expected: self.target.name().to_string(),
            actual,
            operation,
            position,
        })
    }

    fn check_all(&self, elements: &[Box<dyn Element>], operation: Operation) -> Result<()> {
        elements
            .iter()
            .enumerate()
            .try_for_each(|(pos, e)| self.check_one(e.as_ref(), operation, Some(pos)))
    }
}

fn boxed<T: Element>(values: Vec<T>) -> Vec<Box<dyn Element>> {
    values
        .into_iter()
        .map(|v| Box::new(v) as Box<dyn Element>)
        .collect()
}

impl<K: ContainerKind> Clone for TypedArray<K> {
    fn clone(&self) -> Self {
        TypedArray {
            kind: self.kind.clone(),
            target: self.target.clone(),
            directory: Arc::clone(&self.directory),
            elements: self
                .elements
                .iter()
                .map(|e| e.as_ref().clone_element())
                .collect(),
            _kind: PhantomData,
        }
    }
}

impl<K: ContainerKind> fmt::Debug for TypedArray<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedArray")
            .field("kind", &self.kind.qualified())
            .field("target", &self.target.name())
            .field("elements", &self.elements)
            .finish()
    }
}

/// Iterator over a typed array's elements
pub struct Iter<'a> {
    inner: std::slice::Iter<'a, Box<dyn Element>>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a dyn Element;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|e| e.as_ref())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|e| e.as_ref())
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a, K: ContainerKind> IntoIterator for &'a TypedArray<K> {
    type Item = &'a dyn Element;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
