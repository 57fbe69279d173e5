//! Type-erased element values
//!
//! Containers store their elements as `Box<dyn Element>`. Any `'static`
//! type that is `Clone + Debug + Send + Sync` is an `Element` through the
//! blanket impl below, so callers push plain Rust values and the container
//! performs the conformance check against the dynamic `TypeId`.
//!
//! `Box<dyn Element>` itself deliberately does not implement `Clone`, so it
//! never picks up the blanket impl. Otherwise a boxed value could be pushed
//! as an element and report the `TypeId` of the box instead of its contents.

use std::any::{Any, TypeId};
use std::fmt;

/// A value that can be held by a typed array
pub trait Element: Any + fmt::Debug + Send + Sync + 'static {
    /// Borrow as `Any` for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Borrow mutably as `Any` for downcasting
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Convert into `Box<dyn Any>` for owned downcasting
    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    /// Clone into a fresh box
    fn clone_element(&self) -> Box<dyn Element>;

    /// Rust type name of the concrete value
    fn element_type_name(&self) -> &'static str;
}

impl<T> Element for T
where
    T: Any + Clone + fmt::Debug + Send + Sync,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn clone_element(&self) -> Box<dyn Element> {
        Box::new(self.clone())
    }

    fn element_type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

impl dyn Element {
    /// `TypeId` of the concrete value behind the trait object
    #[inline]
    pub fn concrete_type_id(&self) -> TypeId {
        self.as_any().type_id()
    }

    /// Check whether the concrete value is a `T`
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Downcast to `&T`
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Downcast to `&mut T`
    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    /// Downcast an owned box, handing the box back on failure
    pub fn downcast<T: Any>(self: Box<Self>) -> Result<Box<T>, Box<dyn Element>> {
        if self.is::<T>() {
            match self.into_any().downcast::<T>() {
                Ok(value) => Ok(value),
                // `is::<T>` was checked above
                Err(_) => unreachable!("type id checked before downcast"),
            }
        } else {
            Err(self)
        }
    }
}
