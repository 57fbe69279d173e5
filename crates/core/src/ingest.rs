//! Untyped JSON ingestion
//!
//! Decodes a `serde_json::Value` into conforming elements. This is the one
//! place where the container sees data whose Rust type is not known at
//! compile time, so every item goes through the directory's decoders.
//!
//! ## Item rules
//!
//! - An object carrying the tag field names its concrete type; the tag is
//!   removed before decoding and the named type must conform to the target
//! - A tag that is not a string is a mismatch, never an untagged item
//! - An untagged item decodes as the target when the target is concrete
//! - An untagged item cannot satisfy a capability target
//!
//! The whole array is decoded before anything is returned, so callers can
//! swap the result in without leaving a half-filled container behind.

use crate::directory::{Decoder, TypeDirectory};
use crate::element::Element;
use crate::error::{Error, Operation, Result};
use crate::kind::KindName;
use crate::resolve::{TargetKind, TargetType};
use serde_json::Value;
use std::any::TypeId;
use tracing::debug;

/// JSON kind name used in diagnostics
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Decode a JSON array into elements conforming to `target`
///
/// # Errors
///
/// - `InvalidArgument` if `value` is not an array, or an item names a type
///   registered without a decoder
/// - `TypeMismatch` if an item names a non-conforming or unknown type, or
///   its structure does not decode
pub fn decode_array(
    directory: &TypeDirectory,
    kind: &KindName,
    target: &TargetType,
    value: &Value,
    operation: Operation,
) -> Result<Vec<Box<dyn Element>>> {
    let items = value.as_array().ok_or_else(|| Error::InvalidArgument {
        kind: kind.qualified().to_string(),
        operation,
        reason: format!("expected a JSON array, got {}", json_kind(value)),
    })?;

    let decoder = ItemDecoder {
        directory,
        kind,
        target,
        operation,
        tag_field: &directory.config().type_tag_field,
    };
    let elements = items
        .iter()
        .enumerate()
        .map(|(pos, item)| decoder.decode(pos, item))
        .collect::<Result<Vec<_>>>()?;

    debug!(
        kind = %kind,
        target = %target,
        count = elements.len(),
        "Decoded JSON array"
    );
    Ok(elements)
}

struct ItemDecoder<'a> {
    directory: &'a TypeDirectory,
    kind: &'a KindName,
    target: &'a TargetType,
    operation: Operation,
    tag_field: &'a str,
}

impl ItemDecoder<'_> {
    fn decode(&self, pos: usize, item: &Value) -> Result<Box<dyn Element>> {
        let tag = item
            .as_object()
            .and_then(|object| object.get(self.tag_field));

        match tag {
            Some(Value::String(type_name)) => self.decode_tagged(pos, item, type_name),
            Some(other) => Err(self.mismatch(pos, json_kind(other))),
            None => self.decode_untagged(pos, item),
        }
    }

    fn decode_tagged(&self, pos: usize, item: &Value, type_name: &str) -> Result<Box<dyn Element>> {
        let type_id = match self.directory.lookup(type_name) {
            Some(TargetKind::Concrete(type_id))
                if self.directory.conforms_type(self.target, type_id) =>
            {
                type_id
            }
            _ => return Err(self.mismatch(pos, type_name)),
        };

        let mut body = item.clone();
        if let Some(object) = body.as_object_mut() {
            object.remove(self.tag_field);
        }
        let decoder = self.decoder_for(type_id, type_name)?;
        decoder(body).map_err(|_| self.mismatch(pos, json_kind(item)))
    }

    fn decode_untagged(&self, pos: usize, item: &Value) -> Result<Box<dyn Element>> {
        let type_id = match self.target.type_id() {
            Some(type_id) => type_id,
            None => return Err(self.mismatch(pos, json_kind(item))),
        };
        let decoder = self.decoder_for(type_id, self.target.name())?;
        decoder(item.clone()).map_err(|_| self.mismatch(pos, json_kind(item)))
    }

    fn decoder_for(&self, type_id: TypeId, type_name: &str) -> Result<Decoder> {
        self.directory
            .decoder(type_id)
            .ok_or_else(|| Error::InvalidArgument {
                kind: self.kind.qualified().to_string(),
                operation: self.operation,
                reason: format!("type '{}' is not registered as decodable", type_name),
            })
    }

    fn mismatch(&self, pos: usize, actual: &str) -> Error {
        Error::TypeMismatch {
            kind: self.kind.qualified().to_string(),
            expected: self.target.name().to_string(),
            actual: actual.to_string(),
            operation: self.operation,
            position: Some(pos),
        }
    }
}
