//! # Reference Scanner
//!
//! Extracts every cross-document `$ref` target from an arbitrary JSON value.
//!
//! A reference is recognized structurally: an object whose `$ref` member is
//! a string. Scanning descends into every nested object and array regardless
//! of key names, because `$ref` may appear at any depth (inside `properties`,
//! `items`, `$defs`, vendor extensions, ...). Non-string `$ref` members are
//! skipped; judging schema shape is the engine's job.
//!
//! Targets are normalized with [`SchemaId::from_reference`]: the fragment is
//! stripped and purely local references (`#/$defs/x`) yield nothing.
//!
//! Traversal is depth-first and deterministic. An object's own reference is
//! produced before those of its members, and members and array elements are
//! visited in their natural order. The scanner is lazy and borrows the
//! value, so scanning the same value again yields the same sequence.

use std::iter::FusedIterator;

use regcheck_core::SchemaId;
use serde_json::Value;

/// The member that marks a reference construct.
pub const REF_KEY: &str = "$ref";

/// Lazy depth-first iterator over the reference targets in a value.
#[derive(Debug, Clone)]
pub struct RefScanner<'a> {
    stack: Vec<&'a Value>,
}

/// Scan `value` for reference targets. Duplicates are yielded as found.
pub fn scan_refs(value: &Value) -> RefScanner<'_> {
    RefScanner { stack: vec![value] }
}

impl<'a> Iterator for RefScanner<'a> {
    type Item = SchemaId;

    fn next(&mut self) -> Option<SchemaId> {
        while let Some(node) = self.stack.pop() {
            match node {
                Value::Object(map) => {
                    self.stack.extend(map.values().rev());
                    if let Some(target) = map
                        .get(REF_KEY)
                        .and_then(Value::as_str)
                        .and_then(SchemaId::from_reference)
                    {
                        return Some(target);
                    }
                }
                Value::Array(items) => self.stack.extend(items.iter().rev()),
                _ => {}
            }
        }
        None
    }
}

impl FusedIterator for RefScanner<'_> {}
