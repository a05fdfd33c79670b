//! Tag-driven JSON unmarshalling with best-effort fallbacks.
//!
//! # Overview
//! `#[derive(Unmarshal)]` on a named-field struct binds each field to a JSON
//! object key (the field's *tag*, defaulting to its name) and generates the
//! conversion from an already-parsed `serde_json::Value` tree. Nested
//! records and `Vec` fields recurse; a value whose kind does not match the
//! field's declared kind degrades to a documented fallback and records a
//! diagnostic instead of failing the whole conversion.
//!
//! # Design
//! - The engine consumes a materialized `serde_json::Value` and never
//!   mutates it; parsing bytes into that tree is the caller's concern.
//! - Kind dispatch is resolved at compile time through `Unmarshal` impls,
//!   one per conversion category (string, bool, integer, float, sequence,
//!   record). Unsupported field types fail to compile.
//! - Two policies over the same walk: `unmarshal` always returns a value
//!   plus diagnostics; `unmarshal_strict` fails if any were recorded.
//! - No I/O, no locks, no shared state: concurrent calls on independent
//!   documents are safe.

pub mod convert;
pub mod diag;
pub mod field;
pub mod kind;

pub use convert::{unmarshal_field, Unmarshal};
pub use diag::{Diagnostic, Diagnostics, UnmarshalError};
pub use field::{Field, Record};
pub use kind::Kind;
pub use serde_json::{Map, Value};
pub use unjson_derive::Unmarshal;

/// Diagnostic path of the document root.
const ROOT: &str = "$";

/// Best-effort result of a lenient unmarshal: the populated record plus any
/// mismatches encountered along the way.
#[derive(Debug)]
pub struct Unmarshalled<T> {
    pub value: T,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Unmarshalled<T> {
    /// True when no mismatch was recorded.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Discard the diagnostics and keep the best-effort value.
    pub fn into_value(self) -> T {
        self.value
    }
}

/// Convert a JSON document into `T`, degrading gracefully field by field.
///
/// A root that is not an object yields `T::default()` with a single
/// diagnostic at `$` and no traversal. Every mismatch or missing key below
/// the root records one diagnostic and substitutes that kind's fallback;
/// the returned value is always fully constructed.
pub fn unmarshal<T: Record>(doc: &Value) -> Unmarshalled<T> {
    let (value, diags) = walk(doc);
    Unmarshalled {
        value,
        diagnostics: diags.into_vec(),
    }
}

/// Convert a JSON document into `T`, failing on any mismatch.
///
/// Runs the same walk as [`unmarshal`] and returns an error carrying every
/// recorded diagnostic if there was at least one.
pub fn unmarshal_strict<T: Record>(doc: &Value) -> Result<T, UnmarshalError> {
    let (value, diags) = walk(doc);
    if diags.is_empty() {
        Ok(value)
    } else {
        Err(UnmarshalError {
            diagnostics: diags.into_vec(),
        })
    }
}

fn walk<T: Record>(doc: &Value) -> (T, Diagnostics) {
    let mut diags = Diagnostics::new();
    let value = if doc.is_object() {
        T::unmarshal_value(doc, ROOT, &mut diags)
    } else {
        diags.mismatch(ROOT, Kind::Object, Kind::of(doc));
        T::default()
    };
    (value, diags)
}
