//! Per-kind conversion from JSON values to Rust values.
//!
//! # Design
//! One `Unmarshal` impl per conversion category; picking the impl is the
//! compile-time equivalent of a kind switch, so an unsupported field type is
//! a build error, not a runtime surprise. Each impl checks the value's kind,
//! and on mismatch records a diagnostic and returns the category's fallback:
//!
//! | kind     | fallback                          |
//! |----------|-----------------------------------|
//! | string   | `""`                              |
//! | bool     | `false`                           |
//! | integer  | `0` (in-range numbers truncate toward zero; out-of-range records a diagnostic) |
//! | float    | `0.0`                             |
//! | sequence | empty vector                      |
//! | record   | `Default::default()`              |
//!
//! A missing object key converts the null sentinel, which lands in the same
//! mismatch path as an explicit `null`.

use serde_json::{Map, Value};

use crate::diag::Diagnostics;
use crate::kind::Kind;

static NULL: Value = Value::Null;

/// Conversion from a JSON value of one expected kind.
///
/// Implemented for scalars and `Vec` here, and for records by
/// `#[derive(Unmarshal)]`. `Default` supplies the fallback when the value's
/// kind does not match.
pub trait Unmarshal: Default {
    /// The JSON kind this type converts from.
    const EXPECTED: Kind;

    /// Convert `value`, recording a diagnostic at `path` and returning the
    /// fallback if the kind does not match.
    fn unmarshal_value(value: &Value, path: &str, diags: &mut Diagnostics) -> Self;
}

/// Look up `tag` in `obj` and convert the value under it. A missing key
/// converts the null sentinel.
pub fn unmarshal_field<T: Unmarshal>(
    obj: &Map<String, Value>,
    tag: &str,
    path: &str,
    diags: &mut Diagnostics,
) -> T {
    let child = format!("{path}.{tag}");
    T::unmarshal_value(obj.get(tag).unwrap_or(&NULL), &child, diags)
}

impl Unmarshal for String {
    const EXPECTED: Kind = Kind::String;

    fn unmarshal_value(value: &Value, path: &str, diags: &mut Diagnostics) -> Self {
        match value.as_str() {
            Some(s) => s.to_string(),
            None => {
                diags.mismatch(path, Kind::String, Kind::of(value));
                String::new()
            }
        }
    }
}

impl Unmarshal for bool {
    const EXPECTED: Kind = Kind::Bool;

    fn unmarshal_value(value: &Value, path: &str, diags: &mut Diagnostics) -> Self {
        match value.as_bool() {
            Some(b) => b,
            None => {
                diags.mismatch(path, Kind::Bool, Kind::of(value));
                false
            }
        }
    }
}

macro_rules! float_unmarshal {
    ($($ty:ty),*) => {$(
        impl Unmarshal for $ty {
            const EXPECTED: Kind = Kind::Number;

            fn unmarshal_value(value: &Value, path: &str, diags: &mut Diagnostics) -> Self {
                match value.as_f64() {
                    Some(n) => n as $ty,
                    None => {
                        diags.mismatch(path, Kind::Number, Kind::of(value));
                        0.0
                    }
                }
            }
        }
    )*};
}

float_unmarshal!(f32, f64);

macro_rules! int_unmarshal {
    ($($ty:ty),*) => {$(
        impl Unmarshal for $ty {
            const EXPECTED: Kind = Kind::Number;

            fn unmarshal_value(value: &Value, path: &str, diags: &mut Diagnostics) -> Self {
                let Value::Number(n) = value else {
                    diags.mismatch(path, Kind::Number, Kind::of(value));
                    return 0;
                };
                let converted = if let Some(i) = n.as_i64() {
                    <$ty>::try_from(i).ok()
                } else if let Some(u) = n.as_u64() {
                    <$ty>::try_from(u).ok()
                } else {
                    // Non-integral number: truncate toward zero, then range-check.
                    let t = n.as_f64().unwrap_or(0.0).trunc();
                    if t >= <$ty>::MIN as f64 && t <= <$ty>::MAX as f64 {
                        Some(t as $ty)
                    } else {
                        None
                    }
                };
                match converted {
                    Some(v) => v,
                    None => {
                        // Representable as JSON but not in the target type.
                        diags.mismatch(path, Kind::Number, Kind::Number);
                        0
                    }
                }
            }
        }
    )*};
}

int_unmarshal!(i8, i16, i32, i64, u8, u16, u32, u64);

impl<T: Unmarshal> Unmarshal for Vec<T> {
    const EXPECTED: Kind = Kind::Array;

    fn unmarshal_value(value: &Value, path: &str, diags: &mut Diagnostics) -> Self {
        match value.as_array() {
            Some(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| T::unmarshal_value(item, &format!("{path}[{i}]"), diags))
                .collect(),
            None => {
                diags.mismatch(path, Kind::Array, Kind::of(value));
                Vec::new()
            }
        }
    }
}
