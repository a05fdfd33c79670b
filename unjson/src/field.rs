//! Field metadata emitted by `#[derive(Unmarshal)]`.

use crate::convert::Unmarshal;
use crate::kind::Kind;

/// One field of a record: the JSON key it binds to and the kind its Rust
/// type converts from. Binding is by tag, never by position, so field order
/// inside a record carries no meaning relative to the JSON document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub tag: &'static str,
    pub kind: Kind,
}

/// A named-field struct whose fields were enumerated by
/// `#[derive(Unmarshal)]`.
///
/// Only records can sit at the root of [`crate::unmarshal`]. The derive
/// rejects enums, tuple structs, unit structs and empty structs at compile
/// time, so every implementor has at least one field and there is no upper
/// bound on the count.
pub trait Record: Unmarshal {
    /// Tag and expected kind of each field, in declaration order.
    const FIELDS: &'static [Field];

    /// Number of fields in the record.
    fn arity() -> usize {
        Self::FIELDS.len()
    }
}
