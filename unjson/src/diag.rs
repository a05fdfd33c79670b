//! Mismatch diagnostics collected during an unmarshal walk.
//!
//! # Design
//! Diagnostics are the lenient mode's side channel: every kind mismatch or
//! missing key records one entry and conversion continues with the kind's
//! fallback. `unmarshal_strict` turns a non-empty collection into
//! `UnmarshalError`; nothing in the engine ever panics or aborts a walk.

use std::fmt;

use crate::kind::Kind;

/// One kind mismatch, located by a JSONPath-style string such as
/// `$.flows[1].type`. A missing key is reported as an observed `null`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub path: String,
    pub expected: Kind,
    pub observed: Kind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "expected {} at {}, found {}",
            self.expected, self.path, self.observed
        )
    }
}

/// Sink the walk records mismatches into.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mismatch(&mut self, path: &str, expected: Kind, observed: Kind) {
        self.entries.push(Diagnostic {
            path: path.to_string(),
            expected,
            observed,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

/// Error returned by `unmarshal_strict` when the walk recorded at least one
/// mismatch. Carries every diagnostic, not just the first.
#[derive(Debug)]
pub struct UnmarshalError {
    pub diagnostics: Vec<Diagnostic>,
}

impl fmt::Display for UnmarshalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.diagnostics.as_slice() {
            [] => write!(f, "unmarshal failed"),
            [only] => write!(f, "unmarshal failed: {only}"),
            [first, rest @ ..] => {
                write!(f, "unmarshal failed: {first} (and {} more)", rest.len())
            }
        }
    }
}

impl std::error::Error for UnmarshalError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_names_both_kinds_and_the_path() {
        let diag = Diagnostic {
            path: "$.name".to_string(),
            expected: Kind::String,
            observed: Kind::Number,
        };
        assert_eq!(diag.to_string(), "expected string at $.name, found number");
    }

    #[test]
    fn error_display_counts_extra_diagnostics() {
        let err = UnmarshalError {
            diagnostics: vec![
                Diagnostic {
                    path: "$.a".to_string(),
                    expected: Kind::Bool,
                    observed: Kind::Null,
                },
                Diagnostic {
                    path: "$.b".to_string(),
                    expected: Kind::Number,
                    observed: Kind::String,
                },
            ],
        };
        assert_eq!(
            err.to_string(),
            "unmarshal failed: expected bool at $.a, found null (and 1 more)"
        );
    }

    #[test]
    fn sink_collects_in_order() {
        let mut diags = Diagnostics::new();
        assert!(diags.is_empty());
        diags.mismatch("$.x", Kind::String, Kind::Null);
        diags.mismatch("$.y", Kind::Array, Kind::Bool);
        assert!(!diags.is_empty());
        let entries = diags.into_vec();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].path, "$.x");
        assert_eq!(entries[1].path, "$.y");
    }
}
