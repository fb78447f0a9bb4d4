//! Predicate-driven span assembly over ordered key sequences.
//!
//! Groups consecutive keys sharing the same predicate result into maximal
//! contiguous spans, for compact range display (e.g. `2024-01-01 ... 2024-01-05`).
//!
//! The grouping generalizes to any ordered categorical partitioning problem:
//! it is a pure generic function over the key type and predicate, independent
//! of any selection or catalog state.
//!
//! Invariants of the output:
//! - spans are index-contiguous in input order
//! - spans partition the input exactly (every key belongs to exactly one span)
//! - spans are maximal (adjacent spans never share the same predicate value)

use std::fmt;

use serde::{Deserialize, Serialize};

/// A maximal contiguous run of keys sharing one predicate value.
///
/// `start` and `end` are inclusive indices into the key sequence the span
/// was assembled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Index of the first key in the run (inclusive).
    pub start: usize,
    /// Index of the last key in the run (inclusive).
    pub end: usize,
    /// The predicate value shared by every key in the run.
    pub status: bool,
}

impl Span {
    /// Returns the number of keys covered by the span.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Returns true if the span covers a single key.
    #[must_use]
    pub const fn is_single(&self) -> bool {
        self.start == self.end
    }
}

/// Groups an ordered key sequence into maximal spans by predicate value.
///
/// `keys` may be any ordered subsequence of a catalog, supplied in catalog
/// order. The predicate is evaluated exactly once per key. Runs in linear
/// time and space; empty input produces empty output.
pub fn assemble_into_spans<K, P>(keys: &[K], predicate: P) -> Vec<Span>
where
    P: Fn(&K) -> bool,
{
    let mut spans: Vec<Span> = Vec::new();

    for (index, key) in keys.iter().enumerate() {
        let status = predicate(key);
        match spans.last_mut() {
            Some(span) if span.status == status => span.end = index,
            _ => spans.push(Span {
                start: index,
                end: index,
                status,
            }),
        }
    }

    spans
}

/// Renders a human-readable label for a span.
///
/// A single-key span renders as the key itself; a longer span renders as
/// `"<first> ... <last>"`. Indices outside the key sequence render as empty.
#[must_use]
pub fn string_for_span<K: fmt::Display>(span: &Span, keys: &[K]) -> String {
    let display = |index: usize| keys.get(index).map(ToString::to_string).unwrap_or_default();

    if span.is_single() {
        display(span.start)
    } else {
        format!("{} ... {}", display(span.start), display(span.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_produces_empty_output() {
        let spans = assemble_into_spans::<&str, _>(&[], |_| true);
        assert!(spans.is_empty());
    }

    #[test]
    fn single_key_produces_one_span() {
        let keys = ["2024-01-01"];
        let spans = assemble_into_spans(&keys, |_| false);
        assert_eq!(
            spans,
            vec![Span {
                start: 0,
                end: 0,
                status: false
            }]
        );
    }

    #[test]
    fn uniform_predicate_produces_one_covering_span() {
        let keys = ["2024-01-01", "2024-01-02", "2024-01-03"];
        let spans = assemble_into_spans(&keys, |_| true);

        assert_eq!(
            spans,
            vec![Span {
                start: 0,
                end: 2,
                status: true
            }]
        );
        assert_eq!(string_for_span(&spans[0], &keys), "2024-01-01 ... 2024-01-03");
    }

    #[test]
    fn predicate_changes_split_spans() {
        let keys = ["a", "b", "c", "d"];
        let spans = assemble_into_spans(&keys, |key| *key == "b" || *key == "c");

        assert_eq!(
            spans,
            vec![
                Span {
                    start: 0,
                    end: 0,
                    status: false
                },
                Span {
                    start: 1,
                    end: 2,
                    status: true
                },
                Span {
                    start: 3,
                    end: 3,
                    status: false
                },
            ]
        );
    }

    #[test]
    fn span_labels_render_single_and_range() {
        let keys = ["a", "b", "c"];
        let single = Span {
            start: 1,
            end: 1,
            status: true,
        };
        let range = Span {
            start: 0,
            end: 2,
            status: false,
        };

        assert_eq!(string_for_span(&single, &keys), "b");
        assert_eq!(string_for_span(&range, &keys), "a ... c");
    }

    #[test]
    fn out_of_range_span_renders_empty_labels() {
        let keys = ["a"];
        let span = Span {
            start: 5,
            end: 5,
            status: true,
        };
        assert_eq!(string_for_span(&span, &keys), "");
    }
}
