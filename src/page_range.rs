use std::collections::HashSet;
use std::num::IntErrorKind;

use serde::Serialize;

/// Why a token of a range specification contributed no pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// Not a number, or a range with a non-numeric side
    Malformed,
    /// Lies entirely outside the document
    OutOfRange,
    /// Start is past the end (e.g. "3-1")
    Inverted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IgnoredToken {
    pub token: String,
    pub reason: IgnoreReason,
}

/// Result of resolving a range specification against a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSelection {
    /// Zero-based, unique, in first-encountered order
    pub indices: Vec<u32>,
    pub ignored: Vec<IgnoredToken>,
    /// The range had tokens but none were usable, so every page was returned
    pub fell_back: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Single(i64),
    Range(i64, i64),
}

impl Token {
    fn parse(s: &str) -> Option<Self> {
        match s.split_once('-') {
            Some((start, end)) => Some(Token::Range(
                parse_page_number(start)?,
                parse_page_number(end)?,
            )),
            None => parse_page_number(s).map(Token::Single),
        }
    }
}

/// Parse a 1-based page number. Values that overflow saturate so that
/// "5-99999999999999999999" still clamps to the last page.
fn parse_page_number(s: &str) -> Option<i64> {
    match s.trim().parse::<i64>() {
        Ok(n) => Some(n),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

/// Resolve a page range specification like "1-3,5,7-9" into zero-based page
/// indices, reporting every token that was skipped.
///
/// Never fails: malformed tokens are skipped, ranges are clamped to the
/// document, and a selection with no valid page falls back to every page.
pub fn select(range: &str, total_pages: u32) -> PageSelection {
    let total = i64::from(total_pages);
    let mut seen = HashSet::new();
    let mut indices = Vec::new();
    let mut ignored = Vec::new();

    let tokens = range.split(',').map(str::trim).filter(|t| !t.is_empty());
    for token in tokens {
        let (first, last) = match Token::parse(token) {
            Some(Token::Single(page)) if (1..=total).contains(&page) => (page, page),
            Some(Token::Single(_)) => {
                ignored.push(ignore(token, IgnoreReason::OutOfRange));
                continue;
            }
            Some(Token::Range(start, end)) => {
                let (first, last) = (start.max(1), end.min(total));
                if first > last {
                    // Distinguish "3-1" from "20-30" on a ten page document
                    let reason = if start > total || end < 1 {
                        IgnoreReason::OutOfRange
                    } else {
                        IgnoreReason::Inverted
                    };
                    ignored.push(ignore(token, reason));
                    continue;
                }
                (first, last)
            }
            None => {
                ignored.push(ignore(token, IgnoreReason::Malformed));
                continue;
            }
        };

        // Bounds are within 1..=total_pages here, so the casts are lossless
        for page in first..=last {
            let index = (page - 1) as u32;
            if seen.insert(index) {
                indices.push(index);
            }
        }
    }

    // A range without any tokens selects everything too, but is not a fallback
    let fell_back = indices.is_empty() && !ignored.is_empty();
    if indices.is_empty() {
        indices = (0..total_pages).collect();
    }

    PageSelection {
        indices,
        ignored,
        fell_back,
    }
}

/// Resolve a page range specification into zero-based page indices.
///
/// An empty or entirely invalid specification selects every page.
pub fn resolve(range: &str, total_pages: u32) -> Vec<u32> {
    select(range, total_pages).indices
}

/// Convert zero-based indices back into 1-based page numbers
pub fn to_page_numbers(indices: &[u32]) -> Vec<u32> {
    indices.iter().map(|&i| i + 1).collect()
}

fn ignore(token: &str, reason: IgnoreReason) -> IgnoredToken {
    IgnoredToken {
        token: token.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_selects_all() {
        assert_eq!(resolve("", 5), vec![0, 1, 2, 3, 4]);
        assert_eq!(resolve("   ", 3), vec![0, 1, 2]);
        assert_eq!(resolve(" , ,", 2), vec![0, 1]);
        assert!(!select("", 5).fell_back);
    }

    #[test]
    fn test_mixed_ranges() {
        assert_eq!(resolve("1-3,5,7-9", 9), vec![0, 1, 2, 4, 6, 7, 8]);
    }

    #[test]
    fn test_whitespace_around_tokens() {
        assert_eq!(resolve(" 2 , 4 - 5 ", 6), vec![1, 3, 4]);
    }

    #[test]
    fn test_inverted_range_falls_back() {
        assert_eq!(resolve("3-1", 5), vec![0, 1, 2, 3, 4]);

        let selection = select("3-1", 5);
        assert!(selection.fell_back);
        assert_eq!(selection.ignored[0].reason, IgnoreReason::Inverted);
    }

    #[test]
    fn test_duplicates_keep_first_occurrence() {
        assert_eq!(resolve("2,2,2", 5), vec![1]);
        assert_eq!(resolve("3,1-4", 5), vec![2, 0, 1, 3]);
    }

    #[test]
    fn test_order_follows_range() {
        assert_eq!(resolve("5,1", 5), vec![4, 0]);
    }

    #[test]
    fn test_range_clamped_to_document() {
        assert_eq!(resolve("5-1000", 8), vec![4, 5, 6, 7]);
        assert_eq!(resolve("0-2", 8), vec![0, 1]);
    }

    #[test]
    fn test_huge_numbers_saturate() {
        assert_eq!(resolve("7-99999999999999999999", 8), vec![6, 7]);
        assert_eq!(resolve("99999999999999999999", 3), vec![0, 1, 2]);
    }

    #[test]
    fn test_malformed_tokens_dropped() {
        assert_eq!(resolve("abc,2,xyz-4", 5), vec![1]);

        let selection = select("abc,2,xyz-4", 5);
        assert!(!selection.fell_back);
        let reasons: Vec<_> = selection.ignored.iter().map(|t| t.reason).collect();
        assert_eq!(reasons, vec![IgnoreReason::Malformed, IgnoreReason::Malformed]);
        assert_eq!(selection.ignored[1].token, "xyz-4");
    }

    #[test]
    fn test_leading_hyphen_is_malformed() {
        // "-3" splits into "" and "3"
        assert_eq!(resolve("-3,2", 5), vec![1]);
        assert_eq!(select("-3", 5).ignored[0].reason, IgnoreReason::Malformed);
    }

    #[test]
    fn test_negative_end_contributes_nothing() {
        // "1--3" splits into "1" and "-3"
        assert_eq!(resolve("1--3,4", 5), vec![3]);
        assert_eq!(select("1--3", 5).ignored[0].reason, IgnoreReason::OutOfRange);
    }

    #[test]
    fn test_out_of_range_singles() {
        assert_eq!(resolve("0,6,3", 5), vec![2]);

        let selection = select("0,6", 5);
        assert!(selection.fell_back);
        assert_eq!(selection.indices, vec![0, 1, 2, 3, 4]);
        assert!(selection
            .ignored
            .iter()
            .all(|t| t.reason == IgnoreReason::OutOfRange));
    }

    #[test]
    fn test_range_beyond_document_is_out_of_range() {
        let selection = select("20-30", 10);
        assert_eq!(selection.ignored[0].reason, IgnoreReason::OutOfRange);
    }

    #[test]
    fn test_empty_document() {
        assert!(resolve("", 0).is_empty());
        assert!(resolve("1-5", 0).is_empty());
    }

    #[test]
    fn test_to_page_numbers() {
        assert_eq!(to_page_numbers(&[0, 4, 2]), vec![1, 5, 3]);
    }

    proptest! {
        #[test]
        fn prop_result_is_valid(spec in ".{0,40}", total in 1u32..200) {
            let pages = resolve(&spec, total);
            prop_assert!(!pages.is_empty());
            prop_assert!(pages.iter().all(|&p| p < total));

            let unique: HashSet<_> = pages.iter().collect();
            prop_assert_eq!(unique.len(), pages.len());
        }

        #[test]
        fn prop_structured_specs_are_valid(
            tokens in prop::collection::vec((0i64..60, prop::option::of(0i64..60)), 0..8),
            total in 1u32..50,
        ) {
            let spec = tokens
                .iter()
                .map(|(start, end)| match end {
                    Some(end) => format!("{}-{}", start, end),
                    None => start.to_string(),
                })
                .collect::<Vec<_>>()
                .join(",");
            let pages = resolve(&spec, total);
            prop_assert!(!pages.is_empty());
            prop_assert!(pages.iter().all(|&p| p < total));
        }

        #[test]
        fn prop_resolution_is_idempotent(spec in "[0-9, -]{0,30}", total in 1u32..40) {
            let pages = resolve(&spec, total);
            let rendered = to_page_numbers(&pages)
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join(",");
            let again = resolve(&rendered, total);

            let first: HashSet<_> = pages.into_iter().collect();
            let second: HashSet<_> = again.into_iter().collect();
            prop_assert_eq!(first, second);
        }
    }
}
