use crate::error::ValidationError;
use lazy_static::lazy_static;
use regex::Regex;
use std::ops::RangeInclusive;
use std::path::Path;

lazy_static! {
    // ASCII digits only; `\d` would also accept other Unicode digits.
    static ref SELECTION: Regex = Regex::new(r"^[0-9]+(?:[,-][0-9]+)*$").unwrap();
}

/// One comma-separated clause: a single page or an inclusive range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRange {
    pub start: u32,
    pub end: u32,
}

impl PageRange {
    /// Parse a clause like "5", "1-5" or "10-5" (normalised to 5-10)
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        if let Ok(page) = s.parse::<u32>() {
            return Ok(PageRange {
                start: page,
                end: page,
            });
        }

        let parts: Vec<&str> = s.split('-').collect();
        let [a, b] = parts.as_slice() else {
            return Err(ValidationError::MalformedClause(s.to_string()));
        };
        let a = parse_page(a, s)?;
        let b = parse_page(b, s)?;

        Ok(PageRange {
            start: a.min(b),
            end: a.max(b),
        })
    }

    pub fn pages(&self) -> RangeInclusive<u32> {
        self.start..=self.end
    }

    pub fn contains(&self, page: u32) -> bool {
        self.pages().contains(&page)
    }
}

fn parse_page(s: &str, clause: &str) -> Result<u32, ValidationError> {
    s.parse::<u32>()
        .map_err(|_| ValidationError::MalformedClause(clause.to_string()))
}

/// A validated set of 1-based page numbers, e.g. from "1,2,5-10,20,30".
///
/// Clause order and duplicates are kept; only ranges are expanded
/// (ascending). Expansion is lazy, so wide ranges cost nothing until
/// iterated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSelection {
    ranges: Vec<PageRange>,
}

impl PageSelection {
    /// Parse a selection expression. Fails as a whole on the first bad clause.
    pub fn parse(expression: &str) -> Result<Self, ValidationError> {
        if expression.is_empty() {
            return Err(ValidationError::EmptyExpression);
        }
        if !SELECTION.is_match(expression) {
            return Err(ValidationError::Malformed(expression.to_string()));
        }

        let ranges = expression
            .split(',')
            .map(PageRange::parse)
            .collect::<Result<Vec<_>, _>>()?;

        if ranges.iter().any(|r| r.start == 0) {
            return Err(ValidationError::PageZero);
        }

        tracing::debug!(expression, clauses = ranges.len(), "parsed page selection");
        Ok(PageSelection { ranges })
    }

    /// Expanded page numbers in parse order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.ranges.iter().flat_map(PageRange::pages)
    }

    pub fn to_vec(&self) -> Vec<u32> {
        self.iter().collect()
    }

    pub fn contains(&self, page: u32) -> bool {
        self.ranges.iter().any(|r| r.contains(page))
    }

    pub fn max_page(&self) -> u32 {
        self.ranges.iter().map(|r| r.end).max().unwrap_or(0)
    }

    /// Reject selections naming pages past the end of `path`.
    pub fn check_bounds(&self, page_count: u32, path: &Path) -> Result<(), ValidationError> {
        let max = self.max_page();
        if max > page_count {
            return Err(ValidationError::PageOutOfRange {
                page: max,
                page_count,
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }
}
