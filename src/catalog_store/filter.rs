//! Search predicates over the catalog.
//!
//! Raw, optional query parameters are normalized here into typed filters
//! before they reach the store. Every supplied constraint is combined with
//! AND; empty parameters add no constraint.

use super::models::is_storable_date;
use super::validation::{ValidationError, ValidationResult};
use chrono::NaiveDate;
use serde::Deserialize;

/// Raw book search parameters, as received from a caller.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSearchParams {
    pub title: Option<String>,
    pub author_name: Option<String>,
    pub published_after: Option<String>,
    pub published_before: Option<String>,
}

/// Normalized book predicate.
///
/// Text needles are stored already case-folded. Date bounds are inclusive.
/// No ordering check is made between the two bounds: an inverted range is
/// a valid predicate that matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    pub title_contains: Option<String>,
    pub author_name_contains: Option<String>,
    pub published_on_or_after: Option<NaiveDate>,
    pub published_on_or_before: Option<NaiveDate>,
}

impl BookFilter {
    pub fn from_params(params: &BookSearchParams) -> ValidationResult<Self> {
        Ok(BookFilter {
            title_contains: non_empty(&params.title).map(fold_case),
            author_name_contains: non_empty(&params.author_name).map(fold_case),
            published_on_or_after: non_empty(&params.published_after)
                .map(|v| parse_search_date("publishedAfter", v))
                .transpose()?,
            published_on_or_before: non_empty(&params.published_before)
                .map(|v| parse_search_date("publishedBefore", v))
                .transpose()?,
        })
    }

    pub fn is_empty(&self) -> bool {
        *self == BookFilter::default()
    }
}

/// Normalized author predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorFilter {
    pub name_contains: Option<String>,
}

impl AuthorFilter {
    pub fn from_name(name: Option<&str>) -> Self {
        AuthorFilter {
            name_contains: name
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(fold_case),
        }
    }
}

/// Result ordering for book lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookOrder {
    /// Whatever order the store keeps rows in (insertion order for SQLite).
    #[default]
    Store,
    /// Newest `created_at` first.
    RecentlyCreated,
}

/// A complete book lookup: predicate, ordering and optional limit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookQuery {
    pub filter: BookFilter,
    pub order: BookOrder,
    pub limit: Option<usize>,
}

impl BookQuery {
    pub fn filtered(filter: BookFilter) -> Self {
        BookQuery {
            filter,
            ..Default::default()
        }
    }

    /// The catalog highlights: most recently created books.
    pub fn recent(limit: usize) -> Self {
        BookQuery {
            filter: BookFilter::default(),
            order: BookOrder::RecentlyCreated,
            limit: Some(limit),
        }
    }
}

/// Case folding shared by filter needles and the store's `fold_case` SQL
/// function. Codepoint lowercase only, no locale or diacritic handling.
pub fn fold_case(s: &str) -> String {
    s.to_lowercase()
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Parse a search date given as `YYYY-MM-DD`, `YYYY-MM` or `YYYY`.
///
/// Partial dates resolve to their first day.
pub fn parse_search_date(field: &'static str, value: &str) -> ValidationResult<NaiveDate> {
    let invalid = || ValidationError::InvalidDate {
        field,
        value: value.to_string(),
    };

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return if is_storable_date(date) {
            Ok(date)
        } else {
            Err(invalid())
        };
    }

    let mut parts = value.splitn(2, '-');
    let year_part = parts.next().unwrap_or_default();
    if year_part.len() != 4 || !year_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let year: i32 = year_part.parse().map_err(|_| invalid())?;
    let month: u32 = match parts.next() {
        None => 1,
        Some(m) if m.len() == 2 && m.bytes().all(|b| b.is_ascii_digit()) => {
            m.parse().map_err(|_| invalid())?
        }
        Some(_) => return Err(invalid()),
    };
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(
        title: Option<&str>,
        author_name: Option<&str>,
        after: Option<&str>,
        before: Option<&str>,
    ) -> BookSearchParams {
        BookSearchParams {
            title: title.map(str::to_string),
            author_name: author_name.map(str::to_string),
            published_after: after.map(str::to_string),
            published_before: before.map(str::to_string),
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_no_params_is_empty_filter() {
        let filter = BookFilter::from_params(&BookSearchParams::default()).unwrap();
        assert!(filter.is_empty());
    }

    #[test]
    fn test_empty_strings_are_ignored() {
        let filter =
            BookFilter::from_params(&params(Some(""), Some("  "), Some(""), Some(""))).unwrap();
        assert!(filter.is_empty());
    }

    #[test]
    fn test_text_needles_are_folded() {
        let filter = BookFilter::from_params(&params(Some("DuN"), Some("HERBERT"), None, None))
            .unwrap();
        assert_eq!(filter.title_contains.as_deref(), Some("dun"));
        assert_eq!(filter.author_name_contains.as_deref(), Some("herbert"));
        assert_eq!(filter.published_on_or_after, None);
    }

    #[test]
    fn test_non_ascii_needles_are_folded() {
        let filter = BookFilter::from_params(&params(Some("ÉTRANGER"), None, None, None)).unwrap();
        assert_eq!(filter.title_contains.as_deref(), Some("étranger"));
    }

    #[test]
    fn test_one_sided_and_closed_ranges() {
        let after = BookFilter::from_params(&params(None, None, Some("1995"), None)).unwrap();
        assert_eq!(after.published_on_or_after, Some(ymd(1995, 1, 1)));
        assert_eq!(after.published_on_or_before, None);

        let range =
            BookFilter::from_params(&params(None, None, Some("1985"), Some("1995-06-30")))
                .unwrap();
        assert_eq!(range.published_on_or_after, Some(ymd(1985, 1, 1)));
        assert_eq!(range.published_on_or_before, Some(ymd(1995, 6, 30)));
    }

    #[test]
    fn test_inverted_range_is_still_built() {
        let filter =
            BookFilter::from_params(&params(None, None, Some("2000"), Some("1990"))).unwrap();
        assert_eq!(filter.published_on_or_after, Some(ymd(2000, 1, 1)));
        assert_eq!(filter.published_on_or_before, Some(ymd(1990, 1, 1)));
    }

    #[test]
    fn test_parse_search_date_formats() {
        assert_eq!(parse_search_date("f", "2001-09-11").unwrap(), ymd(2001, 9, 11));
        assert_eq!(parse_search_date("f", "2001-09").unwrap(), ymd(2001, 9, 1));
        assert_eq!(parse_search_date("f", "2001").unwrap(), ymd(2001, 1, 1));
    }

    #[test]
    fn test_parse_search_date_rejects_garbage() {
        for value in ["yesterday", "01-02-2003", "2001-13", "2001-02-30", "99", "2001-9"] {
            let err = parse_search_date("publishedAfter", value).unwrap_err();
            assert_eq!(
                err,
                ValidationError::InvalidDate {
                    field: "publishedAfter",
                    value: value.to_string()
                }
            );
        }
    }

    #[test]
    fn test_parse_search_date_rejects_years_beyond_four_digits() {
        for value in ["+10000-01-01", "-0001-12-31"] {
            assert!(parse_search_date("publishedAfter", value).is_err(), "{}", value);
        }
        assert_eq!(parse_search_date("f", "9999-12-31").unwrap(), ymd(9999, 12, 31));
        assert_eq!(parse_search_date("f", "0000").unwrap(), ymd(0, 1, 1));
    }

    #[test]
    fn test_invalid_date_param_reports_field() {
        let err = BookFilter::from_params(&params(None, None, None, Some("soon"))).unwrap_err();
        assert_eq!(err.field(), "publishedBefore");
    }

    #[test]
    fn test_author_filter_from_name() {
        assert_eq!(AuthorFilter::from_name(None), AuthorFilter::default());
        assert_eq!(AuthorFilter::from_name(Some("")), AuthorFilter::default());
        assert_eq!(
            AuthorFilter::from_name(Some("Le Guin")).name_contains.as_deref(),
            Some("le guin")
        );
    }

    #[test]
    fn test_recent_query() {
        let query = BookQuery::recent(10);
        assert_eq!(query.order, BookOrder::RecentlyCreated);
        assert_eq!(query.limit, Some(10));
        assert!(query.filter.is_empty());
    }
}
