//! Search request compilation.
//!
//! Turns a validated [`QueryParams`] record into a backend-agnostic
//! [`SearchRequest`]: a query clause, an optional facet over the `count`
//! field, and pagination for non-count requests. The free-text query string
//! is checked against a conservative lexical allow-list before it is ever
//! forwarded, and `.exact` field suffixes under the `openfda.` namespace are
//! rewritten to the `_exact` form actually stored in the index.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::params::QueryParams;

/// Fields indexed as dates. Counting on one of these produces a daily
/// date-histogram facet instead of a terms facet.
pub const DATE_FIELDS: [&str; 8] = [
    // FAERS
    "drugstartdate",
    "drugenddate",
    "patient.patientdeath.patientdeathdate",
    "receiptdate",
    "receivedate",
    "transmissiondate",
    // RES
    "report_date",
    "recall_initiation_date",
];

// Supported characters:
// all letters and numbers
// . for long.field.names
// _ for other_fields
// : for fields
// ( ) for grouping
// " for quoting
// [ ] and { } for ranges
// >, < and = for ranges
// - for dates and boolean
// + for boolean
// space for terms
static SUPPORTED_QUERY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^[0-9a-zA-Z._:()"\[\]{}><=+\- ]+$"#).expect("supported-query pattern")
});

// The openfda section stores field_exact rather than field.exact.
static EXACT_SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"openfda\.([\w.]+)\.exact").expect("exact-suffix pattern"));

/// Rejections produced while compiling a search request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("unsupported query syntax: {0}")]
    UnsupportedSyntax(String),
}

/// Query clause of a compiled request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryClause {
    /// Match every document. Used when no search text was supplied.
    MatchAll,
    /// Full query-string query over the (rewritten) search text.
    QueryString(String),
}

/// Facet clause of a compiled count request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Aggregation {
    /// Term counts over `field`, returning at most `size` buckets.
    Terms { field: String, size: u32 },
    /// Daily buckets over a date-valued `field`, ordered by time.
    DateHistogram { field: String },
}

/// `from`/`size` window attached to non-count requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub from: u32,
    pub size: u32,
}

/// Compiled backend search request.
///
/// Built fresh per request by [`build_query`] and handed to the backend
/// client; never partially constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: QueryClause,
    pub aggregation: Option<Aggregation>,
    pub pagination: Option<Pagination>,
}

/// Whether `query` consists solely of supported query-string characters.
///
/// This is a lexical check over the whole string, not a parse: it exists to
/// keep wildcards, regex fields, fuzziness, proximity, and boosting out of
/// the backend, while letting ranges, boolean operators, field scoping,
/// quoting, and `_missing_`/`_exists_` checks through. It can both under-
/// and over-reject relative to what the backend could actually execute.
pub fn supported_query_string(query: &str) -> bool {
    SUPPORTED_QUERY_RE.is_match(query)
}

/// Rewrite `.exact` field suffixes under the `openfda.` namespace to the
/// `_exact` form stored in the index.
///
/// Paths outside `openfda.` keep their literal `.exact` suffix. Applying the
/// rewrite twice is a no-op.
pub fn replace_exact(search_or_count: &str) -> String {
    EXACT_SUFFIX_RE
        .replace_all(search_or_count, "openfda.${1}_exact")
        .into_owned()
}

/// Compile validated parameters into a [`SearchRequest`].
///
/// The search text must pass [`supported_query_string`] before rewriting;
/// otherwise compilation fails with the offending text in the error. When
/// `count` is set, the facet field is rewritten independently of the search
/// text and pagination is omitted (the facet's own size governs the result
/// count).
pub fn build_query(params: &QueryParams) -> Result<SearchRequest, QueryError> {
    let query = match params.search.as_deref() {
        Some(search) => {
            if !supported_query_string(search) {
                return Err(QueryError::UnsupportedSyntax(search.to_string()));
            }
            QueryClause::QueryString(replace_exact(search))
        }
        None => QueryClause::MatchAll,
    };

    let aggregation = params.count.as_deref().map(|count| {
        let field = replace_exact(count);
        if DATE_FIELDS.contains(&field.as_str()) {
            Aggregation::DateHistogram { field }
        } else {
            Aggregation::Terms {
                field,
                size: params.limit,
            }
        }
    });

    let pagination = match params.count {
        None => Some(Pagination {
            from: params.skip,
            size: params.limit,
        }),
        Some(_) => None,
    };

    Ok(SearchRequest {
        query,
        aggregation,
        pagination,
    })
}
