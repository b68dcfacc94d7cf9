//! Query parameter validation.
//!
//! Clients talk to the API through four query parameters: `search`, `count`,
//! `limit`, and `skip`. Everything else is rejected up front. Validation
//! produces a [`QueryParams`] record that downstream compilation can trust:
//! integers are parsed, mode-dependent ceilings are enforced, and defaults
//! are filled in.

use std::collections::HashMap;

use thiserror::Error;

/// The only parameter names accepted on the search endpoint.
pub const EXPECTED_PARAMS: [&str; 4] = ["search", "count", "limit", "skip"];

/// Ceiling for `limit` on plain search requests.
pub const SEARCH_LIMIT_MAX: u32 = 100;

/// Ceiling for `limit` on count requests.
pub const COUNT_LIMIT_MAX: u32 = 1000;

const SEARCH_LIMIT_DEFAULT: u32 = 1;
const COUNT_LIMIT_DEFAULT: u32 = 100;

/// Rejections produced while validating the raw parameter map.
///
/// Every variant is a client error; the HTTP layer maps all of them to
/// `400 BAD_REQUEST`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParamError {
    #[error("invalid parameter: {0}")]
    UnknownParameter(String),
    #[error("invalid limit")]
    InvalidLimit,
    #[error("invalid skip")]
    InvalidSkip,
    #[error("limit exceeds 100 for search requests; use skip for more results")]
    SearchLimitExceeded,
    #[error("limit exceeds 1000 for count requests")]
    CountLimitExceeded,
    #[error("skip not allowed with count")]
    SkipWithCount,
}

/// Validated, canonical request parameters.
///
/// Constructed only by [`check_params`]; by construction it carries nothing
/// beyond the four expected fields. `search` and `count` may both be set
/// (count picks the aggregation field while search still filters the
/// document set), but `skip` never coexists with `count`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
    /// Free-text query string, untouched at this stage.
    pub search: Option<String>,
    /// Field name to facet on.
    pub count: Option<String>,
    /// Page size for search requests, bucket count for term counts.
    pub limit: u32,
    /// Result offset. Always 0 for count requests.
    pub skip: u32,
}

/// Validate the raw client parameter map into a [`QueryParams`] record.
///
/// Rules apply in order and the first failure wins:
///
/// 1. every key must be one of [`EXPECTED_PARAMS`];
/// 2. `limit` and `skip` must parse as non-negative integers;
/// 3. `limit` must stay within the mode-dependent ceiling
///    ([`SEARCH_LIMIT_MAX`] without `count`, [`COUNT_LIMIT_MAX`] with it);
/// 4. `skip` cannot be combined with `count`;
/// 5. missing values default to `skip = 0` and `limit = 100` for count
///    requests or `limit = 1` otherwise.
///
/// Empty-string `search` and `count` values are treated as absent.
pub fn check_params(raw: &HashMap<String, String>) -> Result<QueryParams, ParamError> {
    for key in raw.keys() {
        if !EXPECTED_PARAMS.contains(&key.as_str()) {
            return Err(ParamError::UnknownParameter(key.clone()));
        }
    }

    let limit = raw
        .get("limit")
        .map(|value| value.parse::<u32>().map_err(|_| ParamError::InvalidLimit))
        .transpose()?;
    let skip = raw
        .get("skip")
        .map(|value| value.parse::<u32>().map_err(|_| ParamError::InvalidSkip))
        .transpose()?;

    let search = raw.get("search").filter(|v| !v.is_empty()).cloned();
    let count = raw.get("count").filter(|v| !v.is_empty()).cloned();

    if let Some(limit) = limit {
        if count.is_none() && limit > SEARCH_LIMIT_MAX {
            return Err(ParamError::SearchLimitExceeded);
        }
        if count.is_some() && limit > COUNT_LIMIT_MAX {
            return Err(ParamError::CountLimitExceeded);
        }
    }

    if count.is_some() && skip.is_some() {
        return Err(ParamError::SkipWithCount);
    }

    let limit = limit.unwrap_or(if count.is_some() {
        COUNT_LIMIT_DEFAULT
    } else {
        SEARCH_LIMIT_DEFAULT
    });

    Ok(QueryParams {
        search,
        count,
        limit,
        skip: skip.unwrap_or(0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = check_params(&raw(&[("api_key", "xyz")])).unwrap_err();
        assert_eq!(err, ParamError::UnknownParameter("api_key".into()));
        assert_eq!(err.to_string(), "invalid parameter: api_key");

        let err = check_params(&raw(&[("search", "active"), ("fields", "a,b")])).unwrap_err();
        assert_eq!(err, ParamError::UnknownParameter("fields".into()));
    }

    #[test]
    fn non_numeric_limit_and_skip_fail() {
        assert_eq!(
            check_params(&raw(&[("limit", "ten")])).unwrap_err(),
            ParamError::InvalidLimit
        );
        assert_eq!(
            check_params(&raw(&[("limit", "")])).unwrap_err(),
            ParamError::InvalidLimit
        );
        assert_eq!(
            check_params(&raw(&[("skip", "2.5")])).unwrap_err(),
            ParamError::InvalidSkip
        );
        assert_eq!(
            check_params(&raw(&[("skip", "-1")])).unwrap_err(),
            ParamError::InvalidSkip
        );
    }

    #[test]
    fn search_limit_ceiling_is_100() {
        let params = check_params(&raw(&[("search", "x"), ("limit", "100")])).unwrap();
        assert_eq!(params.limit, 100);

        let err = check_params(&raw(&[("search", "x"), ("limit", "101")])).unwrap_err();
        assert_eq!(err, ParamError::SearchLimitExceeded);
        assert_eq!(
            err.to_string(),
            "limit exceeds 100 for search requests; use skip for more results"
        );
    }

    #[test]
    fn count_limit_ceiling_is_1000() {
        let params = check_params(&raw(&[("count", "foo"), ("limit", "1000")])).unwrap();
        assert_eq!(params.limit, 1000);

        let err = check_params(&raw(&[("count", "foo"), ("limit", "1001")])).unwrap_err();
        assert_eq!(err, ParamError::CountLimitExceeded);
    }

    #[test]
    fn skip_is_rejected_with_count() {
        let err = check_params(&raw(&[("count", "foo"), ("skip", "10")])).unwrap_err();
        assert_eq!(err, ParamError::SkipWithCount);

        // Other fields do not rescue the combination.
        let err =
            check_params(&raw(&[("count", "foo"), ("skip", "10"), ("search", "x")])).unwrap_err();
        assert_eq!(err, ParamError::SkipWithCount);
    }

    #[test]
    fn defaults_are_asymmetric() {
        let params = check_params(&HashMap::new()).unwrap();
        assert_eq!(params.skip, 0);
        assert_eq!(params.limit, 1);
        assert_eq!(params.search, None);
        assert_eq!(params.count, None);

        let params = check_params(&raw(&[("count", "foo")])).unwrap();
        assert_eq!(params.skip, 0);
        assert_eq!(params.limit, 100);
        assert_eq!(params.count.as_deref(), Some("foo"));
    }

    #[test]
    fn empty_search_and_count_behave_as_absent() {
        let params = check_params(&raw(&[("search", ""), ("count", "")])).unwrap();
        assert_eq!(params.search, None);
        assert_eq!(params.count, None);
        // No count mode, so the plain-search default applies.
        assert_eq!(params.limit, 1);
    }

    #[test]
    fn search_and_count_may_coexist() {
        let params = check_params(&raw(&[("search", "status:active"), ("count", "status")]))
            .unwrap();
        assert_eq!(params.search.as_deref(), Some("status:active"));
        assert_eq!(params.count.as_deref(), Some("status"));
        assert_eq!(params.limit, 100);
    }
}
