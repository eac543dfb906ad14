//! Server Listing Filter Pipeline
//!
//! Turns the optional query parameters of `GET /api/v1/servers/` into a
//! filtered, possibly-annotated, possibly-truncated list of server records.
//!
//! The pipeline is pure: parameters are parsed once into an immutable
//! [`ServerListQuery`], the identity-scoped capability check runs exactly
//! once per request ([`ServerListParams::authorize`]), and each stage
//! consumes the previous result and returns a new one. Storage access
//! happens before the pipeline runs; no stage touches the database.

use std::collections::HashMap;

use crate::domain::ServerRecord;
use crate::shared::error::AppError;

/// Errors surfaced by parameter parsing and the filter stages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    /// An identity-scoped parameter was used without an authenticated caller.
    #[error("Authentication required")]
    AuthenticationRequired,

    /// A parameter that must be an integer could not be parsed.
    #[error("Value error")]
    ValueError,

    /// `by_serverid` named an id with no matching record.
    #[error("Server with id {0} not found")]
    ServerNotFound(i64),
}

impl From<FilterError> for AppError {
    fn from(err: FilterError) -> Self {
        match err {
            FilterError::AuthenticationRequired => {
                AppError::Unauthorized("Authentication required".into())
            }
            // Both of these surface as validation failures with a detail
            // string, so a missing id is 400 here, not 404.
            FilterError::ValueError => AppError::Validation("Value error".into()),
            FilterError::ServerNotFound(id) => {
                AppError::Validation(format!("Server with id {id} not found"))
            }
        }
    }
}

/// Raw listing parameters as read from the query string.
///
/// Parsing is deliberately split in two phases: extraction here is
/// infallible so that the capability check can run before any value
/// error surfaces (an unauthenticated caller with a malformed
/// `by_serverid` must see 401, not 400).
#[derive(Debug, Clone, Default)]
pub struct ServerListParams {
    pub category: Option<String>,
    pub qty: Option<String>,
    pub by_user: bool,
    pub by_serverid: Option<String>,
    pub with_num_members: bool,
}

impl ServerListParams {
    /// Extract listing parameters from a decoded query-string map.
    /// Absent and empty parameters are no-ops; flags are set only by
    /// the literal string `"true"`.
    pub fn from_query(params: &HashMap<String, String>) -> Self {
        // `?category=` and `?category=x` differ in the query string but
        // not in effect: an empty value behaves like an absent key, so
        // it can neither demand authentication nor fail to parse.
        fn non_empty(params: &HashMap<String, String>, key: &str) -> Option<String> {
            params
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        }

        Self {
            category: non_empty(params, "category"),
            qty: non_empty(params, "qty"),
            by_user: params.get("by_user").map(String::as_str) == Some("true"),
            by_serverid: non_empty(params, "by_serverid"),
            with_num_members: params.get("with_num_members").map(String::as_str)
                == Some("true"),
        }
    }

    /// Whether any identity-scoped parameter is present.
    pub fn requires_auth(&self) -> bool {
        self.by_user || self.by_serverid.is_some()
    }

    /// The single capability check for this request: identity-scoped
    /// parameters demand an authenticated caller.
    pub fn authorize(&self, caller: Option<i64>) -> Result<(), FilterError> {
        if self.requires_auth() && caller.is_none() {
            return Err(FilterError::AuthenticationRequired);
        }
        Ok(())
    }

    /// Parse the integer-valued parameters into an immutable query.
    ///
    /// A `by_serverid` or `qty` value that is not an integer is a
    /// validation failure, so both parameters fail the same way.
    pub fn parse(&self) -> Result<ServerListQuery, FilterError> {
        let by_serverid = match &self.by_serverid {
            Some(raw) => Some(raw.trim().parse::<i64>().map_err(|_| FilterError::ValueError)?),
            None => None,
        };

        let qty = match &self.qty {
            Some(raw) => Some(raw.trim().parse::<usize>().map_err(|_| FilterError::ValueError)?),
            None => None,
        };

        Ok(ServerListQuery {
            category: self.category.clone(),
            qty,
            by_user: self.by_user,
            by_serverid,
            with_num_members: self.with_num_members,
        })
    }
}

/// A fully-parsed, immutable listing query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerListQuery {
    pub category: Option<String>,
    pub qty: Option<usize>,
    pub by_user: bool,
    pub by_serverid: Option<i64>,
    pub with_num_members: bool,
}

/// A server record that survived the pipeline, with its optional
/// member-count annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerListing {
    pub server: ServerRecord,
    /// Present iff `with_num_members=true` was requested.
    pub num_members: Option<i64>,
}

impl ServerListQuery {
    /// Run the filter pipeline over records fetched in storage order.
    ///
    /// Stage order is fixed: category, membership, annotation, id,
    /// quantity. Each stage narrows (or annotates) the previous stage's
    /// output; omitted parameters leave the working set untouched.
    ///
    /// The caller must already have passed [`ServerListParams::authorize`];
    /// with an unauthenticated caller the membership stage matches nothing.
    pub fn apply(
        &self,
        records: Vec<ServerRecord>,
        caller: Option<i64>,
    ) -> Result<Vec<ServerListing>, FilterError> {
        let records = self.filter_category(records);
        let records = self.filter_membership(records, caller);
        let listings = self.annotate_member_counts(records);
        let listings = self.filter_server_id(listings)?;
        Ok(self.truncate(listings))
    }

    /// Keep records whose category name equals the parameter. An unknown
    /// category name yields an empty result, not an error.
    fn filter_category(&self, records: Vec<ServerRecord>) -> Vec<ServerRecord> {
        match &self.category {
            Some(name) => records
                .into_iter()
                .filter(|r| r.category.as_ref().map(|c| c.name.as_str()) == Some(name.as_str()))
                .collect(),
            None => records,
        }
    }

    /// Keep records where the caller appears in the member set.
    fn filter_membership(
        &self,
        records: Vec<ServerRecord>,
        caller: Option<i64>,
    ) -> Vec<ServerRecord> {
        if !self.by_user {
            return records;
        }
        records
            .into_iter()
            .filter(|r| caller.is_some_and(|id| r.has_member(id)))
            .collect()
    }

    /// Attach member counts when requested; otherwise mark the annotation
    /// absent so serialization omits the field entirely.
    fn annotate_member_counts(&self, records: Vec<ServerRecord>) -> Vec<ServerListing> {
        records
            .into_iter()
            .map(|server| ServerListing {
                num_members: self
                    .with_num_members
                    .then(|| server.member_ids.len() as i64),
                server,
            })
            .collect()
    }

    /// Keep the single record with the requested id; an unmatched id is a
    /// validation failure naming it.
    fn filter_server_id(
        &self,
        listings: Vec<ServerListing>,
    ) -> Result<Vec<ServerListing>, FilterError> {
        let Some(id) = self.by_serverid else {
            return Ok(listings);
        };
        let kept: Vec<ServerListing> =
            listings.into_iter().filter(|l| l.server.id == id).collect();
        if kept.is_empty() {
            return Err(FilterError::ServerNotFound(id));
        }
        Ok(kept)
    }

    /// Truncate to the first `qty` records in storage order. A `qty`
    /// larger than the working set is a no-op.
    fn truncate(&self, listings: Vec<ServerListing>) -> Vec<ServerListing> {
        match self.qty {
            Some(qty) => listings.into_iter().take(qty).collect(),
            None => listings,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;
    use crate::domain::CategoryRef;

    fn record(id: i64, category: Option<&str>, member_ids: Vec<i64>) -> ServerRecord {
        ServerRecord {
            id,
            name: format!("server-{id}"),
            owner_id: 1,
            category: category.map(|name| CategoryRef {
                id: 10,
                name: name.to_string(),
            }),
            description: None,
            member_ids,
        }
    }

    fn params(pairs: &[(&str, &str)]) -> ServerListParams {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerListParams::from_query(&map)
    }

    fn surviving_ids(listings: &[ServerListing]) -> Vec<i64> {
        listings.iter().map(|l| l.server.id).collect()
    }

    #[test]
    fn no_parameters_returns_everything_in_storage_order() {
        let records = vec![record(1, None, vec![]), record(2, None, vec![]), record(3, None, vec![])];
        let query = params(&[]).parse().unwrap();
        let listings = query.apply(records, None).unwrap();
        assert_eq!(surviving_ids(&listings), vec![1, 2, 3]);
        assert!(listings.iter().all(|l| l.num_members.is_none()));
    }

    #[test]
    fn category_filter_keeps_only_matching_names() {
        let records = vec![
            record(1, Some("gaming"), vec![]),
            record(2, Some("music"), vec![]),
            record(3, Some("gaming"), vec![]),
            record(4, None, vec![]),
        ];
        let query = params(&[("category", "gaming")]).parse().unwrap();
        let listings = query.apply(records, None).unwrap();
        assert_eq!(surviving_ids(&listings), vec![1, 3]);
    }

    #[test]
    fn unknown_category_yields_empty_result_not_error() {
        let records = vec![record(1, Some("gaming"), vec![])];
        let query = params(&[("category", "cooking")]).parse().unwrap();
        let listings = query.apply(records, None).unwrap();
        assert!(listings.is_empty());
    }

    #[test]
    fn by_user_requires_authentication() {
        let err = params(&[("by_user", "true")]).authorize(None).unwrap_err();
        assert_eq!(err, FilterError::AuthenticationRequired);
    }

    #[test]
    fn by_user_keeps_exactly_the_callers_memberships() {
        let records = vec![
            record(1, None, vec![7, 8]),
            record(2, None, vec![8]),
            record(3, None, vec![7]),
        ];
        let raw = params(&[("by_user", "true")]);
        raw.authorize(Some(7)).unwrap();
        let query = raw.parse().unwrap();
        let listings = query.apply(records, Some(7)).unwrap();
        assert_eq!(surviving_ids(&listings), vec![1, 3]);
    }

    #[test]
    fn by_serverid_returns_exactly_one_record() {
        let records = vec![record(1, None, vec![]), record(2, None, vec![])];
        let query = params(&[("by_serverid", "2")]).parse().unwrap();
        let listings = query.apply(records, Some(7)).unwrap();
        assert_eq!(surviving_ids(&listings), vec![2]);
    }

    #[test]
    fn by_serverid_unknown_id_names_the_missing_id() {
        let records = vec![record(1, None, vec![])];
        let query = params(&[("by_serverid", "999")]).parse().unwrap();
        let err = query.apply(records, Some(7)).unwrap_err();
        assert_eq!(err, FilterError::ServerNotFound(999));
        assert_eq!(err.to_string(), "Server with id 999 not found");
    }

    #[test]
    fn by_serverid_non_numeric_is_a_value_error() {
        let err = params(&[("by_serverid", "abc")]).parse().unwrap_err();
        assert_eq!(err, FilterError::ValueError);
        assert_eq!(err.to_string(), "Value error");
    }

    #[test]
    fn authentication_failure_wins_over_malformed_serverid() {
        // 401 must fire before the value error surfaces.
        let raw = params(&[("by_serverid", "abc")]);
        assert_eq!(raw.authorize(None), Err(FilterError::AuthenticationRequired));
    }

    // Malformed qty is a validation failure, matching by_serverid.
    #[test_case("abc")]
    #[test_case("-1")]
    #[test_case("2.5")]
    fn malformed_qty_is_a_value_error(raw: &str) {
        let err = params(&[("qty", raw)]).parse().unwrap_err();
        assert_eq!(err, FilterError::ValueError);
    }

    #[test]
    fn qty_truncates_to_the_first_n_in_storage_order() {
        let records: Vec<ServerRecord> = (1..=10).map(|id| record(id, None, vec![])).collect();
        let query = params(&[("qty", "3")]).parse().unwrap();
        let listings = query.apply(records, None).unwrap();
        assert_eq!(surviving_ids(&listings), vec![1, 2, 3]);
    }

    #[test]
    fn qty_larger_than_the_result_set_is_a_noop() {
        let records = vec![record(1, None, vec![]), record(2, None, vec![])];
        let query = params(&[("qty", "50")]).parse().unwrap();
        let listings = query.apply(records, None).unwrap();
        assert_eq!(surviving_ids(&listings), vec![1, 2]);
    }

    #[test]
    fn with_num_members_counts_true_cardinality() {
        let records = vec![record(1, None, vec![5, 6, 7]), record(2, None, vec![])];
        let query = params(&[("with_num_members", "true")]).parse().unwrap();
        let listings = query.apply(records, None).unwrap();
        assert_eq!(listings[0].num_members, Some(3));
        assert_eq!(listings[1].num_members, Some(0));
    }

    #[test]
    fn non_true_flag_values_are_ignored() {
        let raw = params(&[("by_user", "yes"), ("with_num_members", "1")]);
        assert!(!raw.by_user);
        assert!(!raw.with_num_members);
        assert!(!raw.requires_auth());
    }

    #[test]
    fn empty_category_value_behaves_like_an_absent_parameter() {
        let records = vec![record(1, Some("gaming"), vec![]), record(2, None, vec![])];
        let query = params(&[("category", "")]).parse().unwrap();
        let listings = query.apply(records, None).unwrap();
        assert_eq!(surviving_ids(&listings), vec![1, 2]);
    }

    #[test]
    fn empty_by_serverid_neither_requires_auth_nor_filters() {
        let raw = params(&[("by_serverid", "")]);
        assert!(!raw.requires_auth());
        raw.authorize(None).unwrap();
        let records = vec![record(1, None, vec![]), record(2, None, vec![])];
        let listings = raw.parse().unwrap().apply(records, None).unwrap();
        assert_eq!(surviving_ids(&listings), vec![1, 2]);
    }

    #[test_case("" ; "empty")]
    #[test_case("   " ; "whitespace")]
    fn empty_qty_value_is_a_noop_not_a_value_error(raw: &str) {
        let records = vec![record(1, None, vec![]), record(2, None, vec![])];
        let query = params(&[("qty", raw)]).parse().unwrap();
        let listings = query.apply(records, None).unwrap();
        assert_eq!(surviving_ids(&listings), vec![1, 2]);
    }

    #[test]
    fn combined_category_annotation_and_qty_scenario() {
        // Five gaming servers with member counts [3, 1, 4, 0, 2] in
        // storage order; qty=2 keeps the first two with counts 3 and 1.
        let records = vec![
            record(1, Some("gaming"), vec![1, 2, 3]),
            record(2, Some("gaming"), vec![4]),
            record(3, Some("gaming"), vec![1, 2, 3, 4]),
            record(4, Some("gaming"), vec![]),
            record(5, Some("gaming"), vec![2, 3]),
        ];
        let query = params(&[
            ("category", "gaming"),
            ("with_num_members", "true"),
            ("qty", "2"),
        ])
        .parse()
        .unwrap();
        let listings = query.apply(records, None).unwrap();
        assert_eq!(surviving_ids(&listings), vec![1, 2]);
        assert_eq!(listings[0].num_members, Some(3));
        assert_eq!(listings[1].num_members, Some(1));
    }

    #[test]
    fn filters_compose_with_and_semantics() {
        let records = vec![
            record(1, Some("gaming"), vec![7]),
            record(2, Some("gaming"), vec![8]),
            record(3, Some("music"), vec![7]),
        ];
        let query = params(&[("category", "gaming"), ("by_user", "true")])
            .parse()
            .unwrap();
        let listings = query.apply(records, Some(7)).unwrap();
        assert_eq!(surviving_ids(&listings), vec![1]);
    }

    #[test]
    fn filter_errors_map_to_app_errors() {
        assert!(matches!(
            AppError::from(FilterError::AuthenticationRequired),
            AppError::Unauthorized(_)
        ));
        assert!(matches!(
            AppError::from(FilterError::ValueError),
            AppError::Validation(msg) if msg == "Value error"
        ));
        assert!(matches!(
            AppError::from(FilterError::ServerNotFound(1234)),
            AppError::Validation(msg) if msg == "Server with id 1234 not found"
        ));
    }
}
