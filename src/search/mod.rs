//! Translation of list query parameters into store filters and paging.
use crate::models::Price;
use crate::store::{Filter, FindOptions, Sort, SortDirection};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_RESULTS_PER_PAGE: u64 = 10;
pub const DEFAULT_SORT: &str = "createdAt";

#[derive(Debug, Error, PartialEq)]
#[error("invalid {param}: {reason}")]
pub struct SearchError {
    pub param: &'static str,
    pub reason: String,
}

impl SearchError {
    fn new(param: &'static str, reason: impl ToString) -> Self {
        Self {
            param,
            reason: reason.to_string(),
        }
    }
}

/// Search parameters for property listings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PropertySearch {
    /// Free text matched against title, description and features
    pub search: Option<String>,
    pub owner_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub town: Option<String>,
    pub county: Option<String>,
    /// Matched as a case-insensitive prefix
    pub postcode: Option<String>,
    /// Lower price bound in pounds
    pub price_low: Option<String>,
    /// Upper price bound in pounds
    pub price_high: Option<String>,
}

/// Search parameters for messages
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MessageSearch {
    pub status: Option<String>,
    pub property_id: Option<String>,
    pub receiver_user_id: Option<String>,
    pub sender_email: Option<String>,
}

impl PropertySearch {
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        Self {
            search: non_empty(params, "search"),
            owner_id: non_empty(params, "ownerId"),
            kind: non_empty(params, "type"),
            status: non_empty(params, "status"),
            priority: non_empty(params, "priority"),
            town: non_empty(params, "town"),
            county: non_empty(params, "county"),
            postcode: non_empty(params, "postcode"),
            price_low: non_empty(params, "priceLow"),
            price_high: non_empty(params, "priceHigh"),
        }
    }

    /// Builds the list of filters to AND onto the access filter.
    pub fn to_filters(&self) -> Result<Vec<Filter>, SearchError> {
        let mut query = Vec::new();
        push_eq(&mut query, "ownerId", &self.owner_id);
        push_eq(&mut query, "type", &self.kind);
        push_eq(&mut query, "status", &self.status);
        push_eq(&mut query, "priority", &self.priority);
        push_eq(&mut query, "location.town", &self.town);
        push_eq(&mut query, "location.county", &self.county);
        if let Some(postcode) = &self.postcode {
            query.push(Filter::regex(
                "location.postcode",
                format!("^{}", regex::escape(postcode)),
            ));
        }
        if let Some(low) = &self.price_low {
            let price = Price::parse_pounds(low).map_err(|e| SearchError::new("priceLow", e))?;
            query.push(Filter::Gte("price".into(), price.pence()));
        }
        if let Some(high) = &self.price_high {
            let price = Price::parse_pounds(high).map_err(|e| SearchError::new("priceHigh", e))?;
            query.push(Filter::Lte("price".into(), price.pence()));
        }
        if let Some(search) = &self.search {
            regex::Regex::new(search).map_err(|e| SearchError::new("search", e))?;
            query.push(Filter::Or(
                ["title", "description", "features"]
                    .into_iter()
                    .map(|path| Filter::regex(path, search.clone()))
                    .collect(),
            ));
        }
        Ok(query)
    }
}

impl MessageSearch {
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        Self {
            status: non_empty(params, "status"),
            property_id: non_empty(params, "propertyId"),
            receiver_user_id: non_empty(params, "receiverUserId"),
            sender_email: non_empty(params, "senderEmail"),
        }
    }

    pub fn to_filters(&self) -> Vec<Filter> {
        let mut query = Vec::new();
        push_eq(&mut query, "status", &self.status);
        push_eq(&mut query, "propertyId", &self.property_id);
        push_eq(&mut query, "receiverUserId", &self.receiver_user_id);
        push_eq(&mut query, "senderEmail", &self.sender_email);
        query
    }
}

fn non_empty(params: &HashMap<String, String>, key: &str) -> Option<String> {
    params
        .get(key)
        .filter(|value| !value.is_empty())
        .cloned()
}

fn push_eq(query: &mut Vec<Filter>, path: &str, value: &Option<String>) {
    if let Some(value) = value {
        query.push(Filter::eq(path, value.as_str()));
    }
}

/// Paging and ordering of a list request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub results_per_page: u64,
    pub sort: String,
    pub direction: SortDirection,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            results_per_page: DEFAULT_RESULTS_PER_PAGE,
            sort: DEFAULT_SORT.to_string(),
            direction: SortDirection::Desc,
        }
    }
}

impl Pagination {
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, SearchError> {
        let mut pagination = Self::default();
        if let Some(page) = params.get("page") {
            pagination.page = positive(page, "page")?;
        }
        if let Some(per_page) = params.get("resultsPerPage") {
            pagination.results_per_page = positive(per_page, "resultsPerPage")?;
        }
        if let Some(sort) = params.get("sort").filter(|s| !s.is_empty()) {
            pagination.sort = sort.clone();
        }
        if let Some(direction) = params.get("sortDirection") {
            pagination.direction = match direction.as_str() {
                "asc" => SortDirection::Asc,
                "desc" => SortDirection::Desc,
                other => {
                    return Err(SearchError::new(
                        "sortDirection",
                        format!("expected asc or desc, got {other}"),
                    ))
                }
            };
        }
        Ok(pagination)
    }

    pub fn find_options(&self) -> FindOptions {
        FindOptions {
            sort: Some(Sort {
                path: self.sort.clone(),
                direction: self.direction,
            }),
            skip: (self.page - 1).saturating_mul(self.results_per_page),
            limit: Some(self.results_per_page),
        }
    }

    pub fn page_count(&self, total: u64) -> u64 {
        total.div_ceil(self.results_per_page)
    }
}

fn positive(value: &str, param: &'static str) -> Result<u64, SearchError> {
    match value.parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(SearchError::new(param, "expected a positive integer")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn render(filters: &[Filter]) -> Value {
        Value::Array(filters.iter().map(Filter::to_document).collect())
    }

    #[test]
    fn property_query_from_all_parameters() {
        let search = PropertySearch::from_params(&params(&[
            ("search", "search phrase"),
            ("ownerId", "123"),
            ("type", "flat"),
            ("status", "listed"),
            ("priority", "normal"),
            ("town", "town"),
            ("county", "county"),
            ("postcode", "postcode"),
            ("priceLow", "1"),
            ("priceHigh", "100"),
        ]));
        let expected = json!([
            { "ownerId": "123" },
            { "type": "flat" },
            { "status": "listed" },
            { "priority": "normal" },
            { "location.town": "town" },
            { "location.county": "county" },
            { "location.postcode": { "$regex": "^postcode", "$options": "i" } },
            { "price": { "$gte": 100 } },
            { "price": { "$lte": 10000 } },
            { "$or": [
                { "title": { "$regex": "search phrase", "$options": "i" } },
                { "description": { "$regex": "search phrase", "$options": "i" } },
                { "features": { "$regex": "search phrase", "$options": "i" } }
            ]}
        ]);
        assert_eq!(render(&search.to_filters().unwrap()), expected);
    }

    #[test]
    fn property_query_from_no_parameters() {
        let search = PropertySearch::from_params(&HashMap::new());
        assert!(search.to_filters().unwrap().is_empty());
    }

    #[test]
    fn empty_values_are_ignored() {
        let search = PropertySearch::from_params(&params(&[("town", ""), ("page", "2")]));
        assert_eq!(search, PropertySearch::default());
    }

    #[test]
    fn fractional_price_bounds_convert_to_pence() {
        let search = PropertySearch {
            price_low: Some("99.99".into()),
            ..Default::default()
        };
        assert_eq!(
            search.to_filters().unwrap(),
            vec![Filter::Gte("price".into(), 9999)]
        );
    }

    #[test]
    fn bad_price_names_the_parameter() {
        let search = PropertySearch {
            price_high: Some("lots".into()),
            ..Default::default()
        };
        assert_eq!(search.to_filters().unwrap_err().param, "priceHigh");
    }

    #[test]
    fn postcode_prefix_is_literal() {
        let search = PropertySearch {
            postcode: Some("CV1.".into()),
            ..Default::default()
        };
        let filters = search.to_filters().unwrap();
        assert!(filters[0].matches(&json!({ "location": { "postcode": "cv1. 5fb" } })));
        assert!(!filters[0].matches(&json!({ "location": { "postcode": "CV15 5FB" } })));
    }

    #[test]
    fn message_query_uses_equality() {
        let search = MessageSearch::from_params(&params(&[
            ("status", "sent"),
            ("propertyId", "p1"),
        ]));
        assert_eq!(
            render(&search.to_filters()),
            json!([{ "status": "sent" }, { "propertyId": "p1" }])
        );
    }

    #[test]
    fn pagination_defaults() {
        let pagination = Pagination::from_params(&HashMap::new()).unwrap();
        assert_eq!(pagination, Pagination::default());
        let options = pagination.find_options();
        assert_eq!(options.skip, 0);
        assert_eq!(options.limit, Some(10));
        assert_eq!(
            options.sort,
            Some(Sort {
                path: "createdAt".into(),
                direction: SortDirection::Desc
            })
        );
    }

    #[test]
    fn pagination_skips_earlier_pages() {
        let pagination = Pagination::from_params(&params(&[
            ("page", "3"),
            ("resultsPerPage", "5"),
            ("sort", "price"),
            ("sortDirection", "asc"),
        ]))
        .unwrap();
        assert_eq!(pagination.find_options().skip, 10);
        assert_eq!(pagination.direction, SortDirection::Asc);
        assert_eq!(pagination.page_count(11), 3);
        assert_eq!(pagination.page_count(0), 0);
    }

    #[test]
    fn pagination_rejects_zero_and_unknown_directions() {
        let err = Pagination::from_params(&params(&[("page", "0")])).unwrap_err();
        assert_eq!(err.param, "page");
        let err = Pagination::from_params(&params(&[("sortDirection", "up")])).unwrap_err();
        assert_eq!(err.param, "sortDirection");
    }
}
