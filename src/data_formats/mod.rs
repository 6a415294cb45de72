mod request;
mod response;
mod wrapper;

pub use request::*;
pub use response::*;
pub use wrapper::*;

use serde::{Deserialize, Serialize};

use crate::catalog::{Maintenance, SmartPickFacets, SortKey, Usage};
use crate::errors::RequestError;

/// Query string for `GET /articles`. `tags` is a comma-separated list
/// and is OR-combined: an article matches when its tag set overlaps
/// the selection at all. `sort` stays a raw string here so an unknown
/// key becomes a validation failure instead of a rejected request.
#[derive(Deserialize, Serialize, Debug)]
pub struct SearchQueryParams {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub age_months: Option<u32>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default = "get_default_page")]
    pub page: usize,
}

impl Default for SearchQueryParams {
    fn default() -> Self {
        SearchQueryParams {
            category: None,
            tags: None,
            max_price: None,
            age_months: None,
            sort: None,
            page: 1,
        }
    }
}

impl SearchQueryParams {
    pub fn tag_list(&self) -> Vec<String> {
        self.tags
            .as_deref()
            .map(|tags| {
                tags.split(',')
                    .map(|tag| tag.trim().to_string())
                    .filter(|tag| !tag.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn sort_key(&self) -> Result<SortKey, RequestError> {
        match self.sort.as_deref() {
            Some(value) => SortKey::parse(value),
            None => Ok(SortKey::default()),
        }
    }
}

#[derive(Deserialize, Serialize, Debug)]
pub struct SuggestionQueryParams {
    #[serde(default)]
    pub q: String,
}

/// Facet selections arrive as raw strings; parsing them is part of
/// request validation, so a bad value is a 422, not a 400.
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct SmartPickQueryParams {
    pub usage: Option<String>,
    pub maintenance: Option<String>,
    pub price_range: Option<String>,
}

impl SmartPickQueryParams {
    pub fn facets(&self) -> Result<SmartPickFacets, RequestError> {
        Ok(SmartPickFacets {
            usage: self.usage.as_deref().map(Usage::parse).transpose()?,
            maintenance: self
                .maintenance
                .as_deref()
                .map(Maintenance::parse)
                .transpose()?,
            price_range: self.price_range.clone(),
        })
    }
}

fn get_default_page() -> usize {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_key_defaults_and_rejects_unknown_values() {
        let params = SearchQueryParams::default();
        assert_eq!(params.sort_key().unwrap(), SortKey::Newest);

        let params = SearchQueryParams {
            sort: Some("most_liked".to_string()),
            ..Default::default()
        };
        assert_eq!(params.sort_key().unwrap(), SortKey::MostViewed);

        let params = SearchQueryParams {
            sort: Some("bogus".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            params.sort_key(),
            Err(RequestError::Validation(_))
        ));
    }

    #[test]
    fn facet_params_parse_or_fail_as_validation() {
        let params = SmartPickQueryParams {
            usage: Some("high".to_string()),
            maintenance: Some("easy".to_string()),
            price_range: Some("5-10".to_string()),
        };
        let facets = params.facets().unwrap();
        assert_eq!(facets.usage, Some(Usage::High));
        assert_eq!(facets.maintenance, Some(Maintenance::Easy));
        assert_eq!(facets.price_range.as_deref(), Some("5-10"));

        let params = SmartPickQueryParams {
            usage: Some("extreme".to_string()),
            ..Default::default()
        };
        assert!(matches!(params.facets(), Err(RequestError::Validation(_))));
    }
}
