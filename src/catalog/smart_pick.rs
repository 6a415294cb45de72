use serde::{Deserialize, Serialize};

use crate::errors::RequestError;

pub const GENERIC_PROMPT: &str = "Select your preferences above to get personalized \
    recommendations. Our smart algorithm will suggest the best models based on your \
    specific needs.";

const HIGH_USAGE_EASY_CARE: &str = "For high oil usage with easy maintenance, we recommend \
    models with auto-clean technology and powerful suction (1200+ m³/hr).";
const BUDGET_LOW_USAGE: &str = "For budget-conscious buyers with low oil usage, the Glen \
    filterless models offer excellent value.";
const FREQUENT_CLEANING: &str = "If you prefer manual control and frequent cleaning, baffle \
    filter models give you the best balance of performance and longevity.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Usage {
    High,
    Medium,
    Low,
}

impl Usage {
    pub fn parse(value: &str) -> Result<Self, RequestError> {
        match value {
            "high" => Ok(Usage::High),
            "medium" => Ok(Usage::Medium),
            "low" => Ok(Usage::Low),
            _ => Err(RequestError::Validation("Unknown usage value")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Maintenance {
    Easy,
    Moderate,
    Frequent,
}

impl Maintenance {
    pub fn parse(value: &str) -> Result<Self, RequestError> {
        match value {
            "easy" => Ok(Maintenance::Easy),
            "moderate" => Ok(Maintenance::Moderate),
            "frequent" => Ok(Maintenance::Frequent),
            _ => Err(RequestError::Validation("Unknown maintenance value")),
        }
    }
}

/// The user-chosen facet tuple. Price bands are the label strings the
/// UI toggles ("5-10", "10-20", "20+").
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SmartPickFacets {
    pub usage: Option<Usage>,
    pub maintenance: Option<Maintenance>,
    pub price_range: Option<String>,
}

/// Decision table for the smart-pick text. Rules are checked in
/// order and the first match wins; the order encodes priority and is
/// part of the contract. Falls back to the article's stored
/// recommendation, then to a generic prompt.
pub fn recommend(facets: &SmartPickFacets, stored: Option<&str>) -> String {
    if facets.usage == Some(Usage::High) && facets.maintenance == Some(Maintenance::Easy) {
        return HIGH_USAGE_EASY_CARE.to_string();
    }
    if facets.price_range.as_deref() == Some("5-10") && facets.usage == Some(Usage::Low) {
        return BUDGET_LOW_USAGE.to_string();
    }
    if facets.maintenance == Some(Maintenance::Frequent) {
        return FREQUENT_CLEANING.to_string();
    }
    stored
        .map(|text| text.to_string())
        .unwrap_or_else(|| GENERIC_PROMPT.to_string())
}
