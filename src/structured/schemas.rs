//! Ready-made response shapes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single item in a [`StructuredResponse`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ResponseItem {
    /// Title or name of the item
    pub title: String,
    /// Detailed description
    pub description: String,
    /// Confidence score (0.0-1.0)
    #[schemars(range(min = 0.0, max = 1.0))]
    pub confidence: f64,
    /// Relevant tags or categories
    #[serde(default)]
    pub tags: Vec<String>,
    /// Additional metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, serde_json::Value>>,
}

/// General-purpose answer: a list of items plus a summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StructuredResponse {
    /// The original query
    pub query: String,
    /// List of response items
    pub items: Vec<ResponseItem>,
    /// Overall summary
    pub summary: String,
    /// ISO format timestamp of the response
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProductRecommendation {
    /// Name of the product
    pub product_name: String,
    /// Price of the product
    pub price: f64,
    /// Rating out of 5 stars
    #[schemars(range(min = 0.0, max = 5.0))]
    pub rating: f64,
    /// List of pros/benefits
    pub pros: Vec<String>,
    /// List of cons/drawbacks
    pub cons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProductRecommendations {
    /// The original query
    pub query: String,
    /// Category of products being recommended
    pub product_category: String,
    /// List of product recommendations
    pub recommendations: Vec<ProductRecommendation>,
    /// Summary of recommendations
    pub summary: String,
    /// ISO format timestamp of the response
    pub timestamp: String,
}
