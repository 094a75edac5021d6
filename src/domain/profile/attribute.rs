//! Business profile attributes.
//!
//! Attribute keys are the closed vocabulary the assessment collects and the
//! archetype weight tables reference. Values are tags (enumerated choices),
//! ordered tag lists, free text, or numeric scale readings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The attribute keys a business profile can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKey {
    /// What the business does, e.g. "web_design".
    Industry,
    /// Headcount band, e.g. "solo", "small".
    BusinessSize,
    /// Primary target audience, e.g. "b2b_small".
    Audience,
    /// Ordered list of customer pain points, most important first.
    PainPoints,
    /// Ordered list of unique selling points.
    Usps,
    /// Technical capability band: "low", "medium", "high".
    TechCapability,
    /// Declared language variant, e.g. "en-GB".
    LanguageVariant,
    /// Primary marketing goals, e.g. "leads", "authority".
    MarketingGoals,
    /// Sales cycle length on a 1-5 scale.
    SalesCycle,
    /// Display name of the business, free text.
    BusinessName,
}

impl AttributeKey {
    /// All keys, in a stable order.
    pub fn all() -> &'static [AttributeKey] {
        &[
            AttributeKey::Industry,
            AttributeKey::BusinessSize,
            AttributeKey::Audience,
            AttributeKey::PainPoints,
            AttributeKey::Usps,
            AttributeKey::TechCapability,
            AttributeKey::LanguageVariant,
            AttributeKey::MarketingGoals,
            AttributeKey::SalesCycle,
            AttributeKey::BusinessName,
        ]
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AttributeKey::Industry => "industry",
            AttributeKey::BusinessSize => "business_size",
            AttributeKey::Audience => "audience",
            AttributeKey::PainPoints => "pain_points",
            AttributeKey::Usps => "usps",
            AttributeKey::TechCapability => "tech_capability",
            AttributeKey::LanguageVariant => "language_variant",
            AttributeKey::MarketingGoals => "marketing_goals",
            AttributeKey::SalesCycle => "sales_cycle",
            AttributeKey::BusinessName => "business_name",
        };
        write!(f, "{}", s)
    }
}

/// The value stored under an attribute key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AttributeValue {
    /// A single enumerated tag, e.g. "web_design".
    Tag(String),
    /// An ordered list of tags, e.g. pain points by priority.
    Tags(Vec<String>),
    /// Free text, e.g. the business name.
    Text(String),
    /// A reading on a numeric scale.
    Scale(i32),
}

impl AttributeValue {
    /// Creates a tag value.
    pub fn tag(value: impl Into<String>) -> Self {
        AttributeValue::Tag(value.into())
    }

    /// Creates an ordered tag-list value.
    pub fn tags<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AttributeValue::Tags(values.into_iter().map(Into::into).collect())
    }

    /// Creates a free-text value.
    pub fn text(value: impl Into<String>) -> Self {
        AttributeValue::Text(value.into())
    }

    /// Returns the tags this value contributes to weight-table matching.
    ///
    /// Tags match directly, list entries match individually, scale readings
    /// match their decimal representation, and free text never matches a
    /// weight table (it is input to personalization, not scoring).
    pub fn match_tags(&self) -> Vec<String> {
        match self {
            AttributeValue::Tag(tag) => vec![tag.clone()],
            AttributeValue::Tags(tags) => tags.clone(),
            AttributeValue::Scale(n) => vec![n.to_string()],
            AttributeValue::Text(_) => Vec::new(),
        }
    }

    /// Returns the value as display text for substitution.
    pub fn display_text(&self) -> String {
        match self {
            AttributeValue::Tag(tag) => tag.clone(),
            AttributeValue::Tags(tags) => tags.join(", "),
            AttributeValue::Text(text) => text.clone(),
            AttributeValue::Scale(n) => n.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_serializes_to_snake_case() {
        let json = serde_json::to_string(&AttributeKey::PainPoints).unwrap();
        assert_eq!(json, "\"pain_points\"");
    }

    #[test]
    fn key_display_matches_serde_form() {
        for key in AttributeKey::all() {
            let json = serde_json::to_string(key).unwrap();
            assert_eq!(json, format!("\"{}\"", key));
        }
    }

    #[test]
    fn tag_value_matches_itself() {
        let value = AttributeValue::tag("web_design");
        assert_eq!(value.match_tags(), vec!["web_design".to_string()]);
    }

    #[test]
    fn tag_list_matches_each_entry() {
        let value = AttributeValue::tags(["slow_site", "low_conversion"]);
        assert_eq!(
            value.match_tags(),
            vec!["slow_site".to_string(), "low_conversion".to_string()]
        );
    }

    #[test]
    fn scale_matches_decimal_representation() {
        let value = AttributeValue::Scale(4);
        assert_eq!(value.match_tags(), vec!["4".to_string()]);
    }

    #[test]
    fn free_text_never_matches_weight_tables() {
        let value = AttributeValue::text("WebDesign Pro");
        assert!(value.match_tags().is_empty());
    }

    #[test]
    fn display_text_joins_tag_lists() {
        let value = AttributeValue::tags(["slow_site", "low_conversion"]);
        assert_eq!(value.display_text(), "slow_site, low_conversion");
    }

    #[test]
    fn value_round_trips_through_json() {
        let value = AttributeValue::tags(["a", "b"]);
        let json = serde_json::to_string(&value).unwrap();
        let back: AttributeValue = serde_json::from_str(&json).unwrap();
        assert_eq!(value, back);
    }
}
