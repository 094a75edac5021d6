//! Business-supplied customization inputs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::artifact::{PersonalizationRule, PersonalizationRuleSet};

/// Branding tokens applied across an artifact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Branding {
    pub primary_color: Option<String>,
    pub logo_url: Option<String>,
    pub font: Option<String>,
}

/// Everything a business supplies to the compiler beyond its profile:
/// per-point copy, branding tokens, and its runtime personalization
/// rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessCustomizations {
    substitutions: BTreeMap<String, String>,
    branding: Branding,
    rules: PersonalizationRuleSet,
}

impl BusinessCustomizations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Supplies copy for a named insertion point. Business copy beats
    /// both branding tokens and generation.
    pub fn with_substitution(
        mut self,
        point: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        self.substitutions.insert(point.into(), text.into());
        self
    }

    pub fn with_primary_color(mut self, color: impl Into<String>) -> Self {
        self.branding.primary_color = Some(color.into());
        self
    }

    pub fn with_logo_url(mut self, url: impl Into<String>) -> Self {
        self.branding.logo_url = Some(url.into());
        self
    }

    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.branding.font = Some(font.into());
        self
    }

    /// Appends a runtime personalization rule.
    pub fn with_rule(mut self, rule: PersonalizationRule) -> Self {
        let mut rules = self.rules.rules().to_vec();
        rules.push(rule);
        self.rules = PersonalizationRuleSet::new(rules);
        self
    }

    pub fn branding(&self) -> &Branding {
        &self.branding
    }

    pub fn rules(&self) -> &PersonalizationRuleSet {
        &self.rules
    }

    /// Resolves a substitution for an insertion point: explicit copy
    /// first, then the standard branding token names.
    pub fn substitution(&self, point: &str) -> Option<&str> {
        if let Some(text) = self.substitutions.get(point) {
            return Some(text);
        }
        match point {
            "brand_color" => self.branding.primary_color.as_deref(),
            "logo_url" => self.branding.logo_url.as_deref(),
            "font" => self.branding.font.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_substitution_wins() {
        let customizations = BusinessCustomizations::new()
            .with_substitution("brand_color", "#112233")
            .with_primary_color("#ff0000");
        assert_eq!(customizations.substitution("brand_color"), Some("#112233"));
    }

    #[test]
    fn branding_tokens_resolve_by_name() {
        let customizations = BusinessCustomizations::new()
            .with_primary_color("#ff0000")
            .with_logo_url("https://acme.example/logo.png")
            .with_font("Inter");
        assert_eq!(customizations.substitution("brand_color"), Some("#ff0000"));
        assert_eq!(
            customizations.substitution("logo_url"),
            Some("https://acme.example/logo.png")
        );
        assert_eq!(customizations.substitution("font"), Some("Inter"));
        assert_eq!(customizations.substitution("cta_copy"), None);
    }

    #[test]
    fn rules_accumulate_in_order() {
        use crate::domain::artifact::{RuleAction, RuleCondition};

        let customizations = BusinessCustomizations::new()
            .with_rule(PersonalizationRule::new(
                RuleCondition::Equals {
                    field: "platform".to_string(),
                    value: "wix".to_string(),
                },
                RuleAction::AdjustScore { delta: 1.0 },
            ))
            .with_rule(PersonalizationRule::new(
                RuleCondition::Equals {
                    field: "platform".to_string(),
                    value: "wordpress".to_string(),
                },
                RuleAction::AdjustScore { delta: 2.0 },
            ));
        assert_eq!(customizations.rules().rules().len(), 2);
    }
}
