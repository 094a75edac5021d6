//! Built-in default catalog.
//!
//! Four archetypes covering the common lead-magnet shapes, with component
//! templates and industry-agnostic weight tables. Deployments with their
//! own catalog load it from YAML instead (see `adapters::catalog`).

use once_cell::sync::Lazy;
use std::collections::BTreeMap;

use crate::domain::foundation::{ArchetypeId, ComponentId};
use crate::domain::profile::AttributeKey;

use super::{
    ArchetypeCatalog, ArchetypeDefinition, ComplexityTier, ComponentTemplate, InsertionPoint,
    WeightTable,
};

static BUILTIN: Lazy<ArchetypeCatalog> = Lazy::new(|| {
    ArchetypeCatalog::new(default_archetypes(), default_components())
        .expect("built-in catalog must be valid")
});

/// Returns the built-in catalog.
pub fn builtin_catalog() -> ArchetypeCatalog {
    BUILTIN.clone()
}

fn weights(entries: &[(AttributeKey, &str, f64)]) -> WeightTable {
    let mut table: WeightTable = BTreeMap::new();
    for (key, tag, weight) in entries {
        table
            .entry(*key)
            .or_default()
            .insert((*tag).to_string(), *weight);
    }
    table
}

fn fallback(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

fn component_ids(ids: &[&str]) -> Vec<ComponentId> {
    ids.iter()
        .map(|id| ComponentId::new(*id).expect("built-in component id"))
        .collect()
}

fn default_archetypes() -> Vec<ArchetypeDefinition> {
    vec![
        ArchetypeDefinition {
            id: ArchetypeId::new("interactive_quiz").expect("built-in archetype id"),
            name: "Interactive Quiz".to_string(),
            description: "An engaging quiz that helps visitors learn something about \
                          their own situation and captures their contact details."
                .to_string(),
            example: "A 'What type of service is right for you?' quiz that recommends \
                      specific options based on preferences."
                .to_string(),
            tier: ComplexityTier::Basic,
            required_attributes: vec![AttributeKey::Industry, AttributeKey::Audience],
            weights: weights(&[
                (AttributeKey::PainPoints, "knowledge", 3.0),
                (AttributeKey::PainPoints, "complexity", 2.5),
                (AttributeKey::Audience, "b2c", 2.0),
                (AttributeKey::Audience, "mixed", 1.5),
                (AttributeKey::TechCapability, "low", 2.0),
                (AttributeKey::TechCapability, "medium", 1.5),
                (AttributeKey::MarketingGoals, "leads", 2.0),
                (AttributeKey::MarketingGoals, "engagement", 1.5),
            ]),
            components: component_ids(&["intro_block", "question_block", "result_page", "cta_block"]),
            min_confidence: 0.2,
            fallback_content: fallback(&[
                ("intro_copy", "Answer a few quick questions and get advice matched to you."),
                ("result_copy", "Here is what your answers tell us, and what to do next."),
            ]),
        },
        ArchetypeDefinition {
            id: ArchetypeId::new("value_calculator").expect("built-in archetype id"),
            name: "Value Calculator".to_string(),
            description: "A calculator that quantifies savings, ROI or another metric \
                          that matters to the visitor."
                .to_string(),
            example: "A savings calculator showing how much a customer could save by \
                      switching provider."
                .to_string(),
            tier: ComplexityTier::Standard,
            required_attributes: vec![AttributeKey::Industry, AttributeKey::PainPoints],
            weights: weights(&[
                (AttributeKey::PainPoints, "cost", 4.0),
                (AttributeKey::PainPoints, "risk", 2.5),
                (AttributeKey::Audience, "b2b_small", 2.0),
                (AttributeKey::Audience, "b2b_enterprise", 2.0),
                (AttributeKey::TechCapability, "medium", 1.5),
                (AttributeKey::TechCapability, "high", 2.0),
                (AttributeKey::MarketingGoals, "conversion", 2.0),
            ]),
            components: component_ids(&["intro_block", "input_form", "result_page", "cta_block"]),
            min_confidence: 0.2,
            fallback_content: fallback(&[
                ("intro_copy", "Enter a few numbers to see the value you could unlock."),
                ("result_copy", "Based on your figures, here is the impact you can expect."),
            ]),
        },
        ArchetypeDefinition {
            id: ArchetypeId::new("diagnostic_tool").expect("built-in archetype id"),
            name: "Problem Diagnostic".to_string(),
            description: "A tool that helps visitors identify and diagnose a specific \
                          problem from its symptoms."
                .to_string(),
            example: "A plumbing diagnostic that narrows likely causes from symptoms and \
                      recommends next steps."
                .to_string(),
            tier: ComplexityTier::Standard,
            required_attributes: vec![AttributeKey::Industry, AttributeKey::PainPoints],
            weights: weights(&[
                (AttributeKey::PainPoints, "complexity", 3.0),
                (AttributeKey::PainPoints, "support", 3.0),
                (AttributeKey::PainPoints, "knowledge", 2.0),
                (AttributeKey::BusinessSize, "solo", 1.0),
                (AttributeKey::BusinessSize, "micro", 1.0),
                (AttributeKey::MarketingGoals, "authority", 2.0),
            ]),
            components: component_ids(&["intro_block", "question_block", "recommendation_page", "cta_block"]),
            min_confidence: 0.2,
            fallback_content: fallback(&[
                ("intro_copy", "Describe your symptoms and we will narrow down the cause."),
                ("recommendation_copy", "Our best read of the problem, with suggested fixes."),
            ]),
        },
        ArchetypeDefinition {
            id: ArchetypeId::new("interactive_assessment").expect("built-in archetype id"),
            name: "Interactive Assessment".to_string(),
            description: "An assessment that evaluates the visitor's current situation \
                          and returns personalized recommendations."
                .to_string(),
            example: "A website performance analyzer that scores loading speed and \
                      mobile readiness, then suggests improvements."
                .to_string(),
            tier: ComplexityTier::Advanced,
            required_attributes: vec![
                AttributeKey::Industry,
                AttributeKey::PainPoints,
                AttributeKey::TechCapability,
            ],
            weights: weights(&[
                (AttributeKey::PainPoints, "knowledge", 3.0),
                (AttributeKey::PainPoints, "quality", 2.5),
                (AttributeKey::PainPoints, "risk", 2.0),
                (AttributeKey::Audience, "b2b_small", 2.0),
                (AttributeKey::TechCapability, "high", 2.5),
                (AttributeKey::MarketingGoals, "leads", 2.0),
                (AttributeKey::MarketingGoals, "authority", 2.0),
            ]),
            components: component_ids(&[
                "intro_block",
                "question_block",
                "scoring_block",
                "recommendation_page",
                "cta_block",
            ]),
            min_confidence: 0.25,
            fallback_content: fallback(&[
                ("intro_copy", "This assessment takes two minutes and gives tailored advice."),
                ("recommendation_copy", "Your results, with the improvements that matter most."),
            ]),
        },
    ]
}

fn default_components() -> Vec<ComponentTemplate> {
    vec![
        ComponentTemplate::new(
            ComponentId::new("intro_block").expect("built-in component id"),
            ComplexityTier::Basic,
            "Welcome to {business_name}. {intro_copy}",
            vec![
                InsertionPoint::static_point("business_name"),
                InsertionPoint::generated_point("intro_copy"),
            ],
            vec!["email".to_string()],
        )
        .expect("built-in component"),
        ComponentTemplate::new(
            ComponentId::new("question_block").expect("built-in component id"),
            ComplexityTier::Basic,
            "Tell us about your situation so {business_name} can personalize the advice.",
            vec![InsertionPoint::static_point("business_name")],
            vec!["answers".to_string(), "page_load_seconds".to_string()],
        )
        .expect("built-in component"),
        ComponentTemplate::new(
            ComponentId::new("input_form").expect("built-in component id"),
            ComplexityTier::Standard,
            "Enter your numbers below and {business_name} will calculate the impact.",
            vec![InsertionPoint::static_point("business_name")],
            vec!["monthly_cost".to_string(), "team_size".to_string()],
        )
        .expect("built-in component"),
        ComponentTemplate::new(
            ComponentId::new("scoring_block").expect("built-in component id"),
            ComplexityTier::Advanced,
            "We analyze your answers to compute an overall score.",
            vec![],
            vec!["answers".to_string()],
        )
        .expect("built-in component"),
        ComponentTemplate::new(
            ComponentId::new("result_page").expect("built-in component id"),
            ComplexityTier::Standard,
            "{result_copy}",
            vec![InsertionPoint::generated_point("result_copy")],
            vec![],
        )
        .expect("built-in component"),
        ComponentTemplate::new(
            ComponentId::new("recommendation_page").expect("built-in component id"),
            ComplexityTier::Standard,
            "{recommendation_copy}",
            vec![InsertionPoint::generated_point("recommendation_copy")],
            vec![],
        )
        .expect("built-in component"),
        ComponentTemplate::new(
            ComponentId::new("cta_block").expect("built-in component id"),
            ComplexityTier::Basic,
            "Ready to take the next step with {business_name}? {cta_copy}",
            vec![
                InsertionPoint::static_point("business_name"),
                InsertionPoint::static_point("cta_copy"),
            ],
            vec!["email".to_string()],
        )
        .expect("built-in component"),
    ]
}
