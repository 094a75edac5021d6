//! The weighted decision engine.

use tracing::debug;

use crate::domain::catalog::{ArchetypeCatalog, ArchetypeDefinition};
use crate::domain::profile::ProfileSnapshot;

use super::{MatchedPair, ScoreResult};

/// Default number of recommendations surfaced to the owner.
pub const DEFAULT_TOP_N: usize = 3;

/// Scores profile snapshots against an archetype catalog.
///
/// Stateless beyond its catalog reference and result cap; safe to share
/// and to call concurrently.
#[derive(Debug, Clone)]
pub struct ScoringEngine<'a> {
    catalog: &'a ArchetypeCatalog,
    top_n: usize,
}

impl<'a> ScoringEngine<'a> {
    pub fn new(catalog: &'a ArchetypeCatalog) -> Self {
        Self {
            catalog,
            top_n: DEFAULT_TOP_N,
        }
    }

    /// Overrides how many results are returned.
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Scores the snapshot against every catalogued archetype.
    ///
    /// Absent attributes contribute zero, never a penalty. Confidence is
    /// the raw score divided by the archetype's maximum achievable score.
    /// Archetypes below their own minimum confidence are excluded; an
    /// empty result is a valid outcome the caller resolves with its
    /// configured default archetype.
    ///
    /// Ordering: confidence descending, then fewer missing required
    /// attributes, then catalog declaration order.
    pub fn score(&self, snapshot: &ProfileSnapshot) -> Vec<ScoreResult> {
        let mut results: Vec<ScoreResult> = self
            .catalog
            .archetypes()
            .iter()
            .filter_map(|archetype| {
                let result = self.score_one(archetype, snapshot);
                if result.confidence >= archetype.min_confidence {
                    Some(result)
                } else {
                    None
                }
            })
            .collect();

        results.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.missing_required.len().cmp(&b.missing_required.len()))
                .then_with(|| {
                    let ia = self.catalog.declaration_index(&a.archetype_id);
                    let ib = self.catalog.declaration_index(&b.archetype_id);
                    ia.cmp(&ib)
                })
        });
        results.truncate(self.top_n);

        debug!(
            candidates = self.catalog.len(),
            qualified = results.len(),
            "scored profile snapshot"
        );
        results
    }

    fn score_one(&self, archetype: &ArchetypeDefinition, snapshot: &ProfileSnapshot) -> ScoreResult {
        let mut raw_score = 0.0;
        let mut matched = Vec::new();

        for (key, value) in snapshot.iter() {
            for tag in value.match_tags() {
                let weight = archetype.weight_for(*key, &tag);
                if weight > 0.0 {
                    raw_score += weight;
                    matched.push(MatchedPair {
                        key: *key,
                        tag,
                        weight,
                    });
                }
            }
        }

        let max_score = archetype.max_score();
        let confidence = if max_score > 0.0 {
            raw_score / max_score
        } else {
            0.0
        };

        let missing_required = archetype
            .required_attributes
            .iter()
            .copied()
            .filter(|key| !snapshot.contains(*key))
            .collect();

        ScoreResult {
            archetype_id: archetype.id.clone(),
            raw_score,
            confidence,
            matched,
            missing_required,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{ComplexityTier, ComponentTemplate, InsertionPoint, WeightTable};
    use crate::domain::foundation::{ArchetypeId, ComponentId};
    use crate::domain::profile::{AttributeKey, AttributeValue, BusinessProfile};
    use std::collections::BTreeMap;

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

    fn archetype(
        id: &str,
        table: WeightTable,
        required: Vec<AttributeKey>,
        min_confidence: f64,
    ) -> ArchetypeDefinition {
        ArchetypeDefinition {
            id: ArchetypeId::new(id).unwrap(),
            name: id.to_string(),
            description: String::new(),
            example: String::new(),
            tier: ComplexityTier::Basic,
            required_attributes: required,
            weights: table,
            components: vec![ComponentId::new("body").unwrap()],
            min_confidence,
            fallback_content: BTreeMap::new(),
        }
    }

    fn catalog(archetypes: Vec<ArchetypeDefinition>) -> ArchetypeCatalog {
        let body = ComponentTemplate::new(
            ComponentId::new("body").unwrap(),
            ComplexityTier::Basic,
            "Hello {business_name}",
            vec![InsertionPoint::static_point("business_name")],
            vec![],
        )
        .unwrap();
        ArchetypeCatalog::new(archetypes, vec![body]).unwrap()
    }

    fn web_design_profile() -> ProfileSnapshot {
        let mut profile = BusinessProfile::new();
        profile.set(AttributeKey::Industry, AttributeValue::tag("web_design"));
        profile.set(
            AttributeKey::PainPoints,
            AttributeValue::tags(["slow_site", "low_conversion"]),
        );
        profile.set(AttributeKey::TechCapability, AttributeValue::tag("low"));
        profile.snapshot()
    }

    #[test]
    fn ranks_heavier_match_first() {
        // winner weights both pain points; runner-up only one, lightly
        let catalog = catalog(vec![
            archetype(
                "website_performance_quiz",
                weights(&[
                    (AttributeKey::PainPoints, "slow_site", 5.0),
                    (AttributeKey::PainPoints, "low_conversion", 5.0),
                ]),
                vec![],
                0.1,
            ),
            archetype(
                "seo_report",
                weights(&[
                    (AttributeKey::PainPoints, "slow_site", 2.0),
                    (AttributeKey::PainPoints, "no_traffic", 4.0),
                ]),
                vec![],
                0.1,
            ),
        ]);

        let results = ScoringEngine::new(&catalog).score(&web_design_profile());
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].archetype_id.as_str(), "website_performance_quiz");
        assert_eq!(results[0].confidence, 1.0);
        assert!(results[0].confidence > results[1].confidence);
    }

    #[test]
    fn empty_profile_yields_empty_result() {
        let catalog = catalog(vec![archetype(
            "quiz",
            weights(&[(AttributeKey::Industry, "web_design", 3.0)]),
            vec![],
            0.1,
        )]);

        let results = ScoringEngine::new(&catalog).score(&ProfileSnapshot::empty());
        assert!(results.is_empty());
    }

    #[test]
    fn irrelevant_profile_yields_empty_result() {
        let catalog = catalog(vec![archetype(
            "quiz",
            weights(&[(AttributeKey::Industry, "web_design", 3.0)]),
            vec![],
            0.1,
        )]);

        let mut profile = BusinessProfile::new();
        profile.set(AttributeKey::Industry, AttributeValue::tag("bakery"));
        let results = ScoringEngine::new(&catalog).score(&profile.snapshot());
        assert!(results.is_empty());
    }

    #[test]
    fn below_threshold_archetype_is_excluded() {
        let catalog = catalog(vec![archetype(
            "quiz",
            weights(&[
                (AttributeKey::Industry, "web_design", 1.0),
                (AttributeKey::PainPoints, "no_traffic", 9.0),
            ]),
            vec![],
            0.5,
        )]);

        // only the industry weight matches: confidence 0.1, threshold 0.5
        let results = ScoringEngine::new(&catalog).score(&web_design_profile());
        assert!(results.is_empty());
    }

    #[test]
    fn missing_attributes_contribute_zero_not_penalty() {
        let catalog = catalog(vec![archetype(
            "quiz",
            weights(&[
                (AttributeKey::Industry, "web_design", 5.0),
                (AttributeKey::Audience, "b2b_small", 5.0),
            ]),
            vec![],
            0.1,
        )]);

        let results = ScoringEngine::new(&catalog).score(&web_design_profile());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].raw_score, 5.0);
        assert_eq!(results[0].confidence, 0.5);
    }

    #[test]
    fn tie_broken_by_fewer_missing_required_attributes() {
        let table = weights(&[(AttributeKey::Industry, "web_design", 4.0)]);
        let catalog = catalog(vec![
            archetype(
                "needs_audience",
                table.clone(),
                vec![AttributeKey::Audience],
                0.1,
            ),
            archetype("needs_industry", table, vec![AttributeKey::Industry], 0.1),
        ]);

        let results = ScoringEngine::new(&catalog).score(&web_design_profile());
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].archetype_id.as_str(), "needs_industry");
        assert_eq!(results[0].confidence, results[1].confidence);
    }

    #[test]
    fn remaining_tie_broken_by_declaration_order() {
        let table = weights(&[(AttributeKey::Industry, "web_design", 4.0)]);
        let catalog = catalog(vec![
            archetype("declared_first", table.clone(), vec![], 0.1),
            archetype("declared_second", table, vec![], 0.1),
        ]);

        let results = ScoringEngine::new(&catalog).score(&web_design_profile());
        assert_eq!(results[0].archetype_id.as_str(), "declared_first");
        assert_eq!(results[1].archetype_id.as_str(), "declared_second");
    }

    #[test]
    fn returns_at_most_top_n() {
        let table = weights(&[(AttributeKey::Industry, "web_design", 4.0)]);
        let catalog = catalog(vec![
            archetype("a", table.clone(), vec![], 0.1),
            archetype("b", table.clone(), vec![], 0.1),
            archetype("c", table.clone(), vec![], 0.1),
            archetype("d", table, vec![], 0.1),
        ]);

        let results = ScoringEngine::new(&catalog).score(&web_design_profile());
        assert_eq!(results.len(), DEFAULT_TOP_N);

        let two = ScoringEngine::new(&catalog)
            .with_top_n(2)
            .score(&web_design_profile());
        assert_eq!(two.len(), 2);
    }

    #[test]
    fn scoring_is_deterministic() {
        let catalog = catalog(vec![
            archetype(
                "quiz",
                weights(&[
                    (AttributeKey::PainPoints, "slow_site", 5.0),
                    (AttributeKey::Industry, "web_design", 2.0),
                ]),
                vec![AttributeKey::Industry],
                0.1,
            ),
            archetype(
                "calculator",
                weights(&[(AttributeKey::PainPoints, "low_conversion", 5.0)]),
                vec![],
                0.1,
            ),
        ]);
        let snapshot = web_design_profile();
        let engine = ScoringEngine::new(&catalog);

        assert_eq!(engine.score(&snapshot), engine.score(&snapshot));
    }

    #[test]
    fn records_matched_pairs_and_missing_required() {
        let catalog = catalog(vec![archetype(
            "quiz",
            weights(&[(AttributeKey::PainPoints, "slow_site", 5.0)]),
            vec![AttributeKey::Industry, AttributeKey::Audience],
            0.1,
        )]);

        let results = ScoringEngine::new(&catalog).score(&web_design_profile());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].matched.len(), 1);
        assert_eq!(results[0].matched[0].tag, "slow_site");
        assert_eq!(results[0].missing_required, vec![AttributeKey::Audience]);
    }
}
