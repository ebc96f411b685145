//! Precedence arbitration.
//!
//! Every strategy in the pipeline may return a plausible grouping component
//! for one or more variant names, but exactly one strategy may determine
//! the final hash. The rule is *first contributing strategy wins*:
//!
//! - Strategies run in the pipeline's fixed order (the order is part of the
//!   configuration contract, stable across runs and concurrency).
//! - The first component seen with `contributes == true` locks in its
//!   strategy as the winner and fixes the precedence hint.
//! - Any contributing component from a *different* strategy is suppressed:
//!   its own copy is flipped to non-contributing and the hint is attached.
//!   Suppression is global across variant names, not scoped to the variant
//!   where the winner appeared — a later strategy cannot smuggle a hash in
//!   under a variant name the winner never touched.
//!
//! Ties cannot occur: iteration order is deterministic and the winner is
//! set exactly once, on the first unset-to-set transition.
//!
//! Suppression updates the component we own (strategies hand over fresh
//! trees), so earlier strategies' outputs are never mutated behind their
//! backs.

use crate::api::Event;
use crate::component::{ComponentValue, GroupingComponent};
use crate::config::GroupingConfig;
use crate::strategy::DEFAULT_VARIANT;
use indexmap::IndexMap;
use tracing::debug;

/// Run the configuration's strategies and arbitrate their outputs into one
/// merged component per variant name.
pub(crate) fn resolve_variants(
    event: &Event,
    config: &GroupingConfig,
) -> IndexMap<String, GroupingComponent> {
    let mut winning_strategy: Option<&'static str> = None;
    let mut precedence_hint: Option<String> = None;
    let mut per_variant: IndexMap<String, Vec<GroupingComponent>> = IndexMap::new();

    for strategy in config.pipeline().strategies() {
        for (variant, mut component) in strategy.variants(event, config) {
            match winning_strategy {
                None => {
                    if component.contributes() {
                        winning_strategy = Some(strategy.name());
                        let hint = if variant == DEFAULT_VARIANT {
                            format!("{} takes precedence", strategy.name())
                        } else {
                            format!("{} of {} takes precedence", strategy.name(), variant)
                        };
                        debug!(strategy = strategy.name(), %variant, "strategy wins precedence");
                        precedence_hint = Some(hint);
                    }
                }
                Some(winner) if winner != strategy.name() && component.contributes() => {
                    debug!(strategy = strategy.name(), %variant, winner, "suppressing contribution");
                    component.set_contributes(false);
                    if let Some(hint) = &precedence_hint {
                        component.set_hint(hint.clone());
                    }
                }
                Some(_) => {}
            }

            per_variant.entry(variant).or_default().push(component);
        }
    }

    let mut merged = IndexMap::with_capacity(per_variant.len());
    for (variant, components) in per_variant {
        let values: Vec<ComponentValue> = components.into_iter().map(Into::into).collect();
        let mut component = GroupingComponent::with_values(variant.clone(), values);
        // Surface *why* the whole variant is inert even when no single
        // sub-component carries the explanation.
        if !component.contributes() {
            if let Some(hint) = &precedence_hint {
                component.set_hint(hint.clone());
            }
        }
        merged.insert(variant, component);
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigRegistry, GroupingConfigDict, load_grouping_config};
    use crate::enhancer::default_enhancements_blob;
    use crate::strategy::{Strategy, StrategyPipeline};
    use std::sync::Arc;

    /// Emits fixed (variant, token, contributes) triples.
    struct FixedStrategy {
        name: &'static str,
        outputs: Vec<(&'static str, &'static str, bool)>,
    }

    impl Strategy for FixedStrategy {
        fn name(&self) -> &'static str {
            self.name
        }

        fn variants(&self, _event: &Event, _config: &GroupingConfig) -> IndexMap<String, GroupingComponent> {
            let mut out = IndexMap::new();
            for (variant, token, contributes) in &self.outputs {
                let mut c = GroupingComponent::new(self.name);
                c.set_values(vec![(*token).into()]);
                c.set_contributes(*contributes);
                out.insert(variant.to_string(), c);
            }
            out
        }
    }

    fn config_with(strategies: Vec<Arc<dyn Strategy>>) -> GroupingConfig {
        let mut registry = ConfigRegistry::new();
        registry.register("test:v1", StrategyPipeline::new(strategies));
        let dict = GroupingConfigDict {
            id: "test:v1".to_string(),
            enhancements: default_enhancements_blob(),
        };
        load_grouping_config(&dict, &registry).unwrap()
    }

    fn fixed(
        name: &'static str,
        outputs: Vec<(&'static str, &'static str, bool)>,
    ) -> Arc<dyn Strategy> {
        Arc::new(FixedStrategy { name, outputs })
    }

    #[test]
    fn first_contributing_strategy_wins() {
        let config = config_with(vec![
            fixed("alpha", vec![("default", "a", true)]),
            fixed("beta", vec![("default", "b", true)]),
        ]);
        let merged = resolve_variants(&Event::default(), &config);
        let component = &merged["default"];
        assert!(component.contributes());
        // Only the winner's values survive into the flattened sequence.
        assert_eq!(component.flattened_values(), vec!["a"]);
    }

    #[test]
    fn suppression_is_global_across_variants() {
        // alpha contributes under v1; gamma's contribution under an
        // unrelated variant v2 must still be suppressed, with a hint
        // naming alpha.
        let config = config_with(vec![
            fixed("alpha", vec![("v1", "a", true)]),
            fixed("beta", vec![("v1", "b", false)]),
            fixed("gamma", vec![("v2", "c", true)]),
        ]);
        let merged = resolve_variants(&Event::default(), &config);

        assert!(merged["v1"].contributes());
        let v2 = &merged["v2"];
        assert!(!v2.contributes());
        assert_eq!(v2.hint(), Some("alpha of v1 takes precedence"));
        match &v2.values()[0] {
            ComponentValue::Component(c) => {
                assert!(!c.contributes());
                assert_eq!(c.hint(), Some("alpha of v1 takes precedence"));
            }
            other => panic!("expected nested component, got {other:?}"),
        }
    }

    #[test]
    fn winner_may_keep_contributing_under_other_variants() {
        // The same strategy is never suppressed by itself, even for a
        // variant it reports after the win.
        let config = config_with(vec![
            fixed("alpha", vec![("v1", "a", true), ("v2", "a2", true)]),
            fixed("beta", vec![("v2", "b", true)]),
        ]);
        let merged = resolve_variants(&Event::default(), &config);
        assert!(merged["v1"].contributes());
        assert!(merged["v2"].contributes());
        assert_eq!(merged["v2"].flattened_values(), vec!["a2"]);
    }

    #[test]
    fn default_variant_hint_omits_the_variant_name() {
        let config = config_with(vec![
            fixed("alpha", vec![("default", "a", true)]),
            fixed("beta", vec![("other", "b", true)]),
        ]);
        let merged = resolve_variants(&Event::default(), &config);
        assert_eq!(merged["other"].hint(), Some("alpha takes precedence"));
    }

    #[test]
    fn no_winner_means_no_hint() {
        let config = config_with(vec![
            fixed("alpha", vec![("default", "a", false)]),
            fixed("beta", vec![("default", "b", false)]),
        ]);
        let merged = resolve_variants(&Event::default(), &config);
        let component = &merged["default"];
        assert!(!component.contributes());
        assert_eq!(component.hint(), None);
    }

    #[test]
    fn components_are_buffered_in_strategy_order() {
        let config = config_with(vec![
            fixed("alpha", vec![("default", "a", false)]),
            fixed("beta", vec![("default", "b", true)]),
            fixed("gamma", vec![("default", "c", false)]),
        ]);
        let merged = resolve_variants(&Event::default(), &config);
        let ids: Vec<&str> = merged["default"]
            .values()
            .iter()
            .map(|v| match v {
                ComponentValue::Component(c) => c.id(),
                ComponentValue::Token(_) => panic!("expected components"),
            })
            .collect();
        assert_eq!(ids, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn resolution_is_deterministic() {
        let make = || {
            let config = config_with(vec![
                fixed("alpha", vec![("v1", "a", true)]),
                fixed("beta", vec![("v2", "b", true)]),
            ]);
            resolve_variants(&Event::default(), &config)
        };
        let first = make();
        let second = make();
        assert_eq!(first, second);
    }
}
