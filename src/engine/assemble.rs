//! Variant assembly.
//!
//! Decides, from the event's checksum and fingerprint shape, which
//! [`GroupingVariant`]s a resolution returns:
//!
//! ```text
//! checksum present ──┬─ 32-hex  -> { checksum }
//!                    └─ other   -> { checksum, hashed-checksum }
//! no placeholder      ──────────-> { custom-fingerprint }
//! pure "{{ default }}" ─────────-> arbitrated Component per variant
//! literals + placeholder(s) ────-> arbitrated Salted per variant
//! nothing contributes ──────────-> + { fallback }
//! ```
//!
//! The two top rows never invoke the strategy pipeline. The fallback guard
//! runs last: every event ends up in *some* bucket, degenerate input
//! included.

use crate::api::Event;
use crate::config::GroupingConfig;
use crate::engine::resolve_variants;
use crate::fingerprint::{DEFAULT_FINGERPRINT, count_defaults};
use crate::hashing::is_hash_like;
use crate::variant::GroupingVariant;
use indexmap::IndexMap;
use tracing::debug;

/// Compute all grouping variants for an event under a loaded configuration.
pub(crate) fn assemble_variants(
    event: &Event,
    config: &GroupingConfig,
) -> IndexMap<String, GroupingVariant> {
    // A checksum bypasses everything else.
    if let Some(checksum) = event.checksum.as_deref().filter(|c| !c.is_empty()) {
        return checksum_variants(checksum);
    }

    // An empty fingerprint list behaves like the pure default one.
    let fingerprint: Vec<String> = if event.fingerprint.is_empty() {
        vec![DEFAULT_FINGERPRINT.to_string()]
    } else {
        event.fingerprint.clone()
    };
    let defaults_referenced = count_defaults(&fingerprint);

    // Fully custom fingerprint: the user overrode grouping entirely, so
    // strategies are never consulted.
    if defaults_referenced == 0 {
        return IndexMap::from([(
            "custom-fingerprint".to_string(),
            GroupingVariant::CustomFingerprint { values: fingerprint },
        )]);
    }

    let components = resolve_variants(event, config);
    let pure_default = defaults_referenced == 1 && fingerprint.len() == 1;
    let mut variants: IndexMap<String, GroupingVariant> = IndexMap::with_capacity(components.len() + 1);

    for (name, component) in components {
        let variant = if pure_default {
            GroupingVariant::Component { component, config_id: config.id().to_string() }
        } else {
            GroupingVariant::Salted {
                fingerprint: fingerprint.clone(),
                component,
                config_id: config.id().to_string(),
            }
        };
        variants.insert(name, variant);
    }

    // Fallback guard: at least one variant must contribute.
    if !variants.values().any(GroupingVariant::contributes) {
        debug!("no contributing variant, injecting fallback");
        variants.insert("fallback".to_string(), GroupingVariant::Fallback);
    }

    variants
}

fn checksum_variants(checksum: &str) -> IndexMap<String, GroupingVariant> {
    let mut variants = IndexMap::new();
    variants.insert(
        "checksum".to_string(),
        GroupingVariant::Checksum { checksum: checksum.to_string() },
    );
    // Free-form checksums cannot be used as grouping hashes directly, but
    // the raw value stays visible to users.
    if !is_hash_like(checksum) {
        variants.insert(
            "hashed-checksum".to_string(),
            GroupingVariant::HashedChecksum { checksum: checksum.to_string() },
        );
    }
    variants
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::GroupingComponent;
    use crate::config::{ConfigRegistry, GroupingConfigDict, load_grouping_config};
    use crate::enhancer::default_enhancements_blob;
    use crate::hashing::{fallback_hash, hash_from_values};
    use crate::strategy::{DEFAULT_VARIANT, Strategy, StrategyPipeline};
    use std::sync::Arc;

    /// A strategy that panics if the engine ever invokes it.
    struct BombStrategy;

    impl Strategy for BombStrategy {
        fn name(&self) -> &'static str {
            "bomb"
        }

        fn variants(&self, _event: &Event, _config: &GroupingConfig) -> IndexMap<String, GroupingComponent> {
            panic!("strategy invoked on a shortcut path");
        }
    }

    struct TokenStrategy {
        token: &'static str,
        contributes: bool,
    }

    impl Strategy for TokenStrategy {
        fn name(&self) -> &'static str {
            "token"
        }

        fn variants(&self, _event: &Event, _config: &GroupingConfig) -> IndexMap<String, GroupingComponent> {
            let mut c = GroupingComponent::new("token");
            c.set_values(vec![self.token.into()]);
            c.set_contributes(self.contributes);
            IndexMap::from([(DEFAULT_VARIANT.to_string(), c)])
        }
    }

    fn config_with(strategy: Arc<dyn Strategy>) -> GroupingConfig {
        let mut registry = ConfigRegistry::new();
        registry.register("test:v1", StrategyPipeline::new(vec![strategy]));
        let dict = GroupingConfigDict {
            id: "test:v1".to_string(),
            enhancements: default_enhancements_blob(),
        };
        load_grouping_config(&dict, &registry).unwrap()
    }

    #[test]
    fn hex_checksum_short_circuits_everything() {
        let mut event = Event::default();
        event.checksum = Some("0123456789abcdef0123456789abcdef".to_string());
        let variants = assemble_variants(&event, &config_with(Arc::new(BombStrategy)));

        assert_eq!(variants.len(), 1);
        assert_eq!(variants["checksum"].hash().unwrap(), "0123456789abcdef0123456789abcdef");
    }

    #[test]
    fn freeform_checksum_also_returns_hashed_form() {
        let mut event = Event::default();
        event.checksum = Some("release-3".to_string());
        let variants = assemble_variants(&event, &config_with(Arc::new(BombStrategy)));

        assert_eq!(variants.len(), 2);
        assert_eq!(variants["checksum"].hash().unwrap(), "release-3");
        let hashed = variants["hashed-checksum"].hash().unwrap();
        assert_eq!(hashed, hash_from_values(["release-3"]));
        assert_ne!(hashed, "release-3");
    }

    #[test]
    fn empty_checksum_is_ignored() {
        let mut event = Event::default();
        event.checksum = Some(String::new());
        let variants =
            assemble_variants(&event, &config_with(Arc::new(TokenStrategy { token: "t", contributes: true })));
        assert!(variants.contains_key("default"));
    }

    #[test]
    fn custom_fingerprint_never_invokes_strategies() {
        let mut event = Event::default();
        event.fingerprint = vec!["my".to_string(), "fingerprint".to_string()];
        let variants = assemble_variants(&event, &config_with(Arc::new(BombStrategy)));

        assert_eq!(variants.len(), 1);
        assert_eq!(
            variants["custom-fingerprint"].hash().unwrap(),
            hash_from_values(["my", "fingerprint"])
        );
    }

    #[test]
    fn pure_default_fingerprint_wraps_components_plain() {
        let event = Event::default();
        let variants =
            assemble_variants(&event, &config_with(Arc::new(TokenStrategy { token: "t", contributes: true })));
        assert!(matches!(variants["default"], GroupingVariant::Component { .. }));
        assert_eq!(variants["default"].hash().unwrap(), hash_from_values(["t"]));
    }

    #[test]
    fn mixed_fingerprint_wraps_components_salted() {
        let mut event = Event::default();
        event.fingerprint = vec!["{{ default }}".to_string(), "foo".to_string()];
        let variants =
            assemble_variants(&event, &config_with(Arc::new(TokenStrategy { token: "t", contributes: true })));
        assert!(matches!(variants["default"], GroupingVariant::Salted { .. }));
        assert_eq!(variants["default"].hash().unwrap(), hash_from_values(["t", "foo"]));
    }

    #[test]
    fn double_placeholder_also_salts() {
        let mut event = Event::default();
        event.fingerprint = vec!["{{ default }}".to_string(), "{{default}}".to_string()];
        let variants =
            assemble_variants(&event, &config_with(Arc::new(TokenStrategy { token: "t", contributes: true })));
        assert!(matches!(variants["default"], GroupingVariant::Salted { .. }));
        assert_eq!(variants["default"].hash().unwrap(), hash_from_values(["t", "t"]));
    }

    #[test]
    fn empty_fingerprint_behaves_like_pure_default() {
        let mut event = Event::default();
        event.fingerprint = Vec::new();
        let variants =
            assemble_variants(&event, &config_with(Arc::new(TokenStrategy { token: "t", contributes: true })));
        assert!(matches!(variants["default"], GroupingVariant::Component { .. }));
    }

    #[test]
    fn fallback_appears_when_nothing_contributes() {
        let event = Event::default();
        let variants =
            assemble_variants(&event, &config_with(Arc::new(TokenStrategy { token: "t", contributes: false })));
        assert!(!variants["default"].contributes());
        assert!(variants["fallback"].contributes());
        assert_eq!(variants["fallback"].hash().unwrap(), fallback_hash());
    }

    #[test]
    fn fallback_absent_when_something_contributes() {
        let event = Event::default();
        let variants =
            assemble_variants(&event, &config_with(Arc::new(TokenStrategy { token: "t", contributes: true })));
        assert!(!variants.contains_key("fallback"));
    }
}
