//! Grouping variants.
//!
//! A [`GroupingVariant`] is one complete candidate grouping outcome. A
//! resolution returns several (keyed by variant name) for transparency, but
//! only contributing variants produce hashes, and the caller persists only
//! the derived hash plus the variant kind for debugging.
//!
//! Each variant owns exactly the data its hash needs:
//!
//! ```text
//! Checksum          raw 32-hex checksum   -> used verbatim
//! HashedChecksum    free-form checksum    -> hash_from_values([raw])
//! CustomFingerprint literal tokens        -> hash_from_values(tokens)
//! Component         component + config    -> component hash
//! Salted            fingerprint + both    -> literals with the component's
//!                                            values spliced at placeholders
//! Fallback          nothing               -> fixed constant hash
//! ```

use crate::component::GroupingComponent;
use crate::fingerprint::is_default_placeholder;
use crate::hashing::{fallback_hash, hash_from_values};

/// One candidate grouping outcome.
#[derive(Debug, Clone)]
pub enum GroupingVariant {
    /// A client-supplied checksum that is already a valid grouping hash.
    Checksum { checksum: String },
    /// A free-form legacy checksum; displayed raw, hashed for bucketing.
    HashedChecksum { checksum: String },
    /// A fingerprint with no default placeholders: fully user-controlled.
    CustomFingerprint { values: Vec<String> },
    /// An arbitrated component tree under a pure-default fingerprint.
    Component { component: GroupingComponent, config_id: String },
    /// A component tree salted with literal fingerprint tokens.
    Salted { fingerprint: Vec<String>, component: GroupingComponent, config_id: String },
    /// Last-resort constant bucket so no event is ever dropped.
    Fallback,
}

impl GroupingVariant {
    /// Stable kind tag, persisted alongside the hash for debugging.
    pub fn kind(&self) -> &'static str {
        match self {
            GroupingVariant::Checksum { .. } => "checksum",
            GroupingVariant::HashedChecksum { .. } => "hashed-checksum",
            GroupingVariant::CustomFingerprint { .. } => "custom-fingerprint",
            GroupingVariant::Component { .. } => "component",
            GroupingVariant::Salted { .. } => "salted-component",
            GroupingVariant::Fallback => "fallback",
        }
    }

    /// Whether this variant should influence bucketing.
    pub fn contributes(&self) -> bool {
        match self {
            GroupingVariant::Component { component, .. }
            | GroupingVariant::Salted { component, .. } => component.contributes(),
            _ => true,
        }
    }

    /// The deterministic grouping hash, or `None` for an inert variant.
    pub fn hash(&self) -> Option<String> {
        match self {
            GroupingVariant::Checksum { checksum } => Some(checksum.clone()),
            GroupingVariant::HashedChecksum { checksum } => Some(hash_from_values([checksum.as_str()])),
            GroupingVariant::CustomFingerprint { values } => Some(hash_from_values(values)),
            GroupingVariant::Component { component, .. } => component.hash(),
            GroupingVariant::Salted { fingerprint, component, .. } => {
                if !component.contributes() {
                    return None;
                }
                let computed = component.flattened_values();
                let mut tokens: Vec<&str> = Vec::with_capacity(fingerprint.len() + computed.len());
                for value in fingerprint {
                    if is_default_placeholder(value) {
                        tokens.extend(&computed);
                    } else {
                        tokens.push(value);
                    }
                }
                Some(hash_from_values(tokens))
            }
            GroupingVariant::Fallback => Some(fallback_hash()),
        }
    }

    /// The component tree behind this variant, if any.
    pub fn component(&self) -> Option<&GroupingComponent> {
        match self {
            GroupingVariant::Component { component, .. }
            | GroupingVariant::Salted { component, .. } => Some(component),
            _ => None,
        }
    }

    /// Human-readable summary for reports and as_dict-style output.
    pub fn description(&self) -> String {
        match self {
            GroupingVariant::Checksum { .. } => "legacy checksum".to_string(),
            GroupingVariant::HashedChecksum { .. } => "hashed legacy checksum".to_string(),
            GroupingVariant::CustomFingerprint { .. } => "custom fingerprint".to_string(),
            GroupingVariant::Component { config_id, .. } => {
                format!("grouped by {config_id}")
            }
            GroupingVariant::Salted { config_id, .. } => {
                format!("salted fingerprint grouped by {config_id}")
            }
            GroupingVariant::Fallback => "fallback grouping".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::GroupingComponent;

    fn contributing_component(token: &str) -> GroupingComponent {
        let mut c = GroupingComponent::new("default");
        c.set_values(vec![token.into()]);
        c.set_contributes(true);
        c
    }

    #[test]
    fn checksum_hash_is_verbatim() {
        let v = GroupingVariant::Checksum { checksum: "c".repeat(32) };
        assert_eq!(v.hash().unwrap(), "c".repeat(32));
        assert!(v.contributes());
    }

    #[test]
    fn hashed_checksum_differs_from_raw() {
        let v = GroupingVariant::HashedChecksum { checksum: "release-3 please group".to_string() };
        let hash = v.hash().unwrap();
        assert_ne!(hash, "release-3 please group");
        assert!(crate::hashing::is_hash_like(&hash));
    }

    #[test]
    fn custom_fingerprint_hashes_tokens_in_order() {
        let v = GroupingVariant::CustomFingerprint {
            values: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(v.hash().unwrap(), hash_from_values(["a", "b"]));
    }

    #[test]
    fn component_variant_defers_to_the_tree() {
        let v = GroupingVariant::Component {
            component: contributing_component("x"),
            config_id: "builtin:2025-04".to_string(),
        };
        assert_eq!(v.hash(), Some(hash_from_values(["x"])));

        let inert = GroupingVariant::Component {
            component: GroupingComponent::new("default"),
            config_id: "builtin:2025-04".to_string(),
        };
        assert!(!inert.contributes());
        assert_eq!(inert.hash(), None);
    }

    #[test]
    fn salted_hash_splices_component_values_at_placeholders() {
        let v = GroupingVariant::Salted {
            fingerprint: vec!["{{ default }}".to_string(), "foo".to_string()],
            component: contributing_component("x"),
            config_id: "builtin:2025-04".to_string(),
        };
        assert_eq!(v.hash(), Some(hash_from_values(["x", "foo"])));
    }

    #[test]
    fn salted_hash_is_none_when_component_is_inert() {
        let v = GroupingVariant::Salted {
            fingerprint: vec!["{{ default }}".to_string(), "foo".to_string()],
            component: GroupingComponent::new("default"),
            config_id: "builtin:2025-04".to_string(),
        };
        assert_eq!(v.hash(), None);
    }

    #[test]
    fn fallback_hash_is_constant() {
        assert_eq!(GroupingVariant::Fallback.hash(), Some(fallback_hash()));
        assert!(GroupingVariant::Fallback.contributes());
    }
}
