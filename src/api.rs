use crate::config::GroupingConfig;
use crate::engine;
use crate::fingerprint::DEFAULT_FINGERPRINT;
use crate::variant::GroupingVariant;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The exception attached to an event, if any. Consumed by strategies and
/// fingerprint matchers; opaque to arbitration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionInfo {
    #[serde(default, rename = "type")]
    pub ty: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

/// An incoming error/event record, as far as grouping is concerned.
///
/// `fingerprint` defaults to the single default placeholder; `extra`
/// swallows any payload fields this crate does not interpret so events can
/// round-trip through JSON unmodified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default = "default_fingerprint")]
    pub fingerprint: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logger: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception: Option<ExceptionInfo>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn default_fingerprint() -> Vec<String> {
    vec![DEFAULT_FINGERPRINT.to_string()]
}

impl Default for Event {
    fn default() -> Self {
        Event {
            fingerprint: default_fingerprint(),
            checksum: None,
            message: None,
            logger: None,
            exception: None,
            extra: serde_json::Map::new(),
        }
    }
}

/// Compute all grouping variants for `event` under `config`.
///
/// The returned map is ordered and deterministic: resolving the same
/// `(event, config)` pair twice yields identical variants and hashes. Every
/// event yields at least one contributing variant (the fallback guard).
///
/// # Example
/// ```
/// use groupling::{ConfigRegistry, Event, default_grouping_config_dict, get_grouping_variants,
///                 load_grouping_config};
///
/// let config =
///     load_grouping_config(&default_grouping_config_dict(None), ConfigRegistry::builtin()).unwrap();
/// let mut event = Event::default();
/// event.message = Some("connection refused".to_string());
///
/// let variants = get_grouping_variants(&event, &config);
/// assert!(variants.values().any(|v| v.contributes()));
/// ```
pub fn get_grouping_variants(
    event: &Event,
    config: &GroupingConfig,
) -> IndexMap<String, GroupingVariant> {
    engine::assemble_variants(event, config)
}

/// The ordered, deduplicated hashes of all contributing variants.
///
/// Callers persist these (plus the variant kinds) to bucket the event; the
/// first entry is the authoritative one under the map's variant order.
pub fn get_hashes(variants: &IndexMap<String, GroupingVariant>) -> Vec<String> {
    let mut hashes = Vec::new();
    for variant in variants.values() {
        if let Some(hash) = variant.hash() {
            if !hashes.contains(&hash) {
                hashes.push(hash);
            }
        }
    }
    hashes
}
