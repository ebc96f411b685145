//! Grouping configurations.
//!
//! A [`GroupingConfig`] names a strategy pipeline (by id, resolved through a
//! [`ConfigRegistry`]) and carries the enhancement rules strategies consume.
//! Configurations are immutable after loading and `Arc`-shared internals
//! make them cheap to pass around read-only.
//!
//! The persisted shape is the stable two-field dictionary
//! `{ "id": ..., "enhancements": ... }` ([`GroupingConfigDict`]); it is
//! stored with the event at ingestion time so the same grouping can be
//! recomputed later even after project settings change.
//!
//! Loading policy:
//!
//! - Unknown config id while reading *project settings*: silently replaced
//!   by [`DEFAULT_CONFIG`], unless the caller asks for strict mode.
//! - Unknown config id in [`load_grouping_config`]: surfaces as
//!   [`ConfigError::NotFound`] (the dict was persisted, so this is real
//!   breakage, not a stale project option).
//! - Missing `id` field: [`ConfigError::Malformed`], always loud.
//! - Broken user-authored rule text (fingerprinting or enhancements): falls
//!   back to the empty/default rule set. Grouping never fails because of a
//!   typo in user rules.

use crate::enhancer::{
    DEFAULT_ENHANCEMENT_BASE, ENHANCEMENT_BASES, Enhancements, default_enhancements_blob,
};
use crate::errors::ConfigError;
use crate::fingerprint::FingerprintingRules;
use crate::hashing::hash_from_values;
use crate::strategies::{ExceptionTypeStrategy, MessageStrategy};
use crate::strategy::StrategyPipeline;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Configuration id used when a project has none stored (or a stale one).
pub const DEFAULT_CONFIG: &str = "builtin:2025-04";

/// Project-option keys read by the loaders below.
pub const OPTION_GROUPING_CONFIG: &str = "grouping:config";
pub const OPTION_ENHANCEMENTS: &str = "grouping:enhancements";
pub const OPTION_ENHANCEMENTS_BASE: &str = "grouping:enhancements_base";
pub const OPTION_FINGERPRINT_RULES: &str = "grouping:fingerprint_rules";

/// The stable persisted/transmitted configuration shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupingConfigDict {
    pub id: String,
    pub enhancements: String,
}

/// A loaded, immutable grouping configuration.
#[derive(Debug, Clone)]
pub struct GroupingConfig {
    id: String,
    enhancements: Enhancements,
    pipeline: Arc<StrategyPipeline>,
}

impl GroupingConfig {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Enhancement rules, opaque to arbitration, interpreted by strategies.
    pub fn enhancements(&self) -> &Enhancements {
        &self.enhancements
    }

    pub fn pipeline(&self) -> &StrategyPipeline {
        &self.pipeline
    }
}

/// An explicit id → pipeline registry.
///
/// Built and passed in rather than looked up ambiently, so tests can run
/// against fake pipelines deterministically.
#[derive(Debug, Clone, Default)]
pub struct ConfigRegistry {
    pipelines: IndexMap<String, Arc<StrategyPipeline>>,
}

impl ConfigRegistry {
    pub fn new() -> Self {
        ConfigRegistry::default()
    }

    pub fn register(&mut self, id: impl Into<String>, pipeline: StrategyPipeline) {
        self.pipelines.insert(id.into(), Arc::new(pipeline));
    }

    pub fn contains(&self, id: &str) -> bool {
        self.pipelines.contains_key(id)
    }

    pub fn resolve(&self, id: &str) -> Result<&Arc<StrategyPipeline>, ConfigError> {
        self.pipelines.get(id).ok_or_else(|| ConfigError::NotFound(id.to_string()))
    }

    /// The registry of built-in configurations.
    pub fn builtin() -> &'static ConfigRegistry {
        static BUILTIN: Lazy<ConfigRegistry> = Lazy::new(|| {
            let mut registry = ConfigRegistry::new();
            registry.register(
                "legacy:2024-01",
                StrategyPipeline::new(vec![Arc::new(MessageStrategy)]),
            );
            registry.register(
                DEFAULT_CONFIG,
                StrategyPipeline::new(vec![
                    Arc::new(ExceptionTypeStrategy),
                    Arc::new(MessageStrategy),
                ]),
            );
            registry
        });
        &BUILTIN
    }
}

/// The default configuration dict (optionally under another known id).
pub fn default_grouping_config_dict(id: Option<&str>) -> GroupingConfigDict {
    GroupingConfigDict {
        id: id.unwrap_or(DEFAULT_CONFIG).to_string(),
        enhancements: default_enhancements_blob(),
    }
}

/// Load a configuration dict into an executable [`GroupingConfig`].
pub fn load_grouping_config(
    dict: &GroupingConfigDict,
    registry: &ConfigRegistry,
) -> Result<GroupingConfig, ConfigError> {
    let pipeline = registry.resolve(&dict.id)?.clone();
    let enhancements = Enhancements::deserialize(&dict.enhancements).unwrap_or_else(|err| {
        debug!(config = %dict.id, %err, "undecodable enhancements blob, using defaults");
        Enhancements::default()
    });
    Ok(GroupingConfig { id: dict.id.clone(), enhancements, pipeline })
}

/// Load a configuration from a raw JSON value (for example, the
/// `grouping_config` field stored with event data).
///
/// A missing `id` field is a malformed dictionary — programmer error, never
/// silently defaulted.
pub fn load_grouping_config_from_value(
    value: &serde_json::Value,
    registry: &ConfigRegistry,
) -> Result<GroupingConfig, ConfigError> {
    let object = value.as_object().ok_or_else(|| ConfigError::Malformed("not an object".to_string()))?;
    let id = object
        .get("id")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ConfigError::Malformed("missing 'id' field".to_string()))?;
    let enhancements = object
        .get("enhancements")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .unwrap_or_else(default_enhancements_blob);
    load_grouping_config(&GroupingConfigDict { id: id.to_string(), enhancements }, registry)
}

/// Read-only access to a project's stored options.
pub trait ProjectOptions {
    fn get_option(&self, key: &str) -> Option<String>;
}

impl ProjectOptions for HashMap<String, String> {
    fn get_option(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Fetch everything grouping needs from project settings as a persistable
/// dict. The result is stored with the event on ingestion so grouping can
/// be re-run later against the same configuration.
///
/// With `strict` false (the normal ingestion path) a stale config id falls
/// back to [`DEFAULT_CONFIG`]; with `strict` true it surfaces.
pub fn get_grouping_config_dict_for_project(
    project: &dyn ProjectOptions,
    registry: &ConfigRegistry,
    strict: bool,
) -> Result<GroupingConfigDict, ConfigError> {
    let config_id = match project.get_option(OPTION_GROUPING_CONFIG) {
        Some(id) if registry.contains(&id) => id,
        Some(id) if strict => return Err(ConfigError::NotFound(id)),
        Some(id) => {
            debug!(config = %id, "stored grouping config unknown, using default");
            DEFAULT_CONFIG.to_string()
        }
        None => DEFAULT_CONFIG.to_string(),
    };

    Ok(GroupingConfigDict {
        id: config_id,
        enhancements: project_enhancements_blob(project),
    })
}

fn project_enhancements_blob(project: &dyn ProjectOptions) -> String {
    let text = project.get_option(OPTION_ENHANCEMENTS).unwrap_or_default();
    let base = project.get_option(OPTION_ENHANCEMENTS_BASE);
    if text.is_empty() && base.is_none() {
        return default_enhancements_blob();
    }

    let base = match base {
        Some(b) if ENHANCEMENT_BASES.contains(&b.as_str()) => b,
        _ => DEFAULT_ENHANCEMENT_BASE.to_string(),
    };

    // Parsing is cheap but not free; blobs are content-addressed so repeat
    // ingestion for the same project hits the cache.
    static CACHE: Lazy<RwLock<HashMap<String, String>>> = Lazy::new(|| RwLock::new(HashMap::new()));
    let cache_key = hash_from_values([base.as_str(), text.as_str()]);
    if let Some(blob) = CACHE.read().expect("enhancements cache poisoned").get(&cache_key) {
        return blob.clone();
    }

    let blob = match Enhancements::parse(&text, &[base.as_str()]) {
        Ok(enhancements) => enhancements.serialize(),
        Err(err) => {
            debug!(%err, "invalid project enhancements, using defaults");
            default_enhancements_blob()
        }
    };
    CACHE.write().expect("enhancements cache poisoned").insert(cache_key, blob.clone());
    blob
}

/// Load a project's server-side fingerprinting rules.
///
/// Broken rule text falls back to the empty rule set; the parsed form is
/// cached content-addressed (a concurrent duplicate miss just recomputes).
pub fn get_fingerprinting_rules_for_project(project: &dyn ProjectOptions) -> FingerprintingRules {
    let text = match project.get_option(OPTION_FINGERPRINT_RULES) {
        Some(t) if !t.is_empty() => t,
        _ => return FingerprintingRules::empty(),
    };

    static CACHE: Lazy<RwLock<HashMap<String, String>>> = Lazy::new(|| RwLock::new(HashMap::new()));
    let cache_key = hash_from_values([text.as_str()]);
    if let Some(serialized) = CACHE.read().expect("fingerprinting cache poisoned").get(&cache_key) {
        return FingerprintingRules::parse(serialized).unwrap_or_default();
    }

    let rules = match FingerprintingRules::parse(&text) {
        Ok(rules) => rules,
        Err(err) => {
            debug!(%err, "invalid project fingerprinting rules, ignoring");
            FingerprintingRules::empty()
        }
    };
    CACHE
        .write()
        .expect("fingerprinting cache poisoned")
        .insert(cache_key, rules.serialize());
    rules
}
