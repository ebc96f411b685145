//! groupling — deterministic grouping keys for error events.
//!
//! Given one event and a named grouping configuration, compute the set of
//! candidate grouping variants and the hashes that decide which issue the
//! event is bucketed into. The result is deterministic, explainable (every
//! suppressed signal carries a hint naming the winner), and total: even a
//! degenerate event lands in the fallback bucket.
//!
//! ```
//! use groupling::{ConfigRegistry, Event, default_grouping_config_dict, get_grouping_variants,
//!                 get_hashes, load_grouping_config};
//!
//! let config =
//!     load_grouping_config(&default_grouping_config_dict(None), ConfigRegistry::builtin()).unwrap();
//!
//! let mut event = Event::default();
//! event.message = Some("connection refused after 3 retries".to_string());
//!
//! let variants = get_grouping_variants(&event, &config);
//! let hashes = get_hashes(&variants);
//! assert_eq!(hashes.len(), 1);
//! ```

extern crate self as groupling;

#[macro_use]
mod macros;

mod api;
mod component;
mod config;
mod engine;
mod enhancer;
mod errors;
mod fingerprint;
mod hashing;
mod strategies;
mod strategy;
mod variant;

pub use api::{Event, ExceptionInfo, get_grouping_variants, get_hashes};
pub use component::{ComponentValue, GroupingComponent};
pub use config::{
    ConfigRegistry, DEFAULT_CONFIG, GroupingConfig, GroupingConfigDict, OPTION_ENHANCEMENTS,
    OPTION_ENHANCEMENTS_BASE, OPTION_FINGERPRINT_RULES, OPTION_GROUPING_CONFIG, ProjectOptions,
    default_grouping_config_dict, get_fingerprinting_rules_for_project,
    get_grouping_config_dict_for_project, load_grouping_config, load_grouping_config_from_value,
};
pub use enhancer::{DEFAULT_ENHANCEMENT_BASE, ENHANCEMENT_BASES, Enhancements};
pub use errors::{ConfigError, InvalidEnhancerConfig, InvalidRuleConfig};
pub use fingerprint::{
    DEFAULT_FINGERPRINT, FingerprintingRules, apply_fingerprint_overrides, is_default_placeholder,
};
pub use hashing::{fallback_hash, hash_from_values, is_hash_like};
pub use strategies::{ExceptionTypeStrategy, MessageStrategy};
pub use strategy::{DEFAULT_VARIANT, Strategy, StrategyPipeline};
pub use variant::GroupingVariant;
