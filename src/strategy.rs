//! Strategy capability contract.
//!
//! A strategy is one named computation step that inspects an event and
//! yields candidate grouping contributions, keyed by *variant name* (for
//! example `"default"`, `"app"`, `"system"`). The engine consumes strategies
//! purely through this trait; their internals never matter to arbitration.
//!
//! Contract: [`Strategy::variants`] must be pure and deterministic for an
//! identical `(event, config)` pair, and the order of strategies inside a
//! [`StrategyPipeline`] is fixed at construction — that order *is* the
//! precedence order (see `engine/resolve.rs`).

use crate::api::Event;
use crate::component::GroupingComponent;
use crate::config::GroupingConfig;
use indexmap::IndexMap;
use std::sync::Arc;

/// The implicit variant name used when a strategy has a single outcome.
pub const DEFAULT_VARIANT: &str = "default";

/// A named producer of candidate grouping components.
pub trait Strategy: Send + Sync {
    /// Stable strategy name; used in precedence hints and logs.
    fn name(&self) -> &'static str;

    /// Compute this strategy's contribution per variant name.
    ///
    /// Returning an empty map means the strategy has nothing to say about
    /// this event; returning a non-contributing component keeps the signal
    /// visible for diagnostics without influencing the hash.
    fn variants(&self, event: &Event, config: &GroupingConfig) -> IndexMap<String, GroupingComponent>;
}

/// An ordered, immutable sequence of strategies.
///
/// Construction fixes the iteration order; the same pipeline instance is
/// shared (read-only) across concurrent resolutions.
#[derive(Clone)]
pub struct StrategyPipeline {
    strategies: Vec<Arc<dyn Strategy>>,
}

impl StrategyPipeline {
    pub fn new(strategies: Vec<Arc<dyn Strategy>>) -> Self {
        StrategyPipeline { strategies }
    }

    pub fn strategies(&self) -> &[Arc<dyn Strategy>] {
        &self.strategies
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }
}

impl std::fmt::Debug for StrategyPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyPipeline").field("strategies", &self.names()).finish()
    }
}
