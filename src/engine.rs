//! Variant resolution engine.
//!
//! This module is the deduplication brain: given one event and one loaded
//! configuration, produce the full set of grouping variants, exactly one of
//! which legitimately determines the event's bucket.
//!
//! ## How the parts work together
//!
//! Resolving an event is a short pipeline with two early exits:
//!
//! ```text
//! event ── checksum set? ──────────▶ checksum / hashed-checksum variants
//!   │                                (assemble.rs; strategies never run)
//!   no placeholder in fingerprint? ─▶ custom-fingerprint variant
//!   │                                (assemble.rs; strategies never run)
//!   ▼
//! strategy pipeline (config order)
//!   │  resolve_variants              (resolve.rs)
//!   │   - buffer components per variant name
//!   │   - first contributing strategy wins
//!   │   - later strategies suppressed, hint attached
//!   ▼
//! merged component per variant
//!   │  assemble_variants             (assemble.rs)
//!   │   - pure default fingerprint  -> Component variants
//!   │   - mixed/multiple defaults   -> Salted variants
//!   │   - nothing contributes       -> + Fallback variant
//!   ▼
//! IndexMap<variant name, GroupingVariant>
//! ```
//!
//! The whole computation is pure and synchronous: it builds its own
//! component trees per invocation and reads the configuration immutably, so
//! concurrent resolutions need no coordination.
//!
//! ## Responsibilities by module
//!
//! - `resolve.rs`: precedence arbitration across strategies (the ordering
//!   contract and the global cross-variant suppression rule live there).
//! - `assemble.rs`: checksum shortcut, fingerprint-shape dispatch, salting,
//!   and the fallback guarantee.

#[path = "engine/assemble.rs"]
mod assemble;
#[path = "engine/resolve.rs"]
mod resolve;

pub(crate) use assemble::assemble_variants;
pub(crate) use resolve::resolve_variants;
