//! Enhancement rules.
//!
//! Enhancements tune how strategies weigh event data (for example, marking
//! frames as in-app or out of the grouping). The grouping core treats them
//! as an opaque, serializable blob attached to a [`GroupingConfig`]: it
//! validates and round-trips them, and hands them to strategies untouched.
//!
//! Source format is line-oriented: `matcher action`, where the action is
//! one of `+app`, `-app`, `+group`, `-group`. A parsed rule set is persisted
//! as a small versioned JSON blob so the serialized form can evolve without
//! breaking stored configurations.

use crate::errors::InvalidEnhancerConfig;
use serde::{Deserialize, Serialize};

/// Serialized blob version. Bump when [`Blob`] changes shape.
const BLOB_VERSION: u32 = 1;

/// The base rule set applied when a project configures none.
pub const DEFAULT_ENHANCEMENT_BASE: &str = "common:v1";

/// Known base rule-set names.
pub const ENHANCEMENT_BASES: [&str; 2] = ["common:v1", "mobile:v1"];

#[derive(Debug, Serialize, Deserialize)]
struct Blob {
    version: u32,
    bases: Vec<String>,
    rules: Vec<String>,
}

/// A validated set of enhancement rules plus the bases they extend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enhancements {
    bases: Vec<String>,
    rules: Vec<String>,
}

impl Enhancements {
    /// Parse an enhancement source on top of the given bases.
    pub fn parse(text: &str, bases: &[&str]) -> Result<Self, InvalidEnhancerConfig> {
        let mut rules = Vec::new();

        for (idx, raw_line) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((matcher, action)) = line.rsplit_once(char::is_whitespace) else {
                return Err(InvalidEnhancerConfig {
                    line: line_no,
                    reason: "expected 'matcher action'".to_string(),
                });
            };
            if matcher.trim().is_empty() {
                return Err(InvalidEnhancerConfig { line: line_no, reason: "empty matcher".to_string() });
            }
            if !matches!(action, "+app" | "-app" | "+group" | "-group") {
                return Err(InvalidEnhancerConfig {
                    line: line_no,
                    reason: format!("unknown action '{action}'"),
                });
            }

            rules.push(line.to_string());
        }

        Ok(Enhancements { bases: bases.iter().map(|b| b.to_string()).collect(), rules })
    }

    /// Serialize to the opaque blob stored inside a configuration dict.
    pub fn serialize(&self) -> String {
        let blob = Blob {
            version: BLOB_VERSION,
            bases: self.bases.clone(),
            rules: self.rules.clone(),
        };
        // Blob has no map keys that can fail to serialize.
        serde_json::to_string(&blob).expect("enhancement blob serializes")
    }

    /// Load from a serialized blob (inverse of [`serialize`](Self::serialize)).
    pub fn deserialize(blob: &str) -> Result<Self, InvalidEnhancerConfig> {
        let parsed: Blob = serde_json::from_str(blob)
            .map_err(|e| InvalidEnhancerConfig::blob(format!("undecodable blob: {e}")))?;
        if parsed.version != BLOB_VERSION {
            return Err(InvalidEnhancerConfig::blob(format!(
                "unsupported blob version {}",
                parsed.version
            )));
        }
        Ok(Enhancements { bases: parsed.bases, rules: parsed.rules })
    }

    pub fn bases(&self) -> &[String] {
        &self.bases
    }

    /// The raw rule lines, for strategies that interpret them.
    pub fn rules(&self) -> &[String] {
        &self.rules
    }
}

/// Blob for the default enhancements (default base, no custom rules).
pub fn default_enhancements_blob() -> String {
    Enhancements::parse("", &[DEFAULT_ENHANCEMENT_BASE])
        .expect("empty enhancement source parses")
        .serialize()
}
