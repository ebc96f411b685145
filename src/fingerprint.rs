//! Fingerprint handling.
//!
//! An event's fingerprint is an ordered list of string tokens. The reserved
//! *default placeholder* token stands in for "the automatically computed
//! grouping signal goes here". This module owns:
//!
//! - The placeholder constants and the single equality check used everywhere
//!   ([`is_default_placeholder`]).
//! - Server-side fingerprint overrides ([`apply_fingerprint_overrides`]):
//!   splicing rule-engine output into an event's fingerprint in place of
//!   each placeholder occurrence.
//! - A compact fingerprinting rule DSL ([`FingerprintingRules`]): one rule
//!   per line, `matcher:pattern ... -> token token`, first match wins.
//!
//! ```text
//! # rules source                          # event
//! type:DatabaseError* -> db-down         exception.type = "DatabaseError2"
//!
//! fingerprint before: ["{{ default }}", "shard-7"]
//! fingerprint after:  ["db-down", "shard-7"]
//! ```

use crate::api::Event;
use crate::errors::InvalidRuleConfig;
use regex::Regex;
use tracing::debug;

/// The canonical default placeholder token.
pub const DEFAULT_FINGERPRINT: &str = "{{ default }}";

/// All spellings recognized as the default placeholder.
const DEFAULT_FINGERPRINT_VALUES: [&str; 2] = ["{{ default }}", "{{default}}"];

/// True if `token` is a default placeholder. This is the only place the
/// placeholder spellings are compared.
pub fn is_default_placeholder(token: &str) -> bool {
    DEFAULT_FINGERPRINT_VALUES.contains(&token)
}

/// Number of placeholder tokens in a fingerprint.
pub(crate) fn count_defaults(fingerprint: &[String]) -> usize {
    fingerprint.iter().filter(|t| is_default_placeholder(t)).count()
}

/// Apply server-side fingerprint overrides to `event` in place.
///
/// No-op unless the fingerprint references a default placeholder and
/// `rules` produce override values for this event. Each placeholder
/// occurrence is replaced by the *entire* override sequence, spliced in at
/// that position; literal tokens pass through unchanged.
pub fn apply_fingerprint_overrides(event: &mut Event, rules: &FingerprintingRules) {
    if !event.fingerprint.iter().any(|t| is_default_placeholder(t)) {
        return;
    }

    let Some(new_values) = rules.fingerprint_for_event(event) else {
        return;
    };

    let mut new_fingerprint = Vec::with_capacity(event.fingerprint.len() + new_values.len());
    for token in &event.fingerprint {
        if is_default_placeholder(token) {
            new_fingerprint.extend(new_values.iter().cloned());
        } else {
            new_fingerprint.push(token.clone());
        }
    }

    debug!(before = ?event.fingerprint, after = ?new_fingerprint, "fingerprint overridden by server rules");
    event.fingerprint = new_fingerprint;
}

// --- Rule DSL ----------------------------------------------------------------

/// Event fields a matcher can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchField {
    Message,
    Type,
    Value,
    Logger,
}

impl MatchField {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "message" => Some(MatchField::Message),
            "type" => Some(MatchField::Type),
            "value" => Some(MatchField::Value),
            "logger" => Some(MatchField::Logger),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            MatchField::Message => "message",
            MatchField::Type => "type",
            MatchField::Value => "value",
            MatchField::Logger => "logger",
        }
    }
}

/// A single `field:glob` matcher.
#[derive(Debug, Clone)]
pub struct FingerprintMatcher {
    field: MatchField,
    pattern: String,
    regex: Regex,
}

impl FingerprintMatcher {
    fn new(field: MatchField, pattern: &str) -> Result<Self, regex::Error> {
        Ok(FingerprintMatcher { field, pattern: pattern.to_string(), regex: glob_to_regex(pattern)? })
    }

    fn matches(&self, event: &Event) -> bool {
        let value = match self.field {
            MatchField::Message => event.message.as_deref(),
            MatchField::Type => event.exception.as_ref().and_then(|e| e.ty.as_deref()),
            MatchField::Value => event.exception.as_ref().and_then(|e| e.value.as_deref()),
            MatchField::Logger => event.logger.as_deref(),
        };
        value.is_some_and(|v| self.regex.is_match(v))
    }
}

/// One rule: all matchers must hold, then `fingerprint` is the override.
#[derive(Debug, Clone)]
pub struct FingerprintRule {
    matchers: Vec<FingerprintMatcher>,
    fingerprint: Vec<String>,
}

/// An ordered set of fingerprinting rules.
///
/// Parsed from a line-oriented source; [`serialize`](Self::serialize)
/// round-trips through [`parse`](Self::parse).
#[derive(Debug, Clone, Default)]
pub struct FingerprintingRules {
    rules: Vec<FingerprintRule>,
}

impl FingerprintingRules {
    /// The empty rule set: matches nothing, overrides nothing.
    pub fn empty() -> Self {
        FingerprintingRules::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Parse a rules source. Blank lines and `#` comments are skipped;
    /// every other line must read `matcher... -> token...`.
    pub fn parse(text: &str) -> Result<Self, InvalidRuleConfig> {
        let mut rules = Vec::new();

        for (idx, raw_line) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (matcher_part, fingerprint_part) = line.split_once("->").ok_or_else(|| {
                InvalidRuleConfig { line: line_no, reason: "missing '->'".to_string() }
            })?;

            let mut matchers = Vec::new();
            for item in split_quoted(matcher_part) {
                let (field_name, pattern) = item.split_once(':').ok_or_else(|| InvalidRuleConfig {
                    line: line_no,
                    reason: format!("matcher '{item}' is not of the form field:pattern"),
                })?;
                let field = MatchField::parse(field_name).ok_or_else(|| InvalidRuleConfig {
                    line: line_no,
                    reason: format!("unknown matcher field '{field_name}'"),
                })?;
                let matcher = FingerprintMatcher::new(field, &unquote(pattern)).map_err(|e| {
                    InvalidRuleConfig { line: line_no, reason: format!("bad pattern: {e}") }
                })?;
                matchers.push(matcher);
            }
            if matchers.is_empty() {
                return Err(InvalidRuleConfig { line: line_no, reason: "rule has no matchers".to_string() });
            }

            let fingerprint: Vec<String> = split_quoted(fingerprint_part).into_iter().map(|t| unquote(&t)).collect();
            if fingerprint.is_empty() {
                return Err(InvalidRuleConfig {
                    line: line_no,
                    reason: "rule has no fingerprint values".to_string(),
                });
            }

            rules.push(FingerprintRule { matchers, fingerprint });
        }

        Ok(FingerprintingRules { rules })
    }

    /// Render back to canonical rule source (round-trips with `parse`).
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for rule in &self.rules {
            let matchers: Vec<String> = rule
                .matchers
                .iter()
                .map(|m| format!("{}:{}", m.field.as_str(), quote_if_needed(&m.pattern)))
                .collect();
            let values: Vec<String> = rule.fingerprint.iter().map(|v| quote_if_needed(v)).collect();
            out.push_str(&matchers.join(" "));
            out.push_str(" -> ");
            out.push_str(&values.join(" "));
            out.push('\n');
        }
        out
    }

    /// Evaluate the rules against an event. The first rule whose matchers
    /// all hold wins; `None` means no override.
    pub fn fingerprint_for_event(&self, event: &Event) -> Option<Vec<String>> {
        self.rules
            .iter()
            .find(|rule| rule.matchers.iter().all(|m| m.matches(event)))
            .map(|rule| rule.fingerprint.clone())
    }
}

/// Translate a glob pattern (`*` and `?` wildcards) to an anchored regex.
fn glob_to_regex(pattern: &str) -> Result<Regex, regex::Error> {
    let mut re = String::with_capacity(pattern.len() + 2);
    re.push('^');
    for ch in pattern.chars() {
        match ch {
            '*' => re.push_str(".*"),
            '?' => re.push('.'),
            _ => re.push_str(&regex::escape(&ch.to_string())),
        }
    }
    re.push('$');
    Regex::new(&re)
}

/// Split on whitespace, keeping double-quoted runs intact.
fn split_quoted(s: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for ch in s.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    items.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        items.push(current);
    }
    items
}

fn unquote(s: &str) -> String {
    let s = s.trim();
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') { s[1..s.len() - 1].to_string() } else { s.to_string() }
}

fn quote_if_needed(s: &str) -> String {
    if s.chars().any(char::is_whitespace) { format!("\"{s}\"") } else { s.to_string() }
}
