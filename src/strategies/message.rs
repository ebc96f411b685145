//! Message-based grouping strategy.

use crate::api::Event;
use crate::component::GroupingComponent;
use crate::config::GroupingConfig;
use crate::strategy::{DEFAULT_VARIANT, Strategy};
use indexmap::IndexMap;

/// Groups events by their message with volatile fragments templated out.
#[derive(Debug, Default)]
pub struct MessageStrategy;

/// Replace fragments that vary per occurrence (ids, counts, addresses) with
/// stable placeholders so messages that differ only in those still group
/// together.
pub(crate) fn normalize_message(message: &str) -> String {
    let text = regex!(r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
        .replace_all(message, "<uuid>");
    let text = regex!(r"\b[0-9a-f]{32,64}\b").replace_all(&text, "<hash>");
    let text = regex!(r"0x[0-9a-fA-F]+").replace_all(&text, "<addr>");
    let text = regex!(r"\d+").replace_all(&text, "<num>");
    text.into_owned()
}

impl Strategy for MessageStrategy {
    fn name(&self) -> &'static str {
        "message"
    }

    fn variants(&self, event: &Event, _config: &GroupingConfig) -> IndexMap<String, GroupingComponent> {
        let mut component = GroupingComponent::new("message");

        match event.message.as_deref().map(str::trim) {
            Some(message) if !message.is_empty() => {
                component.set_values(vec![normalize_message(message).into()]);
                component.set_contributes(true);
            }
            _ => {
                component.set_contributes(false);
                component.set_hint("no message in event");
            }
        }

        IndexMap::from([(DEFAULT_VARIANT.to_string(), component)])
    }
}
