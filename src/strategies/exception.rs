//! Exception-based grouping strategy.

use crate::api::Event;
use crate::component::{ComponentValue, GroupingComponent};
use crate::config::GroupingConfig;
use crate::strategies::message::normalize_message;
use crate::strategy::{DEFAULT_VARIANT, Strategy};
use indexmap::IndexMap;

/// Groups events by exception type, salted with the normalized exception
/// value when present. The type alone is a strong signal; the value only
/// refines it.
#[derive(Debug, Default)]
pub struct ExceptionTypeStrategy;

impl Strategy for ExceptionTypeStrategy {
    fn name(&self) -> &'static str {
        "exception-type"
    }

    fn variants(&self, event: &Event, _config: &GroupingConfig) -> IndexMap<String, GroupingComponent> {
        let mut component = GroupingComponent::new("exception");

        let ty = event.exception.as_ref().and_then(|e| e.ty.as_deref());
        match ty {
            Some(ty) if !ty.is_empty() => {
                let mut type_node = GroupingComponent::new("type");
                type_node.set_values(vec![ty.into()]);
                type_node.set_contributes(true);

                let mut values: Vec<ComponentValue> = vec![type_node.into()];
                if let Some(value) = event.exception.as_ref().and_then(|e| e.value.as_deref()) {
                    let mut value_node = GroupingComponent::new("value");
                    value_node.set_values(vec![normalize_message(value).into()]);
                    value_node.set_contributes(true);
                    values.push(value_node.into());
                }
                component.set_values(values);
            }
            _ => {
                component.set_contributes(false);
                component.set_hint("no exception in event");
            }
        }

        IndexMap::from([(DEFAULT_VARIANT.to_string(), component)])
    }
}
