//! Grouping component trees.
//!
//! A [`GroupingComponent`] is a labeled, nestable contribution node. Leaves
//! carry primitive string tokens; interior nodes group the contributions of
//! sub-features (or, at the top level, of whole strategies). Each node
//! tracks whether it *contributes* to the final grouping hash and can carry
//! a human-readable `hint` explaining why it does not.
//!
//! ```text
//! GroupingComponent(id: "app")
//!  ├─ GroupingComponent(id: "message-normalized")   contributes
//!  │   └─ "connection refused to <host>"
//!  └─ GroupingComponent(id: "exception")            suppressed
//!      └─ hint: "message-normalized takes precedence"
//! ```
//!
//! `contributes` is tri-state internally: unset until either explicitly
//! assigned (which always sticks) or derived from the values — a parent with
//! at least one contributing child component contributes. Readers observe
//! `false` for unset.

use crate::hashing::hash_from_values;

/// One entry in a component's ordered value list: either a primitive token
/// or a nested component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentValue {
    Token(String),
    Component(GroupingComponent),
}

impl From<&str> for ComponentValue {
    fn from(s: &str) -> Self {
        ComponentValue::Token(s.to_string())
    }
}

impl From<String> for ComponentValue {
    fn from(s: String) -> Self {
        ComponentValue::Token(s)
    }
}

impl From<GroupingComponent> for ComponentValue {
    fn from(c: GroupingComponent) -> Self {
        ComponentValue::Component(c)
    }
}

/// A labeled contribution node in the grouping tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupingComponent {
    id: String,
    hint: Option<String>,
    contributes: Option<bool>,
    values: Vec<ComponentValue>,
}

impl GroupingComponent {
    /// Create an empty, non-contributing component.
    pub fn new(id: impl Into<String>) -> Self {
        GroupingComponent { id: id.into(), hint: None, contributes: None, values: Vec::new() }
    }

    /// Create a component from values, deriving `contributes` from them
    /// (see [`set_values`](Self::set_values)).
    pub fn with_values(id: impl Into<String>, values: Vec<ComponentValue>) -> Self {
        let mut component = GroupingComponent::new(id);
        component.set_values(values);
        component
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn values(&self) -> &[ComponentValue] {
        &self.values
    }

    /// Whether this node should influence the final hash. Unset reads as
    /// `false`.
    pub fn contributes(&self) -> bool {
        self.contributes.unwrap_or(false)
    }

    /// Explicitly set `contributes`. Once set this way, later `set_values`
    /// calls no longer derive it.
    pub fn set_contributes(&mut self, contributes: bool) {
        self.contributes = Some(contributes);
    }

    pub fn set_hint(&mut self, hint: impl Into<String>) {
        self.hint = Some(hint.into());
    }

    /// Replace the value list. If `contributes` was never explicitly set,
    /// it is derived: the node contributes iff any nested component does.
    ///
    /// Primitive tokens alone do not flip the flag; a leaf that should
    /// contribute must say so via [`set_contributes`](Self::set_contributes).
    pub fn set_values(&mut self, values: Vec<ComponentValue>) {
        if self.contributes.is_none() {
            let any_contributing = values.iter().any(|v| match v {
                ComponentValue::Component(c) => c.contributes(),
                ComponentValue::Token(_) => false,
            });
            if any_contributing {
                self.contributes = Some(true);
            }
        }
        self.values = values;
    }

    /// Flatten the contributing subtree into the ordered token sequence
    /// used for hashing. Empty when this node does not contribute.
    pub fn flattened_values(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_values(&mut out);
        out
    }

    fn collect_values<'a>(&'a self, out: &mut Vec<&'a str>) {
        if !self.contributes() {
            return;
        }
        for value in &self.values {
            match value {
                ComponentValue::Token(s) => out.push(s.as_str()),
                ComponentValue::Component(c) => c.collect_values(out),
            }
        }
    }

    /// Hash of the flattened contributing values, or `None` when this node
    /// does not contribute.
    pub fn hash(&self) -> Option<String> {
        if self.contributes() { Some(hash_from_values(self.flattened_values())) } else { None }
    }

    /// One-line rendering for reports: id, contribution marker, and hint.
    pub fn describe(&self) -> String {
        let marker = if self.contributes() { "*" } else { " " };
        match &self.hint {
            Some(hint) => format!("{}{} ({})", marker, self.id, hint),
            None => format!("{}{}", marker, self.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: &str, token: &str, contributes: bool) -> GroupingComponent {
        let mut c = GroupingComponent::new(id);
        c.set_values(vec![token.into()]);
        c.set_contributes(contributes);
        c
    }

    #[test]
    fn empty_component_does_not_contribute() {
        let c = GroupingComponent::new("default");
        assert!(!c.contributes());
        assert_eq!(c.hash(), None);
    }

    #[test]
    fn parent_contributes_iff_a_child_does() {
        let parent = GroupingComponent::with_values(
            "default",
            vec![leaf("a", "x", false).into(), leaf("b", "y", true).into()],
        );
        assert!(parent.contributes());

        let inert = GroupingComponent::with_values(
            "default",
            vec![leaf("a", "x", false).into(), leaf("b", "y", false).into()],
        );
        assert!(!inert.contributes());
    }

    #[test]
    fn explicit_contributes_overrides_derivation() {
        let mut parent = GroupingComponent::new("default");
        parent.set_contributes(false);
        parent.set_values(vec![leaf("a", "x", true).into()]);
        assert!(!parent.contributes());
    }

    #[test]
    fn flattened_values_skip_non_contributing_subtrees() {
        let parent = GroupingComponent::with_values(
            "default",
            vec![leaf("a", "x", true).into(), leaf("b", "y", false).into(), leaf("c", "z", true).into()],
        );
        assert_eq!(parent.flattened_values(), vec!["x", "z"]);
    }

    #[test]
    fn hash_matches_flattened_values() {
        let parent =
            GroupingComponent::with_values("default", vec![leaf("a", "x", true).into()]);
        assert_eq!(parent.hash(), Some(crate::hashing::hash_from_values(["x"])));
    }
}
