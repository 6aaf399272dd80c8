//! Differ - Compare previously applied attributes with desired attributes
//!
//! Produces the set of attribute names whose value differs, which providers
//! use to decide which remote operations an update needs.

use std::collections::{BTreeSet, HashMap};

use crate::resource::Value;

/// Attribute-level changes between two attribute maps
#[derive(Debug, Clone, Default)]
pub struct AttributeChanges {
    old: HashMap<String, Value>,
    new: HashMap<String, Value>,
    changed: BTreeSet<String>,
}

impl AttributeChanges {
    /// Compute changes between the previously applied and the desired attributes
    pub fn between(old: &HashMap<String, Value>, new: &HashMap<String, Value>) -> Self {
        let changed = find_changed_attributes(old, new);
        Self {
            old: old.clone(),
            new: new.clone(),
            changed,
        }
    }

    /// Returns whether the attribute changed
    pub fn has_change(&self, name: &str) -> bool {
        self.changed.contains(name)
    }

    /// Returns whether any of the attributes changed
    pub fn has_any_change(&self, names: &[&str]) -> bool {
        names.iter().any(|name| self.has_change(name))
    }

    /// Old and new value of an attribute
    pub fn get_change(&self, name: &str) -> (Option<&Value>, Option<&Value>) {
        (self.old.get(name), self.new.get(name))
    }

    /// Changed attribute names in lexical order
    pub fn changed(&self) -> impl Iterator<Item = &str> {
        self.changed.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }
}

/// Find attributes whose value differs, including ones present on one side only
fn find_changed_attributes(
    old: &HashMap<String, Value>,
    new: &HashMap<String, Value>,
) -> BTreeSet<String> {
    let mut changed = BTreeSet::new();

    for key in old.keys().chain(new.keys()) {
        // Skip internal attributes (starting with _)
        if key.starts_with('_') {
            continue;
        }
        if old.get(key) != new.get(key) {
            changed.insert(key.clone());
        }
    }

    changed
}
