use std::collections::HashMap;

use shared::domain::OptionId;

use crate::module::ModuleSpec;

/// One selectable option: an optional fragment path and an optional module
/// constructor. Options with neither render the no-content placeholder.
#[derive(Debug, Clone)]
pub struct OptionEntry {
    pub label: String,
    pub fragment_path: Option<String>,
    pub module: Option<ModuleSpec>,
}

impl OptionEntry {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            fragment_path: None,
            module: None,
        }
    }

    pub fn with_fragment(mut self, path: impl Into<String>) -> Self {
        self.fragment_path = Some(path.into());
        self
    }

    pub fn with_module(mut self, spec: ModuleSpec) -> Self {
        self.module = Some(spec);
        self
    }
}

/// Static registry mapping option ids to fragment paths and module
/// constructors. Registration order is preserved; the first registered
/// option is the grid default. Owned by the controller, never ambient.
#[derive(Debug, Default)]
pub struct OptionRegistry {
    order: Vec<OptionId>,
    entries: HashMap<OptionId, OptionEntry>,
}

impl OptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, option: impl Into<OptionId>, entry: OptionEntry) {
        let option = option.into();
        if !self.entries.contains_key(&option) {
            self.order.push(option.clone());
        }
        self.entries.insert(option, entry);
    }

    pub fn entry(&self, option: &OptionId) -> Option<&OptionEntry> {
        self.entries.get(option)
    }

    pub fn fragment_path(&self, option: &OptionId) -> Option<&str> {
        self.entries
            .get(option)
            .and_then(|entry| entry.fragment_path.as_deref())
    }

    pub fn module_spec(&self, option: &OptionId) -> Option<&ModuleSpec> {
        self.entries.get(option).and_then(|entry| entry.module.as_ref())
    }

    pub fn default_option(&self) -> Option<&OptionId> {
        self.order.first()
    }

    pub fn options(&self) -> impl Iterator<Item = &OptionId> {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_registered_option_is_the_default() {
        let mut registry = OptionRegistry::new();
        registry.register("option02", OptionEntry::new("Option 02"));
        registry.register("option01", OptionEntry::new("Option 01"));
        assert_eq!(registry.default_option(), Some(&OptionId::from("option02")));
    }

    #[test]
    fn re_registration_keeps_order_position() {
        let mut registry = OptionRegistry::new();
        registry.register("a", OptionEntry::new("A"));
        registry.register("b", OptionEntry::new("B"));
        registry.register("a", OptionEntry::new("A2").with_fragment("content/a.html"));

        let order: Vec<_> = registry.options().cloned().collect();
        assert_eq!(order, vec![OptionId::from("a"), OptionId::from("b")]);
        assert_eq!(
            registry.fragment_path(&OptionId::from("a")),
            Some("content/a.html")
        );
    }
}
