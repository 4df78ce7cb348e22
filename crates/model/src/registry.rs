use crate::error::{RegistryError, Result};
use crate::types::ClassDefinition;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Stable handle into a [`ClassRegistry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClassId(usize);

impl ClassId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Arena of class definitions with secondary indexes
///
/// Classes are stored in discovery order and never removed. The three indexes
/// (qualified name, variable id, documentation id) are derived data and can be
/// rebuilt from the arena at any time. Serializes as the plain list of classes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<ClassDefinition>", into = "Vec<ClassDefinition>")]
pub struct ClassRegistry {
    classes: Vec<ClassDefinition>,

    /// `namespace.name` -> class
    by_qualified: HashMap<String, ClassId>,

    /// Generated-dump variable -> class
    by_var_id: HashMap<String, ClassId>,

    /// Documentation id -> class
    by_doc_id: HashMap<String, ClassId>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new class
    ///
    /// Fails if the class's variable id is already bound to another class.
    pub fn insert(&mut self, class: ClassDefinition) -> Result<ClassId> {
        if let Some(var_id) = &class.var_id {
            if let Some(existing) = self.by_var_id.get(var_id) {
                return Err(RegistryError::DuplicateVariable {
                    var_id: var_id.clone(),
                    existing: self.classes[existing.0].qualified_name(),
                    incoming: class.qualified_name(),
                });
            }
        }

        let id = ClassId(self.classes.len());
        self.index(id, &class);
        self.classes.push(class);
        Ok(id)
    }

    /// Insert or replace by qualified name; the replaced class keeps its slot
    pub fn upsert(&mut self, class: ClassDefinition) -> ClassId {
        match self.by_qualified.get(&class.qualified_name()).copied() {
            Some(id) => {
                log::debug!("Replacing duplicate definition of {}", class.qualified_name());
                self.classes[id.0] = class;
                self.rebuild_indexes();
                id
            }
            None => {
                let id = ClassId(self.classes.len());
                self.index(id, &class);
                self.classes.push(class);
                id
            }
        }
    }

    /// Bind one more variable id to an existing class
    pub fn bind_var_id(&mut self, id: ClassId, var_id: &str) -> Result<()> {
        if id.0 >= self.classes.len() {
            return Err(RegistryError::UnknownClass(id.0));
        }

        if let Some(existing) = self.by_var_id.get(var_id).copied() {
            if existing != id {
                return Err(RegistryError::DuplicateVariable {
                    var_id: var_id.to_string(),
                    existing: self.classes[existing.0].qualified_name(),
                    incoming: self.classes[id.0].qualified_name(),
                });
            }
        }

        self.classes[id.0].var_id = Some(var_id.to_string());
        self.by_var_id.insert(var_id.to_string(), id);
        Ok(())
    }

    /// Set the documentation id of a class, keeping the index in sync
    pub fn set_doc_id(&mut self, id: ClassId, doc_id: Option<String>) {
        let Some(class) = self.classes.get_mut(id.0) else {
            return;
        };
        if let Some(old) = class.doc_id.take() {
            if self.by_doc_id.get(&old) == Some(&id) {
                self.by_doc_id.remove(&old);
            }
        }
        if let Some(doc_id) = &doc_id {
            self.by_doc_id.insert(doc_id.clone(), id);
        }
        class.doc_id = doc_id;
    }

    pub fn get(&self, id: ClassId) -> Option<&ClassDefinition> {
        self.classes.get(id.0)
    }

    /// Mutable access. Callers must not change identity fields here; use
    /// [`Self::set_doc_id`] / [`Self::bind_var_id`] or [`Self::rebuild_indexes`] afterwards.
    pub fn get_mut(&mut self, id: ClassId) -> Option<&mut ClassDefinition> {
        self.classes.get_mut(id.0)
    }

    pub fn find_by_qualified_name(&self, qualified: &str) -> Option<ClassId> {
        self.by_qualified.get(qualified).copied()
    }

    pub fn find_by_var_id(&self, var_id: &str) -> Option<ClassId> {
        self.by_var_id.get(var_id).copied()
    }

    pub fn find_by_doc_id(&self, doc_id: &str) -> Option<ClassId> {
        self.by_doc_id.get(doc_id).copied()
    }

    /// Resolve a soft link by documentation id, variable id, then qualified name
    pub fn resolve_link(&self, link: &str) -> Option<&ClassDefinition> {
        self.find_by_doc_id(link)
            .or_else(|| self.find_by_var_id(link))
            .or_else(|| self.find_by_qualified_name(link))
            .and_then(|id| self.get(id))
    }

    /// Every link of a class paired with its resolution
    pub fn linked_classes(&self, id: ClassId) -> Vec<(&str, Option<&ClassDefinition>)> {
        self.get(id)
            .map(|class| {
                class
                    .links
                    .iter()
                    .map(|link| (link.as_str(), self.resolve_link(link)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Rebuild every secondary index from the arena; later entries win on conflicts
    pub fn rebuild_indexes(&mut self) {
        self.by_qualified.clear();
        self.by_var_id.clear();
        self.by_doc_id.clear();

        for idx in 0..self.classes.len() {
            let id = ClassId(idx);
            let class = &self.classes[idx];
            self.by_qualified.insert(class.qualified_name(), id);
            if let Some(var_id) = &class.var_id {
                self.by_var_id.insert(var_id.clone(), id);
            }
            if let Some(doc_id) = &class.doc_id {
                self.by_doc_id.insert(doc_id.clone(), id);
            }
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = ClassId> {
        (0..self.classes.len()).map(ClassId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ClassId, &ClassDefinition)> {
        self.classes
            .iter()
            .enumerate()
            .map(|(idx, class)| (ClassId(idx), class))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ClassId, &mut ClassDefinition)> {
        self.classes
            .iter_mut()
            .enumerate()
            .map(|(idx, class)| (ClassId(idx), class))
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Consume the registry, keeping discovery order
    pub fn into_classes(self) -> Vec<ClassDefinition> {
        self.classes
    }

    fn index(&mut self, id: ClassId, class: &ClassDefinition) {
        self.by_qualified.insert(class.qualified_name(), id);
        if let Some(var_id) = &class.var_id {
            self.by_var_id.insert(var_id.clone(), id);
        }
        if let Some(doc_id) = &class.doc_id {
            self.by_doc_id.insert(doc_id.clone(), id);
        }
    }
}

impl FromIterator<ClassDefinition> for ClassRegistry {
    /// Collect with [`ClassRegistry::upsert`] semantics
    fn from_iter<I: IntoIterator<Item = ClassDefinition>>(iter: I) -> Self {
        let mut registry = Self::new();
        for class in iter {
            registry.upsert(class);
        }
        registry
    }
}

impl From<Vec<ClassDefinition>> for ClassRegistry {
    fn from(classes: Vec<ClassDefinition>) -> Self {
        classes.into_iter().collect()
    }
}

impl From<ClassRegistry> for Vec<ClassDefinition> {
    fn from(registry: ClassRegistry) -> Self {
        registry.into_classes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn class(qualified: &str, var_id: Option<&str>) -> ClassDefinition {
        let mut class = ClassDefinition::from_qualified(qualified).unwrap();
        class.var_id = var_id.map(str::to_string);
        class
    }

    #[test]
    fn insert_indexes_by_qualified_name_and_var_id() {
        let mut registry = ClassRegistry::new();
        let id = registry.insert(class("Ns.Widget", Some("$Ns_Widget"))).unwrap();

        assert_eq!(registry.find_by_qualified_name("Ns.Widget"), Some(id));
        assert_eq!(registry.find_by_var_id("$Ns_Widget"), Some(id));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn duplicate_var_id_is_rejected() {
        let mut registry = ClassRegistry::new();
        registry.insert(class("Ns.A", Some("$x"))).unwrap();
        let err = registry.insert(class("Ns.B", Some("$x"))).unwrap_err();

        assert_eq!(
            err,
            RegistryError::DuplicateVariable {
                var_id: "$x".to_string(),
                existing: "Ns.A".to_string(),
                incoming: "Ns.B".to_string(),
            }
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn upsert_replaces_in_place() {
        let mut registry = ClassRegistry::new();
        let first = registry.upsert(class("Ns.A", None));
        registry.upsert(class("Ns.B", None));

        let mut replacement = class("Ns.A", None);
        replacement.doc_id = Some("class_a".to_string());
        let second = registry.upsert(replacement);

        assert_eq!(first, second);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.find_by_doc_id("class_a"), Some(first));
    }

    #[test]
    fn resolve_link_tries_every_key() {
        let mut registry = ClassRegistry::new();
        let id = registry.insert(class("Ns.Widget", Some("$Ns_Widget"))).unwrap();
        registry.set_doc_id(id, Some("class_ns_1_1_widget".to_string()));

        for link in ["class_ns_1_1_widget", "$Ns_Widget", "Ns.Widget"] {
            let resolved = registry.resolve_link(link).map(|c| c.name.as_str());
            assert_eq!(resolved, Some("Widget"), "link {link}");
        }
        assert!(registry.resolve_link("Ns.Missing").is_none());
    }

    #[test]
    fn set_doc_id_drops_stale_index_entry() {
        let mut registry = ClassRegistry::new();
        let id = registry.insert(class("Ns.Widget", None)).unwrap();
        registry.set_doc_id(id, Some("old".to_string()));
        registry.set_doc_id(id, Some("new".to_string()));

        assert_eq!(registry.find_by_doc_id("old"), None);
        assert_eq!(registry.find_by_doc_id("new"), Some(id));
    }

    #[test]
    fn linked_classes_keeps_unresolved_links() {
        let mut registry = ClassRegistry::new();
        let target = registry.insert(class("Ns.Target", Some("$t"))).unwrap();
        let mut source = class("Ns.Source", Some("$s"));
        source.links = vec!["$t".to_string(), "nowhere".to_string()];
        let source = registry.insert(source).unwrap();

        let links = registry.linked_classes(source);
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].1, registry.get(target));
        assert!(links[1].1.is_none());
    }

    #[test]
    fn bind_var_id_adds_alias() {
        let mut registry = ClassRegistry::new();
        let id = registry.insert(class("Ns.A", Some("$a"))).unwrap();
        registry.bind_var_id(id, "$a2").unwrap();

        assert_eq!(registry.find_by_var_id("$a"), Some(id));
        assert_eq!(registry.find_by_var_id("$a2"), Some(id));
        assert_eq!(registry.get(id).unwrap().var_id.as_deref(), Some("$a2"));
    }

    #[test]
    fn rebuild_indexes_reflects_mutation() {
        let mut registry = ClassRegistry::new();
        let id = registry.insert(class("Ns.A", None)).unwrap();
        registry.get_mut(id).unwrap().var_id = Some("$late".to_string());
        assert_eq!(registry.find_by_var_id("$late"), None);

        registry.rebuild_indexes();
        assert_eq!(registry.find_by_var_id("$late"), Some(id));
    }

    #[test]
    fn serializes_as_class_list() {
        let registry: ClassRegistry = vec![class("Ns.A", Some("$A"))].into();
        let json = serde_json::to_value(&registry).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["name"], "A");

        let back: ClassRegistry = serde_json::from_value(json).unwrap();
        assert!(back.find_by_var_id("$A").is_some());
    }
}
