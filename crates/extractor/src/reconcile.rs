//! Fusion of the documentation model into the structural model.
//!
//! The structural side is authoritative for what exists; documentation only adds types,
//! descriptions, protection levels and staticness. Misses are never errors.

use crate::resolver::{find_method, find_property, to_structural_name};
use salt2type_model::{ClassDefinition, ClassRegistry, PropertyDefinition, INDEXER_PREFIX};

/// Counts of what a reconciliation pass touched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub classes: usize,
    pub methods: usize,
    pub params: usize,
    pub properties: usize,
    /// Documented properties with no structural counterpart, appended as new members
    pub appended: usize,
}

/// Absorb `docs` into `structural` in place
pub fn reconcile(structural: &mut ClassRegistry, docs: &ClassRegistry) -> ReconcileStats {
    let mut stats = ReconcileStats::default();

    for (_, doc_class) in docs.iter() {
        let qualified = doc_class.qualified_name();
        let Some(id) = structural.find_by_qualified_name(&qualified) else {
            log::debug!("No structural class for documented {qualified}");
            continue;
        };

        structural.set_doc_id(id, doc_class.doc_id.clone());
        if let Some(class) = structural.get_mut(id) {
            merge_class(class, doc_class, &mut stats);
            stats.classes += 1;
        }
    }

    log::info!(
        "Reconciled {} classes: {} methods, {} params, {} properties ({} appended)",
        stats.classes,
        stats.methods,
        stats.params,
        stats.properties,
        stats.appended
    );
    stats
}

fn merge_class(
    class: &mut ClassDefinition,
    doc_class: &ClassDefinition,
    stats: &mut ReconcileStats,
) {
    class.is_abstract = doc_class.is_abstract;
    class.is_interface = class.is_interface.or(doc_class.is_interface);

    for doc_method in &doc_class.methods {
        let Some(method) = find_method(&mut class.methods, &doc_method.name, doc_method.arity())
        else {
            log::debug!(
                "No structural member for documented {}",
                class.member_key(&doc_method.name)
            );
            continue;
        };

        method.return_type = doc_method.return_type.clone();
        method.description = doc_method.description.clone();
        method.protection = doc_method.protection;
        method.is_static =
            Some(method.is_static.unwrap_or(false) || doc_method.is_static.unwrap_or(false));
        stats.methods += 1;

        for doc_param in &doc_method.params {
            if let Some(param) = find_property(&mut method.params, &doc_param.name) {
                absorb_property(param, doc_param);
                stats.params += 1;
            }
        }
    }

    for doc_prop in &doc_class.properties {
        match find_property(&mut class.properties, &doc_prop.name) {
            Some(prop) => {
                absorb_property(prop, doc_prop);
                stats.properties += 1;
            }
            // indexers are never appended
            None if doc_prop.name.starts_with(INDEXER_PREFIX) => {}
            None => {
                class.properties.push(PropertyDefinition {
                    name: to_structural_name(&doc_prop.name),
                    default_value: None,
                    type_name: doc_prop.type_name.clone(),
                    description: doc_prop.description.clone(),
                    is_rest: doc_prop.is_rest,
                    is_static: Some(false),
                });
                stats.appended += 1;
            }
        }
    }

    class.links.extend(doc_class.links.iter().cloned());
}

fn absorb_property(target: &mut PropertyDefinition, doc: &PropertyDefinition) {
    target.type_name = doc.type_name.clone();
    target.description = doc.description.clone();
    target.is_rest = doc.is_rest;
}
