//! Documentation extraction from a Doxygen XML export.
//!
//! Every `class`/`interface` compound becomes a [`ClassDefinition`] carrying typed
//! signatures, descriptions, protection levels and the type cross-references found in its
//! member types. Fields, properties and events are mirrored into four accessor methods so
//! the reconciler can find them under either getter/setter spelling of the dump.

use crate::error::{ExtractError, Result};
use crate::vocabulary::normalize_type;
use roxmltree::{Document, Node};
use salt2type_model::{
    split_qualified, ClassDefinition, ClassRegistry, MethodDefinition, PropertyDefinition,
    Protection,
};

/// Rest-parameter marker at the start of a raw parameter type
const REST_MARKER: &str = "params ";

/// Extract every class and interface compound from the XML text
pub fn extract_docs(xml: &str) -> Result<ClassRegistry> {
    let document = Document::parse(xml)?;
    let mut classes = ClassRegistry::new();

    for compound in document
        .root_element()
        .children()
        .filter(|node| node.has_tag_name("compounddef"))
    {
        match compound.attribute("kind") {
            Some("class") => {
                classes.upsert(read_compound(compound)?);
            }
            Some("interface") => {
                let mut class = read_compound(compound)?;
                class.is_interface = Some(true);
                classes.upsert(class);
            }
            kind => {
                log::debug!(
                    "Skipping compound {} of kind {}",
                    compound.attribute("id").unwrap_or("?"),
                    kind.unwrap_or("?")
                );
            }
        }
    }

    log::info!("Read documentation for {} classes", classes.len());
    Ok(classes)
}

fn read_compound(compound: Node<'_, '_>) -> Result<ClassDefinition> {
    let qualified = text_of(child(compound, "compoundname")).replace("::", ".");
    let (namespace, name) = split_qualified(&qualified).ok_or_else(|| {
        ExtractError::document(format!("compound name without namespace: {qualified:?}"))
    })?;

    let mut class = ClassDefinition::new(namespace, name);
    class.doc_id = compound.attribute("id").map(String::from);
    class.is_abstract = Some(compound.attribute("abstract") == Some("yes"));

    let members = compound
        .children()
        .filter(|node| node.has_tag_name("sectiondef"))
        .flat_map(|section| section.children())
        .filter(|node| node.has_tag_name("memberdef"));

    for member in members {
        read_member(&mut class, member)?;
    }

    Ok(class)
}

/// Documented attributes shared by every synthesized definition of one member
struct MemberDoc {
    name: String,
    type_name: String,
    description: String,
    protection: Protection,
    is_static: bool,
}

impl MemberDoc {
    fn method(
        &self,
        name: String,
        params: Vec<PropertyDefinition>,
        return_type: &str,
    ) -> MethodDefinition {
        MethodDefinition {
            return_type: non_empty(return_type),
            description: non_empty(&self.description),
            protection: Some(self.protection),
            is_static: Some(self.is_static),
            ..MethodDefinition::new(name, params)
        }
    }

    fn value_param(&self) -> PropertyDefinition {
        typed(PropertyDefinition::new("value"), &self.type_name)
    }
}

fn read_member(class: &mut ClassDefinition, member: Node<'_, '_>) -> Result<()> {
    let name = child(member, "name")
        .map(|node| strip_generic_suffix(&text_of(Some(node))))
        .ok_or_else(|| {
            ExtractError::document(format!("member without name in {}", class.name))
        })?;

    let type_node = child(member, "type");
    class.links.extend(ref_ids(type_node));
    let mut type_name = normalize_type(&text_of(type_node));
    if type_name.is_empty() && name == class.name {
        type_name = class.name.clone();
    }

    let doc = MemberDoc {
        type_name,
        description: text_of(child(member, "briefdescription")),
        protection: Protection::from_doc(member.attribute("prot").unwrap_or_default()),
        is_static: member.attribute("static") == Some("yes"),
        name,
    };

    match member.attribute("kind") {
        Some("property" | "variable" | "event") => {
            let mut prop = typed(PropertyDefinition::new(&doc.name), &doc.type_name);
            prop.description = non_empty(&doc.description);
            class.properties.push(prop);

            class.methods.extend([
                doc.method(format!("get_{}", doc.name), vec![], &doc.type_name),
                doc.method(format!("get_${}", doc.name), vec![], &doc.type_name),
                doc.method(format!("set_{}", doc.name), vec![doc.value_param()], "void"),
                doc.method(format!("set_${}", doc.name), vec![doc.value_param()], "void"),
            ]);
        }
        Some("function") => {
            let mut params = Vec::new();
            for param in member.children().filter(|node| node.has_tag_name("param")) {
                let param_name = child(param, "declname")
                    .map(|node| text_of(Some(node)))
                    .ok_or_else(|| {
                        ExtractError::document(format!(
                            "parameter without declname in {}.{}",
                            class.name, doc.name
                        ))
                    })?;
                let param_type = child(param, "type");
                class.links.extend(ref_ids(param_type));
                let raw_type = text_of(param_type);

                params.push(
                    typed(PropertyDefinition::new(param_name), &normalize_type(&raw_type))
                        .rest(raw_type.starts_with(REST_MARKER)),
                );
            }

            let method_name = if doc.name == class.name {
                String::new()
            } else {
                doc.name.clone()
            };
            class
                .methods
                .push(doc.method(method_name, params, &doc.type_name));
        }
        kind => {
            log::debug!(
                "Skipping {} member {}.{}",
                kind.unwrap_or("untyped"),
                class.name,
                doc.name
            );
        }
    }

    Ok(())
}

fn child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|child| child.has_tag_name(tag))
}

/// Concatenated descendant text, trimmed; a missing node reads as empty
fn text_of(node: Option<Node<'_, '_>>) -> String {
    node.map(|node| {
        node.descendants()
            .filter(Node::is_text)
            .filter_map(|text| text.text())
            .collect::<String>()
            .trim()
            .to_string()
    })
    .unwrap_or_default()
}

/// `refid`s of the `ref` children of a type node
fn ref_ids(node: Option<Node<'_, '_>>) -> Vec<String> {
    node.map(|node| {
        node.children()
            .filter(|child| child.has_tag_name("ref"))
            .filter_map(|child| child.attribute("refid"))
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}

/// `Convert <T>` -> `Convert`
fn strip_generic_suffix(name: &str) -> String {
    match name.find('<') {
        Some(open) if name.ends_with('>') => name[..open].trim_end().to_string(),
        _ => name.to_string(),
    }
}

fn non_empty(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_string())
}

fn typed(prop: PropertyDefinition, type_name: &str) -> PropertyDefinition {
    match non_empty(type_name) {
        Some(type_name) => prop.with_type(type_name),
        None => prop,
    }
}
