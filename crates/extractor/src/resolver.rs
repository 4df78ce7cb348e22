//! Fuzzy lookup across the two naming conventions.
//!
//! The documentation export uses plain C# names (`DoWork`, `Count`). The generated dump
//! mangles them: private and clashing names get a `$` marker with the first letter
//! lower-cased (`$doWork`), overloads get a `$N` suffix (`$doWork$1`, `doWork$2`),
//! numbered rest parameters get a digit suffix (`args1`) and secondary constructors are
//! named `$ctorN`.
//!
//! Method lookup picks the candidate with the requested arity. When no candidate has
//! that arity it falls back to the first name match in discovery order. This fallback is
//! best effort and can bind documentation to the wrong overload.

use salt2type_model::{MethodDefinition, PropertyDefinition};

/// Mangling marker used by the generated dump
pub const MANGLE_MARKER: char = '$';

/// Prefix of secondary constructors in the generated dump
pub const CONSTRUCTOR_PREFIX: &str = "$ctor";

/// `doWork` from `DoWork`
pub fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `$doWork` from `DoWork`
pub fn mangled(name: &str) -> String {
    format!("{MANGLE_MARKER}{}", lower_first(name))
}

fn same_ignoring_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// True if `structural` is `doc` followed by `suffix` and one digit 1-9, ignoring case
fn has_numbered_suffix(structural: &str, doc: &str, suffix: &str) -> bool {
    let structural = structural.to_lowercase();
    let stem = format!("{}{suffix}", doc.to_lowercase());
    match structural.strip_prefix(&stem) {
        Some(rest) => {
            let mut chars = rest.chars();
            matches!(chars.next(), Some('1'..='9')) && chars.next().is_none()
        }
        None => false,
    }
}

/// Does structural property `item` denote documentation name `doc`?
pub fn property_matches(item: &PropertyDefinition, doc: &str) -> bool {
    let structural = item.name.as_str();
    let marker = MANGLE_MARKER.to_string();

    same_ignoring_case(structural, doc)
        || (!doc.is_empty() && structural == mangled(doc))
        || (!structural.is_empty() && doc == mangled(structural))
        || (item.is_rest() && !doc.is_empty() && has_numbered_suffix(structural, doc, ""))
        || structural.to_lowercase() == format!("{marker}{}", doc.to_lowercase())
        || doc.to_lowercase() == format!("{marker}{}", structural.to_lowercase())
}

/// Does structural method name `structural` denote documentation name `doc`?
pub fn method_name_matches(structural: &str, doc: &str) -> bool {
    if doc.is_empty() {
        return structural.is_empty() || structural.starts_with(CONSTRUCTOR_PREFIX);
    }

    let mangled = mangled(doc);
    same_ignoring_case(structural, doc)
        || structural == mangled
        || structural.starts_with(&format!("{mangled}{MANGLE_MARKER}"))
        || has_numbered_suffix(structural, doc, "$")
}

/// Find the structural property matching a documentation name
pub fn find_property<'a>(
    items: &'a mut [PropertyDefinition],
    doc: &str,
) -> Option<&'a mut PropertyDefinition> {
    items.iter_mut().find(|item| property_matches(item, doc))
}

/// Index of the structural method matching a documentation name and arity
///
/// Exact arity wins; otherwise the first name match (best effort).
pub fn find_method_index(items: &[MethodDefinition], doc: &str, arity: usize) -> Option<usize> {
    let candidates: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| method_name_matches(&item.name, doc))
        .map(|(idx, _)| idx)
        .collect();

    candidates
        .iter()
        .copied()
        .find(|&idx| items[idx].arity() == arity)
        .or_else(|| {
            let first = candidates.first().copied();
            if let Some(idx) = first {
                log::debug!(
                    "No overload of '{doc}' takes {arity} params, falling back to '{}'",
                    items[idx].name
                );
            }
            first
        })
}

/// Find the structural method matching a documentation name and arity
pub fn find_method<'a>(
    items: &'a mut [MethodDefinition],
    doc: &str,
    arity: usize,
) -> Option<&'a mut MethodDefinition> {
    let idx = find_method_index(items, doc, arity)?;
    items.get_mut(idx)
}

/// Re-mangle a documented member name into the structural convention
///
/// `Count` -> `count`, `count` -> `$count`
pub fn to_structural_name(doc: &str) -> String {
    match doc.chars().next() {
        Some(first) if first.is_uppercase() => lower_first(doc),
        _ => format!("{MANGLE_MARKER}{doc}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(name: &str, arity: usize) -> MethodDefinition {
        let params = (0..arity)
            .map(|i| PropertyDefinition::new(format!("p{i}")))
            .collect();
        MethodDefinition::new(name, params)
    }

    #[test]
    fn test_case_folding_covers_non_ascii_names() {
        assert!(property_matches(&PropertyDefinition::new("äpfel"), "Äpfel"));
        assert!(method_name_matches("öffnen", "Öffnen"));
        assert!(!method_name_matches("öffnen", "Schließen"));
    }

    #[test]
    fn test_lower_first_and_mangled() {
        assert_eq!(lower_first("DoWork"), "doWork");
        assert_eq!(lower_first(""), "");
        assert_eq!(mangled("Foo"), "$foo");
    }

    #[test]
    fn property_matches_case_insensitively() {
        assert!(property_matches(&PropertyDefinition::new("count"), "Count"));
        assert!(!property_matches(&PropertyDefinition::new("counter"), "Count"));
    }

    #[test]
    fn property_matches_mangled_names() {
        assert!(property_matches(&PropertyDefinition::new("$count"), "Count"));
        assert!(property_matches(&PropertyDefinition::new("$Count"), "count"));
        assert!(property_matches(&PropertyDefinition::new("count"), "$count"));
    }

    #[test]
    fn property_matches_numbered_rest_param_only_when_rest() {
        let rest = PropertyDefinition::new("args1").rest(true);
        assert!(property_matches(&rest, "args"));

        let plain = PropertyDefinition::new("args1");
        assert!(!property_matches(&plain, "args"));

        let two_digits = PropertyDefinition::new("args10").rest(true);
        assert!(!property_matches(&two_digits, "args"));
    }

    #[test]
    fn method_name_rules() {
        assert!(method_name_matches("run", "Run"));
        assert!(method_name_matches("$run", "Run"));
        assert!(method_name_matches("$run$1", "Run"));
        assert!(method_name_matches("run$2", "Run"));
        assert!(!method_name_matches("run$0", "Run"));
        assert!(!method_name_matches("runner", "Run"));
    }

    #[test]
    fn constructor_lookup_uses_ctor_prefix() {
        assert!(method_name_matches("", ""));
        assert!(method_name_matches("$ctor1", ""));
        assert!(!method_name_matches("$$weird", ""));
        assert!(!method_name_matches("run", ""));
    }

    #[test]
    fn find_method_prefers_exact_arity() {
        let mut methods = vec![method("foo", 1), method("$foo", 2)];
        let found = find_method(&mut methods, "Foo", 2).unwrap();
        assert_eq!(found.name, "$foo");
    }

    #[test]
    fn find_method_falls_back_to_first_candidate() {
        let mut methods = vec![method("bar", 0), method("$foo", 1), method("foo$1", 3)];
        let found = find_method(&mut methods, "Foo", 2).unwrap();
        assert_eq!(found.name, "$foo");
        assert!(find_method(&mut methods, "Missing", 0).is_none());
    }

    #[test]
    fn find_property_returns_first_match() {
        let mut props = vec![PropertyDefinition::new("$name"), PropertyDefinition::new("name")];
        let found = find_property(&mut props, "Name").unwrap();
        assert_eq!(found.name, "$name");
    }

    #[test]
    fn test_to_structural_name() {
        assert_eq!(to_structural_name("Count"), "count");
        assert_eq!(to_structural_name("count"), "$count");
        assert_eq!(to_structural_name("_count"), "$_count");
    }
}
