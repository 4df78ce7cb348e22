//! Type vocabulary normalization.
//!
//! Maps Doxygen-rendered C#/Script# type strings onto the TypeScript vocabulary the
//! renderer emits. The mapping is a fixed, ordered list of substitutions followed by a
//! decision whether the result may be absent at runtime.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Union suffix marking a value that may be absent
pub const ABSENT_SUFFIX: &str = " | undefined";

/// Types returned as-is once substitution is done
const BARE_TYPES: &[&str] = &["any", "unknown", "boolean", "string", "void"];

/// Types that are never absent unless declared nullable
const VALUE_TYPES: &[&str] = &["number", "Date"];

struct Substitution {
    pattern: Regex,
    replacement: &'static str,
}

impl Substitution {
    fn new(pattern: &str, replacement: &'static str) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("Invalid vocabulary regex"),
            replacement,
        }
    }
}

/// Ordered substitution table; order matters (numbers before dictionaries, etc.)
static SUBSTITUTIONS: Lazy<Vec<Substitution>> = Lazy::new(|| {
    vec![
        Substitution::new(r"\bbool\b", "boolean"),
        Substitution::new(r"\b(int|float|double|long|short|byte|uint)\b", "number"),
        Substitution::new(r"\b(ss\.)?(IList|List|IEnumerable|ICollection)\b", "Array"),
        Substitution::new(r"\b(ss\.)?JsDate\b", "Date"),
        Substitution::new(r"\b(ss\.)?Int32\b", "number"),
        Substitution::new(r"\bDateTime\b", "Date"),
        Substitution::new(r"\bObject\b", "any"),
        Substitution::new(r"\bjQueryObject\b", "JQuery"),
        Substitution::new(r"\bjQueryEvent\b", "JQuery.Event"),
        Substitution::new(r"\bjQueryEventHandler\b", "JQuery.EventHandler"),
        Substitution::new(r"\bdynamic\b", "any"),
        Substitution::new(r"\bDelegate\b", "Action<void>"),
        Substitution::new(r"^delegate (.*)$", "Action<${1}>"),
        Substitution::new(r"(ss\.)?(Js)?Dictionary<", "Record<"),
        Substitution::new(r"(ss\.)?(Js)?Dictionary$", "Record<string,any>"),
        Substitution::new(r"(ss\.)?(Js)?Dictionary([^<])", "Record<string,any>${3}"),
    ]
});

/// Leading declaration keywords that carry no type information
static MODIFIERS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^((sealed override|override|params|readonly|new|this|abstract|const) )+")
        .expect("Invalid modifier regex")
});

/// Convert a raw documentation type into a target-vocabulary type.
///
/// Idempotent: feeding any output back in returns it unchanged. An empty input
/// (unknown type) stays empty.
pub fn normalize_type(raw: &str) -> String {
    if raw.ends_with(ABSENT_SUFFIX) {
        return raw.to_string();
    }

    let optional = raw.contains('?');
    let stripped = raw.replace(['?', '@'], "");
    let stripped = stripped.trim();
    if stripped.is_empty() {
        return String::new();
    }

    // modifiers go first so `^delegate` sees the bare declaration
    let mut typ = MODIFIERS.replace(stripped, "").into_owned();
    for sub in SUBSTITUTIONS.iter() {
        typ = sub.pattern.replace_all(&typ, sub.replacement).into_owned();
    }

    if is_complete(&typ, optional) {
        typ
    } else {
        format!("{typ}{ABSENT_SUFFIX}")
    }
}

/// Whether a substituted type is final as it stands
fn is_complete(typ: &str, optional: bool) -> bool {
    if BARE_TYPES.contains(&typ) {
        return true;
    }
    if typ.ends_with("[]") || typ.starts_with("Array<") {
        return true;
    }
    if typ.starts_with("Record<") || typ.starts_with("TypeOption<") {
        return true;
    }
    !optional && VALUE_TYPES.contains(&typ)
}

static GENERIC_CALL_WITH_NULL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([A-Za-z0-9$_]+)\(([^()]+)\)\.call\(null,\s+")
        .expect("Invalid generic call regex")
});

static GENERIC_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([A-Za-z0-9$_]+)\(([^()]+)\)\.call\(").expect("Invalid generic call regex")
});

/// Rewrite `f(T).call(null, a)` / `f(T).call(a)` into `f<T'>(a)`, normalizing `T`
pub fn rewrite_generic_calls(line: &str) -> String {
    let line = GENERIC_CALL_WITH_NULL.replace_all(line, to_generic_call);
    GENERIC_CALL.replace_all(&line, to_generic_call).into_owned()
}

fn to_generic_call(caps: &Captures<'_>) -> String {
    format!("{}<{}>(", &caps[1], normalize_type(&caps[2]))
}
