use serde::{Deserialize, Serialize};

/// Name prefix marking an indexer member
pub const INDEXER_PREFIX: &str = "this[";

/// A field, property or method parameter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    /// Name as seen in its source (mangled on the structural side)
    pub name: String,

    /// Raw default-value literal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,

    /// Normalized target type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,

    /// Brief description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Rest parameter (`None` if unknown)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_rest: Option<bool>,

    /// Static member (`None` if unknown)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_static: Option<bool>,
}

impl PropertyDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder: set the raw default value
    #[must_use]
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Builder: set the normalized type
    #[must_use]
    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    /// Builder: mark as rest parameter
    #[must_use]
    pub const fn rest(mut self, is_rest: bool) -> Self {
        self.is_rest = Some(is_rest);
        self
    }

    /// Builder: mark as static member
    #[must_use]
    pub const fn static_member(mut self, is_static: bool) -> Self {
        self.is_static = Some(is_static);
        self
    }

    #[must_use]
    pub fn is_rest(&self) -> bool {
        self.is_rest.unwrap_or(false)
    }
}

/// Access level reported by the documentation export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protection {
    Public,
    Protected,
    Private,
    Unknown,
}

impl Protection {
    /// Parse a Doxygen `prot` attribute
    #[must_use]
    pub fn from_doc(prot: &str) -> Self {
        match prot {
            "public" => Self::Public,
            "protected" => Self::Protected,
            "private" => Self::Private,
            _ => Self::Unknown,
        }
    }
}

/// A callable member
///
/// The name doubles as a marker:
/// - `""` is the constructor
/// - `operator …` is an implicit conversion
/// - `this[…]` is an indexer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDefinition {
    pub name: String,

    /// Positional parameters, in call order
    pub params: Vec<PropertyDefinition>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,

    /// Raw statement lines, only known for members found in the generated dump
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protection: Option<Protection>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_static: Option<bool>,

    /// Generic type-parameter names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_params: Option<Vec<String>>,
}

impl MethodDefinition {
    pub fn new(name: impl Into<String>, params: Vec<PropertyDefinition>) -> Self {
        Self {
            name: name.into(),
            params,
            ..Default::default()
        }
    }

    /// Constructor with a captured body
    pub fn constructor(params: Vec<PropertyDefinition>, body: Vec<String>) -> Self {
        Self {
            body: Some(body),
            ..Self::new("", params)
        }
    }

    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.name.is_empty()
    }

    #[must_use]
    pub fn is_conversion(&self) -> bool {
        self.name.starts_with("operator ")
    }

    #[must_use]
    pub fn is_indexer(&self) -> bool {
        self.name.starts_with(INDEXER_PREFIX)
    }

    #[must_use]
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// The four shapes a recovered type can take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    Enum,
    AbstractClass,
    Interface,
    ConcreteClass,
}

/// A recovered type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDefinition {
    /// Dot-separated namespace
    pub namespace: String,

    pub name: String,

    /// Identifier used by the documentation export
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<String>,

    /// Methods in discovery order (same name = overload)
    #[serde(default)]
    pub methods: Vec<MethodDefinition>,

    #[serde(default)]
    pub properties: Vec<PropertyDefinition>,

    /// Soft references to other classes (qualified name, variable id or doc id)
    #[serde(default)]
    pub links: Vec<String>,

    /// Variable naming this class inside the generated dump
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub var_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_class: Option<String>,

    #[serde(default)]
    pub interfaces: Vec<String>,

    /// Number of generic type parameters (0 = non-generic or unknown)
    #[serde(default)]
    pub generic_arity: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_enum: Option<bool>,

    /// Enum declared as a bit-flag set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_flags: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_abstract: Option<bool>,

    /// Declared as an interface (the dump still emits a constructor for these)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_interface: Option<bool>,
}

impl ClassDefinition {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Build from a dotted name such as `Company.Widgets.Button`
    pub fn from_qualified(qualified: &str) -> Option<Self> {
        split_qualified(qualified).map(|(namespace, name)| Self::new(namespace, name))
    }

    /// Identity key `namespace.name`
    #[must_use]
    pub fn qualified_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    /// Ignore-list key for a member of this class (`Ns.Class:member`)
    #[must_use]
    pub fn member_key(&self, member: &str) -> String {
        format!("{}:{member}", self.qualified_name())
    }

    #[must_use]
    pub fn constructor(&self) -> Option<&MethodDefinition> {
        self.methods.iter().find(|m| m.is_constructor())
    }

    #[must_use]
    pub fn kind(&self) -> ClassKind {
        if self.is_enum.unwrap_or(false) {
            ClassKind::Enum
        } else if self.is_interface.unwrap_or(false) {
            ClassKind::Interface
        } else if self.is_abstract.unwrap_or(false) {
            ClassKind::AbstractClass
        } else if self.constructor().is_none() {
            ClassKind::Interface
        } else {
            ClassKind::ConcreteClass
        }
    }
}

/// Split `A.B.C` into (`A.B`, `C`). Names without a namespace yield `None`.
#[must_use]
pub fn split_qualified(qualified: &str) -> Option<(&str, &str)> {
    let (namespace, name) = qualified.rsplit_once('.')?;
    if namespace.is_empty() || name.is_empty() {
        return None;
    }
    Some((namespace, name))
}
