//! Line shapes of the Script# generator output.
//!
//! Every top-level line of a dump is exactly one of these shapes. `classify` tries the
//! recognizers in priority order and returns the first match; the extractor applies the
//! result with one exhaustive `match`.

use once_cell::sync::Lazy;
use regex::Regex;

/// Lines that carry nothing for the model
const BOILERPLATE: &[&str] = &[
    "(function() {",
    "\u{feff}(function() {",
    "\t'use strict';",
    "})();",
    "\tvar $asm = {};",
];

const METADATA_PREFIX: &str = "\tss.setMetadata(";

/// Opening line of an anonymous initializer block
pub const INITIALIZER_OPEN: &str = "\t(function() {";

mod patterns {
    use super::*;

    pub static GLOBAL_ASSIGNMENT: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^\tglobal\.(.*) = (.*);$").expect("Invalid global assignment regex")
    });

    pub static GLOBAL_DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^\tglobal\..*;$").expect("Invalid global directive regex")
    });

    /// `$X.$ctor1.prototype = $X.prototype;` (receivers compared after matching)
    pub static CTOR_PROTOTYPE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^\t(.*)\.\$ctor1\.prototype = (.*)\.prototype;$")
            .expect("Invalid constructor prototype regex")
    });

    /// `$X.$ctor2.prototype = $X.$ctor1.prototype = $X.prototype;`
    pub static CTOR_PROTOTYPE_CHAIN: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^\t(.*)\.\$ctor\d\.prototype = (.*)\.\$ctor\d\.prototype = .*\.prototype;$")
            .expect("Invalid constructor prototype chain regex")
    });

    pub static GLOBAL_BLOCK: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^\t(global|\$\.fn)\..*\{$").expect("Invalid global block regex")
    });

    pub static ASSEMBLY: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^\tss\.initAssembly\(\$asm, '(.*)'\);$").expect("Invalid assembly regex")
    });

    pub static SEPARATOR: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^\t/{80}$").expect("Invalid separator regex"));

    pub static CLASS_NAME: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^\t// (.*)$").expect("Invalid class name regex"));

    pub static CONSTRUCTOR: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^\tvar (.*) = function\((.*)\) \{$").expect("Invalid constructor regex")
    });

    /// Applied after stripping `\t<var>.`
    pub static STATIC_METHOD: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^([A-Za-z0-9$_]+) = function\((.*)\) \{$")
            .expect("Invalid static method regex")
    });

    /// Applied after stripping `\t<var>.`
    pub static STATIC_PROPERTY: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^([A-Za-z0-9$_]+) = (.*);$").expect("Invalid static property regex")
    });

    pub static CLASS_BLOCK: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^\tss\.initClass\((.*), \$asm, \{$").expect("Invalid class block regex")
    });

    pub static CLASS_INLINE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^\tss\.initClass\((.*), \$asm, \{(.*)\}(.*)\);$")
            .expect("Invalid inline class regex")
    });

    pub static INTERFACE_INLINE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^\tss\.initInterface\((.*), \$asm, \{(.*)\}(.*)\);$")
            .expect("Invalid interface regex")
    });

    pub static GENERIC_ARITY: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^\tss\.initGeneric(Class|Interface)\((.*), \$asm, ([1-9][0-9]*)\);$")
            .expect("Invalid generic regex")
    });

    pub static ENUM_INLINE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^\tss\.initEnum\((.*), \$asm, \{(.*)\}(, true)?\);$")
            .expect("Invalid enum regex")
    });
}

/// What the extractor knows about the class being read when a line is classified
#[derive(Debug, Clone, Copy, Default)]
pub struct Scope<'s> {
    /// A class-name comment has been seen since the last separator
    pub has_class: bool,

    /// Variable id of that class, once its constructor has been read
    pub var_id: Option<&'s str>,
}

/// One recognized top-level line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineShape<'a> {
    /// Module wrapper, strict mode, `$asm` declaration, metadata
    Boilerplate,
    /// `global.<target> = <value>;`
    GlobalAssignment { target: &'a str, value: &'a str },
    /// `global.<anything>;`
    GlobalDirective,
    /// `global.… {` / `$.fn.… {` up to the next `\t}` line
    GlobalBlock,
    /// Legacy `$ctorN.prototype` chaining
    ConstructorPrototype,
    AssemblyInit { name: &'a str },
    ClassSeparator,
    /// `// Ns.Class`
    ClassName { qualified: &'a str },
    Constructor { var_id: &'a str, params: &'a str },
    StaticMethod { member: &'a str, params: &'a str },
    StaticProperty { member: &'a str, value: &'a str },
    /// Multi-line `ss.initClass(<var>, $asm, {`
    ClassBlock { var_id: &'a str },
    ClassInline {
        var_id: &'a str,
        members: &'a str,
        trailer: &'a str,
    },
    InterfaceInline {
        var_id: &'a str,
        members: &'a str,
        trailer: &'a str,
    },
    GenericArity { var_id: &'a str, arity: u32 },
    EnumInline {
        var_id: &'a str,
        members: &'a str,
        flags: bool,
    },
    /// `(function() {` … `})();`
    InitializerBlock,
}

impl LineShape<'_> {
    /// Short label for logs
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Boilerplate => "boilerplate",
            Self::GlobalAssignment { .. } => "global assignment",
            Self::GlobalDirective => "global directive",
            Self::GlobalBlock => "global block",
            Self::ConstructorPrototype => "constructor prototype",
            Self::AssemblyInit { .. } => "assembly",
            Self::ClassSeparator => "separator",
            Self::ClassName { .. } => "class name",
            Self::Constructor { .. } => "constructor",
            Self::StaticMethod { .. } => "static method",
            Self::StaticProperty { .. } => "static property",
            Self::ClassBlock { .. } => "class block",
            Self::ClassInline { .. } => "class",
            Self::InterfaceInline { .. } => "interface",
            Self::GenericArity { .. } => "generic arity",
            Self::EnumInline { .. } => "enum",
            Self::InitializerBlock => "initializer block",
        }
    }
}

/// Recognize a top-level line; `None` means the line is unsupported
pub fn classify<'a>(line: &'a str, scope: Scope<'_>) -> Option<LineShape<'a>> {
    use patterns::*;

    if BOILERPLATE.contains(&line) || line.starts_with(METADATA_PREFIX) {
        return Some(LineShape::Boilerplate);
    }

    if let Some(caps) = GLOBAL_ASSIGNMENT.captures(line) {
        return Some(LineShape::GlobalAssignment {
            target: caps.get(1)?.as_str(),
            value: caps.get(2)?.as_str(),
        });
    }

    if GLOBAL_DIRECTIVE.is_match(line) {
        return Some(LineShape::GlobalDirective);
    }

    if is_constructor_prototype(line) {
        return Some(LineShape::ConstructorPrototype);
    }

    if GLOBAL_BLOCK.is_match(line) {
        return Some(LineShape::GlobalBlock);
    }

    if let Some(caps) = ASSEMBLY.captures(line) {
        return Some(LineShape::AssemblyInit {
            name: caps.get(1)?.as_str(),
        });
    }

    if SEPARATOR.is_match(line) {
        return Some(LineShape::ClassSeparator);
    }

    if let Some(caps) = CLASS_NAME.captures(line) {
        return Some(LineShape::ClassName {
            qualified: caps.get(1)?.as_str(),
        });
    }

    if scope.has_class {
        if let Some(caps) = CONSTRUCTOR.captures(line) {
            return Some(LineShape::Constructor {
                var_id: caps.get(1)?.as_str(),
                params: caps.get(2)?.as_str(),
            });
        }
    }

    if let Some(member_line) = scope.var_id.and_then(|var_id| static_member_line(line, var_id)) {
        if let Some(caps) = STATIC_METHOD.captures(member_line) {
            return Some(LineShape::StaticMethod {
                member: caps.get(1)?.as_str(),
                params: caps.get(2)?.as_str(),
            });
        }
        if let Some(caps) = STATIC_PROPERTY.captures(member_line) {
            return Some(LineShape::StaticProperty {
                member: caps.get(1)?.as_str(),
                value: caps.get(2)?.as_str(),
            });
        }
    }

    if let Some(caps) = CLASS_BLOCK.captures(line) {
        return Some(LineShape::ClassBlock {
            var_id: caps.get(1)?.as_str(),
        });
    }

    if let Some(caps) = CLASS_INLINE.captures(line) {
        return Some(LineShape::ClassInline {
            var_id: caps.get(1)?.as_str(),
            members: caps.get(2)?.as_str(),
            trailer: caps.get(3)?.as_str(),
        });
    }

    if let Some(caps) = INTERFACE_INLINE.captures(line) {
        return Some(LineShape::InterfaceInline {
            var_id: caps.get(1)?.as_str(),
            members: caps.get(2)?.as_str(),
            trailer: caps.get(3)?.as_str(),
        });
    }

    if let Some(caps) = GENERIC_ARITY.captures(line) {
        if let Ok(arity) = caps.get(3)?.as_str().parse() {
            return Some(LineShape::GenericArity {
                var_id: caps.get(2)?.as_str(),
                arity,
            });
        }
    }

    if let Some(caps) = ENUM_INLINE.captures(line) {
        return Some(LineShape::EnumInline {
            var_id: caps.get(1)?.as_str(),
            members: caps.get(2)?.as_str(),
            flags: caps.get(3).is_some(),
        });
    }

    if line == INITIALIZER_OPEN {
        return Some(LineShape::InitializerBlock);
    }

    None
}

/// `\t<var_id>.<rest>` -> `<rest>`
fn static_member_line<'a>(line: &'a str, var_id: &str) -> Option<&'a str> {
    line.strip_prefix('\t')?
        .strip_prefix(var_id)?
        .strip_prefix('.')
}

fn is_constructor_prototype(line: &str) -> bool {
    [&patterns::CTOR_PROTOTYPE, &patterns::CTOR_PROTOTYPE_CHAIN]
        .iter()
        .filter_map(|re| re.captures(line))
        .any(|caps| caps.get(1).map(|m| m.as_str()) == caps.get(2).map(|m| m.as_str()))
}
