//! Member lists of `ss.initClass` / `ss.initInterface` / `ss.initEnum` calls.

use crate::config::IgnoreList;
use crate::error::{ExtractError, Result};
use crate::text::{find_terminator, LineCleaner};
use once_cell::sync::Lazy;
use regex::Regex;
use salt2type_model::{ClassDefinition, MethodDefinition, PropertyDefinition};

/// Indentation of members inside a multi-line `ss.initClass` block
pub const BLOCK_INDENT: &str = "\t\t";

static METHOD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.*): function\((.*)\) \{$").expect("Invalid member method regex")
});

static PROPERTY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*): (.*[^,]),?$").expect("Invalid member property regex"));

/// Inner function of a generic wrapper, after the enclosing indentation
static RETURN_FUNCTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\treturn function\((.*)\) \{$").expect("Invalid generic wrapper regex")
});

static BASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^, ([^, ]+)$").expect("Invalid base regex"));

static INTERFACES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^, null, \[(.*)\]$").expect("Invalid interfaces regex"));

static BASE_AND_INTERFACES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^, ([^, ]+), \[(.*)\]$").expect("Invalid base and interfaces regex")
});

static INTERFACE_BASES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^, \[(.*)\]$").expect("Invalid interface bases regex"));

/// `a, b` -> two plain parameters; an empty list yields none
pub fn parse_params(list: &str) -> Vec<PropertyDefinition> {
    split_list(list).map(PropertyDefinition::new).collect()
}

fn split_list(list: &str) -> impl Iterator<Item = &str> {
    list.split(", ").filter(|item| !item.is_empty())
}

/// Parameters, generic type parameters and body of a function member
#[derive(Debug)]
pub struct FunctionParts<'l, 's> {
    pub params: Vec<PropertyDefinition>,
    pub type_params: Option<Vec<String>>,
    pub body: &'l [&'s str],
}

/// Split the function opened at `header` and closed at `end`.
///
/// A generic member is a wrapper whose first body line returns the real function and
/// whose second-to-last line closes it; the wrapper's parameters are the type parameters.
pub fn function_parts<'l, 's>(
    lines: &'l [&'s str],
    header: usize,
    end: usize,
    indent: &str,
    params: &str,
) -> FunctionParts<'l, 's> {
    let inner = lines
        .get(header + 1)
        .copied()
        .and_then(|line| line.strip_prefix(indent))
        .and_then(|line| RETURN_FUNCTION.captures(line))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str());
    let closes_inner = end >= header + 3
        && lines[end - 1]
            .strip_prefix(indent)
            .is_some_and(|rest| rest == "\t};");

    match inner {
        Some(inner_params) if closes_inner => {
            let type_params: Vec<String> = split_list(params).map(String::from).collect();
            FunctionParts {
                params: parse_params(inner_params),
                type_params: (!type_params.is_empty()).then_some(type_params),
                body: &lines[header + 2..end - 1],
            }
        }
        _ => FunctionParts {
            params: parse_params(params),
            type_params: None,
            body: &lines[header + 1..end],
        },
    }
}

/// Where a member list came from, for error positions
#[derive(Debug, Clone, Copy)]
pub enum MemberSource {
    /// Lines of a multi-line block; the first one sits at this 0-based index
    Block { first_line: usize },
    /// Comma-split chunks of one source line
    Inline { line: usize },
}

impl MemberSource {
    const fn line_index(self, offset: usize) -> usize {
        match self {
            Self::Block { first_line } => first_line + offset,
            Self::Inline { line } => line,
        }
    }
}

/// Append the members in `lines` to `class`.
///
/// Each member is either `name: function(params) {` through the closing `}` / `},` at the
/// same indentation, or `name: value` with an optional trailing comma. Members whose
/// `Ns.Class:member` key is ignored are skipped.
pub fn add_members(
    class: &mut ClassDefinition,
    lines: &[&str],
    indent: &str,
    source: MemberSource,
    ignore: &IgnoreList,
    cleaner: &LineCleaner,
) -> Result<()> {
    if lines == [""] {
        return Ok(());
    }

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        let member = line.strip_prefix(indent);

        if let Some(caps) = member.and_then(|m| METHOD.captures(m)) {
            let end = find_terminator(lines, i + 1, source.line_index(i), "}", |l| {
                l.strip_prefix(indent)
                    .is_some_and(|rest| rest == "}" || rest == "},")
            })?;
            let name = &caps[1];

            if ignore.contains(&class.member_key(name)) {
                log::debug!("Skipping ignored member {}", class.member_key(name));
            } else {
                let parts = function_parts(lines, i, end, indent, &caps[2]);
                let body = cleaner.body(class, parts.body);
                class.methods.push(MethodDefinition {
                    body: Some(body),
                    type_params: parts.type_params,
                    ..MethodDefinition::new(name, parts.params)
                });
            }
            i = end;
        } else if let Some(caps) = member.and_then(|m| PROPERTY.captures(m)) {
            let name = &caps[1];
            if ignore.contains(&class.member_key(name)) {
                log::debug!("Skipping ignored member {}", class.member_key(name));
            } else {
                class
                    .properties
                    .push(PropertyDefinition::new(name).with_default(&caps[2]));
            }
        } else {
            return Err(ExtractError::unrecognized(source.line_index(i), line));
        }

        i += 1;
    }

    Ok(())
}

/// Members of a single-line `{ a: 1, b: 2 }` list
pub fn add_inline_members(
    class: &mut ClassDefinition,
    members: &str,
    line: usize,
    ignore: &IgnoreList,
    cleaner: &LineCleaner,
) -> Result<()> {
    let chunks: Vec<&str> = members.trim().split(", ").collect();
    add_members(
        class,
        &chunks,
        "",
        MemberSource::Inline { line },
        ignore,
        cleaner,
    )
}

/// What follows the member list of an `ss.initClass` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassTrailer<'a> {
    Empty,
    Base(&'a str),
    Interfaces(Vec<&'a str>),
    BaseAndInterfaces(&'a str, Vec<&'a str>),
}

impl<'a> ClassTrailer<'a> {
    /// `""`, `, Base`, `, null, [I1, I2]` or `, Base, [I1, I2]`
    pub fn parse(trailer: &'a str) -> Option<Self> {
        if trailer.is_empty() {
            return Some(Self::Empty);
        }
        if let Some(caps) = BASE.captures(trailer) {
            return Some(Self::Base(caps.get(1)?.as_str()));
        }
        if let Some(caps) = INTERFACES.captures(trailer) {
            return Some(Self::Interfaces(split_list(caps.get(1)?.as_str()).collect()));
        }
        if let Some(caps) = BASE_AND_INTERFACES.captures(trailer) {
            return Some(Self::BaseAndInterfaces(
                caps.get(1)?.as_str(),
                split_list(caps.get(2)?.as_str()).collect(),
            ));
        }
        None
    }

    pub fn apply(self, class: &mut ClassDefinition) {
        let interfaces = match self {
            Self::Empty => return,
            Self::Base(base) => {
                class.base_class = Some(base.to_string());
                return;
            }
            Self::Interfaces(interfaces) => interfaces,
            Self::BaseAndInterfaces(base, interfaces) => {
                class.base_class = Some(base.to_string());
                interfaces
            }
        };
        class
            .interfaces
            .extend(interfaces.into_iter().map(String::from));
    }
}

/// Trailer of an `ss.initInterface` call: `""` or `, [I1, I2]`
pub fn parse_interface_trailer(trailer: &str) -> Option<Vec<&str>> {
    if trailer.is_empty() {
        return Some(vec![]);
    }
    let caps = INTERFACE_BASES.captures(trailer)?;
    Some(split_list(caps.get(1)?.as_str()).collect())
}
