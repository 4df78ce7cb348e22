//! Structural extraction from the generated Script# dump.
//!
//! The dump is read line by line. Each top-level line is classified into a [`LineShape`]
//! and applied to a running state: the current class, the class registry, the
//! assembly name and the ordered global statements. Multi-line constructs (constructors,
//! static methods, member blocks, global blocks, initializer blocks) consume lines up to
//! their terminator. Any line that fits no shape aborts the run.

mod initializer;
mod members;
mod shape;

pub use initializer::InitializerLine;
pub use members::{parse_params, ClassTrailer};
pub use shape::{classify, LineShape, Scope};

use crate::config::{ExtractorConfig, IgnoreList};
use crate::error::{ExtractError, Result};
use crate::text::{find_terminator, LineCleaner};
use initializer::INITIALIZER_CLOSE;
use members::{
    add_inline_members, add_members, function_parts, parse_interface_trailer, MemberSource,
    BLOCK_INDENT,
};
use salt2type_model::{
    split_qualified, ClassDefinition, ClassId, ClassRegistry, MethodDefinition,
    PropertyDefinition,
};

/// Everything recovered from a dump
#[derive(Debug, Clone, Default)]
pub struct StructuralModel {
    pub assembly_name: String,
    pub classes: ClassRegistry,
    /// Global statements in source order; `""` marks the start of an initializer block
    pub globals: Vec<String>,
}

/// Reads a generated dump into a [`StructuralModel`]
#[derive(Debug, Clone, Default)]
pub struct StructuralExtractor {
    ignore: IgnoreList,
    cleaner: LineCleaner,
}

impl StructuralExtractor {
    pub fn new(ignore: IgnoreList) -> Self {
        Self {
            ignore,
            cleaner: LineCleaner::default(),
        }
    }

    pub fn from_config(config: &ExtractorConfig) -> Result<Self> {
        Ok(Self {
            ignore: config.ignore_list()?,
            cleaner: LineCleaner::from_config(config),
        })
    }

    pub fn ignore_list(&self) -> &IgnoreList {
        &self.ignore
    }

    /// Extract from the full dump text
    pub fn extract_str(&self, source: &str) -> Result<StructuralModel> {
        let lines: Vec<&str> = source.lines().collect();
        self.extract_lines(&lines)
    }

    /// Extract from pre-split lines (no trailing newlines)
    pub fn extract_lines(&self, lines: &[&str]) -> Result<StructuralModel> {
        let mut run = Run {
            lines,
            ignore: self.ignore.clone(),
            cleaner: self.cleaner,
            model: StructuralModel::default(),
            current: None,
        };

        let mut idx = 0;
        while idx < lines.len() {
            idx = run.step(idx)?;
        }

        let model = run.model;
        log::info!(
            "Extracted {} classes and {} global lines from assembly '{}'",
            model.classes.len(),
            model.globals.len(),
            model.assembly_name
        );
        Ok(model)
    }
}

/// The class currently being read
#[derive(Debug)]
enum CurrentClass {
    /// Named by a comment; no constructor seen yet
    Declared(ClassDefinition),
    Registered(ClassId),
    /// On the ignore list: read but never registered
    Detached(ClassDefinition),
}

struct Run<'l, 's> {
    lines: &'l [&'s str],
    /// Grows with the variable ids of ignored classes
    ignore: IgnoreList,
    cleaner: LineCleaner,
    model: StructuralModel,
    current: Option<CurrentClass>,
}

/// Mutable access to the current class, split from the rest of the run state
fn current_class<'r>(
    current: &'r mut Option<CurrentClass>,
    classes: &'r mut ClassRegistry,
) -> Option<&'r mut ClassDefinition> {
    match current.as_mut()? {
        CurrentClass::Declared(class) | CurrentClass::Detached(class) => Some(class),
        CurrentClass::Registered(id) => classes.get_mut(*id),
    }
}

/// Registered class with this variable id
fn known_class<'r>(
    classes: &'r mut ClassRegistry,
    var_id: &str,
) -> Option<&'r mut ClassDefinition> {
    let id = classes.find_by_var_id(var_id)?;
    classes.get_mut(id)
}

impl<'l, 's> Run<'l, 's> {
    fn scope(&self) -> Scope<'_> {
        let class = match &self.current {
            None => None,
            Some(CurrentClass::Declared(class) | CurrentClass::Detached(class)) => Some(class),
            Some(CurrentClass::Registered(id)) => self.model.classes.get(*id),
        };
        Scope {
            has_class: self.current.is_some(),
            var_id: class.and_then(|class| class.var_id.as_deref()),
        }
    }

    /// Apply the line at `idx`; returns the index of the next unread line
    fn step(&mut self, idx: usize) -> Result<usize> {
        let line: &'s str = self.lines[idx];
        let shape =
            classify(line, self.scope()).ok_or_else(|| ExtractError::unrecognized(idx, line))?;
        log::trace!("line {}: {}", idx + 1, shape.label());

        match shape {
            LineShape::Boilerplate
            | LineShape::GlobalDirective
            | LineShape::ConstructorPrototype => {}
            LineShape::GlobalAssignment { target, value } => {
                if self.ignore.contains(target) || self.ignore.contains(value) {
                    log::debug!("Skipping ignored global {target}");
                } else {
                    self.model.globals.push(self.cleaner.clean(line));
                }
            }
            LineShape::GlobalBlock => {
                let end = find_terminator(self.lines, idx + 1, idx, "\\t}", |l| {
                    l.starts_with("\t}")
                })?;
                let cleaner = self.cleaner;
                self.model
                    .globals
                    .extend(self.lines[idx..=end].iter().map(|l| cleaner.clean(l)));
                return Ok(end + 1);
            }
            LineShape::AssemblyInit { name } => {
                self.model.assembly_name = name.to_string();
            }
            LineShape::ClassSeparator => {
                self.current = None;
            }
            LineShape::ClassName { qualified } => {
                let (namespace, name) = split_qualified(qualified)
                    .ok_or_else(|| ExtractError::unrecognized(idx, line))?;
                self.current = Some(CurrentClass::Declared(ClassDefinition::new(namespace, name)));
            }
            LineShape::Constructor { var_id, params } => {
                return self.read_constructor(idx, var_id, params);
            }
            LineShape::StaticMethod { member, params } => {
                return self.read_static_method(idx, member, params);
            }
            LineShape::StaticProperty { member, value } => {
                let ignore = &self.ignore;
                if let Some(class) = current_class(&mut self.current, &mut self.model.classes) {
                    if ignore.contains(&class.member_key(member)) {
                        log::debug!("Skipping ignored member {}", class.member_key(member));
                    } else {
                        class.properties.push(
                            PropertyDefinition::new(member)
                                .with_default(value)
                                .static_member(true),
                        );
                    }
                }
            }
            LineShape::ClassBlock { var_id } => {
                return self.read_class_block(idx, var_id);
            }
            LineShape::ClassInline {
                var_id,
                members,
                trailer,
            } => {
                if let Some(class) = known_class(&mut self.model.classes, var_id) {
                    add_inline_members(class, members, idx, &self.ignore, &self.cleaner)?;
                    ClassTrailer::parse(trailer)
                        .ok_or_else(|| ExtractError::unrecognized(idx, line))?
                        .apply(class);
                }
            }
            LineShape::InterfaceInline {
                var_id,
                members,
                trailer,
            } => {
                if let Some(class) = known_class(&mut self.model.classes, var_id) {
                    add_inline_members(class, members, idx, &self.ignore, &self.cleaner)?;
                    let interfaces = parse_interface_trailer(trailer)
                        .ok_or_else(|| ExtractError::unrecognized(idx, line))?;
                    class
                        .interfaces
                        .extend(interfaces.into_iter().map(String::from));
                    class.is_interface = Some(true);
                }
            }
            LineShape::GenericArity { var_id, arity } => {
                if let Some(class) = known_class(&mut self.model.classes, var_id) {
                    class.generic_arity = arity;
                }
            }
            LineShape::EnumInline {
                var_id,
                members,
                flags,
            } => {
                if let Some(class) = known_class(&mut self.model.classes, var_id) {
                    add_inline_members(class, members, idx, &self.ignore, &self.cleaner)?;
                    class.is_enum = Some(true);
                    if flags {
                        class.is_flags = Some(true);
                    }
                }
            }
            LineShape::InitializerBlock => {
                return self.read_initializer(idx);
            }
        }

        Ok(idx + 1)
    }

    /// `var X = function(params) {` through `\t};`
    fn read_constructor(&mut self, idx: usize, var_id: &str, params: &str) -> Result<usize> {
        let lines = self.lines;
        let end = find_terminator(lines, idx + 1, idx, "\\t};", |l| l == "\t};")?;
        let body_lines = &lines[idx + 1..end];
        let params = parse_params(params);

        match self.current.take() {
            Some(CurrentClass::Declared(mut class) | CurrentClass::Detached(mut class)) => {
                class.var_id = Some(var_id.to_string());
                let body = self.cleaner.body(&class, body_lines);
                class.methods.push(MethodDefinition::constructor(params, body));

                if self.ignore.contains(&class.qualified_name()) {
                    log::debug!("Skipping ignored class {}", class.qualified_name());
                    self.ignore.insert(var_id);
                    self.current = Some(CurrentClass::Detached(class));
                } else {
                    log::debug!("Registered class {} as {var_id}", class.qualified_name());
                    let id = self.model.classes.insert(class)?;
                    self.current = Some(CurrentClass::Registered(id));
                }
            }
            Some(CurrentClass::Registered(id)) => {
                self.model.classes.bind_var_id(id, var_id)?;
                self.current = Some(CurrentClass::Registered(id));
                if let Some(class) = self.model.classes.get_mut(id) {
                    let body = self.cleaner.body(class, body_lines);
                    class.methods.push(MethodDefinition::constructor(params, body));
                }
            }
            None => return Err(ExtractError::unrecognized(idx, lines[idx])),
        }

        Ok(end + 1)
    }

    /// `\tX.member = function(params) {` through `\t};`
    fn read_static_method(&mut self, idx: usize, member: &str, params: &str) -> Result<usize> {
        let end = find_terminator(self.lines, idx + 1, idx, "\\t};", |l| l == "\t};")?;
        let lines = self.lines;
        let cleaner = self.cleaner;
        let ignore = &self.ignore;

        if let Some(class) = current_class(&mut self.current, &mut self.model.classes) {
            if ignore.contains(&class.member_key(member)) {
                log::debug!("Skipping ignored member {}", class.member_key(member));
            } else {
                let parts = function_parts(lines, idx, end, "\t", params);
                let body = cleaner.body(class, parts.body);
                class.methods.push(MethodDefinition {
                    body: Some(body),
                    is_static: Some(true),
                    type_params: parts.type_params,
                    ..MethodDefinition::new(member, parts.params)
                });
            }
        }

        Ok(end + 1)
    }

    /// `ss.initClass(X, $asm, {` through the trailer line
    fn read_class_block(&mut self, idx: usize, var_id: &str) -> Result<usize> {
        let end = find_terminator(self.lines, idx + 1, idx, "\\t}", |l| l.starts_with("\t}"))?;
        let closing = self.lines[end];
        let trailer = closing
            .strip_prefix("\t}")
            .and_then(|rest| rest.strip_suffix(");"))
            .and_then(ClassTrailer::parse)
            .ok_or_else(|| ExtractError::unrecognized(end, closing))?;

        let lines = self.lines;
        let cleaner = self.cleaner;
        let Some(id) = self.model.classes.find_by_var_id(var_id) else {
            return Ok(end + 1);
        };
        if let Some(class) = self.model.classes.get_mut(id) {
            add_members(
                class,
                &lines[idx + 1..end],
                BLOCK_INDENT,
                MemberSource::Block {
                    first_line: idx + 1,
                },
                &self.ignore,
                &cleaner,
            )?;
            trailer.apply(class);
        }

        Ok(end + 1)
    }

    /// `\t(function() {` through `\t})();`
    fn read_initializer(&mut self, idx: usize) -> Result<usize> {
        let end = find_terminator(self.lines, idx + 1, idx, "\\t})();", |l| {
            l.starts_with(INITIALIZER_CLOSE)
        })?;
        self.model.globals.push(String::new());

        let lines = self.lines;
        for &line in &lines[idx + 1..end] {
            let statement = InitializerLine::classify(line);
            let class_id = statement
                .receiver()
                .and_then(|receiver| self.model.classes.find_by_var_id(receiver));

            let static_prop = match statement {
                InitializerLine::LiteralAssignment { member, value, .. } => {
                    Some(PropertyDefinition::new(member).with_default(value))
                }
                InitializerLine::Assignment { member, .. } => Some(PropertyDefinition::new(member)),
                InitializerLine::ReceiverStatement { .. } | InitializerLine::Other => None,
            };

            match (class_id, static_prop) {
                (Some(id), Some(prop)) => {
                    if let Some(class) = self.model.classes.get_mut(id) {
                        class.properties.push(prop.static_member(true));
                    }
                    if matches!(statement, InitializerLine::Assignment { .. }) {
                        self.push_initializer_global(&statement, line);
                    }
                }
                _ => self.push_initializer_global(&statement, line),
            }
        }

        Ok(end + 1)
    }

    /// Keep an initializer statement unless its receiver is ignored
    fn push_initializer_global(&mut self, statement: &InitializerLine<'_>, line: &str) {
        match statement.receiver() {
            Some(receiver) if self.ignore.contains(receiver) => {
                log::debug!("Skipping initializer line on ignored {receiver}");
            }
            _ => self.model.globals.push(self.cleaner.clean(line)),
        }
    }
}
