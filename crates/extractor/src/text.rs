use crate::config::ExtractorConfig;
use crate::error::{ExtractError, Result};
use crate::vocabulary::rewrite_generic_calls;
use salt2type_model::ClassDefinition;

/// Light cleanup applied to every captured body or global line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineCleaner {
    rewrite_generic_calls: bool,
    rewrite_self_references: bool,
}

impl Default for LineCleaner {
    fn default() -> Self {
        Self::from_config(&ExtractorConfig::default())
    }
}

impl LineCleaner {
    pub fn from_config(config: &ExtractorConfig) -> Self {
        Self {
            rewrite_generic_calls: config.rewrite_generic_calls,
            rewrite_self_references: config.rewrite_self_references,
        }
    }

    /// Clean a global statement line
    pub fn clean(&self, line: &str) -> String {
        if self.rewrite_generic_calls {
            rewrite_generic_calls(line)
        } else {
            line.to_string()
        }
    }

    /// Clean the body lines of a member of `class`
    ///
    /// Every occurrence of the class's variable id becomes the class name, so
    /// self-references read naturally once re-emitted.
    pub fn body(&self, class: &ClassDefinition, lines: &[&str]) -> Vec<String> {
        let var_id = class
            .var_id
            .as_deref()
            .filter(|var_id| self.rewrite_self_references && !var_id.is_empty());

        lines
            .iter()
            .map(|line| match var_id {
                Some(var_id) => self.clean(&line.replace(var_id, &class.name)),
                None => self.clean(line),
            })
            .collect()
    }
}

/// Clean a line with the default rewrites
pub fn clean_line(line: &str) -> String {
    LineCleaner::default().clean(line)
}

/// Body lines of `class` with the default rewrites
pub fn to_body(class: &ClassDefinition, lines: &[&str]) -> Vec<String> {
    LineCleaner::default().body(class, lines)
}

/// Index of the first line at or after `from` satisfying `is_end`
///
/// `opened_at` and `terminator` only feed the error.
pub fn find_terminator(
    lines: &[&str],
    from: usize,
    opened_at: usize,
    terminator: &'static str,
    is_end: impl Fn(&str) -> bool,
) -> Result<usize> {
    lines
        .iter()
        .enumerate()
        .skip(from)
        .find(|(_, line)| is_end(**line))
        .map(|(idx, _)| idx)
        .ok_or_else(|| ExtractError::unterminated(opened_at, terminator))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> ClassDefinition {
        let mut class = ClassDefinition::new("Ns", "MyClass");
        class.var_id = Some("currClassVar".to_string());
        class
    }

    #[test]
    fn test_clean_line_rewrites_generic_calls() {
        assert_eq!(
            clean_line("someMethod(Widget).call(null, param2)"),
            "someMethod<Widget | undefined>(param2)"
        );
        assert_eq!(
            clean_line("anotherMethod(int).call(param4)"),
            "anotherMethod<number>(param4)"
        );
    }

    #[test]
    fn test_to_body_replaces_self_references() {
        let body = to_body(&widget(), &["currClassVar.method1();", "otherMethod(currClassVar);"]);
        assert_eq!(body, vec!["MyClass.method1();", "otherMethod(MyClass);"]);
    }

    #[test]
    fn test_raw_cleaner_keeps_text() {
        let cleaner = LineCleaner::from_config(&ExtractorConfig::raw());
        let body = cleaner.body(&widget(), &["currClassVar.cast(int).call(null, x);"]);
        assert_eq!(body, vec!["currClassVar.cast(int).call(null, x);"]);
    }

    #[test]
    fn test_find_terminator_found() {
        let lines = ["line1", "line2 matching", "line3"];
        let idx = find_terminator(&lines, 0, 0, "matching", |l| l.ends_with("matching")).unwrap();
        assert_eq!(idx, 1);
    }

    #[test]
    fn test_find_terminator_respects_start() {
        let lines = ["}", "body", "}"];
        let idx = find_terminator(&lines, 1, 0, "}", |l| l == "}").unwrap();
        assert_eq!(idx, 2);
    }

    #[test]
    fn test_find_terminator_not_found() {
        let lines = ["line1", "line2", "line3"];
        let err = find_terminator(&lines, 0, 0, "missing", |l| l == "missing").unwrap_err();
        assert!(err.to_string().contains("Could not find match for 'missing'"));
    }
}
