//! Lines inside an anonymous `(function() { … })();` initializer block.

use once_cell::sync::Lazy;
use regex::Regex;

/// Closing line prefix of an initializer block
pub const INITIALIZER_CLOSE: &str = "\t})();";

static LITERAL_ASSIGNMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^\t\t([A-Za-z0-9$_]+)\.([A-Za-z0-9$_]+) = (\[[^\[]*\]|"[^"]*"|'[^']*'|\{[^\}]*\}|[0-9.-]+|null);$"#,
    )
    .expect("Invalid literal assignment regex")
});

static ASSIGNMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\t\t([A-Za-z0-9$_]+)\.([A-Za-z0-9$_]+) = ").expect("Invalid assignment regex")
});

static RECEIVER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\t\t([A-Za-z0-9$_]+)\.").expect("Invalid receiver regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitializerLine<'a> {
    /// `X.m = <literal>;` with an array, string, object, number or null literal
    LiteralAssignment {
        receiver: &'a str,
        member: &'a str,
        value: &'a str,
    },
    /// `X.m = <anything else>`
    Assignment { receiver: &'a str, member: &'a str },
    /// Any other statement on `X.`
    ReceiverStatement { receiver: &'a str },
    Other,
}

impl<'a> InitializerLine<'a> {
    pub fn classify(line: &'a str) -> Self {
        if let Some(caps) = LITERAL_ASSIGNMENT.captures(line) {
            if let (Some(receiver), Some(member), Some(value)) =
                (caps.get(1), caps.get(2), caps.get(3))
            {
                return Self::LiteralAssignment {
                    receiver: receiver.as_str(),
                    member: member.as_str(),
                    value: value.as_str(),
                };
            }
        }

        if let Some(caps) = ASSIGNMENT.captures(line) {
            if let (Some(receiver), Some(member)) = (caps.get(1), caps.get(2)) {
                return Self::Assignment {
                    receiver: receiver.as_str(),
                    member: member.as_str(),
                };
            }
        }

        match RECEIVER.captures(line).and_then(|caps| caps.get(1)) {
            Some(receiver) => Self::ReceiverStatement {
                receiver: receiver.as_str(),
            },
            None => Self::Other,
        }
    }

    /// Receiver variable, if the line starts with one
    pub const fn receiver(&self) -> Option<&'a str> {
        match self {
            Self::LiteralAssignment { receiver, .. }
            | Self::Assignment { receiver, .. }
            | Self::ReceiverStatement { receiver } => Some(*receiver),
            Self::Other => None,
        }
    }
}
