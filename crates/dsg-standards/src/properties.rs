//! Property-list files: one `name = value` entry per line.
//!
//! Blank lines and lines starting with `#` or `!` are ignored. Entries keep
//! their file order so that error messages and re-serialization are stable.

use crate::error::StandardsError;

/// One `name = value` entry and the 1-based line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub line: usize,
    pub name: String,
    pub value: String,
}

pub fn parse_properties(text: &str) -> Result<Vec<Property>, StandardsError> {
    let mut properties = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }
        let Some((name, value)) = trimmed.split_once('=') else {
            return Err(StandardsError::PropertySyntax {
                line,
                message: format!("expected 'name = value' but found '{trimmed}'"),
            });
        };
        let name = name.trim();
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(StandardsError::PropertySyntax {
                line,
                message: format!("invalid property name '{name}'"),
            });
        }
        if properties.iter().any(|p: &Property| p.name == name) {
            return Err(StandardsError::PropertySyntax {
                line,
                message: format!("property '{name}' is given more than once"),
            });
        }
        properties.push(Property {
            line,
            name: name.to_string(),
            value: value.trim().to_string(),
        });
    }
    Ok(properties)
}

pub fn write_properties<'a>(entries: impl IntoIterator<Item = (&'a str, String)>) -> String {
    let mut out = String::new();
    for (name, value) in entries {
        out.push_str(name);
        out.push_str(" = ");
        out.push_str(&value);
        out.push('\n');
    }
    out
}
