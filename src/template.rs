//! Variable substitution for conversation templates
//!
//! Placeholders use the `{{name}}` form. A template string is compiled once
//! into literal and placeholder segments and can then be applied to any
//! number of variable sets, which is what the batch runner does.
//! [`expand_value`] runs the same substitution over every string leaf (and
//! mapping key) of a parsed description tree, so a variable value can never
//! change the structure of the tree it lands in.

use serde_json::{Map, Value};

/// A set of named variables; values may be scalars or nested JSON
pub type Variables = Map<String, Value>;

/// Characters replaced when sanitizing output filenames
const RESERVED_FILENAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// A template string compiled into literal and placeholder segments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

impl Template {
    /// Parse `{{name}}` placeholders out of `text`.
    ///
    /// A placeholder name may contain ASCII letters, digits, `_` and `-`,
    /// with optional surrounding whitespace inside the braces. Anything
    /// else, including an unterminated `{{`, stays literal text.
    pub fn compile(text: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = text;

        while let Some(open) = rest.find("{{") {
            let after = &rest[open + 2..];
            match after.find("}}") {
                Some(close) if is_identifier(after[..close].trim()) => {
                    literal.push_str(&rest[..open]);
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(after[..close].trim().to_string()));
                    rest = &after[close + 2..];
                }
                _ => {
                    // Not a placeholder; keep the braces and rescan after them
                    literal.push_str(&rest[..open + 2]);
                    rest = after;
                }
            }
        }

        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Template { segments }
    }

    /// Substitute every placeholder from `vars`.
    ///
    /// An unknown variable renders as the empty string rather than an error,
    /// so partially filled templates still produce output.
    pub fn apply(&self, vars: &Variables) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(name) => {
                    if let Some(value) = vars.get(name) {
                        out.push_str(&scalar_text(value));
                    }
                }
            }
        }
        out
    }

    /// Whether the compiled text contains at least one placeholder
    pub fn has_placeholders(&self) -> bool {
        self.segments
            .iter()
            .any(|segment| matches!(segment, Segment::Placeholder(_)))
    }
}

fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Text form a variable takes when spliced into a string
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Null => String::new(),
        // Arrays and objects keep their compact JSON form
        other => other.to_string(),
    }
}

/// Compile and apply in one step, for strings used only once
pub fn expand_str(text: &str, vars: &Variables) -> String {
    Template::compile(text).apply(vars)
}

/// Substitute placeholders in every string leaf and mapping key of `value`.
///
/// Returns true when at least one placeholder was expanded. Non-string
/// scalars pass through untouched, so substitution cannot change the shape
/// of the tree, only the text inside it.
pub fn expand_value(value: &mut Value, vars: &Variables) -> bool {
    match value {
        Value::String(text) => {
            let template = Template::compile(text);
            if template.has_placeholders() {
                *text = template.apply(vars);
                true
            } else {
                false
            }
        }
        Value::Array(items) => {
            let mut touched = false;
            for item in items.iter_mut() {
                touched |= expand_value(item, vars);
            }
            touched
        }
        Value::Object(map) => {
            let mut touched = false;
            for (_, entry) in map.iter_mut() {
                touched |= expand_value(entry, vars);
            }
            // Keys can carry placeholders too; rebuild the map when any do
            if map.keys().any(|key| Template::compile(key).has_placeholders()) {
                let entries = std::mem::take(map);
                for (key, entry) in entries {
                    map.insert(expand_str(&key, vars), entry);
                }
                touched = true;
            }
            touched
        }
        _ => false,
    }
}

/// Replace filesystem-reserved characters in a filename with underscores.
///
/// Applied to every resolved output filename after substitution; the
/// replacement is idempotent.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if RESERVED_FILENAME_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect()
}
