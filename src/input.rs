//! Description loading and resolution
//!
//! Input files are parsed into a `serde_json` value tree first, variable
//! substitution runs over the tree's string leaves, and the typed model is
//! extracted afterwards. That ordering decides how failures are classified:
//! unparseable text is a malformed description, while an extraction failure
//! after substitution touched the tree is a malformed template result.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use log::warn;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::model::{ChatFile, Contact, RawChatFile};
use crate::template::{self, Variables};

/// Input syntaxes accepted for descriptions and variable files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    Yaml,
    Json,
}

impl Syntax {
    /// Pick the syntax from a file extension; YAML is the default.
    pub fn from_path(path: &Path) -> Syntax {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Syntax::Json,
            _ => Syntax::Yaml,
        }
    }
}

/// Read an input file, mapping the failure to [`Error::InputNotFound`].
pub fn read_input(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| Error::input_not_found(path, source))
}

/// A parsed but not yet substituted conversation description
#[derive(Debug, Clone)]
pub struct Description {
    tree: Value,
}

impl Description {
    /// Parse description text into a value tree.
    pub fn parse(text: &str, syntax: Syntax) -> Result<Description> {
        let tree = match syntax {
            Syntax::Json => {
                serde_json::from_str(text).map_err(|e| Error::malformed(e.to_string()))?
            }
            Syntax::Yaml => {
                serde_yaml::from_str(text).map_err(|e| Error::malformed(e.to_string()))?
            }
        };
        Ok(Description { tree })
    }

    /// The description's own `variables` mapping, read before substitution.
    ///
    /// These are the defaults that caller-supplied variables are merged over.
    pub fn default_variables(&self) -> Variables {
        match self.tree.get("variables") {
            Some(Value::Object(map)) => map.clone(),
            _ => Variables::new(),
        }
    }

    /// Substitute `vars` into the tree and extract the typed model.
    pub fn resolve(&self, vars: &Variables) -> Result<ChatFile> {
        let mut tree = self.tree.clone();
        let touched = template::expand_value(&mut tree, vars);

        let raw: RawChatFile = serde_json::from_value(tree).map_err(|e| {
            if touched {
                Error::malformed_template_result(e.to_string())
            } else {
                Error::malformed(e.to_string())
            }
        })?;
        raw.validate()
    }
}

/// Parse a variables file or inline variables string.
///
/// The top level must be a mapping of variable names to values.
pub fn parse_variables(text: &str, syntax: Syntax) -> Result<Variables> {
    let tree: Value = match syntax {
        Syntax::Json => serde_json::from_str(text)
            .map_err(|e| Error::malformed(format!("variables: {e}")))?,
        Syntax::Yaml => serde_yaml::from_str(text)
            .map_err(|e| Error::malformed(format!("variables: {e}")))?,
    };
    match tree {
        Value::Object(map) => Ok(map),
        other => Err(Error::malformed(format!(
            "variables must be a mapping, got {}",
            value_kind(&other)
        ))),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

/// Merge `over` on top of `base`; later values win per key.
pub fn merge_variables(base: &Variables, over: &Variables) -> Variables {
    let mut merged = base.clone();
    for (key, value) in over {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Turn a local avatar path into a `data:` URL the document can embed.
///
/// Remote and already-inline references pass through unchanged. An
/// unreadable path is dropped with a warning so the header falls back to
/// initials instead of failing the whole run.
pub fn resolve_avatar(contact: &mut Contact) {
    let Some(reference) = contact.avatar.as_deref() else {
        return;
    };
    if reference.starts_with("http://")
        || reference.starts_with("https://")
        || reference.starts_with("data:")
    {
        return;
    }

    match std::fs::read(reference) {
        Ok(bytes) => {
            let mime = avatar_mime(reference);
            let encoded = STANDARD.encode(&bytes);
            contact.avatar = Some(format!("data:{mime};base64,{encoded}"));
        }
        Err(e) => {
            warn!("Cannot read avatar '{}': {}; using initials instead", reference, e);
            contact.avatar = None;
        }
    }
}

fn avatar_mime(path: &str) -> &'static str {
    match Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/png",
    }
}
