//! ChatShot - WhatsApp conversation screenshot generator
//!
//! This library turns YAML or JSON conversation descriptions into styled
//! HTML mocks of a messaging screen and captures them as PNG or JPEG images
//! with headless Chromium. Descriptions may contain `{{variable}}`
//! placeholders, which makes one description usable as a template for many
//! screenshots.
//!
//! # Example
//!
//! ```rust
//! use chatshot::input::Syntax;
//! use chatshot::{render_description, GenerateOptions};
//!
//! let description = r#"
//! conversation:
//!   contact:
//!     name: "Ana"
//!   messages:
//!     - from: contact
//!       text: "Hola {{name}}"
//! variables:
//!   name: "mundo"
//! "#;
//!
//! let document = render_description(description, Syntax::Yaml, &GenerateOptions::default())
//!     .unwrap();
//! assert!(document.html().contains("Hola mundo"));
//! ```

pub mod batch;
pub mod capture;
pub mod error;
pub mod input;
pub mod model;
pub mod render;
pub mod template;
pub mod theme;

pub use error::{Error, Result};
pub use model::{ChatFile, Contact, Conversation, Message, OutputOptions, Sender, StyleVariant};
pub use render::{render_document, RenderContext, RenderedDocument};
pub use theme::Palette;

use std::path::PathBuf;

use input::{Description, Syntax};
use template::Variables;

/// Default document width in CSS pixels
pub const DEFAULT_WIDTH: u32 = 390;

/// Overrides for a single generation job
///
/// Every field is optional; the description's own `output` section and the
/// built-in defaults fill whatever is left unset. Flags win over the
/// description: width and output beat `output.width`/`output.filename`, and
/// `dark`/`android` force their modes on.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Output file; may contain placeholders
    pub output: Option<String>,
    /// Document width in CSS pixels
    pub width: Option<u32>,
    /// Force the dark palette
    pub dark: bool,
    /// Force the Android style
    pub android: bool,
    /// Variables merged over the description's own defaults
    pub variables: Variables,
}

impl GenerateOptions {
    /// Create options with nothing overridden
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output file
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Set the document width
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    /// Force the dark palette on or off
    pub fn with_dark(mut self, dark: bool) -> Self {
        self.dark = dark;
        self
    }

    /// Force the Android style on or off
    pub fn with_android(mut self, android: bool) -> Self {
        self.android = android;
        self
    }

    /// Set the caller-supplied variables
    pub fn with_variables(mut self, variables: Variables) -> Self {
        self.variables = variables;
        self
    }
}

/// A rendered document together with the output path it resolved to
#[derive(Debug, Clone)]
pub struct PreparedScreenshot {
    pub document: RenderedDocument,
    pub output_path: PathBuf,
}

/// Render a description to its HTML document with default output handling.
///
/// This runs the full resolution pipeline (parse, substitute, validate,
/// render) but stops short of the browser capture, which keeps it usable
/// without a Chromium installation.
pub fn render_description(
    text: &str,
    syntax: Syntax,
    options: &GenerateOptions,
) -> Result<RenderedDocument> {
    let (chat, _) = resolve_description(text, syntax, options)?;
    Ok(render_chat(&chat, options))
}

/// Resolve a description into a document and its output path.
///
/// The output file is chosen with the same precedence the CLI applies:
/// the caller's `output` option, then the description's `output.filename`,
/// then `output.png`. The winning name goes through variable substitution
/// and filename sanitization.
pub fn prepare_screenshot(
    text: &str,
    syntax: Syntax,
    options: &GenerateOptions,
) -> Result<PreparedScreenshot> {
    let (chat, vars) = resolve_description(text, syntax, options)?;
    let document = render_chat(&chat, options);

    let candidate = options
        .output
        .clone()
        .or_else(|| chat.output.filename.clone())
        .unwrap_or_else(|| "output.png".to_string());
    let filename = template::sanitize_filename(&template::expand_str(&candidate, &vars));

    Ok(PreparedScreenshot {
        document,
        output_path: PathBuf::from(filename),
    })
}

/// Parse, substitute, validate, and resolve the avatar reference.
fn resolve_description(
    text: &str,
    syntax: Syntax,
    options: &GenerateOptions,
) -> Result<(ChatFile, Variables)> {
    let description = Description::parse(text, syntax)?;
    let vars = input::merge_variables(&description.default_variables(), &options.variables);
    let mut chat = description.resolve(&vars)?;
    input::resolve_avatar(&mut chat.conversation.contact);
    Ok((chat, vars))
}

/// Render a resolved chat with the effective width, mode, and style.
fn render_chat(chat: &ChatFile, options: &GenerateOptions) -> RenderedDocument {
    let width = options.width.or(chat.output.width).unwrap_or(DEFAULT_WIDTH);
    let dark = options.dark || chat.output.dark_mode;
    let variant = chat.style(options.android);
    let ctx = RenderContext::new(variant, dark, width);
    render::render_document(&chat.conversation, &ctx)
}
