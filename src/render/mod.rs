//! Conversation-to-HTML rendering
//!
//! Rendering is a pure transformation: a validated conversation plus a
//! render context go in, a standalone HTML document comes out. The context
//! bundles everything style-dependent, so one assembly path serves both
//! platform variants.

mod html;
mod metrics;

pub use html::{escape_html, initials, render_document};
pub use metrics::Metrics;

use crate::model::{Message, StyleVariant};
use crate::theme::{self, Palette};

/// Everything the renderer needs besides the conversation itself
#[derive(Debug, Clone, Copy)]
pub struct RenderContext {
    pub variant: StyleVariant,
    pub palette: &'static Palette,
    pub metrics: &'static Metrics,
    /// Document width in CSS pixels
    pub width: u32,
    pub dark: bool,
}

impl RenderContext {
    /// Resolve the palette and metrics for a style and mode
    pub fn new(variant: StyleVariant, dark: bool, width: u32) -> RenderContext {
        RenderContext {
            variant,
            palette: theme::resolve(variant, dark),
            metrics: Metrics::for_variant(variant),
            width,
            dark,
        }
    }
}

/// A finished document, immutable once rendered
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    html: String,
    width: u32,
    scale: f64,
}

impl RenderedDocument {
    pub(crate) fn new(html: String, width: u32, scale: f64) -> RenderedDocument {
        RenderedDocument { html, width, scale }
    }

    /// The complete standalone HTML text
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Document width in CSS pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Device-scale factor the capture should apply
    pub fn scale(&self) -> f64 {
        self.scale
    }
}

/// Group-boundary flags for one message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupPosition {
    /// Opens a run of messages from one sender
    pub first: bool,
    /// Closes that run
    pub last: bool,
}

/// Mark group boundaries; a group is a maximal run of one sender's messages.
pub fn group_positions(messages: &[Message]) -> Vec<GroupPosition> {
    (0..messages.len())
        .map(|i| GroupPosition {
            first: i == 0 || messages[i - 1].from != messages[i].from,
            last: i + 1 == messages.len() || messages[i + 1].from != messages[i].from,
        })
        .collect()
}
