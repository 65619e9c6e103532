// Rendering configuration. Unlike `Extension`, these are plain on/off
// knobs for the built-in HTML renderer rather than user-supplied hooks.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Emit an `id` attribute on headings, slugified from their plain text.
    pub heading_ids: bool,
    /// Indent nested HTML (lists, blockquotes) for readability. Off by
    /// default: mmark-style renderers emit compact output.
    pub pretty_print: bool,
    /// Emit `<hr />` (XHTML-style self-closing) rather than `<hr>` for
    /// thematic breaks.
    pub self_closing_tags: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            heading_ids: true,
            pretty_print: false,
            self_closing_tags: true,
        }
    }
}
