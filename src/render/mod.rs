// HTML rendering: AST → HTML.

mod html;
mod options;

pub use html::{header_id, render};
pub use options::RenderOptions;
