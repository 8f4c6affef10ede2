//! Template rendering for export payloads

pub mod renderer;

pub use renderer::{render_source, FileTemplateRenderer, TemplateRenderer};
