//! Template rendering
//!
//! Templates are plain text with `{{ dotted.path }}` placeholders that are
//! looked up in the export data of an order:
//!
//! ```text
//! <order id="{{ order.id }}" number="{{ order.orderNumber }}">
//!   <city>{{ order.shippingAddress.city }}</city>
//! </order>
//! ```
//!
//! Strings are inserted as-is, numbers and booleans via their JSON text, and
//! objects or arrays as compact JSON. A placeholder whose path is missing (or
//! `null`) fails the render.

use crate::domain::{lookup_path, ExportData, Result, TemplateError};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Renders a named template with export data
pub trait TemplateRenderer: Send + Sync {
    /// Render the template `name` with `data`
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] (wrapped in `ExportError::Template`) if the
    /// template cannot be loaded or references missing data.
    fn render(&self, name: &str, data: &ExportData) -> Result<String>;
}

/// Loads templates from a directory and caches them after first use
#[derive(Debug)]
pub struct FileTemplateRenderer {
    dir: PathBuf,
    cache: Mutex<HashMap<String, Arc<str>>>,
}

impl FileTemplateRenderer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// The directory templates are loaded from
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Whether a template with the given name exists
    pub fn has_template(&self, name: &str) -> bool {
        self.template_path(name)
            .map(|path| path.is_file())
            .unwrap_or(false)
    }

    fn template_path(&self, name: &str) -> std::result::Result<PathBuf, TemplateError> {
        let relative = Path::new(name);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if name.trim().is_empty() || escapes {
            return Err(TemplateError::InvalidName(name.to_string()));
        }
        Ok(self.dir.join(relative))
    }

    fn load(&self, name: &str) -> std::result::Result<Arc<str>, TemplateError> {
        let mut cache = self
            .cache
            .lock()
            .map_err(|_| TemplateError::Io("template cache lock poisoned".to_string()))?;

        if let Some(source) = cache.get(name) {
            return Ok(Arc::clone(source));
        }

        let path = self.template_path(name)?;
        let source: Arc<str> = match std::fs::read_to_string(&path) {
            Ok(source) => source.into(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(TemplateError::NotFound(path.display().to_string()));
            }
            Err(e) => {
                return Err(TemplateError::Io(format!("{}: {}", path.display(), e)));
            }
        };

        tracing::debug!(template = %name, path = %path.display(), "Loaded template");
        cache.insert(name.to_string(), Arc::clone(&source));
        Ok(source)
    }
}

impl TemplateRenderer for FileTemplateRenderer {
    fn render(&self, name: &str, data: &ExportData) -> Result<String> {
        let source = self.load(name)?;
        Ok(render_source(name, &source, data)?)
    }
}

/// Render template `source` (named `name` for error messages) with `data`
pub fn render_source(
    name: &str,
    source: &str,
    data: &ExportData,
) -> std::result::Result<String, TemplateError> {
    let mut output = String::with_capacity(source.len());
    let mut rest = source;
    let mut offset = 0;

    while let Some(start) = rest.find(OPEN) {
        output.push_str(&rest[..start]);

        let after_open = &rest[start + OPEN.len()..];
        let Some(end) = after_open.find(CLOSE) else {
            return Err(TemplateError::Unterminated {
                template: name.to_string(),
                offset: offset + start,
            });
        };

        let path = after_open[..end].trim();
        let value = lookup_path(data, path)
            .filter(|value| !value.is_null())
            .ok_or_else(|| TemplateError::MissingVariable {
                template: name.to_string(),
                variable: path.to_string(),
            })?;
        output.push_str(&format_value(value));

        let consumed = start + OPEN.len() + end + CLOSE.len();
        offset += consumed;
        rest = &rest[consumed..];
    }

    output.push_str(rest);
    Ok(output)
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
