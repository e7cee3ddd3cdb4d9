//! Email template system
//!
//! Templates are plain files under a root directory, laid out as
//! `mails/<language>/<template>` (for example `mails/en/verify.html`).
//! Only `.html`, `.htm`, `.txt`, `.hbs` and `.handlebars` files are loaded;
//! other files in the tree are left alone.
//! They are rendered with Handlebars: `{{user.first_name}}` interpolates
//! with HTML escaping, `{{#if ..}}` and `{{#each ..}}` blocks work as usual,
//! and missing variables render as empty strings.

use handlebars::Handlebars;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Key/value data handed to a template
pub type TemplateContext = Map<String, Value>;

/// Template lookup and rendering errors
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Failed to render template {path}: {message}")]
    Render { path: String, message: String },

    #[error("Failed to register template {name}: {message}")]
    Registration { name: String, message: String },
}

/// Renders a named template against a context
#[cfg_attr(test, mockall::automock)]
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, path: &str, context: &TemplateContext) -> Result<String, TemplateError>;
}

/// Handlebars-backed template registry.
///
/// Every template is registered up front under its forward-slash path relative
/// to the template root, so a lookup is a map access and a syntax error shows up
/// at startup rather than on first send.
pub struct HandlebarsTemplateEngine {
    handlebars: Handlebars<'static>,
}

impl HandlebarsTemplateEngine {
    /// Create an empty engine
    pub fn new() -> Self {
        Self {
            handlebars: Handlebars::new(),
        }
    }

    /// Create an engine holding every template file found below `root`
    pub fn from_dir(root: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let root = root.as_ref();
        let mut engine = Self::new();
        engine.register_dir(root, root)?;

        tracing::debug!(
            root = %root.display(),
            count = engine.handlebars.get_templates().len(),
            "Email templates loaded"
        );

        Ok(engine)
    }

    /// Register a template from a string
    pub fn register_template_string(
        &mut self,
        name: &str,
        source: &str,
    ) -> Result<&mut Self, TemplateError> {
        self.handlebars
            .register_template_string(name, source)
            .map_err(|e| TemplateError::Registration {
                name: name.to_string(),
                message: e.to_string(),
            })?;
        Ok(self)
    }

    /// Check if a template is registered
    pub fn has_template(&self, name: &str) -> bool {
        self.handlebars.has_template(name)
    }

    /// Names of all registered templates, sorted
    pub fn template_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlebars.get_templates().keys().cloned().collect();
        names.sort();
        names
    }

    fn register_dir(&mut self, root: &Path, dir: &Path) -> Result<(), TemplateError> {
        let entries = fs::read_dir(dir).map_err(|e| TemplateError::Registration {
            name: dir.display().to_string(),
            message: e.to_string(),
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| TemplateError::Registration {
                name: dir.display().to_string(),
                message: e.to_string(),
            })?;
            let path = entry.path();
            let file_type = entry.file_type().map_err(|e| TemplateError::Registration {
                name: path.display().to_string(),
                message: e.to_string(),
            })?;

            if file_type.is_dir() {
                self.register_dir(root, &path)?;
                continue;
            }

            // Symlinked directories are not followed
            if file_type.is_symlink() && path.is_dir() {
                tracing::debug!(path = %path.display(), "Skipping symlinked directory");
                continue;
            }

            if !is_template_file(&path) {
                tracing::debug!(path = %path.display(), "Skipping non-template file");
                continue;
            }

            let name = template_name(root, &path);
            self.handlebars
                .register_template_file(&name, &path)
                .map_err(|e| TemplateError::Registration {
                    name: name.clone(),
                    message: e.to_string(),
                })?;
        }

        Ok(())
    }
}

impl Default for HandlebarsTemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for HandlebarsTemplateEngine {
    fn render(&self, path: &str, context: &TemplateContext) -> Result<String, TemplateError> {
        if !self.handlebars.has_template(path) {
            return Err(TemplateError::NotFound(path.to_string()));
        }

        self.handlebars
            .render(path, context)
            .map_err(|e| TemplateError::Render {
                path: path.to_string(),
                message: e.to_string(),
            })
    }
}

/// File extensions loaded as templates; anything else (images, fonts) is an asset
const TEMPLATE_EXTENSIONS: &[&str] = &["html", "htm", "txt", "hbs", "handlebars"];

fn is_template_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            TEMPLATE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// Forward-slash path of `path` relative to `root`
fn template_name(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
