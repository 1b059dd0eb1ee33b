//! Theme template rendering
//!
//! Templates are plain text files with `{{ role }}` placeholders. The context
//! is every role of a scheme plus `dark_mode` (`true`/`false`). Each template
//! in the template directory is rendered twice: `<name>` with the active
//! scheme and `dark_<name>` with the dark scheme.

use std::hash::{DefaultHasher, Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use regex::{Captures, Regex};
use tracing::{debug, info};
use walkdir::WalkDir;

use super::cache::BoundedMap;
use super::error::TemplateRenderError;
use super::scheme::ColorScheme;
use super::write_atomic;

pub const DEFAULT_MEMO_CEILING: usize = 12;

const PLACEHOLDER: &str = r"\{\{\s*(\w+)\s*\}\}";

/// (template name, output path, scheme fingerprint)
type MemoKey = (String, PathBuf, u64);

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenderSummary {
    pub rendered: usize,
    pub skipped: usize,
}

pub struct TemplateRenderer {
    placeholder: Regex,
    memo: Mutex<BoundedMap<MemoKey, ()>>,
}

impl TemplateRenderer {
    pub fn new(memo_ceiling: usize) -> Result<Self, regex::Error> {
        Ok(Self {
            placeholder: Regex::new(PLACEHOLDER)?,
            memo: Mutex::new(BoundedMap::new(memo_ceiling)),
        })
    }

    /// Substitute every placeholder in `source`. Fails without producing
    /// output if any placeholder names an unknown role.
    pub fn render_str(
        &self,
        template: &Path,
        source: &str,
        scheme: &ColorScheme,
        dark: bool,
    ) -> Result<String, TemplateRenderError> {
        let dark_mode = if dark { "true" } else { "false" };
        let mut missing: Option<String> = None;
        let rendered = self.placeholder.replace_all(source, |caps: &Captures| {
            let role = &caps[1];
            let value = if role == "dark_mode" { Some(dark_mode) } else { scheme.get(role) };
            match value {
                Some(value) => value.to_string(),
                None => {
                    missing.get_or_insert_with(|| role.to_string());
                    String::new()
                }
            }
        });

        if let Some(role) = missing {
            return Err(TemplateRenderError::MissingRole {
                template: template.to_path_buf(),
                role,
            });
        }
        Ok(rendered.into_owned())
    }

    /// Render every regular file in `templates_dir` into `out_dir`.
    ///
    /// All templates are rendered in memory before anything is written, so a
    /// bad placeholder leaves the previous outputs untouched. Outputs already
    /// produced for the same scheme are skipped while they still exist.
    pub fn render_dir(
        &self,
        templates_dir: &Path,
        out_dir: &Path,
        active: &ColorScheme,
        active_dark: bool,
        dark: &ColorScheme,
    ) -> Result<RenderSummary, TemplateRenderError> {
        let mut summary = RenderSummary::default();
        if !templates_dir.is_dir() {
            debug!("Template directory {:?} does not exist, nothing to render", templates_dir);
            return Ok(summary);
        }

        let active_print = fingerprint(active, active_dark);
        let dark_print = fingerprint(dark, true);

        let mut pending: Vec<(MemoKey, String)> = Vec::new();
        for template in list_templates(templates_dir)? {
            let Some(name) = template.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
                continue;
            };
            let source = read_template(&template)?;

            let targets = [
                (out_dir.join(&name), active, active_dark, active_print),
                (out_dir.join(format!("dark_{name}")), dark, true, dark_print),
            ];
            for (output, scheme, is_dark, print) in targets {
                let key = (name.clone(), output.clone(), print);
                if output.exists() && self.memo().contains(&key) {
                    debug!("Skipping unchanged template output {:?}", output);
                    summary.skipped += 1;
                    continue;
                }
                pending.push((key, self.render_str(&template, &source, scheme, is_dark)?));
            }
        }

        for (key, rendered) in pending {
            write_output(&key.1, &rendered)?;
            self.memo().insert(key, ());
            summary.rendered += 1;
        }

        info!(
            "Rendered {} template outputs into {:?} ({} unchanged)",
            summary.rendered, out_dir, summary.skipped
        );
        Ok(summary)
    }

    pub fn clear_memo(&self) {
        self.memo().clear();
    }

    pub fn memo_len(&self) -> usize {
        self.memo().len()
    }

    fn memo(&self) -> std::sync::MutexGuard<'_, BoundedMap<MemoKey, ()>> {
        self.memo.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Regular files directly inside `dir`, sorted by name
fn list_templates(dir: &Path) -> Result<Vec<PathBuf>, TemplateRenderError> {
    let mut templates = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|err| TemplateRenderError::Io {
            path: dir.to_path_buf(),
            source: err.into(),
        })?;
        if entry.file_type().is_file() {
            templates.push(entry.into_path());
        }
    }
    Ok(templates)
}

fn read_template(path: &Path) -> Result<String, TemplateRenderError> {
    std::fs::read_to_string(path).map_err(|source| TemplateRenderError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write_output(path: &Path, contents: &str) -> Result<(), TemplateRenderError> {
    write_atomic(path, contents.as_bytes()).map_err(|source| TemplateRenderError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn fingerprint(scheme: &ColorScheme, dark: bool) -> u64 {
    let mut hasher = DefaultHasher::new();
    scheme.hash(&mut hasher);
    dark.hash(&mut hasher);
    hasher.finish()
}
