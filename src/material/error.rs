//! Error types for the theming pipeline

use std::path::PathBuf;

use thiserror::Error;

/// Failure while rendering a theme template
#[derive(Debug, Error)]
pub enum TemplateRenderError {
    #[error("template {template} references unknown role {role:?}")]
    MissingRole { template: PathBuf, role: String },
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors surfaced by the material pipeline stages
#[derive(Debug, Error)]
pub enum MaterialError {
    #[error("failed to decode image {path}: {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("unknown scheme variant: {0:?}")]
    UnknownSchemeVariant(String),
    #[error(transparent)]
    TemplateRender(#[from] TemplateRenderError),
    #[error("{tool} failed (exit code {status:?}): {stderr}")]
    ExternalTool {
        tool: String,
        status: Option<i32>,
        stderr: String,
    },
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("generation worker failed: {0}")]
    Worker(String),
}

impl From<area_color::UnknownVariant> for MaterialError {
    fn from(err: area_color::UnknownVariant) -> Self {
        MaterialError::UnknownSchemeVariant(err.0)
    }
}

pub type Result<T> = std::result::Result<T, MaterialError>;
