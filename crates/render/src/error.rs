use std::path::PathBuf;

use thiserror::Error;

/// Fatal composition errors raised while building the template cache.
///
/// These only occur at startup and abort it: the server must not begin
/// accepting connections with a partially built cache.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to read template fragment {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse template set for page \"{page}\": {source}")]
    Parse { page: String, source: tera::Error },

    #[error("template name \"{name}\" is defined more than once")]
    DuplicateName { name: String },
}

/// Failures while resolving or executing an already-composed template set.
///
/// Both variants surface to the client as one generic internal error
/// response; neither ever leaks partial page output.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The requested page was never registered. A routing/deployment defect,
    /// not a user error.
    #[error("the template \"{0}\" does not exist")]
    UnknownPage(String),

    #[error("failed to build render context for page \"{page}\": {source}")]
    Context { page: String, source: tera::Error },

    #[error("failed to render page \"{page}\": {source}")]
    Execute { page: String, source: tera::Error },
}
