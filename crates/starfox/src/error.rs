use starfox_uixml::ParseError;
use thiserror::Error;

/// Every way a registration, render or load can fail.
///
/// Rendering never retries: the first error aborts the pass and the partially
/// built control graph is dropped with the renderer.
#[derive(Debug, Error)]
pub enum Error {
    /// The markup is not well-formed XML or has no `ui` node.
    #[error("invalid uixml: {0}")]
    InvalidMarkup(String),
    /// No XML parser is installed on the engine.
    #[error("the current runtime does not have an XML parser")]
    UnsupportedRuntime,
    #[error("unable to render: {0}")]
    UnableToRender(String),
    /// A control definition does not provide a member the markup relies on.
    #[error("invalid control: {0}")]
    InvalidControl(String),
    #[error("a control with name '{0}' is already registered")]
    DuplicateControl(String),
    /// `resource` / `resource-url` coercion failed.
    #[error("resource: {0}")]
    Resource(String),
    /// Opening or reading the markup source failed.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Error::InvalidMarkup(e.to_string())
    }
}
