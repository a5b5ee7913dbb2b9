use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    /// The workbook is missing, not a real XLSX, or lacks required columns.
    InvalidSheet(String),
    /// A required cell is empty. `row` is the 1-based worksheet row.
    MissingField { row: u32, column: &'static str },
    /// Text shaping or PDF assembly failed.
    Render(String),
    /// Print/view requested before any PDF was generated.
    ArtifactMissing(PathBuf),
    /// The OS viewer/printer hand-off failed to launch.
    Dispatch(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::InvalidSheet(msg) => write!(f, "invalid workbook: {msg}"),
            Error::MissingField { row, column } => {
                write!(f, "row {row} has no value in required column '{column}'")
            }
            Error::Render(msg) => write!(f, "render error: {msg}"),
            Error::ArtifactMissing(path) => {
                write!(f, "no PDF at {}; run generate first", path.display())
            }
            Error::Dispatch(msg) => write!(f, "could not open PDF: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<roxmltree::Error> for Error {
    fn from(e: roxmltree::Error) -> Self {
        Error::InvalidSheet(format!("malformed XML: {e}"))
    }
}
