use color_print::cprintln;
use thiserror::Error;

/// Failures outside the pipeline. Problems in the source are notes, never
/// an `Error`.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read file: {0}")]
    FileRead(String, #[source] std::io::Error),

    #[error("Failed to write file: {0}")]
    FileWrite(String, #[source] std::io::Error),

    #[error("Failed to watch file: {0}")]
    Watch(String, #[source] std::io::Error),

    #[error("Failed to serialize memory map")]
    Serialize(#[from] serde_json::Error),

    #[error("Word wrap limit must be at least {min}, got {got}")]
    WrapLimit { min: usize, got: usize },
}

impl Error {
    /// Print error with its chain of causes
    pub fn print_diag(&self) {
        cprintln!("<red,bold>error</>: {}", self);
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            cprintln!("     <blue>--></> {}", cause);
            source = std::error::Error::source(cause);
        }
    }
}
