use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced through the top-level boundary in `main`.
#[derive(Debug, Error)]
pub enum Error {
    /// The current branch has no usable entry in the mapping table.
    /// Carries the full table (as JSON) for diagnostics.
    #[error("No environment value mapped for branch '{branch}'. Available mappings: {mappings}")]
    UnmappedBranch { branch: String, mappings: String },

    /// A non-blank mapping line without a `=` separator.
    #[error("Malformed mapping line '{line}': expected branch=environment")]
    MalformedMapping { line: String },

    /// The environment file could not be opened or appended to.
    #[error("Failed to write environment file {}", path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An export name or value contains its own heredoc delimiter, which
    /// would corrupt the environment file framing.
    #[error("Name or value of '{name}' contains the export delimiter")]
    DelimiterCollision { name: String },
}
