use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("download failed after {attempts} attempts: {url}")]
    FetchExhausted { url: String, attempts: u32 },

    #[error("could not unpack {}: {message}", path.display())]
    Unpack { path: PathBuf, message: String },

    #[error("unrecognized artifact: {}", path.display())]
    UnrecognizedArtifact { path: PathBuf },

    // All variant slots were occupied and at least one occupant was the
    // same scheme with no clear winner. Everything stays on disk.
    #[error("no clear winner among '{base}' variants; keeping all files")]
    MergeAmbiguous { base: String },

    #[error("all variant slots occupied for '{base}'; incoming file not merged")]
    MergeSlotsExhausted { base: String },

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
