use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

const ACCEPTED_EXTENSIONS: [&str; 2] = ["js", "json"];

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("output path is empty")]
    Empty,

    #[error("output path has more than one volume separator ':' or contains ';'")]
    AmbiguousSeparator,

    #[error("output file name {0:?} is missing or contains reserved characters")]
    InvalidFileName(String),

    #[error("directory '{}' does not exist", .0.display())]
    MissingDirectory(PathBuf),

    #[error("output must be a .js or .json file, got {0}")]
    UnsupportedExtension(String),
}

/// A destination that passed [`validate_output_path`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedPath(PathBuf);

impl ValidatedPath {
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

impl AsRef<Path> for ValidatedPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

/// Check that `path` is a plausible JSON output destination before anything is assembled.
///
/// The file itself need not exist, but then its directory must.
pub fn validate_output_path(path: impl AsRef<Path>) -> Result<ValidatedPath, PathError> {
    let path = path.as_ref();
    let text = path.to_string_lossy();
    if text.trim().is_empty() {
        return Err(PathError::Empty);
    }
    if text.matches(':').count() > 1 || text.contains(';') {
        return Err(PathError::AmbiguousSeparator);
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| PathError::InvalidFileName(String::new()))?;
    if name.trim().is_empty() || name.chars().any(is_reserved) {
        return Err(PathError::InvalidFileName(name));
    }

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if !path.is_file() && !dir.is_dir() {
        return Err(PathError::MissingDirectory(dir.to_path_buf()));
    }

    match path.extension().and_then(OsStr::to_str) {
        Some(ext) if ACCEPTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) => {
            Ok(ValidatedPath(path.to_path_buf()))
        }
        Some(ext) => Err(PathError::UnsupportedExtension(format!("'.{ext}'"))),
        None => Err(PathError::UnsupportedExtension("no extension".to_owned())),
    }
}

// Union of the characters Windows and Unix refuse in a single path component.
fn is_reserved(c: char) -> bool {
    matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*') || c.is_ascii_control()
}
