//! The delegated build recipe.
//!
//! The recipe file describes how the project's package is actually built.
//! Its contents are opaque to resolution: the file is read and content-hashed,
//! never interpreted. The digest feeds the artifact identity, so a recipe
//! edit changes every produced package digest.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("recipe file not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to read recipe file: {0}")]
    Io(#[from] std::io::Error),
}

/// A loaded build recipe: path plus content digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub path: PathBuf,
    /// Blake3 hash of the raw recipe file bytes.
    pub digest: String,
}

impl Recipe {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RecipeError> {
        let path = path.as_ref();
        let data = match fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(RecipeError::NotFound(path.to_path_buf()));
            }
            Err(e) => return Err(RecipeError::Io(e)),
        };
        Ok(Self {
            path: path.to_path_buf(),
            digest: blake3::hash(&data).to_hex().to_string(),
        })
    }
}
