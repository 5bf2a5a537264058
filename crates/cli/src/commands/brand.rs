//! Brand (tenant) selection.
//!
//! Each brand keeps its storefront configuration in `brands/<brand>.env`.
//! Selecting a brand copies that file to `.env`, which the storefront and
//! the other commands load through `dotenvy`.
//!
//! # Usage
//!
//! ```bash
//! vt-cli brand list
//! vt-cli brand select acme
//! vt-cli brand select acme --dir config/brands --output .env.local
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Extension of brand env files.
const ENV_EXTENSION: &str = "env";

/// Errors that can occur while selecting a brand.
#[derive(Debug, Error)]
pub enum BrandError {
    /// The brands directory does not exist.
    #[error("Brands directory not found: {0}")]
    MissingDirectory(PathBuf),

    /// Brand identifiers are file stems; anything path-like is rejected.
    #[error("Invalid brand name: {0:?} (use letters, digits, '-' or '_')")]
    InvalidName(String),

    /// No env file for the requested brand.
    #[error("Unknown brand: {client}. Available brands: {}", available_list(.available))]
    UnknownBrand {
        client: String,
        available: Vec<String>,
    },

    /// Reading or writing an env file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn available_list(available: &[String]) -> String {
    if available.is_empty() {
        "(none)".to_string()
    } else {
        available.join(", ")
    }
}

/// Whether `name` can be used as a brand identifier.
fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// List brand identifiers found in `dir`, sorted.
///
/// # Errors
///
/// Returns [`BrandError::MissingDirectory`] when `dir` does not exist, or
/// [`BrandError::Io`] when it cannot be read.
pub fn list_brands(dir: &Path) -> Result<Vec<String>, BrandError> {
    if !dir.is_dir() {
        return Err(BrandError::MissingDirectory(dir.to_path_buf()));
    }

    let mut brands = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == ENV_EXTENSION)
            && let Some(stem) = path.file_stem().and_then(|stem| stem.to_str())
            && is_valid_name(stem)
        {
            brands.push(stem.to_string());
        }
    }
    brands.sort();
    Ok(brands)
}

/// Header written above the copied env file.
fn generated_header(client: &str, source: &Path) -> String {
    format!(
        "# Generated by `vt-cli brand select {client}`.\n\
         # Edit {} instead; this file is overwritten on the next select.\n\n",
        source.display()
    )
}

/// Copy `dir/<client>.env` to `output`, prefixed with a generated-file header.
///
/// # Errors
///
/// Returns [`BrandError::InvalidName`] for a path-like identifier,
/// [`BrandError::UnknownBrand`] (listing the available brands) when no env
/// file exists for `client`, or an I/O error.
pub fn select_brand(dir: &Path, client: &str, output: &Path) -> Result<(), BrandError> {
    if !is_valid_name(client) {
        return Err(BrandError::InvalidName(client.to_string()));
    }

    let source = dir.join(format!("{client}.{ENV_EXTENSION}"));
    if !source.is_file() {
        return Err(BrandError::UnknownBrand {
            client: client.to_string(),
            available: list_brands(dir)?,
        });
    }

    let content = fs::read_to_string(&source)?;
    tracing::debug!(source = %source.display(), "Copying brand env file");

    let mut env = generated_header(client, &source);
    env.push_str(&content);
    if !env.ends_with('\n') {
        env.push('\n');
    }
    fs::write(output, env)?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn brands_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("globex.env"), "BRAND_ID=globex\n").unwrap();
        fs::write(dir.path().join("acme.env"), "BRAND_ID=acme\nBRAND_NAME=Acme").unwrap();
        fs::write(dir.path().join("README.md"), "not a brand").unwrap();
        dir
    }

    #[test]
    fn test_list_brands_sorted_env_files_only() {
        let dir = brands_dir();
        assert_eq!(list_brands(dir.path()).unwrap(), vec!["acme", "globex"]);
    }

    #[test]
    fn test_list_brands_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            list_brands(&missing),
            Err(BrandError::MissingDirectory(_))
        ));
    }

    #[test]
    fn test_select_brand_writes_header_and_content() {
        let dir = brands_dir();
        let output = dir.path().join(".env");

        select_brand(dir.path(), "acme", &output).unwrap();

        let written = fs::read_to_string(&output).unwrap();
        assert!(written.starts_with("# Generated by `vt-cli brand select acme`."));
        assert!(written.contains("BRAND_ID=acme\nBRAND_NAME=Acme\n"));
    }

    #[test]
    fn test_select_brand_overwrites_previous_selection() {
        let dir = brands_dir();
        let output = dir.path().join(".env");

        select_brand(dir.path(), "acme", &output).unwrap();
        select_brand(dir.path(), "globex", &output).unwrap();

        let written = fs::read_to_string(&output).unwrap();
        assert!(written.contains("BRAND_ID=globex"));
        assert!(!written.contains("BRAND_ID=acme"));
    }

    #[test]
    fn test_unknown_brand_lists_available() {
        let dir = brands_dir();
        let err = select_brand(dir.path(), "initech", &dir.path().join(".env")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown brand: initech. Available brands: acme, globex"
        );
    }

    #[test]
    fn test_path_like_brand_rejected() {
        let dir = brands_dir();
        let err = select_brand(dir.path(), "../acme", &dir.path().join(".env")).unwrap_err();
        assert!(matches!(err, BrandError::InvalidName(_)));
    }
}
