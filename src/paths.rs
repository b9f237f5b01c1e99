//! Input validation and output naming for file-based runs

use std::{
    collections::HashSet,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use log::debug;

use crate::error::{PathError, Result};

/// Extension of container files
pub const CONTAINER_EXTENSION: &str = "bin";

/// Extension of decoded FASTA files
pub const FASTA_EXTENSION: &str = "fasta";

/// Extensions of compressed inputs that are stripped along with the format extension
const COMPRESSION_EXTENSIONS: [&str; 6] = ["gz", "bgz", "bz2", "xz", "zst", "lzma"];

/// Longest stem derived from a description, leaving room for a suffix and extension
const MAX_FILE_STEM: usize = 200;

/// Fails with [`PathError::MissingInput`] if `path` does not exist.
pub fn validate_input(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(PathError::MissingInput(path.to_path_buf()).into());
    }
    Ok(())
}

/// Opens a text input, transparently decompressing it.
pub fn open_input(path: &Path) -> Result<impl BufRead> {
    validate_input(path)?;
    let (handle, format) = niffler::from_path(path)?;
    debug!("Opened {} ({format:?})", path.display());
    Ok(BufReader::new(handle))
}

/// Validates a container input: it must exist and carry the container extension.
pub fn validate_container_input(path: &Path) -> Result<()> {
    validate_input(path)?;
    if path.extension().and_then(|ext| ext.to_str()) != Some(CONTAINER_EXTENSION) {
        return Err(PathError::UnexpectedExtension {
            path: path.to_path_buf(),
            expected: CONTAINER_EXTENSION,
        }
        .into());
    }
    Ok(())
}

/// Fails with [`PathError::MissingOutputDir`] unless `dir` is an existing directory.
pub fn validate_output_dir(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        return Err(PathError::MissingOutputDir(dir.to_path_buf()).into());
    }
    Ok(())
}

/// Creates `dir` and its parents if needed.
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    Ok(())
}

/// File stem of `input` with its extension and any compression extension removed
///
/// `reads.fasta.gz` and `reads.fasta` both yield `reads`.
pub fn input_stem(input: &Path) -> Result<String> {
    let no_name = || PathError::NoFileName(input.to_path_buf());
    let mut stem = Path::new(input.file_name().ok_or_else(no_name)?).to_path_buf();
    let compressed = stem
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| COMPRESSION_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));
    if compressed {
        stem.set_extension("");
    }
    stem.set_extension("");
    let stem = stem.to_string_lossy().into_owned();
    if stem.is_empty() {
        return Err(no_name().into());
    }
    Ok(stem)
}

/// Output path in `out_dir` named after `input` with a new extension
pub fn output_path(input: &Path, out_dir: &Path, extension: &str) -> Result<PathBuf> {
    let stem = input_stem(input)?;
    Ok(out_dir.join(format!("{stem}.{extension}")))
}

/// Turns a record description into a file name stem.
///
/// Periods become underscores. ASCII letters, digits, spaces, underscores, hyphens
/// and commas are kept; everything else is dropped. The result is at most 200 bytes.
#[must_use]
pub fn sanitize_file_name(description: &[u8]) -> String {
    let mut name: String = description
        .iter()
        .filter_map(|&b| match b {
            b'.' => Some('_'),
            b if b.is_ascii_alphanumeric() || matches!(b, b' ' | b'_' | b'-' | b',') => {
                Some(char::from(b))
            }
            _ => None,
        })
        .collect();
    name.truncate(MAX_FILE_STEM);
    name.trim().to_string()
}

/// Reserves a unique stem in `taken`, appending `_2`, `_3`, ... on collisions.
///
/// An empty stem falls back to `record_{index + 1}`.
pub fn unique_name(stem: &str, index: usize, taken: &mut HashSet<String>) -> String {
    let base = if stem.is_empty() {
        format!("record_{}", index + 1)
    } else {
        stem.to_string()
    };
    let mut name = base.clone();
    let mut n = 2;
    while !taken.insert(name.clone()) {
        name = format!("{base}_{n}");
        n += 1;
    }
    name
}
