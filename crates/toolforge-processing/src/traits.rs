//! Converter trait and conversion results

use std::path::{Path, PathBuf};

use crate::error::{ConversionError, ConversionResult};
use crate::validator::InputKind;

/// Result of a file conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutput {
    /// One output file
    Single(PathBuf),
    /// Ordered output files, delivered as a zip archive
    Multiple(Vec<PathBuf>),
}

impl ConversionOutput {
    pub fn paths(&self) -> &[PathBuf] {
        match self {
            ConversionOutput::Single(path) => std::slice::from_ref(path),
            ConversionOutput::Multiple(paths) => paths,
        }
    }

    /// Collapse a list of outputs: one file stays single, more become an archive set.
    pub fn from_paths(mut paths: Vec<PathBuf>) -> ConversionResult<Self> {
        match paths.len() {
            0 => Err(ConversionError::Render("conversion produced no output".to_string())),
            1 => Ok(ConversionOutput::Single(paths.remove(0))),
            _ => Ok(ConversionOutput::Multiple(paths)),
        }
    }

    /// Fail unless every output exists and is non-empty.
    pub fn verify(&self) -> ConversionResult<()> {
        for path in self.paths() {
            let len = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
            if len == 0 {
                return Err(ConversionError::MissingOutput(path.clone()));
            }
        }
        Ok(())
    }
}

/// A file-to-file conversion
///
/// Implementations are synchronous and run on a blocking worker. Outputs are
/// written inside `out_dir`, named after `stem` (the sanitised upload name
/// without its extension).
pub trait Converter: Send + Sync {
    /// Short label used in failure messages, e.g. `DOCX → PDF`
    fn label(&self) -> &'static str;

    /// Input kind accepted by this converter
    fn input_kind(&self) -> InputKind;

    fn convert(&self, input: &Path, out_dir: &Path, stem: &str)
        -> ConversionResult<ConversionOutput>;
}
