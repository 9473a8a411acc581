//! Resolver: one raw document in, one token document out
//!
//! Resolution is synchronous (file IO plus CPU-bound segmentation); the
//! converter runs each resolver on the blocking thread pool.

use crate::converter::markup::strip_markup;
use crate::converter::stopwords::StopwordSet;
use crate::converter::tokenizer::Tokenizer;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Errors local to a single resolver
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The source disappeared between enqueue and dispatch
    #[error("Source file missing: {}", .0.display())]
    SourceMissing(PathBuf),

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result of a successful resolution
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    /// Base name shared by the raw and token files, without extension
    pub doc_id: String,
    /// Path of the token document written
    pub output: PathBuf,
    /// Tokens written, in order
    pub tokens: Vec<String>,
}

/// Converts a single raw document
pub struct Resolver {
    source: PathBuf,
    done_dir: PathBuf,
    stopwords: Arc<StopwordSet>,
    tokenizer: Arc<dyn Tokenizer>,
}

impl Resolver {
    pub fn new(
        source: PathBuf,
        done_dir: PathBuf,
        stopwords: Arc<StopwordSet>,
        tokenizer: Arc<dyn Tokenizer>,
    ) -> Self {
        Self {
            source,
            done_dir,
            stopwords,
            tokenizer,
        }
    }

    pub(crate) fn source(&self) -> &Path {
        &self.source
    }

    /// Strips markup, tokenizes, drops stopwords, and writes the token file
    ///
    /// Every surviving token is written followed by a single space. A document
    /// with no surviving tokens still yields an (empty) output file. An
    /// existing output file of the same name is truncated and rewritten.
    pub fn resolve(&self) -> Result<Resolved, ResolveError> {
        let Some(file_name) = self.source.file_name() else {
            return Err(ResolveError::SourceMissing(self.source.clone()));
        };
        let bytes = match std::fs::read(&self.source) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ResolveError::SourceMissing(self.source.clone()))
            }
            Err(source) => {
                return Err(ResolveError::Io {
                    path: self.source.clone(),
                    source,
                })
            }
        };

        let text = strip_markup(&String::from_utf8_lossy(&bytes));
        drop(bytes);

        let tokens: Vec<String> = self
            .tokenizer
            .tokenize(&text)
            .into_iter()
            .filter(|token| !self.stopwords.contains(token))
            .collect();

        let output = self.done_dir.join(file_name);
        write_tokens(&output, &tokens).map_err(|source| ResolveError::Io {
            path: output.clone(),
            source,
        })?;

        let doc_id = Path::new(file_name)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Resolved {
            doc_id,
            output,
            tokens,
        })
    }
}

fn write_tokens(path: &Path, tokens: &[String]) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for token in tokens {
        out.write_all(token.as_bytes())?;
        out.write_all(b" ")?;
    }
    out.flush()
}
