use std::{
    num::TryFromIntError,
    path::PathBuf,
    str::Utf8Error,
};
use thiserror::Error;

pub type SvConvertResult<T> = std::result::Result<T, SvConvertError>;

#[derive(Debug, Error)]
pub enum SvConvertError {
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Htslib(#[from] rust_htslib::errors::Error),
    #[error(transparent)]
    Utf8(#[from] Utf8Error),
    #[error(transparent)]
    TryFromInt(#[from] TryFromIntError),
    #[error("Failed to {action} {}: {source}", path.display())]
    FileIo {
        action: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Malformed VCF record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },
    #[error("INFO key {key} missing in VCF record at line {line}")]
    MissingInfoKey { key: &'static str, line: usize },
    #[error("Reference lookup failed for {region}: {reason}")]
    ReferenceLookupFailure { region: String, reason: String },
    #[error(
        "Reference index file not found: {}. Create it using 'samtools faidx {}'",
        fai_path.display(),
        reference_path.display()
    )]
    MissingReferenceIndex {
        fai_path: PathBuf,
        reference_path: PathBuf,
    },
    #[error("Invalid gzip header: {}", path.display())]
    InvalidGzipHeader { path: PathBuf },
}

impl SvConvertError {
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }

    pub fn lookup(region: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ReferenceLookupFailure {
            region: region.into(),
            reason: reason.into(),
        }
    }
}

#[macro_export]
macro_rules! svconvert_error {
    ($($arg:tt)*) => {
        $crate::error::SvConvertError::message(format!($($arg)*))
    };
}
