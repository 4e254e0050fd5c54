//! Reference sequence lookup.
//!
//! All coordinates are 1-based and inclusive on both ends, matching the
//! `contig:start-end` region syntax of `samtools faidx`.

use super::readers::{open_genome_reader, require_genome_index};
use crate::{error::SvConvertError, utils::util::Result};
use rust_htslib::faidx;
use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
    process::Command,
};

pub fn region_string(contig: &str, start: u64, end: u64) -> String {
    format!("{contig}:{start}-{end}")
}

pub trait SequenceFetcher {
    /// Returns the reference bases of `contig` from `start` to `end` (1-based, inclusive).
    fn fetch(&self, contig: &str, start: u64, end: u64) -> Result<String>;
}

fn check_range(contig: &str, start: u64, end: u64) -> Result<()> {
    if start == 0 || end < start {
        return Err(SvConvertError::lookup(
            region_string(contig, start, end),
            "invalid 1-based range",
        ));
    }
    Ok(())
}

/// In-process lookup through htslib's faidx.
pub struct FaidxFetcher {
    reader: faidx::Reader,
    contigs: HashSet<String>,
    path: PathBuf,
}

impl FaidxFetcher {
    pub fn from_path(path: &Path) -> Result<Self> {
        let reader = open_genome_reader(path)?;
        let contigs = reader.seq_names()?.into_iter().collect();
        Ok(Self {
            reader,
            contigs,
            path: path.to_path_buf(),
        })
    }
}

impl SequenceFetcher for FaidxFetcher {
    fn fetch(&self, contig: &str, start: u64, end: u64) -> Result<String> {
        check_range(contig, start, end)?;
        let region = region_string(contig, start, end);
        if !self.contigs.contains(contig) {
            return Err(SvConvertError::lookup(
                region,
                format!("contig not found in {}", self.path.display()),
            ));
        }
        // faidx takes 0-based inclusive bounds
        let begin = usize::try_from(start - 1)?;
        let stop = usize::try_from(end - 1)?;
        let sequence = self
            .reader
            .fetch_seq_string(contig, begin, stop)
            .map_err(|e| SvConvertError::lookup(&region, format!("{} ({})", e, self.path.display())))?;
        if sequence.is_empty() {
            return Err(SvConvertError::lookup(region, "empty sequence"));
        }
        Ok(sequence)
    }
}

/// Lookup by running `samtools faidx <reference> <region>` once per call.
#[derive(Debug, Clone)]
pub struct SamtoolsFetcher {
    samtools: PathBuf,
    reference: PathBuf,
}

impl SamtoolsFetcher {
    pub fn new(samtools: &Path, reference: &Path) -> Result<Self> {
        require_genome_index(reference)?;
        Ok(Self {
            samtools: samtools.to_path_buf(),
            reference: reference.to_path_buf(),
        })
    }
}

/// Joins the sequence lines of a single-record FASTA, dropping the `>` descriptor line.
pub fn parse_faidx_output(stdout: &str) -> String {
    stdout
        .lines()
        .filter(|line| !line.starts_with('>'))
        .map(str::trim_end)
        .collect()
}

impl SequenceFetcher for SamtoolsFetcher {
    fn fetch(&self, contig: &str, start: u64, end: u64) -> Result<String> {
        check_range(contig, start, end)?;
        let region = region_string(contig, start, end);
        let output = Command::new(&self.samtools)
            .arg("faidx")
            .arg(&self.reference)
            .arg(&region)
            .output()
            .map_err(|e| {
                SvConvertError::lookup(
                    &region,
                    format!("failed to run {}: {e}", self.samtools.display()),
                )
            })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SvConvertError::lookup(
                region,
                format!("samtools exited with {}: {}", output.status, stderr.trim()),
            ));
        }
        let stdout = std::str::from_utf8(&output.stdout)?;
        let sequence = parse_faidx_output(stdout);
        if sequence.is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SvConvertError::lookup(
                region,
                format!("empty sequence {}", stderr.trim()),
            ));
        }
        Ok(sequence)
    }
}

/// Fixed in-memory contigs, for tests and for callers that already hold the sequence.
#[derive(Debug, Clone, Default)]
pub struct MockFetcher {
    contigs: HashMap<String, String>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contig(mut self, name: impl Into<String>, sequence: impl Into<String>) -> Self {
        self.contigs.insert(name.into(), sequence.into());
        self
    }
}

impl SequenceFetcher for MockFetcher {
    fn fetch(&self, contig: &str, start: u64, end: u64) -> Result<String> {
        check_range(contig, start, end)?;
        let region = region_string(contig, start, end);
        let sequence = self
            .contigs
            .get(contig)
            .ok_or_else(|| SvConvertError::lookup(&region, "unknown contig"))?;
        // Clamp at the contig end like faidx does
        let begin = usize::try_from(start - 1)?;
        let stop = usize::try_from(end)?.min(sequence.len());
        if begin >= stop {
            return Err(SvConvertError::lookup(region, "empty sequence"));
        }
        Ok(sequence[begin..stop].to_string())
    }
}
