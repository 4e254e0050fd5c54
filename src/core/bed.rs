use super::{record::VcfRecord, svtype::SvType};
use crate::{
    constants::{INFO_SUPP, INFO_SUPP_VEC, INFO_SVLEN, INFO_SVTYPE},
    error::SvConvertError,
    utils::util::Result,
};
use clap::ValueEnum;
use std::fmt;

/// Layout of the lines written by `vcf-to-bed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum BedFormat {
    /// chrom, start, end, name
    #[default]
    Bed,
    /// BED plus SVTYPE, SVLEN, SUPP_VEC and SUPP columns
    BedExtended,
    /// Comma-separated breakpoint table for manual review
    Csv,
    /// Sequence-resolved DEL (REF) and INS (ALT) alleles as FASTA
    Fasta,
}

impl fmt::Display for BedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BedFormat::Bed => write!(f, "bed"),
            BedFormat::BedExtended => write!(f, "bed-extended"),
            BedFormat::Csv => write!(f, "csv"),
            BedFormat::Fasta => write!(f, "fasta"),
        }
    }
}

/// Half-open, 0-based interval projected from a VCF record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BedInterval {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
    pub name: String,
}

impl BedInterval {
    pub fn from_record(record: &VcfRecord) -> Result<Self> {
        if record.pos == 0 {
            return Err(SvConvertError::malformed(
                record.line_number,
                "POS must be 1-based",
            ));
        }
        let start = record.pos - 1;
        let end = record.end()?;
        if end <= start {
            return Err(SvConvertError::malformed(
                record.line_number,
                format!("END {end} precedes POS {}", record.pos),
            ));
        }
        Ok(Self {
            chrom: record.chrom.to_string(),
            start,
            end,
            name: record.id.to_string(),
        })
    }
}

impl fmt::Display for BedInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}\t{}", self.chrom, self.start, self.end, self.name)
    }
}

struct SvAnnotation<'r> {
    svtype: &'r str,
    svlen: &'r str,
    supp_vec: &'r str,
    supp: &'r str,
}

impl<'r> SvAnnotation<'r> {
    fn from_record(record: &'r VcfRecord) -> Result<Self> {
        Ok(Self {
            svtype: record.require_info(INFO_SVTYPE)?,
            svlen: record.require_info(INFO_SVLEN)?,
            supp_vec: record.require_info(INFO_SUPP_VEC)?,
            supp: record.require_info(INFO_SUPP)?,
        })
    }
}

fn is_sequence_resolved(allele: &str) -> bool {
    !allele.is_empty() && !allele.starts_with('<')
}

/// Renders one record in the requested layout, without a trailing newline.
///
/// `Ok(None)` means the record has nothing to contribute (FASTA output for a
/// symbolic or non-INS/DEL record).
pub fn format_record(record: &VcfRecord, format: BedFormat) -> Result<Option<String>> {
    match format {
        BedFormat::Bed => Ok(Some(BedInterval::from_record(record)?.to_string())),
        BedFormat::BedExtended => {
            let interval = BedInterval::from_record(record)?;
            let sv = SvAnnotation::from_record(record)?;
            Ok(Some(format!(
                "{interval}\t{}\t{}\t{}\t{}",
                sv.svtype, sv.svlen, sv.supp_vec, sv.supp
            )))
        }
        BedFormat::Csv => {
            let interval = BedInterval::from_record(record)?;
            let sv = SvAnnotation::from_record(record)?;
            Ok(Some(format!(
                "{chrom},{start},{start_next},{chrom},{end},{end_next},{name},{},{},{}",
                sv.svtype,
                sv.svlen,
                sv.supp_vec,
                chrom = interval.chrom,
                start = interval.start,
                start_next = interval.start + 1,
                end = interval.end,
                end_next = interval.end + 1,
                name = interval.name,
            )))
        }
        BedFormat::Fasta => {
            let sequence = match record.svtype() {
                Some(SvType::DELETION) => record.ref_allele,
                Some(SvType::INSERTION) => record.alt_allele,
                _ => return Ok(None),
            };
            if !is_sequence_resolved(sequence) {
                return Ok(None);
            }
            Ok(Some(format!(">{}\n{}", record.id, sequence)))
        }
    }
}
