pub mod dup_to_ins;
pub mod vcf_to_bed;

pub use dup_to_ins::dup_to_ins;
pub use vcf_to_bed::vcf_to_bed;

use crate::utils::util::format_number_with_commas;

/// Line counts of a finished conversion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    /// `#`-prefixed lines seen in the input
    pub header_lines: usize,
    /// Data lines seen in the input
    pub records: usize,
    /// Records rewritten (`dup-to-ins`) or emitted (`vcf-to-bed`)
    pub converted: usize,
}

impl ConversionSummary {
    pub fn log(&self, command: &str) {
        log::info!(
            "{command}: {} header lines, {} records, {} converted",
            format_number_with_commas(self.header_lines),
            format_number_with_commas(self.records),
            format_number_with_commas(self.converted)
        );
    }
}
