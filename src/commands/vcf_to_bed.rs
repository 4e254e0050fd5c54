use super::ConversionSummary;
use crate::{
    cli::VcfToBedArgs,
    core::{
        bed::{format_record, BedFormat},
        record::{is_header, VcfRecord},
    },
    io::{readers::read_vcf_lines, writers::LineWriter},
    utils::util::Result,
};
use std::path::Path;

pub fn vcf_to_bed(args: VcfToBedArgs) -> Result<ConversionSummary> {
    log::info!(
        "Projecting {} to {} ({})",
        args.input.display(),
        args.output.display(),
        args.format
    );
    let summary = project_vcf(&args.input, &args.output, args.format)?;
    summary.log("vcf-to-bed");
    Ok(summary)
}

/// Writes one line (or FASTA entry) per data record of `input`; header lines are dropped.
pub fn project_vcf(input: &Path, output: &Path, format: BedFormat) -> Result<ConversionSummary> {
    let lines = read_vcf_lines(input)?;
    let mut writer = LineWriter::from_path(output)?;
    let mut summary = ConversionSummary::default();

    for (index, line) in lines.iter().enumerate() {
        if is_header(line) {
            summary.header_lines += 1;
            continue;
        }
        if line.trim().is_empty() {
            log::warn!("Line {}: blank line skipped", index + 1);
            continue;
        }
        summary.records += 1;
        let record = VcfRecord::parse(line, index + 1)?;
        match format_record(&record, format)? {
            Some(rendered) => {
                writer.write_line(&rendered)?;
                summary.converted += 1;
            }
            None => log::trace!("Line {}: {} skipped for {format} output", index + 1, record.id),
        }
    }

    writer.finish()?;
    Ok(summary)
}
