use super::ConversionSummary;
use crate::{
    cli::DupToInsArgs,
    constants::{INFO_END, INFO_SVTYPE, REWRITE_CHUNK_SIZE},
    core::{
        record::{is_header, raw_svtype, VcfRecord},
        svtype::SvType,
    },
    error::SvConvertError,
    io::{
        fetcher::{region_string, FaidxFetcher, SamtoolsFetcher, SequenceFetcher},
        readers::read_vcf_lines,
        writers::LineWriter,
    },
    utils::util::Result,
};
use rayon::{prelude::*, ThreadPoolBuilder};
use std::path::Path;

pub fn dup_to_ins(args: DupToInsArgs) -> Result<ConversionSummary> {
    log::info!(
        "Rewriting DUP records in {} using {}",
        args.input.display(),
        args.reference.display()
    );
    let summary = if args.use_samtools {
        let fetcher = SamtoolsFetcher::new(&args.samtools_path, &args.reference)?;
        log::debug!("Fetching sequence with {}", args.samtools_path.display());
        rewrite_vcf(&args.input, &args.output, args.num_threads, || {
            Ok(fetcher.clone())
        })?
    } else {
        // Fail on a missing index before any output is written
        FaidxFetcher::from_path(&args.reference)?;
        rewrite_vcf(&args.input, &args.output, args.num_threads, || {
            FaidxFetcher::from_path(&args.reference)
        })?
    };
    summary.log("dup-to-ins");
    log::info!("Wrote {}", args.output.display());
    Ok(summary)
}

/// Rewrites every DUP record of `input` into an INS record and writes the result to `output`.
///
/// Headers and other records are copied verbatim. With more than one thread, lookups run on a
/// rayon pool and output keeps input order. Fetchers come from `make_fetcher` on the first DUP
/// record of the run (sequential) or of each rayon job, so DUP-free input never opens one.
pub fn rewrite_vcf<S, F>(
    input: &Path,
    output: &Path,
    num_threads: usize,
    make_fetcher: F,
) -> Result<ConversionSummary>
where
    S: SequenceFetcher,
    F: Fn() -> Result<S> + Sync + Send,
{
    let lines = read_vcf_lines(input)?;
    log::debug!("Read {} lines from {}", lines.len(), input.display());
    let mut writer = LineWriter::from_path(output)?;
    let mut summary = ConversionSummary::default();

    if num_threads <= 1 {
        let mut fetcher = None;
        for (index, line) in lines.iter().enumerate() {
            let rewritten = rewrite_line(&mut fetcher, &make_fetcher, line, index + 1)?;
            emit(&mut writer, &mut summary, line, rewritten)?;
        }
    } else {
        let pool = ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|i| format!("svconvert-fetch-{}", i))
            .build()
            .map_err(|e| crate::svconvert_error!("Failed to initialize lookup thread pool: {}", e))?;

        for (chunk_index, chunk) in lines.chunks(REWRITE_CHUNK_SIZE).enumerate() {
            let offset = chunk_index * REWRITE_CHUNK_SIZE;
            let results: Vec<Result<Option<String>>> = pool.install(|| {
                chunk
                    .par_iter()
                    .enumerate()
                    .map_init(
                        || None::<S>,
                        |fetcher, (i, line)| {
                            rewrite_line(fetcher, &make_fetcher, line, offset + i + 1)
                        },
                    )
                    .collect()
            });
            for (line, rewritten) in chunk.iter().zip(results) {
                emit(&mut writer, &mut summary, line, rewritten?)?;
            }
            writer.flush()?;
        }
    }

    writer.finish()?;
    Ok(summary)
}

fn emit(
    writer: &mut LineWriter,
    summary: &mut ConversionSummary,
    line: &str,
    rewritten: Option<String>,
) -> Result<()> {
    if is_header(line) {
        summary.header_lines += 1;
    } else if !line.trim().is_empty() {
        summary.records += 1;
    }
    match rewritten {
        Some(new_line) => {
            summary.converted += 1;
            writer.write_line(&new_line)
        }
        None => writer.write_line(line),
    }
}

/// Returns the INS line for a DUP record, or `None` when the line is copied as is.
///
/// `fetcher` is filled from `make_fetcher` on the first DUP record.
pub fn rewrite_line<S, F>(
    fetcher: &mut Option<S>,
    make_fetcher: &F,
    line: &str,
    line_number: usize,
) -> Result<Option<String>>
where
    S: SequenceFetcher,
    F: Fn() -> Result<S>,
{
    let Some(record) = duplication_record(line, line_number)? else {
        return Ok(None);
    };
    let opened = match fetcher.take() {
        Some(opened) => opened,
        None => make_fetcher()?,
    };
    let rewritten = dup_record_to_ins(&record, &opened);
    *fetcher = Some(opened);
    rewritten.map(Some)
}

/// Parses `line` only when its SVTYPE is exactly DUP.
///
/// Any other line is left unparsed, so it is copied through even when it would not parse.
fn duplication_record(line: &str, line_number: usize) -> Result<Option<VcfRecord<'_>>> {
    if is_header(line) {
        return Ok(None);
    }
    let Some(svtype) = raw_svtype(line) else {
        return Ok(None);
    };
    if svtype.parse::<SvType>().ok() != Some(SvType::DUPLICATION) {
        if svtype.starts_with("DUP:") {
            log::debug!(
                "Line {}: SVTYPE={} is not a plain DUP, copied unchanged",
                line_number,
                svtype
            );
        }
        return Ok(None);
    }
    let record = VcfRecord::parse(line, line_number)?;
    Ok(record.is_duplication().then_some(record))
}

/// Turns a DUP record into a single-base INS whose ALT is the duplicated reference span `[POS, END]`.
///
/// INFO keeps its token order; only END (set to POS+1) and SVTYPE change.
pub fn dup_record_to_ins<S: SequenceFetcher>(record: &VcfRecord, fetcher: &S) -> Result<String> {
    let end = record.end()?;
    if record.pos == 0 || end < record.pos {
        return Err(SvConvertError::malformed(
            record.line_number,
            format!("invalid DUP span {}-{}", record.pos, end),
        ));
    }

    let sequence = fetcher.fetch(record.chrom, record.pos, end)?;
    let expected_len = end - record.pos + 1;
    if sequence.len() as u64 != expected_len {
        log::warn!(
            "Fetched {} bp for {} ({}), expected {} bp",
            sequence.len(),
            region_string(record.chrom, record.pos, end),
            record.id,
            expected_len
        );
    }
    log::debug!(
        "Line {}: DUP {} at {} rewritten as INS ({} bp)",
        record.line_number,
        record.id,
        region_string(record.chrom, record.pos, end),
        sequence.len()
    );

    let mut info = record.info.clone();
    info.set(INFO_END, (record.pos + 1).to_string());
    info.set(INFO_SVTYPE, SvType::INSERTION.to_string());

    let insertion = VcfRecord {
        line_number: record.line_number,
        chrom: record.chrom,
        pos: record.pos,
        id: record.id,
        ref_allele: record.ref_allele,
        alt_allele: &sequence,
        qual: record.qual,
        filter: record.filter,
        info,
        trailing: record.trailing.clone(),
    };
    Ok(insertion.to_line())
}
