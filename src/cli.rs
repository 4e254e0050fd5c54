use crate::{constants::*, core::bed::BedFormat};
use anyhow::anyhow;
use clap::{ArgAction, Parser, Subcommand};
use env_logger::fmt::Color;
use log::{Level, LevelFilter};
use once_cell::sync::Lazy;
use std::{
    io::Write,
    path::{Path, PathBuf},
};

/// Full version string including the crate version and git description.
///
/// # Examples
/// * `0.1.0-1ba958a-dirty` - while on a dirty branch
/// * `0.1.0-1ba958a` - with a fresh commit
pub static FULL_VERSION: Lazy<String> = Lazy::new(|| {
    let git_describe = env!("VERGEN_GIT_DESCRIBE");
    if git_describe.is_empty() {
        env!("CARGO_PKG_VERSION").to_string()
    } else {
        format!("{}-{}", env!("CARGO_PKG_VERSION"), git_describe)
    }
});

#[derive(Parser, Debug)]
#[command(name="svconvert",
          version=&**FULL_VERSION,
          about="Structural variant VCF converters",
          long_about = None,
          after_help = "This program comes with ABSOLUTELY NO WARRANTY; it is intended for
          Research Use Only and not for use in diagnostic procedures.",
          help_template = "{name} {version}\n{about-section}\n{usage-heading}\n    {usage}\n\n{all-args}{after-help}",
          )]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Specify multiple times to increase verbosity level (e.g., -vv for more verbosity)
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        global = true
    )]
    pub verbosity: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rewrite DUP records as INS records carrying the duplicated reference sequence
    DupToIns(DupToInsArgs),
    /// Project VCF records to BED intervals
    VcfToBed(VcfToBedArgs),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::DupToIns(_) => "dup-to-ins",
            Command::VcfToBed(_) => "vcf-to-bed",
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(arg_required_else_help(true))]
pub struct DupToInsArgs {
    /// Input VCF (plain or gzip-compressed)
    #[arg(value_name = "INPUT_VCF", value_parser = check_file_exists)]
    pub input: PathBuf,

    /// Output VCF
    #[arg(value_name = "OUTPUT_VCF", value_parser = check_prefix_path)]
    pub output: PathBuf,

    /// Reference FASTA with a .fai index
    #[arg(value_name = "REFERENCE", value_parser = check_file_exists)]
    pub reference: PathBuf,

    /// Number of threads to use for reference lookups
    #[arg(
        short = '@',
        value_name = "THREADS",
        default_value_t = DEFAULT_NUM_THREADS,
        value_parser = threads_in_range
    )]
    pub num_threads: usize,

    /// Fetch sequence by running `samtools faidx` instead of reading the FASTA directly
    #[arg(long = "samtools", help_heading = "Advanced")]
    pub use_samtools: bool,

    /// samtools executable used with --samtools
    #[arg(
        long = "samtools-path",
        value_name = "SAMTOOLS",
        default_value = DEFAULT_SAMTOOLS_BIN,
        help_heading = "Advanced"
    )]
    pub samtools_path: PathBuf,
}

#[derive(Parser, Debug, Clone)]
#[command(arg_required_else_help(true))]
pub struct VcfToBedArgs {
    /// Input VCF (plain or gzip-compressed)
    #[arg(value_name = "INPUT_VCF", value_parser = check_file_exists)]
    pub input: PathBuf,

    /// Output file
    #[arg(value_name = "OUTPUT_BED", value_parser = check_prefix_path)]
    pub output: PathBuf,

    /// Output layout
    #[arg(
        long = "format",
        value_name = "FORMAT",
        value_enum,
        default_value_t = BedFormat::Bed
    )]
    pub format: BedFormat,
}

/// Initializes the verbosity level for logging based on the command-line arguments.
///
/// # Arguments
///
/// * `args` - A reference to the parsed command-line arguments.
pub fn init_verbose(args: &Cli) {
    let filter_level: LevelFilter = match args.verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            let level = record.level();
            let mut style = buf.style();
            match record.level() {
                Level::Error => style.set_color(Color::Red),
                Level::Warn => style.set_color(Color::Yellow),
                Level::Info => style.set_color(Color::Green),
                Level::Debug => style.set_color(Color::Blue),
                Level::Trace => style.set_color(Color::Cyan),
            };

            writeln!(
                buf,
                "{} [{}] {} - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                style.value(level),
                record.module_path().unwrap_or("unknown_module"),
                record.args()
            )
        })
        .filter_level(filter_level)
        .init();
}

fn threads_in_range(s: &str) -> anyhow::Result<usize> {
    let thread: usize = s
        .parse::<usize>()
        .map_err(|_| anyhow!("`{}` is not a valid thread number", s))?;
    if thread == 0 {
        return Err(anyhow!("Number of threads must be >= 1"));
    }
    Ok(thread)
}

fn check_file_exists(s: &str) -> anyhow::Result<PathBuf> {
    let path = Path::new(s);
    if !path.exists() {
        return Err(anyhow!("File does not exist: {}", path.display()));
    }
    Ok(path.to_path_buf())
}

/// Accepts an output path whose parent directory already exists.
fn check_prefix_path(s: &str) -> anyhow::Result<PathBuf> {
    let path = Path::new(s);
    if let Some(parent_dir) = path.parent() {
        if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
            return Err(anyhow!("Path does not exist: {}", parent_dir.display()));
        }
    }
    if path.is_dir() {
        return Err(anyhow!("Output path is a directory: {}", path.display()));
    }
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, NamedTempFile};

    fn path_str(path: &Path) -> &str {
        path.to_str().expect("temp path should be UTF-8")
    }

    #[test]
    fn test_parse_dup_to_ins_positional() {
        let input = NamedTempFile::new().unwrap();
        let reference = NamedTempFile::new().unwrap();
        let out_dir = tempdir().unwrap();
        let output = out_dir.path().join("out.vcf");
        let cli = Cli::try_parse_from([
            "svconvert",
            "-v",
            "dup-to-ins",
            path_str(input.path()),
            path_str(&output),
            path_str(reference.path()),
        ])
        .expect("CLI parse should succeed");
        assert_eq!(cli.verbosity, 1);
        assert_eq!(cli.command.name(), "dup-to-ins");
        let Command::DupToIns(args) = cli.command else {
            panic!("expected dup-to-ins");
        };
        assert_eq!(args.input, input.path());
        assert_eq!(args.output, output);
        assert_eq!(args.reference, reference.path());
        assert_eq!(args.num_threads, DEFAULT_NUM_THREADS);
        assert!(!args.use_samtools);
        assert_eq!(args.samtools_path, PathBuf::from(DEFAULT_SAMTOOLS_BIN));
    }

    #[test]
    fn test_parse_dup_to_ins_options() {
        let input = NamedTempFile::new().unwrap();
        let reference = NamedTempFile::new().unwrap();
        let cli = Cli::try_parse_from([
            "svconvert",
            "dup-to-ins",
            "-@",
            "4",
            "--samtools",
            "--samtools-path",
            "/opt/bin/samtools",
            path_str(input.path()),
            "out.vcf",
            path_str(reference.path()),
        ])
        .expect("CLI parse should succeed");
        let Command::DupToIns(args) = cli.command else {
            panic!("expected dup-to-ins");
        };
        assert_eq!(args.num_threads, 4);
        assert!(args.use_samtools);
        assert_eq!(args.samtools_path, PathBuf::from("/opt/bin/samtools"));
    }

    #[test]
    fn test_parse_vcf_to_bed_format() {
        let input = NamedTempFile::new().unwrap();
        let cli = Cli::try_parse_from([
            "svconvert",
            "vcf-to-bed",
            path_str(input.path()),
            "out.bed",
        ])
        .unwrap();
        let Command::VcfToBed(args) = cli.command else {
            panic!("expected vcf-to-bed");
        };
        assert_eq!(args.format, BedFormat::Bed);

        let cli = Cli::try_parse_from([
            "svconvert",
            "vcf-to-bed",
            "--format",
            "bed-extended",
            path_str(input.path()),
            "out.bed",
        ])
        .unwrap();
        let Command::VcfToBed(args) = cli.command else {
            panic!("expected vcf-to-bed");
        };
        assert_eq!(args.format, BedFormat::BedExtended);
    }

    #[test]
    fn test_parse_rejects_invalid_arguments() {
        let input = NamedTempFile::new().unwrap();
        let reference = NamedTempFile::new().unwrap();
        assert!(Cli::try_parse_from([
            "svconvert",
            "dup-to-ins",
            "/nonexistent/in.vcf",
            "out.vcf",
            path_str(reference.path()),
        ])
        .is_err());
        assert!(Cli::try_parse_from([
            "svconvert",
            "dup-to-ins",
            "-@",
            "0",
            path_str(input.path()),
            "out.vcf",
            path_str(reference.path()),
        ])
        .is_err());
        assert!(Cli::try_parse_from([
            "svconvert",
            "vcf-to-bed",
            path_str(input.path()),
            "/nonexistent/dir/out.bed",
        ])
        .is_err());
        assert!(Cli::try_parse_from([
            "svconvert",
            "vcf-to-bed",
            "--format",
            "gff",
            path_str(input.path()),
            "out.bed",
        ])
        .is_err());
        assert!(Cli::try_parse_from(["svconvert", "vcf-to-bed", path_str(input.path())]).is_err());
    }

    #[test]
    fn test_threads_in_range() {
        assert_eq!(threads_in_range("8").unwrap(), 8);
        assert!(threads_in_range("0").is_err());
        assert!(threads_in_range("many").is_err());
    }
}
