pub const DEFAULT_NUM_THREADS: usize = 1;
pub const DEFAULT_SAMTOOLS_BIN: &str = "samtools";

// Records handed to the thread pool at once; output is flushed per chunk.
pub const REWRITE_CHUNK_SIZE: usize = 512;

pub const VCF_HEADER_PREFIX: char = '#';
pub const VCF_MIN_COLUMNS: usize = 8;
pub const VCF_MISSING_VALUE: &str = ".";

pub const INFO_END: &str = "END";
pub const INFO_SVTYPE: &str = "SVTYPE";
pub const INFO_SVLEN: &str = "SVLEN";
pub const INFO_SUPP: &str = "SUPP";
pub const INFO_SUPP_VEC: &str = "SUPP_VEC";
