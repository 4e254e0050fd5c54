use crate::{error::SvConvertError, utils::util::Result};
use flate2::read::MultiGzDecoder;
use rust_htslib::faidx;
use std::{
    fs::File,
    io::{BufRead, BufReader, Read as ioRead},
    path::{Path, PathBuf},
};

pub fn open_vcf_reader(path: &Path) -> Result<BufReader<Box<dyn ioRead>>> {
    fn is_gzipped(path: &Path) -> bool {
        let path_str = path.to_string_lossy().to_lowercase();
        path_str.ends_with(".gz") || path_str.ends_with(".gzip")
    }
    let file = File::open(path).map_err(|source| SvConvertError::FileIo {
        action: "open",
        path: path.to_path_buf(),
        source,
    })?;
    if is_gzipped(path) {
        let gz_decoder = MultiGzDecoder::new(file);
        if gz_decoder.header().is_some() {
            Ok(BufReader::new(Box::new(gz_decoder)))
        } else {
            Err(SvConvertError::InvalidGzipHeader {
                path: path.to_path_buf(),
            })
        }
    } else {
        Ok(BufReader::new(Box::new(file)))
    }
}

/// Reads the whole VCF into memory, one entry per line with the terminator stripped.
pub fn read_vcf_lines(path: &Path) -> Result<Vec<String>> {
    let reader = open_vcf_reader(path)?;
    reader
        .lines()
        .collect::<std::io::Result<Vec<String>>>()
        .map_err(|source| SvConvertError::FileIo {
            action: "read",
            path: path.to_path_buf(),
            source,
        })
}

pub fn fai_path(path: &Path) -> PathBuf {
    let mut fai_path = path.as_os_str().to_os_string();
    fai_path.push(".fai");
    PathBuf::from(fai_path)
}

pub fn require_genome_index(path: &Path) -> Result<()> {
    let fai_path = fai_path(path);
    if !fai_path.exists() {
        return Err(SvConvertError::MissingReferenceIndex {
            fai_path,
            reference_path: path.to_path_buf(),
        });
    }
    Ok(())
}

pub fn open_genome_reader(path: &Path) -> Result<faidx::Reader> {
    require_genome_index(path)?;
    faidx::Reader::from_path(path).map_err(|e| e.into())
}
