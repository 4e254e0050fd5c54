use crate::{error::SvConvertError, utils::util::Result};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

/// Line-oriented text output. Every write error carries the destination path.
pub struct LineWriter {
    writer: BufWriter<File>,
    path: PathBuf,
    lines_written: usize,
}

impl LineWriter {
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|source| SvConvertError::FileIo {
            action: "create",
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            writer: BufWriter::new(file),
            path: path.to_path_buf(),
            lines_written: 0,
        })
    }

    pub fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.writer, "{line}").map_err(|source| self.write_error(source))?;
        self.lines_written += 1;
        Ok(())
    }

    pub fn lines_written(&self) -> usize {
        self.lines_written
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|source| self.write_error(source))
    }

    /// Flushes and closes the output.
    pub fn finish(mut self) -> Result<usize> {
        self.flush()?;
        Ok(self.lines_written)
    }

    fn write_error(&self, source: std::io::Error) -> SvConvertError {
        SvConvertError::FileIo {
            action: "write",
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_line_writer_writes_and_counts() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("out.bed");
        let mut writer = LineWriter::from_path(&path)?;
        writer.write_line("chr1\t0\t10\ta")?;
        writer.write_line("chr1\t20\t30\tb")?;
        assert_eq!(writer.lines_written(), 2);
        assert_eq!(writer.finish()?, 2);
        assert_eq!(
            std::fs::read_to_string(&path)?,
            "chr1\t0\t10\ta\nchr1\t20\t30\tb\n"
        );
        Ok(())
    }

    #[test]
    fn test_line_writer_reports_create_path() {
        let err = LineWriter::from_path(Path::new("/nonexistent/dir/out.vcf")).err().unwrap();
        assert!(err.to_string().contains("/nonexistent/dir/out.vcf"));
    }
}
