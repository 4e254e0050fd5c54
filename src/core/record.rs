use super::{info::InfoField, svtype::SvType};
use crate::{
    constants::{INFO_END, INFO_SVTYPE, VCF_HEADER_PREFIX, VCF_MIN_COLUMNS},
    error::SvConvertError,
    utils::util::Result,
};

pub fn is_header(line: &str) -> bool {
    line.starts_with(VCF_HEADER_PREFIX)
}

/// SVTYPE value of a raw data line, found without validating any other column.
///
/// `None` when the line has no INFO column or no exact `SVTYPE=` token.
pub fn raw_svtype(line: &str) -> Option<&str> {
    let info = line.split_whitespace().nth(VCF_MIN_COLUMNS - 1)?;
    info.split(';').find_map(|token| {
        token
            .split_once('=')
            .filter(|(key, _)| *key == INFO_SVTYPE)
            .map(|(_, value)| value)
    })
}

/// A single VCF data line split into its columns.
///
/// Columns after INFO (FORMAT and any number of samples) are carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VcfRecord<'a> {
    pub line_number: usize,
    pub chrom: &'a str,
    pub pos: u64,
    pub id: &'a str,
    pub ref_allele: &'a str,
    pub alt_allele: &'a str,
    pub qual: &'a str,
    pub filter: &'a str,
    pub info: InfoField,
    pub trailing: Vec<&'a str>,
}

impl<'a> VcfRecord<'a> {
    pub fn parse(line: &'a str, line_number: usize) -> Result<Self> {
        let columns: Vec<&str> = line.split_whitespace().collect();
        if columns.len() < VCF_MIN_COLUMNS {
            return Err(SvConvertError::malformed(
                line_number,
                format!(
                    "expected at least {} columns, found {}",
                    VCF_MIN_COLUMNS,
                    columns.len()
                ),
            ));
        }

        let pos: u64 = columns[1].parse().map_err(|_| {
            SvConvertError::malformed(line_number, format!("invalid POS '{}'", columns[1]))
        })?;
        let info = InfoField::parse(columns[7])
            .map_err(|e| SvConvertError::malformed(line_number, e.to_string()))?;

        Ok(Self {
            line_number,
            chrom: columns[0],
            pos,
            id: columns[2],
            ref_allele: columns[3],
            alt_allele: columns[4],
            qual: columns[5],
            filter: columns[6],
            info,
            trailing: columns[VCF_MIN_COLUMNS..].to_vec(),
        })
    }

    /// Looks up an INFO value that the caller cannot do without.
    pub fn require_info(&self, key: &'static str) -> Result<&str> {
        self.info.get(key).ok_or(SvConvertError::MissingInfoKey {
            key,
            line: self.line_number,
        })
    }

    /// 1-based END from INFO.
    pub fn end(&self) -> Result<u64> {
        let end = self.require_info(INFO_END)?;
        end.parse().map_err(|_| {
            SvConvertError::malformed(self.line_number, format!("invalid END '{end}'"))
        })
    }

    /// Structural variant class, `None` when SVTYPE is absent or not a plain class (e.g. `DUP:TANDEM`).
    pub fn svtype(&self) -> Option<SvType> {
        self.info.get(INFO_SVTYPE).and_then(|s| s.parse().ok())
    }

    pub fn is_duplication(&self) -> bool {
        self.svtype() == Some(SvType::DUPLICATION)
    }

    pub fn to_line(&self) -> String {
        let pos = self.pos.to_string();
        let info = self.info.to_string();
        let mut columns: Vec<&str> = vec![
            self.chrom,
            pos.as_str(),
            self.id,
            self.ref_allele,
            self.alt_allele,
            self.qual,
            self.filter,
            info.as_str(),
        ];
        columns.extend(self.trailing.iter().copied());
        columns.join("\t")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUP_LINE: &str = "chr1\t100\tvar1\tN\t<DUP>\t.\tPASS\tEND=200;SVTYPE=DUP\tGT\t0/1";

    #[test]
    fn test_parse_columns() {
        let record = VcfRecord::parse(DUP_LINE, 7).unwrap();
        assert_eq!(record.line_number, 7);
        assert_eq!(record.chrom, "chr1");
        assert_eq!(record.pos, 100);
        assert_eq!(record.id, "var1");
        assert_eq!(record.ref_allele, "N");
        assert_eq!(record.alt_allele, "<DUP>");
        assert_eq!(record.filter, "PASS");
        assert_eq!(record.trailing, vec!["GT", "0/1"]);
        assert_eq!(record.end().unwrap(), 200);
        assert!(record.is_duplication());
        assert_eq!(record.to_line(), DUP_LINE);
    }

    #[test]
    fn test_parse_keeps_all_samples() {
        let line = "chr2\t5\tv\tA\tT\t30\t.\tSVTYPE=INS;END=5\tGT:DP\t0/1:10\t1/1:12\t./.:0";
        let record = VcfRecord::parse(line, 1).unwrap();
        assert_eq!(record.trailing.len(), 4);
        assert_eq!(record.svtype(), Some(SvType::INSERTION));
        assert!(!record.is_duplication());
        assert_eq!(record.to_line(), line);
    }

    #[test]
    fn test_sites_only_record() {
        let record = VcfRecord::parse("chr1\t10\t.\tA\t<DEL>\t.\t.\tSVTYPE=DEL;END=50", 1).unwrap();
        assert!(record.trailing.is_empty());
        assert_eq!(record.end().unwrap(), 50);
    }

    #[test]
    fn test_malformed_records() {
        let err = VcfRecord::parse("chr1\t100\tvar1", 3).unwrap_err();
        assert!(matches!(err, SvConvertError::MalformedRecord { line: 3, .. }));

        let err = VcfRecord::parse("chr1\tabc\tv\tN\t<DUP>\t.\t.\tEND=1", 4).unwrap_err();
        assert!(matches!(err, SvConvertError::MalformedRecord { line: 4, .. }));

        let record = VcfRecord::parse("chr1\t100\tv\tN\t<DUP>\t.\t.\tSVTYPE=DUP", 5).unwrap();
        let err = record.end().unwrap_err();
        assert!(matches!(
            err,
            SvConvertError::MissingInfoKey {
                key: "END",
                line: 5
            }
        ));

        let record = VcfRecord::parse("chr1\t100\tv\tN\t<DUP>\t.\t.\tEND=x;SVTYPE=DUP", 6).unwrap();
        assert!(matches!(
            record.end().unwrap_err(),
            SvConvertError::MalformedRecord { line: 6, .. }
        ));
    }

    #[test]
    fn test_raw_svtype_needs_no_valid_record() {
        assert_eq!(
            raw_svtype("chr1\tabc\tv\tN\t<DUP>\t.\t.\tEND=5;SVTYPE=DUP;SVTYPE=DUP"),
            Some("DUP")
        );
        assert_eq!(
            raw_svtype("chr1\t1\tv\tN\t<DUP>\t.\t.\tMYSVTYPE=DUP;SVTYPE=DEL"),
            Some("DEL")
        );
        assert_eq!(raw_svtype("chr1\t1\tv\tN\t<DUP>\t.\t."), None);
        assert_eq!(raw_svtype("chr1\t1\tv\tN\t<DUP>\t.\t.\tEND=9"), None);
    }

    #[test]
    fn test_header_detection() {
        assert!(is_header("##fileformat=VCFv4.2"));
        assert!(is_header("#CHROM\tPOS\tID"));
        assert!(!is_header("chr1\t1\tid#1\tA\tT\t.\t.\t."));
    }

    #[test]
    fn test_svtype_subtype_is_not_a_duplication() {
        let record = VcfRecord::parse("chr1\t1\tv\tN\t<DUP>\t.\t.\tSVTYPE=DUP:TANDEM;END=9", 1).unwrap();
        assert_eq!(record.svtype(), None);
        assert!(!record.is_duplication());
    }
}
