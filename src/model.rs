//! Data model for variants and gene/transcript records.
//!
//! Gene, transcript and exon records are owned by the gene-model collaborator
//! (cf. [`crate::provider::GeneProvider`]) and are read-only to the annotation
//! engine.  All coordinates are 1-based and inclusive, on the plus strand of
//! the genome.

use parse_display::{Display, FromStr};

/// Nucleotide characters accepted in allele strings.
pub static NA_IUPAC: &str = "ACGTURYMKWSBDHVNacgturymkwsbdhvn";

/// Strand of a transcript.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    FromStr,
    serde::Deserialize,
    serde::Serialize,
)]
pub enum Strand {
    #[default]
    #[display("+")]
    #[serde(rename = "+")]
    Plus,
    #[display("-")]
    #[serde(rename = "-")]
    Minus,
}

/// Kind of a sequence variant, derived from its allele shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantKind {
    /// Single nucleotide variant.
    Snv,
    /// Multi-nucleotide variant (block substitution).
    Mnv,
    /// Insertion of novel sequence; zero-width anchor (`end == start`).
    Insertion,
    /// Deletion of reference sequence.
    Deletion,
    /// Symbolic insertion (e.g. `<INS>`) with side sequences supplied out of band.
    Symbolic,
}

/// Side sequences accompanying a symbolic insertion allele.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct SvInsSeq {
    /// Sequence inserted at the left (genomic 5') breakpoint side.
    pub left: Option<String>,
    /// Sequence inserted at the right (genomic 3') breakpoint side.
    pub right: Option<String>,
}

/// A sequence variant in genomic coordinates.
///
/// Insertions carry an empty `reference` and `end == start` (the inserted
/// bases go between `start - 1` and `start`); deletions carry an empty
/// `alternate`.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Variant {
    /// Chromosome name.
    pub chromosome: String,
    /// 1-based position of the first affected base (anchor for insertions).
    pub start: i32,
    /// 1-based position of the last affected base.
    pub end: i32,
    /// Reference allele; empty for insertions.
    pub reference: String,
    /// Alternate allele; empty for deletions, `<...>` for symbolic insertions.
    pub alternate: String,
    /// Side sequences for symbolic insertions.
    pub sv_ins_seq: Option<SvInsSeq>,
}

impl Variant {
    /// Construct a variant, deriving `end` from the allele shape.
    pub fn new(chromosome: &str, start: i32, reference: &str, alternate: &str) -> Self {
        let end = if reference.is_empty() {
            start
        } else {
            start + reference.len() as i32 - 1
        };
        Self {
            chromosome: chromosome.to_string(),
            start,
            end,
            reference: reference.to_string(),
            alternate: alternate.to_string(),
            sv_ins_seq: None,
        }
    }

    /// The kind of this variant as derived from its alleles.
    pub fn kind(&self) -> VariantKind {
        if self.alternate.starts_with('<') {
            VariantKind::Symbolic
        } else if self.reference.is_empty() {
            VariantKind::Insertion
        } else if self.alternate.is_empty() {
            VariantKind::Deletion
        } else if self.reference.len() == 1 && self.alternate.len() == 1 {
            VariantKind::Snv
        } else {
            VariantKind::Mnv
        }
    }

    /// Length of the affected allele; `None` for symbolic insertions whose
    /// sequence is not fully known.
    pub fn length(&self) -> Option<usize> {
        match self.kind() {
            VariantKind::Symbolic => None,
            _ => Some(std::cmp::max(self.reference.len(), self.alternate.len())),
        }
    }
}

/// An exon of a transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Exon {
    /// Genomic start.
    pub start: i32,
    /// Genomic end.
    pub end: i32,
    /// Reading-frame phase at the exon start in transcript direction; `-1`
    /// when the exon starts in untranslated sequence.
    pub phase: i32,
    /// 1-based ordinal in transcript 5'→3' order.
    pub number: u32,
    /// Exon sequence in transcript orientation.
    pub sequence: String,
    /// Genomic start of the coding part; `0` when the exon is non-coding.
    pub genomic_coding_start: i32,
    /// Genomic end of the coding part; `0` when the exon is non-coding.
    pub genomic_coding_end: i32,
}

/// A transcript of a gene.
///
/// Exons are stored in ascending genomic order regardless of strand and must
/// be contiguous and non-overlapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Transcript {
    /// Transcript identifier.
    pub id: String,
    /// Identifier of the encoded protein; empty for non-coding transcripts.
    pub protein_id: String,
    /// Transcript biotype, e.g. `protein_coding` or `lincRNA`.
    pub biotype: String,
    /// Strand of the transcript.
    pub strand: Strand,
    /// Genomic start.
    pub start: i32,
    /// Genomic end.
    pub end: i32,
    /// Genomic start of the coding sequence; `0` when non-coding.
    pub genomic_coding_start: i32,
    /// Genomic end of the coding sequence; `0` when non-coding.
    pub genomic_coding_end: i32,
    /// Position within the spliced cDNA at which the CDS begins (1-based).
    pub cdna_coding_start: i32,
    /// Position within the spliced cDNA at which the CDS ends (1-based).
    pub cdna_coding_end: i32,
    /// Spliced transcript sequence, 5'→3' (per-exon reverse complement
    /// applied for minus-strand transcripts before concatenation).
    pub cdna_sequence: String,
    /// Translated protein sequence, without the terminal stop.
    pub protein_sequence: String,
    /// Transcript is truncated in the reference at its 5' end.
    pub unconfirmed_start: bool,
    /// Transcript is truncated in the reference at its 3' end.
    pub unconfirmed_end: bool,
    /// Informational annotation tags.
    pub annotation_flags: Vec<String>,
    /// Exons in ascending genomic order.
    pub exons: Vec<Exon>,
}

impl Transcript {
    /// Whether the transcript codes for a protein.
    pub fn is_coding(&self) -> bool {
        self.cdna_coding_start > 0
    }

    /// Exons in transcript 5'→3' order.
    pub fn exons_in_transcript_order(&self) -> Vec<&Exon> {
        match self.strand {
            Strand::Plus => self.exons.iter().collect(),
            Strand::Minus => self.exons.iter().rev().collect(),
        }
    }

    /// Length of the spliced cDNA.
    pub fn cdna_len(&self) -> i32 {
        self.cdna_sequence.len() as i32
    }

    /// Assemble the spliced cDNA from the per-exon sequences.
    pub fn cdna_from_exons(&self) -> String {
        self.exons_in_transcript_order()
            .iter()
            .map(|exon| exon.sequence.as_str())
            .collect()
    }

    /// The transcript has 5' UTR evidence: recorded untranslated sequence
    /// before the CDS, or an unconfirmed start.
    pub fn has_five_prime_utr(&self) -> bool {
        let recorded = match self.strand {
            Strand::Plus => self.start < self.genomic_coding_start,
            Strand::Minus => self.end > self.genomic_coding_end,
        };
        recorded || self.unconfirmed_start
    }

    /// The transcript has 3' UTR evidence: recorded untranslated sequence
    /// after the CDS, or an unconfirmed end.
    pub fn has_three_prime_utr(&self) -> bool {
        let recorded = match self.strand {
            Strand::Plus => self.end > self.genomic_coding_end,
            Strand::Minus => self.start < self.genomic_coding_start,
        };
        recorded || self.unconfirmed_end
    }
}

/// A gene with its transcripts.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Gene {
    /// Stable gene identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Transcripts of the gene; order only affects output ordering.
    pub transcripts: Vec<Transcript>,
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("A", "G", VariantKind::Snv, 100)]
    #[case("AT", "GC", VariantKind::Mnv, 101)]
    #[case("", "GAT", VariantKind::Insertion, 100)]
    #[case("GAT", "", VariantKind::Deletion, 102)]
    #[case("", "<INS>", VariantKind::Symbolic, 100)]
    fn variant_kind_and_end(
        #[case] reference: &str,
        #[case] alternate: &str,
        #[case] kind: VariantKind,
        #[case] end: i32,
    ) {
        let variant = Variant::new("1", 100, reference, alternate);
        assert_eq!(variant.kind(), kind);
        assert_eq!(variant.end, end);
    }

    #[test]
    fn variant_length() {
        assert_eq!(Variant::new("1", 100, "", "GAT").length(), Some(3));
        assert_eq!(Variant::new("1", 100, "GATC", "").length(), Some(4));
        assert_eq!(Variant::new("1", 100, "A", "G").length(), Some(1));
        assert_eq!(Variant::new("1", 100, "", "<INS>").length(), None);
    }

    #[test]
    fn strand_display() {
        assert_eq!(format!("{}", Strand::Plus), "+");
        assert_eq!(format!("{}", Strand::Minus), "-");
        assert_eq!("-".parse::<Strand>().unwrap(), Strand::Minus);
    }
}
