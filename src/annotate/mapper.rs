//! Strand-aware translation between genomic, cDNA, CDS and protein
//! coordinates, driven by the transcript's exon table.

use crate::model::{Strand, Transcript};

/// Landmark a [`CdnaCoord`] is expressed against.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CdnaLandmark {
    /// Position counted from the transcript start (non-coding transcripts).
    #[default]
    TranscriptStart,
    /// Position counted from the first coding nucleotide; negative values lie
    /// in the 5' UTR.
    CodingStart,
    /// Position counted past the last coding nucleotide (`*` positions in the
    /// 3' UTR).
    CodingEnd,
}

/// A cDNA coordinate: an offset from a landmark plus a signed intronic
/// offset, so that intronic positions remain expressible.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize,
)]
pub struct CdnaCoord {
    pub landmark: CdnaLandmark,
    /// Offset from the landmark; never zero for `CodingStart` (position -1
    /// abuts position 1).
    pub reference_position: i32,
    /// Signed distance into the adjacent intron; zero for exonic positions.
    pub offset: i32,
}

impl std::fmt::Display for CdnaCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.landmark == CdnaLandmark::CodingEnd {
            write!(f, "*")?;
        }
        write!(f, "{}", self.reference_position)?;
        match self.offset.cmp(&0) {
            std::cmp::Ordering::Greater => write!(f, "+{}", self.offset),
            std::cmp::Ordering::Less => write!(f, "{}", self.offset),
            std::cmp::Ordering::Equal => Ok(()),
        }
    }
}

/// Map a genomic position into the spliced cDNA.
///
/// Returns the cDNA position plus a signed intronic offset; upstream of the
/// next exon is negative, downstream of the previous exon positive, in
/// transcript direction.  Positions equidistant from both splice sites are
/// expressed from the transcript-5' side.  `None` if the position lies
/// outside the transcript span.
pub fn genomic_to_cdna(tx: &Transcript, genomic_position: i32) -> Option<(i32, i32)> {
    if genomic_position < tx.start || genomic_position > tx.end {
        return None;
    }
    let exons = tx.exons_in_transcript_order();
    let mut cum = 0;
    for (idx, exon) in exons.iter().enumerate() {
        let len = exon.end - exon.start + 1;
        if genomic_position >= exon.start && genomic_position <= exon.end {
            let into_exon = match tx.strand {
                Strand::Plus => genomic_position - exon.start,
                Strand::Minus => exon.end - genomic_position,
            };
            return Some((cum + into_exon + 1, 0));
        }
        if let Some(next) = exons.get(idx + 1) {
            let (dist_prev, dist_next) = match tx.strand {
                Strand::Plus => (genomic_position - exon.end, next.start - genomic_position),
                Strand::Minus => (exon.start - genomic_position, genomic_position - next.end),
            };
            if dist_prev > 0 && dist_next > 0 {
                return Some(if dist_prev <= dist_next {
                    (cum + len, dist_prev)
                } else {
                    (cum + len + 1, -dist_next)
                });
            }
        }
        cum += len;
    }
    None
}

/// Phase of the first coding exon in transcript order.
pub fn first_cds_phase(tx: &Transcript) -> i32 {
    tx.exons_in_transcript_order()
        .iter()
        .find(|exon| exon.genomic_coding_start > 0)
        .map(|exon| std::cmp::max(exon.phase, 0))
        .unwrap_or(0)
}

/// Effective cDNA coding start; shifted into the partial first codon for
/// transcripts with an unconfirmed start.
pub fn cdna_coding_start(tx: &Transcript) -> i32 {
    if tx.unconfirmed_start {
        tx.cdna_coding_start - ((3 - first_cds_phase(tx)) % 3)
    } else {
        tx.cdna_coding_start
    }
}

/// Map a genomic position to the coordinate used in transcript nomenclature.
pub fn genomic_to_cdna_coord(tx: &Transcript, genomic_position: i32) -> Option<CdnaCoord> {
    let (cdna, offset) = genomic_to_cdna(tx, genomic_position)?;
    if !tx.is_coding() {
        return Some(CdnaCoord {
            landmark: CdnaLandmark::TranscriptStart,
            reference_position: cdna,
            offset,
        });
    }
    let coding_start = cdna_coding_start(tx);
    let coord = if cdna >= coding_start {
        if cdna <= tx.cdna_coding_end {
            CdnaCoord {
                landmark: CdnaLandmark::CodingStart,
                reference_position: cdna - coding_start + 1,
                offset,
            }
        } else {
            CdnaCoord {
                landmark: CdnaLandmark::CodingEnd,
                reference_position: cdna - tx.cdna_coding_end,
                offset,
            }
        }
    } else {
        CdnaCoord {
            landmark: CdnaLandmark::CodingStart,
            reference_position: cdna - coding_start,
            offset,
        }
    };
    Some(coord)
}

/// CDS-relative position (1-based) of an exonic cDNA position; `None` when
/// the position lies 5' of the coding sequence.
pub fn cdna_to_cds(tx: &Transcript, cdna_position: i32) -> Option<i32> {
    let coding_start = cdna_coding_start(tx);
    (cdna_position >= coding_start).then(|| cdna_position - coding_start + 1)
}

/// Amino-acid position of a CDS position: `ceil(cds / 3)`.
pub fn amino_acid_position(cds_position: i32) -> i32 {
    (cds_position - 1) / 3 + 1
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::annotate::fixtures;

    #[rstest]
    #[case(201, 1)]
    #[case(211, 11)]
    #[case(240, 40)]
    #[case(291, 41)]
    #[case(330, 80)]
    fn tx1_exonic_positions(#[case] genomic: i32, #[case] cdna: i32) {
        let tx = fixtures::tx1();
        assert_eq!(genomic_to_cdna(&tx, genomic), Some((cdna, 0)));
    }

    #[rstest]
    #[case(241, 40, 1)]
    #[case(243, 40, 3)]
    #[case(265, 40, 25)] // one closer to the 5' splice site
    #[case(266, 41, -25)]
    #[case(290, 41, -1)]
    fn tx1_intronic_positions(#[case] genomic: i32, #[case] cdna: i32, #[case] offset: i32) {
        let tx = fixtures::tx1();
        assert_eq!(genomic_to_cdna(&tx, genomic), Some((cdna, offset)));
    }

    #[test]
    fn tx1_outside_span() {
        let tx = fixtures::tx1();
        assert_eq!(genomic_to_cdna(&tx, 200), None);
        assert_eq!(genomic_to_cdna(&tx, 331), None);
    }

    #[rstest]
    #[case(211, "1")]
    #[case(205, "-6")]
    #[case(320, "60")]
    #[case(325, "*5")]
    #[case(243, "30+3")]
    #[case(288, "31-3")]
    fn tx1_cdna_coords(#[case] genomic: i32, #[case] expected: &str) {
        let tx = fixtures::tx1();
        let coord = genomic_to_cdna_coord(&tx, genomic).unwrap();
        assert_eq!(format!("{}", coord), expected);
    }

    #[rstest]
    #[case(200, 1)] // transcript 5' end
    #[case(195, 6)] // first coding base
    #[case(138, 33)]
    #[case(101, 70)] // transcript 3' end
    fn tx2_exonic_positions(#[case] genomic: i32, #[case] cdna: i32) {
        let tx = fixtures::tx2();
        assert_eq!(genomic_to_cdna(&tx, genomic), Some((cdna, 0)));
    }

    #[rstest]
    #[case(168, "25+3")]
    #[case(143, "26-3")]
    #[case(198, "-3")]
    #[case(115, "*6")]
    fn tx2_cdna_coords(#[case] genomic: i32, #[case] expected: &str) {
        let tx = fixtures::tx2();
        let coord = genomic_to_cdna_coord(&tx, genomic).unwrap();
        assert_eq!(format!("{}", coord), expected);
    }

    #[test]
    fn tx3_non_coding_coord() {
        let tx = fixtures::tx3();
        let coord = genomic_to_cdna_coord(&tx, 150).unwrap();
        assert_eq!(coord.landmark, CdnaLandmark::TranscriptStart);
        assert_eq!(format!("{}", coord), "31");
    }

    #[test]
    fn unconfirmed_start_shifts_coding_start() {
        let mut tx = fixtures::tx1();
        assert_eq!(cdna_coding_start(&tx), 11);
        tx.unconfirmed_start = true;
        tx.exons[0].phase = 1;
        assert_eq!(cdna_coding_start(&tx), 9);
    }

    #[rstest]
    #[case(1, 1)]
    #[case(3, 1)]
    #[case(4, 2)]
    #[case(60, 20)]
    fn amino_acid_positions(#[case] cds: i32, #[case] aa: i32) {
        assert_eq!(amino_acid_position(cds), aa);
    }

    #[test]
    fn cds_positions() {
        let tx = fixtures::tx1();
        assert_eq!(cdna_to_cds(&tx, 11), Some(1));
        assert_eq!(cdna_to_cds(&tx, 70), Some(60));
        assert_eq!(cdna_to_cds(&tx, 10), None);
    }
}
