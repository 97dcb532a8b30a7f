//! Consequence prediction for sequence variants.
//!
//! One shared exon walk and splice-junction state machine classifies each
//! (variant, transcript) pair into genomic regions; the variant-kind-specific
//! coding analysis lives in the [`substitution`], [`insertion`] and
//! [`deletion`] strategies.

mod deletion;
mod insertion;
mod substitution;

use crate::annotate::consequence::{Consequence, ConsequenceType};
use crate::annotate::Error;
use crate::common::{is_mitochondrial, regions_overlap};
use crate::model::{Gene, Strand, Transcript, Variant, VariantKind, NA_IUPAC};

/// Outer flanking band around a transcript.
pub const FLANK_5KB: i32 = 5000;
/// Inner flanking band around a transcript.
pub const FLANK_2KB: i32 = 2000;

/// Compute the consequence types of `variant` on all transcripts of `genes`.
///
/// Emits a single `intergenic_variant` marker when the variant overlaps no
/// transcript of any gene, and a `regulatory_region_variant` marker when the
/// caller flags an overlap with a regulatory region.  Failures on one
/// transcript are logged and do not abort sibling transcripts.
pub fn predict(
    variant: &Variant,
    genes: &[Gene],
    overlaps_regulatory_region: bool,
) -> Result<Vec<ConsequenceType>, anyhow::Error> {
    validate_alleles(variant)?;

    let kind = variant.kind();
    // Inserted bases go between `start - 1` and `start`.
    let (vs, ve) = match kind {
        VariantKind::Insertion | VariantKind::Symbolic => (variant.start - 1, variant.start),
        _ => (variant.start, variant.end),
    };

    let mut results = Vec::new();
    let mut intergenic = true;
    for gene in genes {
        for tx in &gene.transcripts {
            intergenic = intergenic && (ve < tx.start || vs > tx.end);
            let mut scratch = TranscriptScratch::new(variant, kind, vs, ve, gene, tx);
            let overlaps = match kind {
                VariantKind::Insertion | VariantKind::Symbolic => ve > tx.start && vs < tx.end,
                _ => ve >= tx.start && vs <= tx.end,
            };
            if overlaps {
                match scratch.solve_transcript() {
                    Ok(()) => results.push(scratch.into_record()),
                    Err(err) => {
                        tracing::warn!("skipping transcript {}: {}", tx.id, err);
                    }
                }
            } else {
                scratch.solve_flanking();
                if !scratch.terms.is_empty() {
                    results.push(scratch.into_record());
                }
            }
        }
    }

    if intergenic {
        results.push(marker(Consequence::IntergenicVariant));
    }
    if overlaps_regulatory_region {
        results.push(marker(Consequence::RegulatoryRegionVariant));
    }

    Ok(results)
}

pub(crate) fn validate_alleles(variant: &Variant) -> Result<(), Error> {
    for allele in [&variant.reference, &variant.alternate] {
        if allele.starts_with('<') {
            continue;
        }
        if !allele.chars().all(|c| NA_IUPAC.contains(c)) {
            return Err(Error::MalformedVariant(format!(
                "invalid allele characters in {:?}",
                allele
            )));
        }
    }
    Ok(())
}

fn marker(consequence: Consequence) -> ConsequenceType {
    ConsequenceType {
        gene_name: String::new(),
        gene_id: String::new(),
        transcript_id: String::new(),
        strand: None,
        biotype: String::new(),
        cdna_position: None,
        exon_number: None,
        annotation_flags: Vec::new(),
        consequences: vec![consequence],
    }
}

/// Per-(variant, transcript) working state; created fresh for each pair and
/// never shared.
struct TranscriptScratch<'a> {
    variant: &'a Variant,
    kind: VariantKind,
    /// Effective genomic start (insertion anchor adjusted).
    vs: i32,
    /// Effective genomic end.
    ve: i32,
    gene: &'a Gene,
    tx: &'a Transcript,
    mitochondrial: bool,
    terms: Vec<Consequence>,
    cdna_position: Option<i32>,
    exon_number: Option<u32>,
}

impl<'a> TranscriptScratch<'a> {
    fn new(
        variant: &'a Variant,
        kind: VariantKind,
        vs: i32,
        ve: i32,
        gene: &'a Gene,
        tx: &'a Transcript,
    ) -> Self {
        Self {
            variant,
            kind,
            vs,
            ve,
            gene,
            tx,
            mitochondrial: is_mitochondrial(&variant.chromosome),
            terms: Vec::new(),
            cdna_position: None,
            exon_number: None,
        }
    }

    fn is_insertion(&self) -> bool {
        matches!(self.kind, VariantKind::Insertion | VariantKind::Symbolic)
    }

    /// `a` lies strictly transcript-downstream of `b`.
    fn after(&self, a: i32, b: i32) -> bool {
        match self.tx.strand {
            Strand::Plus => a > b,
            Strand::Minus => a < b,
        }
    }

    /// Genomic positions of the variant's transcript-5' and -3' ends.
    fn oriented_ends(&self) -> (i32, i32) {
        match self.tx.strand {
            Strand::Plus => (self.vs, self.ve),
            Strand::Minus => (self.ve, self.vs),
        }
    }

    fn into_record(mut self) -> ConsequenceType {
        self.terms.sort();
        self.terms.dedup();
        ConsequenceType {
            gene_name: self.gene.name.clone(),
            gene_id: self.gene.id.clone(),
            transcript_id: self.tx.id.clone(),
            strand: Some(self.tx.strand),
            biotype: self.tx.biotype.clone(),
            cdna_position: self.cdna_position,
            exon_number: self.exon_number,
            annotation_flags: self.tx.annotation_flags.clone(),
            consequences: self.terms,
        }
    }

    /// Classify a variant that does not overlap the transcript span into the
    /// upstream/downstream bands (5000 nt outer, 2000 nt inner).
    fn solve_flanking(&mut self) {
        let (left, left_2kb, right, right_2kb) = match self.tx.strand {
            Strand::Plus => (
                Consequence::UpstreamGeneVariant,
                Consequence::TwoKbUpstreamGeneVariant,
                Consequence::DownstreamGeneVariant,
                Consequence::TwoKbDownstreamGeneVariant,
            ),
            Strand::Minus => (
                Consequence::DownstreamGeneVariant,
                Consequence::TwoKbDownstreamGeneVariant,
                Consequence::UpstreamGeneVariant,
                Consequence::TwoKbUpstreamGeneVariant,
            ),
        };
        if self.ve > self.tx.start - (FLANK_5KB + 1) && self.vs < self.tx.start {
            if self.ve > self.tx.start - (FLANK_2KB + 1) {
                self.terms.push(left_2kb);
            } else {
                self.terms.push(left);
            }
        }
        if self.ve > self.tx.end && self.vs < self.tx.end + FLANK_5KB + 1 {
            if self.vs < self.tx.end + FLANK_2KB + 1 {
                self.terms.push(right_2kb);
            } else {
                self.terms.push(right);
            }
        }
    }

    /// Classify the intron between two splice sites (`s1 < s2`, genomic).
    ///
    /// Band semantics: 0-1 nt past the exon edge is donor/acceptor, 2-7 nt is
    /// splice region, 8+ plain intron; 1-3 nt into the exon is splice region.
    /// Insertions landing exactly on a junction boundary count as exonic and
    /// degrade to `splice_region_variant`.  Returns (splicing, variant fully
    /// inside this intron); the guards against `s2` keep short introns from
    /// producing out-of-range band hits.
    fn solve_junction(
        &mut self,
        s1: i32,
        s2: i32,
        left_tag: Consequence,
        right_tag: Consequence,
    ) -> (bool, bool) {
        let insertion = self.is_insertion();
        let (vs, ve) = (self.vs, self.ve);
        let mut splicing = false;

        if regions_overlap(s1 + 2, s2 - 2, vs, ve) {
            self.terms.push(Consequence::IntronVariant);
        }
        let both_in_intron = vs >= s1 && ve <= s2;

        if regions_overlap(s1, s1 + 1, vs, ve) {
            if insertion && ve == s1 {
                // Insertion between the last exonic and first intronic base;
                // inserted bases count as exonic.
                self.terms.push(Consequence::SpliceRegionVariant);
            } else if insertion && ve == s1 + 2 {
                self.terms.push(Consequence::SpliceRegionVariant);
                splicing = splicing || s2 > vs;
            } else {
                self.terms.push(left_tag);
                splicing = splicing || s2 > vs;
            }
        } else if regions_overlap(s1 + 2, s1 + 7, vs, ve) {
            if !(insertion && vs == s1 + 7) {
                self.terms.push(Consequence::SpliceRegionVariant);
            }
            splicing = splicing || vs <= s2 || ve <= s2;
        } else if regions_overlap(s1 - 3, s1 - 1, vs, ve) && !(insertion && ve == s1 - 3) {
            self.terms.push(Consequence::SpliceRegionVariant);
        }

        if regions_overlap(s2 - 1, s2, vs, ve) {
            if insertion && vs == s2 {
                self.terms.push(Consequence::SpliceRegionVariant);
            } else if insertion && vs == s2 - 2 {
                self.terms.push(Consequence::SpliceRegionVariant);
                splicing = splicing || s1 < ve;
            } else {
                self.terms.push(right_tag);
                splicing = splicing || s1 < ve;
            }
        } else if regions_overlap(s2 - 7, s2 - 2, vs, ve) {
            if !(insertion && ve == s2 - 7) {
                self.terms.push(Consequence::SpliceRegionVariant);
            }
            splicing = splicing || s1 <= vs || s1 <= ve;
        } else if regions_overlap(s2 + 1, s2 + 3, vs, ve) && !(insertion && vs == s2 + 3) {
            self.terms.push(Consequence::SpliceRegionVariant);
        }

        (splicing, both_in_intron)
    }

    /// Walk the exons in transcript order, classify junctions, locate the
    /// variant in cDNA space and run the region classification.
    fn solve_transcript(&mut self) -> Result<(), Error> {
        if self.kind == VariantKind::Deletion {
            if self.vs <= self.tx.start && self.ve >= self.tx.end {
                self.terms.push(Consequence::TranscriptAblation);
                return Ok(());
            }
            for exon in &self.tx.exons {
                if self.vs <= exon.start && self.ve >= exon.end {
                    self.terms.push(Consequence::ExonLossVariant);
                }
            }
        }

        let (tv5, tv3) = self.oriented_ends();
        let exons = self.tx.exons_in_transcript_order();
        let (left_tag, right_tag) = match self.tx.strand {
            Strand::Plus => (
                Consequence::SpliceDonorVariant,
                Consequence::SpliceAcceptorVariant,
            ),
            Strand::Minus => (
                Consequence::SpliceAcceptorVariant,
                Consequence::SpliceDonorVariant,
            ),
        };

        let strand = self.tx.strand;
        let after = |a: i32, b: i32| match strand {
            Strand::Plus => a > b,
            Strand::Minus => a < b,
        };

        let mut cum = 0;
        let mut cdna5: Option<i32> = None;
        let mut cdna3: Option<i32> = None;
        let mut both_in_intron = false;

        for (idx, exon) in exons.iter().enumerate() {
            if idx > 0 {
                let prev = exons[idx - 1];
                let (s1, s2) = match strand {
                    Strand::Plus => (prev.end + 1, exon.start - 1),
                    Strand::Minus => (exon.end + 1, prev.start - 1),
                };
                let (_, both) = self.solve_junction(s1, s2, left_tag, right_tag);
                both_in_intron = both_in_intron || both;
            }

            let (e5, e3) = match strand {
                Strand::Plus => (exon.start, exon.end),
                Strand::Minus => (exon.end, exon.start),
            };
            let len = exon.end - exon.start + 1;
            let dist_to_3 = |p: i32| match strand {
                Strand::Plus => exon.end - p,
                Strand::Minus => p - exon.start,
            };

            if self.is_insertion() {
                if after(tv3, e5) {
                    let cum_end = cum + len;
                    if !after(tv5, e3) {
                        let c5 = cum_end - dist_to_3(tv5);
                        cdna5 = Some(c5);
                        self.cdna_position = Some(c5);
                        self.exon_number = Some(exon.number);
                        if !after(tv3, e3) {
                            cdna3 = Some(cum_end - dist_to_3(tv3));
                        } else {
                            // Insertion in the last nucleotide of the exon.
                            cdna3 = Some(c5 + 1);
                        }
                    }
                    cum = cum_end;
                } else if tv3 == e5 {
                    // Insertion in the first nucleotide of the exon.
                    let cum_end = cum + len;
                    let c3 = cum_end - dist_to_3(tv3);
                    cdna3 = Some(c3);
                    cdna5 = Some(c3 - 1);
                    self.exon_number = Some(exon.number);
                    cum = cum_end;
                } else {
                    break;
                }
            } else if !after(e5, tv3) {
                let cum_end = cum + len;
                if !after(tv5, e3) {
                    self.exon_number = Some(exon.number);
                    if !after(e5, tv5) {
                        let c5 = cum_end - dist_to_3(tv5);
                        cdna5 = Some(c5);
                        self.cdna_position = Some(c5);
                    }
                    if !after(tv3, e3) {
                        cdna3 = Some(cum_end - dist_to_3(tv3));
                    }
                }
                cum = cum_end;
            } else {
                break;
            }
        }

        if both_in_intron {
            if !self.tx.is_coding() {
                self.terms.push(Consequence::NonCodingTranscriptVariant);
            }
            return Ok(());
        }

        if self.is_insertion() {
            // Account for insertions at the 5'/3' end of an intron.
            match (cdna5, cdna3) {
                (None, Some(c3)) => cdna5 = Some(c3 - 1),
                (Some(c5), None) => cdna3 = Some(c5 + 1),
                _ => {}
            }
        }

        self.solve_exonic(cdna5, cdna3)
    }

    /// Region classification once the variant is known not to be purely
    /// intronic: UTR vs coding, then the kind-specific coding analysis.
    fn solve_exonic(&mut self, cdna5: Option<i32>, cdna3: Option<i32>) -> Result<(), Error> {
        if !self.tx.is_coding() {
            if cdna5.is_some() || cdna3.is_some() {
                self.terms.push(Consequence::NonCodingTranscriptExonVariant);
            }
            self.terms.push(Consequence::NonCodingTranscriptVariant);
            return Ok(());
        }

        let (tv5, tv3) = self.oriented_ends();
        let (c5, c3) = match self.tx.strand {
            Strand::Plus => (self.tx.genomic_coding_start, self.tx.genomic_coding_end),
            Strand::Minus => (self.tx.genomic_coding_end, self.tx.genomic_coding_start),
        };

        if self.after(c5, tv5) {
            // Variant 5' end in the 5' UTR region.
            if self.tx.has_five_prime_utr() {
                self.terms.push(Consequence::FivePrimeUtrVariant);
            }
        } else if !self.after(tv5, c3) {
            if !self.after(tv3, c3) {
                match self.kind {
                    VariantKind::Snv => substitution::solve_coding_snv(self, cdna5),
                    VariantKind::Mnv => substitution::solve_coding_mnv(self, cdna5, cdna3),
                    VariantKind::Insertion | VariantKind::Symbolic => {
                        insertion::solve_coding(self, cdna5, cdna3)?
                    }
                    VariantKind::Deletion => deletion::solve_coding(self, cdna5, cdna3),
                }
            } else if self.tx.has_three_prime_utr() {
                self.terms.push(Consequence::ThreePrimeUtrVariant);
            }
        } else if self.tx.has_three_prime_utr() {
            self.terms.push(Consequence::ThreePrimeUtrVariant);
        }

        Ok(())
    }
}

#[cfg(test)]
mod test;
