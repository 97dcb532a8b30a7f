//! Annotation of sequence variants: consequence terms and HGVS nomenclature.

pub mod codon;
pub mod consequence;
pub mod csq;
pub mod hgvs;
pub mod mapper;
pub mod tables;

use crate::annotate::consequence::ConsequenceType;
use crate::model::{Transcript, Variant};
use crate::provider::{GeneProvider, SequenceProvider};

/// Errors of the annotation engine.
///
/// Only `MalformedVariant` is fatal to a (variant, transcript) computation;
/// the other conditions are recovered locally and logged.
#[derive(Debug, parse_display::Display)]
pub enum Error {
    /// The variant itself is broken; not retried.
    #[display("malformed variant: {0}")]
    MalformedVariant(String),
    /// Computed protein coordinates exceed the protein sequence.
    #[display("protein coordinates out of bounds: {0}")]
    OutOfBoundsProtein(String),
    /// A genomic position has no mapping in the transcript's coordinates.
    #[display("no mapping onto transcript: {0}")]
    NoMapping(String),
}

impl std::error::Error for Error {}

/// Facade tying the annotation engine to its two collaborators.
pub struct Annotator<G, S> {
    genes: G,
    seqs: S,
}

impl<G, S> Annotator<G, S>
where
    G: GeneProvider,
    S: SequenceProvider,
{
    pub fn new(genes: G, seqs: S) -> Self {
        Self { genes, seqs }
    }

    /// Compute consequence types for all genes around the variant.
    pub fn annotate(
        &self,
        variant: &Variant,
        overlaps_regulatory_region: bool,
    ) -> Result<Vec<ConsequenceType>, anyhow::Error> {
        let genes = self.genes.genes_by_region(
            &variant.chromosome,
            variant.start - csq::FLANK_5KB,
            variant.end + csq::FLANK_5KB,
        )?;
        csq::predict(variant, &genes, overlaps_regulatory_region)
    }

    /// Compute the HGVS descriptions of the variant on one transcript.
    pub fn hgvs(
        &self,
        variant: &Variant,
        transcript: &Transcript,
        gene_id: &str,
        normalize: bool,
    ) -> Result<Vec<String>, anyhow::Error> {
        hgvs::predict(variant, transcript, gene_id, normalize, &self.seqs)
    }
}


#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::fixtures;
    use super::*;
    use crate::provider::InMemoryGeneSet;

    #[test]
    fn error_display() {
        assert_eq!(
            format!("{}", Error::MalformedVariant(String::from("x"))),
            "malformed variant: x"
        );
        assert_eq!(
            format!("{}", Error::NoMapping(String::from("21:99"))),
            "no mapping onto transcript: 21:99"
        );
    }

    #[test]
    fn annotator_facade() -> Result<(), anyhow::Error> {
        let mut genes = InMemoryGeneSet::new();
        genes.push("1", fixtures::gene1());
        let annotator = Annotator::new(genes, fixtures::seqs1());

        let variant = Variant::new("1", 220, "G", "C");
        let records = annotator.annotate(&variant, false)?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].transcript_id, "TX1");

        let hgvs = annotator.hgvs(&variant, &fixtures::tx1(), "GENE1", true)?;
        assert_eq!(
            hgvs,
            vec![
                String::from("TX1(GENE1):c.10G>C"),
                String::from("P1:p.Asp4His"),
            ]
        );
        Ok(())
    }
}
