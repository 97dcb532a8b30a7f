//! Sequence Ontology consequence terms and per-transcript result records.

use parse_display::{Display, FromStr};
use strum::IntoEnumIterator;

use crate::model::Strand;

/// Putative impact level.
#[derive(
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Clone,
    Copy,
    Display,
    FromStr,
    serde::Deserialize,
    serde::Serialize,
    strum::EnumIter,
)]
#[display(style = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum PutativeImpact {
    High,
    Moderate,
    Low,
    Modifier,
}

/// Sequence Ontology consequence term.
///
/// Variants are ordered by putative impact so that sorting a term set puts
/// the most severe consequence first.
#[derive(
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Clone,
    Copy,
    Display,
    FromStr,
    serde::Deserialize,
    serde::Serialize,
    strum::EnumIter,
)]
#[display(style = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Consequence {
    // high impact
    ExonLossVariant,
    FrameshiftVariant,
    SpliceAcceptorVariant,
    SpliceDonorVariant,
    StartLost,
    StopGained,
    StopLost,
    TranscriptAblation,
    // moderate impact
    InframeDeletion,
    InframeInsertion,
    MissenseVariant,
    SpliceRegionVariant,
    // low impact
    IncompleteTerminalCodonVariant,
    StopRetainedVariant,
    SynonymousVariant,
    // modifier
    #[display("3_prime_UTR_variant")]
    #[serde(rename = "3_prime_UTR_variant")]
    ThreePrimeUtrVariant,
    #[display("5_prime_UTR_variant")]
    #[serde(rename = "5_prime_UTR_variant")]
    FivePrimeUtrVariant,
    CodingSequenceVariant,
    DownstreamGeneVariant,
    IntergenicVariant,
    IntronVariant,
    NonCodingTranscriptExonVariant,
    NonCodingTranscriptVariant,
    RegulatoryRegionVariant,
    #[display("2KB_downstream_gene_variant")]
    #[serde(rename = "2KB_downstream_gene_variant")]
    TwoKbDownstreamGeneVariant,
    #[display("2KB_upstream_gene_variant")]
    #[serde(rename = "2KB_upstream_gene_variant")]
    TwoKbUpstreamGeneVariant,
    UpstreamGeneVariant,
}

impl From<Consequence> for PutativeImpact {
    fn from(val: Consequence) -> Self {
        match val {
            Consequence::ExonLossVariant
            | Consequence::FrameshiftVariant
            | Consequence::SpliceAcceptorVariant
            | Consequence::SpliceDonorVariant
            | Consequence::StartLost
            | Consequence::StopGained
            | Consequence::StopLost
            | Consequence::TranscriptAblation => PutativeImpact::High,
            Consequence::InframeDeletion
            | Consequence::InframeInsertion
            | Consequence::MissenseVariant
            | Consequence::SpliceRegionVariant => PutativeImpact::Moderate,
            Consequence::IncompleteTerminalCodonVariant
            | Consequence::StopRetainedVariant
            | Consequence::SynonymousVariant => PutativeImpact::Low,
            Consequence::ThreePrimeUtrVariant
            | Consequence::FivePrimeUtrVariant
            | Consequence::CodingSequenceVariant
            | Consequence::DownstreamGeneVariant
            | Consequence::IntergenicVariant
            | Consequence::IntronVariant
            | Consequence::NonCodingTranscriptExonVariant
            | Consequence::NonCodingTranscriptVariant
            | Consequence::RegulatoryRegionVariant
            | Consequence::TwoKbDownstreamGeneVariant
            | Consequence::TwoKbUpstreamGeneVariant
            | Consequence::UpstreamGeneVariant => PutativeImpact::Modifier,
        }
    }
}

impl Consequence {
    /// Return vector of all values of `Consequence`.
    pub fn all() -> Vec<Self> {
        Self::iter().collect()
    }

    pub fn impact(&self) -> PutativeImpact {
        PutativeImpact::from(*self)
    }
}

/// Per-transcript consequence annotation result.
///
/// The intergenic and regulatory-region markers use the same record with
/// empty gene/transcript fields and no strand.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct ConsequenceType {
    /// Gene display name.
    pub gene_name: String,
    /// Stable gene identifier.
    pub gene_id: String,
    /// Transcript identifier.
    pub transcript_id: String,
    /// Strand of the transcript.
    pub strand: Option<Strand>,
    /// Transcript biotype.
    pub biotype: String,
    /// cDNA position of the variant within the transcript, if exonic.
    pub cdna_position: Option<i32>,
    /// 1-based exon ordinal overlapped by the variant, if any.
    pub exon_number: Option<u32>,
    /// Informational transcript annotation tags.
    pub annotation_flags: Vec<String>,
    /// Consequence terms, sorted by severity, without duplicates.
    pub consequences: Vec<Consequence>,
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn consequence_display() {
        assert_eq!(
            format!("{}", Consequence::SpliceDonorVariant),
            "splice_donor_variant"
        );
        assert_eq!(
            format!("{}", Consequence::FivePrimeUtrVariant),
            "5_prime_UTR_variant"
        );
        assert_eq!(
            format!("{}", Consequence::ThreePrimeUtrVariant),
            "3_prime_UTR_variant"
        );
        assert_eq!(
            format!("{}", Consequence::TwoKbUpstreamGeneVariant),
            "2KB_upstream_gene_variant"
        );
        assert_eq!(
            format!("{}", Consequence::TwoKbDownstreamGeneVariant),
            "2KB_downstream_gene_variant"
        );
        assert_eq!(
            format!("{}", Consequence::IncompleteTerminalCodonVariant),
            "incomplete_terminal_codon_variant"
        );
    }

    #[test]
    fn consequence_from_str() -> Result<(), anyhow::Error> {
        assert_eq!(
            Consequence::from_str("missense_variant")?,
            Consequence::MissenseVariant
        );
        assert_eq!(
            Consequence::from_str("5_prime_UTR_variant")?,
            Consequence::FivePrimeUtrVariant
        );
        assert_eq!(
            Consequence::from_str("2KB_upstream_gene_variant")?,
            Consequence::TwoKbUpstreamGeneVariant
        );
        Ok(())
    }

    #[test]
    fn consequence_to_impact() {
        assert_eq!(Consequence::StopGained.impact(), PutativeImpact::High);
        assert_eq!(
            Consequence::MissenseVariant.impact(),
            PutativeImpact::Moderate
        );
        assert_eq!(Consequence::SynonymousVariant.impact(), PutativeImpact::Low);
        assert_eq!(
            Consequence::UpstreamGeneVariant.impact(),
            PutativeImpact::Modifier
        );
    }

    #[test]
    fn ordering_puts_most_severe_first() {
        let mut terms = vec![
            Consequence::IntronVariant,
            Consequence::SpliceDonorVariant,
            Consequence::SpliceRegionVariant,
        ];
        terms.sort();
        assert_eq!(terms[0], Consequence::SpliceDonorVariant);
    }

    #[test]
    fn all_has_every_term() {
        assert_eq!(Consequence::all().len(), 27);
    }

    #[test]
    fn consequence_type_serde_roundtrip() -> Result<(), anyhow::Error> {
        let record = ConsequenceType {
            gene_name: String::from("ONE"),
            gene_id: String::from("GENE1"),
            transcript_id: String::from("TX1"),
            strand: Some(Strand::Plus),
            biotype: String::from("protein_coding"),
            cdna_position: Some(20),
            exon_number: Some(1),
            annotation_flags: vec![String::from("basic")],
            consequences: vec![
                Consequence::MissenseVariant,
                Consequence::TwoKbUpstreamGeneVariant,
            ],
        };
        let json = serde_json::to_string(&record)?;
        assert!(json.contains("\"missense_variant\""));
        assert!(json.contains("\"2KB_upstream_gene_variant\""));
        assert_eq!(serde_json::from_str::<ConsequenceType>(&json)?, record);
        Ok(())
    }
}
