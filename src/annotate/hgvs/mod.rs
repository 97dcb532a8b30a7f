//! HGVS nomenclature for variants on a transcript.
//!
//! Two stages per (variant, transcript) pair: normalization shifts indels to
//! their most 3' representation against the flanking genomic sequence, then
//! the cDNA-level and (for coding transcripts) protein-level descriptions are
//! assembled from [`BuildingComponents`].

mod dna;
mod protein;

use crate::annotate::csq::validate_alleles;
use crate::annotate::mapper::CdnaCoord;
use crate::model::{Transcript, Variant, VariantKind};
use crate::provider::SequenceProvider;

/// Window of flanking genomic sequence fetched for indel justification.
pub const NEIGHBOURING_SEQUENCE_SIZE: i32 = 100;
/// Alleles longer than this are rendered as their length.
const MAX_ALLELE_LENGTH: usize = 4;

/// Coding status of the described transcript.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum MutationKind {
    #[default]
    Coding,
    NonCoding,
}

/// Mutation tag of the cDNA-level description.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum MutationType {
    #[default]
    Substitution,
    Deletion,
    Duplication,
    Insertion,
    Delins,
}

/// Shape of the protein-level description.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum ProteinChange {
    /// `p.Arg281Ter` and plain missense changes.
    #[default]
    Substitution,
    Frameshift,
    Deletion,
    Duplication,
    Insertion,
    Delins,
}

/// Intermediate state of one HGVS calculation; created fresh per call and
/// never shared across variants or transcripts.
#[derive(Debug, Default)]
struct BuildingComponents {
    kind: MutationKind,
    mutation_type: MutationType,
    cdna_start: CdnaCoord,
    cdna_end: CdnaCoord,
    /// Reference allele in transcript orientation.
    reference: String,
    /// Alternate allele in transcript orientation.
    alternate: String,
    transcript_id: String,
    gene_id: String,
    protein_id: String,
    protein_change: ProteinChange,
    protein_start: i32,
    protein_end: i32,
    /// Three-letter name of the residue at `protein_start`.
    protein_reference_start: String,
    /// Three-letter name of the residue at `protein_end`.
    protein_reference_end: String,
    /// Three-letter names of the alternate residues (or `Ter`).
    protein_alternate: String,
}

impl BuildingComponents {
    fn new(transcript: &Transcript, gene_id: &str) -> Self {
        Self {
            kind: if transcript.is_coding() {
                MutationKind::Coding
            } else {
                MutationKind::NonCoding
            },
            transcript_id: transcript.id.clone(),
            gene_id: gene_id.to_string(),
            protein_id: transcript.protein_id.clone(),
            ..Default::default()
        }
    }
}

/// Render an allele, eliding long ones to their length.
fn elide_allele(allele: &str) -> String {
    if allele.len() > MAX_ALLELE_LENGTH {
        allele.len().to_string()
    } else {
        allele.to_string()
    }
}

fn format_cdna_coords(components: &BuildingComponents) -> String {
    if components.cdna_start == components.cdna_end {
        format!("{}", components.cdna_start)
    } else {
        format!("{}_{}", components.cdna_start, components.cdna_end)
    }
}

fn format_dna_allele(components: &BuildingComponents) -> String {
    match components.mutation_type {
        MutationType::Substitution => {
            format!("{}>{}", components.reference, components.alternate)
        }
        MutationType::Deletion => format!("del{}", elide_allele(&components.reference)),
        MutationType::Duplication => format!("dup{}", elide_allele(&components.alternate)),
        MutationType::Insertion => format!("ins{}", elide_allele(&components.alternate)),
        MutationType::Delins => format!("delins{}", components.alternate),
    }
}

/// Generate the transcript-level HGVS string.
fn format_transcript_string(components: &BuildingComponents) -> String {
    format!(
        "{}({}):{}.{}{}",
        components.transcript_id,
        components.gene_id,
        match components.kind {
            MutationKind::Coding => "c",
            MutationKind::NonCoding => "n",
        },
        format_cdna_coords(components),
        format_dna_allele(components),
    )
}

/// Generate the protein-level HGVS string.
fn format_protein_string(components: &BuildingComponents) -> String {
    let pid = &components.protein_id;
    let (start, end) = (components.protein_start, components.protein_end);
    let (ref_start, ref_end) = (
        &components.protein_reference_start,
        &components.protein_reference_end,
    );
    match components.protein_change {
        ProteinChange::Substitution => format!(
            "{}:p.{}{}{}",
            pid, ref_start, start, components.protein_alternate
        ),
        ProteinChange::Frameshift => format!("{}:p.{}{}fs", pid, ref_start, start),
        ProteinChange::Deletion if start == end => format!("{}:p.{}{}del", pid, ref_start, start),
        ProteinChange::Deletion => {
            format!("{}:p.{}{}_{}{}del", pid, ref_start, start, ref_end, end)
        }
        ProteinChange::Duplication if start == end => {
            format!("{}:p.{}{}dup", pid, ref_start, start)
        }
        ProteinChange::Duplication => {
            format!("{}:p.{}{}_{}{}dup", pid, ref_start, start, ref_end, end)
        }
        ProteinChange::Insertion => format!(
            "{}:p.{}{}_{}{}ins{}",
            pid, ref_start, start, ref_end, end, components.protein_alternate
        ),
        ProteinChange::Delins => format!(
            "{}:p.{}{}delins{}",
            pid, ref_start, start, components.protein_alternate
        ),
    }
}

/// Compute the HGVS descriptions of `variant` on `transcript`.
///
/// Returns the transcript-level description, followed by the protein-level
/// one when the variant lies entirely within the coding sequence of a coding
/// transcript.  Out-of-bounds protein coordinates and unmappable positions
/// degrade to the transcript-level result alone; malformed symbolic variants
/// fail the call.
pub fn predict(
    variant: &Variant,
    transcript: &Transcript,
    gene_id: &str,
    normalize: bool,
    seqs: &dyn SequenceProvider,
) -> Result<Vec<String>, anyhow::Error> {
    validate_alleles(variant)?;

    match variant.kind() {
        VariantKind::Snv => dna::snv(variant, transcript, gene_id),
        VariantKind::Insertion | VariantKind::Symbolic => {
            dna::insertion(variant, transcript, gene_id, normalize, seqs)
        }
        VariantKind::Deletion => dna::deletion(variant, transcript, gene_id, normalize, seqs),
        VariantKind::Mnv => dna::delins(variant, transcript, gene_id),
    }
}
