//! Transcript-level HGVS descriptions and indel justification.

use crate::annotate::hgvs::{
    format_transcript_string, protein, BuildingComponents, MutationType, NEIGHBOURING_SEQUENCE_SIZE,
};
use crate::annotate::mapper;
use crate::annotate::tables;
use crate::annotate::Error;
use crate::model::{Strand, Transcript, Variant};
use crate::provider::SequenceProvider;

/// The inserted sequence in plus-strand orientation; symbolic alternates
/// resolve through their side-sequence payload.
fn resolve_plus_alternate(variant: &Variant, strand: Strand) -> Result<String, Error> {
    if variant.alternate.starts_with('<') {
        let side = variant.sv_ins_seq.as_ref().and_then(|sv| match strand {
            Strand::Plus => sv.left.as_ref(),
            Strand::Minus => sv.right.as_ref(),
        });
        side.cloned().ok_or_else(|| {
            Error::MalformedVariant(format!(
                "insertion with {} alternate and no side insertion sequence",
                variant.alternate
            ))
        })
    } else {
        Ok(variant.alternate.clone())
    }
}

/// Shift an indel to the most 3' position along the transcript while the
/// shift preserves the resulting sequence.  `window` is plus-strand genomic
/// sequence starting at `window_start`; for insertions, `end` must be
/// `start - 1` (zero-width).
fn justify(
    start: &mut i32,
    end: &mut i32,
    allele: &mut Vec<u8>,
    window: &[u8],
    window_start: i32,
    strand: Strand,
) {
    if allele.is_empty() {
        return;
    }
    match strand {
        Strand::Plus => loop {
            let next_index = *end + 1 - window_start;
            if next_index < 0 {
                break;
            }
            match window.get(next_index as usize) {
                Some(&next) if next == allele[0] => {
                    allele.rotate_left(1);
                    *start += 1;
                    *end += 1;
                }
                _ => break,
            }
        },
        Strand::Minus => loop {
            let prev_index = *start - 1 - window_start;
            if prev_index < 0 {
                break;
            }
            match window.get(prev_index as usize) {
                Some(&prev) if prev == *allele.last().expect("allele is non-empty") => {
                    allele.rotate_right(1);
                    *start -= 1;
                    *end -= 1;
                }
                _ => break,
            }
        },
    }
}

/// Fill the cDNA coordinate range from a genomic interval; `false` when a
/// position has no mapping on the transcript.
fn set_range_coords(
    components: &mut BuildingComponents,
    tx: &Transcript,
    genomic_low: i32,
    genomic_high: i32,
) -> bool {
    let (g5, g3) = match tx.strand {
        Strand::Plus => (genomic_low, genomic_high),
        Strand::Minus => (genomic_high, genomic_low),
    };
    match (
        mapper::genomic_to_cdna_coord(tx, g5),
        mapper::genomic_to_cdna_coord(tx, g3),
    ) {
        (Some(cdna_start), Some(cdna_end)) => {
            components.cdna_start = cdna_start;
            components.cdna_end = cdna_end;
            true
        }
        _ => false,
    }
}

fn oriented(sequence: &str, strand: Strand) -> String {
    match strand {
        Strand::Plus => sequence.to_string(),
        Strand::Minus => tables::reverse_complement(sequence),
    }
}

pub(super) fn snv(
    variant: &Variant,
    tx: &Transcript,
    gene_id: &str,
) -> Result<Vec<String>, anyhow::Error> {
    let mut components = BuildingComponents::new(tx, gene_id);
    let Some(coord) = mapper::genomic_to_cdna_coord(tx, variant.start) else {
        tracing::debug!(
            "{}",
            Error::NoMapping(format!("{}:{} on {}", variant.chromosome, variant.start, tx.id))
        );
        return Ok(Vec::new());
    };
    components.cdna_start = coord;
    components.cdna_end = coord;
    components.mutation_type = MutationType::Substitution;
    components.reference = oriented(&variant.reference, tx.strand);
    components.alternate = oriented(&variant.alternate, tx.strand);

    let mut result = vec![format_transcript_string(&components)];
    if let Some(protein_hgvs) = protein::snv(variant, tx, &mut components) {
        result.push(protein_hgvs);
    }
    Ok(result)
}

pub(super) fn insertion(
    variant: &Variant,
    tx: &Transcript,
    gene_id: &str,
    normalize: bool,
    seqs: &dyn SequenceProvider,
) -> Result<Vec<String>, anyhow::Error> {
    let mut components = BuildingComponents::new(tx, gene_id);
    let plus_alternate = resolve_plus_alternate(variant, tx.strand)?;
    if plus_alternate.is_empty() {
        return Err(Error::MalformedVariant(String::from("empty insertion allele")).into());
    }

    let mut start = variant.start;
    let mut end = variant.start - 1;
    let mut allele = plus_alternate.into_bytes();
    let mut mutation = MutationType::Insertion;
    let mut duplicated: Option<(i32, i32)> = None;

    if normalize {
        let window_start = std::cmp::max(1, variant.start - NEIGHBOURING_SEQUENCE_SIZE);
        match seqs.genomic_sequence(
            &variant.chromosome,
            window_start,
            variant.start + NEIGHBOURING_SEQUENCE_SIZE,
        ) {
            Ok(window) => {
                let window = window.as_bytes();
                justify(&mut start, &mut end, &mut allele, window, window_start, tx.strand);
                // A duplication inserts a copy right after the original: the
                // inserted sequence equals its transcript-5' neighbourhood.
                let len = allele.len() as i32;
                let (low, high) = match tx.strand {
                    Strand::Plus => (start - len, start - 1),
                    Strand::Minus => (start, start + len - 1),
                };
                if low >= window_start && high < window_start + window.len() as i32 {
                    let slice =
                        &window[(low - window_start) as usize..=(high - window_start) as usize];
                    if slice == allele.as_slice() {
                        mutation = MutationType::Duplication;
                        duplicated = Some((low, high));
                    }
                }
            }
            Err(err) => {
                tracing::warn!(
                    "no flanking sequence around {}:{}, describing unjustified: {}",
                    variant.chromosome,
                    variant.start,
                    err
                );
            }
        }
    }

    let (genomic_low, genomic_high) = duplicated.unwrap_or((start - 1, start));
    if !set_range_coords(&mut components, tx, genomic_low, genomic_high) {
        tracing::debug!(
            "{}",
            Error::NoMapping(format!("{}:{} on {}", variant.chromosome, start, tx.id))
        );
        return Ok(Vec::new());
    }
    components.mutation_type = mutation;
    let allele = String::from_utf8(allele).expect("alleles are ASCII");
    components.alternate = oriented(&allele, tx.strand);

    let mut result = vec![format_transcript_string(&components)];
    let alternate = components.alternate.clone();
    if let Some(protein_hgvs) = protein::insertion(variant, tx, start, &alternate, &mut components)
    {
        result.push(protein_hgvs);
    }
    Ok(result)
}

pub(super) fn deletion(
    variant: &Variant,
    tx: &Transcript,
    gene_id: &str,
    normalize: bool,
    seqs: &dyn SequenceProvider,
) -> Result<Vec<String>, anyhow::Error> {
    let mut components = BuildingComponents::new(tx, gene_id);
    let mut start = variant.start;
    let mut end = variant.end;
    let mut allele = variant.reference.clone().into_bytes();

    if normalize {
        let window_start = std::cmp::max(1, variant.start - NEIGHBOURING_SEQUENCE_SIZE);
        match seqs.genomic_sequence(
            &variant.chromosome,
            window_start,
            variant.end + NEIGHBOURING_SEQUENCE_SIZE,
        ) {
            Ok(window) => {
                justify(
                    &mut start,
                    &mut end,
                    &mut allele,
                    window.as_bytes(),
                    window_start,
                    tx.strand,
                );
            }
            Err(err) => {
                tracing::warn!(
                    "no flanking sequence around {}:{}, describing unjustified: {}",
                    variant.chromosome,
                    variant.start,
                    err
                );
            }
        }
    }

    if !set_range_coords(&mut components, tx, start, end) {
        tracing::debug!(
            "{}",
            Error::NoMapping(format!("{}:{}-{} on {}", variant.chromosome, start, end, tx.id))
        );
        return Ok(Vec::new());
    }
    components.mutation_type = MutationType::Deletion;
    let allele = String::from_utf8(allele).expect("alleles are ASCII");
    components.reference = oriented(&allele, tx.strand);

    let mut result = vec![format_transcript_string(&components)];
    if let Some(protein_hgvs) =
        protein::deletion(variant, tx, start, end, seqs, &mut components)
    {
        result.push(protein_hgvs);
    }
    Ok(result)
}

pub(super) fn delins(
    variant: &Variant,
    tx: &Transcript,
    gene_id: &str,
) -> Result<Vec<String>, anyhow::Error> {
    let mut components = BuildingComponents::new(tx, gene_id);
    if !set_range_coords(&mut components, tx, variant.start, variant.end) {
        tracing::debug!(
            "{}",
            Error::NoMapping(format!(
                "{}:{}-{} on {}",
                variant.chromosome, variant.start, variant.end, tx.id
            ))
        );
        return Ok(Vec::new());
    }
    components.mutation_type = MutationType::Delins;
    components.reference = oriented(&variant.reference, tx.strand);
    components.alternate = oriented(&variant.alternate, tx.strand);
    tracing::debug!(
        "no protein-level description for block substitutions on {}",
        tx.id
    );
    Ok(vec![format_transcript_string(&components)])
}
