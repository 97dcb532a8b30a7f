//! Codon engine: simulate the effect of substitutions, insertions and
//! deletions on the codons of a coding transcript.
//!
//! All arithmetic happens in CDS/cDNA space on the spliced transcript
//! sequence; strand handling is confined to the coordinate mapper, to
//! transcript-orienting the alleles at the call boundary, and to the
//! beyond-transcript sequence fetch for deletions.

use crate::annotate::consequence::Consequence;
use crate::annotate::mapper;
use crate::annotate::tables;
use crate::model::{Strand, Transcript};
use crate::provider::SequenceProvider;

/// Reference and modified codon with their translations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodonChange {
    pub reference_codon: String,
    pub modified_codon: String,
    /// `None` when the codon cannot be translated (ambiguity codes).
    pub reference_aa: Option<char>,
    pub modified_aa: Option<char>,
}

fn codon_cdna_start(tx: &Transcript, cds_position: i32) -> Option<i32> {
    let phase = (cds_position - 1) % 3;
    let start = mapper::cdna_coding_start(tx) + cds_position - 1 - phase;
    (start >= 1 && start + 2 <= tx.cdna_len()).then_some(start)
}

fn cdna_slice(tx: &Transcript, start: i32, len: i32) -> &str {
    &tx.cdna_sequence[(start - 1) as usize..(start - 1 + len) as usize]
}

/// Reference/modified codon for a single-nucleotide substitution.
///
/// `alternate` must be transcript-oriented.  `None` when the containing codon
/// is incomplete within the transcript sequence.
pub fn substitution(
    tx: &Transcript,
    cds_position: i32,
    alternate: char,
    mitochondrial: bool,
) -> Option<CodonChange> {
    let codon_start = codon_cdna_start(tx, cds_position)?;
    let phase = (cds_position - 1) % 3;
    let reference_codon = cdna_slice(tx, codon_start, 3).to_string();
    let mut modified: Vec<char> = reference_codon.chars().collect();
    modified[phase as usize] = alternate;
    let modified_codon: String = modified.into_iter().collect();
    let table = tables::codon_table(mitochondrial);
    Some(CodonChange {
        reference_aa: table.translate(&reference_codon),
        modified_aa: table.translate(&modified_codon),
        reference_codon,
        modified_codon,
    })
}

/// Codons produced by pasting inserted sequence into the reading frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertionScan {
    /// The unmodified codon at the paste position.
    pub reference_codon: String,
    /// Modified codons, codon by codon, until the inserted sequence is
    /// consumed; the final codon is completed from the original sequence.
    pub modified_codons: Vec<String>,
}

/// Simulate an insertion whose first inserted base lands at `cds_position`.
///
/// `alternate` must be transcript-oriented and non-empty.  `None` when the
/// codon at the paste position is incomplete within the transcript sequence.
pub fn insertion_scan(tx: &Transcript, cds_position: i32, alternate: &str) -> Option<InsertionScan> {
    let codon_start = codon_cdna_start(tx, cds_position)?;
    let phase = ((cds_position - 1) % 3) as usize;
    let reference_codon = cdna_slice(tx, codon_start, 3).to_string();

    // Modified region: kept codon prefix, the insertion, then the original
    // sequence continuing at the paste position.
    let paste_cdna = codon_start + phase as i32;
    let mut region = String::with_capacity(phase + alternate.len() + 3);
    region.push_str(&reference_codon[..phase]);
    region.push_str(alternate);
    region.push_str(&tx.cdna_sequence[(paste_cdna - 1) as usize..]);

    let n_codons = (phase + alternate.len()).div_ceil(3);
    let modified_codons = (0..n_codons)
        .map(|idx| region.get(idx * 3..idx * 3 + 3).map(str::to_string))
        .collect::<Option<Vec<_>>>()?;

    Some(InsertionScan {
        reference_codon,
        modified_codons,
    })
}

/// Codon formed by joining the two flanks of a deletion that starts at
/// `cds_start` and removes `deleted_len` bases.
///
/// When the nucleotides following the deleted run lie past the end of the
/// recorded transcript sequence, they are fetched from the genome: plus
/// strand at `transcript.end + offset`, minus strand at
/// `transcript.start - offset` with complementation.  Without a sequence
/// provider such cases resolve to `Ok(None)`.
pub fn deletion_joined_codon(
    tx: &Transcript,
    chromosome: &str,
    cds_start: i32,
    deleted_len: i32,
    seqs: Option<&dyn SequenceProvider>,
    mitochondrial: bool,
) -> Result<Option<CodonChange>, anyhow::Error> {
    let codon_start = match codon_cdna_start(tx, cds_start) {
        Some(value) => value,
        None => return Ok(None),
    };
    let phase = (cds_start - 1) % 3;
    let reference_codon = cdna_slice(tx, codon_start, 3).to_string();

    let mut joined = cdna_slice(tx, codon_start, phase).to_string();
    let next_cdna = mapper::cdna_coding_start(tx) + cds_start - 1 + deleted_len;
    let needed = 3 - phase;
    for idx in 0..needed {
        let position = next_cdna + idx;
        if position <= tx.cdna_len() {
            joined.push_str(cdna_slice(tx, position, 1));
        } else {
            let count = needed - idx;
            let overrun = position - tx.cdna_len();
            let Some(seqs) = seqs else {
                tracing::debug!(
                    "no sequence provider to complete codon past the end of {}",
                    tx.id
                );
                return Ok(None);
            };
            let fetched = match tx.strand {
                Strand::Plus => seqs.genomic_sequence(
                    chromosome,
                    tx.end + overrun,
                    tx.end + overrun + count - 1,
                )?,
                Strand::Minus => tables::reverse_complement(&seqs.genomic_sequence(
                    chromosome,
                    tx.start - overrun - count + 1,
                    tx.start - overrun,
                )?),
            };
            joined.push_str(&fetched);
            break;
        }
    }

    let table = tables::codon_table(mitochondrial);
    Ok(Some(CodonChange {
        reference_aa: table.translate(&reference_codon),
        modified_aa: table.translate(&joined),
        reference_codon,
        modified_codon: joined,
    }))
}

/// Record the consequence of a codon modification on stop codons.
pub fn decide_stop_codon_modification(
    terms: &mut Vec<Consequence>,
    reference_codon: &str,
    modified_codon: &str,
    mitochondrial: bool,
) {
    let table = tables::codon_table(mitochondrial);
    if table.is_stop(reference_codon) {
        if table.is_stop(modified_codon) {
            terms.push(Consequence::StopRetainedVariant);
        } else {
            terms.push(Consequence::StopLost);
        }
    } else if table.is_stop(modified_codon) {
        terms.push(Consequence::StopGained);
    }
}
