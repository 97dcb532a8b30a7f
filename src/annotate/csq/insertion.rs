//! Coding-region classification for insertions, including symbolic
//! insertions with out-of-band side sequences.

use crate::annotate::codon;
use crate::annotate::consequence::Consequence;
use crate::annotate::mapper;
use crate::annotate::tables;
use crate::annotate::Error;
use crate::model::{Strand, Variant};

use super::TranscriptScratch;

pub(super) fn solve_coding(
    scratch: &mut TranscriptScratch<'_>,
    cdna5: Option<i32>,
    cdna3: Option<i32>,
) -> Result<(), Error> {
    let tx = scratch.tx;
    let Some(c5) = cdna5 else {
        scratch.terms.push(Consequence::CodingSequenceVariant);
        return Ok(());
    };
    let c3 = cdna3.unwrap_or(c5 + 1);

    let coding_start = mapper::cdna_coding_start(tx);
    if c5 < coding_start + 2 && !tx.unconfirmed_start {
        scratch.terms.push(Consequence::StartLost);
    }
    let final_nt_phase = (tx.cdna_coding_end - coding_start) % 3;
    // An insertion into the last, incomplete codon of a transcript without a
    // stop codon; `final_nt_phase == 2` means the CDS is a multiple of three.
    let relevant_end = match tx.strand {
        Strand::Plus => c5,
        Strand::Minus => c3,
    };
    if relevant_end >= tx.cdna_coding_end - final_nt_phase && final_nt_phase != 2 {
        scratch
            .terms
            .push(Consequence::IncompleteTerminalCodonVariant);
    }

    // Symbolic insertions may carry an incomplete alternate of unknown length.
    match scratch.variant.length() {
        Some(len) if len % 3 == 0 => scratch.terms.push(Consequence::InframeInsertion),
        Some(_) => scratch.terms.push(Consequence::FrameshiftVariant),
        None => scratch.terms.push(Consequence::CodingSequenceVariant),
    }

    // Every codon generated by the inserted sequence is checked against the
    // codon at the paste position for stop creation or loss.
    let alternate = oriented_alternate(scratch.variant, tx.strand)?;
    if let Some(cds) = mapper::cdna_to_cds(tx, c3) {
        if let Some(scan) = codon::insertion_scan(tx, cds, &alternate) {
            for modified in &scan.modified_codons {
                codon::decide_stop_codon_modification(
                    &mut scratch.terms,
                    &scan.reference_codon,
                    modified,
                    scratch.mitochondrial,
                );
            }
        }
    }

    Ok(())
}

/// The inserted sequence in transcript orientation.
///
/// Symbolic alternates resolve through the side-sequence payload: the left
/// side for plus-strand transcripts, the right side reverse-complemented for
/// minus-strand ones.  A missing payload is a malformed variant.
pub(crate) fn oriented_alternate(variant: &Variant, strand: Strand) -> Result<String, Error> {
    if variant.alternate.starts_with('<') {
        let side = variant.sv_ins_seq.as_ref().and_then(|sv| match strand {
            Strand::Plus => sv.left.as_ref(),
            Strand::Minus => sv.right.as_ref(),
        });
        match side {
            Some(sequence) => Ok(match strand {
                Strand::Plus => sequence.clone(),
                Strand::Minus => tables::reverse_complement(sequence),
            }),
            None => Err(Error::MalformedVariant(format!(
                "insertion with {} alternate and no side insertion sequence",
                variant.alternate
            ))),
        }
    } else {
        Ok(match strand {
            Strand::Plus => variant.alternate.clone(),
            Strand::Minus => tables::reverse_complement(&variant.alternate),
        })
    }
}
