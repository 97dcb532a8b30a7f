//! Coding-region classification for deletions.

use crate::annotate::codon;
use crate::annotate::consequence::Consequence;
use crate::annotate::mapper;
use crate::model::Strand;

use super::TranscriptScratch;

pub(super) fn solve_coding(
    scratch: &mut TranscriptScratch<'_>,
    cdna5: Option<i32>,
    cdna3: Option<i32>,
) {
    let tx = scratch.tx;
    let coding_start = mapper::cdna_coding_start(tx);
    // Ends without a cDNA mapping lie in an intron and extend the affected
    // range past the exon edge.
    let d5 = cdna5.unwrap_or(i32::MIN);
    let d3 = cdna3.unwrap_or(i32::MAX);

    if d5 <= coding_start + 1 && d3 >= coding_start && !tx.unconfirmed_start {
        scratch.terms.push(Consequence::StartLost);
    }

    let final_nt_phase = (tx.cdna_coding_end - coding_start) % 3;
    let relevant_end = match tx.strand {
        Strand::Plus => cdna5,
        Strand::Minus => cdna3,
    };
    if let Some(position) = relevant_end {
        if position >= tx.cdna_coding_end - final_nt_phase && final_nt_phase != 2 {
            scratch
                .terms
                .push(Consequence::IncompleteTerminalCodonVariant);
        }
    }

    match scratch.variant.length() {
        Some(len) if len % 3 == 0 => scratch.terms.push(Consequence::InframeDeletion),
        Some(_) => scratch.terms.push(Consequence::FrameshiftVariant),
        None => scratch.terms.push(Consequence::CodingSequenceVariant),
    }

    // Deletions reaching into the terminal codon remove the stop unless the
    // joined flanks happen to recreate one.
    if d5 <= tx.cdna_coding_end && d3 >= tx.cdna_coding_end - 2 {
        let retained = cdna5
            .and_then(|c5| mapper::cdna_to_cds(tx, c5))
            .and_then(|cds| {
                codon::deletion_joined_codon(
                    tx,
                    &scratch.variant.chromosome,
                    cds,
                    scratch.variant.reference.len() as i32,
                    None,
                    scratch.mitochondrial,
                )
                .ok()
                .flatten()
            })
            .map(|change| change.modified_aa == Some('*'))
            .unwrap_or(false);
        scratch.terms.push(if retained {
            Consequence::StopRetainedVariant
        } else {
            Consequence::StopLost
        });
    }
}
