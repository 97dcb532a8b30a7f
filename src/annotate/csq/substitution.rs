//! Coding-region classification for substitutions (SNV and MNV).

use crate::annotate::codon;
use crate::annotate::consequence::Consequence;
use crate::annotate::mapper;
use crate::annotate::tables;
use crate::model::Strand;

use super::TranscriptScratch;

pub(super) fn solve_coding_snv(scratch: &mut TranscriptScratch<'_>, cdna5: Option<i32>) {
    let tx = scratch.tx;
    let Some(position) = cdna5 else {
        scratch.terms.push(Consequence::CodingSequenceVariant);
        return;
    };
    let coding_start = mapper::cdna_coding_start(tx);
    if position < coding_start + 2 && !tx.unconfirmed_start {
        scratch.terms.push(Consequence::StartLost);
        return;
    }
    let final_nt_phase = (tx.cdna_coding_end - coding_start) % 3;
    if position >= tx.cdna_coding_end - final_nt_phase && final_nt_phase != 2 {
        scratch
            .terms
            .push(Consequence::IncompleteTerminalCodonVariant);
    }

    let alternate = match tx.strand {
        Strand::Plus => scratch.variant.alternate.chars().next(),
        Strand::Minus => scratch
            .variant
            .alternate
            .chars()
            .next()
            .map(tables::complement),
    };
    let change = mapper::cdna_to_cds(tx, position)
        .zip(alternate)
        .and_then(|(cds, alt)| codon::substitution(tx, cds, alt, scratch.mitochondrial));
    let term = match change {
        Some(change) => match (change.reference_aa, change.modified_aa) {
            (Some('*'), Some('*')) => Consequence::StopRetainedVariant,
            (Some('*'), Some(_)) => Consequence::StopLost,
            (Some(_), Some('*')) => Consequence::StopGained,
            (Some(reference), Some(modified)) if reference == modified => {
                Consequence::SynonymousVariant
            }
            (Some(_), Some(_)) => Consequence::MissenseVariant,
            _ => Consequence::CodingSequenceVariant,
        },
        None => Consequence::CodingSequenceVariant,
    };
    scratch.terms.push(term);
}

pub(super) fn solve_coding_mnv(
    scratch: &mut TranscriptScratch<'_>,
    cdna5: Option<i32>,
    cdna3: Option<i32>,
) {
    let tx = scratch.tx;
    let coding_start = mapper::cdna_coding_start(tx);
    let touches_start = cdna5.unwrap_or(i32::MIN) <= coding_start + 1
        && cdna3.unwrap_or(i32::MAX) >= coding_start;
    if touches_start && !tx.unconfirmed_start {
        scratch.terms.push(Consequence::StartLost);
    }
    scratch.terms.push(Consequence::CodingSequenceVariant);
}
