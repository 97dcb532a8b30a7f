//! Protein-level HGVS descriptions.

use crate::annotate::codon;
use crate::annotate::hgvs::{format_protein_string, BuildingComponents, ProteinChange};
use crate::annotate::mapper;
use crate::annotate::tables;
use crate::annotate::Error;
use crate::common::is_mitochondrial;
use crate::model::{Strand, Transcript, Variant};
use crate::provider::SequenceProvider;

/// The region lies entirely within the CDS and does not span an exon
/// boundary; variants crossing junctions or UTRs get no protein description.
fn only_spans_coding(tx: &Transcript, genomic_start: i32, genomic_end: i32) -> bool {
    genomic_start >= tx.genomic_coding_start
        && genomic_end <= tx.genomic_coding_end
        && tx
            .exons
            .iter()
            .any(|exon| genomic_start >= exon.start && genomic_end <= exon.end)
}

fn abbreviation(aa: char) -> Option<String> {
    tables::aa_abbreviation(aa).map(String::from)
}

fn abbreviations(aas: &[char]) -> Option<String> {
    aas.iter().map(|&aa| tables::aa_abbreviation(aa)).collect()
}

fn warn_out_of_bounds(tx: &Transcript, start: i32, end: i32) {
    tracing::warn!(
        "{}",
        Error::OutOfBoundsProtein(format!(
            "{}: {}-{}, protein length {}",
            tx.protein_id,
            start,
            end,
            tx.protein_sequence.len()
        ))
    );
}

pub(super) fn snv(
    variant: &Variant,
    tx: &Transcript,
    components: &mut BuildingComponents,
) -> Option<String> {
    if !tx.is_coding() || !only_spans_coding(tx, variant.start, variant.end) {
        return None;
    }
    let (cdna, offset) = mapper::genomic_to_cdna(tx, variant.start)?;
    if offset != 0 || cdna > tx.cdna_coding_end {
        return None;
    }
    let cds = mapper::cdna_to_cds(tx, cdna)?;
    let alternate = match tx.strand {
        Strand::Plus => variant.alternate.chars().next()?,
        Strand::Minus => tables::complement(variant.alternate.chars().next()?),
    };
    let change = codon::substitution(
        tx,
        cds,
        alternate,
        is_mitochondrial(&variant.chromosome),
    )?;
    match (change.reference_aa, change.modified_aa) {
        (Some('*'), _) => {
            tracing::warn!(
                "variant affects the stop codon of {}; no protein HGVS",
                tx.id
            );
            None
        }
        (Some(reference), Some(modified)) if reference == modified => {
            tracing::debug!("synonymous change on {}; no protein HGVS", tx.id);
            None
        }
        (Some(reference), Some(modified)) => {
            let position = mapper::amino_acid_position(cds);
            if position < 1 || position > tx.protein_sequence.len() as i32 {
                warn_out_of_bounds(tx, position, position);
                return None;
            }
            components.protein_change = ProteinChange::Substitution;
            components.protein_start = position;
            components.protein_end = position;
            components.protein_reference_start = abbreviation(reference)?;
            components.protein_alternate = abbreviation(modified)?;
            Some(format_protein_string(components))
        }
        _ => {
            tracing::debug!("untranslatable codon on {}; no protein HGVS", tx.id);
            None
        }
    }
}

/// Protein description of an insertion whose justified genomic anchor is
/// `anchor` (inserted bases go between `anchor - 1` and `anchor`);
/// `alternate` is the justified, transcript-oriented inserted sequence.
pub(super) fn insertion(
    variant: &Variant,
    tx: &Transcript,
    anchor: i32,
    alternate: &str,
    components: &mut BuildingComponents,
) -> Option<String> {
    if !tx.is_coding() || !only_spans_coding(tx, anchor - 1, anchor) {
        return None;
    }
    let paste_genomic = match tx.strand {
        Strand::Plus => anchor,
        Strand::Minus => anchor - 1,
    };
    let (cdna, offset) = mapper::genomic_to_cdna(tx, paste_genomic)?;
    if offset != 0 || cdna > tx.cdna_coding_end {
        return None;
    }
    let paste_cds = mapper::cdna_to_cds(tx, cdna)?;

    let protein: Vec<char> = tx.protein_sequence.chars().collect();
    let position = mapper::amino_acid_position(paste_cds);
    if position < 1 || position > protein.len() as i32 {
        warn_out_of_bounds(tx, position, position);
        return None;
    }

    if alternate.len() % 3 != 0 {
        components.protein_change = ProteinChange::Frameshift;
        components.protein_start = position;
        components.protein_reference_start = abbreviation(protein[(position - 1) as usize])?;
        return Some(format_protein_string(components));
    }

    let inserted_codons = alternate.len() / 3;
    let scan = codon::insertion_scan(tx, paste_cds, alternate)?;
    let table = tables::codon_table(is_mitochondrial(&variant.chromosome));
    let mut new_aas = scan
        .modified_codons
        .iter()
        .map(|codon| table.translate(codon))
        .collect::<Option<Vec<_>>>()?;

    // Past the scanned codons the modified sequence realigns with the
    // original, shifted by the inserted residues.
    let need = 2 * inserted_codons + 1;
    let old_aas: Vec<char> = protein[(position - 1) as usize..]
        .iter()
        .copied()
        .take(need)
        .collect();
    while new_aas.len() < need {
        let idx = new_aas.len() - inserted_codons;
        if idx < old_aas.len() {
            new_aas.push(old_aas[idx]);
        } else {
            break;
        }
    }

    // A created stop codon replaces the residue at its position.
    if let Some(stop_idx) = new_aas.iter().position(|&aa| aa == '*') {
        let stop_position = position + stop_idx as i32;
        if stop_position > protein.len() as i32 {
            warn_out_of_bounds(tx, stop_position, stop_position);
            return None;
        }
        components.protein_change = ProteinChange::Substitution;
        components.protein_start = stop_position;
        components.protein_end = stop_position;
        components.protein_reference_start = abbreviation(protein[(stop_position - 1) as usize])?;
        components.protein_alternate = String::from("Ter");
        return Some(format_protein_string(components));
    }

    let mut lead = 0;
    while lead < inserted_codons && lead < old_aas.len() && new_aas[lead] == old_aas[lead] {
        lead += 1;
    }
    if lead == inserted_codons {
        lead = 0;
    }
    let aligned = lead + inserted_codons < new_aas.len()
        && lead < old_aas.len()
        && new_aas[lead + inserted_codons] == old_aas[lead];

    if aligned {
        let mut inserted: Vec<char> = new_aas[lead..lead + inserted_codons].to_vec();
        // Justify 3' within the protein sequence.
        let mut insert_point = position - 1 + lead as i32;
        while (insert_point as usize) < protein.len()
            && protein[insert_point as usize] == inserted[0]
        {
            inserted.rotate_left(1);
            insert_point += 1;
        }
        let dup_from = insert_point - inserted_codons as i32;
        if dup_from >= 0 && protein[dup_from as usize..insert_point as usize] == inserted[..] {
            components.protein_change = ProteinChange::Duplication;
            components.protein_start = dup_from + 1;
            components.protein_end = insert_point;
            components.protein_reference_start = abbreviation(protein[dup_from as usize])?;
            components.protein_reference_end =
                abbreviation(protein[(insert_point - 1) as usize])?;
        } else {
            if insert_point < 1 || (insert_point as usize) >= protein.len() {
                warn_out_of_bounds(tx, insert_point, insert_point + 1);
                return None;
            }
            components.protein_change = ProteinChange::Insertion;
            components.protein_start = insert_point;
            components.protein_end = insert_point + 1;
            components.protein_reference_start =
                abbreviation(protein[(insert_point - 1) as usize])?;
            components.protein_reference_end = abbreviation(protein[insert_point as usize])?;
            components.protein_alternate = abbreviations(&inserted)?;
        }
    } else {
        // The residue at the paste position is rewritten as well.
        components.protein_change = ProteinChange::Delins;
        components.protein_start = position;
        components.protein_end = position;
        components.protein_reference_start = abbreviation(protein[(position - 1) as usize])?;
        components.protein_alternate = abbreviations(&new_aas[..=inserted_codons])?;
    }
    Some(format_protein_string(components))
}

/// Protein description of a deletion of `[genomic_start, genomic_end]`
/// (already justified at the transcript level).
pub(super) fn deletion(
    variant: &Variant,
    tx: &Transcript,
    genomic_start: i32,
    genomic_end: i32,
    seqs: &dyn SequenceProvider,
    components: &mut BuildingComponents,
) -> Option<String> {
    if !tx.is_coding() || !only_spans_coding(tx, genomic_start, genomic_end) {
        return None;
    }
    let (g5, g3) = match tx.strand {
        Strand::Plus => (genomic_start, genomic_end),
        Strand::Minus => (genomic_end, genomic_start),
    };
    let (cdna5, offset5) = mapper::genomic_to_cdna(tx, g5)?;
    let (cdna3, offset3) = mapper::genomic_to_cdna(tx, g3)?;
    if offset5 != 0 || offset3 != 0 || cdna3 > tx.cdna_coding_end {
        return None;
    }
    let cds5 = mapper::cdna_to_cds(tx, cdna5)?;
    let cds3 = mapper::cdna_to_cds(tx, cdna3)?;
    let mut aa_start = mapper::amino_acid_position(cds5);
    let mut aa_end = mapper::amino_acid_position(cds3);

    // Unconfirmed-start/-end transcripts can push the positions outside the
    // protein; degrade to the transcript-level description then.
    let protein: Vec<char> = tx.protein_sequence.chars().collect();
    if !(aa_start > 0 && (aa_end as usize) < protein.len()) {
        warn_out_of_bounds(tx, aa_start, aa_end);
        return None;
    }

    let deleted_len = genomic_end - genomic_start + 1;
    let mut reference: Vec<char>;
    if aa_start != aa_end {
        // The joined flanks form a new codon; when its residue matches one of
        // the range ends, that end is not part of the deleted run.
        let generated = codon::deletion_joined_codon(
            tx,
            &variant.chromosome,
            cds5,
            deleted_len,
            Some(seqs),
            is_mitochondrial(&variant.chromosome),
        )
        .ok()
        .flatten()
        .and_then(|change| change.modified_aa);
        if generated == Some(protein[(aa_start - 1) as usize]) {
            aa_start += 1;
        } else if generated == Some(protein[(aa_end - 1) as usize]) {
            aa_end -= 1;
        }
        reference = protein[(aa_start - 1) as usize..aa_end as usize].to_vec();
    } else {
        reference = vec![protein[(aa_start - 1) as usize]];
    }

    // Justify 3' within the protein sequence.
    while (aa_end as usize) < protein.len() && protein[aa_end as usize] == reference[0] {
        reference.rotate_left(1);
        aa_start += 1;
        aa_end += 1;
    }

    components.protein_start = aa_start;
    components.protein_end = aa_end;
    components.protein_reference_start = abbreviation(reference[0])?;
    components.protein_reference_end = abbreviation(*reference.last()?)?;
    components.protein_change = if deleted_len % 3 == 0 {
        ProteinChange::Deletion
    } else {
        ProteinChange::Frameshift
    };
    Some(format_protein_string(components))
}
