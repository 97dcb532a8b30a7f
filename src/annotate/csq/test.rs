use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;
use crate::annotate::consequence::Consequence::*;
use crate::annotate::fixtures;
use crate::model::{Exon, Gene, Strand, SvInsSeq, Transcript, Variant};

fn tx_record(variant: &Variant, gene: &Gene, tx_id: &str) -> Option<ConsequenceType> {
    predict(variant, std::slice::from_ref(gene), false)
        .unwrap()
        .into_iter()
        .find(|record| record.transcript_id == tx_id)
}

fn tx_terms(variant: &Variant, gene: &Gene, tx_id: &str) -> Vec<Consequence> {
    tx_record(variant, gene, tx_id)
        .map(|record| record.consequences)
        .unwrap_or_default()
}

#[rstest]
#[case(4999, None)]
#[case(5000, Some(UpstreamGeneVariant))]
#[case(7999, Some(UpstreamGeneVariant))]
#[case(8000, Some(TwoKbUpstreamGeneVariant))]
#[case(9999, Some(TwoKbUpstreamGeneVariant))]
#[case(11001, Some(TwoKbDownstreamGeneVariant))]
#[case(13000, Some(TwoKbDownstreamGeneVariant))]
#[case(13001, Some(DownstreamGeneVariant))]
#[case(16000, Some(DownstreamGeneVariant))]
#[case(16001, None)]
fn flanking_bands_plus(#[case] position: i32, #[case] expected: Option<Consequence>) {
    let gene = fixtures::far_gene(Strand::Plus);
    let variant = Variant::new("9", position, "A", "G");
    let records = predict(&variant, std::slice::from_ref(&gene), false).unwrap();
    let record = records.iter().find(|record| record.transcript_id == "TXF");
    match expected {
        Some(term) => assert_eq!(record.unwrap().consequences, vec![term]),
        None => assert!(record.is_none()),
    }
    // A flanking variant still overlaps no transcript.
    assert!(records
        .iter()
        .any(|record| record.consequences == vec![IntergenicVariant]));
}

#[rstest]
#[case(8000, TwoKbDownstreamGeneVariant)]
#[case(7000, DownstreamGeneVariant)]
#[case(12000, TwoKbUpstreamGeneVariant)]
#[case(14000, UpstreamGeneVariant)]
fn flanking_bands_minus_swap_tags(#[case] position: i32, #[case] expected: Consequence) {
    let gene = fixtures::far_gene(Strand::Minus);
    let variant = Variant::new("9", position, "A", "G");
    assert_eq!(tx_terms(&variant, &gene, "TXF"), vec![expected]);
}

#[rstest]
#[case(241, vec![SpliceDonorVariant])]
#[case(242, vec![SpliceDonorVariant])]
#[case(243, vec![SpliceRegionVariant, IntronVariant])]
#[case(248, vec![SpliceRegionVariant, IntronVariant])]
#[case(249, vec![IntronVariant])]
#[case(265, vec![IntronVariant])]
#[case(282, vec![IntronVariant])]
#[case(283, vec![SpliceRegionVariant, IntronVariant])]
#[case(288, vec![SpliceRegionVariant, IntronVariant])]
#[case(289, vec![SpliceAcceptorVariant])]
#[case(290, vec![SpliceAcceptorVariant])]
fn splice_bands_snv(#[case] position: i32, #[case] expected: Vec<Consequence>) {
    let variant = Variant::new("1", position, "C", "A");
    assert_eq!(tx_terms(&variant, &fixtures::gene1(), "TX1"), expected);
}

#[rstest]
#[case(238, "G", "C", vec![MissenseVariant, SpliceRegionVariant])]
#[case(291, "T", "G", vec![MissenseVariant, SpliceRegionVariant])]
fn splice_region_within_exon(
    #[case] position: i32,
    #[case] reference: &str,
    #[case] alternate: &str,
    #[case] expected: Vec<Consequence>,
) {
    let variant = Variant::new("1", position, reference, alternate);
    assert_eq!(tx_terms(&variant, &fixtures::gene1(), "TX1"), expected);
}

#[rstest]
#[case(220, "G", "C", vec![MissenseVariant])]
#[case(219, "C", "T", vec![SynonymousVariant])]
#[case(226, "C", "T", vec![StopGained])]
#[case(318, "T", "C", vec![StopLost])]
#[case(319, "A", "G", vec![StopRetainedVariant])]
#[case(211, "A", "G", vec![StartLost])]
#[case(212, "T", "G", vec![StartLost])]
#[case(205, "A", "G", vec![FivePrimeUtrVariant])]
#[case(325, "A", "G", vec![ThreePrimeUtrVariant])]
fn coding_snvs(
    #[case] position: i32,
    #[case] reference: &str,
    #[case] alternate: &str,
    #[case] expected: Vec<Consequence>,
) {
    let variant = Variant::new("1", position, reference, alternate);
    assert_eq!(tx_terms(&variant, &fixtures::gene1(), "TX1"), expected);
}

#[test]
fn snv_record_fields() {
    let variant = Variant::new("1", 220, "G", "C");
    let record = tx_record(&variant, &fixtures::gene1(), "TX1").unwrap();
    assert_eq!(record.gene_id, "GENE1");
    assert_eq!(record.gene_name, "ONE");
    assert_eq!(record.strand, Some(Strand::Plus));
    assert_eq!(record.biotype, "protein_coding");
    assert_eq!(record.cdna_position, Some(20));
    assert_eq!(record.exon_number, Some(1));
    assert_eq!(record.annotation_flags, vec![String::from("basic")]);

    let variant = Variant::new("1", 318, "T", "C");
    let record = tx_record(&variant, &fixtures::gene1(), "TX1").unwrap();
    assert_eq!(record.cdna_position, Some(68));
    assert_eq!(record.exon_number, Some(2));
}

#[rstest]
#[case(138, "C", "T", vec![MissenseVariant])]
#[case(170, "C", "A", vec![SpliceDonorVariant])]
#[case(141, "C", "A", vec![SpliceAcceptorVariant])]
#[case(168, "T", "G", vec![SpliceRegionVariant, IntronVariant])]
#[case(198, "A", "C", vec![FivePrimeUtrVariant])]
#[case(115, "G", "A", vec![ThreePrimeUtrVariant])]
fn minus_strand_snvs(
    #[case] position: i32,
    #[case] reference: &str,
    #[case] alternate: &str,
    #[case] expected: Vec<Consequence>,
) {
    let variant = Variant::new("2", position, reference, alternate);
    assert_eq!(tx_terms(&variant, &fixtures::gene2(), "TX2"), expected);
}

#[rstest]
#[case("CAG", vec![InframeInsertion])]
#[case("CA", vec![FrameshiftVariant])]
fn insertion_frame(#[case] alternate: &str, #[case] expected: Vec<Consequence>) {
    let variant = Variant::new("1", 220, "", alternate);
    assert_eq!(tx_terms(&variant, &fixtures::gene1(), "TX1"), expected);
}

#[test]
fn insertion_length_decides_frame() {
    for len in 1..=6usize {
        let variant = Variant::new("1", 220, "", &"A".repeat(len));
        let terms = tx_terms(&variant, &fixtures::gene1(), "TX1");
        assert_eq!(terms.contains(&InframeInsertion), len % 3 == 0);
        assert_eq!(terms.contains(&FrameshiftVariant), len % 3 != 0);
    }
}

#[test]
fn insertion_creating_stop() {
    let variant = Variant::new("1", 235, "", "TAA");
    assert_eq!(
        tx_terms(&variant, &fixtures::gene1(), "TX1"),
        vec![StopGained, InframeInsertion]
    );
}

#[test]
fn insertion_at_junction_boundary_is_splice_region() {
    let variant = Variant::new("1", 241, "", "CAG");
    assert_eq!(
        tx_terms(&variant, &fixtures::gene1(), "TX1"),
        vec![InframeInsertion, SpliceRegionVariant]
    );
}

#[test]
fn insertion_at_coding_start() {
    let variant = Variant::new("1", 212, "", "A");
    assert_eq!(
        tx_terms(&variant, &fixtures::gene1(), "TX1"),
        vec![FrameshiftVariant, StartLost]
    );
}

#[test]
fn symbolic_insertion_with_payload() {
    let mut variant = Variant::new("1", 220, "", "<INS>");
    variant.sv_ins_seq = Some(SvInsSeq {
        left: Some(String::from("CAG")),
        right: None,
    });
    assert_eq!(
        tx_terms(&variant, &fixtures::gene1(), "TX1"),
        vec![CodingSequenceVariant]
    );
}

#[test]
fn symbolic_insertion_without_payload_skips_transcript() {
    let variant = Variant::new("1", 220, "", "<INS>");
    let records = predict(&variant, &[fixtures::gene1()], false).unwrap();
    assert!(records.iter().all(|record| record.transcript_id != "TX1"));
}

#[rstest]
#[case(220, "GAC", vec![InframeDeletion])]
#[case(220, "GA", vec![FrameshiftVariant])]
fn deletion_frame(#[case] position: i32, #[case] reference: &str, #[case] expected: Vec<Consequence>) {
    let variant = Variant::new("1", position, reference, "");
    assert_eq!(tx_terms(&variant, &fixtures::gene1(), "TX1"), expected);
}

#[test]
fn deletion_overlapping_stop_codon() {
    // cDNA 67-69: last base of codon 19 plus the first two stop bases.
    let variant = Variant::new("1", 317, "GTA", "");
    assert_eq!(
        tx_terms(&variant, &fixtures::gene1(), "TX1"),
        vec![StopLost, InframeDeletion]
    );
}

#[test]
fn deletion_into_three_prime_utr_is_utr_only() {
    let variant = Variant::new("1", 318, "TAAC", "");
    assert_eq!(
        tx_terms(&variant, &fixtures::gene1(), "TX1"),
        vec![ThreePrimeUtrVariant]
    );
}

#[test]
fn deletion_from_five_prime_utr_is_utr_only() {
    let contig = fixtures::contig1();
    let variant = Variant::new("1", 208, &contig[207..214], "");
    assert_eq!(
        tx_terms(&variant, &fixtures::gene1(), "TX1"),
        vec![FivePrimeUtrVariant]
    );
}

#[test]
fn deletion_covering_exon() {
    let contig = fixtures::contig1();
    let variant = Variant::new("1", 195, &contig[194..245], "");
    assert_eq!(
        tx_terms(&variant, &fixtures::gene1(), "TX1"),
        vec![
            ExonLossVariant,
            SpliceDonorVariant,
            SpliceRegionVariant,
            FivePrimeUtrVariant,
            IntronVariant,
        ]
    );
}

#[test]
fn deletion_covering_transcript() {
    let contig = fixtures::contig1();
    let variant = Variant::new("1", 100, &contig[99..400], "");
    assert_eq!(
        tx_terms(&variant, &fixtures::gene1(), "TX1"),
        vec![TranscriptAblation]
    );
}

#[test]
fn incomplete_terminal_codon() {
    let variant = Variant::new("3", 561, "G", "A");
    assert_eq!(
        tx_terms(&variant, &fixtures::gene4(), "TX4"),
        vec![IncompleteTerminalCodonVariant, CodingSequenceVariant]
    );
}

#[test]
fn non_coding_transcript_exon() {
    let variant = Variant::new("1", 150, "C", "T");
    assert_eq!(
        tx_terms(&variant, &fixtures::gene3(), "TX3"),
        vec![NonCodingTranscriptExonVariant, NonCodingTranscriptVariant]
    );
}

#[test]
fn mnv_in_coding_region() {
    let variant = Variant::new("1", 220, "GA", "TT");
    assert_eq!(
        tx_terms(&variant, &fixtures::gene1(), "TX1"),
        vec![CodingSequenceVariant]
    );
}

#[test]
fn intergenic_without_genes() {
    let variant = Variant::new("8", 1_000_000, "A", "G");
    let records = predict(&variant, &[], false).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].consequences, vec![IntergenicVariant]);
    assert_eq!(records[0].strand, None);
}

#[test]
fn regulatory_region_marker() {
    let variant = Variant::new("1", 220, "G", "C");
    let records = predict(&variant, &[fixtures::gene1()], true).unwrap();
    assert_eq!(
        records.last().unwrap().consequences,
        vec![RegulatoryRegionVariant]
    );
    assert!(records.iter().any(|record| record.transcript_id == "TX1"));
}

#[test]
fn malformed_allele_characters() {
    let variant = Variant::new("1", 220, "G", "!");
    assert!(predict(&variant, &[fixtures::gene1()], false).is_err());
}

#[test]
fn one_nucleotide_intron_clamps_bands() {
    let tx = Transcript {
        id: String::from("TXN"),
        biotype: String::from("lincRNA"),
        strand: Strand::Plus,
        start: 1000,
        end: 1020,
        exons: vec![
            Exon {
                start: 1000,
                end: 1009,
                phase: -1,
                number: 1,
                ..Default::default()
            },
            Exon {
                start: 1011,
                end: 1020,
                phase: -1,
                number: 2,
                ..Default::default()
            },
        ],
        ..Default::default()
    };
    let gene = Gene {
        id: String::from("GENEN"),
        name: String::from("N"),
        transcripts: vec![tx],
    };
    let variant = Variant::new("5", 1010, "A", "G");
    assert_eq!(
        tx_terms(&variant, &gene, "TXN"),
        vec![
            SpliceAcceptorVariant,
            SpliceDonorVariant,
            NonCodingTranscriptVariant,
        ]
    );
}

#[test]
fn term_sets_have_no_duplicates() {
    let contig = fixtures::contig1();
    let variants = vec![
        Variant::new("1", 220, "G", "C"),
        Variant::new("1", 243, "C", "A"),
        Variant::new("1", 235, "", "TAA"),
        Variant::new("1", 195, &contig[194..245], ""),
        Variant::new("1", 318, "TAAC", ""),
    ];
    for variant in &variants {
        for record in predict(variant, &[fixtures::gene1()], false).unwrap() {
            assert!(record
                .consequences
                .windows(2)
                .all(|pair| pair[0] < pair[1]));
        }
    }
}

#[test]
fn synonymous_never_joined_by_severe_terms() {
    let variant = Variant::new("1", 219, "C", "T");
    let terms = tx_terms(&variant, &fixtures::gene1(), "TX1");
    assert!(terms.contains(&SynonymousVariant));
    for term in [
        StopGained,
        StopLost,
        FrameshiftVariant,
        SpliceRegionVariant,
        IntronVariant,
        FivePrimeUtrVariant,
        ThreePrimeUtrVariant,
    ] {
        assert!(!terms.contains(&term));
    }
}
