//! Collaborator traits for gene model and genome sequence access.
//!
//! The annotation engine is a pure function of its inputs; everything that
//! has to be looked up externally goes through these two traits.  Lookups are
//! synchronous and may block; callers that need throughput should batch
//! requests per region rather than per nucleotide.

use crate::common::regions_overlap;
use crate::model::Gene;

/// Gene model lookup by genomic region.
pub trait GeneProvider {
    /// Return the genes overlapping `[start, end]` (1-based inclusive) on
    /// `chromosome`, with transcripts and exons fully populated.
    fn genes_by_region(
        &self,
        chromosome: &str,
        start: i32,
        end: i32,
    ) -> Result<Vec<Gene>, anyhow::Error>;
}

/// Raw genomic sequence lookup, plus-strand orientation.
pub trait SequenceProvider {
    /// Return the sequence of `[start, end]` (1-based inclusive) on
    /// `chromosome`; the full region must be available.
    fn genomic_sequence(
        &self,
        chromosome: &str,
        start: i32,
        end: i32,
    ) -> Result<String, anyhow::Error>;
}

/// In-memory gene set, for tests and callers that already hold the records.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGeneSet {
    genes: Vec<(String, Gene)>,
}

impl InMemoryGeneSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a gene on the given chromosome.
    pub fn push(&mut self, chromosome: &str, gene: Gene) {
        self.genes.push((chromosome.to_string(), gene));
    }
}

impl GeneProvider for InMemoryGeneSet {
    fn genes_by_region(
        &self,
        chromosome: &str,
        start: i32,
        end: i32,
    ) -> Result<Vec<Gene>, anyhow::Error> {
        Ok(self
            .genes
            .iter()
            .filter(|(chrom, gene)| {
                chrom == chromosome
                    && gene.transcripts.iter().any(|transcript| {
                        regions_overlap(transcript.start, transcript.end, start, end)
                    })
            })
            .map(|(_, gene)| gene.clone())
            .collect())
    }
}

/// In-memory contig slice, for tests and small working sets.
///
/// Holds the sequence of `[offset, offset + len - 1]` on one chromosome and
/// serves exact sub-regions of it.
#[derive(Debug, Clone)]
pub struct InMemorySequence {
    chromosome: String,
    offset: i32,
    sequence: String,
}

impl InMemorySequence {
    /// Construct from a sequence starting at position 1.
    pub fn new(chromosome: &str, sequence: &str) -> Self {
        Self::with_offset(chromosome, 1, sequence)
    }

    /// Construct from a sequence starting at the given 1-based position.
    pub fn with_offset(chromosome: &str, offset: i32, sequence: &str) -> Self {
        Self {
            chromosome: chromosome.to_string(),
            offset,
            sequence: sequence.to_string(),
        }
    }
}

impl SequenceProvider for InMemorySequence {
    fn genomic_sequence(
        &self,
        chromosome: &str,
        start: i32,
        end: i32,
    ) -> Result<String, anyhow::Error> {
        let held_end = self.offset + self.sequence.len() as i32 - 1;
        if chromosome != self.chromosome || start < self.offset || end > held_end || start > end {
            anyhow::bail!(
                "sequence {}:{}-{} not available (holding {}:{}-{})",
                chromosome,
                start,
                end,
                self.chromosome,
                self.offset,
                held_end
            );
        }
        let lo = (start - self.offset) as usize;
        let hi = (end - self.offset + 1) as usize;
        Ok(self.sequence[lo..hi].to_string())
    }
}
