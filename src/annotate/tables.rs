//! Static lookup tables: genetic codes, base complement, amino acid names.

use once_cell::sync::Lazy;

/// Lookup table for translating codons to amino acids.
///
/// Indexed by 6-bit codon encoding with A=0, C=1, G=2, T/U=3 and
/// index = first*16 + second*4 + third.
pub struct CodonTable {
    table: [u8; 64],
}

fn base_index(base: u8) -> Option<usize> {
    match base {
        b'A' | b'a' => Some(0),
        b'C' | b'c' => Some(1),
        b'G' | b'g' => Some(2),
        b'T' | b't' | b'U' | b'u' => Some(3),
        _ => None,
    }
}

impl CodonTable {
    /// Standard genetic code (NCBI translation table 1).
    fn standard() -> Self {
        #[rustfmt::skip]
        let table: [u8; 64] = [
            b'K', b'N', b'K', b'N',  // AA*
            b'T', b'T', b'T', b'T',  // AC*
            b'R', b'S', b'R', b'S',  // AG*
            b'I', b'I', b'M', b'I',  // AT*
            b'Q', b'H', b'Q', b'H',  // CA*
            b'P', b'P', b'P', b'P',  // CC*
            b'R', b'R', b'R', b'R',  // CG*
            b'L', b'L', b'L', b'L',  // CT*
            b'E', b'D', b'E', b'D',  // GA*
            b'A', b'A', b'A', b'A',  // GC*
            b'G', b'G', b'G', b'G',  // GG*
            b'V', b'V', b'V', b'V',  // GT*
            b'*', b'Y', b'*', b'Y',  // TA*
            b'S', b'S', b'S', b'S',  // TC*
            b'*', b'C', b'W', b'C',  // TG*
            b'L', b'F', b'L', b'F',  // TT*
        ];
        Self { table }
    }

    /// Vertebrate mitochondrial code (NCBI translation table 2):
    /// TGA→W, AGA→*, AGG→*, ATA→M.
    fn mitochondrial() -> Self {
        let mut table = Self::standard().table;
        table[3 * 16 + 2 * 4] = b'W';
        table[2 * 4] = b'*';
        table[2 * 4 + 2] = b'*';
        table[3 * 4] = b'M';
        Self { table }
    }

    /// Translate a codon to an amino acid; `None` for codons containing
    /// characters outside `ACGTU` (ambiguity codes are not resolved).
    pub fn translate(&self, codon: &str) -> Option<char> {
        let codon = codon.as_bytes();
        if codon.len() != 3 {
            return None;
        }
        let (a, b, c) = (
            base_index(codon[0])?,
            base_index(codon[1])?,
            base_index(codon[2])?,
        );
        Some(self.table[a * 16 + b * 4 + c] as char)
    }

    /// Whether the codon is a stop codon under this code.
    pub fn is_stop(&self, codon: &str) -> bool {
        self.translate(codon) == Some('*')
    }
}

static STANDARD: Lazy<CodonTable> = Lazy::new(CodonTable::standard);
static MITOCHONDRIAL: Lazy<CodonTable> = Lazy::new(CodonTable::mitochondrial);

/// The genetic code to use for the given chromosome context.
pub fn codon_table(mitochondrial: bool) -> &'static CodonTable {
    if mitochondrial {
        &MITOCHONDRIAL
    } else {
        &STANDARD
    }
}

/// Three-letter amino acid abbreviation (`Ter` for the stop signal).
pub fn aa_abbreviation(aa: char) -> Option<&'static str> {
    match aa.to_ascii_uppercase() {
        'A' => Some("Ala"),
        'C' => Some("Cys"),
        'D' => Some("Asp"),
        'E' => Some("Glu"),
        'F' => Some("Phe"),
        'G' => Some("Gly"),
        'H' => Some("His"),
        'I' => Some("Ile"),
        'K' => Some("Lys"),
        'L' => Some("Leu"),
        'M' => Some("Met"),
        'N' => Some("Asn"),
        'P' => Some("Pro"),
        'Q' => Some("Gln"),
        'R' => Some("Arg"),
        'S' => Some("Ser"),
        'T' => Some("Thr"),
        'V' => Some("Val"),
        'W' => Some("Trp"),
        'Y' => Some("Tyr"),
        '*' => Some("Ter"),
        _ => None,
    }
}

/// Complementary nucleotide; characters outside `ACGTN` map to `N`.
pub fn complement(base: char) -> char {
    match base {
        'A' => 'T',
        'C' => 'G',
        'G' => 'C',
        'T' => 'A',
        'a' => 't',
        'c' => 'g',
        'g' => 'c',
        't' => 'a',
        _ => 'N',
    }
}

/// Reverse complement of a nucleotide sequence.
pub fn reverse_complement(sequence: &str) -> String {
    sequence.chars().rev().map(complement).collect()
}
