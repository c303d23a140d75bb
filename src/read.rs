use std::str::FromStr;

use crate::EvaluatorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strand {
    #[default]
    Forward,
    Reverse,
}

impl FromStr for Strand {
    type Err = EvaluatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" | "forward" => Ok(Strand::Forward),
            "-" | "reverse" => Ok(Strand::Reverse),
            other => Err(EvaluatorError::InvalidStrand(other.to_string())),
        }
    }
}

pub fn complement(base: u8) -> Result<u8, EvaluatorError> {
    match base {
        b'A' => Ok(b'T'),
        b'C' => Ok(b'G'),
        b'G' => Ok(b'C'),
        b'T' => Ok(b'A'),
        other => Err(EvaluatorError::InvalidBase(other as char)),
    }
}

/// Reference bases just outside the aligned window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlankingContext {
    pub outer5: Vec<u8>,
    pub outer3: Vec<u8>,
}

impl FlankingContext {
    pub fn new(outer5: &[u8], outer3: &[u8]) -> Self {
        Self {
            outer5: outer5.to_vec(),
            outer3: outer3.to_vec(),
        }
    }

    /// Base `offset` positions before the window, counting back from 1.
    pub fn upstream(&self, offset: usize) -> Option<u8> {
        self.outer5
            .len()
            .checked_sub(offset)
            .and_then(|i| self.outer5.get(i).copied())
    }

    /// Base at `offset` positions past the window, 0-based.
    pub fn downstream(&self, offset: usize) -> Option<u8> {
        self.outer3.get(offset).copied()
    }
}

/// Where a read came from and how long it was before correction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadInfo {
    pub name: String,
    pub read_length: usize,
    pub strand: Strand,
    pub start: i64,
    pub end: i64,
    pub ref_seq_index: usize,
    pub flanks: FlankingContext,
}

impl ReadInfo {
    pub fn new(name: &str, read_length: usize) -> Self {
        Self {
            name: name.to_string(),
            read_length,
            strand: Strand::Forward,
            start: 1,
            end: read_length as i64,
            ref_seq_index: 0,
            flanks: FlankingContext::default(),
        }
    }

    pub fn with_strand(mut self, strand: Strand) -> Self {
        self.strand = strand;
        self
    }

    pub fn with_span(mut self, start: i64, end: i64) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn with_ref_seq_index(mut self, ref_seq_index: usize) -> Self {
        self.ref_seq_index = ref_seq_index;
        self
    }

    pub fn with_flanks(mut self, flanks: FlankingContext) -> Self {
        self.flanks = flanks;
        self
    }

    /// Genome coordinate of 1-based read position `pos`.
    pub fn genome_position(&self, pos: usize) -> i64 {
        match self.strand {
            Strand::Forward => self.start + pos as i64 - 1,
            Strand::Reverse => self.end - pos as i64 + 1,
        }
    }

    /// Base as seen on the genome's forward strand.
    pub fn genome_base(&self, base: u8) -> Result<u8, EvaluatorError> {
        match self.strand {
            Strand::Forward => Ok(base),
            Strand::Reverse => complement(base),
        }
    }
}
