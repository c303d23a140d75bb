use std::fmt;
use std::ops::AddAssign;

use crate::traceback::CandidateAlignment;

/// How one kind of error fared in a corrected read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeCounts {
    pub newly_introduced: usize,   // error-free base the tool broke
    pub unaffected_correct: usize, // error-free base left alone
    pub corrected: usize,
    pub wrongly_recoded: usize,    // changed, but not back to the reference
    pub untouched: usize,
    pub trimmed: usize,
}

impl AddAssign for OutcomeCounts {
    fn add_assign(&mut self, other: Self) {
        self.newly_introduced += other.newly_introduced;
        self.unaffected_correct += other.unaffected_correct;
        self.corrected += other.corrected;
        self.wrongly_recoded += other.wrongly_recoded;
        self.untouched += other.untouched;
        self.trimmed += other.trimmed;
    }
}

/// Counts indexed by 1-based read position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionHistogram {
    counts: Vec<u32>,
}

impl PositionHistogram {
    pub fn new(max_read_length: usize) -> Self {
        Self {
            counts: vec![0; max_read_length + 1],
        }
    }

    /// Positions past the configured read length are not recorded.
    pub fn record(&mut self, position: usize) {
        if let Some(count) = self.counts.get_mut(position) {
            *count += 1;
        }
    }

    pub fn get(&self, position: usize) -> u32 {
        self.counts.get(position).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| u64::from(c)).sum()
    }

    pub fn merge(&mut self, other: &PositionHistogram) {
        if self.counts.len() < other.counts.len() {
            self.counts.resize(other.counts.len(), 0);
        }
        for (count, &add) in self.counts.iter_mut().zip(&other.counts) {
            *count += add;
        }
    }
}

/// Code path that produced an audit record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditCase {
    TrimmedFivePrime,
    TrimmedThreePrime,
    FivePrimeGap,
    RestoredWithDeletion,
    Untouched,
    Corrected,
    WronglyRecoded,
    PastReadEnd,
}

impl fmt::Display for AuditCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            AuditCase::TrimmedFivePrime => "TRIM5",
            AuditCase::TrimmedThreePrime => "TRIM3",
            AuditCase::FivePrimeGap => "GAP5",
            AuditCase::RestoredWithDeletion => "RESTORED",
            AuditCase::Untouched => "KEPT",
            AuditCase::Corrected => "FIXED",
            AuditCase::WronglyRecoded => "RECODED",
            AuditCase::PastReadEnd => "PAST_END",
        };
        f.write_str(tag)
    }
}

/// One annotated substitution as seen on the genome's forward strand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    pub ref_seq_index: usize,
    pub genome_position: i64,
    pub original_base: u8,
    pub error_base: u8,
    pub corrected: bool,
    pub case: AuditCase,
    pub read_name: String,
    pub read_start: i64,
    pub read_end: i64,
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {} {} {} {}",
            self.ref_seq_index,
            self.genome_position,
            self.original_base as char,
            self.error_base as char,
            if self.corrected { 'Y' } else { 'N' },
            self.case,
            self.read_name,
            self.read_start,
            self.read_end
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationResult {
    pub substitution: OutcomeCounts,
    pub insertion: OutcomeCounts,
    pub deletion: OutcomeCounts,
    pub substitution_to_deletion: usize,
    /// Rewards corrections and penalizes new errors.
    pub total_score: i32,
    /// Penalizes newly introduced errors only.
    pub new_error_score: i32,
    pub deletions_5_prime: usize,
    pub deletions_3_prime: usize,
    pub records: Vec<ErrorRecord>,
    pub raw_positions: PositionHistogram,
    pub corrected_positions: PositionHistogram,
}

impl ClassificationResult {
    pub fn new(max_read_length: usize) -> Self {
        Self {
            substitution: OutcomeCounts::default(),
            insertion: OutcomeCounts::default(),
            deletion: OutcomeCounts::default(),
            substitution_to_deletion: 0,
            total_score: 0,
            new_error_score: 0,
            deletions_5_prime: 0,
            deletions_3_prime: 0,
            records: Vec::new(),
            raw_positions: PositionHistogram::new(max_read_length),
            corrected_positions: PositionHistogram::new(max_read_length),
        }
    }

    pub fn end_trim(&self) -> usize {
        self.deletions_5_prime + self.deletions_3_prime
    }

    /// Whether `self` should replace `best` as the reported alignment.
    pub fn outranks(&self, best: &ClassificationResult) -> bool {
        if self.total_score < best.total_score {
            return false;
        }
        self.new_error_score > best.new_error_score
            || (self.new_error_score == best.new_error_score && self.end_trim() > best.end_trim())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestResult {
    pub result: ClassificationResult,
    pub alignment: CandidateAlignment,
}

/// Ground-truth totals reported when a read could not be classified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotEvaluated {
    pub substitutions: usize,
    pub inserted_bases: usize,
    pub deletions: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadEvaluation {
    Classified(BestResult),
    NotEvaluated(NotEvaluated),
}

impl AddAssign for NotEvaluated {
    fn add_assign(&mut self, other: Self) {
        self.substitutions += other.substitutions;
        self.inserted_bases += other.inserted_bases;
        self.deletions += other.deletions;
    }
}

/// Running totals over every evaluated read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationSummary {
    pub reads: usize,
    pub substitution: OutcomeCounts,
    pub insertion: OutcomeCounts,
    pub deletion: OutcomeCounts,
    pub substitution_to_deletion: usize,
    pub not_evaluated_reads: usize,
    pub not_evaluated: NotEvaluated,
    pub raw_positions: PositionHistogram,
    pub corrected_positions: PositionHistogram,
}

impl EvaluationSummary {
    pub fn new(max_read_length: usize) -> Self {
        Self {
            reads: 0,
            substitution: OutcomeCounts::default(),
            insertion: OutcomeCounts::default(),
            deletion: OutcomeCounts::default(),
            substitution_to_deletion: 0,
            not_evaluated_reads: 0,
            not_evaluated: NotEvaluated::default(),
            raw_positions: PositionHistogram::new(max_read_length),
            corrected_positions: PositionHistogram::new(max_read_length),
        }
    }

    pub fn add(&mut self, evaluation: &ReadEvaluation) {
        self.reads += 1;
        match evaluation {
            ReadEvaluation::Classified(best) => {
                let result = &best.result;
                self.substitution += result.substitution;
                self.insertion += result.insertion;
                self.deletion += result.deletion;
                self.substitution_to_deletion += result.substitution_to_deletion;
                self.raw_positions.merge(&result.raw_positions);
                self.corrected_positions.merge(&result.corrected_positions);
            }
            ReadEvaluation::NotEvaluated(counts) => {
                self.not_evaluated_reads += 1;
                self.not_evaluated += *counts;
            }
        }
    }
}

/// Keeps the best-ranked classification seen so far.
#[derive(Debug, Default)]
pub struct CandidateSelector {
    best: Option<BestResult>,
    offered: usize,
}

impl CandidateSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offer(&mut self, result: ClassificationResult, alignment: CandidateAlignment) {
        self.offered += 1;
        let replace = match &self.best {
            Some(best) => result.outranks(&best.result),
            None => true,
        };
        if replace {
            self.best = Some(BestResult { result, alignment });
        }
    }

    pub fn offered(&self) -> usize {
        self.offered
    }

    pub fn into_best(self) -> Option<BestResult> {
        self.best
    }
}

pub fn select_best<I>(candidates: I) -> Option<BestResult>
where
    I: IntoIterator<Item = (ClassificationResult, CandidateAlignment)>,
{
    let mut selector = CandidateSelector::new();
    for (result, alignment) in candidates {
        selector.offer(result, alignment);
    }
    selector.into_best()
}
