use log::debug;
use thiserror::Error;

pub mod alignment_mode;
pub mod annotation;
pub mod classifier;
pub mod config;
pub mod identity;
pub mod matrix;
pub mod read;
pub mod scoring;
pub mod traceback;

pub use crate::alignment_mode::{AlignmentMode, AlignmentParams};
pub use crate::annotation::{AnnotationDecoder, ErrorAnnotations, Substitution};
pub use crate::classifier::Classifier;
pub use crate::config::EvaluationConfig;
pub use crate::identity::{first_alignment, percent_identity, PercentIdentity};
pub use crate::matrix::{build_matrices, DpMatrices, Layer};
pub use crate::read::{FlankingContext, ReadInfo, Strand};
pub use crate::scoring::{
    select_best, AuditCase, BestResult, CandidateSelector, ClassificationResult, ErrorRecord,
    EvaluationSummary, NotEvaluated, OutcomeCounts, PositionHistogram, ReadEvaluation,
};
pub use crate::traceback::{enumerate_candidates, CandidateAlignment, Enumeration, Traceback};

/// Sentinel for unreachable DP cells.
pub const SMALL_NUMBER: i32 = -1_000_000;
pub const MIN_OVERLAP: usize = 30;
pub const DEFAULT_MAX_CANDIDATES: usize = 1000;
pub const DEFAULT_MAX_READ_LENGTH: usize = 1000;

// DNA scoring parameters, gain form
pub const DNA_MATCH: i32 = 1;
pub const DNA_MISMATCH: i32 = -1;
pub const DNA_GAP_OPEN: i32 = -5;
pub const DNA_GAP_EXT: i32 = -1;

#[derive(Debug, Error)]
pub enum EvaluatorError {
    #[error("Empty sequence: {0}")]
    EmptySequence(&'static str),
    #[error("Invalid base: {0:?}")]
    InvalidBase(char),
    #[error("Invalid strand: {0}")]
    InvalidStrand(String),
    #[error("Read end not found in alignment of {0}")]
    ReadEndNotFound(String),
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreParams {
    pub match_score: i32,
    pub mismatch: i32,
    pub gap_open: i32,
    pub gap_ext: i32,
}

impl Default for ScoreParams {
    fn default() -> Self {
        Self {
            match_score: DNA_MATCH,
            mismatch: DNA_MISMATCH,
            gap_open: DNA_GAP_OPEN,
            gap_ext: DNA_GAP_EXT,
        }
    }
}

/// Scores corrected reads against their error-free reference.
pub struct Evaluator {
    params: AlignmentParams,
    config: EvaluationConfig,
    decoder: AnnotationDecoder,
}

impl Evaluator {
    pub fn new(config: EvaluationConfig) -> Result<Self, EvaluatorError> {
        Ok(Self {
            params: AlignmentParams::default(),
            config,
            decoder: AnnotationDecoder::new()?,
        })
    }

    pub fn with_score_params(mut self, score: ScoreParams) -> Self {
        self.params.score = score;
        self
    }

    pub fn with_alignment_mode(mut self, mode: AlignmentMode) -> Self {
        self.params.mode = mode;
        self
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    pub fn decode(&self, substitutions: &str, insertions: &str, deletions: &str) -> ErrorAnnotations {
        self.decoder.decode(substitutions, insertions, deletions)
    }

    /// Aligns `candidate` to `reference`, classifies every co-optimal
    /// alignment and keeps the best one.
    pub fn evaluate(
        &self,
        reference: &[u8],
        candidate: &[u8],
        read: &ReadInfo,
        annotations: &ErrorAnnotations,
    ) -> Result<ReadEvaluation, EvaluatorError> {
        let enumeration = self.candidates(reference, candidate)?;
        if enumeration.too_many_candidates {
            debug!("{}: not evaluated, too many candidate alignments", read.name);
            return Ok(ReadEvaluation::NotEvaluated(not_evaluated(annotations)));
        }

        let classifier = Classifier::new(&self.params, &self.config, annotations, read);
        let mut selector = CandidateSelector::new();
        for alignment in enumeration.candidates {
            let result = classifier.classify(&alignment)?;
            selector.offer(result, alignment);
        }
        debug!("{}: {} candidate alignments classified", read.name, selector.offered());

        Ok(match selector.into_best() {
            Some(best) => ReadEvaluation::Classified(best),
            None => ReadEvaluation::NotEvaluated(not_evaluated(annotations)),
        })
    }

    /// Co-optimal alignments of `candidate` against `reference`. The DP
    /// matrices are dropped before this returns.
    pub fn candidates(&self, reference: &[u8], candidate: &[u8]) -> Result<Enumeration, EvaluatorError> {
        let matrices = build_matrices(reference, candidate, &self.params)?;
        Ok(enumerate_candidates(
            &matrices,
            self.config.min_overlap,
            self.config.max_candidates,
        ))
    }

    pub fn percent_identity(
        &self,
        reference: &[u8],
        candidate: &[u8],
        flanks: &FlankingContext,
    ) -> Result<PercentIdentity, EvaluatorError> {
        let matrices = build_matrices(reference, candidate, &self.params)?;
        Ok(percent_identity(&matrices, flanks, self.config.min_overlap))
    }

    /// One co-optimal alignment, or `None` when no path has enough overlap.
    pub fn random_alignment(
        &self,
        reference: &[u8],
        candidate: &[u8],
    ) -> Result<Option<CandidateAlignment>, EvaluatorError> {
        let matrices = build_matrices(reference, candidate, &self.params)?;
        Ok(first_alignment(&matrices, self.config.min_overlap))
    }
}

fn not_evaluated(annotations: &ErrorAnnotations) -> NotEvaluated {
    NotEvaluated {
        substitutions: annotations.substitution_count(),
        inserted_bases: annotations.inserted_bases(),
        deletions: annotations.deletion_count(),
    }
}
