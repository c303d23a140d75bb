use crate::matrix::DpMatrices;
use crate::read::FlankingContext;
use crate::traceback::{CandidateAlignment, Traceback, GAP};

/// Identity over the aligned span of the first co-optimal alignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PercentIdentity {
    pub total: usize,
    pub matched: usize,
    pub alignment: Option<CandidateAlignment>,
}

impl PercentIdentity {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            100.0 * self.matched as f64 / self.total as f64
        }
    }
}

/// First co-optimal alignment in traceback order, if any passes the
/// overlap check.
pub fn first_alignment(matrices: &DpMatrices<'_>, min_overlap: usize) -> Option<CandidateAlignment> {
    Traceback::new(matrices, min_overlap).next()
}

pub fn percent_identity(
    matrices: &DpMatrices<'_>,
    flanks: &FlankingContext,
    min_overlap: usize,
) -> PercentIdentity {
    let Some(alignment) = first_alignment(matrices, min_overlap) else {
        return PercentIdentity::default();
    };

    let (total, matched) = count_identity(&alignment, flanks);
    PercentIdentity {
        total,
        matched,
        alignment: Some(alignment),
    }
}

fn count_identity(alignment: &CandidateAlignment, flanks: &FlankingContext) -> (usize, usize) {
    let reference: &[u8] = &alignment.reference;
    let candidate: &[u8] = &alignment.candidate;
    let len = reference.len();
    let leading = |row: &[u8]| row.iter().take_while(|&&b| b == GAP).count();
    let trailing = |row: &[u8]| row.iter().rev().take_while(|&&b| b == GAP).count();

    let insertions_5 = leading(reference);
    let insertions_3 = trailing(reference);
    let deletions_5 = leading(candidate);
    let deletions_3 = trailing(candidate);

    let mut total = 0;
    let mut matched = 0;
    let mut compare = |expected: Option<u8>, base: u8| {
        total += 1;
        if expected == Some(base) {
            matched += 1;
        }
    };

    let start = insertions_5.max(deletions_5);
    let end = len.saturating_sub(insertions_3.max(deletions_3));
    for i in start..end {
        compare(Some(reference[i]), candidate[i]);
    }
    if insertions_3 < len {
        for k in 0..insertions_3 {
            compare(flanks.downstream(k), candidate[len - insertions_3 + k]);
        }
    }
    for k in 0..insertions_5.min(len) {
        compare(flanks.upstream(insertions_5 - k), candidate[k]);
    }

    (total, matched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment_mode::{AlignmentMode, AlignmentParams};
    use crate::matrix::build_matrices;
    use crate::ScoreParams;

    fn params(mode: AlignmentMode) -> AlignmentParams {
        AlignmentParams::new(ScoreParams {
            match_score: 1,
            mismatch: -1,
            gap_open: -5,
            gap_ext: -1,
        })
        .with_mode(mode)
    }

    #[test]
    fn test_single_mismatch() {
        let m = build_matrices(b"ACGTACGTAC", b"ACGTACCTAC", &params(AlignmentMode::Global)).unwrap();
        let identity = percent_identity(&m, &FlankingContext::default(), 0);
        assert_eq!(identity.total, 10);
        assert_eq!(identity.matched, 9);
        assert!((identity.percent() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_end_gaps_excluded() {
        let m = build_matrices(b"ACGTACGTAA", b"ACGTACGT", &params(AlignmentMode::SemiGlobal)).unwrap();
        let identity = percent_identity(&m, &FlankingContext::default(), 0);
        assert_eq!(identity.total, 8);
        assert_eq!(identity.matched, 8);
    }

    #[test]
    fn test_spill_compared_to_flanks() {
        let m = build_matrices(b"CGTACGTACG", b"ACGTACGTACG", &params(AlignmentMode::SemiGlobal)).unwrap();
        let identity = percent_identity(&m, &FlankingContext::new(b"TTA", b""), 0);
        assert_eq!(identity.total, 11);
        assert_eq!(identity.matched, 11);

        let identity = percent_identity(&m, &FlankingContext::new(b"TTG", b""), 0);
        assert_eq!(identity.total, 11);
        assert_eq!(identity.matched, 10);
    }

    #[test]
    fn test_no_alignment() {
        let m = build_matrices(b"ACGT", b"ACGT", &params(AlignmentMode::Global)).unwrap();
        let identity = percent_identity(&m, &FlankingContext::default(), 30);
        assert_eq!(identity, PercentIdentity::default());
        assert_eq!(identity.percent(), 0.0);
        assert!(first_alignment(&m, 30).is_none());
    }

    #[test]
    fn test_first_alignment() {
        let m = build_matrices(b"ACGTACGT", b"ACGTACGT", &params(AlignmentMode::Global)).unwrap();
        assert_eq!(
            first_alignment(&m, 0),
            Some(CandidateAlignment::new(b"ACGTACGT", b"ACGTACGT"))
        );
    }
}
