use correction_eval::{
    AlignmentMode, BestResult, CandidateAlignment, EvaluationConfig, Evaluator, EvaluatorError,
    ErrorAnnotations, FlankingContext, NotEvaluated, ReadEvaluation, ReadInfo, ScoreParams,
};
use proptest::prelude::*;

fn evaluator(config: EvaluationConfig) -> Evaluator {
    Evaluator::new(config).unwrap().with_score_params(ScoreParams {
        match_score: 1,
        mismatch: -1,
        gap_open: -5,
        gap_ext: -1,
    })
}

fn classified(evaluation: ReadEvaluation) -> BestResult {
    match evaluation {
        ReadEvaluation::Classified(best) => best,
        other => panic!("expected a classified read, got {:?}", other),
    }
}

fn dna_seq(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(
        prop_oneof![Just(b'A'), Just(b'C'), Just(b'G'), Just(b'T')],
        1..=max_len,
    )
}

#[test]
fn test_perfect_correction() {
    let e = evaluator(EvaluationConfig::new().with_min_overlap(8));
    let read = ReadInfo::new("r1", 8);
    let best = classified(
        e.evaluate(b"ACGTACGT", b"ACGTACGT", &read, &ErrorAnnotations::new())
            .unwrap(),
    );
    assert_eq!(best.alignment, CandidateAlignment::new(b"ACGTACGT", b"ACGTACGT"));
    assert_eq!(best.result.substitution.unaffected_correct, 8);
    assert_eq!(best.result.total_score, 0);
    assert_eq!(best.result.new_error_score, 0);
}

#[test]
fn test_decoded_substitution_corrected() {
    let e = evaluator(EvaluationConfig::new().with_min_overlap(5));
    let annotations = e.decode("3:A->C;", "-", "-");
    let read = ReadInfo::new("r1", 5);
    let best = classified(e.evaluate(b"AAAAA", b"AAAAA", &read, &annotations).unwrap());
    assert_eq!(best.result.substitution.corrected, 1);
    assert_eq!(best.result.total_score, 1);
    assert_eq!(best.result.corrected_positions.get(3), 1);
}

#[test]
fn test_homopolymer_deletion_corrected() {
    let e = evaluator(EvaluationConfig::new().with_min_overlap(4));
    let annotations = e.decode("-", "-", "3:A;");
    let read = ReadInfo::new("r1", 4);
    let best = classified(e.evaluate(b"AAAAA", b"AAAA", &read, &annotations).unwrap());
    assert_eq!(best.result.deletion.corrected, 1);
    assert_eq!(best.result.deletion.newly_introduced, 0);
    assert_eq!(best.result.total_score, 6);
    assert_eq!(best.result.new_error_score, 0);
    assert_eq!(best.result.end_trim(), 1);
}

#[test]
fn test_candidates_outlive_their_inputs() {
    let e = evaluator(EvaluationConfig::new().with_min_overlap(4));
    let enumeration = {
        let reference = b"AAAAA".to_vec();
        let candidate = b"AAAA".to_vec();
        e.candidates(&reference, &candidate).unwrap()
    };
    assert!(!enumeration.too_many_candidates);
    assert_eq!(enumeration.candidates.len(), 5);
    for alignment in &enumeration.candidates {
        assert_eq!(alignment.reference, b"AAAAA".to_vec());
        assert_eq!(alignment.candidate.iter().filter(|&&b| b == b'-').count(), 1);
    }
}

#[test]
fn test_too_many_candidates_not_evaluated() {
    let config = EvaluationConfig::new()
        .with_min_overlap(4)
        .with_max_candidates(2)
        .unwrap();
    let e = evaluator(config);
    let annotations = e.decode("1:A->C;", "2:GT;", "3:A;");
    let read = ReadInfo::new("r1", 4);
    let evaluation = e.evaluate(b"AAAAA", b"AAAA", &read, &annotations).unwrap();
    assert_eq!(
        evaluation,
        ReadEvaluation::NotEvaluated(NotEvaluated {
            substitutions: 1,
            inserted_bases: 2,
            deletions: 1,
        })
    );
}

#[test]
fn test_insufficient_overlap_not_evaluated() {
    let e = evaluator(EvaluationConfig::new());
    let read = ReadInfo::new("r1", 8);
    let evaluation = e
        .evaluate(b"ACGTACGT", b"ACGTACGT", &read, &ErrorAnnotations::new())
        .unwrap();
    assert!(matches!(evaluation, ReadEvaluation::NotEvaluated(_)));
}

#[test]
fn test_trimmed_read_with_free_end_gaps() {
    let config = EvaluationConfig::new().with_min_overlap(8).with_trimmed(true);
    let e = evaluator(config).with_alignment_mode(AlignmentMode::SemiGlobal);
    let annotations = e.decode("1:A->T;", "-", "-");
    let read = ReadInfo::new("r1", 10);
    let best = classified(e.evaluate(b"ACGTACGTAC", b"GTACGTAC", &read, &annotations).unwrap());
    assert_eq!(best.alignment, CandidateAlignment::new(b"ACGTACGTAC", b"--GTACGTAC"));
    assert_eq!(best.result.substitution.trimmed, 1);
    assert_eq!(best.result.deletions_5_prime, 2);
}

#[test]
fn test_untrimmed_short_read_is_fatal() {
    let config = EvaluationConfig::new().with_min_overlap(8);
    let e = evaluator(config).with_alignment_mode(AlignmentMode::SemiGlobal);
    let read = ReadInfo::new("r1", 10);
    let err = e
        .evaluate(b"ACGTACGTAC", b"GTACGTAC", &read, &ErrorAnnotations::new())
        .unwrap_err();
    assert!(matches!(err, EvaluatorError::ReadEndNotFound(_)));
}

#[test]
fn test_empty_candidate_rejected() {
    let e = evaluator(EvaluationConfig::new());
    let read = ReadInfo::new("r1", 4);
    let err = e.evaluate(b"ACGT", b"", &read, &ErrorAnnotations::new()).unwrap_err();
    assert!(matches!(err, EvaluatorError::EmptySequence("candidate")));
}

#[test]
fn test_percent_identity_and_random_alignment() {
    let e = evaluator(EvaluationConfig::new().with_min_overlap(0));
    let identity = e
        .percent_identity(b"ACGTACGTAC", b"ACGTACCTAC", &FlankingContext::default())
        .unwrap();
    assert_eq!((identity.matched, identity.total), (9, 10));

    let alignment = e.random_alignment(b"ACGTACGT", b"ACGTACGT").unwrap();
    assert_eq!(alignment, Some(CandidateAlignment::new(b"ACGTACGT", b"ACGTACGT")));

    let strict = evaluator(EvaluationConfig::new());
    assert_eq!(strict.random_alignment(b"ACGT", b"ACGT").unwrap(), None);
}

proptest! {
    #[test]
    fn prop_evaluation_is_deterministic(reference in dna_seq(14), candidate in dna_seq(14)) {
        let config = EvaluationConfig::new()
            .with_min_overlap(1)
            .with_trimmed(true)
            .with_detail(true);
        let e = evaluator(config).with_alignment_mode(AlignmentMode::SemiGlobal);
        let read = ReadInfo::new("r", reference.len());
        let annotations = ErrorAnnotations::new().with_substitution(1, reference[0], b'N');
        let first = e.evaluate(&reference, &candidate, &read, &annotations).unwrap();
        let second = e.evaluate(&reference, &candidate, &read, &annotations).unwrap();
        prop_assert_eq!(first, second);
    }
}
