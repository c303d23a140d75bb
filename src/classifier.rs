use std::collections::BTreeMap;

use log::trace;

use crate::alignment_mode::AlignmentParams;
use crate::annotation::ErrorAnnotations;
use crate::config::EvaluationConfig;
use crate::read::ReadInfo;
use crate::scoring::{AuditCase, ClassificationResult, ErrorRecord};
use crate::traceback::{CandidateAlignment, GAP};
use crate::EvaluatorError;

/// Replays one alignment against the injected errors of a read.
///
/// Bases are compared three ways: the reference (REF), the original
/// erroneous read (ORG) rebuilt from the annotations, and the corrected
/// candidate (MOD).
pub struct Classifier<'a> {
    params: &'a AlignmentParams,
    config: &'a EvaluationConfig,
    annotations: &'a ErrorAnnotations,
    read: &'a ReadInfo,
}

/// An alignment projected onto the reference columns.
struct Projection {
    reference: Vec<u8>,
    original: Vec<u8>,
    modified: Vec<u8>,
    deletions_5_prime: usize,
    deletions_3_prime: usize,
}

impl<'a> Classifier<'a> {
    pub fn new(
        params: &'a AlignmentParams,
        config: &'a EvaluationConfig,
        annotations: &'a ErrorAnnotations,
        read: &'a ReadInfo,
    ) -> Self {
        Self {
            params,
            config,
            annotations,
            read,
        }
    }

    pub fn classify(&self, alignment: &CandidateAlignment) -> Result<ClassificationResult, EvaluatorError> {
        let mut result = ClassificationResult::new(self.config.max_read_length);
        let reference_row = &alignment.reference;
        let candidate_row = &alignment.candidate;
        let len = reference_row.len();

        let lead = reference_row.iter().take_while(|&&b| b == GAP).count();
        let trail = if lead == len {
            0
        } else {
            reference_row.iter().rev().take_while(|&&b| b == GAP).count()
        };

        let flanks = &self.read.flanks;
        self.score_spill(
            &mut result,
            (0..lead).map(|k| (flanks.upstream(lead - k), candidate_row[k])),
        );
        self.score_spill(
            &mut result,
            (0..trail).map(|k| (flanks.downstream(k), candidate_row[len - trail + k])),
        );

        let core = lead..len - trail;
        let pending = self.score_interior_insertions(
            &mut result,
            &reference_row[core.clone()],
            &candidate_row[core.clone()],
        );
        let insertion_columns =
            lead + trail + reference_row[core].iter().filter(|&&b| b == GAP).count();

        let projection = self.project(alignment);
        result.deletions_5_prime = projection.deletions_5_prime;
        result.deletions_3_prime = projection.deletions_3_prime;
        let ref_len = projection.reference.len();

        for (&pos, bases) in &pending {
            if self.config.trimmed && pos > ref_len - projection.deletions_3_prime {
                result.insertion.trimmed += bases.len();
            } else {
                result.insertion.corrected += bases.len();
            }
            result.total_score -= self.params.gap_run(bases.len());
        }

        if self.config.trimmed {
            self.score_trimmed_ends(&mut result, &projection)?;
        } else {
            self.score_five_prime_gap(&mut result, &projection)?;
        }

        let expected = if self.config.trimmed {
            candidate_row.iter().filter(|&&b| b != GAP).count()
        } else {
            self.read.read_length
        };
        let read_end = expected
            .checked_sub(insertion_columns)
            .and_then(|target| find_read_end(&projection.modified, projection.deletions_5_prime, target))
            .ok_or_else(|| EvaluatorError::ReadEndNotFound(self.read.name.clone()))?;

        if !self.config.trimmed {
            self.score_past_read_end(&mut result, read_end)?;
        }
        self.scan(&mut result, &projection, read_end)?;

        trace!(
            "{}: total {} new {} trim {}+{}",
            self.read.name,
            result.total_score,
            result.new_error_score,
            result.deletions_5_prime,
            result.deletions_3_prime
        );
        Ok(result)
    }

    /// Scores candidate bases hanging past either end of the reference
    /// window against the flanking reference.
    fn score_spill<I>(&self, result: &mut ClassificationResult, columns: I)
    where
        I: Iterator<Item = (Option<u8>, u8)>,
    {
        let mut previous_matched = true;
        for (flank, base) in columns {
            if flank == Some(base) {
                result.substitution.unaffected_correct += 1;
                previous_matched = true;
            } else {
                result.insertion.newly_introduced += 1;
                let cost = if previous_matched {
                    self.params.gap_first()
                } else {
                    self.params.score.gap_ext
                };
                result.total_score += cost;
                result.new_error_score += cost;
                previous_matched = false;
            }
        }
    }

    /// Matches gap runs inside the reference row to annotated insertions.
    /// Returns the annotated insertions the alignment never showed.
    fn score_interior_insertions(
        &self,
        result: &mut ClassificationResult,
        reference_row: &[u8],
        candidate_row: &[u8],
    ) -> BTreeMap<usize, &'a [u8]> {
        let annotations: &'a ErrorAnnotations = self.annotations;
        let mut pending: BTreeMap<usize, &'a [u8]> = annotations
            .insertions()
            .iter()
            .map(|(&pos, bases)| (pos, bases.as_slice()))
            .collect();

        let mut ref_bases = 0;
        let mut i = 0;
        while i < reference_row.len() {
            if reference_row[i] != GAP {
                ref_bases += 1;
                i += 1;
                continue;
            }
            let start = i;
            while i < reference_row.len() && reference_row[i] == GAP {
                i += 1;
            }
            let run = &candidate_row[start..i];
            self.score_insertion_run(result, run, pending.remove(&ref_bases));
        }
        pending
    }

    fn score_insertion_run(&self, result: &mut ClassificationResult, run: &[u8], annotated: Option<&[u8]>) {
        let ext = self.params.score.gap_ext;
        let Some(original) = annotated else {
            let cost = self.params.gap_run(run.len());
            result.insertion.newly_introduced += run.len();
            result.total_score += cost;
            result.new_error_score += cost;
            return;
        };

        for (modified, inserted) in run.iter().zip(original) {
            if modified == inserted {
                result.insertion.untouched += 1;
            } else {
                result.insertion.wrongly_recoded += 1;
            }
        }
        if run.len() <= original.len() {
            let removed = original.len() - run.len();
            result.insertion.corrected += removed;
            result.total_score -= ext * removed as i32;
        } else {
            let extra = run.len() - original.len();
            result.insertion.newly_introduced += extra;
            result.total_score += ext * extra as i32;
        }
    }

    fn project(&self, alignment: &CandidateAlignment) -> Projection {
        let (reference, modified): (Vec<u8>, Vec<u8>) = alignment
            .reference
            .iter()
            .zip(&alignment.candidate)
            .filter(|(r, _)| **r != GAP)
            .map(|(&r, &c)| (r, c))
            .unzip();

        let original = reference
            .iter()
            .enumerate()
            .map(|(i, &base)| {
                let pos = i + 1;
                if self.annotations.deletions().contains_key(&pos) {
                    GAP
                } else if let Some(sub) = self.annotations.substitutions().get(&pos) {
                    sub.error
                } else {
                    base
                }
            })
            .collect();

        let deletions_5_prime = modified.iter().take_while(|&&b| b == GAP).count();
        let deletions_3_prime = modified.iter().rev().take_while(|&&b| b == GAP).count();
        Projection {
            reference,
            original,
            modified,
            deletions_5_prime,
            deletions_3_prime,
        }
    }

    /// Affine cost of an annotated deletion at 1-based `pos`, opening a new
    /// gap unless the previous original base was deleted too.
    fn deletion_cost(&self, original: &[u8], pos: usize) -> i32 {
        if pos >= 2 && original.get(pos - 2) == Some(&GAP) {
            self.params.score.gap_ext
        } else {
            self.params.gap_first()
        }
    }

    fn score_trimmed_ends(&self, result: &mut ClassificationResult, projection: &Projection) -> Result<(), EvaluatorError> {
        let five_prime_end = projection.deletions_5_prime;
        let three_prime_start = projection.reference.len() - projection.deletions_3_prime;

        for &pos in self.annotations.deletions().keys() {
            if pos <= five_prime_end || pos > three_prime_start {
                result.deletion.trimmed += 1;
                result.total_score -= self.deletion_cost(&projection.original, pos);
            }
        }
        for &pos in self.annotations.substitutions().keys() {
            let case = if pos <= five_prime_end {
                AuditCase::TrimmedFivePrime
            } else if pos > three_prime_start {
                AuditCase::TrimmedThreePrime
            } else {
                continue;
            };
            result.substitution.trimmed += 1;
            result.total_score -= self.params.score.mismatch;
            self.record_substitution(result, pos, true, case)?;
        }
        Ok(())
    }

    fn score_five_prime_gap(&self, result: &mut ClassificationResult, projection: &Projection) -> Result<(), EvaluatorError> {
        let five_prime_end = projection.deletions_5_prime;

        for &pos in self.annotations.deletions().keys() {
            if pos <= five_prime_end {
                result.deletion.corrected += 1;
                result.total_score -= self.deletion_cost(&projection.original, pos);
            }
        }
        for &pos in self.annotations.substitutions().keys() {
            if pos <= five_prime_end {
                result.substitution.corrected += 1;
                result.total_score -= self.params.score.mismatch;
                self.record_substitution(result, pos, true, AuditCase::FivePrimeGap)?;
            }
        }
        Ok(())
    }

    /// Errors beyond the logical end of an untrimmed read count as removed.
    fn score_past_read_end(&self, result: &mut ClassificationResult, read_end: usize) -> Result<(), EvaluatorError> {
        let last = read_end + 1;
        for &pos in self.annotations.substitutions().keys() {
            if pos > last {
                result.substitution.corrected += 1;
                result.total_score -= self.params.score.mismatch;
                self.record_substitution(result, pos, true, AuditCase::PastReadEnd)?;
            }
        }
        for &pos in self.annotations.deletions().keys() {
            if pos > last {
                result.deletion.corrected += 1;
                result.total_score -= self.params.score.gap_ext;
            }
        }
        Ok(())
    }

    fn scan(&self, result: &mut ClassificationResult, projection: &Projection, read_end: usize) -> Result<(), EvaluatorError> {
        let mismatch = self.params.score.mismatch;
        let mut previous_original = b'A';
        let mut previous_modified = b'A';

        for i in projection.deletions_5_prime..=read_end {
            let pos = i + 1;
            let reference = projection.reference[i];
            let original = projection.original[i];
            let modified = projection.modified[i];

            if original == GAP {
                if modified == GAP {
                    result.deletion.untouched += 1;
                } else {
                    result.deletion.corrected += 1;
                    result.total_score -= if previous_original == GAP {
                        self.params.score.gap_ext
                    } else {
                        self.params.gap_first()
                    };
                    if modified == reference && self.annotations.substitutions().contains_key(&pos) {
                        result.substitution.corrected += 1;
                        result.total_score -= mismatch;
                        self.record_substitution(result, pos, true, AuditCase::RestoredWithDeletion)?;
                    }
                }
            } else if modified == GAP {
                if original != reference {
                    result.substitution_to_deletion += 1;
                }
                result.deletion.newly_introduced += 1;
                let cost = if previous_modified == GAP {
                    self.params.score.gap_ext
                } else {
                    self.params.gap_first()
                };
                result.total_score += cost;
                result.new_error_score += cost;
            } else if original == reference {
                if modified == reference {
                    result.substitution.unaffected_correct += 1;
                } else {
                    result.substitution.newly_introduced += 1;
                    result.total_score += mismatch;
                    result.new_error_score += mismatch;
                }
            } else if modified == original {
                result.substitution.untouched += 1;
                self.record_substitution(result, pos, false, AuditCase::Untouched)?;
            } else if modified == reference {
                result.substitution.corrected += 1;
                result.total_score -= mismatch;
                self.record_substitution(result, pos, true, AuditCase::Corrected)?;
            } else {
                result.substitution.wrongly_recoded += 1;
                result.total_score += mismatch;
                self.record_substitution(result, pos, false, AuditCase::WronglyRecoded)?;
            }

            previous_original = original;
            previous_modified = modified;
        }
        Ok(())
    }

    fn record_substitution(
        &self,
        result: &mut ClassificationResult,
        pos: usize,
        corrected: bool,
        case: AuditCase,
    ) -> Result<(), EvaluatorError> {
        result.raw_positions.record(pos);
        if corrected {
            result.corrected_positions.record(pos);
        }
        if !self.config.detail {
            return Ok(());
        }
        let Some(sub) = self.annotations.substitutions().get(&pos) else {
            return Ok(());
        };
        result.records.push(ErrorRecord {
            ref_seq_index: self.read.ref_seq_index,
            genome_position: self.read.genome_position(pos),
            original_base: self.read.genome_base(sub.original)?,
            error_base: self.read.genome_base(sub.error)?,
            corrected,
            case,
            read_name: self.read.name.clone(),
            read_start: self.read.start,
            read_end: self.read.end,
        });
        Ok(())
    }
}

/// Index of the column holding the `target`-th candidate base, counting
/// from `from`.
fn find_read_end(modified: &[u8], from: usize, target: usize) -> Option<usize> {
    let mut seen = 0;
    for (i, &base) in modified.iter().enumerate().skip(from) {
        if base != GAP {
            seen += 1;
        }
        if seen == target {
            return Some(i);
        }
    }
    None
}
