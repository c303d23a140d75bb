use log::debug;

use crate::alignment_mode::AlignmentParams;
use crate::matrix::{DpMatrices, Layer};

pub const GAP: u8 = b'-';

/// One co-optimal alignment: two equal-length rows over `ACGT-`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateAlignment {
    pub reference: Vec<u8>,
    pub candidate: Vec<u8>,
}

impl CandidateAlignment {
    pub fn new(reference: &[u8], candidate: &[u8]) -> Self {
        Self {
            reference: reference.to_vec(),
            candidate: candidate.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.reference.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reference.is_empty()
    }

    /// Number of columns where neither row has a gap.
    pub fn overlap(&self) -> usize {
        self.reference
            .iter()
            .zip(&self.candidate)
            .filter(|(r, c)| **r != GAP && **c != GAP)
            .count()
    }

    /// Re-scores the path column by column under `params`.
    pub fn score(&self, params: &AlignmentParams) -> i32 {
        let free = params.free_end_gaps();
        let ref_len = self.reference.iter().filter(|&&b| b != GAP).count();
        let cand_len = self.candidate.iter().filter(|&&b| b != GAP).count();
        let (mut x, mut y) = (0, 0);
        let mut previous = Layer::Match;
        let mut score = 0;

        for (&r, &c) in self.reference.iter().zip(&self.candidate) {
            let layer = if r == GAP {
                Layer::Gap1
            } else if c == GAP {
                Layer::Gap2
            } else {
                Layer::Match
            };
            score += match layer {
                Layer::Match => params.substitution(r, c),
                Layer::Gap1 if free && (x == 0 || x == ref_len) => 0,
                Layer::Gap2 if free && (y == 0 || y == cand_len) => 0,
                _ if previous == layer => params.score.gap_ext,
                _ => params.gap_first(),
            };
            if r != GAP {
                x += 1;
            }
            if c != GAP {
                y += 1;
            }
            previous = layer;
        }
        score
    }
}

/// Result of walking every co-optimal path.
#[derive(Debug, Clone, Default)]
pub struct Enumeration {
    pub candidates: Vec<CandidateAlignment>,
    pub too_many_candidates: bool,
}

struct Frame {
    x: usize,
    y: usize,
    layer: Layer,
    score: i32,
    depth: usize,
}

/// Lazily yields co-optimal alignments, depth first, Match before Gap1
/// before Gap2.
///
/// A finished path with fewer than `min_overlap` aligned columns marks the
/// walk as degenerate and ends it.
pub struct Traceback<'m, 'a> {
    matrices: &'m DpMatrices<'a>,
    min_overlap: usize,
    stack: Vec<Frame>,
    // Columns collected from the bottom-right corner backwards.
    reference_row: Vec<u8>,
    candidate_row: Vec<u8>,
    degenerate: bool,
}

impl<'m, 'a> Traceback<'m, 'a> {
    pub fn new(matrices: &'m DpMatrices<'a>, min_overlap: usize) -> Self {
        let x = matrices.reference().len();
        let y = matrices.candidate().len();
        let best = matrices.final_score();

        let mut stack = Vec::new();
        for layer in Layer::ALL.iter().rev() {
            let score = matrices.get(*layer, x, y);
            if score == best {
                stack.push(Frame { x, y, layer: *layer, score, depth: 0 });
            }
        }

        Self {
            matrices,
            min_overlap,
            stack,
            reference_row: Vec::new(),
            candidate_row: Vec::new(),
            degenerate: false,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    fn push_column(&mut self, reference: u8, candidate: u8) {
        self.reference_row.push(reference);
        self.candidate_row.push(candidate);
    }

    fn finish(&mut self, mut x: usize, mut y: usize) -> Option<CandidateAlignment> {
        let reference = self.matrices.reference();
        let candidate = self.matrices.candidate();
        while y > 0 {
            self.push_column(GAP, candidate[y - 1]);
            y -= 1;
        }
        while x > 0 {
            self.push_column(reference[x - 1], GAP);
            x -= 1;
        }

        // Every aligned column consumes one base of each sequence.
        let overlap = reference.len() + candidate.len() - self.reference_row.len();
        if overlap < self.min_overlap {
            debug!(
                "Alignment overlap {} below minimum {}, giving up on candidates",
                overlap, self.min_overlap
            );
            self.degenerate = true;
            self.stack.clear();
            return None;
        }

        Some(CandidateAlignment {
            reference: self.reference_row.iter().rev().copied().collect(),
            candidate: self.candidate_row.iter().rev().copied().collect(),
        })
    }

    fn expand(&mut self, frame: &Frame) {
        let matrices = self.matrices;
        let params = matrices.params();
        let free = params.free_end_gaps();
        let reference = matrices.reference();
        let candidate = matrices.candidate();
        let (x, y) = (frame.x, frame.y);
        let ref_base = reference[x - 1];
        let cand_base = candidate[y - 1];

        let (mut gap1_open, mut gap1_ext) = (params.gap_first(), params.score.gap_ext);
        let (mut gap2_open, mut gap2_ext) = (gap1_open, gap1_ext);
        if free && (x == 0 || x == reference.len()) {
            gap1_open = 0;
            gap1_ext = 0;
        }
        if free && (y == 0 || y == candidate.len()) {
            gap2_open = 0;
            gap2_ext = 0;
        }

        let (prev_x, prev_y, costs) = match frame.layer {
            Layer::Match => {
                self.push_column(ref_base, cand_base);
                let cost = params.substitution(ref_base, cand_base);
                (x - 1, y - 1, [cost, cost, cost])
            }
            Layer::Gap1 => {
                self.push_column(GAP, cand_base);
                (x, y - 1, [gap1_open, gap1_ext, gap1_open])
            }
            Layer::Gap2 => {
                self.push_column(ref_base, GAP);
                (x - 1, y, [gap2_open, gap2_open, gap2_ext])
            }
        };

        let depth = self.reference_row.len();
        for (layer, cost) in Layer::ALL.iter().zip(costs).rev() {
            let previous = matrices.get(*layer, prev_x, prev_y);
            if previous + cost == frame.score {
                self.stack.push(Frame {
                    x: prev_x,
                    y: prev_y,
                    layer: *layer,
                    score: previous,
                    depth,
                });
            }
        }
    }
}

impl Iterator for Traceback<'_, '_> {
    type Item = CandidateAlignment;

    fn next(&mut self) -> Option<CandidateAlignment> {
        while let Some(frame) = self.stack.pop() {
            self.reference_row.truncate(frame.depth);
            self.candidate_row.truncate(frame.depth);

            if frame.x == 0 || frame.y == 0 {
                return self.finish(frame.x, frame.y);
            }
            self.expand(&frame);
        }
        None
    }
}

/// Collects every co-optimal alignment, up to `max_candidates`.
pub fn enumerate_candidates(
    matrices: &DpMatrices<'_>,
    min_overlap: usize,
    max_candidates: usize,
) -> Enumeration {
    let mut traceback = Traceback::new(matrices, min_overlap);
    let mut enumeration = Enumeration::default();

    for alignment in traceback.by_ref() {
        if enumeration.candidates.len() == max_candidates {
            debug!("More than {} co-optimal alignments", max_candidates);
            enumeration.too_many_candidates = true;
            break;
        }
        enumeration.candidates.push(alignment);
    }
    enumeration.too_many_candidates |= traceback.is_degenerate();
    enumeration
}
