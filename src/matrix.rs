use crate::alignment_mode::AlignmentParams;
use crate::{EvaluatorError, SMALL_NUMBER};

/// The three Gotoh layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Match,
    Gap1, // gap in the reference, consumes a candidate base
    Gap2, // gap in the candidate, consumes a reference base
}

impl Layer {
    pub const ALL: [Layer; 3] = [Layer::Match, Layer::Gap1, Layer::Gap2];
}

/// Flat score buffer indexed `y * width + x`.
#[derive(Debug, Clone)]
pub struct ScoreMatrix {
    data: Vec<i32>,
    width: usize,
}

impl ScoreMatrix {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            data: vec![SMALL_NUMBER; width * height],
            width,
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> i32 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: i32) {
        self.data[y * self.width + x] = value;
    }
}

/// Match, Gap1 and Gap2 matrices for one reference/candidate pair.
///
/// `x` walks the reference (columns), `y` walks the candidate (rows).
pub struct DpMatrices<'a> {
    reference: &'a [u8],
    candidate: &'a [u8],
    params: AlignmentParams,
    matrix_match: ScoreMatrix,
    matrix_gap1: ScoreMatrix,
    matrix_gap2: ScoreMatrix,
}

impl<'a> DpMatrices<'a> {
    pub fn reference(&self) -> &'a [u8] {
        self.reference
    }

    pub fn candidate(&self) -> &'a [u8] {
        self.candidate
    }

    pub fn params(&self) -> &AlignmentParams {
        &self.params
    }

    pub fn width(&self) -> usize {
        self.reference.len() + 1
    }

    pub fn height(&self) -> usize {
        self.candidate.len() + 1
    }

    pub fn layer(&self, layer: Layer) -> &ScoreMatrix {
        match layer {
            Layer::Match => &self.matrix_match,
            Layer::Gap1 => &self.matrix_gap1,
            Layer::Gap2 => &self.matrix_gap2,
        }
    }

    #[inline]
    pub fn get(&self, layer: Layer, x: usize, y: usize) -> i32 {
        self.layer(layer).get(x, y)
    }

    fn best_at(&self, x: usize, y: usize) -> i32 {
        self.matrix_match
            .get(x, y)
            .max(self.matrix_gap1.get(x, y))
            .max(self.matrix_gap2.get(x, y))
    }

    /// Optimal global score: the best of the three bottom-right cells.
    pub fn final_score(&self) -> i32 {
        self.best_at(self.reference.len(), self.candidate.len())
    }

    fn fill_boundaries(&mut self) {
        let free = self.params.free_end_gaps();
        let open = self.params.score.gap_open;
        let ext = self.params.score.gap_ext;

        self.matrix_match.set(0, 0, 0);
        for y in 1..self.height() {
            let value = if free { 0 } else { open + y as i32 * ext };
            self.matrix_gap1.set(0, y, value);
        }
        for x in 1..self.width() {
            let value = if free { 0 } else { open + x as i32 * ext };
            self.matrix_gap2.set(x, 0, value);
        }
    }

    fn fill_inner(&mut self) {
        let free = self.params.free_end_gaps();
        let first = self.params.gap_first();
        let ext = self.params.score.gap_ext;
        let last_x = self.reference.len();
        let last_y = self.candidate.len();

        for y in 1..=last_y {
            for x in 1..=last_x {
                let diagonal = self.best_at(x - 1, y - 1)
                    + self.params.substitution(self.reference[x - 1], self.candidate[y - 1]);
                self.matrix_match.set(x, y, diagonal);

                let up = if free && x == last_x {
                    self.best_at(x, y - 1)
                } else {
                    (self.matrix_match.get(x, y - 1) + first)
                        .max(self.matrix_gap1.get(x, y - 1) + ext)
                        .max(self.matrix_gap2.get(x, y - 1) + first)
                };
                self.matrix_gap1.set(x, y, up);

                let left = if free && y == last_y {
                    self.best_at(x - 1, y)
                } else {
                    (self.matrix_match.get(x - 1, y) + first)
                        .max(self.matrix_gap1.get(x - 1, y) + first)
                        .max(self.matrix_gap2.get(x - 1, y) + ext)
                };
                self.matrix_gap2.set(x, y, left);
            }
        }
    }
}

/// Fills the three affine-gap matrices for `reference` against `candidate`.
pub fn build_matrices<'a>(
    reference: &'a [u8],
    candidate: &'a [u8],
    params: &AlignmentParams,
) -> Result<DpMatrices<'a>, EvaluatorError> {
    if reference.is_empty() {
        return Err(EvaluatorError::EmptySequence("reference"));
    }
    if candidate.is_empty() {
        return Err(EvaluatorError::EmptySequence("candidate"));
    }

    let width = reference.len() + 1;
    let height = candidate.len() + 1;
    let mut matrices = DpMatrices {
        reference,
        candidate,
        params: *params,
        matrix_match: ScoreMatrix::new(width, height),
        matrix_gap1: ScoreMatrix::new(width, height),
        matrix_gap2: ScoreMatrix::new(width, height),
    };
    matrices.fill_boundaries();
    matrices.fill_inner();
    Ok(matrices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment_mode::AlignmentMode;
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
    fn test_perfect_match_score() {
        let m = build_matrices(b"ACGTACGT", b"ACGTACGT", &params(AlignmentMode::Global)).unwrap();
        assert_eq!(m.final_score(), 8);
        assert_eq!(m.get(Layer::Match, 8, 8), 8);
    }

    #[test]
    fn test_global_boundaries() {
        let m = build_matrices(b"ACG", b"AC", &params(AlignmentMode::Global)).unwrap();
        assert_eq!(m.get(Layer::Match, 0, 0), 0);
        assert_eq!(m.get(Layer::Match, 1, 0), SMALL_NUMBER);
        assert_eq!(m.get(Layer::Match, 0, 1), SMALL_NUMBER);
        assert_eq!(m.get(Layer::Gap1, 0, 0), SMALL_NUMBER);
        assert_eq!(m.get(Layer::Gap1, 2, 0), SMALL_NUMBER);
        assert_eq!(m.get(Layer::Gap1, 0, 2), -7);
        assert_eq!(m.get(Layer::Gap2, 0, 1), SMALL_NUMBER);
        assert_eq!(m.get(Layer::Gap2, 3, 0), -8);
    }

    #[test]
    fn test_free_end_gaps_boundaries() {
        let m = build_matrices(b"ACG", b"AC", &params(AlignmentMode::SemiGlobal)).unwrap();
        assert_eq!(m.get(Layer::Gap1, 0, 2), 0);
        assert_eq!(m.get(Layer::Gap2, 3, 0), 0);
        assert_eq!(m.get(Layer::Gap2, 0, 0), SMALL_NUMBER);
    }

    #[test]
    fn test_free_end_gaps_overhang() {
        let global = build_matrices(b"ACGTACGTAA", b"ACGTACGT", &params(AlignmentMode::Global)).unwrap();
        assert_eq!(global.final_score(), 1);

        let semi = build_matrices(b"ACGTACGTAA", b"ACGTACGT", &params(AlignmentMode::SemiGlobal)).unwrap();
        assert_eq!(semi.final_score(), 8);
        assert_eq!(semi.get(Layer::Gap2, 10, 8), 8);
    }

    #[test]
    fn test_empty_sequence_rejected() {
        let p = params(AlignmentMode::Global);
        assert!(matches!(
            build_matrices(b"", b"ACGT", &p),
            Err(EvaluatorError::EmptySequence("reference"))
        ));
        assert!(matches!(
            build_matrices(b"ACGT", b"", &p),
            Err(EvaluatorError::EmptySequence("candidate"))
        ));
    }
}
