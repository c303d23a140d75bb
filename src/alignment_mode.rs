use crate::ScoreParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentMode {
    Global,      // Needleman-Wunsch with affine gaps
    SemiGlobal,  // Free end-gaps on both sequences
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentParams {
    pub mode: AlignmentMode,
    pub score: ScoreParams,
}

impl Default for AlignmentParams {
    fn default() -> Self {
        Self {
            mode: AlignmentMode::Global,
            score: ScoreParams::default(),
        }
    }
}

impl AlignmentParams {
    pub fn new(score: ScoreParams) -> Self {
        Self {
            score,
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: AlignmentMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn free_end_gaps(&self) -> bool {
        self.mode == AlignmentMode::SemiGlobal
    }

    /// Cost of opening a gap: the first gap column pays both terms.
    pub fn gap_first(&self) -> i32 {
        self.score.gap_open + self.score.gap_ext
    }

    /// Cost of a gap run of `len` columns.
    pub fn gap_run(&self, len: usize) -> i32 {
        self.score.gap_open + self.score.gap_ext * len as i32
    }

    pub fn substitution(&self, a: u8, b: u8) -> i32 {
        if a == b {
            self.score.match_score
        } else {
            self.score.mismatch
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_global() {
        let params = AlignmentParams::default();
        assert_eq!(params.mode, AlignmentMode::Global);
        assert!(!params.free_end_gaps());
        assert!(params.with_mode(AlignmentMode::SemiGlobal).free_end_gaps());
    }

    #[test]
    fn test_gap_costs() {
        let params = AlignmentParams::new(ScoreParams {
            match_score: 1,
            mismatch: -1,
            gap_open: -5,
            gap_ext: -1,
        });
        assert_eq!(params.gap_first(), -6);
        assert_eq!(params.gap_run(3), -8);
        assert_eq!(params.substitution(b'A', b'A'), 1);
        assert_eq!(params.substitution(b'A', b'C'), -1);
    }
}
