use crate::{EvaluatorError, DEFAULT_MAX_CANDIDATES, DEFAULT_MAX_READ_LENGTH, MIN_OVERLAP};

/// Per-run settings shared by every read of an evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationConfig {
    pub max_candidates: usize,
    pub min_overlap: usize,
    pub max_read_length: usize,
    pub trimmed: bool,
    pub detail: bool,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            max_candidates: DEFAULT_MAX_CANDIDATES,
            min_overlap: MIN_OVERLAP,
            max_read_length: DEFAULT_MAX_READ_LENGTH,
            trimmed: false,
            detail: false,
        }
    }
}

impl EvaluationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_candidates(mut self, max_candidates: usize) -> Result<Self, EvaluatorError> {
        if max_candidates == 0 {
            return Err(EvaluatorError::InvalidParameters(
                "max_candidates must be at least 1".to_string(),
            ));
        }
        self.max_candidates = max_candidates;
        Ok(self)
    }

    pub fn with_min_overlap(mut self, min_overlap: usize) -> Self {
        self.min_overlap = min_overlap;
        self
    }

    pub fn with_max_read_length(mut self, max_read_length: usize) -> Self {
        self.max_read_length = max_read_length;
        self
    }

    pub fn with_trimmed(mut self, trimmed: bool) -> Self {
        self.trimmed = trimmed;
        self
    }

    pub fn with_detail(mut self, detail: bool) -> Self {
        self.detail = detail;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EvaluationConfig::new();
        assert_eq!(config.min_overlap, 30);
        assert!(!config.trimmed);
        assert!(!config.detail);
    }

    #[test]
    fn test_zero_candidates_rejected() {
        assert!(matches!(
            EvaluationConfig::new().with_max_candidates(0),
            Err(EvaluatorError::InvalidParameters(_))
        ));
        let config = EvaluationConfig::new().with_max_candidates(4).unwrap();
        assert_eq!(config.max_candidates, 4);
    }
}
