use std::collections::BTreeMap;

use log::warn;
use regex::Regex;

use crate::EvaluatorError;

/// Marks an empty annotation list.
pub const EMPTY_ANNOTATION: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Substitution {
    pub original: u8,
    pub error: u8,
}

/// Ground-truth errors injected into one read, keyed by 1-based position.
///
/// Insertion keys count the reference bases preceding the inserted run, so
/// `0` is an insertion before the first base.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorAnnotations {
    substitutions: BTreeMap<usize, Substitution>,
    insertions: BTreeMap<usize, Vec<u8>>,
    deletions: BTreeMap<usize, u8>,
}

impl ErrorAnnotations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_substitution(mut self, position: usize, original: u8, error: u8) -> Self {
        self.substitutions.insert(position, Substitution { original, error });
        self
    }

    pub fn with_insertion(mut self, position: usize, bases: &[u8]) -> Self {
        self.insertions.insert(position, bases.to_vec());
        self
    }

    pub fn with_deletion(mut self, position: usize, base: u8) -> Self {
        self.deletions.insert(position, base);
        self
    }

    pub fn substitutions(&self) -> &BTreeMap<usize, Substitution> {
        &self.substitutions
    }

    pub fn insertions(&self) -> &BTreeMap<usize, Vec<u8>> {
        &self.insertions
    }

    pub fn deletions(&self) -> &BTreeMap<usize, u8> {
        &self.deletions
    }

    pub fn substitution_count(&self) -> usize {
        self.substitutions.len()
    }

    pub fn insertion_count(&self) -> usize {
        self.insertions.len()
    }

    pub fn inserted_bases(&self) -> usize {
        self.insertions.values().map(Vec::len).sum()
    }

    pub fn deletion_count(&self) -> usize {
        self.deletions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.substitutions.is_empty() && self.insertions.is_empty() && self.deletions.is_empty()
    }
}

/// Parses the `pos:orig->err;`, `pos:bases;` and `pos:base;` record lists.
pub struct AnnotationDecoder {
    substitution: Regex,
    insertion: Regex,
    deletion: Regex,
}

impl AnnotationDecoder {
    pub fn new() -> Result<Self, EvaluatorError> {
        Ok(Self {
            substitution: Regex::new(r"([0-9]+):([ACGT])->([ACGT]);")?,
            insertion: Regex::new(r"([0-9]+):([ACGT]+);")?,
            deletion: Regex::new(r"([0-9]+):([ACGT]);")?,
        })
    }

    /// Malformed records are skipped with a warning.
    pub fn decode(&self, substitutions: &str, insertions: &str, deletions: &str) -> ErrorAnnotations {
        let mut annotations = ErrorAnnotations::new();

        for_each_record(&self.substitution, substitutions, "substitution", |pos, caps| {
            let original = caps[2].as_bytes()[0];
            let error = caps[3].as_bytes()[0];
            annotations
                .substitutions
                .insert(pos, Substitution { original, error });
        });
        for_each_record(&self.insertion, insertions, "insertion", |pos, caps| {
            annotations.insertions.insert(pos, caps[2].as_bytes().to_vec());
        });
        for_each_record(&self.deletion, deletions, "deletion", |pos, caps| {
            annotations.deletions.insert(pos, caps[2].as_bytes()[0]);
        });

        annotations
    }
}

fn for_each_record<F>(pattern: &Regex, text: &str, kind: &str, mut f: F)
where
    F: FnMut(usize, &regex::Captures<'_>),
{
    if text == EMPTY_ANNOTATION {
        return;
    }

    let mut covered = 0;
    for caps in pattern.captures_iter(text) {
        let whole = match caps.get(0) {
            Some(m) => m,
            None => continue,
        };
        report_skipped(&text[covered..whole.start()], kind);
        covered = whole.end();

        match caps[1].parse::<usize>() {
            Ok(pos) => f(pos, &caps),
            Err(_) => warn!("Skipping {} record with unusable position: {}", kind, whole.as_str()),
        }
    }
    report_skipped(&text[covered..], kind);
}

fn report_skipped(fragment: &str, kind: &str) {
    if !fragment.trim().is_empty() {
        warn!("Skipping malformed {} annotation: {:?}", kind, fragment);
    }
}
