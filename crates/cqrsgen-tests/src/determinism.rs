//! Determinism verification for generated units.
//!
//! A pass must produce byte-identical source for identical input. Generated
//! units are text, so a mismatch is reported as the first differing line
//! rather than a byte offset.

use std::fmt;

/// Result of a determinism verification.
#[derive(Debug, Clone)]
pub struct DeterminismResult {
    /// Whether all runs produced identical output.
    pub is_deterministic: bool,
    /// Number of runs performed.
    pub runs: usize,
    /// Size of the reference output in bytes.
    pub output_size: usize,
    /// BLAKE3 hash of the reference output.
    pub hash: String,
    /// If non-deterministic, the first difference found.
    pub diff_info: Option<DiffInfo>,
}

/// The first line that differs between the reference run and a later run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffInfo {
    /// 1-based line number.
    pub line: usize,
    /// Line from the first run (`None` past its end).
    pub expected: Option<String>,
    /// Line from the differing run (`None` past its end).
    pub actual: Option<String>,
    /// Which run (0-indexed) produced the differing output.
    pub run_index: usize,
}

impl fmt::Display for DiffInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Difference at line {} (run {}):",
            self.line, self.run_index
        )?;
        writeln!(
            f,
            "  expected: {}",
            self.expected.as_deref().unwrap_or("<end of output>")
        )?;
        write!(
            f,
            "  actual:   {}",
            self.actual.as_deref().unwrap_or("<end of output>")
        )
    }
}

impl DeterminismResult {
    /// Panic with a detailed message if not deterministic.
    pub fn assert_deterministic(&self) {
        if let Some(diff) = &self.diff_info {
            panic!(
                "Non-deterministic output detected!\n\
                 Runs: {}\n\
                 Output size: {} bytes\n\
                 Hash: {}\n\
                 {}",
                self.runs, self.output_size, self.hash, diff
            );
        }
    }
}

/// BLAKE3 hex digest of `data`.
pub fn compute_hash(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// Find the first differing line between two outputs.
pub fn find_first_difference(expected: &str, actual: &str, run_index: usize) -> Option<DiffInfo> {
    if expected == actual {
        return None;
    }

    let mut left = expected.split('\n');
    let mut right = actual.split('\n');
    let mut line = 1;
    loop {
        match (left.next(), right.next()) {
            (Some(e), Some(a)) if e == a => line += 1,
            (None, None) => return None,
            (e, a) => {
                return Some(DiffInfo {
                    line,
                    expected: e.map(str::to_string),
                    actual: a.map(str::to_string),
                    run_index,
                })
            }
        }
    }
}

/// Run `generate_fn` `runs` times and verify every output matches the first.
///
/// # Example
///
/// ```
/// use cqrsgen_tests::determinism::verify_determinism;
///
/// let result = verify_determinism(|| "same".to_string(), 3);
/// assert!(result.is_deterministic);
/// ```
pub fn verify_determinism<F, O>(generate_fn: F, runs: usize) -> DeterminismResult
where
    F: Fn() -> O,
    O: AsRef<str>,
{
    assert!(runs >= 2, "Must run at least 2 times to verify determinism");

    let reference = generate_fn();
    let reference = reference.as_ref();
    let hash = compute_hash(reference.as_bytes());

    for run_index in 1..runs {
        let output = generate_fn();
        if let Some(diff) = find_first_difference(reference, output.as_ref(), run_index) {
            return DeterminismResult {
                is_deterministic: false,
                runs,
                output_size: reference.len(),
                hash,
                diff_info: Some(diff),
            };
        }
    }

    DeterminismResult {
        is_deterministic: true,
        runs,
        output_size: reference.len(),
        hash,
        diff_info: None,
    }
}
