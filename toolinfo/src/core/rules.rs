//! Ordered detection rules used to turn tool output into a [`Verdict`].
//!
//! Two evaluation modes exist:
//!
//! - [`scan_lines`]: every output line is tested against the rule list; the
//!   first rule matching a line assigns its verdict, and later lines may
//!   overwrite an earlier assignment.
//! - [`first_match`]: the rules are tested in order against the whole output
//!   text and the first one that holds wins.

use crate::core::types::RunResult;
use crate::core::verdict::Verdict;

/// Condition checked by a [`Rule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// The subject starts with the string.
    Prefix(&'static str),
    /// The subject contains the string anywhere.
    Contains(&'static str),
    /// The subject contains all strings in order, without overlap.
    InOrder(&'static [&'static str]),
    /// The subject ends with any of the strings.
    EndsWithAny(&'static [&'static str]),
    /// The run was terminated by this signal. Ignores the subject.
    Signal(i32),
    /// The harness flagged the run as timed out. Ignores the subject.
    TimedOut,
}

impl Check {
    pub fn holds(&self, subject: &str, run: &RunResult) -> bool {
        match *self {
            Check::Prefix(prefix) => subject.starts_with(prefix),
            Check::Contains(needle) => subject.contains(needle),
            Check::InOrder(words) => contains_in_order(subject, words),
            Check::EndsWithAny(suffixes) => suffixes.iter().any(|suffix| subject.ends_with(suffix)),
            Check::Signal(signal) => run.signal == Some(signal),
            Check::TimedOut => run.timed_out,
        }
    }
}

/// A check paired with the verdict it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub check: Check,
    pub verdict: Verdict,
}

impl Rule {
    pub const fn new(check: Check, verdict: Verdict) -> Self {
        Self { check, verdict }
    }

    pub fn matches(&self, subject: &str, run: &RunResult) -> bool {
        self.check.holds(subject, run)
    }
}

/// Whether `words` occur in `text` in the given order.
///
/// Each search starts right after the end of the previous match, so the
/// matches never overlap. An empty word list always matches.
pub fn contains_in_order(text: &str, words: &[&str]) -> bool {
    let mut cursor = 0;
    for word in words {
        match text[cursor..].find(word) {
            Some(offset) => cursor += offset + word.len(),
            None => return false,
        }
    }
    true
}

/// Classify `run.output` line by line.
///
/// The status starts as [`Verdict::Unknown`]. For each line the first rule
/// that matches overwrites the status; a line no rule matches leaves it as is.
/// Rules that ignore the subject (such as [`Check::Signal`]) therefore fire on
/// every line not claimed by an earlier rule, and never fire on empty output.
pub fn scan_lines(rules: &[Rule], run: &RunResult) -> Verdict {
    let mut status = Verdict::Unknown;
    for line in &run.output {
        if let Some(rule) = rules.iter().find(|rule| rule.matches(line, run)) {
            status = rule.verdict;
        }
    }
    status
}

/// Verdict of the first rule that holds for `text`, if any.
pub fn first_match(rules: &[Rule], text: &str, run: &RunResult) -> Option<Verdict> {
    rules
        .iter()
        .find(|rule| rule.matches(text, run))
        .map(|rule| rule.verdict)
}
