//! Compiler diagnostics parsing and build summaries
//!
//! Each build step returns a [`TargetReport`]; callers collect them into a
//! [`BuildSummary`] which owns the totals and renders the pass/fail report.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::constants::compiler::DIAGNOSTICS_PATTERN;

fn diagnostics_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(DIAGNOSTICS_PATTERN).expect("diagnostics pattern is valid"))
}

/// Error and warning counts reported by the compiler
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    pub errors: u32,
    pub warnings: u32,
    /// The matched `N error(s), M warning(s)` text, if the compiler printed one
    pub summary: Option<String>,
}

impl Diagnostics {
    /// Parse the first diagnostics summary found in compiler output
    ///
    /// Output without a summary line counts as clean.
    pub fn parse(output: &str) -> Self {
        let Some(captures) = diagnostics_regex().captures(output) else {
            return Self::default();
        };

        // Digit runs too long for u32 saturate instead of reading as zero
        let count = |index: usize| {
            captures
                .get(index)
                .map(|m| m.as_str())
                .filter(|digits| !digits.is_empty())
                .map(|digits| digits.parse().unwrap_or(u32::MAX))
                .unwrap_or(0)
        };

        Self {
            errors: count(1),
            warnings: count(2),
            summary: captures.get(0).map(|m| m.as_str().to_string()),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.errors == 0 && self.warnings == 0
    }
}

/// Diagnostics for one built target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetReport {
    pub target: String,
    pub diagnostics: Diagnostics,
}

impl fmt::Display for TargetReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.diagnostics.is_clean() {
            write!(f, "{}:\tPassed", self.target)
        } else {
            write!(
                f,
                "{}:\terrors: {}\twarnings: {}",
                self.target, self.diagnostics.errors, self.diagnostics.warnings
            )
        }
    }
}

/// Aggregated results of a build run
#[derive(Debug, Clone, Default)]
pub struct BuildSummary {
    reports: Vec<TargetReport>,
}

impl BuildSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, report: TargetReport) {
        self.reports.push(report);
    }

    pub fn reports(&self) -> &[TargetReport] {
        &self.reports
    }

    pub fn total_errors(&self) -> u64 {
        self.reports
            .iter()
            .map(|r| u64::from(r.diagnostics.errors))
            .sum()
    }

    pub fn total_warnings(&self) -> u64 {
        self.reports
            .iter()
            .map(|r| u64::from(r.diagnostics.warnings))
            .sum()
    }

    /// Targets that reported any error or warning
    pub fn failed_count(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| !r.diagnostics.is_clean())
            .count()
    }

    pub fn passed(&self) -> bool {
        self.reports.iter().all(|r| r.diagnostics.is_clean())
    }

    /// Lines of the final pass/fail report
    ///
    /// A single failing target gets no summary: its own diagnostics line has
    /// already been reported while building.
    pub fn render(&self) -> Vec<String> {
        if self.passed() {
            return vec!["Passed".to_string()];
        }

        if self.reports.len() <= 1 {
            return Vec::new();
        }

        let mut lines: Vec<String> = self.reports.iter().map(ToString::to_string).collect();
        lines.push(format!(
            "Compilation failed: {} error(s), {} warning(s)",
            self.total_errors(),
            self.total_warnings()
        ));
        lines
    }
}

impl FromIterator<TargetReport> for BuildSummary {
    fn from_iter<I: IntoIterator<Item = TargetReport>>(iter: I) -> Self {
        Self {
            reports: iter.into_iter().collect(),
        }
    }
}
