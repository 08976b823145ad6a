// ABOUTME: Compiled pattern sets for command screening.
// ABOUTME: Built-in dangerous/safe command lists plus search and prefix matching.

use regex::{Regex, RegexBuilder};

use crate::error::GateError;

/// Command patterns that classify an invocation as critical risk.
///
/// Matched with an unanchored, case-insensitive search anywhere in the
/// command string.
pub const DANGEROUS_PATTERNS: &[&str] = &[
    // Deletion.
    r"rm\s+-rf",
    r"rm\s+-r",
    r"rmdir",
    r"del\s+/[sS]",
    // System modification.
    r"sudo\s+",
    r"chmod\s+777",
    r"chown\s+-R",
    // Piped downloads.
    r"curl.*\|\s*sh",
    r"wget.*\|\s*sh",
    r"curl.*\|\s*bash",
    // Destructive git.
    r"git\s+push\s+.*--force",
    r"git\s+reset\s+--hard",
    r"git\s+clean\s+-fd",
    // Process control.
    r"kill\s+-9",
    r"pkill",
    r"killall",
    // Disk surgery.
    r"dd\s+if=",
    r"mkfs",
    r"fdisk",
];

/// Command patterns eligible for low-risk auto-approval.
///
/// Matched case-insensitively, but only when the match starts at the very
/// beginning of the command string.
pub const SAFE_PATTERNS: &[&str] = &[
    r"^ls\s",
    r"^pwd$",
    r"^echo\s",
    r"^cat\s",
    r"^head\s",
    r"^tail\s",
    r"^grep\s",
    r"^find\s",
    r"^which\s",
    r"^whoami$",
    r"^date$",
    r"^git\s+status",
    r"^git\s+diff",
    r"^git\s+log",
    r"^git\s+branch",
    r"^npm\s+list",
    r"^pip\s+list",
    r"^python\s+--version",
    r"^node\s+--version",
];

/// Compile a single pattern case-insensitively, reporting the offending
/// pattern text on failure.
pub(crate) fn compile(pattern: &str) -> Result<Regex, GateError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| GateError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

/// An ordered list of compiled, case-insensitive patterns.
///
/// The two query modes mirror how the classifier uses them: dangerous
/// patterns match anywhere in the text, safe patterns only as a prefix.
#[derive(Debug, Clone)]
pub struct PatternSet {
    regexes: Vec<Regex>,
}

impl PatternSet {
    /// Compile a list of patterns. Fails on the first invalid pattern so
    /// bad configuration surfaces at construction, not at evaluation.
    pub fn new<I, S>(patterns: I) -> Result<Self, GateError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut regexes = Vec::new();
        for pattern in patterns {
            regexes.push(compile(pattern.as_ref())?);
        }
        Ok(Self { regexes })
    }

    /// Does any pattern match anywhere in `text`?
    pub fn matches(&self, text: &str) -> bool {
        self.regexes.iter().any(|re| re.is_match(text))
    }

    /// Does any pattern match starting at the beginning of `text`?
    pub fn matches_prefix(&self, text: &str) -> bool {
        self.regexes
            .iter()
            .any(|re| re.find(text).is_some_and(|m| m.start() == 0))
    }

    pub fn len(&self) -> usize {
        self.regexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regexes.is_empty()
    }
}
