// ABOUTME: Session and permanent whitelists with regex membership matching.
// ABOUTME: Patterns are validated at insertion; duplicate inserts into a scope are no-ops.

use regex::Regex;

use crate::error::GateError;
use crate::patterns::compile;
use crate::types::{ToolArgs, COMMAND_TOOL};

/// Which whitelist a pattern lives in.
///
/// Session entries are cleared by [`WhitelistStore::reset_session`];
/// permanent entries survive until the store is dropped and are assumed to
/// be persisted by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhitelistScope {
    Session,
    Permanent,
}

#[derive(Debug, Clone)]
struct Entry {
    pattern: String,
    regex: Regex,
}

/// Patterns whose match approves a tool call outright.
///
/// Membership is a case-insensitive unanchored search of a canonical check
/// string: the raw command for command tools, `tool:k=v, ...` for
/// everything else. A match bypasses every later pipeline rule, including
/// the critical-risk deny.
#[derive(Debug, Clone, Default)]
pub struct WhitelistStore {
    session: Vec<Entry>,
    permanent: Vec<Entry>,
}

impl WhitelistStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with permanent-scope patterns.
    pub fn with_permanent<I, S>(patterns: I) -> Result<Self, GateError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut store = Self::new();
        for pattern in patterns {
            store.add(pattern.as_ref(), WhitelistScope::Permanent)?;
        }
        Ok(store)
    }

    /// Add a pattern to a scope. Invalid patterns are rejected here, never
    /// at check time; inserting an identical pattern twice is a no-op.
    pub fn add(&mut self, pattern: &str, scope: WhitelistScope) -> Result<(), GateError> {
        let regex = compile(pattern)?;
        let entries = match scope {
            WhitelistScope::Session => &mut self.session,
            WhitelistScope::Permanent => &mut self.permanent,
        };

        // Skip duplicates.
        if entries.iter().any(|e| e.pattern == pattern) {
            return Ok(());
        }

        entries.push(Entry {
            pattern: pattern.to_string(),
            regex,
        });
        Ok(())
    }

    /// Does any pattern in either scope match this tool call?
    pub fn contains(&self, tool_name: &str, arguments: &ToolArgs) -> bool {
        let check = check_string(tool_name, arguments);
        self.session
            .iter()
            .chain(self.permanent.iter())
            .any(|entry| entry.regex.is_match(&check))
    }

    /// Drop all session-scoped entries, starting a fresh authorization
    /// session.
    pub fn reset_session(&mut self) {
        self.session.clear();
    }

    pub fn session_len(&self) -> usize {
        self.session.len()
    }

    pub fn permanent_len(&self) -> usize {
        self.permanent.len()
    }

    /// Snapshot of the permanent-scope patterns, for callers that persist
    /// them.
    pub fn permanent_patterns(&self) -> Vec<String> {
        self.permanent.iter().map(|e| e.pattern.clone()).collect()
    }
}

/// The canonical string a tool call is matched as.
fn check_string(tool_name: &str, arguments: &ToolArgs) -> String {
    if tool_name == COMMAND_TOOL {
        arguments.command().unwrap_or("").to_string()
    } else {
        format!("{}:{}", tool_name, arguments.render_pairs(usize::MAX))
    }
}
