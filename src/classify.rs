// ABOUTME: Risk classification for tool calls.
// ABOUTME: RiskRuleTable maps tools to base risk; RiskClassifier screens commands against pattern sets.

use std::collections::HashMap;

use crate::patterns::PatternSet;
use crate::types::{PermissionRule, RiskLevel, ToolArgs, COMMAND_TOOL};

/// Base risk levels for the built-in tool set.
const BUILTIN_RULES: &[(&str, RiskLevel)] = &[
    // Read-only tools.
    ("read_file", RiskLevel::Low),
    ("calculator", RiskLevel::Low),
    ("web_search", RiskLevel::Low),
    ("web_fetch", RiskLevel::Low),
    ("code_analysis", RiskLevel::Low),
    ("git_status", RiskLevel::Low),
    ("git_diff", RiskLevel::Low),
    ("git_log", RiskLevel::Low),
    // Writing tools.
    ("write_file", RiskLevel::Medium),
    ("edit_file", RiskLevel::Medium),
    ("python", RiskLevel::Medium),
    ("git_commit", RiskLevel::Medium),
    // Shell access.
    (COMMAND_TOOL, RiskLevel::High),
];

/// Immutable mapping from tool identifier to its base risk level.
///
/// Tools without an entry default to [`RiskLevel::Medium`] at lookup time:
/// unknown tools are treated as moderately risky, never as safe.
#[derive(Debug, Clone)]
pub struct RiskRuleTable {
    levels: HashMap<String, RiskLevel>,
}

impl RiskRuleTable {
    /// The built-in rule set.
    pub fn new() -> Self {
        Self {
            levels: BUILTIN_RULES
                .iter()
                .map(|(tool, level)| (tool.to_string(), *level))
                .collect(),
        }
    }

    /// Build a table from declarative rules, replacing the built-ins.
    pub fn from_rules(rules: &[PermissionRule]) -> Self {
        Self {
            levels: rules
                .iter()
                .map(|rule| (rule.tool_name.clone(), rule.risk_level))
                .collect(),
        }
    }

    /// The base risk level for a tool, if a rule exists.
    pub fn level(&self, tool_name: &str) -> Option<RiskLevel> {
        self.levels.get(tool_name).copied()
    }
}

impl Default for RiskRuleTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Computes the risk level of a (tool, arguments) pair.
///
/// Pure over its immutable tables: the same inputs always classify the same
/// way.
#[derive(Debug, Clone)]
pub struct RiskClassifier {
    rules: RiskRuleTable,
    dangerous: PatternSet,
    safe: PatternSet,
}

impl RiskClassifier {
    pub fn new(rules: RiskRuleTable, dangerous: PatternSet, safe: PatternSet) -> Self {
        Self {
            rules,
            dangerous,
            safe,
        }
    }

    /// Replace the rule table, keeping the pattern sets.
    pub fn with_rules(self, rules: RiskRuleTable) -> Self {
        Self { rules, ..self }
    }

    /// Classify a tool call.
    ///
    /// Command tools get their command screened first: a dangerous match is
    /// critical no matter what, a safe prefix match is low, and anything
    /// else falls back to the base rule. Other tools use the base rule
    /// directly; missing rules default to medium.
    pub fn classify(&self, tool_name: &str, arguments: &ToolArgs) -> RiskLevel {
        let base = self.rules.level(tool_name).unwrap_or(RiskLevel::Medium);

        if tool_name == COMMAND_TOOL {
            let command = arguments.command().unwrap_or("");
            if self.dangerous.matches(command) {
                return RiskLevel::Critical;
            }
            if self.safe.matches_prefix(command) {
                return RiskLevel::Low;
            }
        }

        base
    }
}
