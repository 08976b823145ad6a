// ABOUTME: Core types for the authorization pipeline.
// ABOUTME: RiskLevel, PermissionRule, ToolArgs, ToolCallRequest, Decision, and ConfirmResponse.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// The tool identifier treated as free-form command execution.
///
/// Calls to this tool carry a `command` argument that is screened against
/// the dangerous/safe pattern sets; every other tool is classified by its
/// base risk rule alone.
pub const COMMAND_TOOL: &str = "bash";

/// How dangerous a tool invocation is. Levels are totally ordered from
/// least to most dangerous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Read-only operations.
    Low,
    /// Reversible writes.
    Medium,
    /// Irreversible or otherwise dangerous operations.
    High,
    /// System-level destruction; never shown to a human for approval.
    Critical,
}

impl RiskLevel {
    /// Emoji badge shown in interactive prompts.
    pub fn icon(&self) -> &'static str {
        match self {
            RiskLevel::Low => "🟢",
            RiskLevel::Medium => "🟡",
            RiskLevel::High => "🟠",
            RiskLevel::Critical => "🔴",
        }
    }

    /// Uppercase label for prompt headers.
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        }
    }
}

/// A declarative risk rule for one tool.
///
/// Rules are loaded once at construction time; `patterns` carries any
/// command patterns associated with the rule so callers can fold them into
/// the safe or dangerous pattern lists when assembling a config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermissionRule {
    pub tool_name: String,
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub auto_approve: bool,
}

/// Ordered, typed arguments of a tool call.
///
/// Keys keep their insertion order, which matters for argument rendering in
/// prompts and descriptions. Values stay as JSON because that is what the
/// agent boundary speaks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolArgs(Vec<(String, Value)>);

impl ToolArgs {
    /// An empty argument list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from key/value pairs, preserving their order.
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Append one argument.
    pub fn push(&mut self, key: impl Into<String>, value: Value) {
        self.0.push((key.into(), value));
    }

    /// Look up an argument by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// The string value of the `command` argument, if present.
    pub fn command(&self) -> Option<&str> {
        self.get("command").and_then(Value::as_str)
    }

    /// Iterate over arguments in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render up to `limit` arguments as `k=v` pairs joined by ", ".
    ///
    /// String values appear bare; other values use their compact JSON form.
    pub fn render_pairs(&self, limit: usize) -> String {
        self.0
            .iter()
            .take(limit)
            .map(|(k, v)| match v {
                Value::String(s) => format!("{k}={s}"),
                other => format!("{k}={other}"),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl From<Value> for ToolArgs {
    /// Convert a JSON object into arguments, keys in the map's iteration
    /// order. Non-object values yield an empty argument list. Callers that
    /// care about ordering should build with [`ToolArgs::from_pairs`].
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map.into_iter().collect()),
            _ => Self::new(),
        }
    }
}

impl Serialize for ToolArgs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// A tool invocation under evaluation. Built fresh per check, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolCallRequest {
    pub tool_name: String,
    pub arguments: ToolArgs,
    pub risk_level: RiskLevel,
    pub description: String,
    pub requires_approval: bool,
}

impl ToolCallRequest {
    pub fn new(
        tool_name: impl Into<String>,
        arguments: ToolArgs,
        risk_level: RiskLevel,
        description: impl Into<String>,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments,
            risk_level,
            description: description.into(),
            requires_approval: true,
        }
    }
}

/// The outcome of an authorization check: allowed or not, plus a
/// human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub allowed: bool,
    pub reason: String,
}

impl Decision {
    pub fn allow(reason: impl Into<String>) -> Self {
        Self {
            allowed: true,
            reason: reason.into(),
        }
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: reason.into(),
        }
    }
}

/// The operator's response to an interactive confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmResponse {
    /// Allow this one invocation.
    AllowOnce,
    /// Allow and remember a matching pattern in the session whitelist.
    AllowAlways,
    /// Deny this invocation.
    Deny,
    /// Abort the entire run.
    Abort,
}

impl ConfirmResponse {
    /// Map a single keystroke to a response. Anything unrecognized denies.
    pub fn from_key(key: char) -> Self {
        match key.to_ascii_lowercase() {
            'y' => ConfirmResponse::AllowOnce,
            'a' => ConfirmResponse::AllowAlways,
            'q' => ConfirmResponse::Abort,
            _ => ConfirmResponse::Deny,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn risk_level_ordering() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
        assert!(RiskLevel::High < RiskLevel::Critical);
    }

    #[test]
    fn risk_level_serde_roundtrip() {
        let json = serde_json::to_string(&RiskLevel::Critical).unwrap();
        assert_eq!(json, "\"critical\"");
        let parsed: RiskLevel = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, RiskLevel::Critical);
    }

    #[test]
    fn permission_rule_from_json_uses_defaults() {
        let json = r#"{"tool_name":"bash","risk_level":"high"}"#;
        let rule: PermissionRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.tool_name, "bash");
        assert_eq!(rule.risk_level, RiskLevel::High);
        assert!(rule.patterns.is_empty());
        assert!(rule.description.is_empty());
        assert!(!rule.auto_approve);
    }

    #[test]
    fn tool_args_command_lookup() {
        let args = ToolArgs::from_pairs([("command", json!("ls -la"))]);
        assert_eq!(args.command(), Some("ls -la"));

        let no_command = ToolArgs::from_pairs([("path", json!("/tmp/f"))]);
        assert_eq!(no_command.command(), None);

        // A non-string command is not a command.
        let non_string = ToolArgs::from_pairs([("command", json!(42))]);
        assert_eq!(non_string.command(), None);
    }

    #[test]
    fn tool_args_preserve_insertion_order() {
        let mut args = ToolArgs::new();
        args.push("zebra", json!(1));
        args.push("apple", json!(2));
        let keys: Vec<&str> = args.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zebra", "apple"]);
    }

    #[test]
    fn tool_args_render_pairs_limits_and_formats() {
        let args = ToolArgs::from_pairs([
            ("path", json!("/tmp/out")),
            ("count", json!(3)),
            ("force", json!(true)),
            ("extra", json!("dropped")),
        ]);
        assert_eq!(args.render_pairs(3), "path=/tmp/out, count=3, force=true");
        assert_eq!(args.render_pairs(usize::MAX).matches('=').count(), 4);
    }

    #[test]
    fn tool_args_serialize_as_object() {
        let args = ToolArgs::from_pairs([("command", json!("pwd"))]);
        let value = serde_json::to_value(&args).unwrap();
        assert_eq!(value, json!({ "command": "pwd" }));
    }

    #[test]
    fn tool_args_from_json_object() {
        let args = ToolArgs::from(json!({ "path": "/etc/hosts" }));
        assert_eq!(args.len(), 1);
        assert_eq!(args.get("path"), Some(&json!("/etc/hosts")));

        let empty = ToolArgs::from(json!("not an object"));
        assert!(empty.is_empty());
    }

    #[test]
    fn decision_constructors() {
        let allow = Decision::allow("whitelist");
        assert!(allow.allowed);
        assert_eq!(allow.reason, "whitelist");

        let deny = Decision::deny("user denied");
        assert!(!deny.allowed);
        assert_eq!(deny.reason, "user denied");
    }

    #[test]
    fn confirm_response_from_key() {
        assert_eq!(ConfirmResponse::from_key('y'), ConfirmResponse::AllowOnce);
        assert_eq!(ConfirmResponse::from_key('Y'), ConfirmResponse::AllowOnce);
        assert_eq!(ConfirmResponse::from_key('a'), ConfirmResponse::AllowAlways);
        assert_eq!(ConfirmResponse::from_key('q'), ConfirmResponse::Abort);
        assert_eq!(ConfirmResponse::from_key('n'), ConfirmResponse::Deny);
        // Unrecognized keys deny rather than re-prompt.
        assert_eq!(ConfirmResponse::from_key('x'), ConfirmResponse::Deny);
        assert_eq!(ConfirmResponse::from_key(' '), ConfirmResponse::Deny);
    }

    #[test]
    fn request_requires_approval_by_default() {
        let request = ToolCallRequest::new(
            "bash",
            ToolArgs::from_pairs([("command", json!("ls"))]),
            RiskLevel::High,
            "run command: ls",
        );
        assert!(request.requires_approval);
    }
}
