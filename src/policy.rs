// ABOUTME: Static policy rules for tool invocations.
// ABOUTME: Decides auto-approve, critical deny, and non-interactive outcomes without human input.

use crate::config::GateConfig;
use crate::types::{Decision, RiskLevel, ToolCallRequest};

/// Evaluate the rules that need no human or strategy judgment.
///
/// Returns `None` when the request must go on to a strategy or an
/// interactive prompt. The whitelist is checked by the engine before this
/// function runs.
pub fn evaluate_policy(config: &GateConfig, request: &ToolCallRequest) -> Option<Decision> {
    // Rule 1: low risk is auto-approved when configured.
    if config.auto_approve_low_risk && request.risk_level == RiskLevel::Low {
        return Some(Decision::allow("low-risk auto-approve"));
    }

    // Rule 2: critical requests never reach a human.
    if request.risk_level == RiskLevel::Critical {
        return Some(Decision::deny(format!(
            "dangerous operation rejected: {}",
            request.description,
        )));
    }

    // Rule 3: without a terminal, medium and below passes, the rest is
    // rejected.
    if !config.interactive {
        return Some(match request.risk_level {
            RiskLevel::Low | RiskLevel::Medium => Decision::allow("non-interactive auto-approve"),
            _ => Decision::deny("non-interactive reject of high risk"),
        });
    }

    None
}
