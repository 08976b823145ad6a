// ABOUTME: Library root for clawgate, a human-in-the-loop authorization pipeline for agent tool calls.
// ABOUTME: Re-exports the engine, core types, and the strategy/confirmer seams.

pub mod classify;
pub mod config;
pub mod confirm;
pub mod describe;
pub mod engine;
pub mod error;
pub mod history;
pub mod patterns;
pub mod policy;
pub mod strategy;
pub mod types;
pub mod whitelist;

pub use classify::{RiskClassifier, RiskRuleTable};
pub use config::GateConfig;
pub use confirm::{render_prompt, Confirmer, StdinConfirmer};
pub use describe::describe_tool_call;
pub use engine::PermissionEngine;
pub use error::GateError;
pub use history::{ApprovalHistory, ApprovalRecord, GateStats};
pub use patterns::{PatternSet, DANGEROUS_PATTERNS, SAFE_PATTERNS};
pub use policy::evaluate_policy;
pub use strategy::{AlwaysApprove, AlwaysReject, ApprovalStrategy};
pub use types::{
    ConfirmResponse, Decision, PermissionRule, RiskLevel, ToolArgs, ToolCallRequest, COMMAND_TOOL,
};
pub use whitelist::{WhitelistScope, WhitelistStore};
