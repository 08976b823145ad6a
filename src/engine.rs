// ABOUTME: The authorization decision pipeline for agent tool calls.
// ABOUTME: Orders whitelist, static policy, strategy, and interactive confirmation into one check.

use std::sync::RwLock;

use crate::classify::{RiskClassifier, RiskRuleTable};
use crate::config::GateConfig;
use crate::confirm::{render_prompt, Confirmer, StdinConfirmer};
use crate::describe::describe_tool_call;
use crate::error::GateError;
use crate::history::{ApprovalHistory, ApprovalRecord, GateStats};
use crate::patterns::PatternSet;
use crate::policy::evaluate_policy;
use crate::strategy::ApprovalStrategy;
use crate::types::{ConfirmResponse, Decision, ToolArgs, ToolCallRequest, COMMAND_TOOL};
use crate::whitelist::{WhitelistScope, WhitelistStore};

/// Characters of a command kept when an approval is remembered.
const REMEMBER_PREFIX_CHARS: usize = 30;

/// Gates tool calls behind risk classification, whitelists, static policy,
/// and human or strategy judgment.
///
/// [`check`](Self::check) walks a strictly ordered chain and stops at the
/// first applicable rule: whitelist match, low-risk auto-approve, critical
/// deny, non-interactive policy, the pluggable strategy, and finally the
/// interactive prompt. Rule tables and pattern sets are frozen at
/// construction; only the whitelist and history mutate afterwards, behind
/// their own locks, so one engine can serve concurrent evaluations.
pub struct PermissionEngine {
    config: GateConfig,
    classifier: RiskClassifier,
    whitelist: RwLock<WhitelistStore>,
    history: RwLock<ApprovalHistory>,
    strategy: Option<Box<dyn ApprovalStrategy>>,
    confirmer: Box<dyn Confirmer>,
}

impl PermissionEngine {
    /// Build an engine from config. All configured patterns are compiled
    /// here; a bad pattern fails construction instead of surfacing later.
    pub fn new(config: GateConfig) -> Result<Self, GateError> {
        let dangerous = PatternSet::new(&config.deny_patterns)?;
        let safe = PatternSet::new(&config.auto_approve_patterns)?;
        let whitelist = WhitelistStore::with_permanent(&config.permanent_whitelist)?;

        Ok(Self {
            classifier: RiskClassifier::new(RiskRuleTable::new(), dangerous, safe),
            whitelist: RwLock::new(whitelist),
            history: RwLock::new(ApprovalHistory::new()),
            strategy: None,
            confirmer: Box::new(StdinConfirmer),
            config,
        })
    }

    /// Replace the built-in risk rules.
    pub fn with_rules(mut self, rules: RiskRuleTable) -> Self {
        self.classifier = self.classifier.with_rules(rules);
        self
    }

    /// Install a strategy that decides instead of the interactive prompt.
    pub fn with_strategy<S: ApprovalStrategy + 'static>(mut self, strategy: S) -> Self {
        self.strategy = Some(Box::new(strategy));
        self
    }

    /// Replace the interactive boundary (default: stdin).
    pub fn with_confirmer<C: Confirmer + 'static>(mut self, confirmer: C) -> Self {
        self.confirmer = Box::new(confirmer);
        self
    }

    /// Evaluate one tool call.
    ///
    /// Returns the decision, or [`GateError::Aborted`] when the operator
    /// chose to end the whole run; no other error can come out of a check.
    pub async fn check(
        &self,
        tool_name: &str,
        arguments: &ToolArgs,
    ) -> Result<Decision, GateError> {
        let risk_level = self.classifier.classify(tool_name, arguments);
        let description = describe_tool_call(tool_name, arguments);
        let request = ToolCallRequest::new(tool_name, arguments.clone(), risk_level, description);

        let result = self.decide(&request).await;
        match &result {
            Ok(decision) => tracing::info!(
                tool = tool_name,
                risk = risk_level.label(),
                allowed = decision.allowed,
                reason = %decision.reason,
                "authorization decision"
            ),
            Err(GateError::Aborted) => {
                tracing::info!(tool = tool_name, "run aborted at confirmation prompt");
            }
            Err(err) => {
                tracing::warn!(error = %err, tool = tool_name, "authorization check failed");
            }
        }
        result
    }

    async fn decide(&self, request: &ToolCallRequest) -> Result<Decision, GateError> {
        // Rule 1: a whitelist match approves outright, critical risk included.
        let whitelisted = {
            let whitelist = self.whitelist.read().expect("whitelist lock poisoned");
            whitelist.contains(&request.tool_name, &request.arguments)
        };
        if whitelisted {
            return Ok(Decision::allow("whitelist"));
        }

        // Rules 2-4: auto-approve, critical deny, non-interactive policy.
        if let Some(decision) = evaluate_policy(&self.config, request) {
            return Ok(decision);
        }

        // Rule 5: an installed strategy replaces the prompt entirely.
        if let Some(strategy) = &self.strategy {
            return Ok(self.run_strategy(strategy.as_ref(), request));
        }

        // Rule 6: ask the operator.
        self.interactive_confirm(request).await
    }

    fn run_strategy(&self, strategy: &dyn ApprovalStrategy, request: &ToolCallRequest) -> Decision {
        let decision = match strategy.decide(request) {
            Ok(true) => Decision::allow("strategy decision"),
            Ok(false) => Decision::deny("strategy decision"),
            Err(err) => {
                tracing::warn!(error = %err, tool = %request.tool_name, "approval strategy failed");
                Decision::deny("strategy error")
            }
        };
        self.record(request, &decision);
        decision
    }

    async fn interactive_confirm(&self, request: &ToolCallRequest) -> Result<Decision, GateError> {
        let prompt = render_prompt(request);
        let response = self.confirmer.confirm(request, &prompt).await;

        let decision = match response {
            ConfirmResponse::AllowOnce => Decision::allow("user approved"),
            ConfirmResponse::AllowAlways => {
                let pattern = remember_pattern(request);
                let mut whitelist = self.whitelist.write().expect("whitelist lock poisoned");
                if let Err(err) = whitelist.add(&pattern, WhitelistScope::Session) {
                    tracing::warn!(error = %err, pattern = %pattern, "could not remember approval");
                }
                drop(whitelist);
                Decision::allow("user approved and remembered")
            }
            ConfirmResponse::Deny => Decision::deny("user denied"),
            ConfirmResponse::Abort => return Err(GateError::Aborted),
        };

        self.record(request, &decision);
        Ok(decision)
    }

    fn record(&self, request: &ToolCallRequest, decision: &Decision) {
        self.history
            .write()
            .expect("history lock poisoned")
            .push(ApprovalRecord::now(request, decision));
    }

    /// Add a whitelist pattern directly, bypassing any prompt.
    pub fn add_to_whitelist(&self, pattern: &str, scope: WhitelistScope) -> Result<(), GateError> {
        self.whitelist
            .write()
            .expect("whitelist lock poisoned")
            .add(pattern, scope)
    }

    /// Clear session-scoped whitelist entries for a fresh session.
    pub fn reset_session(&self) {
        self.whitelist
            .write()
            .expect("whitelist lock poisoned")
            .reset_session();
    }

    /// Summary of pipeline activity and policy flags.
    pub fn stats(&self) -> GateStats {
        let (session_whitelist, permanent_whitelist) = {
            let whitelist = self.whitelist.read().expect("whitelist lock poisoned");
            (whitelist.session_len(), whitelist.permanent_len())
        };
        GateStats {
            total_requests: self.history_len(),
            session_whitelist,
            permanent_whitelist,
            auto_approve_low_risk: self.config.auto_approve_low_risk,
            interactive: self.config.interactive,
        }
    }

    /// Number of judged decisions so far.
    pub fn history_len(&self) -> usize {
        self.history.read().expect("history lock poisoned").len()
    }

    /// Snapshot of the judged-decision log. Taken under a read guard, so
    /// concurrent snapshots do not serialize behind each other.
    pub fn history(&self) -> Vec<ApprovalRecord> {
        self.history
            .read()
            .expect("history lock poisoned")
            .records()
            .to_vec()
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }
}

/// The pattern an allow-always response stores: an escaped literal prefix
/// of the command for command tools, the tool identifier otherwise.
fn remember_pattern(request: &ToolCallRequest) -> String {
    if request.tool_name == COMMAND_TOOL {
        let prefix: String = request
            .arguments
            .command()
            .unwrap_or("")
            .chars()
            .take(REMEMBER_PREFIX_CHARS)
            .collect();
        regex::escape(&prefix)
    } else {
        regex::escape(&request.tool_name)
    }
}
