// ABOUTME: Pluggable approval strategy for deciding tool calls without a prompt.
// ABOUTME: A synchronous, fallible yes/no over the request; failures become denials upstream.

use crate::types::ToolCallRequest;

/// Decides a request in place of interactive confirmation.
///
/// Installed via
/// [`PermissionEngine::with_strategy`](crate::engine::PermissionEngine::with_strategy).
/// Returning `Ok(true)` allows, `Ok(false)` denies; an `Err` is caught by
/// the engine and converted to a denial, never propagated. Anything that
/// needs real IO belongs behind the async
/// [`Confirmer`](crate::confirm::Confirmer) instead.
pub trait ApprovalStrategy: Send + Sync {
    fn decide(&self, request: &ToolCallRequest) -> anyhow::Result<bool>;
}

/// Any matching closure is a strategy.
impl<F> ApprovalStrategy for F
where
    F: Fn(&ToolCallRequest) -> anyhow::Result<bool> + Send + Sync,
{
    fn decide(&self, request: &ToolCallRequest) -> anyhow::Result<bool> {
        self(request)
    }
}

/// Strategy that approves every request. Useful for tests and trusted
/// sandboxes.
pub struct AlwaysApprove;

impl ApprovalStrategy for AlwaysApprove {
    fn decide(&self, _request: &ToolCallRequest) -> anyhow::Result<bool> {
        Ok(true)
    }
}

/// Strategy that rejects every request.
pub struct AlwaysReject;

impl ApprovalStrategy for AlwaysReject {
    fn decide(&self, _request: &ToolCallRequest) -> anyhow::Result<bool> {
        Ok(false)
    }
}
