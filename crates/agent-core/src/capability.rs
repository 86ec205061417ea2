//! Reasoning capability trait definition

use crate::{Result, RoleConfig};
use async_trait::async_trait;

/// A text-generating reasoning engine
///
/// Every reasoning stage goes through this one interface. Behavioural
/// differences between stages live entirely in the [`RoleConfig`] passed
/// with each call, so callers never branch on which role they are invoking.
///
/// Implementations bound their own latency and report failure through
/// `Err`; callers do not retry.
#[async_trait]
pub trait ReasoningCapability: Send + Sync {
    /// Generate text for `prompt` under the behavioural contract of `role`
    async fn generate(&self, prompt: &str, role: &RoleConfig) -> Result<String>;

    /// Short identifier of the backing engine (e.g. "groq", "openai")
    fn name(&self) -> &str;
}
