//! LLM integration for refactoring advice
//!
//! The rendered dependency report is forwarded to a provider as the body of a
//! fixed analysis prompt. The core pipeline knows nothing about HTTP or API
//! keys; everything here is driven by explicit configuration.

mod advisor;
mod providers;

pub use advisor::{estimate_cost_usd, estimate_tokens, RefactorAdvisor};
pub use providers::create_advisor;
