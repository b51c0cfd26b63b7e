mod classifier;
mod engine;
mod extractor;
mod formatter;
mod graph;

// LLM advice collaborator
mod llm;

pub use classifier::DependencyClassifier;
pub use extractor::{RegexExtractor, SourceExtractor, SourceUnit};
pub use formatter::GraphFormatter;
pub use graph::{DependencyGraph, GraphBuilder};
pub use llm::{create_advisor, estimate_cost_usd, estimate_tokens, RefactorAdvisor};

// Export the main engine
pub use engine::{Engine, ScanOptions, ScanSummary};
