use std::path::{Path, PathBuf};
use anyhow::Result;
use ignore::WalkBuilder;
use tracing::{debug, info, warn};

use crate::config::Config;
use super::{
    create_advisor, estimate_cost_usd, estimate_tokens, DependencyClassifier, DependencyGraph,
    GraphBuilder, GraphFormatter, RefactorAdvisor, RegexExtractor, SourceExtractor, SourceUnit,
};

/// Effective options for one scan, after CLI flags have been layered over the
/// loaded configuration
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub source_dir: PathBuf,
    pub package_prefix: String,
    pub class_references: bool,
    pub reverse_index: bool,
}

/// Outcome of a scan: the graph plus attempted-vs-parsed counts, so the caller
/// can report omissions to the user
pub struct ScanSummary {
    pub graph: DependencyGraph,
    pub files_attempted: usize,
    pub files_parsed: usize,
}

/// Main orchestration engine: walks the tree, extracts units, builds the
/// graph, renders the report, and optionally asks an LLM for advice
pub struct Engine {
    config: Config,
    advisor: Option<Box<dyn RefactorAdvisor>>,
}

impl Engine {
    pub async fn new(config_path: Option<&Path>) -> Result<Self> {
        let config = Config::load_or_default(config_path)?;

        debug!("Loaded configuration: {:?}", config);

        // Initialize the advisor if enabled; a broken LLM config degrades to
        // report-only operation instead of failing the scan
        let advisor = if config.llm.enabled {
            match create_advisor(&config.llm) {
                Ok(advisor) => {
                    info!("LLM advice enabled: {} ({})", advisor.provider_name(), advisor.model_name());
                    Some(advisor)
                }
                Err(e) => {
                    warn!("Failed to initialize LLM advisor: {}", e);
                    warn!("Continuing without refactoring advice");
                    None
                }
            }
        } else {
            debug!("LLM integration disabled");
            None
        };

        Ok(Self { config, advisor })
    }

    /// Scan a source tree and print the rendered dependency report
    pub async fn scan(
        &self,
        source: Option<PathBuf>,
        package_prefix: Option<String>,
        references: bool,
        no_reverse: bool,
    ) -> Result<()> {
        let options = self.resolve_options(source, package_prefix, references, no_reverse)?;
        let summary = self.analyze(&options)?;

        print!("{}", GraphFormatter::render(&summary.graph));
        Ok(())
    }

    /// Scan, then forward the rendered report to the configured LLM provider
    /// and print its advice with a token/cost estimate
    pub async fn advise(
        &self,
        source: Option<PathBuf>,
        package_prefix: Option<String>,
        references: bool,
        no_reverse: bool,
    ) -> Result<()> {
        let advisor = self
            .advisor
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("LLM advice requires [llm] enabled = true in the config"))?;

        let options = self.resolve_options(source, package_prefix, references, no_reverse)?;
        let summary = self.analyze(&options)?;
        let report = GraphFormatter::render(&summary.graph);

        print!("{}", report);

        if summary.graph.type_count() == 0 {
            info!("Nothing to review: no project types found");
            return Ok(());
        }

        info!("Requesting refactoring advice from {}", advisor.provider_name());
        let response = advisor
            .advise(&report)
            .await
            .map_err(|e| anyhow::anyhow!("Advice request failed: {}", e))?;

        println!("\n--- Refactoring advice ({}) ---\n", advisor.model_name());
        println!("{}", response.content);

        let prompt_tokens = estimate_tokens(&report);
        let completion_tokens = response
            .tokens_used
            .map(|total| total.saturating_sub(prompt_tokens))
            .unwrap_or_else(|| estimate_tokens(&response.content));

        match estimate_cost_usd(advisor.model_name(), prompt_tokens, completion_tokens) {
            Some(cost) => info!(
                "Estimated usage: ~{} prompt + ~{} completion tokens (~${:.4})",
                prompt_tokens, completion_tokens, cost
            ),
            None => info!(
                "Estimated usage: ~{} prompt + ~{} completion tokens",
                prompt_tokens, completion_tokens
            ),
        }

        Ok(())
    }

    /// Write a default config file for the current project
    pub async fn init(&self, path: Option<PathBuf>) -> Result<()> {
        let target = path.unwrap_or_else(|| PathBuf::from("Javadep.toml"));
        if target.exists() {
            anyhow::bail!("{} already exists", target.display());
        }

        Config::default().save(&target)?;
        info!("Wrote default configuration to {}", target.display());
        Ok(())
    }

    /// Walk the tree, extract every readable .java file, and fold the units
    /// into a graph. Unreadable or oversized files are logged and skipped,
    /// never fatal.
    pub fn analyze(&self, options: &ScanOptions) -> Result<ScanSummary> {
        let extractor = RegexExtractor::new(options.class_references)?;
        self.analyze_with(&extractor, options)
    }

    /// Same as analyze, but with a caller-supplied extraction strategy
    pub fn analyze_with(
        &self,
        extractor: &dyn SourceExtractor,
        options: &ScanOptions,
    ) -> Result<ScanSummary> {
        info!("Scanning {}", options.source_dir.display());

        let mut units: Vec<SourceUnit> = Vec::new();
        let mut files_attempted = 0;

        let walker = WalkBuilder::new(&options.source_dir)
            .hidden(false)
            .git_ignore(true)
            .build();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable directory entry: {}", e);
                    continue;
                }
            };

            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("java") {
                continue;
            }

            files_attempted += 1;

            let content = match std::fs::read_to_string(path) {
                Ok(content) => content,
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    continue;
                }
            };

            if content.len() > self.config.scan.max_file_size {
                warn!(
                    "Skipping {}: exceeds maximum file size ({} bytes)",
                    path.display(),
                    self.config.scan.max_file_size
                );
                continue;
            }

            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            units.push(extractor.extract(&content, &filename));
        }

        let files_parsed = units.len();
        info!("Parsed {}/{} Java files", files_parsed, files_attempted);

        let classifier = DependencyClassifier::new(options.package_prefix.clone());
        let graph = GraphBuilder::new(classifier)
            .with_class_references(options.class_references)
            .with_reverse_index(options.reverse_index)
            .build(&units);

        info!(
            "Dependency graph: {} types, {} edges",
            graph.type_count(),
            graph.edge_count()
        );
        if !graph.ambiguous_references.is_empty() {
            warn!(
                "{} bare names were ambiguous and skipped during reference resolution",
                graph.ambiguous_references.len()
            );
        }

        Ok(ScanSummary {
            graph,
            files_attempted,
            files_parsed,
        })
    }

    fn resolve_options(
        &self,
        source: Option<PathBuf>,
        package_prefix: Option<String>,
        references: bool,
        no_reverse: bool,
    ) -> Result<ScanOptions> {
        let source_dir = match source {
            Some(dir) => dir,
            None => self
                .config
                .project
                .source_dirs
                .first()
                .cloned()
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "no source directory configured; pass --source or set project.source_dirs"
                    )
                })?,
        };

        Ok(ScanOptions {
            source_dir,
            package_prefix: package_prefix
                .unwrap_or_else(|| self.config.project.package_prefix.clone()),
            class_references: references || self.config.scan.class_references,
            reverse_index: !no_reverse && self.config.scan.reverse_dependencies,
        })
    }
}
