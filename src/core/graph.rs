use std::collections::{BTreeMap, BTreeSet};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::classifier::DependencyClassifier;
use super::extractor::SourceUnit;

/// Bidirectional dependency map between project-internal types.
///
/// Both maps are keyed by fully-qualified name and hold the invariant
/// `U ∈ dependencies[T] ⟺ T ∈ reverse_dependencies[U]`. Ordered collections
/// keep construction and rendering deterministic regardless of input order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DependencyGraph {
    /// Type → internal types it references
    pub dependencies: BTreeMap<String, BTreeSet<String>>,

    /// Type → types that reference it; derived from the forward map, absent
    /// when the caller did not ask for it
    pub reverse_dependencies: Option<BTreeMap<String, BTreeSet<String>>>,

    /// Bare names that matched more than one project type and were skipped
    /// during reference resolution (bare name → candidate FQNs)
    pub ambiguous_references: BTreeMap<String, BTreeSet<String>>,
}

impl DependencyGraph {
    pub fn type_count(&self) -> usize {
        self.dependencies.len()
    }

    pub fn edge_count(&self) -> usize {
        self.dependencies.values().map(|deps| deps.len()).sum()
    }
}

/// Folds a set of SourceUnits into a DependencyGraph. Pure: no fallible
/// operations of its own, every failure mode was already absorbed upstream.
pub struct GraphBuilder {
    classifier: DependencyClassifier,
    resolve_references: bool,
    include_reverse: bool,
}

impl GraphBuilder {
    pub fn new(classifier: DependencyClassifier) -> Self {
        Self {
            classifier,
            resolve_references: false,
            include_reverse: true,
        }
    }

    /// Resolve in-body class references through a bare-name lookup, catching
    /// same-package usages that carry no import statement
    pub fn with_class_references(mut self, enabled: bool) -> Self {
        self.resolve_references = enabled;
        self
    }

    /// The reverse index is cheap to derive; skip it only when the caller has
    /// no use for it
    pub fn with_reverse_index(mut self, enabled: bool) -> Self {
        self.include_reverse = enabled;
        self
    }

    pub fn build(&self, units: &[SourceUnit]) -> DependencyGraph {
        // Membership lookup, plus a bare-name multi-map for reference
        // resolution. The multi-map keeps duplicate simple names visible
        // instead of silently letting the last one win.
        let mut known_types = BTreeSet::new();
        let mut by_bare_name: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for unit in units {
            let fqn = unit.fully_qualified_name();
            by_bare_name
                .entry(unit.type_name.clone())
                .or_default()
                .insert(fqn.clone());
            known_types.insert(fqn);
        }

        let prefix_configured = !self.classifier.package_prefix().is_empty();
        let mut dependencies: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut ambiguous_references: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for unit in units {
            let fqn = unit.fully_qualified_name();
            let mut deps = BTreeSet::new();

            for import in &unit.imports {
                if self.classifier.is_external(import) {
                    continue;
                }
                // Without a configured prefix, "internal" means "we parsed it"
                if !prefix_configured && !known_types.contains(import) {
                    continue;
                }
                if *import != fqn {
                    deps.insert(import.clone());
                }
            }

            if self.resolve_references {
                for reference in &unit.class_references {
                    match by_bare_name.get(reference) {
                        Some(candidates) if candidates.len() == 1 => {
                            let resolved = candidates.iter().next().cloned().unwrap_or_default();
                            if resolved != fqn && !self.classifier.is_external(&resolved) {
                                deps.insert(resolved);
                            }
                        }
                        Some(candidates) => {
                            warn!(
                                "Ambiguous class reference '{}' matches {} types; skipping",
                                reference,
                                candidates.len()
                            );
                            ambiguous_references
                                .entry(reference.clone())
                                .or_default()
                                .extend(candidates.iter().cloned());
                        }
                        None => {}
                    }
                }
            }

            // Every successfully parsed unit gets an entry, dependencies or not
            dependencies.insert(fqn, deps);
        }

        let reverse_dependencies = if self.include_reverse {
            Some(Self::invert(&dependencies))
        } else {
            None
        };

        DependencyGraph {
            dependencies,
            reverse_dependencies,
            ambiguous_references,
        }
    }

    fn invert(
        dependencies: &BTreeMap<String, BTreeSet<String>>,
    ) -> BTreeMap<String, BTreeSet<String>> {
        let mut reverse: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for key in dependencies.keys() {
            reverse.entry(key.clone()).or_default();
        }

        for (source, targets) in dependencies {
            for target in targets {
                reverse
                    .entry(target.clone())
                    .or_default()
                    .insert(source.clone());
            }
        }

        reverse
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn unit(package: &str, type_name: &str, imports: &[&str]) -> SourceUnit {
        SourceUnit {
            package: package.to_string(),
            type_name: type_name.to_string(),
            imports: imports.iter().map(|s| s.to_string()).collect(),
            class_references: BTreeSet::new(),
        }
    }

    fn assert_symmetry(graph: &DependencyGraph) {
        let reverse = graph.reverse_dependencies.as_ref().unwrap();
        for (source, targets) in &graph.dependencies {
            for target in targets {
                assert!(
                    reverse.get(target).map_or(false, |r| r.contains(source)),
                    "missing reverse edge {} -> {}",
                    target,
                    source
                );
            }
        }
        for (target, sources) in reverse {
            for source in sources {
                assert!(
                    graph.dependencies[source].contains(target),
                    "reverse edge {} -> {} has no forward counterpart",
                    target,
                    source
                );
            }
        }
    }

    #[test]
    fn test_end_to_end_scenario() {
        let units = vec![
            unit("com.example", "A", &["com.example.B", "com.example.C"]),
            unit("com.example", "B", &["com.example.C"]),
            unit("com.example", "C", &[]),
        ];
        let builder = GraphBuilder::new(DependencyClassifier::new("com.example"));
        let graph = builder.build(&units);

        let a_deps: Vec<&str> = graph.dependencies["com.example.A"]
            .iter()
            .map(|s| s.as_str())
            .collect();
        assert_eq!(a_deps, vec!["com.example.B", "com.example.C"]);

        let reverse = graph.reverse_dependencies.as_ref().unwrap();
        assert_eq!(reverse["com.example.B"].len(), 1);
        assert!(reverse["com.example.B"].contains("com.example.A"));
        assert_eq!(reverse["com.example.C"].len(), 2);
        assert!(reverse["com.example.C"].contains("com.example.A"));
        assert!(reverse["com.example.C"].contains("com.example.B"));

        assert_symmetry(&graph);
    }

    #[test]
    fn test_standard_library_imports_filtered() {
        let units = vec![
            unit("com.example", "A", &["java.util.List", "com.example.B"]),
            unit("com.example", "B", &[]),
        ];
        let builder = GraphBuilder::new(DependencyClassifier::new("com.example"));
        let graph = builder.build(&units);

        assert_eq!(graph.dependencies["com.example.A"].len(), 1);
        assert!(graph.dependencies["com.example.A"].contains("com.example.B"));
    }

    #[test]
    fn test_no_self_dependency() {
        let units = vec![unit("com.example", "A", &["com.example.A", "com.example.B"])];
        let builder = GraphBuilder::new(DependencyClassifier::new("com.example"));
        let graph = builder.build(&units);

        assert!(!graph.dependencies["com.example.A"].contains("com.example.A"));
    }

    #[test]
    fn test_unit_with_no_dependencies_still_present() {
        let units = vec![unit("com.example", "Lonely", &[])];
        let builder = GraphBuilder::new(DependencyClassifier::new("com.example"));
        let graph = builder.build(&units);

        assert!(graph.dependencies["com.example.Lonely"].is_empty());
        let reverse = graph.reverse_dependencies.as_ref().unwrap();
        assert!(reverse["com.example.Lonely"].is_empty());
    }

    #[test]
    fn test_determinism_across_input_orderings() {
        let mut units = vec![
            unit("com.example", "A", &["com.example.B", "com.example.C"]),
            unit("com.example", "B", &["com.example.C"]),
            unit("com.example", "C", &["com.example.A"]),
        ];
        let builder = GraphBuilder::new(DependencyClassifier::new("com.example"));
        let first = builder.build(&units);

        units.reverse();
        let second = builder.build(&units);

        assert_eq!(first.dependencies, second.dependencies);
        assert_eq!(first.reverse_dependencies, second.reverse_dependencies);
    }

    #[test]
    fn test_empty_prefix_falls_back_to_membership() {
        let units = vec![
            unit("com.example", "A", &["com.example.B", "com.vendored.Widget"]),
            unit("com.example", "B", &[]),
        ];
        let builder = GraphBuilder::new(DependencyClassifier::new(""));
        let graph = builder.build(&units);

        // com.vendored.Widget was never parsed, so it is not internal here
        assert_eq!(graph.dependencies["com.example.A"].len(), 1);
        assert!(graph.dependencies["com.example.A"].contains("com.example.B"));
    }

    #[test]
    fn test_reference_resolution_same_package() {
        let mut a = unit("com.example", "A", &[]);
        a.class_references.insert("B".to_string());
        let units = vec![a, unit("com.example", "B", &[])];

        let builder = GraphBuilder::new(DependencyClassifier::new("com.example"))
            .with_class_references(true);
        let graph = builder.build(&units);

        assert!(graph.dependencies["com.example.A"].contains("com.example.B"));
        assert_symmetry(&graph);
    }

    #[test]
    fn test_ambiguous_bare_name_skipped_not_guessed() {
        let mut a = unit("com.example", "A", &[]);
        a.class_references.insert("Helper".to_string());
        let units = vec![
            a,
            unit("com.example.util", "Helper", &[]),
            unit("com.example.web", "Helper", &[]),
        ];

        let builder = GraphBuilder::new(DependencyClassifier::new("com.example"))
            .with_class_references(true);
        let graph = builder.build(&units);

        assert!(graph.dependencies["com.example.A"].is_empty());
        assert_eq!(graph.ambiguous_references["Helper"].len(), 2);
    }

    #[test]
    fn test_reverse_index_omitted_on_request() {
        let units = vec![unit("com.example", "A", &[])];
        let builder = GraphBuilder::new(DependencyClassifier::new("com.example"))
            .with_reverse_index(false);
        let graph = builder.build(&units);

        assert!(graph.reverse_dependencies.is_none());
    }
}
