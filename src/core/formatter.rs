use super::graph::DependencyGraph;

/// Renders a DependencyGraph as a stable, human-readable report.
///
/// Output order is lexicographic by fully-qualified name at every level, so
/// the same graph always renders byte-for-byte identically. That stability is
/// what makes the report usable as a diff artifact and as LLM prompt input.
pub struct GraphFormatter;

impl GraphFormatter {
    pub fn render(graph: &DependencyGraph) -> String {
        if graph.dependencies.is_empty() {
            return String::new();
        }

        let mut blocks = Vec::new();

        // BTreeMap iteration is already sorted by key
        for (type_name, deps) in &graph.dependencies {
            let mut block = String::new();
            block.push_str(type_name);
            block.push('\n');
            block.push_str("  depends on: ");
            block.push_str(&Self::format_set(deps.iter()));

            if let Some(reverse) = &graph.reverse_dependencies {
                let dependents = reverse.get(type_name);
                block.push('\n');
                block.push_str("  used by: ");
                match dependents {
                    Some(set) => block.push_str(&Self::format_set(set.iter())),
                    // Absent key and empty set mean the same thing
                    None => block.push_str("none"),
                }
            }

            blocks.push(block);
        }

        let mut report = blocks.join("\n\n");
        report.push('\n');
        report
    }

    /// "none" for an empty set, to distinguish it from a rendering accident
    fn format_set<'a>(items: impl Iterator<Item = &'a String>) -> String {
        let joined = items.map(|s| s.as_str()).collect::<Vec<_>>().join(", ");
        if joined.is_empty() {
            "none".to_string()
        } else {
            joined
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::classifier::DependencyClassifier;
    use crate::core::extractor::SourceUnit;
    use crate::core::graph::GraphBuilder;
    use std::collections::BTreeSet;

    fn unit(package: &str, type_name: &str, imports: &[&str]) -> SourceUnit {
        SourceUnit {
            package: package.to_string(),
            type_name: type_name.to_string(),
            imports: imports.iter().map(|s| s.to_string()).collect(),
            class_references: BTreeSet::new(),
        }
    }

    #[test]
    fn test_empty_graph_renders_to_empty_string() {
        let graph = DependencyGraph::default();
        assert_eq!(GraphFormatter::render(&graph), "");
    }

    #[test]
    fn test_blocks_sorted_and_none_markers_present() {
        let units = vec![
            unit("com.example", "Zebra", &["com.example.Apple"]),
            unit("com.example", "Apple", &[]),
        ];
        let builder = GraphBuilder::new(DependencyClassifier::new("com.example"));
        let report = GraphFormatter::render(&builder.build(&units));

        let expected = "\
com.example.Apple
  depends on: none
  used by: com.example.Zebra

com.example.Zebra
  depends on: com.example.Apple
  used by: none
";
        assert_eq!(report, expected);
    }

    #[test]
    fn test_forward_only_graph_omits_used_by_lines() {
        let units = vec![unit("com.example", "A", &["com.example.B"])];
        let builder = GraphBuilder::new(DependencyClassifier::new("com.example"))
            .with_reverse_index(false);
        let report = GraphFormatter::render(&builder.build(&units));

        assert!(report.contains("depends on: com.example.B"));
        assert!(!report.contains("used by:"));
    }

    #[test]
    fn test_rendering_is_reproducible() {
        let units = vec![
            unit("com.example", "A", &["com.example.B", "com.example.C"]),
            unit("com.example", "B", &["com.example.C"]),
            unit("com.example", "C", &[]),
        ];
        let builder = GraphBuilder::new(DependencyClassifier::new("com.example"));

        let first = GraphFormatter::render(&builder.build(&units));
        let second = GraphFormatter::render(&builder.build(&units));
        assert_eq!(first, second);
    }
}
