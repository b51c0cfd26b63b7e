/// Namespace roots that never belong to a scanned project: the platform's own
/// packages plus a handful of ubiquitous annotation/serialization libraries
/// that show up as import noise in most codebases.
const STANDARD_PREFIXES: &[&str] = &[
    "java.",
    "javax.",
    "jakarta.",
    "jdk.",
    "sun.",
    "com.sun.",
    "org.w3c.",
    "org.xml.",
    "org.omg.",
    "lombok.",
    "com.fasterxml.jackson.",
    "com.google.gson.",
    "org.slf4j.",
    "org.junit.",
    "org.jetbrains.annotations",
];

/// Decides whether a fully-qualified name is external to the project and
/// therefore excluded from the dependency graph.
#[derive(Debug, Clone)]
pub struct DependencyClassifier {
    package_prefix: String,
}

impl DependencyClassifier {
    pub fn new(package_prefix: impl Into<String>) -> Self {
        Self {
            package_prefix: package_prefix.into(),
        }
    }

    pub fn package_prefix(&self) -> &str {
        &self.package_prefix
    }

    /// Pure and total: every name gets a verdict, never an error.
    ///
    /// With no project prefix configured, only the standard-library set is
    /// external here; internal filtering then falls back to membership in the
    /// scanned unit set, which is the graph builder's job.
    pub fn is_external(&self, fully_qualified_name: &str) -> bool {
        if STANDARD_PREFIXES
            .iter()
            .any(|prefix| fully_qualified_name.starts_with(prefix))
        {
            return true;
        }

        if !self.package_prefix.is_empty() && !self.matches_project_prefix(fully_qualified_name) {
            return true;
        }

        false
    }

    /// Prefix match on the dotted path, not a substring match: `com.example`
    /// covers `com.example.Foo` but not `com.examples.Foo`.
    fn matches_project_prefix(&self, name: &str) -> bool {
        name == self.package_prefix
            || (name.len() > self.package_prefix.len()
                && name.starts_with(&self.package_prefix)
                && name.as_bytes()[self.package_prefix.len()] == b'.')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_library_is_external() {
        let classifier = DependencyClassifier::new("com.example");
        assert!(classifier.is_external("java.util.List"));
        assert!(classifier.is_external("javax.annotation.Nullable"));
        assert!(classifier.is_external("com.fasterxml.jackson.databind.ObjectMapper"));
        assert!(classifier.is_external("lombok.Data"));
    }

    #[test]
    fn test_project_prefix_filtering() {
        let classifier = DependencyClassifier::new("com.example");
        assert!(!classifier.is_external("com.example.OrderService"));
        assert!(!classifier.is_external("com.example.billing.Invoice"));
        assert!(classifier.is_external("org.other.Thing"));
    }

    #[test]
    fn test_prefix_match_is_on_dotted_path_not_substring() {
        let classifier = DependencyClassifier::new("com.example");
        assert!(classifier.is_external("com.examples.Foo"));
        assert!(classifier.is_external("com.exampleextra.Foo"));
        assert!(!classifier.is_external("com.example"));
    }

    #[test]
    fn test_empty_prefix_is_permissive() {
        let classifier = DependencyClassifier::new("");
        assert!(!classifier.is_external("com.anything.Goes"));
        assert!(classifier.is_external("java.util.Map"));
    }
}
