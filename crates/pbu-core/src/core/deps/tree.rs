use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// One entry of `pipdeptree --json-tree` output.
///
/// `key` is the canonical package name and identifies the node; the other
/// fields are only used for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyNode {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installed_version: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<DependencyNode>,
}

pub(crate) fn parse_tree(json: &str) -> Result<Vec<DependencyNode>, serde_json::Error> {
    serde_json::from_str(json.trim())
}

/// Top-level node whose key matches `package`, ignoring case.
pub(crate) fn find_package_node<'a>(
    tree: &'a [DependencyNode],
    package: &str,
) -> Option<&'a DependencyNode> {
    tree.iter()
        .find(|node| node.key.eq_ignore_ascii_case(package))
}

/// Unique descendant keys in first-seen, depth-first order.
pub(crate) fn collect_dependency_names(dependencies: &[DependencyNode]) -> Vec<String> {
    fn walk(nodes: &[DependencyNode], seen: &mut HashSet<String>, names: &mut Vec<String>) {
        for node in nodes {
            if seen.insert(node.key.clone()) {
                names.push(node.key.clone());
                walk(&node.dependencies, seen, names);
            }
        }
    }

    let mut seen = HashSet::new();
    let mut names = Vec::new();
    walk(dependencies, &mut seen, &mut names);
    names
}

/// `- key (version)` lines indented two spaces per level, starting at one.
pub(crate) fn render_tree(dependencies: &[DependencyNode]) -> Vec<String> {
    fn render(nodes: &[DependencyNode], depth: usize, lines: &mut Vec<String>) {
        for node in nodes {
            let indent = "  ".repeat(depth);
            match &node.installed_version {
                Some(version) => lines.push(format!("{indent}- {} ({version})", node.key)),
                None => lines.push(format!("{indent}- {}", node.key)),
            }
            render(&node.dependencies, depth + 1, lines);
        }
    }

    let mut lines = Vec::new();
    render(dependencies, 1, &mut lines);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {"key": "pkga", "package_name": "PkgA", "installed_version": "1.0", "dependencies": [
            {"key": "dep1", "package_name": "Dep1", "installed_version": "1.0", "required_version": ">=1", "dependencies": [
                {"key": "shared", "installed_version": "0.3", "dependencies": []}
            ]},
            {"key": "dep2", "installed_version": "2.0", "dependencies": [
                {"key": "shared", "installed_version": "0.3", "dependencies": []}
            ]}
        ]},
        {"key": "lonely"}
    ]"#;

    #[test]
    fn nodes_are_found_case_insensitively() {
        let tree = parse_tree(SAMPLE).expect("valid tree");
        assert_eq!(find_package_node(&tree, "PKGA").map(|n| n.key.as_str()), Some("pkga"));
        assert!(find_package_node(&tree, "missing").is_none());
        let lonely = find_package_node(&tree, "lonely").expect("lonely");
        assert!(lonely.dependencies.is_empty());
        assert_eq!(lonely.installed_version, None);
    }

    #[test]
    fn descendants_are_unique_in_first_seen_order() {
        let tree = parse_tree(SAMPLE).expect("valid tree");
        let node = find_package_node(&tree, "pkga").expect("pkga");
        assert_eq!(
            collect_dependency_names(&node.dependencies),
            vec!["dep1", "shared", "dep2"]
        );
    }

    #[test]
    fn tree_is_indented_by_depth() {
        let tree = parse_tree(SAMPLE).expect("valid tree");
        let node = find_package_node(&tree, "pkga").expect("pkga");
        assert_eq!(
            render_tree(&node.dependencies),
            vec![
                "  - dep1 (1.0)",
                "    - shared (0.3)",
                "  - dep2 (2.0)",
                "    - shared (0.3)",
            ]
        );
    }

    #[test]
    fn entries_without_key_are_rejected() {
        assert!(parse_tree(r#"[{"package_name": "x"}]"#).is_err());
        assert!(parse_tree("invalid json").is_err());
    }
}
