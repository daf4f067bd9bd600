//! Hierarchical display of a flat file list.

use std::path::{Component, Path, PathBuf};

const TEE: &str = "├── ";
const CORNER: &str = "└── ";
const PIPE: &str = "│   ";
const BLANK: &str = "    ";

/// One node of the rendered tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileTreeNode {
    Leaf(String),
    Branch(String, Vec<FileTreeNode>),
}

/// Build the tree for `files`, keeping first-seen order at every level
pub fn build_tree(files: &[PathBuf]) -> Vec<FileTreeNode> {
    let mut roots = Vec::new();
    for file in files {
        let segments = segments(file);
        if !segments.is_empty() {
            insert(&mut roots, &segments);
        }
    }
    roots
}

fn segments(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(os_str) => Some(os_str.to_string_lossy().to_string()),
            _ => None,
        })
        .collect()
}

fn insert(nodes: &mut Vec<FileTreeNode>, segments: &[String]) {
    let (head, rest) = match segments.split_first() {
        Some(split) => split,
        None => return,
    };

    if rest.is_empty() {
        let exists = nodes
            .iter()
            .any(|node| matches!(node, FileTreeNode::Leaf(name) if name == head));
        if !exists {
            nodes.push(FileTreeNode::Leaf(head.clone()));
        }
        return;
    }

    // Reuse an existing branch before considering leaves with the same name
    let existing = nodes
        .iter()
        .position(|node| matches!(node, FileTreeNode::Branch(name, _) if name == head));

    let idx = match existing {
        Some(idx) => idx,
        None => {
            nodes.push(FileTreeNode::Branch(head.clone(), Vec::new()));
            nodes.len() - 1
        }
    };

    if let FileTreeNode::Branch(_, children) = &mut nodes[idx] {
        insert(children, rest);
    }
}

/// Render `files` as tree lines. Branches carry a trailing `/`.
pub fn render(files: &[PathBuf]) -> Vec<String> {
    let mut lines = Vec::new();
    render_nodes(&build_tree(files), "", &mut lines);
    lines
}

fn render_nodes(nodes: &[FileTreeNode], prefix: &str, lines: &mut Vec<String>) {
    for (i, node) in nodes.iter().enumerate() {
        let last = i + 1 == nodes.len();
        let connector = if last { CORNER } else { TEE };

        match node {
            FileTreeNode::Leaf(name) => lines.push(format!("{prefix}{connector}{name}")),
            FileTreeNode::Branch(name, children) => {
                lines.push(format!("{prefix}{connector}{name}/"));
                let child_prefix = format!("{prefix}{}", if last { BLANK } else { PIPE });
                render_nodes(children, &child_prefix, lines);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(items: &[&str]) -> Vec<PathBuf> {
        items.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_build_tree_groups_shared_directories() {
        let tree = build_tree(&paths(&["src/a.js", "index.js", "src/lib/b.js", "src/c.js"]));
        assert_eq!(
            tree,
            vec![
                FileTreeNode::Branch(
                    "src".into(),
                    vec![
                        FileTreeNode::Leaf("a.js".into()),
                        FileTreeNode::Branch("lib".into(), vec![FileTreeNode::Leaf("b.js".into())]),
                        FileTreeNode::Leaf("c.js".into()),
                    ]
                ),
                FileTreeNode::Leaf("index.js".into()),
            ]
        );
    }

    #[test]
    fn test_branch_and_leaf_with_same_name_coexist() {
        let tree = build_tree(&paths(&["out", "out/x.js", "out/y.js"]));
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0], FileTreeNode::Leaf("out".into()));
        match &tree[1] {
            FileTreeNode::Branch(name, children) => {
                assert_eq!(name, "out");
                assert_eq!(children.len(), 2);
            }
            other => panic!("expected branch, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_paths_render_once() {
        let lines = render(&paths(&["a.js", "a.js"]));
        assert_eq!(lines, vec!["└── a.js"]);
    }

    #[test]
    fn test_render_connectors_and_indentation() {
        let lines = render(&paths(&["src/a.js", "src/lib/b.js", "index.js"]));
        assert_eq!(
            lines,
            vec![
                "├── src/",
                "│   ├── a.js",
                "│   └── lib/",
                "│       └── b.js",
                "└── index.js",
            ]
        );
    }

    #[test]
    fn test_render_keeps_discovery_order() {
        let lines = render(&paths(&["z.js", "a.js"]));
        assert_eq!(lines, vec!["├── z.js", "└── a.js"]);
    }

    #[test]
    fn test_render_empty() {
        assert!(render(&[]).is_empty());
    }
}
