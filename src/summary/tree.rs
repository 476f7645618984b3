// src/summary/tree.rs
// =============================================================================
// Renders results as a directory tree, like the Unix `tree` command:
//
//   /
//   ├── about
//   └── home
//       └── 123
//
// Each URL path is split on '/', and every segment either reuses a child
// with the same label or creates a new one. Children keep insertion order,
// and results are inserted sorted by target path.
//
// Nodes live in a Vec and refer to their children by index: no Rc/RefCell
// needed for a tree that only ever grows.
// =============================================================================

use std::fmt;

use crate::scan::ScanResult;

const ROOT: usize = 0;

#[derive(Debug)]
struct Node {
    label: String,
    children: Vec<usize>,
}

#[derive(Debug)]
pub struct ResultTree {
    nodes: Vec<Node>,
}

impl ResultTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                label: "/".to_string(),
                children: Vec::new(),
            }],
        }
    }

    // Builds the tree for a set of results, sorted by target path first
    pub fn from_results(results: &[ScanResult]) -> Self {
        let mut sorted: Vec<&ScanResult> = results.iter().collect();
        sorted.sort_by(|a, b| a.target.path.cmp(&b.target.path));

        let mut tree = Self::new();
        for result in sorted {
            tree.insert(result.url.path());
        }
        tree
    }

    // Adds a URL path, one branch per non-empty segment
    pub fn insert(&mut self, path: &str) {
        let mut current = ROOT;

        for segment in path.split('/').filter(|s| !s.is_empty()) {
            let existing = self.nodes[current]
                .children
                .iter()
                .copied()
                .find(|&child| self.nodes[child].label == segment);

            current = match existing {
                Some(child) => child,
                None => {
                    self.nodes.push(Node {
                        label: segment.to_string(),
                        children: Vec::new(),
                    });
                    let child = self.nodes.len() - 1;
                    self.nodes[current].children.push(child);
                    child
                }
            };
        }
    }

    fn render(&self, node: usize, prefix: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let children = &self.nodes[node].children;

        for (i, &child) in children.iter().enumerate() {
            let last = i + 1 == children.len();
            let (branch, indent) = if last {
                ("└── ", "    ")
            } else {
                ("├── ", "│   ")
            };

            writeln!(f, "{}{}{}", prefix, branch, self.nodes[child].label)?;
            self.render(child, &format!("{}{}", prefix, indent), f)?;
        }

        Ok(())
    }
}

impl Default for ResultTree {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ResultTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.nodes[ROOT].label)?;
        self.render(ROOT, "", f)
    }
}
