// src/summary/diff.rs
// =============================================================================
// Line diff between two rendered trees, used by `result-diff` to compare two
// scans of the same target.
//
// Lines present in both trees are kept, lines only in the first are removed
// ("-"), lines only in the second are added ("+"). The diffing itself is
// done by `similar` (Myers), which stays linear in memory on large scans.
// =============================================================================

use std::fmt;

use similar::{ChangeTag, TextDiff};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Equal,
    Removed,
    Added,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub change: Change,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeDiff {
    lines: Vec<DiffLine>,
}

impl TreeDiff {
    pub fn lines(&self) -> &[DiffLine] {
        &self.lines
    }

    pub fn is_equal(&self) -> bool {
        self.lines.iter().all(|l| l.change == Change::Equal)
    }
}

impl fmt::Display for TreeDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            let marker = match line.change {
                Change::Equal => ' ',
                Change::Removed => '-',
                Change::Added => '+',
            };
            writeln!(f, "{} {}", marker, line.text)?;
        }
        Ok(())
    }
}

pub fn diff_trees(first: &str, second: &str) -> TreeDiff {
    let lines = TextDiff::from_lines(first, second)
        .iter_all_changes()
        .map(|change| DiffLine {
            change: match change.tag() {
                ChangeTag::Equal => Change::Equal,
                ChangeTag::Delete => Change::Removed,
                ChangeTag::Insert => Change::Added,
            },
            text: change.value().trim_end_matches(['\r', '\n']).to_string(),
        })
        .collect();

    TreeDiff { lines }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_trees() {
        let tree = "/\n├── about\n└── home\n";
        let diff = diff_trees(tree, tree);

        assert!(diff.is_equal());
        assert_eq!(diff.lines().len(), 3);
    }

    #[test]
    fn test_added_and_removed_lines() {
        let first = "/\n├── about\n└── home\n";
        let second = "/\n├── about\n├── contacts\n└── home\n";

        let diff = diff_trees(first, second);

        assert!(!diff.is_equal());
        let changes: Vec<(Change, &str)> = diff
            .lines()
            .iter()
            .map(|l| (l.change, l.text.as_str()))
            .collect();
        assert_eq!(
            changes,
            vec![
                (Change::Equal, "/"),
                (Change::Equal, "├── about"),
                (Change::Added, "├── contacts"),
                (Change::Equal, "└── home"),
            ]
        );
    }

    #[test]
    fn test_large_trees() {
        let first: String = (0..20_000).map(|i| format!("├── dir{}\n", i)).collect();
        let second = first.replace("├── dir10000\n", "├── dir10000\n├── extra\n");

        let diff = diff_trees(&first, &second);

        let added: Vec<&DiffLine> = diff
            .lines()
            .iter()
            .filter(|l| l.change != Change::Equal)
            .collect();
        assert_eq!(added.len(), 1);
        assert_eq!(added[0].change, Change::Added);
        assert_eq!(added[0].text, "├── extra");
    }

    #[test]
    fn test_display_markers() {
        let diff = diff_trees("/\n└── a\n", "/\n└── b\n");

        assert_eq!(diff.to_string(), "  /\n- └── a\n+ └── b\n");
    }
}
