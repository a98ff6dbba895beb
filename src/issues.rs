use crate::priority;

/// One issue as last fetched. Never mutated; each refresh replaces the whole
/// list for a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub key: String,
    pub summary: String,
    pub status: String,
    pub priority: Option<String>,
}

/// A workflow transition the tracker offers for a specific issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub id: String,
    pub name: String,
}

/// Client-side sort applied to a group's fetched list. When a group has no
/// sort configured the tracker's order (the JQL `ORDER BY`) is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Priority,
    Status,
    Key,
}

impl SortKey {
    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("priority") {
            Some(SortKey::Priority)
        } else if value.eq_ignore_ascii_case("status") {
            Some(SortKey::Status)
        } else if value.eq_ignore_ascii_case("key") {
            Some(SortKey::Key)
        } else {
            None
        }
    }

    /// Stable sort, so issues that compare equal keep the tracker's order.
    pub fn apply(self, issues: &mut [Issue]) {
        match self {
            SortKey::Priority => issues.sort_by_key(|issue| {
                issue
                    .priority
                    .as_deref()
                    .map(priority::rank)
                    .unwrap_or(usize::MAX)
            }),
            SortKey::Status => issues.sort_by(|a, b| a.status.cmp(&b.status)),
            // Lexical, not numeric: "PROJ-10" sorts before "PROJ-2".
            SortKey::Key => issues.sort_by(|a, b| a.key.cmp(&b.key)),
        }
    }
}
