//! In-memory fetched data, one issue list per group. Refreshes replace a
//! group's list wholesale; groups that were not fetched (inactive, or absent
//! from this cycle) keep whatever they had.

use std::collections::{HashMap, HashSet};

use crate::issues::Issue;
use crate::priority;

#[derive(Debug, Default)]
pub struct IssueStore {
    issues: HashMap<String, Vec<Issue>>,
    seen: HashMap<String, HashSet<String>>,
}

impl IssueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a group's issues. Returns the issues whose keys were absent
    /// from the group's previous fetch, in fetch order, for notification.
    /// The first record for a group only seeds its key set and reports
    /// nothing, so a fresh start never floods the desktop.
    pub fn record(&mut self, group: &str, issues: Vec<Issue>) -> Vec<Issue> {
        let fresh = match self.seen.get(group) {
            None => Vec::new(),
            Some(previous) => issues
                .iter()
                .filter(|issue| !previous.contains(&issue.key))
                .cloned()
                .collect(),
        };

        self.seen.insert(
            group.to_string(),
            issues.iter().map(|issue| issue.key.clone()).collect(),
        );
        self.issues.insert(group.to_string(), issues);

        fresh
    }

    /// A failed fetch shows as an empty group. Other groups are untouched,
    /// and the issues reappearing on recovery will notify again.
    pub fn record_failure(&mut self, group: &str) {
        let _ = self.record(group, Vec::new());
    }

    pub fn group(&self, name: &str) -> &[Issue] {
        self.issues.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Look an issue up by key across every recorded group. Pinned tickets
    /// can come from any of them.
    pub fn find(&self, key: &str) -> Option<&Issue> {
        self.issues
            .values()
            .flat_map(|issues| issues.iter())
            .find(|issue| issue.key == key)
    }

    /// Total issue count across the named groups.
    pub fn count<'a, I>(&self, groups: I) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        groups.into_iter().map(|name| self.group(name).len()).sum()
    }

    /// Most urgent priority present across the named groups, by the fixed
    /// precedence table.
    pub fn highest_priority<'a, I>(&self, groups: I) -> Option<&'static str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        priority::highest(
            groups
                .into_iter()
                .flat_map(|name| self.group(name).iter())
                .filter_map(|issue| issue.priority.as_deref()),
        )
    }
}
