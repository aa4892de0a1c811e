use std::collections::BTreeSet;

#[cfg(feature = "serde-derive")]
use serde::{Deserialize, Serialize};

use crate::{Detail, Finding, FindingKind};

/// Returns the key under which a finding is displayed and re-identified.
///
/// Track findings use the element name. Block findings append the member
/// count, as in `"X1 (4)"`, so the bare block name is always a strict prefix.
#[must_use]
pub fn display_key(finding: &Finding) -> String {
    match finding.kind {
        FindingKind::NonContiguousBlock => format!("{} ({})", finding.name, member_count(finding)),
        FindingKind::UnconnectedTrack | FindingKind::UnassignedBlockTrack => finding.name.clone(),
    }
}

/// Counts every named member of a block finding, whatever its highlight set.
fn member_count(finding: &Finding) -> usize {
    match &finding.detail {
        Detail::Components(components) => components.iter().map(BTreeSet::len).sum(),
        _ => finding.elements.len(),
    }
}

/// Strips a trailing `" (N)"` member count from a display key.
///
/// Keys without such a suffix are returned unchanged.
#[must_use]
pub fn bare_name(key: &str) -> &str {
    key.strip_suffix(')')
        .and_then(|rest| rest.rsplit_once(" ("))
        .filter(|(_, count)| !count.is_empty() && count.bytes().all(|b| b.is_ascii_digit()))
        .map_or(key, |(name, _)| name)
}

/// Display keys the caller had checked before a re-run.
///
/// Owned by the caller and carried from one run to the next.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub struct Selection(BTreeSet<String>);

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>) -> bool {
        self.0.insert(key.into())
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.0.remove(key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains(key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Returns `true` if a previously checked key refers to `finding`.
    ///
    /// Track findings match by exact key. Block findings match any key that
    /// starts with `"<block> ("`, since the member count may have changed.
    fn marks(&self, finding: &Finding) -> bool {
        match finding.kind {
            FindingKind::NonContiguousBlock => {
                let prefix = format!("{} (", finding.name);
                self.0.iter().any(|key| key.starts_with(&prefix))
            }
            FindingKind::UnconnectedTrack | FindingKind::UnassignedBlockTrack => {
                self.0.contains(&finding.name)
            }
        }
    }
}

impl<S: Into<String>> FromIterator<S> for Selection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// A finding together with its display key and check mark.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub struct Entry {
    pub finding: Finding,
    pub key: String,
    pub checked: bool,
}

/// The ordered findings of one check, ready for presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub struct FindingSet {
    kind: FindingKind,
    entries: Vec<Entry>,
}

impl FindingSet {
    /// Builds a finding set from one check's output.
    ///
    /// Findings of another kind are dropped. Block findings are sorted by
    /// block name; track findings keep the order they were found in. Entries
    /// matching `previous` are checked again.
    #[must_use]
    pub fn build(kind: FindingKind, findings: Vec<Finding>, previous: &Selection) -> Self {
        let mut findings: Vec<Finding> = findings.into_iter().filter(|f| f.kind == kind).collect();
        if kind == FindingKind::NonContiguousBlock {
            findings.sort_by(|a, b| a.name.cmp(&b.name));
        }

        let entries = findings
            .into_iter()
            .map(|finding| Entry {
                key: display_key(&finding),
                checked: previous.marks(&finding),
                finding,
            })
            .collect();

        Self { kind, entries }
    }

    #[must_use]
    pub fn kind(&self) -> FindingKind {
        self.kind
    }

    /// Returns `true` when the check found nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Returns the entry with the given display key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    /// Flips the check mark of an entry and returns its new state.
    pub fn toggle(&mut self, key: &str) -> Option<bool> {
        let entry = self.entries.iter_mut().find(|entry| entry.key == key)?;
        entry.checked = !entry.checked;
        Some(entry.checked)
    }

    /// Returns the keys of all checked entries, to carry into the next run.
    #[must_use]
    pub fn selection(&self) -> Selection {
        self.entries
            .iter()
            .filter(|entry| entry.checked)
            .map(|entry| entry.key.clone())
            .collect()
    }
}
