//! Insertion-ordered duration tallies and top-N selection.

use indexmap::IndexMap;
use serde::Serialize;

/// Milliseconds accumulated per name, remembering first-insertion order.
///
/// The order is what breaks ties in [`top_n`]: of two names with equal
/// totals, the one seen first ranks first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Tally {
    entries: IndexMap<String, u64>,
}

impl Tally {
    /// Creates an empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `ms` to `name`, inserting it at the end when new.
    pub fn add(&mut self, name: &str, ms: u64) {
        if let Some(entry) = self.entries.get_mut(name) {
            *entry = entry.saturating_add(ms);
        } else {
            self.entries.insert(name.to_string(), ms);
        }
    }

    /// Milliseconds recorded for `name`.
    pub fn get(&self, name: &str) -> Option<u64> {
        self.entries.get(name).copied()
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(name, ms)| (name.as_str(), *ms))
    }

    /// Sum over all names, saturating at `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.entries.values().fold(0, |sum, ms| sum.saturating_add(*ms))
    }

    /// The `n` largest entries.
    pub fn top(&self, n: usize) -> Vec<RankedEntry> {
        top_n(self.iter(), n)
    }
}

impl<'a> FromIterator<(&'a str, u64)> for Tally {
    fn from_iter<I: IntoIterator<Item = (&'a str, u64)>>(iter: I) -> Self {
        let mut tally = Self::new();
        for (name, ms) in iter {
            tally.add(name, ms);
        }
        tally
    }
}

/// A name and its accumulated milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    /// Artist, track key or album.
    pub name: String,
    /// Accumulated playback.
    pub ms_played: u64,
}

/// The `n` largest entries by value, descending; ties keep input order.
///
/// Returns `min(n, len)` entries, never padded.
pub fn top_n<'a, I>(entries: I, n: usize) -> Vec<RankedEntry>
where
    I: IntoIterator<Item = (&'a str, u64)>,
{
    if n == 0 {
        return Vec::new();
    }

    let ranked = entries
        .into_iter()
        .map(|(name, ms_played)| RankedEntry {
            name: name.to_string(),
            ms_played,
        })
        .collect();
    rank_by(ranked, n, |entry| entry.ms_played)
}

/// Keeps the `n` items with the largest `key`, descending, stable on ties.
pub fn rank_by<T, F>(mut items: Vec<T>, n: usize, key: F) -> Vec<T>
where
    F: Fn(&T) -> u64,
{
    items.sort_by(|a, b| key(b).cmp(&key(a)));
    items.truncate(n);
    items
}
