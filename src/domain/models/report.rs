use serde::Serialize;

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub name: String,
    pub commits: u64,
    pub fork: bool,
}

/// Commit counts per repository, ordered by case-insensitive name.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub entries: Vec<ReportEntry>,
}

impl Report {
    /// Sorts `entries` by lowercased name. The sort is stable, so names that
    /// fold to the same key keep the order the API listed them in.
    pub fn from_entries(mut entries: Vec<ReportEntry>) -> Self {
        entries.sort_by_cached_key(|entry| entry.name.to_lowercase());
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReportEntry> {
        self.entries.iter()
    }
}
