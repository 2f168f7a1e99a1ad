//! Canonical record and repository grouping types.
//!
//! A [`ApiRecord`] is the layout-independent shape every parser emits: a
//! string-keyed field map where optional fields are absent rather than null.
//! [`RepositoryGroups`] indexes emitted records by their normalized
//! repository identity while preserving the order in which sources were
//! encountered.

use std::collections::{btree_map, BTreeMap};

use serde::{Deserialize, Serialize};

use crate::{
    fields::REPOSITORY_URL,
    normalizer::normalize_repo_url
};

/// One API metadata record in canonical field vocabulary.
///
/// Records are constructed additively during parsing and never mutated
/// afterwards. Inserting a canonical key that is already populated replaces
/// the previous value; the last written value wins, matching the
/// field-by-field scan order of the source sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiRecord {
    fields: BTreeMap<String, String>
}

impl ApiRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under the canonical `key`, replacing any earlier value.
    pub fn insert<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>
    {
        self.fields.insert(key.into(), value.into());
    }

    /// Returns the value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Returns the value stored under `key` when it is non-empty.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !value.is_empty())
    }

    /// Returns the raw repository URL carried by this record, if any.
    pub fn repository_url(&self) -> Option<&str> {
        self.get(REPOSITORY_URL)
    }

    /// Reports whether the record qualifies for emission.
    ///
    /// A record is only emitted when it carries a non-empty repository URL;
    /// everything else is best-effort.
    pub fn has_repository_url(&self) -> bool {
        self.get_non_empty(REPOSITORY_URL).is_some()
    }

    /// Number of populated fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Reports whether the record holds no fields at all.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over `(key, value)` pairs in canonical key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

/// Records indexed by normalized repository identity.
///
/// Every record in a group normalizes to exactly that group's key, and the
/// records of a group appear in source encounter order: sheet order first,
/// then column order within a sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RepositoryGroups {
    groups: BTreeMap<String, Vec<ApiRecord>>
}

impl RepositoryGroups {
    /// Creates an empty group map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the group map from records in emission order.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = ApiRecord>
    {
        let mut groups = Self::new();
        for record in records {
            groups.push(record);
        }
        groups
    }

    /// Appends a record to the group owning its normalized repository URL.
    ///
    /// Records without a repository URL are silently discarded; parsers drop
    /// them before grouping, so this is a second line of defense only.
    pub fn push(&mut self, record: ApiRecord) {
        let key = normalize_repo_url(record.repository_url().unwrap_or_default());
        if key.is_empty() {
            return;
        }
        self.groups.entry(key).or_default().push(record);
    }

    /// Returns the records grouped under the provided normalized identity.
    pub fn get(&self, normalized_url: &str) -> Option<&[ApiRecord]> {
        self.groups.get(normalized_url).map(Vec::as_slice)
    }

    /// Number of distinct repository identities.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Reports whether no repository produced any record.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of records across all groups.
    pub fn record_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Iterates over `(normalized_url, records)` pairs.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Vec<ApiRecord>> {
        self.groups.iter()
    }

    /// Flattens all groups back into a single record list.
    ///
    /// Within each group the original emission order is preserved, so the
    /// multiset of records matches the pre-grouping emission exactly.
    pub fn flatten(&self) -> Vec<&ApiRecord> {
        self.groups.values().flat_map(|records| records.iter()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{ApiRecord, RepositoryGroups};
    use crate::fields::REPOSITORY_URL;

    fn record_for(url: &str) -> ApiRecord {
        let mut record = ApiRecord::new();
        record.insert(REPOSITORY_URL, url);
        record
    }

    #[test]
    fn insert_overwrites_earlier_values() {
        let mut record = ApiRecord::new();
        record.insert("version", "1.0");
        record.insert("version", "2.0");

        assert_eq!(record.get("version"), Some("2.0"));
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn absent_fields_are_absent_not_empty() {
        let record = ApiRecord::new();
        assert_eq!(record.get("description"), None);
        assert!(record.is_empty());
    }

    #[test]
    fn empty_repository_url_does_not_qualify() {
        let mut record = ApiRecord::new();
        record.insert(REPOSITORY_URL, "");
        assert!(!record.has_repository_url());

        record.insert(REPOSITORY_URL, "https://x.com/a");
        assert!(record.has_repository_url());
    }

    #[test]
    fn get_non_empty_filters_blank_values() {
        let mut record = ApiRecord::new();
        record.insert("description", "");
        assert_eq!(record.get_non_empty("description"), None);
        assert_eq!(record.get("description"), Some(""));
    }

    #[test]
    fn raw_spellings_collapse_into_one_group() {
        let groups = RepositoryGroups::from_records(vec![
            record_for("https://x.com/a"),
            record_for("https://x.com/a.git"),
            record_for("HTTPS://X.com/A/"),
        ]);

        assert_eq!(groups.len(), 1);
        let members = groups.get("https://x.com/a").expect("group should exist");
        assert_eq!(members.len(), 3);
        assert_eq!(members[0].repository_url(), Some("https://x.com/a"));
        assert_eq!(members[1].repository_url(), Some("https://x.com/a.git"));
        assert_eq!(members[2].repository_url(), Some("HTTPS://X.com/A/"));
    }

    #[test]
    fn groups_are_keyed_by_normalized_form_only() {
        let groups = RepositoryGroups::from_records(vec![record_for("https://x.com/A.git")]);
        assert!(groups.get("https://x.com/a").is_some());
        assert!(groups.get("https://x.com/A.git").is_none());
    }

    #[test]
    fn records_without_repository_url_are_discarded() {
        let mut groups = RepositoryGroups::new();
        groups.push(ApiRecord::new());
        assert!(groups.is_empty());
    }

    #[test]
    fn flatten_reproduces_the_emitted_multiset() {
        let mut first = record_for("https://x.com/a");
        first.insert("version", "1");
        let mut second = record_for("https://x.com/b");
        second.insert("version", "2");
        let mut third = record_for("https://x.com/a.git");
        third.insert("version", "3");

        let emitted = vec![first.clone(), second.clone(), third.clone()];
        let groups = RepositoryGroups::from_records(emitted.clone());

        let mut flattened: Vec<ApiRecord> = groups.flatten().into_iter().cloned().collect();
        let mut expected = emitted;
        let key = |record: &ApiRecord| {
            (
                record.repository_url().unwrap_or_default().to_owned(),
                record.get("version").unwrap_or_default().to_owned()
            )
        };
        flattened.sort_by_key(key);
        expected.sort_by_key(key);
        assert_eq!(flattened, expected);
        assert_eq!(groups.record_count(), 3);
    }

    #[test]
    fn group_members_keep_encounter_order() {
        let mut early = record_for("https://x.com/a");
        early.insert("version", "1");
        let mut late = record_for("https://x.com/a/");
        late.insert("version", "2");

        let groups = RepositoryGroups::from_records(vec![early, late]);
        let members = groups.get("https://x.com/a").expect("group should exist");
        assert_eq!(members[0].get("version"), Some("1"));
        assert_eq!(members[1].get("version"), Some("2"));
    }

    #[test]
    fn record_serializes_as_flat_map() {
        let mut record = record_for("https://x.com/a");
        record.insert("version", "2.0");

        let json = serde_json::to_string(&record).expect("serialization failed");
        assert_eq!(
            json,
            "{\"repository_url\":\"https://x.com/a\",\"version\":\"2.0\"}"
        );
    }
}
