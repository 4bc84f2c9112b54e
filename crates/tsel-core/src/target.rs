//! Target JVM model and the ordered, key-unique target list

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Metadata the discovery server attaches to a target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotations {
    #[serde(default)]
    pub platform: BTreeMap<String, String>,
    #[serde(default)]
    pub cryostat: BTreeMap<String, String>,
}

impl Annotations {
    pub fn is_empty(&self) -> bool {
        self.platform.is_empty() && self.cryostat.is_empty()
    }
}

/// A discoverable JVM process.
///
/// Within a [`TargetList`] a target is identified solely by `connect_url`.
/// `PartialEq` compares every field, so two targets with the same key but a
/// different alias are *not* equal. The selection logic relies on that to
/// tell a real change apart from a repeated selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    pub connect_url: String,
    #[serde(default)]
    pub alias: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Annotations::is_empty")]
    pub annotations: Annotations,
}

/// The "nothing selected" value: empty connect URL and alias.
pub const NO_TARGET: Target = Target {
    connect_url: String::new(),
    alias: String::new(),
    labels: BTreeMap::new(),
    annotations: Annotations {
        platform: BTreeMap::new(),
        cryostat: BTreeMap::new(),
    },
};

impl Target {
    pub fn new(alias: impl Into<String>, connect_url: impl Into<String>) -> Self {
        Self {
            connect_url: connect_url.into(),
            alias: alias.into(),
            labels: BTreeMap::new(),
            annotations: Annotations::default(),
        }
    }

    /// The "nothing selected" sentinel.
    pub fn none() -> Self {
        NO_TARGET
    }

    /// True for the sentinel value.
    pub fn is_none(&self) -> bool {
        self.connect_url.is_empty() && self.alias.is_empty()
    }

    /// Builder: add a label
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// True when both targets share the same connect URL.
    pub fn same_key(&self, other: &Target) -> bool {
        self.connect_url == other.connect_url
    }

    /// Option label as shown in the dropdown: `alias (connectUrl)`.
    pub fn display_label(&self) -> String {
        format!("{} ({})", self.alias, self.connect_url)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "<no target>")
        } else {
            write!(f, "{}", self.display_label())
        }
    }
}

/// Ordered collection of targets, unique by `connect_url`.
///
/// Order is insertion order and only matters for presentation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetList {
    targets: Vec<Target>,
}

impl TargetList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole list with a fetch result.
    ///
    /// Duplicate keys in the input collapse to one entry: the entry keeps the
    /// position of the first occurrence and the value of the last one.
    pub fn replace_all(&mut self, targets: Vec<Target>) {
        self.targets.clear();
        for target in targets {
            self.upsert(target);
        }
    }

    /// Insert or replace by `connect_url`.
    ///
    /// Returns `true` if an existing entry was replaced (in place), `false`
    /// if the target was appended.
    pub fn upsert(&mut self, target: Target) -> bool {
        match self.position(&target.connect_url) {
            Some(idx) => {
                self.targets[idx] = target;
                true
            }
            None => {
                self.targets.push(target);
                false
            }
        }
    }

    /// Remove the entry with the given `connect_url`, if present.
    pub fn remove(&mut self, connect_url: &str) -> Option<Target> {
        self.position(connect_url).map(|idx| self.targets.remove(idx))
    }

    pub fn get(&self, connect_url: &str) -> Option<&Target> {
        self.targets.iter().find(|t| t.connect_url == connect_url)
    }

    pub fn contains(&self, connect_url: &str) -> bool {
        self.position(connect_url).is_some()
    }

    pub fn position(&self, connect_url: &str) -> Option<usize> {
        self.targets.iter().position(|t| t.connect_url == connect_url)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Target> {
        self.targets.iter()
    }

    pub fn as_slice(&self) -> &[Target] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl From<Vec<Target>> for TargetList {
    fn from(targets: Vec<Target>) -> Self {
        let mut list = Self::new();
        list.replace_all(targets);
        list
    }
}

impl<'a> IntoIterator for &'a TargetList {
    type Item = &'a Target;
    type IntoIter = std::slice::Iter<'a, Target>;

    fn into_iter(self) -> Self::IntoIter {
        self.targets.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(list: &TargetList) -> Vec<&str> {
        list.iter().map(|t| t.connect_url.as_str()).collect()
    }

    #[test]
    fn test_sentinel_is_none() {
        assert!(Target::none().is_none());
        assert!(!Target::new("A", "url1").is_none());
        assert_eq!(NO_TARGET, Target::default());
        assert_eq!(Target::none().to_string(), "<no target>");
    }

    #[test]
    fn test_equality_compares_all_fields() {
        let a = Target::new("A", "url1");
        let renamed = Target::new("A2", "url1");
        assert!(a.same_key(&renamed));
        assert_ne!(a, renamed);
        assert_eq!(a, Target::new("A", "url1"));
    }

    #[test]
    fn test_display_label() {
        let t = Target::new("es-andrewazor-demo-Main", "service:jmx:rmi:///jndi/rmi://app:9093/jmxrmi");
        assert_eq!(
            t.display_label(),
            "es-andrewazor-demo-Main (service:jmx:rmi:///jndi/rmi://app:9093/jmxrmi)"
        );
    }

    #[test]
    fn test_upsert_appends_when_absent() {
        let mut list = TargetList::new();
        assert!(!list.upsert(Target::new("A", "url1")));
        assert!(!list.upsert(Target::new("B", "url2")));
        assert_eq!(urls(&list), vec!["url1", "url2"]);
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut list = TargetList::from(vec![
            Target::new("A", "url1"),
            Target::new("B", "url2"),
            Target::new("C", "url3"),
        ]);

        assert!(list.upsert(Target::new("B2", "url2")));

        assert_eq!(list.len(), 3);
        assert_eq!(urls(&list), vec!["url1", "url2", "url3"]);
        assert_eq!(list.get("url2").unwrap().alias, "B2");
    }

    #[test]
    fn test_remove() {
        let mut list = TargetList::from(vec![Target::new("A", "url1"), Target::new("B", "url2")]);

        let removed = list.remove("url1");
        assert_eq!(removed, Some(Target::new("A", "url1")));
        assert_eq!(urls(&list), vec!["url2"]);
        assert_eq!(list.remove("missing"), None);
    }

    #[test]
    fn test_replace_all_collapses_duplicates_last_write_wins() {
        let mut list = TargetList::new();
        list.replace_all(vec![
            Target::new("A", "url1"),
            Target::new("B", "url2"),
            Target::new("A-new", "url1"),
        ]);

        assert_eq!(urls(&list), vec!["url1", "url2"]);
        assert_eq!(list.get("url1").unwrap().alias, "A-new");
    }

    #[test]
    fn test_deserialize_service_ref() {
        let json = r#"{
            "connectUrl": "service:jmx:rmi:///jndi/rmi://cryostat:9091/jmxrmi",
            "alias": "io.cryostat.Cryostat",
            "labels": {"app": "cryostat"},
            "annotations": {"platform": {}, "cryostat": {"HOST": "cryostat", "PORT": "9091"}}
        }"#;

        let target: Target = serde_json::from_str(json).unwrap();
        assert_eq!(target.alias, "io.cryostat.Cryostat");
        assert_eq!(target.labels.get("app").map(String::as_str), Some("cryostat"));
        assert_eq!(
            target.annotations.cryostat.get("PORT").map(String::as_str),
            Some("9091")
        );
    }

    #[test]
    fn test_deserialize_minimal_target() {
        let target: Target = serde_json::from_str(r#"{"connectUrl":"url1"}"#).unwrap();
        assert_eq!(target.connect_url, "url1");
        assert!(target.alias.is_empty());
        assert!(target.annotations.is_empty());
    }
}
