//! # Optimistic mutations
//!
//! A controller that wants a change to show up before the backend confirms it
//! puts a *tentative* record in front of its list, sends the mutation, and
//! then either
//!
//! - **confirms**: replaces the whole list with an authoritative refetch, which
//!   also drops the tentative record, or
//! - **rolls back**: removes exactly the tentative record, leaving the list as
//!   it was before the attempt.
//!
//! Tentative records carry a [`TentativeId`] (`temp-<uuid>`), which can never
//! equal a server id. A list holds at most one tentative record at a time.
//!
//! [`OptimisticFlag`] is the single-boolean version: flip now, revert if the
//! call fails.

use api::Review;

const TENTATIVE_PREFIX: &str = "temp-";

/// Id given to a record that exists only locally.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TentativeId(String);

impl TentativeId {
    pub fn new() -> Self {
        Self(format!("{TENTATIVE_PREFIX}{}", uuid::Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// True for ids minted by [`TentativeId::new`].
    pub fn is_tentative(id: &str) -> bool {
        id.starts_with(TENTATIVE_PREFIX)
    }
}

impl Default for TentativeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TentativeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Records with a stable string id.
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for Review {
    fn key(&self) -> &str {
        &self.id
    }
}

/// A newest-first list with room for one tentative record.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimisticList<T> {
    items: Vec<T>,
    pending: Option<String>,
}

impl<T> Default for OptimisticList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            pending: None,
        }
    }
}

impl<T: Keyed + Clone> OptimisticList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Id of the tentative record, if one is showing.
    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// Show `item` at the top. Refused while another record is tentative.
    pub fn begin(&mut self, item: T) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.pending = Some(item.key().to_string());
        self.items.insert(0, item);
        true
    }

    /// Replace everything with the authoritative list. Ends any tentative
    /// record.
    pub fn confirm(&mut self, items: Vec<T>) {
        self.items = items;
        self.pending = None;
    }

    /// Remove exactly the tentative record.
    pub fn rollback(&mut self) -> Option<T> {
        let key = self.pending.take()?;
        let index = self.items.iter().position(|item| item.key() == key)?;
        Some(self.items.remove(index))
    }

    /// Load a fresh list without ending the pending mutation; the tentative
    /// record stays on top until it is confirmed or rolled back.
    pub fn refresh(&mut self, items: Vec<T>) {
        let tentative = self.pending.as_deref().and_then(|key| {
            self.items.iter().find(|item| item.key() == key).cloned()
        });
        self.items = items;
        if let Some(item) = tentative {
            self.items.insert(0, item);
        }
    }
}

/// A boolean shown optimistically.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptimisticFlag {
    value: bool,
    pending: bool,
}

impl OptimisticFlag {
    pub fn new(value: bool) -> Self {
        Self {
            value,
            pending: false,
        }
    }

    pub fn value(&self) -> bool {
        self.value
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Flip and return the new value, or `None` while a flip is in flight.
    pub fn flip(&mut self) -> Option<bool> {
        if self.pending {
            return None;
        }
        self.value = !self.value;
        self.pending = true;
        Some(self.value)
    }

    /// Keep the flipped value.
    pub fn settle(&mut self) {
        self.pending = false;
    }

    /// Undo the in-flight flip.
    pub fn revert(&mut self) {
        if self.pending {
            self.value = !self.value;
            self.pending = false;
        }
    }

    /// Overwrite with a server value. Ignored mid-flip.
    pub fn load(&mut self, value: bool) -> bool {
        if self.pending {
            return false;
        }
        self.value = value;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row(String);

    impl Keyed for Row {
        fn key(&self) -> &str {
            &self.0
        }
    }

    fn rows(ids: &[&str]) -> Vec<Row> {
        ids.iter().map(|id| Row(id.to_string())).collect()
    }

    #[test]
    fn test_tentative_ids() {
        let id = TentativeId::new();
        assert!(TentativeId::is_tentative(id.as_str()));
        assert!(!TentativeId::is_tentative("3f2a9c"));
        assert_ne!(id, TentativeId::new());
    }

    #[test]
    fn test_rollback_restores_previous_list() {
        let mut list = OptimisticList::new();
        list.confirm(rows(&["b", "a"]));
        let before = list.clone();

        let tentative = TentativeId::new().into_string();
        assert!(list.begin(Row(tentative.clone())));
        assert_eq!(list.items()[0].0, tentative);
        assert_eq!(list.pending(), Some(tentative.as_str()));

        assert_eq!(list.rollback(), Some(Row(tentative)));
        assert_eq!(list, before);
    }

    #[test]
    fn test_one_tentative_at_a_time() {
        let mut list = OptimisticList::new();
        assert!(list.begin(Row("temp-1".into())));
        assert!(!list.begin(Row("temp-2".into())));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_confirm_drops_tentative() {
        let mut list = OptimisticList::new();
        list.confirm(rows(&["a"]));
        list.begin(Row("temp-1".into()));
        list.confirm(rows(&["b", "a"]));

        assert_eq!(list.items(), rows(&["b", "a"]).as_slice());
        assert_eq!(list.pending(), None);
        assert_eq!(list.rollback(), None);
    }

    #[test]
    fn test_refresh_keeps_tentative_on_top() {
        let mut list = OptimisticList::new();
        list.begin(Row("temp-1".into()));
        list.refresh(rows(&["c", "b"]));
        assert_eq!(list.items(), rows(&["temp-1", "c", "b"]).as_slice());
    }

    #[test]
    fn test_flag_flip_settle_revert() {
        let mut flag = OptimisticFlag::new(false);
        assert_eq!(flag.flip(), Some(true));
        assert_eq!(flag.flip(), None);
        assert!(!flag.load(false));
        flag.revert();
        assert!(!flag.value());

        assert_eq!(flag.flip(), Some(true));
        flag.settle();
        assert!(flag.value());
        assert!(!flag.is_pending());
    }
}
