//! Iterators and enumerators over stack items.

use crate::error::{VmError, VmResult};
use crate::stack_item::StackItem;

/// Cursor over a materialized list of key/value pairs.
///
/// The cursor starts before the first entry; `next` must be called before reading.
#[derive(Debug, Clone, Default)]
pub struct ItemIterator {
    entries: Vec<(StackItem, StackItem)>,
    index: Option<usize>,
}

impl ItemIterator {
    pub fn new(entries: Vec<(StackItem, StackItem)>) -> Self {
        Self {
            entries,
            index: None,
        }
    }

    /// Enumerates values, keyed by their position.
    pub fn from_values(values: Vec<StackItem>) -> Self {
        let entries = values
            .into_iter()
            .enumerate()
            .map(|(i, value)| (StackItem::from_int(i as i64), value))
            .collect();
        Self::new(entries)
    }

    /// Advances the cursor. Returns false once the entries are exhausted.
    pub fn next(&mut self) -> bool {
        let next = self.index.map_or(0, |i| i.saturating_add(1));
        self.index = Some(next.min(self.entries.len()));
        next < self.entries.len()
    }

    fn current(&self) -> VmResult<&(StackItem, StackItem)> {
        self.index
            .and_then(|i| self.entries.get(i))
            .ok_or(VmError::IteratorNotPositioned)
    }

    pub fn key(&self) -> VmResult<StackItem> {
        Ok(self.current()?.0.clone())
    }

    pub fn value(&self) -> VmResult<StackItem> {
        Ok(self.current()?.1.clone())
    }

    /// Entries not yet visited by the cursor.
    pub fn remaining(&self) -> Vec<(StackItem, StackItem)> {
        let start = self.index.map_or(0, |i| i.saturating_add(1));
        self.entries.iter().skip(start).cloned().collect()
    }

    /// Remaining entries of `self` followed by those of `other`.
    pub fn concat(&self, other: &ItemIterator) -> ItemIterator {
        let mut entries = self.remaining();
        entries.extend(other.remaining());
        ItemIterator::new(entries)
    }

    /// Enumerator over the remaining keys.
    pub fn keys(&self) -> ItemIterator {
        ItemIterator::from_values(self.remaining().into_iter().map(|(key, _)| key).collect())
    }

    /// Enumerator over the remaining values.
    pub fn values(&self) -> ItemIterator {
        ItemIterator::from_values(
            self.remaining()
                .into_iter()
                .map(|(_, value)| value)
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_starts_before_first() {
        let mut iterator = ItemIterator::from_values(vec![StackItem::from("a")]);
        assert!(iterator.value().is_err());
        assert!(iterator.next());
        assert_eq!(iterator.key().unwrap(), StackItem::from_int(0));
        assert_eq!(iterator.value().unwrap(), StackItem::from("a"));
        assert!(!iterator.next());
        assert!(!iterator.next());
        assert!(iterator.value().is_err());
    }

    #[test]
    fn test_concat_uses_remaining_entries() {
        let mut first =
            ItemIterator::from_values(vec![StackItem::from_int(1), StackItem::from_int(2)]);
        first.next();
        let second = ItemIterator::from_values(vec![StackItem::from_int(3)]);
        let mut joined = first.concat(&second);
        let mut seen = Vec::new();
        while joined.next() {
            seen.push(joined.value().unwrap());
        }
        assert_eq!(seen, vec![StackItem::from_int(2), StackItem::from_int(3)]);
    }

    #[test]
    fn test_keys_and_values() {
        let iterator = ItemIterator::new(vec![(StackItem::from("k"), StackItem::from("v"))]);
        let mut keys = iterator.keys();
        assert!(keys.next());
        assert_eq!(keys.value().unwrap(), StackItem::from("k"));
        let mut values = iterator.values();
        assert!(values.next());
        assert_eq!(values.value().unwrap(), StackItem::from("v"));
    }
}
