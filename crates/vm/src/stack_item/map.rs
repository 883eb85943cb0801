//! Map stack item storage.

use indexmap::IndexMap;

use crate::error::VmResult;
use crate::stack_item::StackItem;

/// Insertion-ordered map keyed by the byte representation of primitive keys.
#[derive(Clone, Default)]
pub struct MapItem {
    entries: IndexMap<Vec<u8>, (StackItem, StackItem)>,
}

impl MapItem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &StackItem) -> VmResult<Option<StackItem>> {
        Ok(self
            .entries
            .get(&key.map_key()?)
            .map(|(_, value)| value.clone()))
    }

    pub fn contains_key(&self, key: &StackItem) -> VmResult<bool> {
        Ok(self.entries.contains_key(&key.map_key()?))
    }

    /// Inserts or replaces an entry. Returns true when the key is new.
    pub fn insert(&mut self, key: StackItem, value: StackItem) -> VmResult<bool> {
        let encoded = key.map_key()?;
        Ok(self.entries.insert(encoded, (key, value)).is_none())
    }

    /// Removes an entry, keeping the order of the remaining ones.
    pub fn remove(&mut self, key: &StackItem) -> VmResult<bool> {
        Ok(self.entries.shift_remove(&key.map_key()?).is_some())
    }

    pub fn keys(&self) -> Vec<StackItem> {
        self.entries.values().map(|(key, _)| key.clone()).collect()
    }

    pub fn values(&self) -> Vec<StackItem> {
        self.entries.values().map(|(_, value)| value.clone()).collect()
    }

    pub fn entries(&self) -> Vec<(StackItem, StackItem)> {
        self.entries.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_compare_by_bytes() {
        let mut map = MapItem::new();
        assert!(map.insert(StackItem::from_int(1), StackItem::from("a")).unwrap());
        assert!(!map.insert(StackItem::from(vec![1u8]), StackItem::from("b")).unwrap());
        assert_eq!(map.len(), 1);
        assert_eq!(
            map.get(&StackItem::from(true)).unwrap(),
            Some(StackItem::from("b"))
        );
    }

    #[test]
    fn test_remove_keeps_insertion_order() {
        let mut map = MapItem::new();
        for i in 0..4 {
            map.insert(StackItem::from_int(i), StackItem::from_int(i * 10))
                .unwrap();
        }
        assert!(map.remove(&StackItem::from_int(1)).unwrap());
        assert!(!map.remove(&StackItem::from_int(9)).unwrap());
        assert_eq!(
            map.values(),
            vec![
                StackItem::from_int(0),
                StackItem::from_int(20),
                StackItem::from_int(30)
            ]
        );
    }

    #[test]
    fn test_container_keys_are_rejected() {
        let mut map = MapItem::new();
        assert!(map
            .insert(StackItem::new_array(Vec::new()), StackItem::from_int(1))
            .is_err());
    }
}
