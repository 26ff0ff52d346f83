//! Generational Arena
//!
//! Slot storage for tree nodes. A released slot bumps its generation, so a
//! handle to a freed node can never reach whatever reuses the slot.

use crate::NodeId;

/// Index for a new slot at position `len`, if it fits a handle
fn slot_index(len: usize) -> Option<u32> {
    u32::try_from(len).ok()
}

/// Generational arena (slot map) keyed by [`NodeId`]
#[derive(Debug)]
pub(crate) struct GenArena<T> {
    items: Vec<Option<T>>,
    generations: Vec<u32>,
    free_list: Vec<u32>,
    live: usize,
}

impl<T> GenArena<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            generations: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            live: 0,
        }
    }

    /// Insert a value built from the id it is about to receive
    ///
    /// Returns `None` when every `u32` slot index is taken.
    pub fn insert_with(&mut self, build: impl FnOnce(NodeId) -> T) -> Option<NodeId> {
        let id = if let Some(index) = self.free_list.pop() {
            let id = NodeId::new(index, self.generations[index as usize]);
            self.items[index as usize] = Some(build(id));
            id
        } else {
            let index = slot_index(self.items.len())?;
            let id = NodeId::new(index, 0);
            self.items.push(Some(build(id)));
            self.generations.push(0);
            id
        };
        self.live += 1;
        Some(id)
    }

    /// Get item
    pub fn get(&self, id: NodeId) -> Option<&T> {
        if !self.contains(id) {
            return None;
        }
        self.items[id.index as usize].as_ref()
    }

    /// Get mutable item
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        if !self.contains(id) {
            return None;
        }
        self.items[id.index as usize].as_mut()
    }

    /// True if `id` refers to a live slot of the current generation
    pub fn contains(&self, id: NodeId) -> bool {
        let index = id.index as usize;
        self.generations.get(index) == Some(&id.generation)
            && self.items.get(index).is_some_and(Option::is_some)
    }

    /// Remove item, retiring its handle
    pub fn remove(&mut self, id: NodeId) -> Option<T> {
        if !self.contains(id) {
            return None;
        }
        let index = id.index as usize;
        let value = self.items[index].take();
        self.generations[index] = self.generations[index].wrapping_add(1);
        self.free_list.push(id.index);
        self.live -= 1;
        value
    }

    /// Live ids in slot order
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.items
            .iter()
            .zip(&self.generations)
            .enumerate()
            .filter(|(_, (item, _))| item.is_some())
            .map(|(index, (_, generation))| NodeId::new(index as u32, *generation))
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }
}

impl<T> Default for GenArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gen_arena() {
        let mut arena = GenArena::new();
        let idx = arena.insert_with(|_| 42).unwrap();

        assert_eq!(arena.get(idx), Some(&42));
        arena.remove(idx);
        assert_eq!(arena.get(idx), None);
        assert!(arena.is_empty());
    }

    #[test]
    fn test_reused_slot_rejects_stale_handle() {
        let mut arena = GenArena::new();
        let first = arena.insert_with(|_| "first").unwrap();
        arena.remove(first);
        let second = arena.insert_with(|_| "second").unwrap();

        assert_eq!(first.index, second.index);
        assert_ne!(first, second);
        assert_eq!(arena.get(first), None);
        assert_eq!(arena.get(second), Some(&"second"));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_slot_index_stops_at_u32_max() {
        assert_eq!(slot_index(0), Some(0));
        assert_eq!(slot_index(u32::MAX as usize), Some(u32::MAX));
        assert_eq!(slot_index(u32::MAX as usize + 1), None);
    }

    #[test]
    fn test_insert_with_sees_own_id() {
        let mut arena = GenArena::new();
        let id = arena.insert_with(|id| id).unwrap();
        assert_eq!(arena.get(id), Some(&id));
        assert_eq!(arena.ids().collect::<Vec<_>>(), vec![id]);
    }
}
