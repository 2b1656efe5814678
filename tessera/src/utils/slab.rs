use std::ops::{Index, IndexMut};

/// A simple slab allocator.
///
/// A `Slab` stores values of type `T` in a contiguous vector and hands
/// out stable indices. Removed slots are threaded onto a free list and
/// reused by later insertions, so indices stay small and dense.
///
/// It lets index-linked structures (such as the recency list of the LRU
/// cache) avoid pointer juggling.
pub(crate) struct Slab<T> {
    /// Storage for items.
    entries: Vec<Entry<T>>,

    /// Head of the free list, if any slot is vacant.
    next_free: Option<usize>,

    /// Number of occupied slots.
    len: usize,
}

enum Entry<T> {
    Occupied(T),
    Vacant { next_free: Option<usize> },
}

impl<T> Slab<T> {
    /// Creates an empty slab with room for `capacity` items before it
    /// reallocates.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            next_free: None,
            len: 0,
        }
    }

    /// Inserts a value and returns its index.
    ///
    /// A vacant slot is reused if one exists, otherwise the slab grows.
    pub(crate) fn insert(&mut self, item: T) -> usize {
        self.len += 1;

        match self.next_free {
            Some(index) => {
                if let Entry::Vacant { next_free } = self.entries[index] {
                    self.next_free = next_free;
                }
                self.entries[index] = Entry::Occupied(item);

                index
            }
            None => {
                self.entries.push(Entry::Occupied(item));

                self.entries.len() - 1
            }
        }
    }

    /// Removes and returns the value stored at `index`.
    ///
    /// The slot becomes free and may be reused by future insertions.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds or the slot is vacant.
    pub(crate) fn remove(&mut self, index: usize) -> T {
        let vacant = Entry::Vacant {
            next_free: self.next_free,
        };

        match std::mem::replace(&mut self.entries[index], vacant) {
            Entry::Occupied(item) => {
                self.next_free = Some(index);
                self.len -= 1;

                item
            }
            Entry::Vacant { next_free } => {
                self.entries[index] = Entry::Vacant { next_free };
                panic!("slab slot {index} is vacant");
            }
        }
    }

    /// Returns a reference to the value at `index`, if occupied.
    pub(crate) fn get(&self, index: usize) -> Option<&T> {
        match self.entries.get(index) {
            Some(Entry::Occupied(item)) => Some(item),
            _ => None,
        }
    }

    /// Returns a mutable reference to the value at `index`, if occupied.
    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        match self.entries.get_mut(index) {
            Some(Entry::Occupied(item)) => Some(item),
            _ => None,
        }
    }

    /// Number of occupied slots.
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Drops every item and forgets all slots.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.next_free = None;
        self.len = 0;
    }
}

impl<T> Index<usize> for Slab<T> {
    type Output = T;

    /// # Panics
    ///
    /// Panics if the slot is out of bounds or vacant.
    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(item) => item,
            None => panic!("slab slot {index} is vacant"),
        }
    }
}

impl<T> IndexMut<usize> for Slab<T> {
    /// # Panics
    ///
    /// Panics if the slot is out of bounds or vacant.
    fn index_mut(&mut self, index: usize) -> &mut T {
        match self.get_mut(index) {
            Some(item) => item,
            None => panic!("slab slot {index} is vacant"),
        }
    }
}
