use crate::utils::Slab;

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// Capacity of a cache created with [`LruCache::default`].
pub const DEFAULT_CAPACITY: usize = 10;

/// A least-recently-used cache.
///
/// Entries live in a slab and are linked into a recency list, most
/// recent at the head. A hash index maps each key to its slab slot, so
/// lookups, insertions and evictions are all O(1).
///
/// Reads refresh recency, which is why [`get`](Self::get) takes
/// `&mut self`. The cache holds no lock.
///
/// # Examples
///
/// ```rust
/// use tessera::cache::LruCache;
///
/// let mut cache = LruCache::new(2);
/// cache.put("a", 1);
/// cache.put("b", 2);
/// cache.get(&"a");
/// cache.put("c", 3);
///
/// assert!(cache.contains(&"a"));
/// assert!(!cache.contains(&"b"));
/// ```
pub struct LruCache<K, V> {
    /// Key to slab slot.
    index: HashMap<K, usize>,

    /// Entries and their recency links.
    nodes: Slab<Node<K, V>>,

    /// Most recently used entry.
    head: Option<usize>,

    /// Least recently used entry, next to be evicted.
    tail: Option<usize>,

    capacity: usize,
}

struct Node<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// A capacity of zero is allowed; such a cache stores nothing.
    pub fn new(capacity: usize) -> Self {
        Self {
            index: HashMap::with_capacity(capacity),
            nodes: Slab::with_capacity(capacity),
            head: None,
            tail: None,
            capacity,
        }
    }

    /// Inserts or replaces the value for `key` and marks it most recent.
    ///
    /// Inserting a new key into a full cache first evicts the least
    /// recently used entry.
    pub fn put(&mut self, key: K, value: V) {
        if let Some(&slot) = self.index.get(&key) {
            self.nodes[slot].value = value;
            self.touch(slot);
            return;
        }

        if self.capacity == 0 {
            return;
        }

        if self.len() >= self.capacity {
            self.evict();
        }

        let slot = self.nodes.insert(Node {
            key: key.clone(),
            value,
            prev: None,
            next: None,
        });
        self.index.insert(key, slot);
        self.attach_front(slot);
    }

    /// Returns the value for `key` and marks it most recent.
    ///
    /// Returns `None` on a miss, leaving recency untouched.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let slot = *self.index.get(key)?;
        self.touch(slot);

        Some(&self.nodes[slot].value)
    }

    /// Returns the value for `key` without touching recency.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let slot = *self.index.get(key)?;

        Some(&self.nodes[slot].value)
    }

    /// Returns `true` if `key` is cached. Does not touch recency.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.index.contains_key(key)
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Changes the maximum number of entries.
    ///
    /// Shrinking below the current size evicts least recently used
    /// entries until the cache fits.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;

        while self.len() > capacity {
            self.evict();
        }
    }

    /// Removes every entry. The capacity is kept.
    pub fn clear(&mut self) {
        self.index.clear();
        self.nodes.clear();
        self.head = None;
        self.tail = None;
    }

    fn evict(&mut self) {
        let Some(slot) = self.tail else {
            return;
        };

        self.detach(slot);
        let node = self.nodes.remove(slot);
        self.index.remove(&node.key);
    }

    /// Moves an entry to the head of the recency list.
    fn touch(&mut self, slot: usize) {
        if self.head == Some(slot) {
            return;
        }

        self.detach(slot);
        self.attach_front(slot);
    }

    fn detach(&mut self, slot: usize) {
        let Node { prev, next, .. } = self.nodes[slot];

        match prev {
            Some(prev) => self.nodes[prev].next = next,
            None => self.head = next,
        }

        match next {
            Some(next) => self.nodes[next].prev = prev,
            None => self.tail = prev,
        }

        let node = &mut self.nodes[slot];
        node.prev = None;
        node.next = None;
    }

    fn attach_front(&mut self, slot: usize) {
        let old_head = self.head;

        {
            let node = &mut self.nodes[slot];
            node.prev = None;
            node.next = old_head;
        }

        match old_head {
            Some(head) => self.nodes[head].prev = Some(slot),
            None => self.tail = Some(slot),
        }

        self.head = Some(slot);
    }
}

impl<K, V> Default for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty cache with [`DEFAULT_CAPACITY`].
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl<K, V> fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("len", &self.nodes.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}
