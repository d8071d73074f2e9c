//! Counting index keyed by packed digit words.
//!
//! [`CountingIndex`] is a separate-chaining hash table from `u64` keys to a
//! small value (a `u32` counter by default). Chains are linked through a
//! `next` index inside a flat entry vector, with index `0` reserved as the
//! end-of-chain sentinel:
//!
//! ```text
//! buckets: [ 3 | 0 | 1 | 0 | 2 ]      (bucket count is always prime)
//!            |       |       |
//! data:   [sentry] [k=7,next=0] [k=9,next=0] [k=5,next=4] [k=10,next=0]
//!                      1            2            3            4
//! ```
//!
//! The bucket count grows to the next prime `>= 2 * len + 1` as soon as the
//! element count exceeds it. Growing only relinks chains; entries keep their
//! position in `data`, so a [`Slot`] stays valid until its key is removed.

use std::ops::{Index, IndexMut};

use log::trace;

use crate::error::{Error, Result};
use crate::utils::{bucket_of, next_prime};

#[derive(Debug, Clone)]
struct Entry<T> {
    key: u64,
    value: T,
    next: usize,
    occupied: bool,
}

impl<T: Default> Default for Entry<T> {
    fn default() -> Self {
        Self {
            key: 0,
            value: T::default(),
            next: 0,
            occupied: false,
        }
    }
}

/// Stable handle to an entry of a [`CountingIndex`].
///
/// The default slot is the end-of-chain sentinel and refers to no entry.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Slot(usize);

#[derive(Debug, Clone)]
pub struct CountingIndex<T = u32> {
    data: Vec<Entry<T>>,
    buckets: Vec<usize>,
    /// Index of the first *possibly* free cell.
    min_free: usize,
    /// Number of occupied cells.
    len: usize,
}

impl<T: Default> CountingIndex<T> {
    /// Create an empty index with a prime bucket count `>= size`.
    pub fn new(size: usize) -> Result<Self> {
        let bucket_count = next_prime(size);
        let mut buckets = Vec::new();
        buckets.try_reserve_exact(bucket_count)?;
        buckets.resize(bucket_count, 0);

        let mut data = Vec::new();
        data.try_reserve(1)?;
        let mut sentry = Entry::default();
        sentry.occupied = true;
        data.push(sentry);

        Ok(Self {
            data,
            buckets,
            min_free: 1,
            len: 0,
        })
    }

    /// Return the slot for `key`, inserting a default value if absent.
    pub fn get_or_create(&mut self, key: u64) -> Result<Slot> {
        if self.len > self.buckets.len() {
            self.rehash(2 * self.len + 1)?;
        }

        let bucket = bucket_of(key, self.buckets.len());
        let mut index = self.buckets[bucket];
        let mut tail = 0;
        while index != 0 {
            if self.data[index].key == key {
                return Ok(Slot(index));
            }
            tail = index;
            index = self.data[index].next;
        }

        let new = self.alloc(key)?;
        if tail == 0 {
            self.buckets[bucket] = new;
        } else {
            self.data[tail].next = new;
        }
        Ok(Slot(new))
    }

    fn alloc(&mut self, key: u64) -> Result<usize> {
        let free = (self.min_free..self.data.len()).find(|&i| !self.data[i].occupied);
        let index = match free {
            Some(i) => i,
            None => {
                self.data.try_reserve(1)?;
                self.data.push(Entry::default());
                self.data.len() - 1
            }
        };

        let entry = &mut self.data[index];
        entry.key = key;
        entry.value = T::default();
        entry.next = 0;
        entry.occupied = true;

        self.min_free = index + 1;
        self.len += 1;
        Ok(index)
    }

    /// Rebuild the chains over a prime bucket count `>= size`.
    fn rehash(&mut self, size: usize) -> Result<()> {
        let bucket_count = next_prime(size);
        trace!("rehash: {} -> {} buckets ({} entries)", self.buckets.len(), bucket_count, self.len);

        let mut buckets = Vec::new();
        buckets.try_reserve_exact(bucket_count)?;
        buckets.resize(bucket_count, 0);
        let mut tails = Vec::new();
        tails.try_reserve_exact(bucket_count)?;
        tails.resize(bucket_count, 0usize);

        for index in 1..self.data.len() {
            if !self.data[index].occupied {
                continue;
            }
            let bucket = bucket_of(self.data[index].key, bucket_count);
            self.data[index].next = 0;
            match tails[bucket] {
                0 => buckets[bucket] = index,
                tail => self.data[tail].next = index,
            }
            tails[bucket] = index;
        }

        self.buckets = buckets;
        Ok(())
    }
}

impl<T> CountingIndex<T> {
    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current (prime) number of buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Find the slot holding `key`.
    pub fn find(&self, key: u64) -> Option<Slot> {
        if self.len == 0 {
            return None;
        }
        let mut index = self.buckets[bucket_of(key, self.buckets.len())];
        while index != 0 {
            if self.data[index].key == key {
                return Some(Slot(index));
            }
            index = self.data[index].next;
        }
        None
    }

    pub fn get(&self, key: u64) -> Option<&T> {
        self.find(key).map(|slot| &self.data[slot.0].value)
    }

    pub fn get_mut(&mut self, key: u64) -> Option<&mut T> {
        self.find(key).map(|slot| &mut self.data[slot.0].value)
    }

    pub fn contains(&self, key: u64) -> bool {
        self.find(key).is_some()
    }

    /// Unlink `key` from its chain. Returns whether it was present.
    pub fn remove(&mut self, key: u64) -> bool {
        if self.len == 0 {
            return false;
        }
        let bucket = bucket_of(key, self.buckets.len());
        let mut prev = 0;
        let mut index = self.buckets[bucket];
        while index != 0 {
            let next = self.data[index].next;
            if self.data[index].key == key {
                if prev == 0 {
                    self.buckets[bucket] = next;
                } else {
                    self.data[prev].next = next;
                }
                self.data[index].occupied = false;
                self.data[index].next = 0;
                self.min_free = self.min_free.min(index);
                self.len -= 1;
                return true;
            }
            prev = index;
            index = next;
        }
        false
    }

    /// Key stored at `slot`.
    pub fn key(&self, slot: Slot) -> u64 {
        assert!(self.data[slot.0].occupied, "Slot {} is not occupied", slot.0);
        self.data[slot.0].key
    }

    /// Iterate over slots in bucket order.
    pub fn slots(&self) -> impl Iterator<Item = Slot> + '_ {
        self.buckets.iter().flat_map(move |&head| {
            std::iter::successors((head != 0).then_some(head), move |&i| {
                let next = self.data[i].next;
                (next != 0).then_some(next)
            })
            .map(Slot)
        })
    }

    /// Iterate over `(key, value)` pairs in bucket order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &T)> + '_ {
        self.slots().map(move |slot| (self.data[slot.0].key, &self.data[slot.0].value))
    }

    /// Write every slot into `out` (bucket order) and return how many were
    /// written. Fails if `out` is shorter than [`len`](Self::len).
    pub fn collect_slots(&self, out: &mut [Slot]) -> Result<usize> {
        if out.len() < self.len {
            return Err(Error::BufferTooSmall {
                needed: self.len,
                got: out.len(),
            });
        }
        for (dst, slot) in out.iter_mut().zip(self.slots()) {
            *dst = slot;
        }
        Ok(self.len)
    }
}

impl<T> Index<Slot> for CountingIndex<T> {
    type Output = T;

    fn index(&self, slot: Slot) -> &Self::Output {
        assert!(self.data[slot.0].occupied, "Slot {} is not occupied", slot.0);
        &self.data[slot.0].value
    }
}

impl<T> IndexMut<Slot> for CountingIndex<T> {
    fn index_mut(&mut self, slot: Slot) -> &mut Self::Output {
        assert!(self.data[slot.0].occupied, "Slot {} is not occupied", slot.0);
        &mut self.data[slot.0].value
    }
}
