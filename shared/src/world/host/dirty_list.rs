use std::collections::HashMap;

use crate::types::ObjectKey;

#[derive(Default)]
struct DirtyEntry {
    bits: u32,
    prev: Option<ObjectKey>,
    next: Option<ObjectKey>,
}

/// Intrusive list of every object with outstanding dirty bits.
///
/// An object is linked iff its dirty bits are nonzero. Objects are pushed at
/// the head, so a walk visits the most recently dirtied object first.
#[derive(Default)]
pub struct DirtyList {
    entries: HashMap<ObjectKey, DirtyEntry>,
    head: Option<ObjectKey>,
    len: usize,
}

impl DirtyList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, key: ObjectKey) {
        self.entries.entry(key).or_default();
    }

    /// Unlinks and forgets `key`. Any dirty bits it still had are dropped.
    pub fn unregister(&mut self, key: &ObjectKey) {
        self.unlink(key);
        self.entries.remove(key);
    }

    pub fn is_registered(&self, key: &ObjectKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn dirty_bits(&self, key: &ObjectKey) -> u32 {
        self.entries.get(key).map_or(0, |entry| entry.bits)
    }

    /// ORs `mask` in, linking the object at the head if it was clean.
    /// Returns false for objects that were never registered.
    pub fn set(&mut self, key: &ObjectKey, mask: u32) -> bool {
        let old_head = self.head;
        let Some(entry) = self.entries.get_mut(key) else {
            return false;
        };
        if mask == 0 {
            return true;
        }

        let was_clean = entry.bits == 0;
        entry.bits |= mask;
        if !was_clean {
            return true;
        }

        entry.prev = None;
        entry.next = old_head;
        if let Some(old_head) = old_head {
            if let Some(next) = self.entries.get_mut(&old_head) {
                next.prev = Some(*key);
            }
        }
        self.head = Some(*key);
        self.len += 1;
        true
    }

    /// AND-NOTs `mask` out, unlinking the object once it becomes clean.
    pub fn clear(&mut self, key: &ObjectKey, mask: u32) {
        let Some(entry) = self.entries.get_mut(key) else {
            return;
        };
        if entry.bits == 0 {
            return;
        }
        entry.bits &= !mask;
        if entry.bits == 0 {
            self.unlink(key);
        }
    }

    /// Empties the list, returning each object with the bits it had.
    /// Every entry is zeroed and unlinked before the caller sees any of them,
    /// so re-dirtying an object while processing the result links it again
    /// for the next drain.
    pub fn drain(&mut self) -> Vec<(ObjectKey, u32)> {
        let mut output = Vec::with_capacity(self.len);
        let mut cursor = self.head.take();
        while let Some(key) = cursor {
            let Some(entry) = self.entries.get_mut(&key) else {
                break;
            };
            output.push((key, entry.bits));
            cursor = entry.next.take();
            entry.prev = None;
            entry.bits = 0;
        }
        self.len = 0;
        output
    }

    /// Walks the list from the head.
    pub fn iter(&self) -> DirtyListIter<'_> {
        DirtyListIter {
            list: self,
            cursor: self.head,
        }
    }

    pub fn contains(&self, key: &ObjectKey) -> bool {
        self.iter().any(|(linked, _)| linked == *key)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    fn unlink(&mut self, key: &ObjectKey) {
        let Some(entry) = self.entries.get_mut(key) else {
            return;
        };
        let linked = entry.prev.is_some() || self.head == Some(*key);
        if !linked {
            return;
        }
        entry.bits = 0;
        let prev = entry.prev.take();
        let next = entry.next.take();

        match prev {
            Some(prev) => {
                if let Some(prev_entry) = self.entries.get_mut(&prev) {
                    prev_entry.next = next;
                }
            }
            None => self.head = next,
        }
        if let Some(next) = next {
            if let Some(next_entry) = self.entries.get_mut(&next) {
                next_entry.prev = prev;
            }
        }
        self.len -= 1;
    }
}

pub struct DirtyListIter<'a> {
    list: &'a DirtyList,
    cursor: Option<ObjectKey>,
}

impl<'a> Iterator for DirtyListIter<'a> {
    type Item = (ObjectKey, u32);

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.cursor?;
        let entry = self.list.entries.get(&key)?;
        self.cursor = entry.next;
        Some((key, entry.bits))
    }
}
