//! Insertion-order ledger of occupied slots.

const NIL: usize = usize::MAX;

/// Doubly-linked list of slot indices in insertion order.
///
/// Links are stored in arrays indexed by slot, so pushing to the back, popping
/// from the front and unlinking an arbitrary slot are all O(1) and never
/// allocate after construction.
#[derive(Clone, Debug)]
pub struct InsertOrder {
    prev: Vec<usize>,
    next: Vec<usize>,
    linked: Vec<bool>,
    head: usize,
    tail: usize,
    len: usize,
}

impl InsertOrder {
    /// Creates an empty ledger for slots `0..n_slots`.
    pub fn new(n_slots: usize) -> Self {
        Self {
            prev: vec![NIL; n_slots],
            next: vec![NIL; n_slots],
            linked: vec![false; n_slots],
            head: NIL,
            tail: NIL,
            len: 0,
        }
    }

    /// Returns the number of slots in the ledger.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the ledger is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if `slot` is in the ledger.
    pub fn contains(&self, slot: usize) -> bool {
        self.linked[slot]
    }

    /// Returns the oldest slot.
    pub fn front(&self) -> Option<usize> {
        if self.head == NIL {
            None
        } else {
            Some(self.head)
        }
    }

    /// Appends `slot` as the newest entry.
    ///
    /// A slot already in the ledger is moved to the back.
    pub fn push_back(&mut self, slot: usize) {
        if self.linked[slot] {
            self.unlink(slot);
        }

        self.prev[slot] = self.tail;
        self.next[slot] = NIL;
        if self.tail == NIL {
            self.head = slot;
        } else {
            self.next[self.tail] = slot;
        }
        self.tail = slot;
        self.linked[slot] = true;
        self.len += 1;
    }

    /// Removes and returns the oldest slot.
    pub fn pop_front(&mut self) -> Option<usize> {
        let slot = self.front()?;
        self.unlink(slot);
        Some(slot)
    }

    /// Removes `slot` from the ledger. Returns `false` if it was not linked.
    pub fn unlink(&mut self, slot: usize) -> bool {
        if !self.linked[slot] {
            return false;
        }

        let (prev, next) = (self.prev[slot], self.next[slot]);
        if prev == NIL {
            self.head = next;
        } else {
            self.next[prev] = next;
        }
        if next == NIL {
            self.tail = prev;
        } else {
            self.prev[next] = prev;
        }

        self.prev[slot] = NIL;
        self.next[slot] = NIL;
        self.linked[slot] = false;
        self.len -= 1;
        true
    }

    /// Iterates over the slots, oldest first.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            order: self,
            cur: self.head,
        }
    }
}

/// Iterator over an [`InsertOrder`], oldest first.
pub struct Iter<'a> {
    order: &'a InsertOrder,
    cur: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.cur == NIL {
            return None;
        }
        let slot = self.cur;
        self.cur = self.order.next[slot];
        Some(slot)
    }
}
