//! Handle table backing every opaque handle handed to C.
//!
//! Storage is a slab: vacant slots form an intrusive free list, and each
//! slot carries a generation that is bumped whenever its value leaves.
//! A handle names a slot *and* the generation it was issued under, so a
//! freed handle never resolves again even after its slot is reused.

/// Decoded form of a `u64` handle: slot index in the upper half,
/// generation in the lower half.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Key {
    index: u32,
    generation: u32,
}

impl Key {
    fn from_raw(raw: u64) -> Self {
        Self {
            index: (raw >> 32) as u32,
            generation: raw as u32,
        }
    }

    fn into_raw(self) -> u64 {
        (u64::from(self.index) << 32) | u64::from(self.generation)
    }
}

enum Slot<T> {
    Occupied { generation: u32, value: T },
    /// `generation` is the one the next occupant will be issued under.
    Vacant { generation: u32, next: Option<u32> },
    /// Generation space exhausted; never handed out again.
    Retired,
}

/// Owns values of type `T` on behalf of C callers, addressed by `u64` handles.
pub(crate) struct HandleTable<T> {
    slots: Vec<Slot<T>>,
    next_vacant: Option<u32>,
}

impl<T> HandleTable<T> {
    /// An empty table. `const` so it can back a `static Mutex`.
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            next_vacant: None,
        }
    }

    /// Take ownership of `value` and return its handle.
    pub fn insert(&mut self, value: T) -> u64 {
        if let Some(index) = self.next_vacant {
            let slot = &mut self.slots[index as usize];
            if let Slot::Vacant { generation, next } = *slot {
                self.next_vacant = next;
                *slot = Slot::Occupied { generation, value };
                return Key { index, generation }.into_raw();
            }
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot::Occupied {
            generation: 0,
            value,
        });
        Key {
            index,
            generation: 0,
        }
        .into_raw()
    }

    /// Borrow the value behind `handle`, or `None` if freed or never issued.
    pub fn get(&self, handle: u64) -> Option<&T> {
        let key = Key::from_raw(handle);
        match self.slots.get(key.index as usize)? {
            Slot::Occupied { generation, value } if *generation == key.generation => Some(value),
            _ => None,
        }
    }

    /// Mutably borrow the value behind `handle`.
    pub fn get_mut(&mut self, handle: u64) -> Option<&mut T> {
        let key = Key::from_raw(handle);
        match self.slots.get_mut(key.index as usize)? {
            Slot::Occupied { generation, value } if *generation == key.generation => Some(value),
            _ => None,
        }
    }

    /// Free `handle`, returning the value it owned.
    ///
    /// A stale or unknown handle yields `None`, so freeing twice is
    /// reported rather than acted on.
    pub fn remove(&mut self, handle: u64) -> Option<T> {
        let key = Key::from_raw(handle);
        let slot = self.slots.get_mut(key.index as usize)?;
        if !matches!(*slot, Slot::Occupied { generation, .. } if generation == key.generation) {
            return None;
        }
        let successor = match key.generation.checked_add(1) {
            Some(generation) => {
                let vacant = Slot::Vacant {
                    generation,
                    next: self.next_vacant,
                };
                self.next_vacant = Some(key.index);
                vacant
            }
            None => Slot::Retired,
        };
        match std::mem::replace(slot, successor) {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Number of values currently owned by the table.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s, Slot::Occupied { .. }))
            .count()
    }
}
