//! Fixed-capacity open-addressing table of normalized URLs
//!
//! The table never grows. Keys are placed by a base-17 polynomial hash and
//! collisions are resolved by linear probing with wrap-around. A probe that
//! visits every slot without finding the key or a free slot is a
//! [`CrawlError::CapacityFault`].

use crate::CrawlError;

const HASH_BASE: u64 = 17;

/// Result of looking a key up in the table
#[derive(Debug, PartialEq, Eq)]
pub enum Probe {
    /// The key is already present
    Duplicate,

    /// The key is absent; committing the reservation stores it
    Vacant(Reservation),
}

/// A free slot found by [`DedupTable::probe`]
///
/// Dropping a reservation without committing it is the rollback: the slot
/// stays free.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "an uncommitted reservation leaves the URL unrecorded"]
pub struct Reservation {
    slot: usize,
}

/// Dedup table over normalized URLs
#[derive(Debug, Clone)]
pub struct DedupTable {
    slots: Vec<Option<String>>,
    occupied: usize,
}

impl DedupTable {
    /// Creates a table with `capacity` slots
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            occupied: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots (the unique URL count)
    pub fn len(&self) -> usize {
        self.occupied
    }

    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Finds `key` or the first free slot on its probe sequence
    ///
    /// # Errors
    ///
    /// * `CrawlError::CapacityFault` - every slot is taken by other keys
    pub fn probe(&self, key: &str) -> Result<Probe, CrawlError> {
        let capacity = self.capacity();
        if capacity == 0 {
            return Err(CrawlError::CapacityFault { capacity });
        }

        let start = rolling_hash(key, capacity);
        for offset in 0..capacity {
            let slot = (start + offset) % capacity;
            match &self.slots[slot] {
                Some(existing) if existing == key => return Ok(Probe::Duplicate),
                Some(_) => continue,
                None => return Ok(Probe::Vacant(Reservation { slot })),
            }
        }

        Err(CrawlError::CapacityFault { capacity })
    }

    /// Stores `key` in a slot previously reserved for it
    pub fn commit(&mut self, reservation: Reservation, key: String) {
        let slot = &mut self.slots[reservation.slot];
        debug_assert!(slot.is_none(), "reserved slot was taken");
        *slot = Some(key);
        self.occupied += 1;
    }

    /// Returns true if `key` is already recorded
    pub fn contains(&self, key: &str) -> bool {
        matches!(self.probe(key), Ok(Probe::Duplicate))
    }
}

/// Polynomial rolling hash `sum(c_i * 17^i) mod capacity`
///
/// Computed entirely in modular arithmetic, so long keys cannot overflow.
pub fn rolling_hash(key: &str, capacity: usize) -> usize {
    if capacity == 0 {
        return 0;
    }

    let modulus = capacity as u64;
    let mut hash = 0u64;
    let mut power = 1u64;

    for c in key.chars() {
        hash = (hash + (u64::from(c) % modulus) * power) % modulus;
        power = (power * HASH_BASE) % modulus;
    }

    hash as usize
}
