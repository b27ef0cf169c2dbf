//! Raw location store
//!
//! One slot per positioning source, each holding the most recent location that
//! source delivered. The store is what the fusion engine reads from; sources
//! only ever overwrite their own slot.
//!
//! Slots are registered once with the source's preference. That preference is
//! stamped onto every location written to the slot, so a source cannot promote
//! its own data.
//!
//! Storage is a `heapless::Vec` with a compile-time capacity of
//! [`MAX_RAW_LOCATIONS`]; no allocation happens after construction.

use heapless::Vec;

use crate::{
    constants::buffers::MAX_RAW_LOCATIONS,
    errors::{LocationError, LocationResult},
    location::{Location, Preference},
};

/// Handle to one slot in a [`RawLocationStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(usize);

impl SlotId {
    /// Index in [`RawLocationStore::as_slice`]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Fixed-capacity set of raw locations, one per source
#[derive(Debug, Clone, Default)]
pub struct RawLocationStore {
    slots: Vec<Location, MAX_RAW_LOCATIONS>,
}

impl RawLocationStore {
    /// Empty store
    pub const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Reserve a slot for a source with the given preference
    ///
    /// The slot starts out as an empty, invalid location.
    pub fn register(&mut self, preference: Preference) -> LocationResult<SlotId> {
        let id = SlotId(self.slots.len());
        self.slots
            .push(Location::with_preference(preference))
            .map_err(|_| LocationError::StoreFull {
                capacity: MAX_RAW_LOCATIONS,
            })?;
        log_debug!("Registered raw location slot {} ({})", id.0, preference.name());
        Ok(id)
    }

    /// Replace the slot's location
    ///
    /// The location is sanitized first; on error the slot keeps its previous
    /// contents.
    pub fn update(&mut self, slot: SlotId, mut location: Location) -> LocationResult<()> {
        let current = self
            .slots
            .get_mut(slot.0)
            .ok_or(LocationError::UnknownSlot { slot: slot.0 })?;

        location.sanitize().map_err(|e| {
            log_warn!("Rejected location for slot {}: {:?}", slot.0, e);
            e
        })?;
        location.set_preference(current.preference());
        *current = location;
        Ok(())
    }

    /// Edit the slot's location in place
    ///
    /// Used for partial updates (satellite counts, invalidation) that keep the
    /// rest of the fix. The slot's preference cannot be changed this way.
    pub fn modify<F>(&mut self, slot: SlotId, f: F) -> LocationResult<()>
    where
        F: FnOnce(&mut Location),
    {
        let current = self
            .slots
            .get_mut(slot.0)
            .ok_or(LocationError::UnknownSlot { slot: slot.0 })?;

        let mut edited = *current;
        f(&mut edited);
        edited.sanitize()?;
        edited.set_preference(current.preference());
        *current = edited;
        Ok(())
    }

    /// Raw location in `slot`
    pub fn get(&self, slot: SlotId) -> Option<&Location> {
        self.slots.get(slot.0)
    }

    /// All raw locations in registration order
    pub fn as_slice(&self) -> &[Location] {
        &self.slots
    }

    /// Slots with their raw locations
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &Location)> {
        self.slots.iter().enumerate().map(|(i, l)| (SlotId(i), l))
    }

    /// Number of registered slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no slot is registered
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Maximum number of slots
    pub const fn capacity(&self) -> usize {
        MAX_RAW_LOCATIONS
    }
}
