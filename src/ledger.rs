//! Booking ledger

use std::collections::BTreeMap;

/// The association between a room and the customer who currently occupies
/// it. At most one entry per room; the single source of truth for "is room
/// X booked and by whom".
///
/// Only the booking engine and load reconciliation mutate the ledger;
/// everything else reads.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BookingLedger {
    entries: BTreeMap<u32, String>,
}

impl BookingLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifier of the customer occupying the given room, if any.
    #[must_use]
    pub fn occupant(&self, room: u32) -> Option<&str> {
        self.entries.get(&room).map(String::as_str)
    }

    pub(crate) fn insert(&mut self, room: u32, identifier: String) {
        self.entries.insert(room, identifier);
    }

    pub(crate) fn remove(&mut self, room: u32) -> Option<String> {
        self.entries.remove(&room)
    }

    /// Number of booked rooms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether there are no bookings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in ascending room-number order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.entries
            .iter()
            .map(|(room, identifier)| (*room, identifier.as_str()))
    }

    /// Room numbers currently booked by the given customer, ascending.
    pub fn rooms_for<'a>(&'a self, identifier: &'a str) -> impl Iterator<Item = u32> + 'a {
        self.entries
            .iter()
            .filter(move |(_, occupant)| occupant.as_str() == identifier)
            .map(|(room, _)| *room)
    }
}
