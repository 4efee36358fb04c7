//! Room catalog

use std::collections::{BTreeMap, btree_map};
use std::iter::Peekable;

use thiserror::Error;

use crate::rooms::{Room, RoomType};

/// Number of floors seeded on first run.
pub const FLOORS: u32 = 5;

/// Errors related to catalog construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// The default layout was requested on a catalog that already holds rooms.
    #[error("catalog already holds {0} rooms; refusing to seed the default layout")]
    AlreadyPopulated(usize),

    /// A room with this number is already present.
    #[error("room {0} is already in the catalog")]
    DuplicateRoom(u32),
}

/// All rooms of the hotel, keyed by room number.
///
/// Iteration order is ascending room number, which also orders floors
/// ascending since the floor is `number / 100`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RoomCatalog {
    rooms: BTreeMap<u32, Room>,
}

impl RoomCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate the fixed first-run layout: [`FLOORS`] floors with one room
    /// of each type per floor, numbered `floor * 100 + 1..=3`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::AlreadyPopulated`] if the catalog is not empty.
    pub fn seed_default_layout(&mut self) -> Result<(), CatalogError> {
        if !self.rooms.is_empty() {
            return Err(CatalogError::AlreadyPopulated(self.rooms.len()));
        }

        for floor in 1..=FLOORS {
            let base = floor * 100;
            for (offset, kind) in (1..).zip(RoomType::ALL) {
                self.rooms.insert(base + offset, Room::new(base + offset, kind));
            }
        }

        Ok(())
    }

    /// Add a room.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateRoom`] if the number is already taken.
    pub fn add(&mut self, room: Room) -> Result<(), CatalogError> {
        match self.rooms.entry(room.number()) {
            btree_map::Entry::Occupied(_) => Err(CatalogError::DuplicateRoom(room.number())),
            btree_map::Entry::Vacant(entry) => {
                entry.insert(room);
                Ok(())
            }
        }
    }

    /// Look up a room by number.
    #[must_use]
    pub fn get(&self, number: u32) -> Option<&Room> {
        self.rooms.get(&number)
    }

    pub(crate) fn get_mut(&mut self, number: u32) -> Option<&mut Room> {
        self.rooms.get_mut(&number)
    }

    /// Number of rooms in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Check whether the catalog holds no rooms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// All rooms in ascending number order.
    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    /// Unbooked rooms grouped by floor, floors ascending, rooms within a
    /// floor in ascending number order.
    ///
    /// The iterator is lazy; call this again for a fresh pass.
    #[must_use]
    pub fn available_by_floor(&self) -> AvailableByFloor<'_> {
        AvailableByFloor {
            rooms: self.rooms.values().peekable(),
        }
    }
}

/// Lazy iterator over `(floor, available rooms on that floor)` groups.
///
/// Floors with no available rooms are omitted.
#[derive(Debug)]
pub struct AvailableByFloor<'a> {
    rooms: Peekable<btree_map::Values<'a, u32, Room>>,
}

impl<'a> Iterator for AvailableByFloor<'a> {
    type Item = (u32, Vec<&'a Room>);

    fn next(&mut self) -> Option<Self::Item> {
        let first = loop {
            let room = self.rooms.next()?;
            if !room.is_booked() {
                break room;
            }
        };

        let floor = first.floor();
        let mut group = vec![first];

        while self.rooms.peek().is_some_and(|room| room.floor() == floor) {
            if let Some(room) = self.rooms.next()
                && !room.is_booked()
            {
                group.push(room);
            }
        }

        Some((floor, group))
    }
}
