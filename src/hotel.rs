//! Hotel aggregate and booking engine
//!
//! The engine is the only writer of the three collections. Each operation
//! validates its preconditions, applies the full in-memory mutation, then
//! flushes the affected stores. If the flush fails the in-memory state is
//! kept (memory is authoritative) and the store error is returned; the next
//! successful flush rewrites the files.

use thiserror::Error;
use tracing::warn;

use crate::{
    catalog::{CatalogError, RoomCatalog},
    customers::{Customer, CustomerDirectory, DirectoryError},
    ledger::BookingLedger,
    store::{Store, StoreError},
};

/// Loyalty points credited on booking and deducted on cancellation:
/// one tenth of the room price, truncated.
#[must_use]
pub fn points_for_price(price: u32) -> u32 {
    price / 10
}

/// Errors from booking engine operations.
#[derive(Debug, Error)]
pub enum HotelError {
    /// No room with this number exists.
    #[error("room {0} does not exist")]
    RoomNotFound(u32),

    /// The room is already booked.
    #[error("room {room} is already booked by {occupant:?}")]
    RoomAlreadyBooked {
        /// Room number.
        room: u32,
        /// Identifier of the current occupant.
        occupant: String,
    },

    /// The requesting customer does not hold a booking for this room.
    #[error("room {0} is not booked by this customer")]
    NotBookedByCustomer(u32),

    /// Checkout was requested for a room that is not booked.
    #[error("room {0} is not booked")]
    RoomNotBooked(u32),

    /// Registration or lookup failure in the customer directory.
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// Catalog seeding failure.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A store file could not be read or written.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Outcome of a successful booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingConfirmation {
    /// Booked room number.
    pub room: u32,
    /// Loyalty points credited.
    pub points_earned: u32,
    /// Customer's balance after the credit.
    pub new_balance: u32,
}

/// Outcome of a successful cancellation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cancellation {
    /// Freed room number.
    pub room: u32,
    /// Points deduction applied (the balance clamps at zero, so the balance
    /// may drop by less than this).
    pub points_deducted: u32,
    /// Customer's balance after the deduction.
    pub new_balance: u32,
}

/// The session-scoped aggregate owning the three collections; constructed
/// at startup from the persisted stores and torn down at shutdown.
#[derive(Debug)]
pub struct Hotel {
    catalog: RoomCatalog,
    directory: CustomerDirectory,
    ledger: BookingLedger,
    store: Store,
}

impl Hotel {
    /// Load all three stores, seed the default room layout on first run,
    /// and reconcile booked flags against the ledger.
    ///
    /// Reconciliation trusts the ledger in both directions: a room's booked
    /// flag is forced to match ledger membership and any disagreement is
    /// logged.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if a store file exists but cannot be read,
    /// or a [`CatalogError`] if seeding fails.
    pub fn open(store: Store) -> Result<Self, HotelError> {
        let directory = store.load_customers()?;
        let mut catalog = store.load_rooms()?;

        let first_run = catalog.is_empty();
        if first_run {
            catalog.seed_default_layout()?;
        }

        let ledger = store.load_bookings(&catalog)?;

        let mut hotel = Hotel {
            catalog,
            directory,
            ledger,
            store,
        };

        hotel.reconcile();

        if first_run && let Err(err) = hotel.store.save_rooms(&hotel.catalog) {
            warn!(%err, "failed to persist seeded room layout; will retry on next flush");
        }

        Ok(hotel)
    }

    fn reconcile(&mut self) {
        let numbers: Vec<u32> = self.catalog.rooms().map(|room| room.number()).collect();

        for number in numbers {
            let in_ledger = self.ledger.occupant(number).is_some();
            let Some(room) = self.catalog.get_mut(number) else {
                continue;
            };

            if room.is_booked() != in_ledger {
                warn!(
                    room = number,
                    booked_flag = room.is_booked(),
                    in_ledger,
                    "room record disagrees with ledger; ledger wins"
                );
                room.set_booked(in_ledger);
            }
        }
    }

    /// Register a new customer and persist the directory.
    ///
    /// # Errors
    ///
    /// Returns a [`DirectoryError`] for duplicate identifiers or unstorable
    /// fields, or a [`StoreError`] if the flush fails (the registration is
    /// kept in memory).
    pub fn register(&mut self, identifier: &str, customer: Customer) -> Result<(), HotelError> {
        self.directory.register(identifier, customer)?;
        self.store.save_customers(&self.directory)?;

        Ok(())
    }

    /// Authenticate a customer.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::NotFound`] and
    /// [`DirectoryError::InvalidCredentials`] distinctly; the caller may
    /// unify them for display.
    pub fn authenticate(&self, identifier: &str, password: &str) -> Result<&Customer, HotelError> {
        Ok(self.directory.authenticate(identifier, password)?)
    }

    /// Book an available room for a customer and credit loyalty points.
    ///
    /// # Errors
    ///
    /// Returns [`HotelError::RoomNotFound`], [`HotelError::RoomAlreadyBooked`]
    /// or [`DirectoryError::NotFound`] on a precondition violation (state is
    /// untouched), or a [`StoreError`] if the write-through flush fails (the
    /// booking is kept in memory).
    pub fn book(&mut self, room: u32, identifier: &str) -> Result<BookingConfirmation, HotelError> {
        if !self.directory.contains(identifier) {
            return Err(DirectoryError::NotFound(identifier.to_string()).into());
        }

        let price = self
            .catalog
            .get(room)
            .ok_or(HotelError::RoomNotFound(room))?
            .price();

        if let Some(occupant) = self.ledger.occupant(room) {
            return Err(HotelError::RoomAlreadyBooked {
                room,
                occupant: occupant.to_string(),
            });
        }

        let points_earned = points_for_price(price);

        if let Some(record) = self.catalog.get_mut(room) {
            record.set_booked(true);
        }
        self.ledger.insert(room, identifier.to_string());
        let new_balance = self
            .directory
            .adjust_points(identifier, i64::from(points_earned))?;

        self.flush_all()?;

        Ok(BookingConfirmation {
            room,
            points_earned,
            new_balance,
        })
    }

    /// Cancel a booking. Only the occupant may cancel; the points deduction
    /// clamps at zero, so it may not mirror the original credit exactly.
    ///
    /// # Errors
    ///
    /// Returns [`HotelError::RoomNotFound`] or
    /// [`HotelError::NotBookedByCustomer`] on a precondition violation
    /// (state is untouched), or a [`StoreError`] if the flush fails (the
    /// cancellation is kept in memory).
    pub fn cancel(&mut self, room: u32, identifier: &str) -> Result<Cancellation, HotelError> {
        let price = self
            .catalog
            .get(room)
            .ok_or(HotelError::RoomNotFound(room))?
            .price();

        if self.ledger.occupant(room) != Some(identifier) {
            return Err(HotelError::NotBookedByCustomer(room));
        }

        let points_deducted = points_for_price(price);

        self.ledger.remove(room);
        if let Some(record) = self.catalog.get_mut(room) {
            record.set_booked(false);
        }
        let new_balance = self
            .directory
            .adjust_points(identifier, -i64::from(points_deducted))?;

        self.flush_all()?;

        Ok(Cancellation {
            room,
            points_deducted,
            new_balance,
        })
    }

    /// Administrative checkout: free a booked room without any points
    /// adjustment. Returns the identifier of the former occupant.
    ///
    /// # Errors
    ///
    /// Returns [`HotelError::RoomNotFound`] or [`HotelError::RoomNotBooked`]
    /// on a precondition violation (state is untouched), or a [`StoreError`]
    /// if the flush fails (the checkout is kept in memory).
    pub fn checkout(&mut self, room: u32) -> Result<String, HotelError> {
        if self.catalog.get(room).is_none() {
            return Err(HotelError::RoomNotFound(room));
        }

        let occupant = self
            .ledger
            .remove(room)
            .ok_or(HotelError::RoomNotBooked(room))?;

        if let Some(record) = self.catalog.get_mut(room) {
            record.set_booked(false);
        }

        let rooms = self.store.save_rooms(&self.catalog);
        let bookings = self.store.save_bookings(&self.ledger);
        rooms.and(bookings)?;

        Ok(occupant)
    }

    /// Rewrite all three stores. Called after mutations that touch every
    /// store and once more at orderly shutdown.
    ///
    /// # Errors
    ///
    /// Returns the first [`StoreError`] encountered; all three saves are
    /// attempted regardless.
    pub fn flush_all(&self) -> Result<(), StoreError> {
        let customers = self.store.save_customers(&self.directory);
        let rooms = self.store.save_rooms(&self.catalog);
        let bookings = self.store.save_bookings(&self.ledger);

        customers.and(rooms).and(bookings)
    }

    /// Read-only view of the room catalog.
    #[must_use]
    pub fn catalog(&self) -> &RoomCatalog {
        &self.catalog
    }

    /// Read-only view of the customer directory.
    #[must_use]
    pub fn directory(&self) -> &CustomerDirectory {
        &self.directory
    }

    /// Read-only view of the booking ledger.
    #[must_use]
    pub fn ledger(&self) -> &BookingLedger {
        &self.ledger
    }
}
