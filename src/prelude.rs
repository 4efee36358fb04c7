//! Innkeeper prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    catalog::{AvailableByFloor, CatalogError, RoomCatalog},
    config::{AdminCredentials, ConfigError, Settings, StorePaths},
    customers::{Customer, CustomerDirectory, DirectoryError, LoyaltyTier},
    hotel::{BookingConfirmation, Cancellation, Hotel, HotelError},
    ledger::BookingLedger,
    menu::{MenuError, MenuSession, ValidationError},
    reports::{OccupancyReport, PopularRoomTypes, ReportError},
    rooms::{Room, RoomType, UnknownRoomType},
    store::{Store, StoreError},
};
