//! Innkeeper
//!
//! Innkeeper is a single-property hotel reservation manager: room
//! inventory, customer registration, booking and cancellation, a
//! loyalty-points tier programme and occupancy reporting, with state
//! persisted to flat text files between runs.

pub mod catalog;
pub mod config;
pub mod customers;
pub mod hotel;
pub mod ledger;
pub mod menu;
pub mod prelude;
pub mod reports;
pub mod rooms;
pub mod store;
