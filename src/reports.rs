//! Reports and listing tables
//!
//! All derivations are read-only scans of the catalog, directory and
//! ledger; rendering goes through `impl io::Write` so the menu and tests
//! share the same output path.

use std::io;

use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use thiserror::Error;

use crate::{
    catalog::RoomCatalog,
    customers::CustomerDirectory,
    ledger::BookingLedger,
    rooms::RoomType,
};

/// Errors that can occur when generating or writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The catalog holds no rooms; the occupancy rate is undefined.
    #[error("no rooms in catalog; occupancy rate is undefined")]
    EmptyCatalog,

    /// IO error while writing a report.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Occupancy summary over the whole catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct OccupancyReport {
    /// Total number of rooms.
    pub total_rooms: u32,
    /// Number of rooms with a ledger entry.
    pub booked_rooms: u32,
    /// Rooms without a ledger entry.
    pub available_rooms: u32,
    /// `booked / total * 100`.
    pub occupancy_rate: f64,
}

impl OccupancyReport {
    /// Derive the report from the current state.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::EmptyCatalog`] if there are no rooms; the
    /// rate would be a division by zero.
    pub fn generate(catalog: &RoomCatalog, ledger: &BookingLedger) -> Result<Self, ReportError> {
        if catalog.is_empty() {
            return Err(ReportError::EmptyCatalog);
        }

        let total_rooms = u32::try_from(catalog.len()).unwrap_or(u32::MAX);
        let booked_rooms = u32::try_from(ledger.len()).unwrap_or(u32::MAX);
        let available_rooms = total_rooms.saturating_sub(booked_rooms);
        let occupancy_rate = f64::from(booked_rooms) / f64::from(total_rooms) * 100.0;

        Ok(OccupancyReport {
            total_rooms,
            booked_rooms,
            available_rooms,
            occupancy_rate,
        })
    }

    /// Write the report as a table.
    ///
    /// # Errors
    ///
    /// Returns a [`ReportError`] if writing fails.
    pub fn write_to(&self, out: &mut impl io::Write) -> Result<(), ReportError> {
        let mut builder = Builder::default();
        builder.push_record(["Total Rooms".to_string(), self.total_rooms.to_string()]);
        builder.push_record(["Booked Rooms".to_string(), self.booked_rooms.to_string()]);
        builder.push_record(["Available Rooms".to_string(), self.available_rooms.to_string()]);
        builder.push_record(["Occupancy Rate".to_string(), format!("{:.2}%", self.occupancy_rate)]);

        let mut table = builder.build();
        table.with(Style::modern_rounded());
        table.modify(Columns::new(1..), Alignment::right());

        writeln!(out, "=== Occupancy Report ===")?;
        writeln!(out, "{table}")?;

        Ok(())
    }
}

/// Booking counts per room type, most popular first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopularRoomTypes {
    counts: Vec<(RoomType, u32)>,
}

impl PopularRoomTypes {
    /// Count ledger entries by the room type of the referenced room,
    /// sorted by descending count, ties broken by type name ascending.
    #[must_use]
    pub fn generate(catalog: &RoomCatalog, ledger: &BookingLedger) -> Self {
        let mut counts: Vec<(RoomType, u32)> = Vec::new();

        for (room, _) in ledger.iter() {
            let Some(kind) = catalog.get(room).map(crate::rooms::Room::kind) else {
                continue;
            };

            match counts.iter_mut().find(|(existing, _)| *existing == kind) {
                Some((_, count)) => *count += 1,
                None => counts.push((kind, 1)),
            }
        }

        counts.sort_by(|(a_kind, a_count), (b_kind, b_count)| {
            b_count.cmp(a_count).then_with(|| a_kind.name().cmp(b_kind.name()))
        });

        PopularRoomTypes { counts }
    }

    /// Counts in display order.
    #[must_use]
    pub fn counts(&self) -> &[(RoomType, u32)] {
        &self.counts
    }

    /// Write the report as a table, or a placeholder line when there are no
    /// bookings.
    ///
    /// # Errors
    ///
    /// Returns a [`ReportError`] if writing fails.
    pub fn write_to(&self, out: &mut impl io::Write) -> Result<(), ReportError> {
        writeln!(out, "=== Popular Room Types Report ===")?;

        if self.counts.is_empty() {
            writeln!(out, "No bookings yet.")?;
            return Ok(());
        }

        let mut builder = Builder::default();
        builder.push_record(["Room Type", "Bookings"]);
        for (kind, count) in &self.counts {
            builder.push_record([kind.name().to_string(), count.to_string()]);
        }

        let mut table = builder.build();
        table.with(Style::modern_rounded());
        table.modify(Columns::new(1..), Alignment::right());

        writeln!(out, "{table}")?;

        Ok(())
    }
}

/// Write the admin customer-details table.
///
/// # Errors
///
/// Returns a [`ReportError`] if writing fails.
pub fn write_customer_table(
    out: &mut impl io::Write,
    directory: &CustomerDirectory,
) -> Result<(), ReportError> {
    if directory.is_empty() {
        writeln!(out, "No registered customers.")?;
        return Ok(());
    }

    let mut builder = Builder::default();
    builder.push_record([
        "Identifier",
        "Name",
        "Email",
        "Phone",
        "National Id",
        "Points",
        "Tier",
    ]);

    for (identifier, customer) in directory.iter_sorted() {
        builder.push_record([
            identifier.to_string(),
            customer.name().to_string(),
            customer.email().to_string(),
            customer.phone().to_string(),
            customer.national_id().to_string(),
            customer.points().to_string(),
            customer.tier().name().to_string(),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());

    writeln!(out, "{table}")?;

    Ok(())
}

/// Write the admin current-bookings table.
///
/// # Errors
///
/// Returns a [`ReportError`] if writing fails.
pub fn write_booking_table(
    out: &mut impl io::Write,
    ledger: &BookingLedger,
    catalog: &RoomCatalog,
) -> Result<(), ReportError> {
    if ledger.is_empty() {
        writeln!(out, "No current bookings.")?;
        return Ok(());
    }

    let mut builder = Builder::default();
    builder.push_record(["Room No", "Occupant", "Type"]);

    for (room, identifier) in ledger.iter() {
        let kind = catalog
            .get(room)
            .map_or("Unknown", |record| record.kind().name());
        builder.push_record([room.to_string(), identifier.to_string(), kind.to_string()]);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());

    writeln!(out, "{table}")?;

    Ok(())
}

/// Write the floor-by-floor table of available rooms.
///
/// # Errors
///
/// Returns a [`ReportError`] if writing fails.
pub fn write_available_rooms(
    out: &mut impl io::Write,
    catalog: &RoomCatalog,
) -> Result<(), ReportError> {
    let mut any = false;

    for (floor, rooms) in catalog.available_by_floor() {
        any = true;

        let mut builder = Builder::default();
        builder.push_record(["Room No", "Type", "Price"]);
        for room in rooms {
            builder.push_record([
                room.number().to_string(),
                room.kind().name().to_string(),
                room.price().to_string(),
            ]);
        }

        let mut table = builder.build();
        table.with(Style::modern_rounded());

        writeln!(out, "--- Floor {floor} ---")?;
        writeln!(out, "{table}")?;
    }

    if !any {
        writeln!(out, "No rooms available.")?;
    }

    Ok(())
}

/// Write the rooms currently booked by one customer, used by the
/// cancellation flow. Returns how many rooms were listed.
///
/// # Errors
///
/// Returns a [`ReportError`] if writing fails.
pub fn write_customer_rooms(
    out: &mut impl io::Write,
    ledger: &BookingLedger,
    catalog: &RoomCatalog,
    identifier: &str,
) -> Result<usize, ReportError> {
    let rooms: Vec<u32> = ledger.rooms_for(identifier).collect();

    if rooms.is_empty() {
        return Ok(0);
    }

    let mut builder = Builder::default();
    builder.push_record(["Room No", "Type"]);
    for room in &rooms {
        let kind = catalog
            .get(*room)
            .map_or("Unknown", |record| record.kind().name());
        builder.push_record([room.to_string(), kind.to_string()]);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());

    writeln!(out, "Your Booked Rooms:")?;
    writeln!(out, "{table}")?;

    Ok(rooms.len())
}
