//! Flat-file persistence

use std::fmt::Write as _;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;

use crate::{
    catalog::RoomCatalog,
    config::StorePaths,
    customers::{Customer, CustomerDirectory},
    ledger::BookingLedger,
    rooms::{Room, RoomType},
};

/// Errors from the persistence adapter.
///
/// Malformed records are not errors: they are skipped with a warning and
/// loading continues. Only the file itself being unreadable or unwritable
/// surfaces here.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A store file could not be read.
    #[error("failed to read store {path}: {source}")]
    Read {
        /// Store file path.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// A store file could not be written.
    #[error("failed to write store {path}: {source}")]
    Write {
        /// Store file path.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
}

/// Loads and saves the three stores as comma-delimited flat files.
///
/// Every save is a full rewrite of the file; a missing file on load is an
/// empty store.
#[derive(Debug, Clone)]
pub struct Store {
    paths: StorePaths,
}

impl Store {
    /// Create a store over the given file locations.
    #[must_use]
    pub fn new(paths: StorePaths) -> Self {
        Store { paths }
    }

    /// Load the room catalog from `number,0|1,typeName` records.
    ///
    /// Lines that fail to parse, carry an unknown type name or duplicate a
    /// room number are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Read`] if the file exists but cannot be read.
    pub fn load_rooms(&self) -> Result<RoomCatalog, StoreError> {
        let mut catalog = RoomCatalog::new();

        let Some(contents) = read_store(&self.paths.rooms)? else {
            return Ok(catalog);
        };

        for (line_no, line) in records(&contents) {
            let Some((number, booked, kind)) = parse_room_record(line) else {
                warn!(file = %self.paths.rooms.display(), line_no, line, "skipping malformed room record");
                continue;
            };

            let mut room = Room::new(number, kind);
            room.set_booked(booked);

            if let Err(err) = catalog.add(room) {
                warn!(file = %self.paths.rooms.display(), line_no, %err, "skipping room record");
            }
        }

        Ok(catalog)
    }

    /// Load the customer directory from
    /// `identifier,name,email,phone,nationalId,password,points` records.
    ///
    /// Malformed lines and duplicate identifiers are skipped with a warning.
    /// A negative persisted points balance clamps to zero.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Read`] if the file exists but cannot be read.
    pub fn load_customers(&self) -> Result<CustomerDirectory, StoreError> {
        let mut directory = CustomerDirectory::new();

        let Some(contents) = read_store(&self.paths.customers)? else {
            return Ok(directory);
        };

        for (line_no, line) in records(&contents) {
            let Some((identifier, customer)) = parse_customer_record(line) else {
                warn!(file = %self.paths.customers.display(), line_no, "skipping malformed customer record");
                continue;
            };

            if let Err(err) = directory.add(identifier, customer) {
                warn!(file = %self.paths.customers.display(), line_no, %err, "skipping customer record");
            }
        }

        Ok(directory)
    }

    /// Load the booking ledger from `roomNumber,identifier` records.
    ///
    /// Entries referencing rooms absent from the catalog are skipped with a
    /// warning, as are malformed lines; a duplicate entry for a room
    /// replaces the earlier one.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Read`] if the file exists but cannot be read.
    pub fn load_bookings(&self, catalog: &RoomCatalog) -> Result<BookingLedger, StoreError> {
        let mut ledger = BookingLedger::new();

        let Some(contents) = read_store(&self.paths.bookings)? else {
            return Ok(ledger);
        };

        for (line_no, line) in records(&contents) {
            let Some((room, identifier)) = parse_booking_record(line) else {
                warn!(file = %self.paths.bookings.display(), line_no, line, "skipping malformed booking record");
                continue;
            };

            if catalog.get(room).is_none() {
                warn!(file = %self.paths.bookings.display(), line_no, room, "booking references unknown room; skipping");
                continue;
            }

            if let Some(previous) = ledger.occupant(room) {
                warn!(file = %self.paths.bookings.display(), line_no, room, previous, "duplicate booking record; last one wins");
            }

            ledger.insert(room, identifier.to_string());
        }

        Ok(ledger)
    }

    /// Rewrite the rooms store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Write`] if the file cannot be written.
    pub fn save_rooms(&self, catalog: &RoomCatalog) -> Result<(), StoreError> {
        let mut out = String::new();
        for room in catalog.rooms() {
            _ = writeln!(
                out,
                "{},{},{}",
                room.number(),
                u8::from(room.is_booked()),
                room.kind()
            );
        }

        write_store(&self.paths.rooms, &out)
    }

    /// Rewrite the customers store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Write`] if the file cannot be written.
    pub fn save_customers(&self, directory: &CustomerDirectory) -> Result<(), StoreError> {
        let mut out = String::new();
        for (identifier, customer) in directory.iter_sorted() {
            _ = writeln!(
                out,
                "{},{},{},{},{},{},{}",
                identifier,
                customer.name(),
                customer.email(),
                customer.phone(),
                customer.national_id(),
                customer.password(),
                customer.points()
            );
        }

        write_store(&self.paths.customers, &out)
    }

    /// Rewrite the bookings store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Write`] if the file cannot be written.
    pub fn save_bookings(&self, ledger: &BookingLedger) -> Result<(), StoreError> {
        let mut out = String::new();
        for (room, identifier) in ledger.iter() {
            _ = writeln!(out, "{room},{identifier}");
        }

        write_store(&self.paths.bookings, &out)
    }
}

fn read_store(path: &Path) -> Result<Option<String>, StoreError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StoreError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn write_store(path: &Path, contents: &str) -> Result<(), StoreError> {
    fs::write(path, contents).map_err(|source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn records(contents: &str) -> impl Iterator<Item = (usize, &str)> {
    contents
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty())
}

fn parse_room_record(line: &str) -> Option<(u32, bool, RoomType)> {
    let mut fields = line.split(',');
    let number = fields.next()?.trim().parse::<u32>().ok()?;
    let booked = match fields.next()?.trim() {
        "0" => false,
        "1" => true,
        _ => return None,
    };
    let kind = fields.next()?.trim().parse::<RoomType>().ok()?;

    if fields.next().is_some() {
        return None;
    }

    Some((number, booked, kind))
}

fn parse_customer_record(line: &str) -> Option<(String, Customer)> {
    let fields: Vec<&str> = line.split(',').collect();
    let [identifier, name, email, phone, national_id, password, points] = fields.as_slice() else {
        return None;
    };

    let points = points.trim().parse::<i64>().ok()?;
    let points = u32::try_from(points.max(0)).unwrap_or(u32::MAX);

    let customer = Customer::new(*name, *email, *phone, *national_id, *password).with_points(points);

    Some(((*identifier).to_string(), customer))
}

fn parse_booking_record(line: &str) -> Option<(u32, &str)> {
    let (room, identifier) = line.split_once(',')?;
    let room = room.trim().parse::<u32>().ok()?;

    if identifier.is_empty() {
        return None;
    }

    Some((room, identifier))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use testresult::TestResult;

    use super::*;
    use crate::config::StorePaths;

    fn store_in(dir: &Path) -> Store {
        Store::new(StorePaths::in_dir(dir))
    }

    #[test]
    fn missing_files_load_as_empty_stores() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = store_in(dir.path());

        assert!(store.load_rooms()?.is_empty());
        assert!(store.load_customers()?.is_empty());
        assert!(store.load_bookings(&RoomCatalog::new())?.is_empty());

        Ok(())
    }

    #[test]
    fn rooms_round_trip() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = store_in(dir.path());

        let mut catalog = RoomCatalog::new();
        catalog.seed_default_layout()?;
        if let Some(room) = catalog.get_mut(102) {
            room.set_booked(true);
        }

        store.save_rooms(&catalog)?;
        let reloaded = store.load_rooms()?;

        assert_eq!(reloaded, catalog);

        Ok(())
    }

    #[test]
    fn rooms_file_uses_flag_and_type_name_format() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = store_in(dir.path());

        let mut catalog = RoomCatalog::new();
        catalog.add(Room::new(101, RoomType::Standard))?;
        let mut suite = Room::new(103, RoomType::Suite);
        suite.set_booked(true);
        catalog.add(suite)?;

        store.save_rooms(&catalog)?;

        let contents = fs::read_to_string(dir.path().join("rooms.txt"))?;
        assert_eq!(contents, "101,0,Standard\n103,1,Suite\n");

        Ok(())
    }

    #[test]
    fn unknown_room_type_is_skipped() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = store_in(dir.path());
        fs::write(
            dir.path().join("rooms.txt"),
            "101,0,Standard\n102,0,Penthouse\n103,1,Suite\n",
        )?;

        let catalog = store.load_rooms()?;

        assert_eq!(catalog.len(), 2);
        assert!(catalog.get(102).is_none());

        Ok(())
    }

    #[test]
    fn malformed_room_lines_are_skipped() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = store_in(dir.path());
        fs::write(
            dir.path().join("rooms.txt"),
            "not-a-number,0,Standard\n101,2,Standard\n101\n\n102,1,Deluxe\n",
        )?;

        let catalog = store.load_rooms()?;

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(102).map(crate::rooms::Room::is_booked), Some(true));

        Ok(())
    }

    #[test]
    fn customers_round_trip() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = store_in(dir.path());

        let mut directory = CustomerDirectory::new();
        directory.register(
            "alice",
            Customer::new("Alice", "alice@example.com", "0123456789", "123456789012", "p1")
                .with_points(300),
        )?;

        store.save_customers(&directory)?;
        let reloaded = store.load_customers()?;

        let alice = reloaded.get("alice").ok_or("alice missing after reload")?;
        assert_eq!(alice.points(), 300);
        assert_eq!(alice.email(), "alice@example.com");
        assert!(reloaded.authenticate("alice", "p1").is_ok());

        Ok(())
    }

    #[test]
    fn negative_persisted_points_clamp_to_zero() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = store_in(dir.path());
        fs::write(
            dir.path().join("customers.txt"),
            "alice,Alice,a@example.com,0123456789,123456789012,p1,-50\n",
        )?;

        let directory = store.load_customers()?;

        assert_eq!(directory.get("alice").map(Customer::points), Some(0));

        Ok(())
    }

    #[test]
    fn customer_lines_with_wrong_field_count_are_skipped() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = store_in(dir.path());
        fs::write(
            dir.path().join("customers.txt"),
            "broken-line\nalice,Alice,a@example.com,0123456789,123456789012,p1,10\n",
        )?;

        let directory = store.load_customers()?;

        assert_eq!(directory.len(), 1);

        Ok(())
    }

    #[test]
    fn bookings_referencing_unknown_rooms_are_skipped() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = store_in(dir.path());
        let mut catalog = RoomCatalog::new();
        catalog.seed_default_layout()?;

        fs::write(dir.path().join("bookings.txt"), "101,alice\n999,bob\n")?;

        let ledger = store.load_bookings(&catalog)?;

        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.occupant(101), Some("alice"));
        assert_eq!(ledger.occupant(999), None);

        Ok(())
    }

    #[test]
    fn duplicate_booking_records_last_one_wins() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = store_in(dir.path());
        let mut catalog = RoomCatalog::new();
        catalog.seed_default_layout()?;

        fs::write(dir.path().join("bookings.txt"), "101,alice\n101,bob\n")?;

        let ledger = store.load_bookings(&catalog)?;

        assert_eq!(ledger.occupant(101), Some("bob"));

        Ok(())
    }

    #[test]
    fn saves_fully_rewrite_the_file() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = store_in(dir.path());

        let mut ledger = BookingLedger::new();
        ledger.insert(101, "alice".to_string());
        ledger.insert(201, "bob".to_string());
        store.save_bookings(&ledger)?;

        ledger.remove(101);
        store.save_bookings(&ledger)?;

        let contents = fs::read_to_string(dir.path().join("bookings.txt"))?;
        assert_eq!(contents, "201,bob\n");

        Ok(())
    }
}
