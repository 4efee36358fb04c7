//! Rooms

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A room type name that is not one of the known variants.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown room type: {0}")]
pub struct UnknownRoomType(pub String);

/// Room category. A closed set; the nightly price is derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RoomType {
    /// Standard room.
    Standard,
    /// Deluxe room.
    Deluxe,
    /// Suite.
    Suite,
}

impl RoomType {
    /// All room types, in ascending price order.
    pub const ALL: [RoomType; 3] = [RoomType::Standard, RoomType::Deluxe, RoomType::Suite];

    /// Nightly price for this room type.
    #[must_use]
    pub const fn price(self) -> u32 {
        match self {
            RoomType::Standard => 3000,
            RoomType::Deluxe => 5000,
            RoomType::Suite => 8000,
        }
    }

    /// Canonical name, as used in the rooms store.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            RoomType::Standard => "Standard",
            RoomType::Deluxe => "Deluxe",
            RoomType::Suite => "Suite",
        }
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RoomType {
    type Err = UnknownRoomType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Standard" => Ok(RoomType::Standard),
            "Deluxe" => Ok(RoomType::Deluxe),
            "Suite" => Ok(RoomType::Suite),
            other => Err(UnknownRoomType(other.to_string())),
        }
    }
}

/// A single room: its number, its type and whether it is currently booked.
///
/// The booked flag mirrors ledger membership; only the booking engine and
/// load reconciliation may change it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    number: u32,
    kind: RoomType,
    booked: bool,
}

impl Room {
    /// Create an unbooked room.
    #[must_use]
    pub fn new(number: u32, kind: RoomType) -> Self {
        Room {
            number,
            kind,
            booked: false,
        }
    }

    /// Room number. Encodes the floor as `number / 100`.
    #[must_use]
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Floor this room is on.
    #[must_use]
    pub fn floor(&self) -> u32 {
        self.number / 100
    }

    /// Room type.
    #[must_use]
    pub fn kind(&self) -> RoomType {
        self.kind
    }

    /// Nightly price, derived from the room type.
    #[must_use]
    pub fn price(&self) -> u32 {
        self.kind.price()
    }

    /// Whether the room is currently booked.
    #[must_use]
    pub fn is_booked(&self) -> bool {
        self.booked
    }

    pub(crate) fn set_booked(&mut self, booked: bool) {
        self.booked = booked;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_table() {
        assert_eq!(RoomType::Standard.price(), 3000);
        assert_eq!(RoomType::Deluxe.price(), 5000);
        assert_eq!(RoomType::Suite.price(), 8000);
    }

    #[test]
    fn parse_known_names() {
        assert_eq!("Standard".parse(), Ok(RoomType::Standard));
        assert_eq!("Deluxe".parse(), Ok(RoomType::Deluxe));
        assert_eq!("Suite".parse(), Ok(RoomType::Suite));
    }

    #[test]
    fn parse_unknown_name_errors() {
        let err = "Penthouse".parse::<RoomType>();

        assert_eq!(err, Err(UnknownRoomType("Penthouse".to_string())));
    }

    #[test]
    fn parse_is_case_sensitive() {
        assert!("standard".parse::<RoomType>().is_err());
    }

    #[test]
    fn floor_from_number() {
        assert_eq!(Room::new(101, RoomType::Standard).floor(), 1);
        assert_eq!(Room::new(503, RoomType::Suite).floor(), 5);
    }

    #[test]
    fn new_rooms_start_available() {
        assert!(!Room::new(101, RoomType::Standard).is_booked());
    }
}
