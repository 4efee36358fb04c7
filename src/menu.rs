//! Interactive text-menu surface
//!
//! The session is parametrised over its input and output streams, so menu
//! flows can be scripted in tests. All state changes go through the
//! [`Hotel`] engine; the menu only prompts, validates and displays.

use std::io::{self, BufRead, Write};

use thiserror::Error;

use crate::{
    config::AdminCredentials,
    customers::{Customer, DirectoryError},
    hotel::{Hotel, HotelError},
    reports::{self, OccupancyReport, PopularRoomTypes, ReportError},
};

/// Errors that end a menu session.
#[derive(Debug, Error)]
pub enum MenuError {
    /// IO error on the session streams.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Report rendering failure.
    #[error(transparent)]
    Report(#[from] ReportError),
}

/// A rejected input value, with a message suitable for re-prompting.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Not a plausible email address.
    #[error("Invalid email format.")]
    InvalidEmail,

    /// Not a 10-digit phone number.
    #[error("Phone numbers must be exactly 10 digits.")]
    InvalidPhone,

    /// Not a 12-digit national id number.
    #[error("National id numbers must be exactly 12 digits.")]
    InvalidNationalId,

    /// Contains characters the flat-file store cannot represent.
    #[error("Input must not contain commas or line breaks.")]
    UnstorableCharacter,

    /// Empty input where a value is required.
    #[error("Input must not be empty.")]
    Empty,
}

/// Validate an email address: a local part, `@`, and a dotted domain.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidEmail`] if the shape does not match.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationError::InvalidEmail);
    };
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return Err(ValidationError::InvalidEmail);
    };

    let local_ok = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c));
    let host_ok = !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || ".-".contains(c));
    let tld_ok = tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic());

    if local_ok && host_ok && tld_ok {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

/// Validate a phone number: exactly 10 ASCII digits.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidPhone`] otherwise.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.len() == 10 && phone.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidPhone)
    }
}

/// Validate a national id number: exactly 12 ASCII digits.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidNationalId`] otherwise.
pub fn validate_national_id(id: &str) -> Result<(), ValidationError> {
    if id.len() == 12 && id.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidNationalId)
    }
}

/// Validate a free-text field: non-empty and storable in the
/// comma-delimited flat files.
///
/// # Errors
///
/// Returns [`ValidationError::Empty`] or
/// [`ValidationError::UnstorableCharacter`].
pub fn validate_field(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        Err(ValidationError::Empty)
    } else if value.contains([',', '\n', '\r']) {
        Err(ValidationError::UnstorableCharacter)
    } else {
        Ok(())
    }
}

/// One interactive session over a hotel.
#[derive(Debug)]
pub struct MenuSession<'a, R, W> {
    hotel: &'a mut Hotel,
    admin: AdminCredentials,
    input: R,
    out: W,
}

impl<'a, R: BufRead, W: Write> MenuSession<'a, R, W> {
    /// Create a session over the given streams.
    pub fn new(hotel: &'a mut Hotel, admin: AdminCredentials, input: R, out: W) -> Self {
        MenuSession {
            hotel,
            admin,
            input,
            out,
        }
    }

    /// Run the top-level menu until exit or end of input, then flush all
    /// stores.
    ///
    /// # Errors
    ///
    /// Returns a [`MenuError`] only for stream failures; engine errors are
    /// reported to the user and the session continues.
    pub fn run(&mut self) -> Result<(), MenuError> {
        loop {
            writeln!(self.out, "\n===== Welcome to the Hotel Booking System =====")?;
            writeln!(self.out, "1. Admin Login")?;
            writeln!(self.out, "2. User Login")?;
            writeln!(self.out, "3. Register as User")?;
            writeln!(self.out, "4. Exit")?;

            let Some(choice) = self.prompt("Enter your choice: ")? else {
                break;
            };

            match choice.as_str() {
                "1" => self.admin_login()?,
                "2" => self.user_login()?,
                "3" => self.register()?,
                "4" => {
                    writeln!(self.out, "Exiting the system. Goodbye!")?;
                    break;
                }
                _ => writeln!(self.out, "Invalid choice. Please try again.")?,
            }
        }

        if let Err(err) = self.hotel.flush_all() {
            writeln!(self.out, "Warning: failed to write stores on shutdown: {err}")?;
        }

        Ok(())
    }

    fn admin_login(&mut self) -> Result<(), MenuError> {
        writeln!(self.out, "=== Admin Login ===")?;
        let Some(identifier) = self.prompt("Enter admin username: ")? else {
            return Ok(());
        };
        let Some(password) = self.prompt("Enter admin password: ")? else {
            return Ok(());
        };

        if self.admin.matches(&identifier, &password) {
            writeln!(self.out, "Admin login successful!")?;
            self.admin_menu()?;
        } else {
            writeln!(self.out, "Incorrect admin credentials. Access denied.")?;
        }

        Ok(())
    }

    fn admin_menu(&mut self) -> Result<(), MenuError> {
        loop {
            writeln!(self.out, "\n=== Admin Menu ===")?;
            writeln!(self.out, "1. View Customer Details")?;
            writeln!(self.out, "2. View Customer Bookings")?;
            writeln!(self.out, "3. Generate Occupancy Report")?;
            writeln!(self.out, "4. Generate Popular Room Types Report")?;
            writeln!(self.out, "5. Checkout Room")?;
            writeln!(self.out, "6. Logout")?;

            let Some(choice) = self.prompt("Enter your choice: ")? else {
                return Ok(());
            };

            match choice.as_str() {
                "1" => reports::write_customer_table(&mut self.out, self.hotel.directory())?,
                "2" => reports::write_booking_table(
                    &mut self.out,
                    self.hotel.ledger(),
                    self.hotel.catalog(),
                )?,
                "3" => match OccupancyReport::generate(self.hotel.catalog(), self.hotel.ledger()) {
                    Ok(report) => report.write_to(&mut self.out)?,
                    Err(err) => writeln!(self.out, "{err}")?,
                },
                "4" => PopularRoomTypes::generate(self.hotel.catalog(), self.hotel.ledger())
                    .write_to(&mut self.out)?,
                "5" => self.checkout()?,
                "6" => {
                    writeln!(self.out, "Logging out from admin account...")?;
                    return Ok(());
                }
                _ => writeln!(self.out, "Invalid choice. Please try again.")?,
            }
        }
    }

    fn checkout(&mut self) -> Result<(), MenuError> {
        let Some(room) = self.prompt_room_number("Enter room number to checkout (e.g. 101): ")?
        else {
            return Ok(());
        };

        match self.hotel.checkout(room) {
            Ok(occupant) => writeln!(
                self.out,
                "Room {room} has been checked out by user {occupant:?} and is now available."
            )?,
            Err(err) => writeln!(self.out, "{err}")?,
        }

        Ok(())
    }

    fn user_login(&mut self) -> Result<(), MenuError> {
        writeln!(self.out, "=== User Login ===")?;
        let Some(identifier) = self.prompt("Enter username: ")? else {
            return Ok(());
        };
        let Some(password) = self.prompt("Enter password: ")? else {
            return Ok(());
        };

        let name = match self.hotel.authenticate(&identifier, &password) {
            Ok(customer) => customer.name().to_string(),
            Err(HotelError::Directory(DirectoryError::NotFound(_))) => {
                writeln!(self.out, "Username not found. Please register first.")?;
                return Ok(());
            }
            Err(_) => {
                writeln!(self.out, "Incorrect password. Please try again.")?;
                return Ok(());
            }
        };

        writeln!(self.out, "Login successful! Welcome, {name}!")?;
        self.user_menu(&identifier)
    }

    fn user_menu(&mut self, identifier: &str) -> Result<(), MenuError> {
        loop {
            writeln!(self.out, "\n=== User Menu ===")?;
            writeln!(self.out, "1. View Available Rooms")?;
            writeln!(self.out, "2. Book Room")?;
            writeln!(self.out, "3. Cancel Booking")?;
            writeln!(self.out, "4. View Loyalty Points")?;
            writeln!(self.out, "5. Logout")?;

            let Some(choice) = self.prompt("Enter your choice: ")? else {
                return Ok(());
            };

            match choice.as_str() {
                "1" => reports::write_available_rooms(&mut self.out, self.hotel.catalog())?,
                "2" => self.book_room(identifier)?,
                "3" => self.cancel_booking(identifier)?,
                "4" => {
                    if let Some(customer) = self.hotel.directory().get(identifier) {
                        let points = customer.points();
                        let tier = customer.tier();
                        writeln!(self.out, "Loyalty Points: {points} (Tier: {tier})")?;
                    }
                }
                "5" => {
                    writeln!(self.out, "Logging out...")?;
                    return Ok(());
                }
                _ => writeln!(self.out, "Invalid choice. Please try again.")?,
            }
        }
    }

    fn book_room(&mut self, identifier: &str) -> Result<(), MenuError> {
        reports::write_available_rooms(&mut self.out, self.hotel.catalog())?;

        let Some(room) = self.prompt_room_number("Enter room number: ")? else {
            return Ok(());
        };

        match self.hotel.book(room, identifier) {
            Ok(confirmation) => writeln!(
                self.out,
                "Room {} booked successfully! You earned {} loyalty points.",
                confirmation.room, confirmation.points_earned
            )?,
            Err(err) => writeln!(self.out, "{err}")?,
        }

        Ok(())
    }

    fn cancel_booking(&mut self, identifier: &str) -> Result<(), MenuError> {
        let listed = reports::write_customer_rooms(
            &mut self.out,
            self.hotel.ledger(),
            self.hotel.catalog(),
            identifier,
        )?;

        if listed == 0 {
            writeln!(self.out, "You have no bookings to cancel.")?;
            return Ok(());
        }

        let Some(room) = self.prompt_room_number("Enter room number to cancel booking: ")? else {
            return Ok(());
        };

        match self.hotel.cancel(room, identifier) {
            Ok(cancellation) => writeln!(
                self.out,
                "Booking for room {} has been cancelled. You lost {} loyalty points.",
                cancellation.room, cancellation.points_deducted
            )?,
            Err(err) => writeln!(self.out, "{err}")?,
        }

        Ok(())
    }

    fn register(&mut self) -> Result<(), MenuError> {
        writeln!(self.out, "=== User Registration ===")?;

        let Some(identifier) = self.prompt_validated("Enter username: ", validate_field)? else {
            return Ok(());
        };

        if self.hotel.directory().contains(&identifier) {
            writeln!(
                self.out,
                "Username already exists. Please choose a different username."
            )?;
            return Ok(());
        }

        let Some(password) = self.prompt_validated("Enter password: ", validate_field)? else {
            return Ok(());
        };
        let Some(name) = self.prompt_validated("Enter your full name: ", validate_field)? else {
            return Ok(());
        };
        let Some(email) = self.prompt_validated("Enter your email: ", validate_email)? else {
            return Ok(());
        };
        let Some(phone) =
            self.prompt_validated("Enter your phone number (10 digits): ", validate_phone)?
        else {
            return Ok(());
        };
        let Some(national_id) = self.prompt_validated(
            "Enter your national id number (12 digits): ",
            validate_national_id,
        )?
        else {
            return Ok(());
        };

        let customer = Customer::new(name, email, phone, national_id, password);

        match self.hotel.register(&identifier, customer) {
            Ok(()) => writeln!(self.out, "Registration successful!")?,
            Err(err) => writeln!(self.out, "Registration failed: {err}")?,
        }

        Ok(())
    }

    /// Prompt once; `None` means end of input.
    fn prompt(&mut self, text: &str) -> Result<Option<String>, MenuError> {
        write!(self.out, "{text}")?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        Ok(Some(line.trim().to_string()))
    }

    /// Prompt until the validator accepts the input or input ends.
    fn prompt_validated(
        &mut self,
        text: &str,
        validate: impl Fn(&str) -> Result<(), ValidationError>,
    ) -> Result<Option<String>, MenuError> {
        loop {
            let Some(value) = self.prompt(text)? else {
                return Ok(None);
            };

            match validate(&value) {
                Ok(()) => return Ok(Some(value)),
                Err(err) => writeln!(self.out, "{err} Please try again.")?,
            }
        }
    }

    /// Prompt until the input parses as a room number or input ends.
    fn prompt_room_number(&mut self, text: &str) -> Result<Option<u32>, MenuError> {
        loop {
            let Some(value) = self.prompt(text)? else {
                return Ok(None);
            };

            match value.parse::<u32>() {
                Ok(number) => return Ok(Some(number)),
                Err(_) => writeln!(
                    self.out,
                    "Invalid input. Please enter a valid numeric room number."
                )?,
            }
        }
    }
}
