//! Customers and the loyalty programme

use std::fmt;

use rustc_hash::FxHashMap;
use thiserror::Error;

/// Errors related to customer registration and lookup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DirectoryError {
    /// A customer with this identifier is already registered.
    #[error("identifier {0:?} is already registered")]
    DuplicateIdentifier(String),

    /// No customer with this identifier exists.
    #[error("no customer with identifier {0:?}")]
    NotFound(String),

    /// The identifier exists but the password did not match.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// A field contains a character the flat-file store cannot represent.
    #[error("field {field} must not contain commas or line breaks")]
    InvalidField {
        /// Name of the offending field.
        field: &'static str,
    },
}

/// Loyalty tier, a pure function of the points balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LoyaltyTier {
    /// Below 200 points.
    Regular,
    /// 200 points and above.
    Silver,
    /// 500 points and above.
    Gold,
    /// 1000 points and above.
    Platinum,
}

impl LoyaltyTier {
    /// Tier for a given points balance.
    #[must_use]
    pub const fn for_points(points: u32) -> Self {
        match points {
            1000.. => LoyaltyTier::Platinum,
            500.. => LoyaltyTier::Gold,
            200.. => LoyaltyTier::Silver,
            _ => LoyaltyTier::Regular,
        }
    }

    /// Display name of the tier.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            LoyaltyTier::Regular => "Regular",
            LoyaltyTier::Silver => "Silver",
            LoyaltyTier::Gold => "Gold",
            LoyaltyTier::Platinum => "Platinum",
        }
    }
}

impl fmt::Display for LoyaltyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A registered customer.
///
/// The points balance never goes negative; the tier is recomputed on every
/// balance change and cannot be set independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    name: String,
    email: String,
    phone: String,
    national_id: String,
    password: String,
    points: u32,
    tier: LoyaltyTier,
}

impl Customer {
    /// Create a customer with zero points and Regular tier.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        national_id: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Customer {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            national_id: national_id.into(),
            password: password.into(),
            points: 0,
            tier: LoyaltyTier::Regular,
        }
    }

    /// Reconstruct a customer with a persisted points balance.
    #[must_use]
    pub fn with_points(mut self, points: u32) -> Self {
        self.points = points;
        self.tier = LoyaltyTier::for_points(points);
        self
    }

    /// Full name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Phone number.
    #[must_use]
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// National id number.
    #[must_use]
    pub fn national_id(&self) -> &str {
        &self.national_id
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }

    /// Current loyalty points balance.
    #[must_use]
    pub fn points(&self) -> u32 {
        self.points
    }

    /// Current loyalty tier.
    #[must_use]
    pub fn tier(&self) -> LoyaltyTier {
        self.tier
    }

    /// Apply a points delta. Negative balances clamp to zero; there is no
    /// upper ceiling. Returns the new balance.
    pub fn adjust_points(&mut self, delta: i64) -> u32 {
        let balance = i64::from(self.points).saturating_add(delta).max(0);
        self.points = u32::try_from(balance).unwrap_or(u32::MAX);
        self.tier = LoyaltyTier::for_points(self.points);
        self.points
    }
}

/// All registered customers, keyed by their unique login identifier.
#[derive(Debug, Default, Clone)]
pub struct CustomerDirectory {
    customers: FxHashMap<String, Customer>,
}

impl CustomerDirectory {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new customer.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::DuplicateIdentifier`] if the identifier is
    /// taken, or [`DirectoryError::InvalidField`] if any field contains a
    /// comma or line break (the store format is comma-delimited and
    /// unescaped).
    pub fn register(&mut self, identifier: &str, customer: Customer) -> Result<(), DirectoryError> {
        reject_unstorable("identifier", identifier)?;
        reject_unstorable("name", &customer.name)?;
        reject_unstorable("email", &customer.email)?;
        reject_unstorable("phone", &customer.phone)?;
        reject_unstorable("national id", &customer.national_id)?;
        reject_unstorable("password", &customer.password)?;

        self.add(identifier.to_string(), customer)
    }

    /// Add a customer record without field hygiene checks. Used when
    /// reconstructing the directory from persisted records.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::DuplicateIdentifier`] if the identifier is
    /// taken.
    pub fn add(&mut self, identifier: String, customer: Customer) -> Result<(), DirectoryError> {
        if self.customers.contains_key(&identifier) {
            return Err(DirectoryError::DuplicateIdentifier(identifier));
        }

        self.customers.insert(identifier, customer);

        Ok(())
    }

    /// Authenticate by identifier and password.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::NotFound`] when the identifier is unknown
    /// and [`DirectoryError::InvalidCredentials`] when the password does not
    /// match; callers may unify the two for display.
    pub fn authenticate(&self, identifier: &str, password: &str) -> Result<&Customer, DirectoryError> {
        let customer = self
            .customers
            .get(identifier)
            .ok_or_else(|| DirectoryError::NotFound(identifier.to_string()))?;

        if customer.password() == password {
            Ok(customer)
        } else {
            Err(DirectoryError::InvalidCredentials)
        }
    }

    /// Look up a customer by identifier.
    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<&Customer> {
        self.customers.get(identifier)
    }

    /// Whether a customer with this identifier exists.
    #[must_use]
    pub fn contains(&self, identifier: &str) -> bool {
        self.customers.contains_key(identifier)
    }

    /// Apply a points delta to a customer. Returns the new balance.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::NotFound`] if the identifier is unknown.
    pub fn adjust_points(&mut self, identifier: &str, delta: i64) -> Result<u32, DirectoryError> {
        let customer = self
            .customers
            .get_mut(identifier)
            .ok_or_else(|| DirectoryError::NotFound(identifier.to_string()))?;

        Ok(customer.adjust_points(delta))
    }

    /// Number of registered customers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.customers.len()
    }

    /// Check whether the directory is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    /// Customers sorted by identifier, for deterministic listing and saving.
    #[must_use]
    pub fn iter_sorted(&self) -> Vec<(&str, &Customer)> {
        let mut entries: Vec<(&str, &Customer)> = self
            .customers
            .iter()
            .map(|(identifier, customer)| (identifier.as_str(), customer))
            .collect();
        entries.sort_by_key(|(identifier, _)| *identifier);
        entries
    }
}

fn reject_unstorable(field: &'static str, value: &str) -> Result<(), DirectoryError> {
    if value.contains([',', '\n', '\r']) {
        Err(DirectoryError::InvalidField { field })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Customer {
        Customer::new("Alice", "alice@example.com", "0123456789", "123456789012", "p1")
    }

    #[test]
    fn tier_thresholds() {
        assert_eq!(LoyaltyTier::for_points(0), LoyaltyTier::Regular);
        assert_eq!(LoyaltyTier::for_points(199), LoyaltyTier::Regular);
        assert_eq!(LoyaltyTier::for_points(200), LoyaltyTier::Silver);
        assert_eq!(LoyaltyTier::for_points(499), LoyaltyTier::Silver);
        assert_eq!(LoyaltyTier::for_points(500), LoyaltyTier::Gold);
        assert_eq!(LoyaltyTier::for_points(999), LoyaltyTier::Gold);
        assert_eq!(LoyaltyTier::for_points(1000), LoyaltyTier::Platinum);
    }

    #[test]
    fn adjust_points_clamps_at_zero() {
        let mut customer = alice().with_points(100);

        let balance = customer.adjust_points(-300);

        assert_eq!(balance, 0);
        assert_eq!(customer.tier(), LoyaltyTier::Regular);
    }

    #[test]
    fn adjust_points_recomputes_tier() {
        let mut customer = alice();

        customer.adjust_points(500);
        assert_eq!(customer.tier(), LoyaltyTier::Gold);

        customer.adjust_points(-1);
        assert_eq!(customer.tier(), LoyaltyTier::Silver);
    }

    #[test]
    fn register_rejects_duplicate_identifier() {
        let mut directory = CustomerDirectory::new();
        assert_eq!(directory.register("alice", alice()), Ok(()));

        let result = directory.register("alice", alice());

        assert_eq!(
            result,
            Err(DirectoryError::DuplicateIdentifier("alice".to_string()))
        );
    }

    #[test]
    fn register_rejects_fields_with_commas() {
        let mut directory = CustomerDirectory::new();
        let customer = Customer::new("Smith, Alice", "a@example.com", "0123456789", "123456789012", "p1");

        let result = directory.register("alice", customer);

        assert_eq!(result, Err(DirectoryError::InvalidField { field: "name" }));
    }

    #[test]
    fn authenticate_distinguishes_unknown_from_wrong_password() {
        let mut directory = CustomerDirectory::new();
        assert_eq!(directory.register("alice", alice()), Ok(()));

        assert_eq!(
            directory.authenticate("bob", "p1").err(),
            Some(DirectoryError::NotFound("bob".to_string()))
        );
        assert_eq!(
            directory.authenticate("alice", "wrong").err(),
            Some(DirectoryError::InvalidCredentials)
        );
        assert!(directory.authenticate("alice", "p1").is_ok());
    }

    #[test]
    fn passwords_are_case_sensitive() {
        let mut directory = CustomerDirectory::new();
        assert_eq!(directory.register("alice", alice()), Ok(()));

        assert_eq!(
            directory.authenticate("alice", "P1").err(),
            Some(DirectoryError::InvalidCredentials)
        );
    }

    #[test]
    fn iter_sorted_orders_by_identifier() {
        let mut directory = CustomerDirectory::new();
        for identifier in ["carol", "alice", "bob"] {
            assert_eq!(directory.register(identifier, alice()), Ok(()));
        }

        let identifiers: Vec<&str> = directory
            .iter_sorted()
            .into_iter()
            .map(|(identifier, _)| identifier)
            .collect();

        assert_eq!(identifiers, vec!["alice", "bob", "carol"]);
    }
}
