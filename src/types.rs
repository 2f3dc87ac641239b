//! Re-exported types from external crates for convenience.
//!
//! These types appear throughout the request and response records of this SDK and are
//! re-exported here so users don't need to add these dependencies to their `Cargo.toml`.

/// Date and time types for timestamps in API responses.
pub use chrono::{DateTime, Utc};
/// Arbitrary precision decimal type for bet amounts, payouts and transfers.
pub use rust_decimal::Decimal;
/// Macro for creating [`Decimal`] literals at compile time.
///
/// # Example
/// ```
/// use betting_client_sdk::types::dec;
/// let stake = dec!(2.5);
/// ```
pub use rust_decimal_macros::dec;
/// Secret string type that redacts the session token in debug output.
pub use secrecy::{ExposeSecret, SecretString};
