//! Time abstractions
//!
//! Credential expiry is evaluated lazily against a [`Clock`], so tests can
//! move time forward with [`MockClock`] instead of sleeping.

pub mod clock;

pub use clock::{Clock, MockClock, SystemClock};
