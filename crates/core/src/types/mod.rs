//! Core types for Dialout.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod phone;
pub mod price;

pub use id::*;
pub use phone::PhoneNumber;
pub use price::{CurrencyCode, CurrencyCodeError, Price};
