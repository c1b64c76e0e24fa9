//! Shared helpers: order-date handling and input validation.

pub mod dates;
pub mod validation;
