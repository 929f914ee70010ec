//! Type definitions and constants.
//!
//! This module contains NetworkManager constants: bus names, object paths,
//! interface names and the numeric codes used by properties.

pub(crate) mod constants;
