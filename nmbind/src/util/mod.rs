//! Wire-format conversion helpers.

pub(crate) mod utils;
