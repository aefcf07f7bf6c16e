//! IMA ADPCM Test Modules
//!
//! This module organizes the test suite for the IMA ADPCM block codec.

pub mod utils;

mod layout_tests;
mod reference_tests;
