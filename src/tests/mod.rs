//! Unit tests for the comparison engine
//!
//! Tests are organized by module and functionality.

pub mod range_tests;
