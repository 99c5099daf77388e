//! Unit tests for handshake fragment parsing and reassembly.
//!
//! Tests are split into focused submodules to keep each file short and easy
//! to navigate.

mod buffer_tests;
