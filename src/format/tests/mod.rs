//! Unit tests for the marker exchange format.
//!
//! These tests verify parsing, validation and round-trip conversions of
//! marker documents.

mod export_tests;
mod import_tests;
mod roundtrip_tests;
