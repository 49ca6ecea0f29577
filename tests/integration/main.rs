//! Integration tests for Forum-Sweep
//!
//! These tests use wiremock to serve a fake board and run whole scrapes
//! against it.

mod scrape_tests;
