//! Integration tests for Trawl
//!
//! Crawls run against wiremock servers; every test works in its own tempdir.

mod common;
mod convert_tests;
mod pipeline_tests;
