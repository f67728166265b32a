//! Integration tests, compiled as a single test binary

mod common;
mod crawl_tests;
mod fetcher_tests;
