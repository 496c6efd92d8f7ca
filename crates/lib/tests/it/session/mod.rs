//! Session resolution integration tests

mod resolver_tests;
mod store_tests;
