//! Presence store integration tests

mod lifecycle_tests;
