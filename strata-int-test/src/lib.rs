//! Shared fixtures for the strata integration tests.

pub mod test_util;
