//! Unit tests for the identity module.

mod points_tests;
