//! Tests for the api module.
