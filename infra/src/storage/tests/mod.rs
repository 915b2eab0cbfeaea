//! Image storage tests
