//! Tests for medicine lifecycle engine

mod service_tests;
