#![allow(dead_code)]

pub use mkrun_test_utils::{init_tracing, with_timeout};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;
