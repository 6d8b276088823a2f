//! Test suites for the location bridge.

pub(crate) mod support;
