//! Single-component unit tests.

mod geometry_tests;
mod perf_tests;
