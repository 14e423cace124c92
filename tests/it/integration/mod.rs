//! Multi-component workflow tests.

mod gesture_flow_tests;
mod round_trip_tests;
