//! Common test utilities

pub mod remo_mock;
pub mod test_fixtures;

pub use remo_mock::{MockHub, MockRemoCloud};
