//! Test utilities.
//!
//! This module provides:
//! - Test data factories for creating valid test fixtures
//! - In-memory repository implementations for mocking persistence
//! - A builder for constructing an `AppState` over the mocks

mod app_state_builder;
mod mocks;

pub use app_state_builder::*;
pub use factories::*;
pub use mocks::*;
