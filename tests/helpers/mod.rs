//! Test helpers module
//!
//! This module provides utilities and helpers for testing KeyRoomBot.
//! It includes recording fakes, a mock Telegram server and test context setup.

#![allow(dead_code)]

pub mod fakes;
pub mod telegram_mock;
pub mod test_context;

pub use fakes::*;
pub use telegram_mock::*;
pub use test_context::*;
