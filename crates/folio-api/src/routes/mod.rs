//! Route modules.

pub mod frontend;
pub mod health;
pub mod widgets;
