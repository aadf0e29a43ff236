#![allow(clippy::needless_return)]

pub mod core;
pub mod error;
pub mod logging;
