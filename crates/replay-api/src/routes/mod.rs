//! API route handlers

pub mod export;
pub mod frames;
pub mod map;
pub mod scenarios;
