//! Dylink - short links, Douyin share parsing and text crypto from the terminal
//!
//! The interesting part is [`acquire`]: a resilient download chain for
//! hotlink-protected media. Everything else is a thin client for the backend.

pub mod acquire;
pub mod api;
pub mod clipboard;
pub mod launcher;
pub mod logging;
pub mod models;
pub mod operator;
pub mod storage;
