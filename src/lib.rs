//! # reward-tracker
//!
//! Work and payment ledger for a small crew, driven by a Telegram bot.
//!
//! One admin records work units and payments per named worker; anyone can
//! read the standings. State is a single JSON document rewritten in full on
//! every mutation.

pub mod auth;
pub mod command;
pub mod config;
pub mod error;
pub mod health;
pub mod messages;
pub mod model;
pub mod storage;
pub mod telegram;
pub mod telemetry;
pub mod tracker;
