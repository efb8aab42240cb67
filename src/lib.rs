//! # WalletScore Rust
//! Main library file for WalletScore.
//! An on-chain wallet trust scoring service built in Rust.
//!
//! Given an Ethereum address, the pipeline fetches the account's transaction
//! history and balance from a block-explorer API, derives a fixed-schema
//! behavioral feature vector, runs it through a pre-trained scoring model and
//! returns a bounded trust score, a categorical label and a set of
//! human-readable risk flags.

pub use crate::utils::error::{Error, Result};

pub mod config;
pub mod explorer;
pub mod features;
pub mod model;
pub mod scoring;
pub mod server;
pub mod utils;
