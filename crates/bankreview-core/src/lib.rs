//! Core types and trait definitions for the bank review store.
//!
//! This crate is free of database dependencies. Value types here enforce the
//! same range and enumeration constraints that the schema declares, so an
//! out-of-range rating or unknown sentiment label cannot be constructed in the
//! first place.

// Native `async fn` in traits; the trait spells out `Send` bounds explicitly.
#![allow(async_fn_in_trait)]

pub mod bank;
pub mod comparison;
pub mod error;
pub mod integrity;
pub mod performance;
pub mod review;
pub mod store;
pub mod trends;

pub use error::{Error, Result};
