//! # ck-common-core
//!
//! Core types for Chalk that are `no_std` compatible.
//!
//! This crate provides the tags shared by the heap and the embedding API:
//! - `ObjectKind` - Internal heap object classification
//! - `ApiType` - The reduced type tag exposed to host code

#![cfg_attr(not(feature = "std"), no_std)]

mod types;

pub use types::{ApiType, ObjectKind, API_OBJECT_TYPES};
