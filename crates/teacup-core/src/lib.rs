//! Core types for the teacup buffer utility.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! owned buffer shapes handed across the FFI boundary, the record type that
//! optionally owns a jagged buffer, the element-wise numeric operations, and
//! the error and configuration types shared by the rest of the workspace.
//!
//! Every buffer has exactly one owner. Release operations take `self` by
//! value, so a released buffer cannot be read, written, or released again.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod element;
pub mod error;
pub mod flat;
pub mod jagged;
pub mod ops;
pub mod record;

pub use config::AllocConfig;
pub use element::Element;
pub use error::BufferError;
pub use flat::FlatBuffer;
pub use jagged::{JaggedBuffer, ReleaseSummary};
pub use record::DataRecord;
