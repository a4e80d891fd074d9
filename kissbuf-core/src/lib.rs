//! # kissbuf Core
//!
//! Core types shared by the kissbuf generator and its reference codec.
//!
//! This crate provides:
//! - The primitive [`TypeRegistry`] (name, byte width, codec routine names)
//! - Buffer traits for little-endian scalar reads and writes
//! - Dynamic [`Value`]s used to drive the reference codec
//! - Runtime error types mirroring the status codes of generated code

pub mod buffer;
pub mod error;
pub mod types;
pub mod value;

pub use buffer::{ReadBuffer, WriteBuffer};
pub use error::{Error, RegistryError, Result, STATUS_BUFFER_TOO_SMALL, STATUS_OK};
pub use types::{PrimitiveType, ScalarRepr, TypeRegistry};
pub use value::{Scalar, Value};
