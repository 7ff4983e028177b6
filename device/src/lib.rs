//! Target device description and the boundaries to external compilers and caches.
//!
//! Kernel generation only needs a handful of hardware limits. Everything else about a device
//! (queues, memory, events) lives behind the [`Compiler`] trait implemented by backend glue.
//!
//! # Module Organization
//!
//! - [`info`] - Device capabilities, derived register-space estimates and their text form
//! - [`parse`] - Cursor over compact text descriptors with positioned error messages
//! - [`compiler`] - Backend compiler boundary
//! - [`cache`] - Binary kernel cache boundary and an in-memory implementation
//! - [`error`] - Error types and result handling

pub mod cache;
pub mod compiler;
pub mod error;
pub mod info;
pub mod parse;


pub use cache::{CacheKey, KernelCache, MemoryCache};
pub use compiler::Compiler;
pub use error::{Error, Result};
pub use info::{DeviceInfo, DeviceType};
pub use parse::{Cursor, ParseError};
