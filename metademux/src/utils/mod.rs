//! Utility functions and supporting infrastructure.
//!
//! Provides the bounded record buffer, case-insensitive scanning, entity
//! decoding, the source and sink seams, and error handling.

pub mod entities;
pub mod errors;
pub mod record_buffer;
pub mod scan;
pub mod sink;
pub mod source;
