//! API middleware stack.
//!
//! Execution order (outermost → innermost):
//! 1. Cache-Control header: tracker data is never cached
//! 2. Audit logger: method, path, status

pub mod audit;
