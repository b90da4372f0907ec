//! Asynchronous implementations of core components
//!
//! This module provides thread-safe, concurrent counterparts of the
//! single-threaded store and batch runner, using DashMap for storage and
//! tokio tasks for parallel validation.
//!
//! # Architecture
//!
//! - **AsyncTransactionStore**: Thread-safe record storage using DashMap
//! - **BatchProcessor**: Splits each batch into chunks validated on separate tasks
//!
//! # Thread Safety
//!
//! Validation is pure, so tasks never contend on anything but the store.
//! Records are placed at sequence numbers reserved before the batch is split,
//! so listings do not depend on task scheduling.

pub mod batch_processor;
pub mod transaction_store;

pub use batch_processor::BatchProcessor;
pub use transaction_store::AsyncTransactionStore;
