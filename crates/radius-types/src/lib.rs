//! # radius-types
//!
//! Transaction types for the Radius SDK.
//!
//! This crate provides:
//! - [`Transaction`] - unsigned transaction produced by the preparer
//! - [`SignedTransaction`] - signature plus canonical serialized bytes
//! - [`Log`] - event log entry attached to a receipt
//! - [`codec`] - legacy/EIP-155 RLP encoding

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
mod error;
mod log;
mod transaction;

pub use error::TypesError;
pub use log::Log;
pub use transaction::{SignedTransaction, Transaction, TxSignature};
