//! Infrastructure adapters. Implement the ports.
//!
//! HTTP inbound, remote classifier and storage outbound. Map errors to DomainError.

pub mod ai;
pub mod http;
pub mod persistence;
