//! Host-facing contract and stdio transport for tool-calling clients.

pub mod contract;
pub mod handler;
pub mod stdio;
