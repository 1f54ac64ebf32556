//! Core data models for tane.
//!
//! This crate provides the ticket and response types produced by the
//! extractors and consumed by the scheduler and the command line.

pub mod response;
pub mod ticket;

// Re-export main types
pub use response::{Response, ResponseKind, RESPONSE_TIME_FORMAT};
pub use ticket::{
    Collection, DetailLevel, Listing, Ticket, TicketCategory, TicketComplete, TicketSummary,
};
