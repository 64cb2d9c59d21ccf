//! Row structs for the tables this service reads.

pub mod category;
pub mod session;
