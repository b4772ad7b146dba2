//! Command handlers

pub mod backup;
pub mod password;
pub mod sqlcheck;
pub mod token;
pub mod transfer;
