//! HTTP Handlers

pub mod health;
pub mod login;
pub mod message;
pub mod presence;
