//! REST API endpoint tests

mod health_tests;
mod login_tests;
mod message_tests;
