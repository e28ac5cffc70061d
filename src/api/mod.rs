pub mod attendance;
pub mod banking;
pub mod client;
pub mod contracts;
pub mod envelope;
pub mod finance;
pub mod members;
pub mod registration;
pub mod sepa;
pub mod tariffs;

pub use client::{ApiClient, Download};
