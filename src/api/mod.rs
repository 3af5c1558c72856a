//! Homework statuses API: record types, response validation and the HTTP client.

mod client;
mod homework;

pub use client::{HomeworkApi, PracticumClient, PracticumClientBuilder};
pub use homework::{Homework, HomeworkStatus, StatusPage, check_response};
