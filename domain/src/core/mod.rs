//! Core domain concepts shared across all subdomains.
//!
//! - [`question::QuestionItem`]: a multiple-choice question with its source document
//! - [`dataset::DatasetKind`]: which benchmark the questions come from
//! - [`error::DomainError`]: domain-level errors

pub mod dataset;
pub mod error;
pub mod question;
pub mod string;
