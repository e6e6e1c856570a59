//! Study analyzer - turns document text and images into a study summary,
//! a growable bank of multiple-choice questions, and web references.
//!
//! All reasoning is delegated to a hosted generative model. This crate owns
//! the prompt contract sent to it and the parsing of its free-text answer.

pub mod ai;
pub mod app;
pub mod error;
pub mod models;
pub mod observer;
pub mod parser;
pub mod prompts;
pub mod request;
pub mod session;
pub mod upload;

pub use error::{Error, Result};
