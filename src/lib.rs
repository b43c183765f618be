//! Frustration triage: score customer emails for frustration and summarise
//! the frustrated ones.

pub mod config;
pub mod error;
pub mod http;
pub mod mail;
pub mod oracle;
pub mod pipeline;
pub mod scoring;
pub mod text;
