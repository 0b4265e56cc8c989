//! # Core Runtime Module
//!
//! Foundational runtime infrastructure for the client core:
//! - Logging and tracing configuration
//! - Configuration management with fail-fast capability validation
//! - Event bus for session state changes
//!
//! ## Overview
//!
//! This crate contains the runtime utilities the auth core depends on. It
//! establishes the logging conventions and the event broadcasting mechanism
//! observed by the presentation layer.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
