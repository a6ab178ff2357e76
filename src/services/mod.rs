//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! `gateway` owns the single external model call; `bridge` translates
//! front-end chat requests into gateway calls. Route handlers stay focused
//! on protocol translation.

pub mod bridge;
pub mod gateway;
