//! wozsim - Wizard-of-Oz dialogue simulation engine
//!
//! This crate generates synthetic knowledge bases for simulated business
//! domains, answers constraint queries against them, and runs turn-based
//! dialogue sessions between a user role and a wizard role who consults
//! the knowledge base.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
