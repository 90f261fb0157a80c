//! CETMA - Course Platform Backend
//!
//! This crate implements a course platform backend: user accounts,
//! courses with sub-courses and quiz questions, and a payment-driven
//! course unlock workflow.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
