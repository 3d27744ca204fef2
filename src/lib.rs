//! Course Platform - course discussion and paid enrollment backend
//!
//! Threaded comments on courses plus a Stripe checkout flow that enrolls
//! buyers once the payment webhook confirms the session.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
