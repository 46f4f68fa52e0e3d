//! # depot-domain
//!
//! Pure domain model for the depot storage simulator.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define the **containment tree** (facility → room → holding area → container)
//! - Define **Commands** (requested state changes, currently transports)
//! - Define **History ledgers** (append-only records of applied commands)
//! - Gate every state change behind **activation** and an authority check
//! - Own every object in the **Registry**, which hands out ids
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! Diagnostics are returned as values; logging them is the caller's job.

pub mod error;
pub mod id;
pub mod time;
pub mod units;

pub mod activation;
pub mod command;
pub mod container;
pub mod facility;
pub mod history;
pub mod holding_area;
pub mod location;
pub mod registry;
pub mod room;
