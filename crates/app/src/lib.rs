//! # depot-app
//!
//! Application layer: the [`World`](world::World) context and the use-cases
//! that drive the domain model.
//!
//! ## Responsibilities
//! - Own one simulation: registry, simulated clock, and authorization flag
//! - Construct objects, stamping their creation time from the clock
//! - Keep parent inventories and child locations consistent
//!   (`add_room`, `add_holding_area`, `add_container`, and their removals)
//! - Aggregate **complete histories** across the containment tree
//! - Issue transports through a [`Commander`](commander::Commander) inside a
//!   scoped [`AuthorizationWindow`](authorization::AuthorizationWindow)
//! - Define the **`SnapshotStore` port** implemented by snapshot adapters
//! - Report diagnostics (empty inventories, occupied holding areas, clock
//!   lag) through `tracing`
//!
//! ## Dependency rule
//! Depends on `depot-domain` only (plus `tracing`).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod authorization;
pub mod commander;
pub mod ports;
pub mod world;
