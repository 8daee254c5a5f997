//! `hbnb-infra` — infrastructure adapters behind the auth seams.

pub mod bootstrap;
pub mod facade;

pub use bootstrap::{AdminSeed, BootstrapOutcome, ensure_admin};
pub use facade::{EntityTable, Facade};
