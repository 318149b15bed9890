//! # CLI Client
//!
//! The terminal client for dialbook. For the layering it sits on, see the
//! crate-level documentation of the library.
//!
//! ## Command Shape
//!
//! Commands are grouped by resource: `dialbook country <action>` and
//! `dialbook prefix <action>`, plus `dialbook config [key] [value]`.
//!
//! ### Keys
//!
//! Countries are addressed by their code (`RU`), prefixes by the numeric id
//! the service assigned. A country's code cannot be changed by `update`;
//! delete and re-create it instead.
//!
//! ### Deleting
//!
//! `delete` shows the record and asks before removing it. `--yes` skips the
//! question, which is what scripts want.
//!
//! ### Demo Mode
//!
//! `--demo` swaps the HTTP gateway for an in-memory one seeded with a few
//! countries and prefixes. Nothing is persisted between runs.

mod commands;
mod render;
pub mod setup;

pub use commands::run;
