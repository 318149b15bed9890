//! # Dialbook Architecture
//!
//! Dialbook is a **client library** for a remote collection service that keeps
//! countries and the phone prefixes that belong to them. The CLI shipped with
//! it is one client among possible others.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Owns store, edit session and search box per resource     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - One function per user action, returns `CmdResult`        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  State (store.rs, session.rs, search.rs, resolver.rs)       │
//! │  - Cached lists, drafts, search modes, code → name lookups  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Gateway Layer (gateway/)                                   │
//! │  - Collection, lookup and filter traits                     │
//! │  - HttpGateway (production), InMemoryGateway (tests, demo)  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Service Is the Source of Truth
//!
//! Stores never patch their lists by hand after a create or update: every
//! successful write is followed by a full reload. Deletes drop the one
//! record locally once the service confirms. Failures are kept on the store
//! so a UI can show them next to the list they concern.
//!
//! ## Testing Strategy
//!
//! 1. **State and commands**: unit tests against `InMemoryGateway`, which can
//!    be told to fail or stall the next call.
//! 2. **API**: dispatch tests through the facade.
//! 3. **HTTP**: `tests/http_contract.rs` runs the real gateway against a
//!    local listener.
//! 4. **CLI**: argument parsing and rendering unit tests, plus binary tests in
//!    `tests/cli.rs`.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: One module per user action
//! - [`store`]: Cached record list per resource
//! - [`session`]: Create/edit state machine with validation
//! - [`search`]: Search modes and dispatch
//! - [`resolver`]: Country code to name lookups
//! - [`gateway`]: Remote service access
//! - [`model`]: `Country`, `Prefix` and the `Resource` trait
//! - [`validation`]: Field rules and error maps
//! - [`index`]: 1-based display positions
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod gateway;
pub mod index;
pub mod model;
pub mod resolver;
pub mod search;
pub mod session;
pub mod store;
pub mod validation;
