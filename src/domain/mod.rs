//! Domain Layer
//!
//! The core of Reflect: sync decisions without process or watcher I/O.
//!
//! ## Structure
//!
//! - `entities/` - Machines and the folder mappings bound to them
//! - `value_objects/` - Immutable value types (WatchedRoot, ChangeBatch, ExcludePattern)
//! - `services/` - Strategy selection and removal planning
//! - `ports/` - Interface definitions for infrastructure
//!
//! ## Design Principles
//!
//! 1. **No process I/O** - Commands, watchers and the host filesystem are reached through ports
//! 2. **Pure Functions** - Services are stateless and testable
//! 3. **Ports & Adapters** - Infrastructure implements the traits in `ports/`

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
