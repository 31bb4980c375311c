//! Domain Layer
//!
//! Deployment concepts without I/O.
//!
//! ## Structure
//!
//! - `entities/` - Configuration, stages, service checks, proxy routes, reports
//! - `value_objects/` - Validated values (ProjectName, AppPort, Credential)
//! - `services/` - Pure helpers (shell quoting, nginx rendering, service catalog)
//! - `ports/` - Interface definitions for infrastructure

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
