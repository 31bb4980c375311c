//! Domain Services
//!
//! Stateless helpers with no I/O: quoting, rendering and the service
//! catalog.

pub mod catalog;
pub mod nginx;
pub mod shell;
pub mod source_url;

pub use catalog::default_checks;
pub use nginx::render_site;
pub use source_url::authenticated_url;
