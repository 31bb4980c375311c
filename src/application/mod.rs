//! Application Layer
//!
//! One module per pipeline stage, plus the `Pipeline` that runs them.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Talks to the remote host only through `RemoteExecutor`
//! - Leaves concrete ssh/git/log implementations to Infrastructure
//!
//! ## Stages
//!
//! - `SourceFetcher` - Clone or update the local checkout
//! - `validate_project` - Classify the checkout (compose or Dockerfile)
//! - `HostProvisioner` - Install missing remote services
//! - `ApplicationDeployer` - Transfer, build and start the application
//! - `ProxyConfigurer` - Route port 80 to the application through nginx
//! - `DeploymentValidator` - Check the result and list access URLs
//! - `Teardown` - Remove everything a deployment created

pub mod deploy;
mod docker;
pub mod executor;
pub mod fetch;
pub mod pipeline;
pub mod project;
pub mod provision;
pub mod proxy;
pub mod teardown;
pub mod verify;

#[cfg(test)]
pub(crate) mod testing;

pub use deploy::ApplicationDeployer;
pub use executor::RemoteExecutor;
pub use fetch::SourceFetcher;
pub use pipeline::{Pipeline, RunMode, RunSummary};
pub use project::validate_project;
pub use provision::HostProvisioner;
pub use proxy::ProxyConfigurer;
pub use teardown::Teardown;
pub use verify::DeploymentValidator;
