//! Domain Entities

mod deployment_config;
mod project_kind;
mod proxy_route;
mod report;
mod service_check;
mod stage;

pub use deployment_config::{
    DeploymentConfig, DeploymentInput, DEFAULT_CONNECT_TIMEOUT, DEFAULT_REMOTE_BASE,
    DEFAULT_SETTLE_DELAY,
};
pub use project_kind::{ProjectKind, COMPOSE_DESCRIPTORS, DOCKERFILE};
pub use proxy_route::{ProxyLayout, ProxyRoute};
pub use report::{CheckOutcome, ProvisionReport, ProvisionedService, Severity, ValidationReport};
pub use service_check::{InstallRecipe, PackageManager, ServiceCheck};
pub use stage::{Stage, StageRecord, StageResult};
