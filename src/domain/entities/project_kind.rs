//! Recognized container build descriptors

/// Compose descriptor names, in lookup order
pub const COMPOSE_DESCRIPTORS: [&str; 4] = [
    "compose.yaml",
    "compose.yml",
    "docker-compose.yml",
    "docker-compose.yaml",
];

/// Single-image build descriptor
pub const DOCKERFILE: &str = "Dockerfile";

/// How the application is built and started
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectKind {
    /// Multi-service composition, started with `docker compose`
    Compose { descriptor: String },
    /// Single image built from a Dockerfile
    Dockerfile,
}

impl ProjectKind {
    pub fn descriptor(&self) -> &str {
        match self {
            ProjectKind::Compose { descriptor } => descriptor,
            ProjectKind::Dockerfile => DOCKERFILE,
        }
    }
}
