//! Reverse proxy route

use crate::domain::value_objects::{AppPort, ProjectName};

/// nginx configuration layouts found in the wild
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyLayout {
    /// Debian family: `sites-available/` plus symlinks in `sites-enabled/`
    SitesEnabled,
    /// RPM family and upstream packages: `conf.d/*.conf`
    ConfD,
}

/// Public port 80 forwarded to the application's internal port
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyRoute {
    pub project: ProjectName,
    pub public_port: AppPort,
    pub internal_port: AppPort,
}

impl ProxyRoute {
    pub fn new(project: ProjectName, internal_port: AppPort) -> Self {
        Self {
            project,
            public_port: AppPort::HTTP,
            internal_port,
        }
    }

    /// Where the site file lives
    pub fn site_path(&self, layout: ProxyLayout) -> String {
        match layout {
            ProxyLayout::SitesEnabled => format!("/etc/nginx/sites-available/{}", self.project),
            ProxyLayout::ConfD => format!("/etc/nginx/conf.d/{}.conf", self.project),
        }
    }

    /// Symlink that activates the site, if the layout uses one
    pub fn enabled_link(&self, layout: ProxyLayout) -> Option<String> {
        match layout {
            ProxyLayout::SitesEnabled => Some(format!("/etc/nginx/sites-enabled/{}", self.project)),
            ProxyLayout::ConfD => None,
        }
    }

    /// Copy of the previous site kept until the new one validates
    pub fn backup_path(&self, layout: ProxyLayout) -> String {
        format!("{}.hoist-bak", self.site_path(layout))
    }

    /// Every file this route may have created, across both layouts
    pub fn all_artifacts(&self) -> Vec<String> {
        let mut paths = Vec::new();
        for layout in [ProxyLayout::SitesEnabled, ProxyLayout::ConfD] {
            if let Some(link) = self.enabled_link(layout) {
                paths.push(link);
            }
            paths.push(self.site_path(layout));
            paths.push(self.backup_path(layout));
        }
        paths
    }
}
