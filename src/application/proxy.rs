//! Reverse proxy configuration
//!
//! Installs an nginx site forwarding port 80 to the application. The
//! previous site is kept aside until `nginx -t` accepts the new one, so
//! a rejected configuration never reaches a reload.

use crate::application::executor::RemoteExecutor;
use crate::domain::entities::{DeploymentConfig, ProxyLayout, ProxyRoute};
use crate::domain::services::render_site;
use crate::domain::services::shell::quote;
use crate::error::{CommandFailure, HoistError, HoistResult};

const SITES_AVAILABLE: &str = "/etc/nginx/sites-available";
const DEFAULT_SITE_LINK: &str = "/etc/nginx/sites-enabled/default";
const DEFAULT_CONF: &str = "/etc/nginx/conf.d/default.conf";

pub struct ProxyConfigurer<'a> {
    exec: &'a RemoteExecutor<'a>,
}

impl<'a> ProxyConfigurer<'a> {
    pub fn new(exec: &'a RemoteExecutor<'a>) -> Self {
        Self { exec }
    }

    pub fn configure(&self, config: &DeploymentConfig) -> HoistResult<ProxyRoute> {
        let route = ProxyRoute::new(config.project().clone(), config.port());
        let layout = self.detect_layout()?;
        let site = route.site_path(layout);
        let backup = route.backup_path(layout);

        self.exec
            .run(&format!(
                "if [ -f {site} ]; then cp -f {site} {backup}; fi",
                site = quote(&site),
                backup = quote(&backup)
            ))
            .map_err(proxy_error)?;

        self.exec.log().info(&format!("Writing nginx site {}", site));
        self.exec
            .write_file(&site, &render_site(&route))
            .map_err(proxy_error)?;
        if let Some(link) = route.enabled_link(layout) {
            self.exec
                .run(&format!("ln -sf {} {}", quote(&site), quote(&link)))
                .map_err(proxy_error)?;
        }
        self.disable_default_site(layout)?;

        if let Err(failure) = self.exec.run("nginx -t") {
            self.exec
                .log()
                .error("nginx rejected the generated configuration; restoring the previous site");
            self.restore(&route, layout);
            return Err(HoistError::ProxyConfig { failure });
        }

        let _ = self.exec.run_tolerant(&format!("rm -f {}", quote(&backup)));
        self.exec
            .run("systemctl reload nginx")
            .map_err(proxy_error)?;

        self.exec.log().success(&format!(
            "nginx forwards port {} to {}",
            route.public_port, route.internal_port
        ));
        Ok(route)
    }

    fn detect_layout(&self) -> HoistResult<ProxyLayout> {
        let debian = self
            .exec
            .succeeds(&format!("test -d {}", SITES_AVAILABLE))
            .map_err(proxy_error)?;
        Ok(if debian {
            ProxyLayout::SitesEnabled
        } else {
            ProxyLayout::ConfD
        })
    }

    /// The distribution's catch-all site would otherwise answer on port 80
    fn disable_default_site(&self, layout: ProxyLayout) -> HoistResult<()> {
        let command = match layout {
            ProxyLayout::SitesEnabled => format!("rm -f {}", DEFAULT_SITE_LINK),
            ProxyLayout::ConfD => format!(
                "if [ -f {conf} ]; then mv -f {conf} {conf}.disabled; fi",
                conf = DEFAULT_CONF
            ),
        };
        self.exec.run(&command).map_err(proxy_error)?;
        Ok(())
    }

    fn restore(&self, route: &ProxyRoute, layout: ProxyLayout) {
        let site = quote(&route.site_path(layout));
        let backup = quote(&route.backup_path(layout));
        let mut remove = vec![site.clone()];
        if let Some(link) = route.enabled_link(layout) {
            remove.push(quote(&link));
        }

        let command = format!(
            "if [ -f {backup} ]; then mv -f {backup} {site}; else rm -f {remove}; fi",
            backup = backup,
            site = site,
            remove = remove.join(" ")
        );
        match self.exec.run(&command) {
            Ok(_) => {}
            Err(failure) => self
                .exec
                .log()
                .warning(&format!("Could not restore the previous site: {}", failure)),
        }
    }
}

fn proxy_error(failure: CommandFailure) -> HoistError {
    HoistError::ProxyConfig { failure }
}
