//! nginx site rendering

use crate::domain::entities::ProxyRoute;

/// Render the server block for `route`
///
/// The only interpolated values are the ports and the project name,
/// which are validated value objects, so the output cannot be steered
/// into extra directives.
pub fn render_site(route: &ProxyRoute) -> String {
    format!(
        r#"# Managed by hoist for project {project}
server {{
    listen {public};
    server_name _;

    location / {{
        proxy_pass http://localhost:{internal};
        proxy_http_version 1.1;
        proxy_set_header Upgrade $http_upgrade;
        proxy_set_header Connection "upgrade";
        proxy_set_header Host $host;
        proxy_set_header X-Real-IP $remote_addr;
        proxy_set_header X-Forwarded-For $proxy_add_x_forwarded_for;
        proxy_set_header X-Forwarded-Proto $scheme;
        proxy_cache_bypass $http_upgrade;
    }}
}}
"#,
        project = route.project,
        public = route.public_port,
        internal = route.internal_port,
    )
}
