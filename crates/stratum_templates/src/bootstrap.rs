//! Instance bootstrap scripts.
//!
//! Scripts are emitted inside Terraform heredocs, so they must not contain
//! `${` interpolation or braces of any kind.

use stratum_intent::{AppStack, Database};

/// Cloud-init script for an application instance.
pub fn app_bootstrap(stack: AppStack) -> Vec<String> {
    let port = stack.app_port();
    let mut lines = vec![
        "#!/bin/bash".to_string(),
        "set -euo pipefail".to_string(),
    ];

    let install: &[&str] = match stack {
        AppStack::Golang => &[
            "dnf install -y golang git",
            "mkdir -p /opt/app",
            "useradd --system --home /opt/app app",
        ],
        AppStack::Python => &[
            "dnf install -y python3 python3-pip git",
            "pip3 install gunicorn",
            "mkdir -p /opt/app",
            "useradd --system --home /opt/app app",
        ],
        AppStack::Java => &[
            "dnf install -y java-17-amazon-corretto-headless",
            "mkdir -p /opt/app",
            "useradd --system --home /opt/app app",
        ],
        AppStack::Nodejs => &[
            "dnf install -y nodejs npm git",
            "npm install -g pm2",
            "mkdir -p /opt/app",
            "useradd --system --home /opt/app app",
        ],
        AppStack::Other => &[
            "dnf install -y docker",
            "systemctl enable --now docker",
        ],
    };
    lines.extend(install.iter().map(|s| s.to_string()));
    lines.push(format!("echo \"APP_PORT={}\" > /etc/app.env", port));
    lines
}

/// Cloud-init script for the database host. Empty when no database is configured.
pub fn database_setup(database: Database) -> Vec<String> {
    let install: &[&str] = match database {
        Database::Mysql => &[
            "dnf install -y mariadb105-server",
            "systemctl enable --now mariadb",
        ],
        Database::Postgresql => &[
            "dnf install -y postgresql15-server",
            "postgresql-setup --initdb",
            "systemctl enable --now postgresql",
        ],
        Database::Mongodb => &[
            "dnf install -y docker",
            "systemctl enable --now docker",
            "docker run -d --restart always -p 27017:27017 mongo:7",
        ],
        Database::Redis => &[
            "dnf install -y redis6",
            "systemctl enable --now redis6",
        ],
        Database::Dynamodb => &[
            "dnf install -y docker",
            "systemctl enable --now docker",
            "docker run -d --restart always -p 8000:8000 amazon/dynamodb-local",
        ],
        Database::None => return Vec::new(),
    };

    let mut lines = vec![
        "#!/bin/bash".to_string(),
        "set -euo pipefail".to_string(),
    ];
    lines.extend(install.iter().map(|s| s.to_string()));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripts_are_brace_free() {
        for stack in AppStack::all() {
            for line in app_bootstrap(stack) {
                assert!(!line.contains('{') && !line.contains('}'), "{}", line);
            }
        }
        for database in Database::all() {
            for line in database_setup(database) {
                assert!(!line.contains('{') && !line.contains('}'), "{}", line);
            }
        }
    }

    #[test]
    fn test_bootstrap_selects_stack() {
        assert!(app_bootstrap(AppStack::Python).iter().any(|l| l.contains("python3")));
        assert!(app_bootstrap(AppStack::Nodejs).iter().any(|l| l.contains("APP_PORT=3000")));
        assert!(database_setup(Database::None).is_empty());
        assert!(database_setup(Database::Postgresql).iter().any(|l| l.contains("postgresql")));
    }
}
