use crate::config::stage::Stage;
use anyhow::{Context, Result};

use super::config_model::{Access, BackendServer, Database, DotEnvyConfig, Identity, Stripe};

const DEFAULT_MAX_DB_CONNECTIONS: u32 = 10;
const DEFAULT_PAYMENT_CURRENCY: &str = "usd";

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    load_from(|key| std::env::var(key).ok())
}

pub(crate) fn load_from(lookup: impl Fn(&str) -> Option<String>) -> Result<DotEnvyConfig> {
    let required = |key: &str| -> Result<String> {
        lookup(key)
            .filter(|value| !value.trim().is_empty())
            .with_context(|| format!("{key} is invalid"))
    };
    let optional = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    let backend_server = BackendServer {
        port: required("SERVER_PORT")?
            .parse()
            .context("SERVER_PORT is invalid")?,
        body_limit: required("SERVER_BODY_LIMIT")?
            .parse()
            .context("SERVER_BODY_LIMIT is invalid")?,
        timeout: required("SERVER_TIMEOUT")?
            .parse()
            .context("SERVER_TIMEOUT is invalid")?,
        cors_allowed_origins: split_list(optional("CORS_ALLOWED_ORIGINS"))
            .into_iter()
            .filter(|origin| origin != "*")
            .collect(),
    };

    let database = Database {
        url: required("DATABASE_URL")?,
        max_connections: match optional("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw.parse().context("DATABASE_MAX_CONNECTIONS is invalid")?,
            None => DEFAULT_MAX_DB_CONNECTIONS,
        },
    };

    let identity = Identity {
        jwt_secret: required("IDENTITY_JWT_SECRET")?,
        audience: optional("IDENTITY_JWT_AUDIENCE"),
    };

    let stripe = Stripe {
        secret_key: required("STRIPE_SECRET_KEY")?,
        webhook_secret: required("STRIPE_WEBHOOK_SECRET")?,
        default_currency: optional("PAYMENT_DEFAULT_CURRENCY")
            .map(|currency| currency.trim().to_lowercase())
            .unwrap_or_else(|| DEFAULT_PAYMENT_CURRENCY.to_string()),
    };

    let access = Access {
        admin_emails: split_list(optional("ADMIN_EMAILS"))
            .into_iter()
            .map(|email| email.to_lowercase())
            .collect(),
    };

    Ok(DotEnvyConfig {
        backend_server,
        database,
        identity,
        stripe,
        access,
    })
}

fn split_list(raw: Option<String>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

pub fn get_stage() -> Stage {
    dotenvy::dotenv().ok();

    let stage_str = std::env::var("STAGE").unwrap_or("".to_string());
    Stage::try_from(&stage_str).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("SERVER_PORT", "8080"),
            ("SERVER_BODY_LIMIT", "10"),
            ("SERVER_TIMEOUT", "30"),
            ("DATABASE_URL", "postgres://localhost:5432/directory"),
            ("IDENTITY_JWT_SECRET", "supersecretjwtsecretforunittesting123"),
            ("STRIPE_SECRET_KEY", "sk_test_123"),
            ("STRIPE_WEBHOOK_SECRET", "whsec_123"),
        ])
    }

    fn load_with(env: &HashMap<&'static str, &'static str>) -> Result<DotEnvyConfig> {
        load_from(|key| env.get(key).map(|value| value.to_string()))
    }

    #[test]
    fn applies_defaults_for_optional_values() {
        let config = load_with(&base_env()).unwrap();

        assert_eq!(config.backend_server.port, 8080);
        assert!(config.backend_server.cors_allowed_origins.is_empty());
        assert_eq!(config.database.max_connections, DEFAULT_MAX_DB_CONNECTIONS);
        assert_eq!(config.identity.audience, None);
        assert_eq!(config.stripe.default_currency, "usd");
        assert!(config.access.admin_emails.is_empty());
    }

    #[test]
    fn parses_lists_and_normalizes_admin_emails() {
        let mut env = base_env();
        env.insert("ADMIN_EMAILS", " Admin@Example.com, ops@example.com ,");
        env.insert("CORS_ALLOWED_ORIGINS", "https://directorio.mx,https://admin.directorio.mx");
        env.insert("PAYMENT_DEFAULT_CURRENCY", "MXN");

        let config = load_with(&env).unwrap();

        assert_eq!(
            config.access.admin_emails,
            vec!["admin@example.com".to_string(), "ops@example.com".to_string()]
        );
        assert!(config.access.is_admin_email("ADMIN@example.com "));
        assert_eq!(config.backend_server.cors_allowed_origins.len(), 2);
        assert_eq!(config.stripe.default_currency, "mxn");
    }

    #[test]
    fn missing_required_value_is_an_error() {
        let mut env = base_env();
        env.remove("STRIPE_WEBHOOK_SECRET");

        let err = load_with(&env).unwrap_err();
        assert!(err.to_string().contains("STRIPE_WEBHOOK_SECRET"));
    }

    #[test]
    fn non_numeric_port_is_an_error() {
        let mut env = base_env();
        env.insert("SERVER_PORT", "eighty");

        assert!(load_with(&env).is_err());
    }

    #[test]
    fn stage_parses_known_names() {
        assert_eq!(Stage::try_from(&"Production".to_string()).unwrap(), Stage::Production);
        assert_eq!(Stage::try_from(&"dev".to_string()).unwrap(), Stage::Development);
        assert!(Stage::try_from(&"staging".to_string()).is_err());
    }
}
