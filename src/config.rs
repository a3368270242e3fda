use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_url: String,
    pub admin_api_url: String,
    pub keycloak: KeycloakConfig,
    pub enable_logging: bool,
    pub token_min_validity_seconds: u32,
    pub recent_tickets_limit: usize,
    pub admin_dev_token: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".to_string(),
            admin_api_url: "http://localhost:8000/admin".to_string(),
            keycloak: KeycloakConfig::default(),
            enable_logging: true,
            token_min_validity_seconds: 30,
            recent_tickets_limit: 5,
            admin_dev_token: "dummy_token".to_string(),
        }
    }
}

/// Datos del realm/cliente de Keycloak (identity provider de usuarios públicos)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeycloakConfig {
    pub url: String,
    pub realm: String,
    pub client_id: String,
}

impl Default for KeycloakConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080".to_string(),
            realm: "helpdesk".to_string(),
            client_id: "helpdesk-frontend".to_string(),
        }
    }
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno en tiempo de compilación
    pub fn from_env() -> Self {
        Self::from_values(
            option_env!("API_URL"),
            option_env!("ADMIN_API_URL"),
            KeycloakConfig {
                url: option_env!("KEYCLOAK_URL")
                    .unwrap_or("http://localhost:8080").to_string(),
                realm: option_env!("KEYCLOAK_REALM")
                    .unwrap_or("helpdesk").to_string(),
                client_id: option_env!("KEYCLOAK_CLIENT_ID")
                    .unwrap_or("helpdesk-frontend").to_string(),
            },
            option_env!("ENABLE_LOGGING"),
            option_env!("TOKEN_MIN_VALIDITY_SECONDS"),
            option_env!("RECENT_TICKETS_LIMIT"),
            option_env!("ADMIN_DEV_TOKEN"),
        )
    }

    fn from_values(
        api_url: Option<&str>,
        admin_api_url: Option<&str>,
        keycloak: KeycloakConfig,
        enable_logging: Option<&str>,
        token_min_validity_seconds: Option<&str>,
        recent_tickets_limit: Option<&str>,
        admin_dev_token: Option<&str>,
    ) -> Self {
        let api_url = api_url
            .unwrap_or("http://localhost:8000")
            .trim_end_matches('/')
            .to_string();
        // Si no se define, la superficie admin cuelga de /admin del mismo backend
        let admin_api_url = admin_api_url
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("{}/admin", api_url));

        Self {
            api_url,
            admin_api_url,
            keycloak,
            enable_logging: enable_logging
                .unwrap_or("true").parse().unwrap_or(true),
            token_min_validity_seconds: token_min_validity_seconds
                .unwrap_or("30").parse().unwrap_or(30),
            recent_tickets_limit: recent_tickets_limit
                .unwrap_or("5").parse().unwrap_or(5),
            admin_dev_token: admin_dev_token
                .unwrap_or("dummy_token").to_string(),
        }
    }

    /// Verifica si el modo de logging está habilitado
    pub fn is_logging_enabled(&self) -> bool {
        self.enable_logging
    }

    /// Nivel de log para wasm_logger
    pub fn log_level(&self) -> log::Level {
        if self.is_logging_enabled() {
            log::Level::Debug
        } else {
            log::Level::Warn
        }
    }
}

// Configuración global estática
lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_url_defaults_to_admin_prefix_of_api_url() {
        let config = AppConfig::from_values(
            Some("https://api.example.com/"),
            None,
            KeycloakConfig::default(),
            None,
            None,
            None,
            None,
        );
        assert_eq!(config.api_url, "https://api.example.com");
        assert_eq!(config.admin_api_url, "https://api.example.com/admin");
        assert_eq!(config.admin_dev_token, "dummy_token");
        assert_eq!(config.recent_tickets_limit, 5);
    }

    #[test]
    fn invalid_numbers_fall_back_to_defaults() {
        let config = AppConfig::from_values(
            None,
            Some("https://admin.example.com"),
            KeycloakConfig::default(),
            Some("nope"),
            Some("soon"),
            Some("-3"),
            Some("local-admin"),
        );
        assert_eq!(config.admin_api_url, "https://admin.example.com");
        assert!(config.is_logging_enabled());
        assert_eq!(config.token_min_validity_seconds, 30);
        assert_eq!(config.recent_tickets_limit, 5);
        assert_eq!(config.admin_dev_token, "local-admin");
    }

    #[test]
    fn disabled_logging_lowers_level() {
        let config = AppConfig::from_values(
            None, None, KeycloakConfig::default(), Some("false"), None, None, None,
        );
        assert_eq!(config.log_level(), log::Level::Warn);
    }
}
