use std::env;
use std::fs;
use std::path::Path;

/// Variables que lee config.rs con option_env!
const KNOWN_KEYS: &[&str] = &[
    "API_URL",
    "ADMIN_API_URL",
    "KEYCLOAK_URL",
    "KEYCLOAK_REALM",
    "KEYCLOAK_CLIENT_ID",
    "ADMIN_DEV_TOKEN",
    "ENABLE_LOGGING",
    "TOKEN_MIN_VALIDITY_SECONDS",
    "RECENT_TICKETS_LIMIT",
];

fn main() {
    // Cargar variables de entorno desde .env si existe
    let env_file = Path::new(".env");

    if env_file.exists() {
        println!("cargo:rerun-if-changed=.env");

        if let Ok(contents) = fs::read_to_string(env_file) {
            for line in contents.lines() {
                // Ignorar comentarios y líneas vacías
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }

                // Parsear KEY=VALUE (comillas opcionales)
                if let Some((key, value)) = line.split_once('=') {
                    let key = key.trim();
                    let value = value.trim().trim_matches('"');

                    if !KNOWN_KEYS.contains(&key) {
                        println!("cargo:warning=Ignoring unknown .env key {}", key);
                        continue;
                    }

                    // Solo configurar si no está ya definida en el entorno
                    if env::var(key).is_err() {
                        println!("cargo:rustc-env={}={}", key, value);
                    }
                }
            }
        }
    } else {
        println!("cargo:warning=No .env file found. Using default values. Copy .env.example to .env to point at your backend and Keycloak.");
    }

    for key in KNOWN_KEYS {
        println!("cargo:rerun-if-env-changed={}", key);
    }
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.env.example");
}
