// ============================================================================
// STORAGE - Acceso a almacenamiento persistente del cliente
// ============================================================================
// El único valor persistido por la app es el token admin.
// El trait permite sustituir localStorage por memoria en los tests.
// ============================================================================

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::HashMap;

use gloo_storage::{LocalStorage, Storage};
use wasm_bindgen::JsValue;

use crate::error::StorageError;

pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str);
}

/// localStorage del navegador. Strings planos, sin codificar en JSON
/// (otros clientes escriben la misma clave sin comillas).
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

impl KeyValueStorage for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        stored_value(key, LocalStorage::raw().get_item(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|e| StorageError(format!("{:?}", e)))
    }

    fn remove(&self, key: &str) {
        if let Err(e) = LocalStorage::raw().remove_item(key) {
            log::warn!("⚠️ [STORAGE] No se pudo borrar '{}': {:?}", key, e);
        }
    }
}

/// Valor tal cual lo devuelve localStorage.getItem
fn stored_value(key: &str, item: Result<Option<String>, JsValue>) -> Option<String> {
    match item {
        Ok(value) => value,
        Err(e) => {
            log::warn!("⚠️ [STORAGE] No se pudo leer '{}': {:?}", key, e);
            None
        }
    }
}

/// Almacenamiento en memoria para los tests
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: RefCell<HashMap<String, String>>,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage.values.borrow_mut().insert(key.to_string(), value.to_string());
        storage
    }
}

#[cfg(test)]
impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.values.borrow_mut().remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_item_is_returned_verbatim() {
        assert_eq!(
            stored_value("admin_token", Ok(Some("dummy_token".to_string()))).as_deref(),
            Some("dummy_token")
        );
        assert_eq!(
            stored_value("admin_token", Ok(Some("\"quoted\"".to_string()))).as_deref(),
            Some("\"quoted\"")
        );
        assert_eq!(stored_value("admin_token", Ok(None)), None);
    }

    #[test]
    fn memory_storage_set_get_remove() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("admin_token"), None);

        storage.set("admin_token", "abc").unwrap();
        assert_eq!(storage.get("admin_token").as_deref(), Some("abc"));

        storage.remove("admin_token");
        assert_eq!(storage.get("admin_token"), None);
    }
}
