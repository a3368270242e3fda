// ============================================================================
// KEYCLOAK FFI - Foreign Function Interface para keycloak-js
// ============================================================================
// Solo wrappers para la clase global `Keycloak` - Sin estado, sin lógica
// index.html la publica en window.Keycloak antes de cargar el WASM
// ============================================================================

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[derive(Debug, Clone)]
    pub type Keycloak;

    #[wasm_bindgen(constructor, catch)]
    pub fn new(config: &JsValue) -> Result<Keycloak, JsValue>;

    /// Devuelve Promise<boolean> (authenticated)
    #[wasm_bindgen(method, catch)]
    pub fn init(this: &Keycloak, options: &JsValue) -> Result<js_sys::Promise, JsValue>;

    /// Devuelve Promise<boolean> (refreshed)
    #[wasm_bindgen(method, catch, js_name = updateToken)]
    pub fn update_token(this: &Keycloak, min_validity: u32) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(method, catch)]
    pub fn login(this: &Keycloak, options: &JsValue) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(method, catch)]
    pub fn logout(this: &Keycloak, options: &JsValue) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(method, getter)]
    pub fn token(this: &Keycloak) -> Option<String>;

    #[wasm_bindgen(method, getter, js_name = tokenParsed)]
    pub fn token_parsed(this: &Keycloak) -> JsValue;

    #[wasm_bindgen(method, getter)]
    pub fn authenticated(this: &Keycloak) -> Option<bool>;
}

/// Helper: construir un objeto JS plano a partir de pares clave/valor
pub fn js_object(entries: &[(&str, JsValue)]) -> Result<JsValue, JsValue> {
    let object = js_sys::Object::new();
    for (key, value) in entries {
        js_sys::Reflect::set(&object, &JsValue::from_str(key), value)?;
    }
    Ok(object.into())
}

/// Helper: leer `exp` (segundos epoch) del token parseado
pub fn token_expiry_seconds(keycloak: &Keycloak) -> Option<i64> {
    let parsed = keycloak.token_parsed();
    if parsed.is_undefined() || parsed.is_null() {
        return None;
    }
    js_sys::Reflect::get(&parsed, &JsValue::from_str("exp"))
        .ok()
        .and_then(|exp| exp.as_f64())
        .map(|exp| exp as i64)
}
