//! Livepen WASM - WebAssembly bindings for browser-hosted playgrounds
//!
//! Exposes preview document assembly and the share-link codec so a plain web
//! page can drive the same pipeline as the desktop app.

use livepen_core::{SourceBundle, preview, share};
use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Sandbox attribute value for the preview iframe
#[wasm_bindgen]
pub fn sandbox_flags() -> String {
    preview::SANDBOX_FLAGS.to_string()
}

/// Build the complete preview document for the three fragments
#[wasm_bindgen]
pub fn assemble_document(html: &str, css: &str, js: &str) -> String {
    preview::assemble_document(&SourceBundle::new(html, css, js))
}

/// Build the document shown when writing the preview failed
#[wasm_bindgen]
pub fn fallback_document(message: &str) -> String {
    preview::fallback_document(message)
}

/// Encode the three fragments into a URL-safe share token
#[wasm_bindgen]
pub fn encode_share(html: &str, css: &str, js: &str) -> Result<String, JsValue> {
    share::encode(&SourceBundle::new(html, css, js))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Build a full share link on top of `base`
#[wasm_bindgen]
pub fn share_link(base: &str, html: &str, css: &str, js: &str) -> Result<String, JsValue> {
    share::share_link(base, &SourceBundle::new(html, css, js))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Sources decoded from a share token
#[wasm_bindgen]
pub struct SharedSources {
    html: String,
    css: String,
    js: String,
}

#[wasm_bindgen]
impl SharedSources {
    #[wasm_bindgen(getter)]
    pub fn html(&self) -> String {
        self.html.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn css(&self) -> String {
        self.css.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn js(&self) -> String {
        self.js.clone()
    }
}

impl From<SourceBundle> for SharedSources {
    fn from(bundle: SourceBundle) -> Self {
        Self {
            html: bundle.html,
            css: bundle.css,
            js: bundle.js,
        }
    }
}

/// Decode a share token or a full share link
#[wasm_bindgen]
pub fn decode_share(input: &str) -> Result<SharedSources, JsValue> {
    decode_input(input).map_err(|e| JsValue::from_str(&e))
}

fn decode_input(input: &str) -> Result<SharedSources, String> {
    let token = share::token_from_input(input)
        .ok_or_else(|| "Input does not contain a share code".to_string())?;
    share::decode(&token)
        .map(SharedSources::from)
        .map_err(|e| e.to_string())
}
