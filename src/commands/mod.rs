//! Tauri Command Wrappers
//!
//! Frontend bindings to backend commands, organized by domain. Rejected
//! invocations come back as `Err` with the backend's message.

mod ai;
mod backend;
mod list;
mod session;

use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["window", "__TAURI__", "core"], catch)]
    async fn invoke(cmd: &str, args: JsValue) -> Result<JsValue, JsValue>;
}

/// Invoke a command and decode its result
async fn call<A: Serialize, R: DeserializeOwned>(cmd: &str, args: &A) -> Result<R, String> {
    let js_args = serde_wasm_bindgen::to_value(args).map_err(|e| e.to_string())?;
    let result = invoke(cmd, js_args).await.map_err(|e| {
        e.as_string()
            .unwrap_or_else(|| format!("{} failed: {:?}", cmd, e))
    })?;
    serde_wasm_bindgen::from_value(result).map_err(|e| e.to_string())
}

/// Commands that take no arguments
#[derive(Serialize)]
struct NoArgs {}

// Re-export all public items
pub use ai::*;
pub use backend::TauriBackend;
pub use list::*;
pub use session::*;
