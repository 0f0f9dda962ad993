use std::cell::RefCell;

use wasm_bindgen::prelude::*;

use crate::model::MapId;
use crate::{logging, Dashboard, DashboardConfig, MapInstance};

thread_local! {
    static DASHBOARD: RefCell<Option<Dashboard>> = const { RefCell::new(None) };
}

fn to_js<E: std::fmt::Display>(e: E) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn current_href() -> Option<String> {
    web_sys::window()?.location().href().ok()
}

fn with_dashboard<R>(f: impl FnOnce(&Dashboard) -> Result<R, JsValue>) -> Result<R, JsValue> {
    DASHBOARD.with(|cell| match cell.borrow().as_ref() {
        Some(dashboard) => f(dashboard),
        None => Err(JsValue::from_str("dashboard not started")),
    })
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    let config = DashboardConfig::load();
    logging::init(config.preferences.log_level);
    log::info!("agrimap starting");

    let dashboard = Dashboard::new(config);
    let session = dashboard.session().current();
    match session.user.as_deref() {
        Some(user) if session.is_authenticated() => log::info!("Signed in as {}", user),
        _ => log::info!("No active session"),
    }

    DASHBOARD.with(|cell| *cell.borrow_mut() = Some(dashboard));
}

/// Mock login; stores the session in `localStorage`.
#[wasm_bindgen]
pub fn login(user: &str) -> Result<(), JsValue> {
    with_dashboard(|dashboard| dashboard.session().login(user).map(|_| ()).map_err(to_js))
}

#[wasm_bindgen]
pub fn logout() -> Result<(), JsValue> {
    with_dashboard(|dashboard| dashboard.session().logout().map_err(to_js))
}

#[wasm_bindgen]
pub fn is_authenticated() -> bool {
    with_dashboard(|dashboard| Ok(dashboard.session().current().is_authenticated()))
        .unwrap_or(false)
}

/// Mount a map of `kind`, seeded from the page URL. Returns the map id.
#[wasm_bindgen]
pub fn mount(kind: &str) -> Result<String, JsValue> {
    let href = current_href();
    with_dashboard(|dashboard| {
        let map = dashboard.mount(kind, href.as_deref()).map_err(to_js)?;
        Ok(map.id().to_string())
    })
}

/// Render the map `map_id` against `data` (JSON text); returns the layer and
/// chart descriptors as JSON.
#[wasm_bindgen]
pub fn render(map_id: &str, data: Option<String>) -> Result<String, JsValue> {
    let data: Option<serde_json::Value> = match data {
        Some(text) => Some(serde_json::from_str(&text).map_err(to_js)?),
        None => None,
    };
    with_dashboard(|dashboard| {
        let mut binding = dashboard
            .bind(&MapId::from(map_id))
            .ok_or_else(|| JsValue::from_str("unknown map"))?;
        serde_json::to_string(&binding.render(data.as_ref())).map_err(to_js)
    })
}

/// Apply a sparse JSON patch to the map `map_id`.
#[wasm_bindgen]
pub fn apply_state(map_id: &str, patch: &str) -> Result<(), JsValue> {
    let patch: serde_json::Value = serde_json::from_str(patch).map_err(to_js)?;
    with_dashboard(|dashboard| {
        let map = dashboard
            .maps()
            .map_by_id(&MapId::from(map_id))
            .ok_or_else(|| JsValue::from_str("unknown map"))?;
        map.apply_shared_state(&patch);
        Ok(())
    })
}

/// Share link of the first map for the current page.
#[wasm_bindgen]
pub fn share_link() -> Result<Option<String>, JsValue> {
    let href = current_href().ok_or_else(|| JsValue::from_str("no window location"))?;
    with_dashboard(|dashboard| dashboard.share_link(&href).map_err(to_js))
}
