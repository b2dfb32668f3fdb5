//! `chrome.*` bindings and the storage/tab backends built on them.

use async_trait::async_trait;
use js_sys::{Object, Reflect};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tabkeep::{Error, LiveTab, StorageBackend, TabId, TabSource, WindowId};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

/// `chrome.storage.local`.
#[derive(Debug, Default)]
pub struct ChromeStorage;

#[async_trait(?Send)]
impl StorageBackend for ChromeStorage {
    async fn get(&self, key: &str) -> tabkeep::Result<Option<Value>> {
        let items = JsFuture::from(storage_local_get(&JsValue::from_str(key)))
            .await
            .map_err(storage_error)?;
        let value = Reflect::get(&items, &JsValue::from_str(key)).map_err(storage_error)?;
        if value.is_undefined() {
            return Ok(None);
        }
        serde_wasm_bindgen::from_value(value)
            .map(Some)
            .map_err(|e| Error::Storage(e.to_string()))
    }

    async fn set(&self, key: &str, value: Value) -> tabkeep::Result<()> {
        let items = Object::new();
        let value = to_js(&value).map_err(storage_error)?;
        Reflect::set(&items, &JsValue::from_str(key), &value).map_err(storage_error)?;
        JsFuture::from(storage_local_set(&items))
            .await
            .map_err(storage_error)?;
        Ok(())
    }
}

/// `chrome.tabs` and `chrome.windows`.
#[derive(Debug, Default)]
pub struct ChromeTabs;

#[async_trait(?Send)]
impl TabSource for ChromeTabs {
    async fn active_tab(&self) -> tabkeep::Result<Option<LiveTab>> {
        let tabs: Vec<LiveTab> = query(&json!({"active": true, "currentWindow": true})).await?;
        Ok(tabs.into_iter().next())
    }

    async fn window_tabs(&self, window_id: WindowId) -> tabkeep::Result<Vec<LiveTab>> {
        query(&json!({"windowId": window_id})).await
    }

    async fn tab(&self, tab_id: TabId) -> tabkeep::Result<LiveTab> {
        let tab = JsFuture::from(tabs_get(tab_id))
            .await
            .map_err(|_| Error::TabNotFound(tab_id))?;
        from_js(tab)
    }

    async fn focus_window(&self, window_id: WindowId) -> tabkeep::Result<()> {
        let info = to_js(&json!({"focused": true})).map_err(query_error)?;
        JsFuture::from(windows_update(window_id, &info))
            .await
            .map_err(|_| Error::WindowNotFound(window_id))?;
        Ok(())
    }

    async fn activate_tab(&self, tab_id: TabId) -> tabkeep::Result<()> {
        let props = to_js(&json!({"active": true})).map_err(query_error)?;
        JsFuture::from(tabs_update(tab_id, &props))
            .await
            .map_err(|_| Error::TabNotFound(tab_id))?;
        Ok(())
    }
}

async fn query<T: DeserializeOwned>(filter: &Value) -> tabkeep::Result<T> {
    let filter = to_js(filter).map_err(query_error)?;
    let tabs = JsFuture::from(tabs_query(&filter))
        .await
        .map_err(query_error)?;
    from_js(tabs)
}

/// Serializes to plain JS objects (not `Map`s), as the extension APIs expect.
pub fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(JsValue::from)
}

pub fn from_js<T: DeserializeOwned>(value: JsValue) -> tabkeep::Result<T> {
    serde_wasm_bindgen::from_value(value).map_err(|e| Error::TabQuery(e.to_string()))
}

pub fn stringify_js_error(err: JsValue) -> String {
    err.as_string()
        .or_else(|| js_sys::JSON::stringify(&err).ok()?.as_string())
        .unwrap_or_else(|| format!("{:?}", err))
}

fn storage_error(err: JsValue) -> Error {
    Error::Storage(stringify_js_error(err))
}

fn query_error(err: JsValue) -> Error {
    Error::TabQuery(stringify_js_error(err))
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["chrome", "tabs"], js_name = query)]
    fn tabs_query(query: &JsValue) -> js_sys::Promise;

    #[wasm_bindgen(js_namespace = ["chrome", "tabs"], js_name = get)]
    fn tabs_get(tab_id: i32) -> js_sys::Promise;

    #[wasm_bindgen(js_namespace = ["chrome", "tabs"], js_name = update)]
    fn tabs_update(tab_id: i32, props: &JsValue) -> js_sys::Promise;

    #[wasm_bindgen(js_namespace = ["chrome", "windows"], js_name = update)]
    fn windows_update(window_id: i32, info: &JsValue) -> js_sys::Promise;

    #[wasm_bindgen(js_namespace = ["chrome", "storage", "local"], js_name = get)]
    fn storage_local_get(keys: &JsValue) -> js_sys::Promise;

    #[wasm_bindgen(js_namespace = ["chrome", "storage", "local"], js_name = set)]
    fn storage_local_set(items: &JsValue) -> js_sys::Promise;

    #[wasm_bindgen(js_namespace = ["chrome", "tabs", "onUpdated"], js_name = addListener)]
    pub fn tabs_on_updated_add_listener(cb: &Closure<dyn FnMut(i32, JsValue, JsValue)>);

    #[wasm_bindgen(js_namespace = ["chrome", "tabs", "onMoved"], js_name = addListener)]
    pub fn tabs_on_moved_add_listener(cb: &Closure<dyn FnMut(i32, JsValue)>);

    #[wasm_bindgen(js_namespace = ["chrome", "tabs", "onRemoved"], js_name = addListener)]
    pub fn tabs_on_removed_add_listener(cb: &Closure<dyn FnMut(i32, JsValue)>);

    #[wasm_bindgen(js_namespace = ["chrome", "runtime", "onMessage"], js_name = addListener)]
    pub fn runtime_on_message_add_listener(
        cb: &Closure<dyn FnMut(JsValue, JsValue, js_sys::Function) -> JsValue>,
    );
}
