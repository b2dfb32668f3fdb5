use std::rc::Rc;

use serde::Deserialize;
use tabkeep::{Command, Dispatcher, Reconciler, SavedStore, TabChange, TabEvent, WindowId};
use tracing::{info, warn};
use wasm_bindgen::prelude::*;

mod chrome;
mod logging;

use chrome::{ChromeStorage, ChromeTabs, from_js, stringify_js_error, to_js};

type Background = Reconciler<ChromeStorage, ChromeTabs>;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MoveInfo {
    to_index: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoveInfo {
    #[serde(default)]
    window_id: Option<WindowId>,
    #[serde(default)]
    is_window_closing: bool,
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    logging::init_logging();

    let background: Rc<Background> = Rc::new(
        Reconciler::new(SavedStore::new(ChromeStorage), ChromeTabs).with_clock(epoch_millis),
    );

    listen_tab_events(&background);
    listen_messages(&background);
    info!(target = "tabkeep.background", "listeners registered");
}

fn epoch_millis() -> u64 {
    js_sys::Date::now() as u64
}

fn listen_tab_events(background: &Rc<Background>) {
    // Keep title/url/favicon current while we are told anyway
    {
        let bg = background.clone();
        let on_updated = Closure::<dyn FnMut(i32, JsValue, JsValue)>::new(
            move |tab_id: i32, change: JsValue, tab: JsValue| {
                let change: TabChange = from_js(change).unwrap_or_default();
                if !change.touches_display() {
                    return;
                }
                match from_js(tab) {
                    Ok(tab) => spawn_event(&bg, TabEvent::Updated { tab_id, change, tab }),
                    Err(err) => warn!(target = "tabkeep.background", tab_id, error = %err, "unreadable tab"),
                }
            },
        );
        chrome::tabs_on_updated_add_listener(&on_updated);
        on_updated.forget();
    }

    {
        let bg = background.clone();
        let on_moved = Closure::<dyn FnMut(i32, JsValue)>::new(move |tab_id: i32, info: JsValue| {
            match from_js::<MoveInfo>(info) {
                Ok(info) => spawn_event(
                    &bg,
                    TabEvent::Moved {
                        tab_id,
                        to_index: info.to_index,
                    },
                ),
                Err(err) => warn!(target = "tabkeep.background", tab_id, error = %err, "unreadable moveInfo"),
            }
        });
        chrome::tabs_on_moved_add_listener(&on_moved);
        on_moved.forget();
    }

    // Closed tab -> re-point its entries to the successor
    {
        let bg = background.clone();
        let on_removed = Closure::<dyn FnMut(i32, JsValue)>::new(move |tab_id: i32, info: JsValue| {
            let info = from_js::<RemoveInfo>(info).unwrap_or(RemoveInfo {
                window_id: None,
                is_window_closing: false,
            });
            spawn_event(
                &bg,
                TabEvent::Removed {
                    tab_id,
                    window_id: info.window_id,
                    is_window_closing: info.is_window_closing,
                },
            );
        });
        chrome::tabs_on_removed_add_listener(&on_removed);
        on_removed.forget();
    }
}

fn spawn_event(background: &Rc<Background>, event: TabEvent) {
    let bg = background.clone();
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(err) = bg.apply(&event).await {
            warn!(target = "tabkeep.background", ?event, error = %err, "tab event not persisted");
        }
    });
}

fn listen_messages(background: &Rc<Background>) {
    let bg = background.clone();
    let on_message = Closure::<dyn FnMut(JsValue, JsValue, js_sys::Function) -> JsValue>::new(
        move |message: JsValue, _sender: JsValue, send_response: js_sys::Function| {
            // Not ours: leave the message to other listeners.
            let Ok(command) = from_js::<Command>(message) else {
                return JsValue::UNDEFINED;
            };

            let bg = bg.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let response = Dispatcher::new(&bg).dispatch(command).await;
                let reply = match to_js(&response) {
                    Ok(reply) => reply,
                    Err(err) => {
                        warn!(target = "tabkeep.background", error = %stringify_js_error(err), "response not serializable");
                        return;
                    }
                };
                let _ = send_response.call1(&JsValue::NULL, &reply);
            });

            // Keep the channel open for the async reply.
            JsValue::TRUE
        },
    );
    chrome::runtime_on_message_add_listener(&on_message);
    on_message.forget();
}
