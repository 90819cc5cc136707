//! tweetbox in the browser: tweets live in `localStorage` and render into the
//! page's DOM.

mod app;
mod config;
mod storage;

pub use app::App;
pub use config::WebConfig;
pub use storage::LocalStorage;

use log::info;
use wasm_bindgen::prelude::*;

/// Entry point run when the module is instantiated.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // A second init (hot reload) keeps the first logger.
    let _ = console_log::init_with_level(log::Level::Info);

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let app = App::mount(window, &WebConfig::default())?;
    info!(
        "tweetbox ready with {} tweets",
        app.borrow().tweet_count()
    );
    Ok(())
}
