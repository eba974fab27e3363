//! QCAT web app helpers demo
//!
//! Web: counts page visits in LocalStorage. Native: runs the same flow
//! against an in-memory store, including a simulated restart.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }

    let store = qcat_webapp::default_store();
    let visits = qcat_webapp::make_persistent_value(store, "visits", 0u64);
    visits.update(|n| *n += 1);
    if let Some(err) = visits.take_last_error() {
        log::error!("Visit counter not saved: {}", err);
    }
    log::info!("Visit #{}, session id {}", visits.get(), qcat_webapp::random_id());
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::rc::Rc;

    use qcat_webapp::{KeyValueStore, MemoryStore, make_persistent_value, random_id};

    env_logger::init();
    log::info!("QCAT web app helpers (native) starting...");

    let store = MemoryStore::new();
    {
        let shared: Rc<dyn KeyValueStore> = Rc::new(store.clone());
        let visits = make_persistent_value(shared, "visits", 0u64);
        visits.update(|n| *n += 1);
        println!("First session: visits = {}", visits.get());
    }

    // Same store, new container: behaves like a page reload
    let shared: Rc<dyn KeyValueStore> = Rc::new(store.clone());
    let visits = make_persistent_value(shared, "visits", 0u64);
    visits.update(|n| *n += 1);
    println!("After reload: visits = {}", visits.get());
    println!("Stored keys: {:?}", store.keys());
    println!("Session id: {}", random_id());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
