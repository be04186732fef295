//! Key/value storage
//!
//! Browser builds read and write `window.localStorage`. Native builds keep a
//! per-thread in-memory map so persistence code paths stay testable.

/// Read a stored string value
#[cfg(target_arch = "wasm32")]
pub fn get_item(key: &str) -> Option<String> {
    let storage = web_sys::window()?.local_storage().ok()??;
    storage.get_item(key).ok()?
}

/// Write a string value, logging if storage is unavailable
#[cfg(target_arch = "wasm32")]
pub fn set_item(key: &str, value: &str) {
    let storage = web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten();

    match storage {
        Some(storage) => {
            if storage.set_item(key, value).is_err() {
                log::warn!("LocalStorage rejected write for '{key}'");
            }
        }
        None => log::warn!("LocalStorage unavailable, '{key}' not saved"),
    }
}

#[cfg(not(target_arch = "wasm32"))]
thread_local! {
    static MEMORY: std::cell::RefCell<std::collections::HashMap<String, String>> =
        std::cell::RefCell::new(std::collections::HashMap::new());
}

#[cfg(not(target_arch = "wasm32"))]
pub fn get_item(key: &str) -> Option<String> {
    MEMORY.with(|m| m.borrow().get(key).cloned())
}

#[cfg(not(target_arch = "wasm32"))]
pub fn set_item(key: &str, value: &str) {
    MEMORY.with(|m| {
        m.borrow_mut().insert(key.to_string(), value.to_string());
    });
}

/// Forget a key (tests start from a clean slate on a shared thread)
#[cfg(all(test, not(target_arch = "wasm32")))]
pub(crate) fn remove_item(key: &str) {
    MEMORY.with(|m| {
        m.borrow_mut().remove(key);
    });
}
