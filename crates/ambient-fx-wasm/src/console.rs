use std::sync::Once;

/// Route `log` records and panics to the browser console. Safe to call from
/// every constructor; only the first call has an effect.
pub fn install() {
    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        console_error_panic_hook::set_once();
        let level = if cfg!(debug_assertions) {
            log::Level::Debug
        } else {
            log::Level::Info
        };
        if console_log::init_with_level(level).is_err() {
            web_sys::console::warn_1(&"a logger is already installed".into());
        }
    });
}
