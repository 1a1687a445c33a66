use log::{error, info};

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    if let Err(err) = console_log::init_with_level(after_site::config::log_level()) {
        gloo_console::error!("error initializing log:", err.to_string());
    }

    info!("Starting after-site");
    if let Err(err) = after_site::start() {
        error!("Page behaviour not started: {}", err);
    }
}
