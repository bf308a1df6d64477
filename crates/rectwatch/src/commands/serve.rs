use rectwatch_core::{config, log};

pub fn execute() {
    let config = config::load();
    log::init(&config.logging);

    if let Err(e) = rectwatch_server::run(&config) {
        eprintln!("Server error: {e}");
        std::process::exit(1);
    }
}
