use rectwatch_core::config;

/// Creates the default configuration at `~/.config/rectwatch/`.
///
/// Writes a commented `config.toml` and an example `query.json` to use
/// with `rectwatch submit`. Existing files are not overwritten.
pub fn execute() {
    let Some(dir) = config::config_dir() else {
        eprintln!("Error: could not determine home directory.");
        std::process::exit(1);
    };

    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("Error: could not create {}: {e}", dir.display());
        std::process::exit(1);
    }

    write_if_missing(
        &dir.join("config.toml"),
        &config::template::generate_config(),
    );
    write_if_missing(
        &dir.join("query.json"),
        &config::template::generate_query(),
    );

    println!("\nEdit config.toml to change the listen address, database, or logging.");
    println!("Try `rectwatch submit {}`", dir.join("query.json").display());
}

/// Writes content to a file only if it doesn't already exist.
fn write_if_missing(path: &std::path::Path, content: &str) {
    if path.exists() {
        println!("Already exists: {}", path.display());
        return;
    }

    match std::fs::write(path, content) {
        Ok(()) => println!("Created {}", path.display()),
        Err(e) => eprintln!("Error: could not write {}: {e}", path.display()),
    }
}
