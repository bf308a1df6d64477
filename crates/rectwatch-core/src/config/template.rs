/// Generates the default `config.toml` contents with explanatory comments.
///
/// This is used by `rectwatch init` to create a starter config file that
/// users can immediately edit.
pub fn generate_config() -> String {
    r##"# rectwatch configuration
# Location: ~/.config/rectwatch/config.toml

[server]
# Address the HTTP server listens on.
bind = "127.0.0.1:8090"
# Worker threads serving requests concurrently.
workers = 20
# Seconds to wait on a client, both reading its request and writing the reply.
read_timeout_secs = 5
# Largest accepted request body in kilobytes.
max_body_kb = 1024

[storage]
# SQLite database file. Defaults to rectwatch.db in the local data directory.
# path = "/var/lib/rectwatch/rectwatch.db"
# Read connections kept open (1 to 8).
read_pool_size = 4
# Milliseconds to wait on a locked database before failing.
busy_timeout_ms = 5000

[matching]
# Clock used to stamp matches: "local" or "utc".
clock = "local"
# Reject queries with a negative width or height (400 Bad Request).
reject_negative_dimensions = true

[logging]
# Enable file logging to ~/.config/rectwatch/logs/rectwatch.log.
enabled = false
# Minimum log level: "debug", "info", "warn", or "error".
level = "info"
# Maximum log file size in MB before rotation.
max_file_mb = 10
"##
    .to_string()
}

/// Generates an example query document for `rectwatch submit`.
pub fn generate_query() -> String {
    r##"{
  "Main": { "X": 0, "Y": 0, "Width": 10, "Height": 10 },
  "Input": [
    { "X": 5, "Y": 5, "Width": 10, "Height": 10 },
    { "X": 20, "Y": 20, "Width": 5, "Height": 5 },
    { "X": 0, "Y": 0, "Width": 0, "Height": 5 }
  ]
}
"##
    .to_string()
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
