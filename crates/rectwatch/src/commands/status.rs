use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use rectwatch_core::{config, pid};

pub fn execute() {
    let bind = config::load().server.bind;

    if is_listening(&bind) {
        println!("rectwatch is running on {bind}.");
        return;
    }

    // Nothing answers: a PID file left behind means the server was killed
    // without a clean shutdown, or is stuck.
    match pid::read_pid_file() {
        Ok(Some(pid)) if is_process_alive(pid) => {
            println!("rectwatch process exists (PID: {pid}) but is not responding.");
        }
        Ok(Some(_)) => {
            let _ = pid::remove_pid_file();
            println!("rectwatch is not running (cleaned up stale PID file).");
        }
        _ => println!("rectwatch is not running."),
    }
}

fn is_listening(bind: &str) -> bool {
    let Ok(addrs) = bind.to_socket_addrs() else {
        return false;
    };
    let timeout = Duration::from_millis(250);
    addrs.into_iter().any(|addr| TcpStream::connect_timeout(&addr, timeout).is_ok())
}

/// Checks `/proc` where it exists; elsewhere assumes the PID is alive.
fn is_process_alive(pid: u32) -> bool {
    let proc = std::path::Path::new("/proc");
    !proc.is_dir() || proc.join(pid.to_string()).exists()
}
