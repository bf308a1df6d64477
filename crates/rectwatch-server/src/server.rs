use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::Duration;

use rectwatch_core::config::ServerConfig;
use rectwatch_core::pid::PidFile;
use rectwatch_core::{Clock, Config, RectangleStore, Result, log_info, log_warn};

use crate::service::QueryService;
use crate::sqlite::SqliteStore;

#[path = "server_routes.rs"]
mod server_routes;

/// Runs the rectwatch server in the foreground.
///
/// Opens the database, writes the PID file, and serves requests until
/// Ctrl+C or SIGTERM. The PID file is removed on the way out.
pub fn run(config: &Config) -> Result<()> {
    let store = SqliteStore::open(&config.storage)?;
    log_info!("database at {}", store.path().display());
    let service = QueryService::new(store, config.matching.clock)
        .reject_negative(config.matching.reject_negative_dimensions);
    let server = Server::bind(&config.server, service)?;

    let shutdown = server.shutdown_handle()?;
    ctrlc::set_handler(move || {
        log_info!("shutdown requested");
        shutdown.shutdown();
    })
    .map_err(|e| io::Error::other(format!("could not install signal handler: {e}")))?;

    let _pid_file = PidFile::create()?;
    let addr = server.local_addr()?;
    eprintln!("rectwatch listening on http://{addr}");
    log_info!("listening on {addr}");

    server.run()?;
    log_info!("stopped");
    Ok(())
}

/// A bound listener plus the service its workers call into.
pub struct Server<S, C> {
    listener: TcpListener,
    service: Arc<QueryService<S, C>>,
    settings: ServerConfig,
    stopping: Arc<AtomicBool>,
}

/// Stops a running [`Server`] from another thread.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    stopping: Arc<AtomicBool>,
    wake_addr: SocketAddr,
}

impl ShutdownHandle {
    /// Flags the server to stop and wakes its accept loop.
    ///
    /// Requests already handed to a worker are finished first.
    pub fn shutdown(&self) {
        if self.stopping.swap(true, Ordering::SeqCst) {
            return;
        }
        let _ = TcpStream::connect_timeout(&self.wake_addr, Duration::from_secs(1));
    }
}

impl<S, C> Server<S, C>
where
    S: RectangleStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Binds the configured address. Port 0 picks a free port.
    pub fn bind(settings: &ServerConfig, service: QueryService<S, C>) -> Result<Self> {
        let listener = TcpListener::bind(&settings.bind)?;
        Ok(Self {
            listener,
            service: Arc::new(service),
            settings: settings.clone(),
            stopping: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn shutdown_handle(&self) -> Result<ShutdownHandle> {
        let mut wake_addr = self.local_addr()?;
        // A wildcard bind is reachable through loopback.
        if wake_addr.ip().is_unspecified() {
            let loopback: IpAddr = match wake_addr {
                SocketAddr::V4(_) => Ipv4Addr::LOCALHOST.into(),
                SocketAddr::V6(_) => Ipv6Addr::LOCALHOST.into(),
            };
            wake_addr.set_ip(loopback);
        }
        Ok(ShutdownHandle {
            stopping: self.stopping.clone(),
            wake_addr,
        })
    }

    /// Accepts connections and hands them to a fixed pool of workers.
    ///
    /// Blocks until [`ShutdownHandle::shutdown`] is called, then waits for
    /// the workers to drain the queue.
    pub fn run(self) -> Result<()> {
        let (tx, rx) = mpsc::channel::<TcpStream>();
        let rx = Arc::new(Mutex::new(rx));

        let workers: Vec<_> = (0..self.settings.workers)
            .map(|_| spawn_worker(rx.clone(), self.service.clone(), self.settings.clone()))
            .collect();
        log_info!("started {} workers", workers.len());

        for stream in self.listener.incoming() {
            if self.stopping.load(Ordering::SeqCst) {
                break;
            }
            match stream {
                Ok(stream) => {
                    if tx.send(stream).is_err() {
                        break;
                    }
                }
                Err(e) => log_warn!("accept failed: {e}"),
            }
        }

        drop(tx);
        for worker in workers {
            let _ = worker.join();
        }
        Ok(())
    }
}

/// Pulls connections off the shared queue until the sender is dropped.
fn spawn_worker<S, C>(
    rx: Arc<Mutex<mpsc::Receiver<TcpStream>>>,
    service: Arc<QueryService<S, C>>,
    settings: ServerConfig,
) -> thread::JoinHandle<()>
where
    S: RectangleStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    let timeout = Duration::from_secs(settings.read_timeout_secs);
    let max_body = settings.max_body_kb * 1024;
    thread::spawn(move || {
        loop {
            let next = match rx.lock() {
                Ok(queue) => queue.recv(),
                Err(_) => return,
            };
            let Ok(stream) = next else {
                return;
            };
            if let Err(e) = set_timeouts(&stream, timeout) {
                log_warn!("could not set socket timeouts: {e}");
            }
            server_routes::handle_connection(&stream, &service, max_body);
        }
    })
}

/// Bounds both directions so a stalled client cannot hold a worker.
fn set_timeouts(stream: &TcpStream, timeout: Duration) -> io::Result<()> {
    stream.set_read_timeout(Some(timeout))?;
    stream.set_write_timeout(Some(timeout))
}
