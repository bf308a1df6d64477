use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::Result;

/// Returns the path to the PID file in the rectwatch data directory.
///
/// Creates the directory if it doesn't exist.
pub fn pid_path() -> Result<PathBuf> {
    let dir = crate::config::data_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no local data directory"))?;
    fs::create_dir_all(&dir)?;
    Ok(dir.join("rectwatch.pid"))
}

/// Reads the PID from the PID file, if it exists.
pub fn read_pid_file() -> Result<Option<u32>> {
    read_pid_from(&pid_path()?)
}

/// Removes the PID file.
///
/// Used by `rectwatch status` to clean up after a server that was killed.
pub fn remove_pid_file() -> Result<()> {
    let path = pid_path()?;

    if path.exists() {
        fs::remove_file(&path)?;
    }

    Ok(())
}

/// A PID file that is removed again when dropped.
///
/// Held by the server for as long as it accepts connections. The file lets
/// `rectwatch status` tell a stopped server apart from one that is not
/// answering.
#[derive(Debug)]
pub struct PidFile {
    path: PathBuf,
}

impl PidFile {
    /// Writes the current process's PID to [`pid_path`].
    pub fn create() -> Result<Self> {
        Self::create_at(pid_path()?)
    }

    fn create_at(path: PathBuf) -> Result<Self> {
        write_pid_to(&path, std::process::id())?;
        Ok(Self { path })
    }
}

impl Drop for PidFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

fn write_pid_to(path: &Path, pid: u32) -> Result<()> {
    fs::write(path, pid.to_string())?;
    Ok(())
}

fn read_pid_from(path: &Path) -> Result<Option<u32>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path)?;
    let pid: u32 = contents.trim().parse().map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("invalid PID file contents: {e}"),
        )
    })?;

    Ok(Some(pid))
}
