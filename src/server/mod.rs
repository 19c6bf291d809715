//! Local documentation server bootstrap
//!
//! When no server root is configured, a `godoc` process is started on a free
//! localhost port for the duration of the run.

mod probe;

pub use probe::wait_until_ready;

use crate::config::GoConfig;
use crate::url::ServerRoot;
use crate::DocsetError;
use std::net::TcpListener;
use std::process::Stdio;
use tokio::process::{Child, Command};

const GODOC_PROGRAM: &str = "godoc";

/// A running `godoc` child process
///
/// The process is killed when the handle is dropped.
pub struct GodocServer {
    child: Child,
    root: ServerRoot,
}

impl GodocServer {
    /// Starts `godoc -http=localhost:<port> [-goroot=<dir>]`
    ///
    /// The server's output is inherited unless `silent` is set.
    pub fn spawn(config: &GoConfig, silent: bool) -> Result<Self, DocsetError> {
        Self::spawn_program(GODOC_PROGRAM, config.goroot.as_deref(), silent)
    }

    fn spawn_program(
        program: &str,
        goroot: Option<&str>,
        silent: bool,
    ) -> Result<Self, DocsetError> {
        let port = free_port()
            .map_err(|e| DocsetError::Server(format!("no free port: {}", e)))?;
        let host = format!("localhost:{}", port);

        let mut command = Command::new(program);
        command.arg(format!("-http={}", host));
        if let Some(goroot) = goroot.filter(|g| !g.is_empty()) {
            command.arg(format!("-goroot={}", goroot));
        }
        if silent {
            command.stdout(Stdio::null()).stderr(Stdio::null());
        }
        command.kill_on_drop(true);

        let child = command
            .spawn()
            .map_err(|e| DocsetError::Server(format!("running {}: {}", program, e)))?;
        let root = ServerRoot::parse(&format!("http://{}", host))?;
        tracing::info!("Started {} on {} (pid {:?})", program, root, child.id());

        Ok(Self { child, root })
    }

    pub fn root(&self) -> &ServerRoot {
        &self.root
    }

    /// Kills the server and waits for it to exit
    pub async fn shutdown(mut self) -> Result<(), DocsetError> {
        tracing::info!("Killing godoc on {}", self.root);
        self.child
            .kill()
            .await
            .map_err(|e| DocsetError::Server(format!("killing godoc on {}: {}", self.root, e)))
    }
}

/// Asks the OS for a port that is free right now
fn free_port() -> std::io::Result<u16> {
    let listener = TcpListener::bind(("127.0.0.1", 0))?;
    Ok(listener.local_addr()?.port())
}
