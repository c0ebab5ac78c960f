use anyhow::{Context, Result};
use std::process::{Child, Command, Stdio};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Port chromedriver listens on unless told otherwise
pub const CHROMEDRIVER_PORT: u16 = 9515;

const CHROMEDRIVER: &str = "chromedriver";

/// Finds a running chromedriver or starts one for the length of the run
#[derive(Default)]
pub struct DriverManager {
    processes: Mutex<Vec<DriverProcess>>,
}

struct DriverProcess {
    child: Child,
    port: u16,
    #[cfg(unix)]
    process_group_id: Option<i32>,
}

impl DriverManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// URL of a working WebDriver.
    ///
    /// An explicit URL is only checked, never replaced. Otherwise a driver
    /// on the standard port is reused, and failing that one is started.
    pub async fn ensure_driver(&self, explicit: Option<&str>) -> Result<String> {
        if let Some(url) = explicit {
            if Self::is_driver_running(url).await {
                debug!("Using WebDriver at {}", url);
                return Ok(url.trim_end_matches('/').to_string());
            }
            anyhow::bail!("Cannot connect to WebDriver at {}", url);
        }

        let standard_url = format!("http://localhost:{}", CHROMEDRIVER_PORT);
        if Self::is_driver_running(&standard_url).await
            && Self::verify_driver_working(&standard_url).await
        {
            debug!("Found external WebDriver at {}", standard_url);
            return Ok(standard_url);
        }

        info!("WebDriver not detected, attempting to start chromedriver...");
        self.start_driver().await
    }

    async fn start_driver(&self) -> Result<String> {
        if !Self::command_exists(CHROMEDRIVER) {
            anyhow::bail!(
                "{} not found in PATH. Please install it:\n\
                  macOS: brew install --cask chromedriver\n\
                  Linux: Download from https://googlechromelabs.github.io/chrome-for-testing/\n\
                  Or pass --webdriver-url to use a running driver",
                CHROMEDRIVER
            );
        }

        let port = Self::find_free_port()?;
        info!("Starting chromedriver on port {}", port);

        let mut cmd = Command::new(CHROMEDRIVER);
        cmd.arg(format!("--port={}", port))
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        // New process group so the driver and its Chrome children die together
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }

        let child = cmd
            .spawn()
            .context(format!("Failed to start {}", CHROMEDRIVER))?;

        #[cfg(unix)]
        let process_group_id = Some(child.id() as i32);

        self.lock().push(DriverProcess {
            child,
            port,
            #[cfg(unix)]
            process_group_id,
        });

        let url = format!("http://localhost:{}", port);

        // Wait for driver to be ready (3 seconds total)
        let max_attempts = 30;
        for attempt in 1..=max_attempts {
            if Self::is_driver_running(&url).await {
                info!("WebDriver started successfully on port {}", port);
                return Ok(url);
            }
            if attempt < max_attempts {
                sleep(Duration::from_millis(100)).await;
            }
        }

        self.stop_port(port);
        anyhow::bail!("WebDriver failed to start within timeout")
    }

    /// Check if a command exists in PATH
    pub fn command_exists(command: &str) -> bool {
        #[cfg(unix)]
        let finder = "which";
        #[cfg(windows)]
        let finder = "where";

        Command::new(finder)
            .arg(command)
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    /// Find a free port, preferring the chromedriver range
    pub fn find_free_port() -> Result<u16> {
        for port in CHROMEDRIVER_PORT..CHROMEDRIVER_PORT + 3 {
            if !Self::is_port_in_use(port) {
                debug!("Found free port {}", port);
                return Ok(port);
            }
            debug!("Port {} is in use", port);
        }

        // Fall back to letting OS assign a port
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();
        drop(listener);
        Ok(port)
    }

    pub fn is_port_in_use(port: u16) -> bool {
        std::net::TcpListener::bind(("127.0.0.1", port)).is_err()
    }

    /// Check if WebDriver answers its status endpoint
    pub async fn is_driver_running(url: &str) -> bool {
        let status_url = format!("{}/status", url.trim_end_matches('/'));

        match reqwest::Client::new()
            .get(&status_url)
            .timeout(Duration::from_secs(1))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    /// A working driver reports `ready: true`; a busy one may refuse new sessions
    async fn verify_driver_working(url: &str) -> bool {
        let status_url = format!("{}/status", url);

        match reqwest::Client::new()
            .get(&status_url)
            .timeout(Duration::from_secs(1))
            .send()
            .await
        {
            Ok(response) => match response.json::<serde_json::Value>().await {
                Ok(body) => driver_ready(&body),
                Err(_) => false,
            },
            Err(_) => false,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<DriverProcess>> {
        // A panic while holding the lock leaves the list itself intact
        self.processes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn stop_port(&self, port: u16) {
        let mut processes = self.lock();
        if let Some(index) = processes.iter().position(|p| p.port == port) {
            let mut process = processes.remove(index);
            warn!("Stopping chromedriver on port {} that never became ready", port);
            Self::kill(&mut process);
        }
    }

    /// Stop every chromedriver this manager started
    pub fn stop_all(&self) {
        let mut processes = self.lock();
        for process in processes.iter_mut() {
            debug!("Stopping WebDriver on port {}", process.port);
            Self::kill(process);
        }
        processes.clear();
    }

    fn kill(process: &mut DriverProcess) {
        #[cfg(unix)]
        if let Some(pgid) = process.process_group_id {
            Self::kill_process_group(pgid);
        }

        // Also try to kill the child process directly (fallback)
        let _ = process.child.kill();
        let _ = process.child.wait();
    }

    #[cfg(unix)]
    fn kill_process_group(pgid: i32) {
        debug!("Killing process group {}", pgid);

        // First try SIGTERM for graceful shutdown
        if let Err(e) = Command::new("kill")
            .args(["-TERM", &format!("-{}", pgid)])
            .output()
        {
            debug!("Failed to send SIGTERM to process group {}: {}", pgid, e);
        }

        std::thread::sleep(Duration::from_millis(100));

        if let Err(e) = Command::new("kill")
            .args(["-KILL", &format!("-{}", pgid)])
            .output()
        {
            debug!("Failed to send SIGKILL to process group {}: {}", pgid, e);
        }
    }
}

impl Drop for DriverManager {
    fn drop(&mut self) {
        self.stop_all();
    }
}

/// Whether a `/status` body reports the driver ready for a new session
pub(crate) fn driver_ready(body: &serde_json::Value) -> bool {
    body.get("value")
        .and_then(|v| v.get("ready"))
        .and_then(|r| r.as_bool())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "webdriver_manager_test.rs"]
mod webdriver_manager_test;
