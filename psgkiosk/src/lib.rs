//! # psgkiosk - Display surface launcher
//!
//! Starts a fullscreen kiosk browser pointed at the agent's local
//! display page, by trying a fixed list of known executables in
//! priority order until one spawns. Hosts without any of them run in
//! degraded mode: the agent keeps polling, caching and announcing, it
//! just has no visible output. That state is reported through logs and
//! never retried, since there is no alternate launch strategy once the list
//! is exhausted.
//!
//! # Example
//!
//! ```no_run
//! use psgkiosk::KioskLauncher;
//!
//! # async fn example() {
//! let launcher = KioskLauncher::new();
//! if let Err(e) = launcher.launch("http://127.0.0.1:8080/").await {
//!     tracing::warn!("No display surface: {e}");
//! }
//! // ... on operator interrupt:
//! launcher.terminate().await;
//! # }
//! ```

use std::sync::Arc;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Result type alias for launcher operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when starting the display surface.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// None of the candidate executables could be spawned
    #[error("No suitable kiosk browser found on this host")]
    NoBrowser,
}

/// One candidate browser invocation: executable plus kiosk flags.
///
/// The display URL is appended as the final argument at launch time.
#[derive(Debug, Clone)]
pub struct KioskCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl KioskCommand {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Browsers tried in priority order, most likely hosts first.
fn default_candidates() -> Vec<KioskCommand> {
    vec![
        // Pi / Debian
        KioskCommand::new(
            "chromium-browser",
            &[
                "--kiosk",
                "--no-sandbox",
                "--disable-infobars",
                "--disable-session-crashed-bubble",
            ],
        ),
        KioskCommand::new("chromium", &["--kiosk", "--no-first-run"]),
        // Generic Linux
        KioskCommand::new("google-chrome", &["--kiosk", "--no-first-run"]),
        KioskCommand::new("google-chrome-stable", &["--kiosk", "--no-first-run"]),
        // Windows
        KioskCommand::new("msedge", &["--kiosk", "--no-first-run"]),
        KioskCommand::new("chrome", &["--kiosk", "--no-first-run"]),
        // macOS
        KioskCommand::new(
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            &["--kiosk", "--no-first-run"],
        ),
        // Fallback: fullscreen rather than true kiosk
        KioskCommand::new("firefox", &["--kiosk"]),
    ]
}

/// Launcher for the fullscreen display process.
///
/// Cheap to clone: clones share the spawned child, so the composition
/// layer can hand one clone to the content publisher (for the one-time
/// start) and keep another for teardown on operator interrupt.
#[derive(Debug, Clone)]
pub struct KioskLauncher {
    candidates: Arc<Vec<KioskCommand>>,
    child: Arc<Mutex<Option<Child>>>,
}

impl Default for KioskLauncher {
    fn default() -> Self {
        Self::new()
    }
}

impl KioskLauncher {
    /// Launcher with the built-in candidate list.
    pub fn new() -> Self {
        Self::with_candidates(default_candidates())
    }

    /// Launcher with a custom candidate list.
    pub fn with_candidates(candidates: Vec<KioskCommand>) -> Self {
        Self {
            candidates: Arc::new(candidates),
            child: Arc::new(Mutex::new(None)),
        }
    }

    /// Try each candidate in order until one spawns, pointed at `url`.
    ///
    /// Idempotent: if a display process is already running the call is a
    /// no-op. Returns [`Error::NoBrowser`] when the whole list failed,
    /// which callers treat as degraded mode rather than a fatal error.
    pub async fn launch(&self, url: &str) -> Result<()> {
        let mut slot = self.child.lock().await;
        if slot.is_some() {
            debug!("Display surface already running");
            return Ok(());
        }

        for candidate in self.candidates.iter() {
            match Command::new(&candidate.program)
                .args(&candidate.args)
                .arg(url)
                .spawn()
            {
                Ok(child) => {
                    info!(browser = %candidate.program, %url, "Display surface started");
                    *slot = Some(child);
                    return Ok(());
                }
                Err(e) => {
                    debug!(browser = %candidate.program, "Not available: {e}");
                }
            }
        }

        warn!("No suitable kiosk browser found; running without visible output");
        Err(Error::NoBrowser)
    }

    /// Whether a display process was successfully spawned.
    pub async fn is_running(&self) -> bool {
        self.child.lock().await.is_some()
    }

    /// Kill the display process if one was started.
    ///
    /// Safe to call multiple times; a launcher that never spawned
    /// anything does nothing.
    pub async fn terminate(&self) {
        let mut slot = self.child.lock().await;
        if let Some(mut child) = slot.take() {
            if let Err(e) = child.kill().await {
                debug!("Display surface already gone: {e}");
            } else {
                info!("Display surface terminated");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_candidates_start_with_pi_browser() {
        let candidates = default_candidates();
        assert!(!candidates.is_empty());
        assert_eq!(candidates[0].program, "chromium-browser");
        assert!(candidates[0].args.contains(&"--kiosk".to_string()));
    }

    #[tokio::test]
    async fn test_exhausted_candidates_is_degraded_mode() {
        let launcher = KioskLauncher::with_candidates(vec![KioskCommand::new(
            "definitely-not-a-browser-on-this-host",
            &["--kiosk"],
        )]);

        assert!(matches!(
            launcher.launch("http://127.0.0.1:8080/").await,
            Err(Error::NoBrowser)
        ));
        assert!(!launcher.is_running().await);

        // Terminate on a launcher that never spawned is a no-op.
        launcher.terminate().await;
    }

    #[tokio::test]
    async fn test_launch_spawns_once_and_terminates() {
        // `sh -c` stands in for a browser; extra args (the URL) become
        // positional parameters and are ignored by the script.
        let launcher = KioskLauncher::with_candidates(vec![KioskCommand::new(
            "sh",
            &["-c", "sleep 300"],
        )]);

        launcher.launch("http://127.0.0.1:8080/").await.unwrap();
        assert!(launcher.is_running().await);

        // A second launch is a no-op while the first child lives.
        launcher.launch("http://127.0.0.1:8080/").await.unwrap();
        assert!(launcher.is_running().await);

        launcher.terminate().await;
        assert!(!launcher.is_running().await);
    }

    #[tokio::test]
    async fn test_fallback_order() {
        // First candidate missing, second spawnable: the second wins.
        let launcher = KioskLauncher::with_candidates(vec![
            KioskCommand::new("definitely-not-a-browser-on-this-host", &[]),
            KioskCommand::new("sh", &["-c", "sleep 300"]),
        ]);

        launcher.launch("http://127.0.0.1:8080/").await.unwrap();
        assert!(launcher.is_running().await);
        launcher.terminate().await;
    }
}
