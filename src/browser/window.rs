//! Browser window: one Firefox process, one connection, one profile.
//!
//! ```no_run
//! # use product_scraper::Driver;
//! # async fn example(driver: &Driver) -> product_scraper::Result<()> {
//! let window = driver.window().headless().window_size(1920, 1080).spawn().await?;
//! let tab = window.tab();
//! tab.goto("https://example.com").await?;
//! window.close().await?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::process::Child;
use tracing::{debug, info};

use crate::driver::{Driver, FirefoxOptions, Profile};
use crate::error::Result;
use crate::identifiers::{FrameId, SessionId, TabId};
use crate::transport::Connection;

use super::Tab;

// ============================================================================
// ProcessGuard
// ============================================================================

/// Owns the Firefox child process until it is explicitly reaped.
struct ProcessGuard {
    child: Option<Child>,
    pid: u32,
}

impl ProcessGuard {
    fn new(child: Child) -> Self {
        let pid = child.id().unwrap_or_default();
        Self {
            child: Some(child),
            pid,
        }
    }

    /// Takes the child out; later calls return `None`.
    fn take(&mut self) -> Option<Child> {
        self.pid = 0;
        self.child.take()
    }
}

impl Drop for ProcessGuard {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take()
            && let Err(e) = child.start_kill()
        {
            debug!(pid = self.pid, error = %e, "Failed to signal Firefox on drop");
        }
    }
}

// ============================================================================
// Window
// ============================================================================

struct WindowInner {
    session_id: SessionId,
    process: Mutex<ProcessGuard>,
    connection: Connection,
    _profile: Profile,
    port: u16,
    tab_id: TabId,
}

/// Handle to a Firefox window.
///
/// Clones share the same process. The process is killed by
/// [`close`](Self::close), or on drop of the last clone.
#[derive(Clone)]
pub struct Window {
    inner: Arc<WindowInner>,
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("session_id", &self.inner.session_id)
            .field("port", &self.inner.port)
            .field("tab_id", &self.inner.tab_id)
            .finish_non_exhaustive()
    }
}

impl Window {
    pub(crate) fn new(
        connection: Connection,
        process: Child,
        profile: Profile,
        port: u16,
        session_id: SessionId,
        tab_id: TabId,
    ) -> Self {
        debug!(%session_id, %tab_id, port, "Window created");

        Self {
            inner: Arc::new(WindowInner {
                session_id,
                process: Mutex::new(ProcessGuard::new(process)),
                connection,
                _profile: profile,
                port,
                tab_id,
            }),
        }
    }

    /// Returns the session ID.
    #[inline]
    #[must_use]
    pub fn session_id(&self) -> SessionId {
        self.inner.session_id
    }

    /// Returns the WebSocket port the extension is connected to.
    #[inline]
    #[must_use]
    pub fn port(&self) -> u16 {
        self.inner.port
    }

    /// Returns the Firefox process ID (0 once reaped).
    #[inline]
    #[must_use]
    pub fn pid(&self) -> u32 {
        self.inner.process.lock().pid
    }

    /// Returns the window's tab, main frame.
    #[must_use]
    pub fn tab(&self) -> Tab {
        Tab::new(self.inner.tab_id, FrameId::main(), self.clone())
    }

    /// Closes the connection and kills Firefox.
    ///
    /// Safe to call more than once.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if the process cannot be
    /// killed.
    pub async fn close(&self) -> Result<()> {
        self.inner.connection.shutdown();

        let child = self.inner.process.lock().take();
        if let Some(mut child) = child {
            let pid = child.id();
            child.kill().await?;
            info!(?pid, session_id = %self.inner.session_id, "Firefox closed");
        }

        Ok(())
    }

    pub(crate) fn connection(&self) -> &Connection {
        &self.inner.connection
    }
}

// ============================================================================
// WindowBuilder
// ============================================================================

/// Configures and spawns a [`Window`]. Created by [`Driver::window`].
pub struct WindowBuilder<'a> {
    driver: &'a Driver,
    options: FirefoxOptions,
}

impl<'a> WindowBuilder<'a> {
    pub(crate) fn new(driver: &'a Driver) -> Self {
        Self {
            driver,
            options: FirefoxOptions::new(),
        }
    }

    /// Runs Firefox without a visible window.
    #[must_use]
    pub fn headless(mut self) -> Self {
        self.options = self.options.with_headless();
        self
    }

    /// Sets the window size in pixels.
    #[must_use]
    pub fn window_size(mut self, width: u32, height: u32) -> Self {
        self.options = self.options.with_window_size(width, height);
        self
    }

    /// Launches Firefox and waits for the extension handshake.
    ///
    /// # Errors
    ///
    /// See [`Driver`] for launch failures.
    pub async fn spawn(self) -> Result<Window> {
        self.driver.spawn_window(self.options).await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_is_clone_and_debug() {
        fn assert_traits<T: Clone + fmt::Debug + Send + Sync>() {}
        assert_traits::<Window>();
    }

    #[test]
    fn test_window_builder_collects_options() {
        let driver = Driver::new("firefox".into(), crate::driver::ExtensionSource::base64(""));
        let builder = driver.window().headless().window_size(1280, 720);

        assert_eq!(
            builder.options,
            FirefoxOptions::new().with_headless().with_window_size(1280, 720)
        );
    }
}
