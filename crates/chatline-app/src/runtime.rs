//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`App`]: client state machine
//! - [`Driver`]: platform-specific I/O

use crate::{App, AppAction, AppEvent, Driver};

/// Generic runtime that orchestrates App and Driver.
///
/// Connecting does not block the loop: the driver reports the outcome as an
/// event. Connection failures never end the loop. They are logged and fed
/// back to the App as [`AppEvent::Disconnected`]. Only driver errors from polling or
/// rendering are fatal.
pub struct Runtime<D: Driver> {
    driver: D,
    app: App,
}

impl<D: Driver> Runtime<D> {
    /// Create a new runtime with the given driver and app.
    pub fn new(driver: D, app: App) -> Self {
        Self { driver, app }
    }

    /// Run the main event loop.
    ///
    /// This is the core orchestration loop that:
    /// 1. Runs the App's startup actions
    /// 2. Polls the driver for the next event
    /// 3. Feeds it to the App and executes the resulting actions
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(mut self) -> Result<App, D::Error> {
        self.driver.render(&self.app)?;

        let actions = self.app.start();
        let mut should_quit = self.process_actions(actions).await?;

        while !should_quit {
            let Some(event) = self.driver.poll_event().await? else {
                tracing::debug!("input exhausted, stopping");
                break;
            };
            let actions = self.app.handle(event);
            should_quit = self.process_actions(actions).await?;
        }

        self.driver.stop();
        Ok(self.app)
    }

    /// Process actions returned by the App.
    ///
    /// Uses iterative processing to avoid async recursion between actions and
    /// events. Returns `true` if should quit.
    async fn process_actions(&mut self, initial_actions: Vec<AppAction>) -> Result<bool, D::Error> {
        let mut pending_actions = initial_actions;

        while !pending_actions.is_empty() {
            let actions = std::mem::take(&mut pending_actions);

            for action in actions {
                match action {
                    AppAction::Render => self.driver.render(&self.app)?,
                    AppAction::Quit => return Ok(true),
                    AppAction::Connect { server_url } => {
                        if let Err(e) = self.driver.connect(&server_url).await {
                            tracing::warn!(%server_url, error = %e, "failed to connect");
                            let event = AppEvent::Disconnected { reason: e.to_string() };
                            pending_actions.extend(self.app.handle(event));
                        }
                    },
                    AppAction::SendFrame { frame } => {
                        if let Err(e) = self.driver.send_frame(frame).await {
                            tracing::warn!(error = %e, "failed to send frame");
                            let event = AppEvent::Disconnected { reason: e.to_string() };
                            pending_actions.extend(self.app.handle(event));
                        }
                    },
                }
            }
        }
        Ok(false)
    }

    /// Get a reference to the App
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Get a mutable reference to the App
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }
}
