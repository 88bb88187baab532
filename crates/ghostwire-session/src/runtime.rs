//! Generic runtime for session orchestration.
//!
//! The Runtime drives the event loop: it polls the [`Driver`] for events,
//! feeds them through the [`Session`] state machine, and executes the
//! returned actions. All session logic stays single-threaded; each event is
//! fully processed before the next one is polled.

use ghostwire_core::env::Environment;

use crate::action::SessionAction;
use crate::driver::Driver;
use crate::session::Session;

/// Generic runtime wiring a [`Driver`] to a [`Session`].
pub struct Runtime<D, E>
where
    D: Driver<E>,
    E: Environment,
{
    driver: D,
    session: Session<E>,
}

impl<D, E> Runtime<D, E>
where
    D: Driver<E>,
    E: Environment,
{
    /// Create a runtime with the given driver and environment.
    pub fn new(driver: D, env: E) -> Self {
        Self { driver, session: Session::new(env) }
    }

    /// Run the event loop until the driver's event source closes.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters a platform fault.
    pub async fn run(mut self) -> Result<(), D::Error> {
        self.driver.render(&self.session)?;

        while let Some(event) = self.driver.poll_event().await? {
            let actions = self.session.handle(event);
            for action in actions {
                match action {
                    SessionAction::Render => self.driver.render(&self.session)?,
                    other => {
                        tracing::trace!(action = ?other, "executing");
                        self.driver.apply(other).await?;
                    },
                }
            }
        }

        self.driver.stop();
        Ok(())
    }

    /// The session being driven.
    pub fn session(&self) -> &Session<E> {
        &self.session
    }
}
