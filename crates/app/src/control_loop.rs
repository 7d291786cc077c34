//! Control loop: the single write path for the actuator log.
//!
//! A [`ControlLoop`] runs as one tokio task that owns the cached current
//! actuator state. Every write (sensor readings from the message bus,
//! overrides from HTTP) reaches it through a [`ControlHandle`] as a command
//! on an `mpsc` channel and gets its result back on a `oneshot`. Because
//! commands are handled one at a time, the read of the current state and
//! the write of the next one can never interleave with another event.
//!
//! Per event the order is: decide, persist, then publish. A storage
//! failure aborts the event before anything is published; a publish failure
//! is logged and never undoes the write.

use std::future::Future;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use ledbridge_domain::actuator::{ActuatorState, ChannelOverride};
use ledbridge_domain::decision::decide;
use ledbridge_domain::error::{BridgeError, StorageTimeout};
use ledbridge_domain::sensor::SensorReading;
use ledbridge_domain::time::{now, strictly_after};

use crate::ports::{ActuatorPublisher, ControlLog};

/// Tuning for the control loop worker.
#[derive(Debug, Clone, Copy)]
pub struct ControlConfig {
    /// Upper bound for each storage call.
    pub storage_timeout: Duration,
    /// Upper bound for each outbound publish.
    pub publish_timeout: Duration,
    /// Pending commands accepted before senders wait.
    pub queue_capacity: usize,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            storage_timeout: Duration::from_secs(5),
            publish_timeout: Duration::from_secs(5),
            queue_capacity: 64,
        }
    }
}

type Reply = oneshot::Sender<Result<ActuatorState, BridgeError>>;

enum Command {
    Reading {
        reading: SensorReading,
        reply: Reply,
    },
    Override {
        request: ChannelOverride,
        reply: Reply,
    },
}

/// Cloneable handle used by every inbound source to reach the worker.
#[derive(Clone)]
pub struct ControlHandle {
    sender: mpsc::Sender<Command>,
}

impl ControlHandle {
    /// Submit a sensor reading and wait until it has been handled.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::StorageUnavailable`] if persisting failed or
    /// timed out, or [`BridgeError::ControlLoopClosed`] if the worker is gone.
    pub async fn submit_reading(
        &self,
        reading: SensorReading,
    ) -> Result<ActuatorState, BridgeError> {
        self.request(|reply| Command::Reading { reading, reply }).await
    }

    /// Apply a manual override and wait for the resulting state.
    ///
    /// # Errors
    ///
    /// Same as [`submit_reading`](Self::submit_reading).
    pub async fn request_override(
        &self,
        request: ChannelOverride,
    ) -> Result<ActuatorState, BridgeError> {
        self.request(|reply| Command::Override { request, reply }).await
    }

    async fn request(
        &self,
        command: impl FnOnce(Reply) -> Command,
    ) -> Result<ActuatorState, BridgeError> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(command(reply))
            .await
            .map_err(|_| BridgeError::ControlLoopClosed)?;
        response.await.map_err(|_| BridgeError::ControlLoopClosed)?
    }
}

/// Single-writer worker deciding and recording actuator states.
pub struct ControlLoop<L, P> {
    log: L,
    publisher: P,
    config: ControlConfig,
    /// `None` until first needed, and again after any storage failure.
    current: Option<ActuatorState>,
}

impl<L, P> ControlLoop<L, P>
where
    L: ControlLog + Send + Sync + 'static,
    P: ActuatorPublisher + Send + Sync + 'static,
{
    /// Create a new worker. Nothing is loaded until the first event.
    pub fn new(log: L, publisher: P, config: ControlConfig) -> Self {
        Self {
            log,
            publisher,
            config,
            current: None,
        }
    }

    /// Spawn the worker on the tokio runtime.
    ///
    /// The task exits once every [`ControlHandle`] has been dropped and the
    /// queue is drained.
    #[must_use]
    pub fn spawn(self) -> (ControlHandle, JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(self.config.queue_capacity.max(1));
        let task = tokio::spawn(self.run(receiver));
        (ControlHandle { sender }, task)
    }

    async fn run(mut self, mut receiver: mpsc::Receiver<Command>) {
        tracing::info!("control loop started");
        while let Some(command) = receiver.recv().await {
            let (result, reply) = match command {
                Command::Reading { reading, reply } => (self.handle_reading(reading).await, reply),
                Command::Override { request, reply } => {
                    (self.handle_override(request).await, reply)
                }
            };
            if reply.send(result).is_err() {
                tracing::debug!("command caller went away before the reply");
            }
        }
        tracing::info!("control loop stopped");
    }

    /// Handle one sensor reading: decide, persist sample and state
    /// atomically, then publish.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::StorageUnavailable`] when loading or writing
    /// fails; nothing is published in that case.
    pub async fn handle_reading(
        &mut self,
        reading: SensorReading,
    ) -> Result<ActuatorState, BridgeError> {
        let defaulted = reading.defaulted_fields();
        if !defaulted.is_empty() {
            tracing::warn!(?defaulted, "sensor reading incomplete, defaulting to 0");
        }

        let current = self.current_state().await?;
        let stamp = strictly_after(current.recorded_at, now());
        let sample = reading.into_sample(stamp);
        let next = decide(Some(&sample), &current, None, stamp);

        let committed = bounded(
            self.config.storage_timeout,
            self.log.commit_reading(sample, next),
        )
        .await;
        self.settle(committed, next)?;

        tracing::debug!(
            temperature = sample.temperature,
            humidity = sample.humidity,
            lux = sample.illuminance,
            led1 = %next.led1,
            led2 = %next.led2,
            "sensor reading recorded"
        );
        self.publish(&next).await;
        Ok(next)
    }

    /// Handle one override: decide without a sample, persist the state,
    /// then publish. Identical overrides still append a new row.
    ///
    /// # Errors
    ///
    /// Same as [`handle_reading`](Self::handle_reading).
    pub async fn handle_override(
        &mut self,
        request: ChannelOverride,
    ) -> Result<ActuatorState, BridgeError> {
        let current = self.current_state().await?;
        let stamp = strictly_after(current.recorded_at, now());
        let next = decide(None, &current, Some(&request), stamp);

        let committed = bounded(self.config.storage_timeout, self.log.commit_override(next)).await;
        self.settle(committed, next)?;

        tracing::info!(led1 = %next.led1, led2 = %next.led2, "override applied");
        self.publish(&next).await;
        Ok(next)
    }

    async fn current_state(&mut self) -> Result<ActuatorState, BridgeError> {
        if let Some(state) = self.current {
            return Ok(state);
        }
        let loaded = bounded(self.config.storage_timeout, self.log.current_state())
            .await?
            .unwrap_or_else(ActuatorState::initial);
        tracing::debug!(led1 = %loaded.led1, led2 = %loaded.led2, "current actuator state loaded");
        self.current = Some(loaded);
        Ok(loaded)
    }

    /// Update the cache from a commit outcome. On failure the cache is
    /// dropped so the next event reloads from storage.
    fn settle(
        &mut self,
        committed: Result<(), BridgeError>,
        next: ActuatorState,
    ) -> Result<(), BridgeError> {
        match committed {
            Ok(()) => {
                self.current = Some(next);
                Ok(())
            }
            Err(err) => {
                self.current = None;
                Err(err)
            }
        }
    }

    async fn publish(&self, state: &ActuatorState) {
        match tokio::time::timeout(self.config.publish_timeout, self.publisher.publish(state)).await
        {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                tracing::warn!(error = %err, "failed to publish actuator state");
            }
            Err(_) => {
                tracing::warn!(
                    timeout = ?self.config.publish_timeout,
                    "publishing actuator state timed out"
                );
            }
        }
    }
}

async fn bounded<T>(
    limit: Duration,
    operation: impl Future<Output = Result<T, BridgeError>>,
) -> Result<T, BridgeError> {
    tokio::time::timeout(limit, operation)
        .await
        .map_err(|_| StorageTimeout(limit))?
}
