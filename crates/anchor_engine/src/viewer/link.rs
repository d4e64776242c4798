//! Viewer connection lifecycle
//!
//! Connecting to the viewer is the only long wait in the overlay. It is
//! modeled as a polled state machine advanced by the host's frame clock:
//! the connector is polled once per advance, and if it is still pending when
//! the deadline expires the link falls back to 2D-only mode.
//!
//! ```text
//! Idle --connect()--> Connecting --Ready--> Connected
//!                        |  \
//!                 Failed |   \ deadline expired
//!                        v    v
//!                     Fallback2D --connect()--> Connecting
//! ```

use std::time::Duration;

use crate::core::config::ViewerConfig;
use crate::foundation::time::Deadline;

use super::ViewerError;

/// Result of polling a connector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectPoll {
    /// Still waiting for the viewer
    Pending,
    /// The viewer is ready to project and publish poses
    Ready,
    /// The viewer reported a failure
    Failed(String),
}

/// Host-side handle that knows how to reach the viewer
pub trait ViewerConnector {
    /// Check whether the viewer has become ready
    fn poll_connect(&mut self) -> ConnectPoll;

    /// Release any viewer-side subscriptions
    fn disconnect(&mut self) {}
}

/// Current state of the link
#[derive(Debug, Clone)]
pub enum ConnectionState {
    /// No connection attempt made yet, or explicitly disconnected
    Idle,
    /// Waiting for the viewer
    Connecting {
        /// Time left before falling back
        deadline: Deadline,
    },
    /// Viewer ready; 3D placement available
    Connected,
    /// Viewer unreachable; only legacy 2D placement is available
    Fallback2D(ViewerError),
}

/// State change reported by [`ViewerLink::advance`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    /// The viewer became ready
    Connected,
    /// The link gave up and entered 2D-only mode
    FellBack(ViewerError),
}

/// Connection to the viewer with a bounded wait
pub struct ViewerLink {
    connector: Box<dyn ViewerConnector>,
    timeout: Duration,
    state: ConnectionState,
}

impl ViewerLink {
    /// Create an idle link
    pub fn new(connector: Box<dyn ViewerConnector>, config: &ViewerConfig) -> Self {
        Self {
            connector,
            timeout: config.connect_timeout(),
            state: ConnectionState::Idle,
        }
    }

    /// Start (or restart) a connection attempt
    pub fn connect(&mut self) {
        log::info!("Connecting to viewer (timeout {:?})", self.timeout);
        self.state = ConnectionState::Connecting {
            deadline: Deadline::new(self.timeout),
        };
    }

    /// Advance the attempt by `delta` and poll the connector once
    pub fn advance(&mut self, delta: Duration) -> Option<LinkEvent> {
        let ConnectionState::Connecting { deadline } = &mut self.state else {
            return None;
        };
        deadline.advance(delta);
        let expired = deadline.is_expired();

        let event = match self.connector.poll_connect() {
            ConnectPoll::Ready => LinkEvent::Connected,
            ConnectPoll::Failed(reason) => LinkEvent::FellBack(ViewerError::Unavailable(reason)),
            ConnectPoll::Pending if expired => LinkEvent::FellBack(ViewerError::Timeout(self.timeout)),
            ConnectPoll::Pending => return None,
        };

        match &event {
            LinkEvent::Connected => {
                log::info!("Viewer connected");
                self.state = ConnectionState::Connected;
            }
            LinkEvent::FellBack(error) => {
                log::warn!("{}; running in 2D mode", error);
                self.connector.disconnect();
                self.state = ConnectionState::Fallback2D(error.clone());
            }
        }
        Some(event)
    }

    /// Release the viewer and return to idle
    pub fn disconnect(&mut self) {
        if !matches!(self.state, ConnectionState::Idle) {
            self.connector.disconnect();
            log::info!("Viewer disconnected");
        }
        self.state = ConnectionState::Idle;
    }

    /// Current state
    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// Whether 3D placement is available
    pub fn is_connected(&self) -> bool {
        matches!(self.state, ConnectionState::Connected)
    }

    /// Whether the link has given up and entered 2D-only mode
    pub fn is_fallback(&self) -> bool {
        matches!(self.state, ConnectionState::Fallback2D(_))
    }

    /// Error that caused the fallback, if any
    pub fn error(&self) -> Option<&ViewerError> {
        match &self.state {
            ConnectionState::Fallback2D(error) => Some(error),
            _ => None,
        }
    }
}

impl std::fmt::Debug for ViewerLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewerLink")
            .field("timeout", &self.timeout)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
