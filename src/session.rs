//! Session lifecycle and the public device operations.
//!
//! A [`Session`] is the single connectivity context of a device process. It
//! is created by [`Session::init`] and moves through the following states:
//!
//! * `Connecting`: the broker connection is being established.
//! * `Connected`: subscriptions are in place, publishes are accepted.
//! * `Reconnecting`: the connection was lost and the bounded backoff
//!   reconnect is in progress.
//! * `Disconnected`: the reconnect budget is exhausted; the session stays
//!   unusable until the process restarts.
//! * `Terminated`: [`Session::disconnect`] was called.
//!
//! Before `init` succeeds no session value exists, which is the
//! uninitialized state. A process-wide check-and-set guard ensures at most
//! one live session; a second `init` fails with [`Error::AlreadyInit`] and
//! leaves the first session untouched.
//!
//! All mutating operations take `&mut self`, so the connection handle and the
//! state field are mutated under exclusive access by construction. Contexts
//! that share a session (a network-receive task and the main control loop)
//! do so through an external lock, which serializes publishes
//! deterministically.

use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::delay::DelayNs;

use crate::DOCUMENT_MAX_SIZE;
use crate::dispatch::{self, EventHandler};
use crate::error::Error;
use crate::settings::{Settings, ValidatedSettings};
use crate::topics::TopicSet;
use crate::transport::{Adapter, Transport, TransportEvent};

/// Set while a session is alive anywhere in the process.
static SESSION_LIVE: AtomicBool = AtomicBool::new(false);

/// Lifecycle state of a [`Session`].
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum State {
    /// The broker connection is being established.
    Connecting,
    /// Connected and subscribed; publishes are accepted.
    Connected,
    /// The connection was lost; reconnection is in progress.
    Reconnecting,
    /// Reconnection is exhausted; terminal until process restart.
    Disconnected,
    /// The session was shut down by the firmware.
    Terminated,
}

#[cfg(feature = "defmt")]
impl defmt::Format for State {
    fn format(&self, f: defmt::Formatter) {
        match self {
            State::Connecting => defmt::write!(f, "Connecting"),
            State::Connected => defmt::write!(f, "Connected"),
            State::Reconnecting => defmt::write!(f, "Reconnecting"),
            State::Disconnected => defmt::write!(f, "Disconnected"),
            State::Terminated => defmt::write!(f, "Terminated"),
        }
    }
}

/// The single active connectivity context of a device process.
///
/// Owns the live connection handle exclusively and holds the validated
/// settings, the derived topic set and the firmware's [`EventHandler`].
pub struct Session<T: Transport, D: DelayNs, H: EventHandler> {
    state: State,
    settings: ValidatedSettings,
    topics: TopicSet,
    adapter: Adapter<T, D>,
    handler: H,
}

impl<T: Transport, D: DelayNs, H: EventHandler> core::fmt::Debug for Session<T, D, H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("device_id", &self.device_id())
            .finish_non_exhaustive()
    }
}

impl<T: Transport, D: DelayNs, H: EventHandler> Session<T, D, H> {
    /// Initializes the session: validates the settings, connects to the
    /// broker, subscribes to the notification topics and fires
    /// [`EventHandler::on_connected`].
    ///
    /// Fails with [`Error::AlreadyInit`] while another session is alive.
    /// Validation failures ([`Error::InvalidSettings`]) and transport
    /// failures ([`Error::Mqtt`]) release the guard again so the firmware
    /// can retry `init` with a fresh transport.
    pub fn init(settings: &Settings<'_>, adapter: Adapter<T, D>, handler: H) -> Result<Self, Error> {
        if SESSION_LIVE
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(Error::AlreadyInit);
        }

        match Self::establish(settings, adapter, handler) {
            Ok(session) => Ok(session),
            Err(e) => {
                SESSION_LIVE.store(false, Ordering::Release);
                Err(e)
            }
        }
    }

    fn establish(
        settings: &Settings<'_>,
        mut adapter: Adapter<T, D>,
        mut handler: H,
    ) -> Result<Self, Error> {
        let settings = settings.validate()?;
        let topics = TopicSet::for_device(settings.device_id())?;

        adapter.connect(&settings)?;
        for topic in topics.subscriptions() {
            adapter.subscribe(topic)?;
        }

        #[cfg(feature = "log")]
        log::info!("connected to {}:{}", settings.host(), settings.port());

        handler.on_connected();

        Ok(Self {
            state: State::Connected,
            settings,
            topics,
            adapter,
            handler,
        })
    }

    /// Publishes a device state document on the device's state topic.
    ///
    /// Blocks until the transport acknowledges the send or fails; exactly one
    /// delivery attempt is made per call, no queueing. Fails with
    /// [`Error::Mqtt`] when the session is not connected or when the document
    /// exceeds [`DOCUMENT_MAX_SIZE`] (in which case no transport activity
    /// happens). A transport failure moves the session to `Reconnecting`.
    pub fn device_state_pub(&mut self, document: &[u8]) -> Result<(), Error> {
        if self.state != State::Connected {
            return Err(Error::Mqtt);
        }
        if document.len() > DOCUMENT_MAX_SIZE {
            return Err(Error::Mqtt);
        }

        match self.adapter.publish(self.topics.state(), document) {
            Ok(()) => Ok(()),
            Err(e) => {
                if !self.adapter.is_connected() {
                    self.state = State::Reconnecting;
                }
                Err(e)
            }
        }
    }

    /// Publishes a firmware-availability query document.
    ///
    /// The backend answers with a notification on the firmware-update topic.
    /// Same state and size rules as [`Session::device_state_pub`].
    pub fn fw_update_query(&mut self, query: &[u8]) -> Result<(), Error> {
        if self.state != State::Connected {
            return Err(Error::Mqtt);
        }
        if query.len() > DOCUMENT_MAX_SIZE {
            return Err(Error::Mqtt);
        }

        match self.adapter.publish(self.topics.fw_update_request(), query) {
            Ok(()) => Ok(()),
            Err(e) => {
                if !self.adapter.is_connected() {
                    self.state = State::Reconnecting;
                }
                Err(e)
            }
        }
    }

    /// The identifier this device registered with.
    ///
    /// Pure accessor with no failure mode; a session always carries the
    /// validated identity it was initialized with.
    pub fn device_id(&self) -> &str {
        self.settings.device_id()
    }

    /// The current lifecycle state.
    pub fn state(&self) -> State {
        self.state
    }

    /// The topic set derived from this device's identifier.
    pub fn topics(&self) -> &TopicSet {
        &self.topics
    }

    /// Drives inbound dispatch and connection recovery.
    ///
    /// Drains at most one transport event per call. Messages are routed to
    /// the firmware callbacks in arrival order. A connection loss triggers
    /// the bounded backoff reconnect: on success the notification topics are
    /// re-subscribed and [`EventHandler::on_connected`] fires again; on
    /// exhaustion the session becomes `Disconnected` and the call fails with
    /// [`Error::Mqtt`].
    pub fn poll(&mut self) -> Result<(), Error> {
        if self.state == State::Disconnected || self.state == State::Terminated {
            return Err(Error::Mqtt);
        }

        match self.adapter.poll()? {
            TransportEvent::None => Ok(()),
            TransportEvent::Message(message) => {
                dispatch::dispatch(&self.topics, &message, &mut self.handler);
                Ok(())
            }
            TransportEvent::Disconnected => {
                self.state = State::Reconnecting;
                self.recover()
            }
        }
    }

    fn recover(&mut self) -> Result<(), Error> {
        #[cfg(feature = "log")]
        log::warn!("connection lost, reconnecting");

        if self.adapter.reconnect(&self.settings).is_err() {
            self.state = State::Disconnected;
            return Err(Error::Mqtt);
        }

        for topic in self.topics.subscriptions() {
            if self.adapter.subscribe(topic).is_err() {
                // Subscription failure right after a reconnect counts as a
                // fresh connection loss; the next poll starts a new backoff
                // cycle.
                return Err(Error::Mqtt);
            }
        }

        self.handler.on_connected();
        self.state = State::Connected;
        Ok(())
    }

    /// Shuts the session down.
    ///
    /// Disconnects the transport and moves the session to `Terminated`;
    /// afterwards every operation except [`Session::device_id`] fails with
    /// [`Error::Mqtt`].
    pub fn disconnect(&mut self) -> Result<(), Error> {
        let result = self.adapter.disconnect();
        self.state = State::Terminated;
        result
    }
}

impl<T: Transport, D: DelayNs, H: EventHandler> Drop for Session<T, D, H> {
    fn drop(&mut self) {
        SESSION_LIVE.store(false, Ordering::Release);
    }
}
