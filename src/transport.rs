//! Transport abstraction and adapter.
//!
//! The MQTT wire protocol, TLS and keep-alive all live behind the
//! [`Transport`] trait; any client stack exposing connect/publish/subscribe
//! primitives can be plugged in. The [`Adapter`] wraps an implementation and
//! adds what the session relies on: outbound request size enforcement,
//! connection-state tracking and the bounded-backoff reconnection policy.
//! Delays between reconnection attempts go through
//! [`embedded_hal::delay::DelayNs`] so the adapter stays platform agnostic.

use embedded_hal::delay::DelayNs;
use heapless::{String, Vec};

use crate::error::Error;
use crate::settings::{Credentials, ValidatedSettings};
use crate::topics::TOPIC_MAX_SIZE;
use crate::{DOCUMENT_MAX_SIZE, REQUEST_MAX_SIZE};

/// Framing overhead budgeted for an outbound frame on top of topic and
/// payload bytes: a 5-byte fixed header plus the 2-byte topic length prefix.
const FRAME_OVERHEAD: usize = 7;

/// An inbound broker message.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct InboundMessage {
    /// The topic the message was published on.
    pub topic: String<TOPIC_MAX_SIZE>,
    /// The opaque document payload.
    pub payload: Vec<u8, DOCUMENT_MAX_SIZE>,
}

/// What the transport reported when polled.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum TransportEvent {
    /// Nothing happened.
    None,
    /// A message arrived on a subscribed topic.
    Message(InboundMessage),
    /// The connection to the broker was lost.
    Disconnected,
}

/// The external MQTT client this SDK sits on.
///
/// Implementations own the socket, the MQTT framing and the keep-alive
/// machinery. The associated error type never crosses the session boundary;
/// the [`Adapter`] converts every failure into [`Error::Mqtt`].
pub trait Transport {
    /// Transport-specific error type.
    type Error: core::fmt::Debug;

    /// Opens a connection to the broker and authenticates.
    fn connect(
        &mut self,
        host: &str,
        port: u16,
        credentials: &Credentials<'_>,
    ) -> Result<(), Self::Error>;

    /// Publishes a payload on a topic, blocking until the send is
    /// acknowledged by the transport or fails.
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), Self::Error>;

    /// Subscribes to a topic.
    fn subscribe(&mut self, topic: &str) -> Result<(), Self::Error>;

    /// Closes the connection.
    fn disconnect(&mut self) -> Result<(), Self::Error>;

    /// Polls for the next transport event without blocking.
    fn poll(&mut self) -> Result<TransportEvent, Self::Error>;
}

/// Reconnection backoff parameters.
///
/// The delay before attempt `n` is `base_delay_ms << n`, capped at
/// `max_delay_ms`; after `max_attempts` failed attempts the reconnect is
/// abandoned.
#[derive(Debug, Clone, Copy)]
pub struct ReconnectPolicy {
    /// Number of reconnection attempts before giving up.
    pub max_attempts: u32,
    /// Delay before the first attempt in milliseconds.
    pub base_delay_ms: u32,
    /// Ceiling for the backoff delay in milliseconds.
    pub max_delay_ms: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_ms: 250,
            max_delay_ms: 8_000,
        }
    }
}

impl ReconnectPolicy {
    /// The delay in milliseconds before the given attempt, zero-indexed.
    pub fn delay_ms(&self, attempt: u32) -> u32 {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base_delay_ms
            .saturating_mul(factor)
            .min(self.max_delay_ms)
    }
}

/// Wraps a [`Transport`] and owns the live connection state.
///
/// At most one connection is active at a time; the adapter is consumed by
/// [`Session::init`](crate::session::Session::init), which gives the session
/// exclusive ownership of the connection handle.
pub struct Adapter<T: Transport, D: DelayNs> {
    transport: T,
    delay: D,
    policy: ReconnectPolicy,
    connected: bool,
}

impl<T: Transport, D: DelayNs> core::fmt::Debug for Adapter<T, D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Adapter")
            .field("connected", &self.connected)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl<T: Transport, D: DelayNs> Adapter<T, D> {
    /// Creates an adapter with the default reconnection policy.
    pub fn new(transport: T, delay: D) -> Self {
        Self::with_policy(transport, delay, ReconnectPolicy::default())
    }

    /// Creates an adapter with a caller-supplied reconnection policy.
    pub fn with_policy(transport: T, delay: D, policy: ReconnectPolicy) -> Self {
        Self {
            transport,
            delay,
            policy,
            connected: false,
        }
    }

    /// Whether the adapter currently holds a live connection.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Connects to the broker with the validated settings.
    pub fn connect(&mut self, settings: &ValidatedSettings) -> Result<(), Error> {
        self.transport
            .connect(settings.host(), settings.port(), &settings.credentials())
            .map_err(|_| Error::Mqtt)?;
        self.connected = true;
        Ok(())
    }

    /// Publishes a payload, enforcing the outbound request bound.
    ///
    /// The frame size check counts topic, payload and framing overhead
    /// against [`REQUEST_MAX_SIZE`] before any transport activity. A
    /// transport failure marks the connection as lost.
    pub fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), Error> {
        if !self.connected {
            return Err(Error::Mqtt);
        }
        if topic.len() + payload.len() + FRAME_OVERHEAD > REQUEST_MAX_SIZE {
            return Err(Error::Mqtt);
        }
        match self.transport.publish(topic, payload) {
            Ok(()) => Ok(()),
            Err(_e) => {
                #[cfg(feature = "log")]
                log::warn!("publish failed on {}: {:?}", topic, _e);
                self.connected = false;
                Err(Error::Mqtt)
            }
        }
    }

    /// Subscribes to a topic, with the same request bound as publishes.
    pub fn subscribe(&mut self, topic: &str) -> Result<(), Error> {
        if !self.connected {
            return Err(Error::Mqtt);
        }
        if topic.len() + FRAME_OVERHEAD > REQUEST_MAX_SIZE {
            return Err(Error::Mqtt);
        }
        match self.transport.subscribe(topic) {
            Ok(()) => Ok(()),
            Err(_e) => {
                #[cfg(feature = "log")]
                log::warn!("subscribe failed on {}: {:?}", topic, _e);
                self.connected = false;
                Err(Error::Mqtt)
            }
        }
    }

    /// Polls the transport for the next event.
    ///
    /// A transport error while polling is reported as a disconnect so the
    /// session always observes the connection loss through a single path.
    pub fn poll(&mut self) -> Result<TransportEvent, Error> {
        if !self.connected {
            return Ok(TransportEvent::Disconnected);
        }
        match self.transport.poll() {
            Ok(TransportEvent::Disconnected) => {
                self.connected = false;
                Ok(TransportEvent::Disconnected)
            }
            Ok(event) => Ok(event),
            Err(_e) => {
                #[cfg(feature = "log")]
                log::warn!("transport poll failed: {:?}", _e);
                self.connected = false;
                Ok(TransportEvent::Disconnected)
            }
        }
    }

    /// Re-establishes a lost connection with bounded exponential backoff.
    ///
    /// Sleeps `policy.delay_ms(attempt)` before each attempt. Returns
    /// [`Error::Mqtt`] once the attempt budget is exhausted.
    pub fn reconnect(&mut self, settings: &ValidatedSettings) -> Result<(), Error> {
        for attempt in 0..self.policy.max_attempts {
            self.delay.delay_ms(self.policy.delay_ms(attempt));
            #[cfg(feature = "log")]
            log::debug!("reconnect attempt {}", attempt + 1);
            if self.connect(settings).is_ok() {
                return Ok(());
            }
        }
        Err(Error::Mqtt)
    }

    /// Closes the connection.
    pub fn disconnect(&mut self) -> Result<(), Error> {
        let result = self.transport.disconnect().map_err(|_| Error::Mqtt);
        self.connected = false;
        result
    }
}
