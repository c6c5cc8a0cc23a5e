//! # cloudlink - device connectivity SDK
//!
//! A Rust SDK that lets a constrained IoT device register with a backend
//! messaging service over MQTT, publish its state, and receive asynchronous
//! notifications (firmware updates, state changes, connection events)
//! through user-supplied callbacks. This library is designed for embedded
//! systems and supports `no_std` environments.
//!
//! ## Architecture
//!
//! The SDK is the connection lifecycle and message-dispatch engine; the MQTT
//! client stack itself is an external collaborator plugged in through the
//! [`Transport`](transport::Transport) trait:
//!
//! * [`settings`] — validated connection parameters and device identity
//! * [`transport`] — the transport seam, request-size enforcement and the
//!   bounded-backoff reconnection policy
//! * [`topics`] — deterministic per-device topic derivation and routing
//! * [`session`] — the state machine behind the public operations
//! * [`dispatch`] — firmware callbacks, isolated from transport internals
//! * [`fw`] — typed decoding of firmware-update notification documents
//!
//! ## Usage
//!
//! ```rust,no_run
//! use cloudlink::session::Session;
//! use cloudlink::settings::Settings;
//! use cloudlink::transport::{Adapter, Transport, TransportEvent};
//! use cloudlink::dispatch::EventHandler;
//! # use cloudlink::settings::Credentials;
//! # struct MqttStack;
//! # impl Transport for MqttStack {
//! #     type Error = ();
//! #     fn connect(&mut self, _h: &str, _p: u16, _c: &Credentials<'_>) -> Result<(), ()> { Ok(()) }
//! #     fn publish(&mut self, _t: &str, _p: &[u8]) -> Result<(), ()> { Ok(()) }
//! #     fn subscribe(&mut self, _t: &str) -> Result<(), ()> { Ok(()) }
//! #     fn disconnect(&mut self) -> Result<(), ()> { Ok(()) }
//! #     fn poll(&mut self) -> Result<TransportEvent, ()> { Ok(TransportEvent::None) }
//! # }
//! # struct Delay;
//! # impl embedded_hal::delay::DelayNs for Delay {
//! #     fn delay_ns(&mut self, _ns: u32) {}
//! # }
//!
//! struct Firmware;
//!
//! impl EventHandler for Firmware {
//!     fn on_connected(&mut self) { /* reset connection-dependent state */ }
//!     fn on_fw_update_notification(&mut self, _document: &[u8]) {
//!         // decode with cloudlink::fw::FirmwareUpdate::from_document
//!     }
//! }
//!
//! let settings = Settings {
//!     device_id: "dev-42",
//!     device_type: "rgb-light",
//!     host: "broker.example.com",
//!     port: 1883,
//!     username: "",
//!     password: "",
//! };
//!
//! let adapter = Adapter::new(MqttStack, Delay);
//! let mut session = Session::init(&settings, adapter, Firmware).unwrap();
//!
//! session.device_state_pub(br#"{"on":true}"#).unwrap();
//!
//! loop {
//!     session.poll().unwrap();
//! }
//! ```
//!
//! ## Optional Features
//!
//! - `std`: Enable standard library support (default: disabled)
//! - `defmt`: Enable defmt formatting support for embedded debugging
//! - `log`: Enable log-based diagnostics on the dispatch and reconnect paths

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

/// Maximum size in bytes of a published state document.
pub const DOCUMENT_MAX_SIZE: usize = 512;

/// Maximum size in bytes of any outbound request, including topic and
/// framing overhead.
pub const REQUEST_MAX_SIZE: usize = 1024;

/// Maximum size in bytes of a device identifier.
pub const DEVICE_ID_MAX_SIZE: usize = 32;

/// Success status sentinel used by backend response documents.
pub const STATUS_NO_ERROR: u16 = 200;

/// Common error type for connectivity operations.
pub mod error;

/// Connection settings and their validation.
pub mod settings;

/// Per-device topic derivation and inbound routing.
pub mod topics;

/// The transport seam and the reconnection policy.
pub mod transport;

/// Firmware notification callbacks and their dispatch.
pub mod dispatch;

/// The session state machine and the public device operations.
pub mod session;

/// Typed firmware-update notification documents.
pub mod fw;

pub use error::Error;
pub use session::{Session, State};
pub use settings::Settings;
