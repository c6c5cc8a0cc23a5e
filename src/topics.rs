//! Topic derivation and routing.
//!
//! Topic names are part of the wire contract with the backend: every topic is
//! derived deterministically from the device identifier so that no two
//! devices collide, and the construction must match the backend scheme
//! bit-for-bit. The scheme is `devices/<device_id>/<suffix>`.

use heapless::String;

use crate::error::Error;

/// Maximum length of a derived topic string in bytes.
pub const TOPIC_MAX_SIZE: usize = 128;

/// Namespace every device topic lives under.
const TOPIC_PREFIX: &str = "devices/";
/// Suffix of the topic the device publishes its state documents on.
const STATE_SUFFIX: &str = "/state";
/// Suffix of the topic firmware-update notifications arrive on.
const FW_UPDATE_SUFFIX: &str = "/firmware-update";
/// Suffix of the topic state-changed notifications arrive on.
const STATE_CHANGED_SUFFIX: &str = "/state-changed";
/// Suffix of the topic firmware-availability queries are published on.
const FW_UPDATE_REQUEST_SUFFIX: &str = "/firmware-update/request";

/// The action to take for an inbound message.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DispatchAction {
    /// Invoke the firmware-update notification callback.
    FwUpdate,
    /// Invoke the device-state-changed notification callback.
    DeviceStateChanged,
    /// The topic is not one of ours, drop the message silently.
    Ignore,
}

#[cfg(feature = "defmt")]
impl defmt::Format for DispatchAction {
    fn format(&self, f: defmt::Formatter) {
        match self {
            DispatchAction::FwUpdate => defmt::write!(f, "FwUpdate"),
            DispatchAction::DeviceStateChanged => defmt::write!(f, "DeviceStateChanged"),
            DispatchAction::Ignore => defmt::write!(f, "Ignore"),
        }
    }
}

/// The set of topics a device talks to the backend on.
///
/// Derived once from the device identifier at session initialization and
/// never mutated afterwards.
#[derive(Debug, Clone)]
pub struct TopicSet {
    state: String<TOPIC_MAX_SIZE>,
    fw_update: String<TOPIC_MAX_SIZE>,
    state_changed: String<TOPIC_MAX_SIZE>,
    fw_update_request: String<TOPIC_MAX_SIZE>,
}

impl TopicSet {
    /// Derives the topic set for a device identifier.
    ///
    /// Pure and deterministic: the same identifier always yields the same
    /// topics. Fails with [`Error::NoMemory`] if a derived topic would exceed
    /// [`TOPIC_MAX_SIZE`].
    pub fn for_device(device_id: &str) -> Result<Self, Error> {
        Ok(Self {
            state: derive(device_id, STATE_SUFFIX)?,
            fw_update: derive(device_id, FW_UPDATE_SUFFIX)?,
            state_changed: derive(device_id, STATE_CHANGED_SUFFIX)?,
            fw_update_request: derive(device_id, FW_UPDATE_REQUEST_SUFFIX)?,
        })
    }

    /// Topic the device publishes its state documents on.
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Topic firmware-update notifications arrive on.
    pub fn fw_update(&self) -> &str {
        &self.fw_update
    }

    /// Topic state-changed notifications arrive on.
    pub fn state_changed(&self) -> &str {
        &self.state_changed
    }

    /// Topic firmware-availability queries are published on.
    pub fn fw_update_request(&self) -> &str {
        &self.fw_update_request
    }

    /// The topics the session subscribes to after connecting.
    pub fn subscriptions(&self) -> [&str; 2] {
        [&self.fw_update, &self.state_changed]
    }

    /// Matches an incoming topic against the known notification topics.
    ///
    /// Unknown topics yield [`DispatchAction::Ignore`]; routing never fails.
    pub fn route(&self, incoming_topic: &str) -> DispatchAction {
        if incoming_topic == self.fw_update {
            DispatchAction::FwUpdate
        } else if incoming_topic == self.state_changed {
            DispatchAction::DeviceStateChanged
        } else {
            DispatchAction::Ignore
        }
    }
}

fn derive(device_id: &str, suffix: &str) -> Result<String<TOPIC_MAX_SIZE>, Error> {
    let mut topic = String::new();
    topic.push_str(TOPIC_PREFIX).map_err(|_| Error::NoMemory)?;
    topic.push_str(device_id).map_err(|_| Error::NoMemory)?;
    topic.push_str(suffix).map_err(|_| Error::NoMemory)?;
    Ok(topic)
}
