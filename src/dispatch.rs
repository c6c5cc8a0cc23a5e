//! Callback dispatch for inbound notifications.
//!
//! The dispatcher sits between the transport and firmware code: it resolves
//! each inbound message to a [`DispatchAction`] through the topic router and
//! invokes the matching [`EventHandler`] method with the raw document.
//! Handler methods return `()` so no firmware failure can propagate back into
//! the transport layer and tear down the connection. Messages are dispatched
//! one at a time in arrival order; callbacks run on the polling context and
//! must be fast by contract.

use crate::topics::{DispatchAction, TopicSet};
use crate::transport::InboundMessage;

/// Notification callbacks implemented by the device firmware.
///
/// Every method has a default no-op body, so firmware implements only the
/// notifications it cares about; an absent callback is simply skipped.
pub trait EventHandler {
    /// Invoked after every successful connection establishment, including
    /// reconnections. Firmware should reset any connection-dependent state
    /// here.
    fn on_connected(&mut self) {}

    /// A firmware-update notification arrived. The document can be decoded
    /// with [`FirmwareUpdate::from_document`](crate::fw::FirmwareUpdate::from_document).
    fn on_fw_update_notification(&mut self, _document: &[u8]) {}

    /// The backend changed this device's state document.
    fn on_device_state_changed_notification(&mut self, _document: &[u8]) {}
}

/// An [`EventHandler`] that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHandler;

impl EventHandler for NoopHandler {}

/// Routes one inbound message and invokes the matching callback.
pub(crate) fn dispatch<H: EventHandler>(
    topics: &TopicSet,
    message: &InboundMessage,
    handler: &mut H,
) {
    match topics.route(&message.topic) {
        DispatchAction::FwUpdate => handler.on_fw_update_notification(&message.payload),
        DispatchAction::DeviceStateChanged => {
            handler.on_device_state_changed_notification(&message.payload)
        }
        DispatchAction::Ignore => {
            #[cfg(feature = "log")]
            log::debug!("ignoring message on unknown topic {}", message.topic);
        }
    }
}
