//! Firmware-update notification documents.
//!
//! The backend announces a new firmware as a small JSON document published on
//! the device's firmware-update topic. The session hands the raw bytes to
//! [`on_fw_update_notification`](crate::dispatch::EventHandler::on_fw_update_notification);
//! this module decodes them into a typed description the firmware can act on.

use serde::Deserialize;

use crate::error::Error;

/// A decoded firmware-update notification.
#[derive(Debug, Deserialize, PartialEq, Eq, Clone)]
pub struct FirmwareUpdate<'a> {
    /// The version of the announced firmware image.
    pub version: u32,
    /// The size of the firmware image in bytes.
    pub size: u32,
    /// The URL the firmware image can be downloaded from.
    pub url: &'a str,
    /// The CRC32 checksum of the firmware image.
    pub checksum: u32,
}

impl<'a> FirmwareUpdate<'a> {
    /// Decodes a firmware-update document received from the backend.
    ///
    /// Borrows the URL from the document buffer; no copies are made. A
    /// malformed document fails with [`Error::InvalidDocument`].
    pub fn from_document(document: &'a [u8]) -> Result<Self, Error> {
        let (update, _) =
            serde_json_core::from_slice(document).map_err(|_| Error::InvalidDocument)?;
        Ok(update)
    }
}
