//! Connection settings and validation.
//!
//! [`Settings`] carries everything the device firmware must provide before a
//! session can be established: the device identity, the broker address and
//! the credentials. Validation produces an owned [`ValidatedSettings`] copy
//! backed by fixed-size buffers; the copy is immutable for the lifetime of
//! the session.
//!
//! Notification callbacks are not part of this structure. They are supplied
//! as an [`EventHandler`](crate::dispatch::EventHandler) implementation when
//! the session is initialized.

use heapless::String;

use crate::DEVICE_ID_MAX_SIZE;
use crate::error::Error;

/// Maximum length of the broker host name in bytes.
pub const HOST_MAX_SIZE: usize = 64;

/// Maximum length of the device type string in bytes.
pub const DEVICE_TYPE_MAX_SIZE: usize = 64;

/// Maximum length of a username or password in bytes.
pub const CREDENTIAL_MAX_SIZE: usize = 64;

/// Connection parameters supplied by the device firmware.
///
/// All fields borrow from the caller; [`Settings::validate`] copies them into
/// bounded owned storage. Empty `username` and `password` select anonymous
/// authentication.
#[derive(Debug, Clone)]
pub struct Settings<'a> {
    /// Unique identity of this device, at most [`DEVICE_ID_MAX_SIZE`] bytes.
    pub device_id: &'a str,
    /// Descriptive device type, e.g. `"rgb-light"`.
    pub device_type: &'a str,
    /// Host name or address of the broker.
    pub host: &'a str,
    /// TCP port of the broker.
    pub port: u16,
    /// Username for broker authentication, may be empty.
    pub username: &'a str,
    /// Password for broker authentication, may be empty.
    pub password: &'a str,
}

/// Broker credentials borrowed from a [`ValidatedSettings`].
#[derive(Debug, Clone, Copy)]
pub struct Credentials<'a> {
    /// Username, empty for anonymous authentication.
    pub username: &'a str,
    /// Password, empty for anonymous authentication.
    pub password: &'a str,
}

impl Credentials<'_> {
    /// Returns `true` when both username and password are empty.
    pub fn is_anonymous(&self) -> bool {
        self.username.is_empty() && self.password.is_empty()
    }
}

/// Validated, owned connection parameters.
///
/// Produced by [`Settings::validate`] and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSettings {
    device_id: String<DEVICE_ID_MAX_SIZE>,
    device_type: String<DEVICE_TYPE_MAX_SIZE>,
    host: String<HOST_MAX_SIZE>,
    port: u16,
    username: String<CREDENTIAL_MAX_SIZE>,
    password: String<CREDENTIAL_MAX_SIZE>,
}

impl ValidatedSettings {
    /// The validated device identifier.
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// The validated device type.
    pub fn device_type(&self) -> &str {
        &self.device_type
    }

    /// The broker host name.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The broker port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// The broker credentials.
    pub fn credentials(&self) -> Credentials<'_> {
        Credentials {
            username: &self.username,
            password: &self.password,
        }
    }
}

impl Settings<'_> {
    /// Validates the settings and copies them into owned storage.
    ///
    /// Checks performed:
    ///
    /// * `device_id` is non-empty and at most [`DEVICE_ID_MAX_SIZE`] bytes
    /// * `host` is non-empty and at most [`HOST_MAX_SIZE`] bytes
    /// * `port` is non-zero
    /// * `device_type` and both credentials fit their buffers
    ///
    /// Oversized fields are a validation failure, never a truncation. This
    /// function has no side effects.
    pub fn validate(&self) -> Result<ValidatedSettings, Error> {
        if self.device_id.is_empty() || self.host.is_empty() || self.port == 0 {
            return Err(Error::InvalidSettings);
        }

        Ok(ValidatedSettings {
            device_id: String::try_from(self.device_id).map_err(|_| Error::InvalidSettings)?,
            device_type: String::try_from(self.device_type).map_err(|_| Error::InvalidSettings)?,
            host: String::try_from(self.host).map_err(|_| Error::InvalidSettings)?,
            port: self.port,
            username: String::try_from(self.username).map_err(|_| Error::InvalidSettings)?,
            password: String::try_from(self.password).map_err(|_| Error::InvalidSettings)?,
        })
    }
}
