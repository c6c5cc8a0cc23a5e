//! Common error type for connectivity operations

/// A common error type for connectivity operations.
///
/// Every fallible public operation returns this enum; `Ok(())` signals
/// success. All transport-specific failures are converted into [`Error::Mqtt`]
/// at the session boundary so that no transport error type reaches firmware
/// code. It is designed to be simple and portable for `no_std` environments.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// An MQTT-level failure: the transport could not connect, publish or
    /// subscribe, or an operation was attempted while the session is not
    /// connected.
    Mqtt,
    /// A session has already been initialized in this process.
    AlreadyInit,
    /// The supplied settings are malformed or exceed a size limit.
    InvalidSettings,
    /// A bounded buffer ran out of capacity.
    NoMemory,
    /// A notification document could not be decoded.
    InvalidDocument,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::Mqtt => defmt::write!(f, "Mqtt"),
            Error::AlreadyInit => defmt::write!(f, "AlreadyInit"),
            Error::InvalidSettings => defmt::write!(f, "InvalidSettings"),
            Error::NoMemory => defmt::write!(f, "NoMemory"),
            Error::InvalidDocument => defmt::write!(f, "InvalidDocument"),
        }
    }
}
