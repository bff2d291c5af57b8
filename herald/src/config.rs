/// What a broadcaster does when a listener is added under an event type
/// that already has listeners.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum RegistrationPolicy {
    /// Append to the existing listeners. Any number of listeners per event type.
    #[default]
    Append,

    /// Refuse (`add_listener` returns `false`) once an event type has a listener.
    /// At most one listener per event type.
    RejectExisting,
}

/// Configuration of a [`GenericBroadcaster`](crate::GenericBroadcaster).
///
/// Use the builder methods to customize, or [`Default`] for the usual
/// append-only, open-for-registration behavior.
///
/// # Examples
///
/// ```rust
/// use herald::{Config, GenericBroadcaster, RegistrationPolicy};
///
/// let config = Config::default()
///     .with_registration(RegistrationPolicy::RejectExisting);
/// let broadcaster = GenericBroadcaster::with_config(config);
/// assert!(!broadcaster.is_frozen());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Config {
    /// Behavior when the event type already has listeners.
    /// Default: [`RegistrationPolicy::Append`]
    pub registration: RegistrationPolicy,
}

impl Config {
    pub fn with_registration(mut self, policy: RegistrationPolicy) -> Self {
        self.registration = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_appends() {
        let config = Config::default();
        assert_eq!(config.registration, RegistrationPolicy::Append);
    }

    #[test]
    fn test_builder() {
        let config = Config::default().with_registration(RegistrationPolicy::RejectExisting);
        assert_eq!(config.registration, RegistrationPolicy::RejectExisting);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_config() {
        let config: Config = serde_json::from_str(r#"{"registration":"reject_existing"}"#).unwrap();
        assert_eq!(config.registration, RegistrationPolicy::RejectExisting);

        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }
}
