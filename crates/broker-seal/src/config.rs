//! Startup configuration.

use serde::{Deserialize, Serialize};

use broker_seal_core::{CreateTimeZone, DEFAULT_SIGNATURE_FIELD};

use crate::error::{Result, SealError};

/// Entity name recorded in certificates when none is configured.
pub const DEFAULT_ENTITY: &str = "MOSQUITTO_MQTT_BROKER";

/// Option key for the certificate store connection target.
pub const OPT_CONNECTION: &str = "db_connection_string";
/// Option key for the certificate entity.
pub const OPT_ENTITY: &str = "entity";
/// Option key for the signature field name.
pub const OPT_SIGNATURE_FIELD: &str = "signature_field";
/// Option key for the create-time rendering zone.
pub const OPT_CREATE_TIME_ZONE: &str = "create_time_zone";

/// Configuration for the signing subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealConfig {
    /// Opaque connection target for the certificate store.
    pub connection_target: String,
    /// Identity recorded in the certificate.
    #[serde(default = "default_entity")]
    pub entity: String,
    /// Map key the signature is appended under.
    #[serde(default = "default_signature_field")]
    pub signature_field: String,
    /// Zone certificate creation times are rendered in.
    #[serde(default)]
    pub create_time_zone: CreateTimeZone,
}

fn default_entity() -> String {
    DEFAULT_ENTITY.to_string()
}

fn default_signature_field() -> String {
    DEFAULT_SIGNATURE_FIELD.to_string()
}

impl SealConfig {
    /// Defaults for everything except the connection target.
    pub fn new(connection_target: impl Into<String>) -> Self {
        Self {
            connection_target: connection_target.into(),
            entity: default_entity(),
            signature_field: default_signature_field(),
            create_time_zone: CreateTimeZone::default(),
        }
    }

    /// Build from a broker's key/value plugin options.
    ///
    /// Unknown keys are logged and ignored. Later duplicates win.
    pub fn from_options<I, K, V>(options: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut connection_target = None;
        let mut config = Self::new(String::new());

        for (key, value) in options {
            let (key, value) = (key.as_ref(), value.as_ref());
            match key {
                OPT_CONNECTION => connection_target = Some(value.to_string()),
                OPT_ENTITY => config.entity = value.to_string(),
                OPT_SIGNATURE_FIELD => config.signature_field = value.to_string(),
                OPT_CREATE_TIME_ZONE => {
                    config.create_time_zone = value
                        .parse()
                        .map_err(|e| SealError::Config(format!("{OPT_CREATE_TIME_ZONE}: {e}")))?;
                }
                unknown => {
                    tracing::warn!(key = unknown, "unexpected configuration key, ignoring it");
                }
            }
        }

        config.connection_target = connection_target
            .ok_or_else(|| SealError::Config(format!("{OPT_CONNECTION} is required")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject empty required fields.
    pub fn validate(&self) -> Result<()> {
        if self.connection_target.is_empty() {
            return Err(SealError::Config(format!("{OPT_CONNECTION} is empty")));
        }
        if self.entity.is_empty() {
            return Err(SealError::Config(format!("{OPT_ENTITY} is empty")));
        }
        if self.signature_field.is_empty() {
            return Err(SealError::Config(format!("{OPT_SIGNATURE_FIELD} is empty")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_options_defaults() {
        let config = SealConfig::from_options([(OPT_CONNECTION, "certs.db")]).unwrap();
        assert_eq!(config, SealConfig::new("certs.db"));
        assert_eq!(config.entity, DEFAULT_ENTITY);
        assert_eq!(config.signature_field, "VERIFICATION_TOKEN");
        assert_eq!(config.create_time_zone, CreateTimeZone::Local);
    }

    #[test]
    fn test_from_options_all_keys() {
        let config = SealConfig::from_options(vec![
            ("db_connection_string".to_string(), "certs.db".to_string()),
            ("entity".to_string(), "edge-7".to_string()),
            ("signature_field".to_string(), "SIG".to_string()),
            ("create_time_zone".to_string(), "utc".to_string()),
        ])
        .unwrap();

        assert_eq!(config.entity, "edge-7");
        assert_eq!(config.signature_field, "SIG");
        assert_eq!(config.create_time_zone, CreateTimeZone::Utc);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let config =
            SealConfig::from_options([(OPT_CONNECTION, "certs.db"), ("colour", "blue")]).unwrap();
        assert_eq!(config.connection_target, "certs.db");
    }

    #[test]
    fn test_missing_connection_rejected() {
        let err = SealConfig::from_options([(OPT_ENTITY, "edge")]).unwrap_err();
        assert!(matches!(err, SealError::Config(_)));
        assert_eq!(err.step(), "config");
    }

    #[test]
    fn test_empty_values_rejected() {
        assert!(SealConfig::from_options([(OPT_CONNECTION, "")]).is_err());
        assert!(SealConfig::from_options([(OPT_CONNECTION, "db"), (OPT_ENTITY, "")]).is_err());
        assert!(
            SealConfig::from_options([(OPT_CONNECTION, "db"), (OPT_SIGNATURE_FIELD, "")]).is_err()
        );
    }

    #[test]
    fn test_bad_zone_rejected() {
        let err = SealConfig::from_options([(OPT_CONNECTION, "db"), (OPT_CREATE_TIME_ZONE, "mars")])
            .unwrap_err();
        assert!(matches!(err, SealError::Config(_)));
    }

    #[test]
    fn test_json_config() {
        let config: SealConfig = serde_json::from_str(
            r#"{ "connection_target": ":memory:", "create_time_zone": "+01:00" }"#,
        )
        .unwrap();
        assert_eq!(config.entity, DEFAULT_ENTITY);
        assert_eq!(config.create_time_zone, "+01:00".parse().unwrap());

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""create_time_zone":"+01:00""#));
    }
}
