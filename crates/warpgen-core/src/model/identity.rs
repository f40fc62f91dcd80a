// ── Synthetic device identity ──
//
// Registration services expect a mobile install: an install id, a push
// token derived from it, a terms-of-service timestamp, and device facts.
// A fresh identity is generated for every attempt and never stored.

use chrono::{DateTime, SecondsFormat, Utc};
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};

use warpgen_api::RegisterRequest;

pub const INSTALL_ID_LEN: usize = 22;
pub const FCM_TOKEN_SUFFIX_LEN: usize = 134;
const FCM_TOKEN_PREFIX: &str = ":APA91b";

/// Device facts reported on registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSettings {
    pub model: String,
    pub locale: String,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            model: "PC".into(),
            locale: "de_DE".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    pub install_id: String,
    pub fcm_token: String,
    pub timestamp_utc: DateTime<Utc>,
    pub model: String,
    pub serial_number: String,
    pub locale: String,
}

impl DeviceIdentity {
    /// Generate a fresh identity stamped with the current time.
    pub fn generate(settings: &DeviceSettings) -> Self {
        Self::generate_with(&mut rand::thread_rng(), Utc::now(), settings)
    }

    /// Generate an identity from an explicit random source and clock.
    pub fn generate_with<R: Rng + ?Sized>(
        rng: &mut R,
        now: DateTime<Utc>,
        settings: &DeviceSettings,
    ) -> Self {
        let install_id = random_alphanumeric(rng, INSTALL_ID_LEN);
        let fcm_token = format!(
            "{install_id}{FCM_TOKEN_PREFIX}{}",
            random_alphanumeric(rng, FCM_TOKEN_SUFFIX_LEN)
        );

        Self {
            serial_number: install_id.clone(),
            install_id,
            fcm_token,
            timestamp_utc: now,
            model: settings.model.clone(),
            locale: settings.locale.clone(),
        }
    }

    /// `tos` field value: RFC 3339, millisecond precision, `Z` suffix.
    pub fn tos(&self) -> String {
        self.timestamp_utc.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Registration body for `public_key` with this identity.
    pub fn to_request(&self, public_key: &str) -> RegisterRequest {
        RegisterRequest {
            key: public_key.to_owned(),
            install_id: self.install_id.clone(),
            fcm_token: self.fcm_token.clone(),
            tos: self.tos(),
            model: self.model.clone(),
            serial_number: self.serial_number.clone(),
            locale: self.locale.clone(),
        }
    }
}

fn random_alphanumeric<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
