// Keypair service
//
// The service answers either with a JSON object or with labeled plaintext
// lines (`PublicKey: ...`). Both are accepted; JSON is tried first.

use tracing::debug;

use crate::client::ProvisioningClient;
use crate::error::Error;
use crate::models::{KeysMethod, KeysPayload};

const PUBLIC_KEY_LABEL: &str = "PublicKey";
const PRIVATE_KEY_LABEL: &str = "PrivateKey";

impl ProvisioningClient {
    /// Fetch a fresh keypair.
    ///
    /// `POST` with an empty body or `GET`, depending on `ServiceUrls::keys_method`.
    pub async fn fetch_keys(&self) -> Result<KeysPayload, Error> {
        let url = self.urls().keys.clone();
        let request = match self.urls().keys_method {
            KeysMethod::Post => {
                debug!("POST {}", url);
                self.http().post(url)
            }
            KeysMethod::Get => {
                debug!("GET {}", url);
                self.http().get(url)
            }
        };

        let resp = self.send(request).await?;
        let body = self.read_body(resp).await?;
        parse_keys(&body)
    }
}

/// Parse a keys service body in either supported shape.
///
/// Fails when neither shape yields a keypair or either key is empty.
pub fn parse_keys(body: &str) -> Result<KeysPayload, Error> {
    let parsed = serde_json::from_str::<KeysPayload>(body)
        .ok()
        .or_else(|| parse_labeled(body))
        .ok_or_else(|| Error::KeyParse {
            reason: "body is neither a JSON keypair nor labeled text".into(),
        })?;

    let keys = KeysPayload {
        public_key: parsed.public_key.trim().to_owned(),
        private_key: parsed.private_key.trim().to_owned(),
    };

    if keys.public_key.is_empty() {
        return Err(Error::KeyParse {
            reason: "public key is empty".into(),
        });
    }
    if keys.private_key.is_empty() {
        return Err(Error::KeyParse {
            reason: "private key is empty".into(),
        });
    }

    Ok(keys)
}

fn parse_labeled(body: &str) -> Option<KeysPayload> {
    Some(KeysPayload {
        public_key: labeled_value(body, PUBLIC_KEY_LABEL)?,
        private_key: labeled_value(body, PRIVATE_KEY_LABEL)?,
    })
}

/// Value of the first `<label>: <value>` line in `body`.
fn labeled_value(body: &str, label: &str) -> Option<String> {
    body.lines().find_map(|line| {
        let rest = line.trim_start().strip_prefix(label)?.strip_prefix(':')?;
        Some(rest.trim().to_owned())
    })
}
