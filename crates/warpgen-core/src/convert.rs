// ── API-to-domain type conversions ──
//
// Bridges raw `warpgen_api` responses into canonical domain types. Each
// registration schema gets its own normalization path; anything missing
// or unparseable becomes a registration failure here, at the boundary.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use tracing::warn;

use warpgen_api::models::{FlatRegistration, WrappedRegistration};
use warpgen_api::{EndpointList, KeysPayload, RegistrationResponse};

use crate::error::CoreError;
use crate::model::{EndpointDirectory, Keypair, RegistrationResult};

// ── Keys ─────────────────────────────────────────────────────────────

impl TryFrom<KeysPayload> for Keypair {
    type Error = CoreError;

    fn try_from(p: KeysPayload) -> Result<Self, Self::Error> {
        Keypair::new(p.public_key, p.private_key)
    }
}

// ── Endpoint directory ───────────────────────────────────────────────

impl From<EndpointList> for EndpointDirectory {
    fn from(list: EndpointList) -> Self {
        EndpointDirectory::from_untrusted(list.ipv4, list.ipv6)
    }
}

// ── Registration ─────────────────────────────────────────────────────

impl TryFrom<RegistrationResponse> for RegistrationResult {
    type Error = CoreError;

    fn try_from(resp: RegistrationResponse) -> Result<Self, Self::Error> {
        match resp {
            RegistrationResponse::Flat(flat) => from_flat(flat),
            RegistrationResponse::Wrapped(wrapped) => from_wrapped(wrapped),
        }
    }
}

fn from_flat(flat: FlatRegistration) -> Result<RegistrationResult, CoreError> {
    let config = flat.config;
    let peer = config
        .peers
        .into_iter()
        .next()
        .ok_or_else(|| CoreError::malformed_registration("response lists no peers"))?;

    let ipv4 = parse_v4(&config.interface.addresses.v4)?;
    let ipv6 = parse_v6(&config.interface.addresses.v6)?;

    Ok(RegistrationResult {
        public_key: flat.key,
        peer_public_key: peer.public_key,
        ipv4,
        ipv6,
        client_id: config.client_id,
        dns: parse_dns(&config.dns),
    })
}

fn from_wrapped(wrapped: WrappedRegistration) -> Result<RegistrationResult, CoreError> {
    if !wrapped.success {
        return Err(CoreError::Registration {
            reason: wrapped
                .message
                .unwrap_or_else(|| "service reported success=false".into()),
            status: None,
            transient: false,
        });
    }

    let data = wrapped
        .data
        .ok_or_else(|| CoreError::malformed_registration("success response without data"))?;

    let addresses: Vec<IpAddr> = data
        .allowed_ips
        .iter()
        .filter_map(|raw| strip_prefix_len(raw).parse().ok())
        .collect();

    let ipv4 = addresses
        .iter()
        .find_map(|ip| match ip {
            IpAddr::V4(v4) => Some(*v4),
            IpAddr::V6(_) => None,
        })
        .ok_or_else(|| CoreError::malformed_registration("allowed_ips has no IPv4 address"))?;
    let ipv6 = addresses
        .iter()
        .find_map(|ip| match ip {
            IpAddr::V6(v6) => Some(*v6),
            IpAddr::V4(_) => None,
        })
        .ok_or_else(|| CoreError::malformed_registration("allowed_ips has no IPv6 address"))?;

    Ok(RegistrationResult {
        public_key: data.key,
        peer_public_key: data.peer_public_key,
        ipv4,
        ipv6,
        client_id: data.client_id,
        dns: parse_dns(&data.dns),
    })
}

/// `"10.0.0.2/32"` → `"10.0.0.2"`.
fn strip_prefix_len(raw: &str) -> &str {
    raw.trim().split('/').next().unwrap_or_default()
}

fn parse_v4(raw: &str) -> Result<Ipv4Addr, CoreError> {
    strip_prefix_len(raw)
        .parse()
        .map_err(|_| CoreError::malformed_registration(format!("invalid IPv4 address '{raw}'")))
}

fn parse_v6(raw: &str) -> Result<Ipv6Addr, CoreError> {
    strip_prefix_len(raw)
        .parse()
        .map_err(|_| CoreError::malformed_registration(format!("invalid IPv6 address '{raw}'")))
}

fn parse_dns(raw: &[String]) -> Vec<IpAddr> {
    raw.iter()
        .filter_map(|s| match s.trim().parse() {
            Ok(ip) => Some(ip),
            Err(_) => {
                warn!(entry = %s, "ignoring unparseable DNS entry from service");
                None
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn response(value: serde_json::Value) -> RegistrationResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn flat_response_normalizes() {
        let resp = response(json!({
            "key": "PUBKEY",
            "config": {
                "client_id": "AQID",
                "interface": { "addresses": { "v4": "172.16.0.2", "v6": "2606:4700:110:8a36::2" } },
                "peers": [{ "public_key": "PEERPUB" }]
            }
        }));

        let result = RegistrationResult::try_from(resp).unwrap();

        assert_eq!(result.public_key, "PUBKEY");
        assert_eq!(result.peer_public_key, "PEERPUB");
        assert_eq!(result.ipv4, Ipv4Addr::new(172, 16, 0, 2));
        assert_eq!(result.ipv6.to_string(), "2606:4700:110:8a36::2");
        assert_eq!(result.client_id, "AQID");
        assert!(result.dns.is_empty());
    }

    #[test]
    fn wrapped_response_picks_addresses_by_family() {
        let resp = response(json!({
            "success": true,
            "data": {
                "key": "PUBKEY",
                "peer_public_key": "PEERPUB",
                "allowed_ips": ["fd00::2/128", "10.0.0.2/32"],
                "client_id": "AQID",
                "dns": ["9.9.9.9", "not-an-ip"]
            }
        }));

        let result = RegistrationResult::try_from(resp).unwrap();

        assert_eq!(result.ipv4, Ipv4Addr::new(10, 0, 0, 2));
        assert_eq!(result.ipv6.to_string(), "fd00::2");
        assert_eq!(result.dns, vec!["9.9.9.9".parse::<IpAddr>().unwrap()]);
    }

    #[test]
    fn wrapped_failure_carries_message() {
        let resp = response(json!({ "success": false, "message": "quota exceeded" }));

        let err = RegistrationResult::try_from(resp).unwrap_err();

        assert!(
            matches!(err, CoreError::Registration { ref reason, .. } if reason == "quota exceeded"),
            "got: {err:?}"
        );
    }

    #[test]
    fn flat_without_peers_is_malformed() {
        let resp = response(json!({
            "key": "PUBKEY",
            "config": {
                "client_id": "AQID",
                "interface": { "addresses": { "v4": "172.16.0.2", "v6": "fd00::2" } },
                "peers": []
            }
        }));

        assert!(matches!(
            RegistrationResult::try_from(resp),
            Err(CoreError::Registration { .. })
        ));
    }

    #[test]
    fn bad_address_is_malformed() {
        let resp = response(json!({
            "key": "PUBKEY",
            "config": {
                "client_id": "AQID",
                "interface": { "addresses": { "v4": "nope", "v6": "fd00::2" } },
                "peers": [{ "public_key": "PEERPUB" }]
            }
        }));

        let err = RegistrationResult::try_from(resp).unwrap_err();
        assert!(err.to_string().contains("invalid IPv4"), "got: {err}");
    }

    #[test]
    fn wrapped_missing_ipv6_is_malformed() {
        let resp = response(json!({
            "success": true,
            "data": {
                "key": "PUBKEY",
                "peer_public_key": "PEERPUB",
                "allowed_ips": ["10.0.0.2/32"],
                "client_id": "AQID"
            }
        }));

        let err = RegistrationResult::try_from(resp).unwrap_err();
        assert!(err.to_string().contains("IPv6"), "got: {err}");
    }

    #[test]
    fn endpoint_list_filters_blanks() {
        let dir = EndpointDirectory::from(EndpointList {
            ipv4: vec![String::new(), "1.2.3.4:2408".into()],
            ipv6: vec![" ".into()],
        });
        assert_eq!(dir.ipv4.len(), 1);
        assert!(dir.ipv6.is_empty());
    }
}
