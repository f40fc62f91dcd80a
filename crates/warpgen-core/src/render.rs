// ── Config formatters ──
//
// Pure text renderers for the two output formats: a wg-quick style INI
// file and a single-line `wireguard://` URI. Same input, same bytes.

use std::fmt::Write;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use serde::{Deserialize, Serialize};

use crate::model::{Endpoint, RegistrationResult};
use crate::reserved::ReservedBytes;

pub const DEFAULT_MTU: u16 = 1280;
pub const DEFAULT_URI_MTU: u16 = 1420;
pub const DEFAULT_URI_LABEL: &str = "V2ray-Config";
pub const ALLOWED_IPS: &str = "0.0.0.0/0, ::/0";
const URI_SCHEME: &str = "wireguard";

/// Constants the formatters interpolate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderSettings {
    /// DNS servers used when the service supplies none.
    pub dns: Vec<IpAddr>,
    /// `MTU` of the INI config.
    pub mtu: u16,
    /// `mtu` query parameter of the URI.
    pub uri_mtu: u16,
    /// URI fragment.
    pub uri_label: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            dns: default_dns(),
            mtu: DEFAULT_MTU,
            uri_mtu: DEFAULT_URI_MTU,
            uri_label: DEFAULT_URI_LABEL.into(),
        }
    }
}

pub fn default_dns() -> Vec<IpAddr> {
    vec![
        IpAddr::V4(Ipv4Addr::new(1, 1, 1, 1)),
        IpAddr::V4(Ipv4Addr::new(1, 0, 0, 1)),
        IpAddr::V6(Ipv6Addr::new(0x2606, 0x4700, 0x4700, 0, 0, 0, 0, 0x1111)),
        IpAddr::V6(Ipv6Addr::new(0x2606, 0x4700, 0x4700, 0, 0, 0, 0, 0x1001)),
    ]
}

/// Render the INI-style WireGuard config.
pub fn render_wireguard(
    result: &RegistrationResult,
    private_key: &str,
    endpoint: &Endpoint,
    settings: &RenderSettings,
) -> String {
    let dns = if result.dns.is_empty() {
        &settings.dns
    } else {
        &result.dns
    };
    let dns = dns
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");

    let mut out = String::new();
    let _ = writeln!(out, "[Interface]");
    let _ = writeln!(out, "PrivateKey = {private_key}");
    let _ = writeln!(out, "Address = {}/32, {}/128", result.ipv4, result.ipv6);
    let _ = writeln!(out, "DNS = {dns}");
    let _ = writeln!(out, "MTU = {}", settings.mtu);
    let _ = writeln!(out);
    let _ = writeln!(out, "[Peer]");
    let _ = writeln!(out, "PublicKey = {}", result.peer_public_key);
    let _ = writeln!(out, "AllowedIPs = {ALLOWED_IPS}");
    let _ = writeln!(out, "Endpoint = {endpoint}");
    out
}

/// Render the `wireguard://` tunnel URI.
///
/// Key and address components are percent-encoded as URI components; the
/// endpoint is inserted verbatim and the reserved bytes use `%2C` between
/// values.
pub fn render_tunnel_uri(
    private_key: &str,
    peer_public_key: &str,
    ipv4: Ipv4Addr,
    ipv6: Ipv6Addr,
    reserved: &ReservedBytes,
    endpoint: &Endpoint,
    settings: &RenderSettings,
) -> String {
    format!(
        "{URI_SCHEME}://{key}@{endpoint}?address={v4},{v6}&reserved={reserved}&publickey={peer}&mtu={mtu}#{label}",
        key = urlencoding::encode(private_key),
        v4 = urlencoding::encode(&format!("{ipv4}/32")),
        v6 = urlencoding::encode(&format!("{ipv6}/128")),
        reserved = reserved.to_uri_component(),
        peer = urlencoding::encode(peer_public_key),
        mtu = settings.uri_mtu,
        label = settings.uri_label,
    )
}
