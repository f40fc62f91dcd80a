// ── Endpoints ──
//
// `host:port` strings the client connects to, the directory of candidates
// keyed by address family, and selection from it.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Well-known endpoint used when nothing better is available.
pub const WELL_KNOWN_ENDPOINT: &str = "engage.cloudflareclient.com:2408";

const FALLBACK_IPV4: &str = "162.159.192.1:2408";
const FALLBACK_IPV6: &str = "[2606:4700:d0::a29f:c001]:2408";

/// A non-empty `host:port` endpoint string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Endpoint(String);

impl Endpoint {
    /// Wrap a candidate string, rejecting blank input.
    pub fn new(raw: impl AsRef<str>) -> Option<Self> {
        let trimmed = raw.as_ref().trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_owned()))
    }

    /// The fixed well-known endpoint.
    pub fn well_known() -> Self {
        Self(WELL_KNOWN_ENDPOINT.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::well_known()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Endpoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or_else(|| "endpoint cannot be empty".to_owned())
    }
}

/// Which endpoint the caller wants.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EndpointChoice {
    /// The fixed well-known endpoint; no directory lookup.
    #[default]
    Default,
    /// A random IPv4 endpoint from the directory.
    Ipv4,
    /// A random IPv6 endpoint from the directory.
    Ipv6,
}

/// Candidate endpoints keyed by address family.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EndpointDirectory {
    pub ipv4: Vec<Endpoint>,
    pub ipv6: Vec<Endpoint>,
}

impl EndpointDirectory {
    /// Build a directory from untrusted strings, dropping blank entries.
    pub fn from_untrusted<I, J, S, T>(ipv4: I, ipv6: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Self {
            ipv4: ipv4.into_iter().filter_map(Endpoint::new).collect(),
            ipv6: ipv6.into_iter().filter_map(Endpoint::new).collect(),
        }
    }

    /// Single-entry-per-family directory used when the remote one is unavailable.
    pub fn fallback() -> Self {
        Self::from_untrusted([FALLBACK_IPV4], [FALLBACK_IPV6])
    }

    /// Candidates for a choice. `Default` has none.
    pub fn candidates(&self, choice: EndpointChoice) -> &[Endpoint] {
        match choice {
            EndpointChoice::Default => &[],
            EndpointChoice::Ipv4 => &self.ipv4,
            EndpointChoice::Ipv6 => &self.ipv6,
        }
    }
}

/// Pick an endpoint for `choice`. Never fails.
///
/// `Default`, or an empty candidate list, yields `fallback`.
pub fn select_endpoint(
    choice: EndpointChoice,
    directory: &EndpointDirectory,
    fallback: &Endpoint,
) -> Endpoint {
    select_endpoint_with(choice, directory, fallback, &mut rand::thread_rng())
}

/// [`select_endpoint`] with an explicit random source.
pub fn select_endpoint_with<R: Rng + ?Sized>(
    choice: EndpointChoice,
    directory: &EndpointDirectory,
    fallback: &Endpoint,
    rng: &mut R,
) -> Endpoint {
    directory
        .candidates(choice)
        .choose(rng)
        .cloned()
        .unwrap_or_else(|| fallback.clone())
}
