use serde::{Deserialize, Serialize};
use std::fmt;

/// Container image pull policy.
///
/// Wire values outside the enumerated set collapse to [`PullPolicy::Always`],
/// the documented default, rather than failing deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PullPolicy {
    Always,
    Never,
    IfNotPresent,
}

impl PullPolicy {
    /// Cluster-native string form ("Always", "Never", "IfNotPresent").
    pub fn as_str(&self) -> &'static str {
        match self {
            PullPolicy::Always => "Always",
            PullPolicy::Never => "Never",
            PullPolicy::IfNotPresent => "IfNotPresent",
        }
    }
}

impl fmt::Display for PullPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Default for PullPolicy {
    fn default() -> Self {
        PullPolicy::Always
    }
}

impl From<&str> for PullPolicy {
    fn from(s: &str) -> Self {
        match s {
            "Never" => PullPolicy::Never,
            "IfNotPresent" => PullPolicy::IfNotPresent,
            // "Always" and anything unrecognized
            _ => PullPolicy::Always,
        }
    }
}

impl From<String> for PullPolicy {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}

impl From<PullPolicy> for String {
    fn from(policy: PullPolicy) -> Self {
        policy.as_str().to_string()
    }
}

/// Transport protocol for an exposed container port.
///
/// Unrecognized wire values collapse to [`PortProtocol::Tcp`], the documented
/// default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PortProtocol {
    Tcp,
    Udp,
    Sctp,
}

impl PortProtocol {
    /// Cluster-native string form ("TCP", "UDP", "SCTP").
    pub fn as_str(&self) -> &'static str {
        match self {
            PortProtocol::Tcp => "TCP",
            PortProtocol::Udp => "UDP",
            PortProtocol::Sctp => "SCTP",
        }
    }
}

impl fmt::Display for PortProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Default for PortProtocol {
    fn default() -> Self {
        PortProtocol::Tcp
    }
}

impl From<&str> for PortProtocol {
    fn from(s: &str) -> Self {
        match s {
            "UDP" => PortProtocol::Udp,
            "SCTP" => PortProtocol::Sctp,
            // "TCP" and anything unrecognized
            _ => PortProtocol::Tcp,
        }
    }
}

impl From<String> for PortProtocol {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}

impl From<PortProtocol> for String {
    fn from(protocol: PortProtocol) -> Self {
        protocol.as_str().to_string()
    }
}
