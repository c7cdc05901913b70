//! Network identifier.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::TypesError;

/// Which replica the client talks to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkId {
    /// Local development replica.
    Local,
    /// The Internet Computer mainnet.
    Ic,
}

impl NetworkId {
    /// Default API host for this network.
    pub fn default_host(&self) -> &'static str {
        match self {
            Self::Local => "http://localhost:4943",
            Self::Ic => "https://mainnet.dfinity.network",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Ic => "ic",
        }
    }
}

impl FromStr for NetworkId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "ic" => Ok(Self::Ic),
            other => Err(TypesError::UnknownNetwork(other.to_string())),
        }
    }
}
