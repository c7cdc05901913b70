//! Views the client can navigate to.

use std::fmt;
use std::str::FromStr;

use crate::{TokenId, TypesError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Landing,
    Vault,
    Genesis,
    Anima(TokenId),
    NeuralLink(TokenId),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Self::Landing => "/".to_string(),
            Self::Vault => "/vault".to_string(),
            Self::Genesis => "/genesis".to_string(),
            Self::Anima(id) => format!("/anima/{id}"),
            Self::NeuralLink(id) => format!("/neural-link/{id}"),
        }
    }

    /// Every view except the landing page is behind the identity guard.
    pub fn requires_identity(&self) -> bool {
        !matches!(self, Self::Landing)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl FromStr for Route {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || TypesError::UnknownRoute(s.to_string());
        if !s.starts_with('/') {
            return Err(unknown());
        }
        let trimmed = s.trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').skip(1).collect();
        match segments.as_slice() {
            [] => Ok(Self::Landing),
            ["vault"] => Ok(Self::Vault),
            ["genesis"] => Ok(Self::Genesis),
            ["anima", id] => id.parse().map(Self::Anima).map_err(|_| unknown()),
            ["neural-link", id] => id.parse().map(Self::NeuralLink).map_err(|_| unknown()),
            _ => Err(unknown()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_paths() {
        assert_eq!("/".parse::<Route>().unwrap(), Route::Landing);
        assert_eq!("/vault".parse::<Route>().unwrap(), Route::Vault);
        assert_eq!("/vault/".parse::<Route>().unwrap(), Route::Vault);
        assert_eq!("/anima/42".parse::<Route>().unwrap(), Route::Anima(42));
        assert_eq!(
            "/neural-link/7".parse::<Route>().unwrap(),
            Route::NeuralLink(7)
        );
    }

    #[test]
    fn reject_unknown_paths() {
        assert!("/anima/abc".parse::<Route>().is_err());
        assert!("/settings".parse::<Route>().is_err());
        assert!("vault".parse::<Route>().is_err());
    }

    #[test]
    fn only_landing_is_public() {
        assert!(!Route::Landing.requires_identity());
        assert!(Route::Vault.requires_identity());
        assert!(Route::Genesis.requires_identity());
        assert!(Route::Anima(1).requires_identity());
    }
}
