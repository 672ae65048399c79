use crate::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

pub const DEFAULT_REGION: &str = "RegionOne";

/// Exposure class of an endpoint in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interface {
    #[default]
    Public,
    Internal,
    Admin,
}

impl Interface {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interface::Public => "public",
            Interface::Internal => "internal",
            Interface::Admin => "admin",
        }
    }
}

impl FromStr for Interface {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "public" => Ok(Interface::Public),
            "internal" => Ok(Interface::Internal),
            "admin" => Ok(Interface::Admin),
            other => Err(DomainError::Schema(format!(
                "Unknown endpoint interface '{}', expected one of public, internal, admin",
                other
            ))),
        }
    }
}

impl fmt::Display for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of an endpoint within its service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EndpointKey {
    pub interface: Interface,
    pub region: Arc<str>,
}

/// A URL template at which a service is reachable for one interface/region.
///
/// Two endpoints are equal when they share interface and region; the URL
/// does not take part in identity.
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub url: Arc<str>,
    pub interface: Interface,
    pub region: Arc<str>,
}

impl Endpoint {
    pub fn new(url: &str, interface: Interface, region: &str) -> Self {
        Self {
            url: Arc::from(url),
            interface,
            region: Arc::from(region),
        }
    }

    pub fn public(url: &str) -> Self {
        Self::new(url, Interface::Public, DEFAULT_REGION)
    }

    pub fn key(&self) -> EndpointKey {
        EndpointKey {
            interface: self.interface,
            region: Arc::clone(&self.region),
        }
    }
}

impl PartialEq for Endpoint {
    fn eq(&self, other: &Self) -> bool {
        self.interface == other.interface && self.region == other.region
    }
}

impl Eq for Endpoint {}

impl Hash for Endpoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.interface.hash(state);
        self.region.hash(state);
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Endpoint: {}:{}>", self.interface, self.region)
    }
}
