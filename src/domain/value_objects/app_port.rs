//! Application Port Value Object

use std::fmt;
use std::str::FromStr;

/// TCP port the application listens on inside the host
///
/// Guaranteed to be in `1..=65535`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AppPort(u16);

impl AppPort {
    /// Public port nginx listens on
    pub const HTTP: AppPort = AppPort(80);

    pub fn new(port: u16) -> Option<Self> {
        (port != 0).then_some(Self(port))
    }

    pub fn get(self) -> u16 {
        self.0
    }
}

impl FromStr for AppPort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value: u32 = trimmed
            .parse()
            .map_err(|_| format!("'{}' is not a port number", trimmed))?;
        u16::try_from(value)
            .ok()
            .and_then(AppPort::new)
            .ok_or_else(|| format!("port {} is outside 1-65535", value))
    }
}

impl fmt::Display for AppPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
