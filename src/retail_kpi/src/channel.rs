//! Sales channels.
//!
//! A [`Channel`] is an open enumeration: the two channels the dataset ships
//! with today (`store`, `online`) are named variants, anything else is kept as
//! [`Channel::Other`] so new channels load without a code change.
//!
//! Parsing trims whitespace and lowercases, so `" Store "` and `"store"` name
//! the same channel:
//! ```
//! use retail_kpi::channel::Channel;
//!
//! let ch: Channel = " Store ".parse().unwrap();
//! assert_eq!(ch, Channel::Store);
//! assert_eq!("marketplace".parse::<Channel>().unwrap().as_str(), "marketplace");
//! ```

use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a channel name is blank after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("channel name cannot be empty")]
pub struct ChannelParseError;

/// Where a record's traffic and sales happened.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Channel {
    /// Physical store; traffic is foot-traffic.
    Store,
    /// Web shop; traffic is sessions.
    Online,
    /// Any other channel, stored by its normalized (lowercase) name.
    Other(String),
}

impl Channel {
    /// Canonical lowercase name.
    pub fn as_str(&self) -> &str {
        match self {
            Channel::Store => "store",
            Channel::Online => "online",
            Channel::Other(name) => name,
        }
    }
}

impl FromStr for Channel {
    type Err = ChannelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        match name.as_str() {
            "" => Err(ChannelParseError),
            "store" => Ok(Channel::Store),
            "online" => Ok(Channel::Online),
            _ => Ok(Channel::Other(name)),
        }
    }
}

impl TryFrom<String> for Channel {
    type Error = ChannelParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Channel> for String {
    fn from(ch: Channel) -> Self {
        match ch {
            Channel::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Channels sort by name so record order is stable regardless of variant layout.
impl Ord for Channel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl PartialOrd for Channel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_and_other_channels() {
        assert_eq!("STORE".parse::<Channel>().unwrap(), Channel::Store);
        assert_eq!(" online\t".parse::<Channel>().unwrap(), Channel::Online);
        assert_eq!(
            "Marketplace".parse::<Channel>().unwrap(),
            Channel::Other("marketplace".into())
        );
    }

    #[test]
    fn blank_name_is_rejected() {
        assert_eq!("   ".parse::<Channel>(), Err(ChannelParseError));
    }

    #[test]
    fn orders_by_name() {
        let mut chans = vec![
            Channel::Store,
            Channel::Other("kiosk".into()),
            Channel::Online,
        ];
        chans.sort();
        assert_eq!(
            chans,
            vec![Channel::Other("kiosk".into()), Channel::Online, Channel::Store]
        );
    }

    #[test]
    fn serde_uses_plain_names() {
        let json = serde_json::to_string(&vec![Channel::Store, Channel::Other("app".into())])
            .unwrap();
        assert_eq!(json, r#"["store","app"]"#);
        let back: Channel = serde_json::from_str(r#"" Online ""#).unwrap();
        assert_eq!(back, Channel::Online);
    }
}
