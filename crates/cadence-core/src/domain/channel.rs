use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A distribution channel a post can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Instagram,
    Facebook,
    Twitter,
    Linkedin,
}

impl Network {
    pub const ALL: [Network; 4] = [
        Network::Instagram,
        Network::Facebook,
        Network::Twitter,
        Network::Linkedin,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Network::Instagram => "instagram",
            Network::Facebook => "facebook",
            Network::Twitter => "twitter",
            Network::Linkedin => "linkedin",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Network::ALL
            .into_iter()
            .find(|n| n.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::validation(format!("unknown network '{s}'")))
    }
}

/// The kind of media a post carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Image,
    Video,
    Carousel,
    Text,
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Image => "image",
            ContentType::Video => "video",
            ContentType::Carousel => "carousel",
            ContentType::Text => "text",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "image" => Ok(ContentType::Image),
            "video" => Ok(ContentType::Video),
            "carousel" => Ok(ContentType::Carousel),
            "text" => Ok(ContentType::Text),
            _ => Err(DomainError::validation(format!("unknown content type '{s}'"))),
        }
    }
}
