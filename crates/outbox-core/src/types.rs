use serde::{Deserialize, Serialize};

/// Social network a post is targeted at. Stored as its lowercase tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Twitter,
    Instagram,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Platform::Twitter => "twitter",
            Platform::Instagram => "instagram",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "twitter" => Ok(Platform::Twitter),
            "instagram" => Ok(Platform::Instagram),
            other => Err(format!("unknown platform: {other}")),
        }
    }
}

/// Kind of media attached to a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Photo,
    Video,
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MediaKind::Photo => "photo",
            MediaKind::Video => "video",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "photo" => Ok(MediaKind::Photo),
            "video" => Ok(MediaKind::Video),
            other => Err(format!("unknown media kind: {other}")),
        }
    }
}

/// A media attachment: path on local disk plus its kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    pub path: String,
    pub kind: MediaKind,
}

/// Outcome recorded for a publish attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishStatus {
    /// The post went out and the platform assigned it an id.
    Published,
    /// The attempt was recorded as failed (correction path may fix it up).
    Error,
}

impl std::fmt::Display for PublishStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PublishStatus::Published => "published",
            PublishStatus::Error => "error",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for PublishStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "published" => Ok(PublishStatus::Published),
            "error" => Ok(PublishStatus::Error),
            other => Err(format!("unknown publish status: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn platform_roundtrip() {
        for p in [Platform::Twitter, Platform::Instagram] {
            assert_eq!(Platform::from_str(&p.to_string()).unwrap(), p);
        }
    }

    #[test]
    fn unknown_platform_is_err() {
        assert!(Platform::from_str("myspace").is_err());
    }

    #[test]
    fn media_kind_roundtrip() {
        for k in [MediaKind::Photo, MediaKind::Video] {
            assert_eq!(MediaKind::from_str(&k.to_string()).unwrap(), k);
        }
    }

    #[test]
    fn publish_status_roundtrip() {
        for s in [PublishStatus::Published, PublishStatus::Error] {
            assert_eq!(PublishStatus::from_str(&s.to_string()).unwrap(), s);
        }
    }
}
