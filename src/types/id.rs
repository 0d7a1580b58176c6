// ABOUTME: Runtime object ids, typed by what they name.
// ABOUTME: A ContainerId and an ImageId never mix up even though both are strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// What an [`Id`] points at.
pub trait IdKind {
    const NAME: &'static str;
}

pub enum Container {}
pub enum Image {}

impl IdKind for Container {
    const NAME: &'static str = "ContainerId";
}

impl IdKind for Image {
    const NAME: &'static str = "ImageId";
}

#[must_use]
#[derive(Serialize, Deserialize)]
#[serde(transparent, bound = "")]
pub struct Id<K: IdKind> {
    raw: String,
    #[serde(skip)]
    kind: PhantomData<K>,
}

pub type ContainerId = Id<Container>;
pub type ImageId = Id<Image>;

impl<K: IdKind> Id<K> {
    pub fn new(raw: impl Into<String>) -> Self {
        Id {
            raw: raw.into(),
            kind: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Digest prefix dropped and cut to 12 characters, as `docker ps` shows it.
    pub fn short(&self) -> &str {
        let hex = self.raw.strip_prefix("sha256:").unwrap_or(&self.raw);
        hex.get(..12).unwrap_or(hex)
    }
}

impl<K: IdKind> Clone for Id<K> {
    fn clone(&self) -> Self {
        Id::new(self.raw.clone())
    }
}

impl<K: IdKind> PartialEq for Id<K> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<K: IdKind> Eq for Id<K> {}

impl<K: IdKind> Hash for Id<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state)
    }
}

impl<K: IdKind> fmt::Debug for Id<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", K::NAME, self.raw)
    }
}

impl<K: IdKind> fmt::Display for Id<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_drops_digest_prefix() {
        assert_eq!(ImageId::new("sha256:0123456789abcdef0123").short(), "0123456789ab");
        assert_eq!(ContainerId::new("abc").short(), "abc");
    }

    #[test]
    fn debug_names_the_kind() {
        assert_eq!(format!("{:?}", ContainerId::new("c1")), "ContainerId(c1)");
    }

    #[test]
    fn deserializes_from_plain_string() {
        let id: ContainerId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(id.as_str(), "abc");
    }
}
