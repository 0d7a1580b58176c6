// ABOUTME: Image reference made of a repository name and a tag.
// ABOUTME: `name:tag` is the key used for build output and container lookup.

use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

const MAX_COMPONENT_LEN: usize = 128;
const DEFAULT_TAG: &str = "latest";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseImageRefError {
    #[error("image name cannot be empty")]
    EmptyName,

    #[error("image tag cannot be empty")]
    EmptyTag,

    #[error("image name must be lowercase: {0}")]
    NotLowercase(String),

    #[error("invalid character in image reference: '{0}'")]
    InvalidChar(char),

    #[error("image {0} exceeds maximum length of 128 characters")]
    TooLong(&'static str),

    #[error("image tag cannot start with '{0}'")]
    InvalidTagStart(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageReference {
    name: String,
    tag: String,
}

impl ImageReference {
    pub fn new(name: &str, tag: &str) -> Result<Self, ParseImageRefError> {
        let name = name.trim();
        let tag = tag.trim();
        validate_name(name)?;
        validate_tag(tag)?;
        Ok(Self {
            name: name.to_string(),
            tag: tag.to_string(),
        })
    }

    /// Parse `name` or `name:tag`. A missing tag defaults to `latest`.
    pub fn parse(input: &str) -> Result<Self, ParseImageRefError> {
        let input = input.trim();
        match input.rsplit_once(':') {
            // A colon followed by a slash belongs to a registry port, not a tag.
            Some((name, tag)) if !tag.contains('/') => Self::new(name, tag),
            _ => Self::new(input, DEFAULT_TAG),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Same image name under a different tag.
    pub fn with_tag(&self, tag: &str) -> Result<Self, ParseImageRefError> {
        Self::new(&self.name, tag)
    }
}

fn validate_name(name: &str) -> Result<(), ParseImageRefError> {
    if name.is_empty() {
        return Err(ParseImageRefError::EmptyName);
    }
    if name.len() > MAX_COMPONENT_LEN {
        return Err(ParseImageRefError::TooLong("name"));
    }
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            return Err(ParseImageRefError::NotLowercase(name.to_string()));
        }
        if !c.is_ascii_lowercase() && !c.is_ascii_digit() && !matches!(c, '-' | '_' | '.' | '/') {
            return Err(ParseImageRefError::InvalidChar(c));
        }
    }
    Ok(())
}

fn validate_tag(tag: &str) -> Result<(), ParseImageRefError> {
    let Some(first) = tag.chars().next() else {
        return Err(ParseImageRefError::EmptyTag);
    };
    if tag.len() > MAX_COMPONENT_LEN {
        return Err(ParseImageRefError::TooLong("tag"));
    }
    if first == '.' || first == '-' {
        return Err(ParseImageRefError::InvalidTagStart(first));
    }
    for c in tag.chars() {
        if !c.is_ascii_alphanumeric() && !matches!(c, '-' | '_' | '.') {
            return Err(ParseImageRefError::InvalidChar(c));
        }
    }
    Ok(())
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.tag)
    }
}

impl Serialize for ImageReference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
