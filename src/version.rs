// ABOUTME: Version comparison that decides whether a candidate replaces a deployment.
// ABOUTME: Tolerant parsing of tags like "v1.2", "19.03" and "1.0.0-rc.1" into semver.

use semver::{BuildMetadata, Prerelease, Version};
use thiserror::Error;

/// A version string could not be understood.
///
/// Callers must stop on this error: an ambiguous tag never counts as either
/// "replace" or "keep".
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VersionParseError {
    #[error("version string is empty")]
    Empty,

    #[error("no numeric component in version {0:?}")]
    NoNumericComponent(String),

    #[error("version component out of range in {0:?}")]
    Overflow(String),

    #[error("invalid pre-release {pre:?} in version {input:?}")]
    InvalidPreRelease { input: String, pre: String },

    #[error("invalid build metadata {build:?} in version {input:?}")]
    InvalidBuild { input: String, build: String },
}

/// Decide whether `candidate` should replace a deployment running `reference`.
///
/// With `allow_equal == false` an equal version replaces (a rebuilt image with
/// an unchanged tag is redeployed). With `allow_equal == true` only a strictly
/// newer candidate replaces.
pub fn should_replace(
    reference: &str,
    candidate: &str,
    allow_equal: bool,
) -> Result<bool, VersionParseError> {
    let reference = parse(reference)?;
    let candidate = parse(candidate)?;
    if allow_equal {
        Ok(candidate > reference)
    } else {
        Ok(candidate >= reference)
    }
}

/// Parse a loosely formatted version string.
///
/// - any leading non-numeric prefix is ignored (`v1.0.0`, `release-2`)
/// - missing minor/patch components default to zero (`1.0` is `1.0.0`)
/// - leading zeros are accepted (`19.03` is `19.3.0`)
/// - text after the numeric core is a pre-release (`1.0.0-rc.1`, `1.0rc1`)
/// - `+meta` is build metadata; components past the third are appended to it
pub fn parse(input: &str) -> Result<Version, VersionParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(VersionParseError::Empty);
    }

    let start = trimmed
        .find(|c: char| c.is_ascii_digit())
        .ok_or_else(|| VersionParseError::NoNumericComponent(input.to_string()))?;
    let rest = &trimmed[start..];

    let (main, build) = match rest.split_once('+') {
        Some((main, build)) => (main, Some(build)),
        None => (rest, None),
    };

    let (components, remainder) = split_numeric_core(main);
    let numbers = components
        .iter()
        .map(|c| c.parse::<u64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| VersionParseError::Overflow(input.to_string()))?;

    let mut version = Version::new(
        numbers[0],
        numbers.get(1).copied().unwrap_or(0),
        numbers.get(2).copied().unwrap_or(0),
    );

    let pre = remainder.trim_start_matches(['-', '.', '_']);
    if !pre.is_empty() {
        version.pre = Prerelease::new(pre).map_err(|_| VersionParseError::InvalidPreRelease {
            input: input.to_string(),
            pre: pre.to_string(),
        })?;
    }

    let mut build_parts: Vec<String> = numbers.iter().skip(3).map(u64::to_string).collect();
    if let Some(build) = build {
        build_parts.push(build.to_string());
    }
    if !build_parts.is_empty() {
        let build = build_parts.join(".");
        version.build =
            BuildMetadata::new(&build).map_err(|_| VersionParseError::InvalidBuild {
                input: input.to_string(),
                build,
            })?;
    }

    Ok(version)
}

/// Split `"1.2.3-rc1"` into `(["1", "2", "3"], "-rc1")`.
///
/// The input must start with a digit, so the component list is never empty.
fn split_numeric_core(s: &str) -> (Vec<&str>, &str) {
    let mut components = Vec::new();
    let mut rest = s;
    loop {
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        components.push(&rest[..end]);
        rest = &rest[end..];

        match rest.strip_prefix('.') {
            Some(after) if after.starts_with(|c: char| c.is_ascii_digit()) => rest = after,
            _ => return (components, rest),
        }
    }
}
