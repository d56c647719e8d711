// ABOUTME: Container image reference parsing and validation.
// ABOUTME: Handles nginx, nginx:1.27, registry.example.com/app@sha256:... forms.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageRefError {
    #[error("image reference cannot be empty")]
    Empty,

    #[error("invalid character in image reference: '{0}'")]
    InvalidChar(char),

    #[error("image reference has an empty {0} component")]
    EmptyComponent(&'static str),
}

/// A parsed image reference. The repository keeps any registry prefix
/// verbatim; the cluster resolves it, not this tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    repository: String,
    tag: Option<String>,
    digest: Option<String>,
}

impl ImageRef {
    pub fn parse(input: &str) -> Result<Self, ImageRefError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ImageRefError::Empty);
        }

        for c in input.chars() {
            let ok = c.is_ascii_alphanumeric()
                || matches!(c, '/' | ':' | '.' | '-' | '_' | '@');
            if !ok {
                return Err(ImageRefError::InvalidChar(c));
            }
        }

        let (rest, digest) = match input.split_once('@') {
            Some((before, after)) => {
                if after.is_empty() {
                    return Err(ImageRefError::EmptyComponent("digest"));
                }
                (before, Some(after.to_string()))
            }
            None => (input, None),
        };

        // A colon after the last slash separates the tag; earlier colons
        // belong to a registry port.
        let (repository, tag) = match rest.rsplit_once(':') {
            Some((before, after)) if !after.contains('/') => {
                if after.is_empty() {
                    return Err(ImageRefError::EmptyComponent("tag"));
                }
                (before.to_string(), Some(after.to_string()))
            }
            _ => (rest.to_string(), None),
        };

        if repository.is_empty() {
            return Err(ImageRefError::EmptyComponent("repository"));
        }

        Ok(Self {
            repository,
            tag,
            digest,
        })
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }

    /// The full reference string as handed to the cluster. Untagged,
    /// undigested references are pinned to `latest` explicitly.
    pub fn reference(&self) -> String {
        let mut out = self.repository.clone();
        match (&self.tag, &self.digest) {
            (Some(tag), _) => {
                out.push(':');
                out.push_str(tag);
            }
            (None, None) => out.push_str(":latest"),
            (None, Some(_)) => {}
        }
        if let Some(ref digest) = self.digest {
            out.push('@');
            out.push_str(digest);
        }
        out
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reference())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_name_defaults_to_latest() {
        let image = ImageRef::parse("nginx").unwrap();
        assert_eq!(image.repository(), "nginx");
        assert_eq!(image.tag(), None);
        assert_eq!(image.reference(), "nginx:latest");
    }

    #[test]
    fn registry_port_is_not_a_tag() {
        let image = ImageRef::parse("registry.example.com:5000/app").unwrap();
        assert_eq!(image.repository(), "registry.example.com:5000/app");
        assert_eq!(image.tag(), None);
    }

    #[test]
    fn tag_and_digest() {
        let image = ImageRef::parse("ghcr.io/org/app:v1.2@sha256:abc123").unwrap();
        assert_eq!(image.repository(), "ghcr.io/org/app");
        assert_eq!(image.tag(), Some("v1.2"));
        assert_eq!(image.digest(), Some("sha256:abc123"));
        assert_eq!(image.reference(), "ghcr.io/org/app:v1.2@sha256:abc123");
    }

    #[test]
    fn rejects_whitespace() {
        assert_eq!(
            ImageRef::parse("ng inx").unwrap_err(),
            ImageRefError::InvalidChar(' ')
        );
    }

    #[test]
    fn rejects_empty_tag() {
        assert_eq!(
            ImageRef::parse("nginx:").unwrap_err(),
            ImageRefError::EmptyComponent("tag")
        );
    }
}
