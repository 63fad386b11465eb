//! Turning object keys into displayable items

use serde::Serialize;
use url::Url;

use crate::defaults::KEY_SEPARATOR;
use crate::error::{Error, Result};

/// Converts a bucket key into whatever the page layer displays.
///
/// Any `Fn(&str) -> T` is a renderer, which keeps tests and simple callers
/// free of boilerplate.
pub trait Renderer {
    type Item;

    fn render(&self, key: &str) -> Self::Item;
}

impl<F, T> Renderer for F
where
    F: Fn(&str) -> T,
{
    type Item = T;

    fn render(&self, key: &str) -> T {
        self(key)
    }
}

/// A photo ready for a template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Photo {
    pub key: String,
    pub url: String,
}

/// Renders keys as public URLs under a fixed base, e.g. a bucket website
/// endpoint or a CDN.
#[derive(Debug, Clone)]
pub struct PublicUrlRenderer {
    base: Url,
}

impl PublicUrlRenderer {
    pub fn new(base: &str) -> Result<Self> {
        let base = Url::parse(base)?;
        if base.cannot_be_a_base() {
            return Err(Error::InvalidAlbum {
                message: format!("{} cannot be used as a base URL", base),
            });
        }
        Ok(Self { base })
    }
}

impl Renderer for PublicUrlRenderer {
    type Item = Photo;

    fn render(&self, key: &str) -> Photo {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(key.trim_start_matches(KEY_SEPARATOR).split(KEY_SEPARATOR));
        }
        Photo {
            key: key.to_string(),
            url: url.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_renderer() {
        let renderer = |key: &str| key.to_uppercase();
        assert_eq!(renderer.render("a.jpg"), "A.JPG");
    }

    #[test]
    fn test_public_url_renderer() {
        let renderer = PublicUrlRenderer::new("https://cdn.example.com/photos/").unwrap();
        let photo = renderer.render("vacation/my photo.jpg");
        assert_eq!(photo.key, "vacation/my photo.jpg");
        assert_eq!(photo.url, "https://cdn.example.com/photos/vacation/my%20photo.jpg");
    }

    #[test]
    fn test_public_url_renderer_without_trailing_slash() {
        let renderer = PublicUrlRenderer::new("https://cdn.example.com").unwrap();
        assert_eq!(
            renderer.render("/a.jpg").url,
            "https://cdn.example.com/a.jpg"
        );
    }

    #[test]
    fn test_public_url_renderer_rejects_bad_base() {
        assert!(PublicUrlRenderer::new("mailto:someone@example.com").is_err());
        assert!(PublicUrlRenderer::new("not a url").is_err());
    }
}
