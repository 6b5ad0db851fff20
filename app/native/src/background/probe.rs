//! Filesystem existence probe for background images.

use std::future::Future;
use std::path::{Path, PathBuf};

use super::discovery::ResourceProbe;
use crate::utils::path::resolve_identifier;

/// Probes identifiers by opening the file under `root` and decoding the
/// image header. A candidate exists only if it decodes as a supported image;
/// missing, unreadable, or corrupt files all resolve to `None`.
#[derive(Debug, Clone)]
pub struct ImageFileProbe {
    root: PathBuf,
}

impl ImageFileProbe {
    /// Creates a probe resolving identifiers against `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

    /// Directory identifiers are resolved against.
    #[must_use]
    pub fn root(&self) -> &Path { &self.root }
}

impl ResourceProbe for ImageFileProbe {
    fn probe(&self, identifier: String) -> impl Future<Output = Option<String>> + Send {
        let path = resolve_identifier(&self.root, &identifier);

        async move {
            let Some(path) = path else {
                tracing::trace!(identifier = %identifier, "identifier escapes the background root");
                return None;
            };

            match tokio::task::spawn_blocking(move || decode_dimensions(&path)).await {
                Ok(Ok((width, height))) => {
                    tracing::trace!(identifier = %identifier, width, height, "background found");
                    Some(identifier)
                }
                Ok(Err(err)) => {
                    tracing::trace!(identifier = %identifier, error = %err, "background missing");
                    None
                }
                Err(err) => {
                    tracing::trace!(identifier = %identifier, error = %err, "background probe task failed");
                    None
                }
            }
        }
    }
}

/// Opens `path`, sniffs its format, and reads the image dimensions.
fn decode_dimensions(path: &Path) -> image::ImageResult<(u32, u32)> {
    image::ImageReader::open(path)?.with_guessed_format()?.into_dimensions()
}
