//! References to external media resources.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Reference to a media resource (URL, path or blob handle).
///
/// Clips never own media data; they point at it through this handle. Cloning
/// is cheap.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaRef(Arc<str>);

impl MediaRef {
    pub fn new(src: impl AsRef<str>) -> Self {
        Self(Arc::from(src.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// URI scheme (`"file"`, `"blob"`, ...), if the reference has one.
    pub fn scheme(&self) -> Option<&str> {
        self.0.split_once("://").map(|(scheme, _)| scheme)
    }

    /// Last path segment without its extension, for display.
    pub fn display_name(&self) -> &str {
        let file = self.0.rsplit('/').next().unwrap_or(&self.0);
        match file.split_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => file,
        }
    }
}

impl fmt::Display for MediaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MediaRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for MediaRef {
    fn from(value: String) -> Self {
        Self(Arc::from(value))
    }
}
