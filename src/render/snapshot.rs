// src/render/snapshot.rs
use std::fs;
use std::path::Path;
use std::sync::Arc;

use log::info;

use crate::error::Result;

/// Serialized SVG markup of the whiteboard at the moment of generation.
///
/// The markup is shared, not copied, when handed to the decode worker.
#[derive(Debug, Clone)]
pub struct DesignSnapshot {
    markup: Arc<str>,
}

impl DesignSnapshot {
    pub fn from_markup(markup: impl Into<String>) -> Self {
        Self {
            markup: Arc::from(markup.into()),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let markup = fs::read_to_string(path)?;
        info!("Loaded design snapshot from {} ({} bytes)", path.display(), markup.len());
        Ok(Self::from_markup(markup))
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub(crate) fn shared_markup(&self) -> Arc<str> {
        Arc::clone(&self.markup)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn reads_markup_from_disk() -> anyhow::Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(file, "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"4\" height=\"4\"/>")?;

        let snapshot = DesignSnapshot::from_path(file.path())?;
        assert!(snapshot.markup().starts_with("<svg"));
        Ok(())
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = DesignSnapshot::from_path(Path::new("/definitely/not/here.svg"));
        assert!(matches!(result, Err(crate::Error::Io(_))));
    }
}
