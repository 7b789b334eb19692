use crate::model::Workspace;
use anyhow::Context;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub trait Storage {
    /// Charge un workspace depuis un support.
    fn load(&self) -> anyhow::Result<Workspace>;
    /// Sauvegarde de manière atomique.
    fn save(&self, workspace: &Workspace) -> anyhow::Result<()>;
}

pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Comme `load`, mais un fichier absent donne un workspace vide.
    pub fn load_or_default(&self) -> anyhow::Result<Workspace> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no workspace file, starting empty");
            return Ok(Workspace::default());
        }
        self.load()
    }
}

impl Storage for JsonStorage {
    fn load(&self) -> anyhow::Result<Workspace> {
        let data =
            fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        let workspace: Workspace = serde_json::from_slice(&data)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(workspace)
    }

    fn save(&self, workspace: &Workspace) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(workspace)?;
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).with_context(|| "atomic rename")?;
        Ok(())
    }
}
