use serde::Deserialize;
use tracing::debug;
use std::{env, path::Path};
use std::path::PathBuf;
use std::fs::read_to_string;
use anyhow::{anyhow, bail, Result};


/// Output subfolder created next to the source badges when no other is set.
pub const DEFAULT_PREFIX: &str = "_procesadas";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Import {
    pub dir: Option<PathBuf>,
    pub include: Option<Vec<PathBuf>>,
    #[serde(default)]
    pub exclude: Vec<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Export {
    pub prefix: Option<PathBuf>,
    pub filesystem_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(skip)]
    pub dir: PathBuf,
    #[serde(default)]
    pub import: Import,
    #[serde(default)]
    pub export: Export,
}

impl Config {
    pub fn new() -> Result<Self> {
        let path = match env::args().nth(1) {
            Some(p) => PathBuf::from(p),
            None => PathBuf::from("."),
        };

        Self::from_path(path)
    }
    pub fn from_path<T>(path: T) -> Result<Self>
    where T: AsRef<Path> {
        let path = path.as_ref();

        // Allow config path to point to a 'config.toml' file or a dir where it's present.
        let (dir, file) = match path {
            p if p.is_file() => (
                p.parent().unwrap_or_else(|| Path::new(".")).to_owned(),
                p.to_owned(),
            ),
            p if p.is_dir() => (p.to_owned(), p.join("config.toml")),
            _ => bail!("Unable to determine config.toml path from {:?}", path),
        };

        let contents = read_to_string(&file).map_err(|e|
            anyhow!("Unable to read {} to string: {}", file.display(), e)
        )?;

        Self::parse(dir, &contents)
    }
    pub fn parse(dir: PathBuf, contents: &str) -> Result<Self> {
        let mut config = toml::from_str::<Self>(contents).map_err(|e|
            anyhow!("Unable to read config file as toml: {}", e)
        )?;

        debug!("Config dir set to {}", dir.display());

        // Add decided dir path to config
        config.dir = dir;

        Ok(config)
    }
    /// Folder the badges are read from. Relative paths are taken from the config dir.
    pub fn source_dir(&self) -> PathBuf {
        match self.import.dir {
            Some(ref d) => self.dir.join(d),
            None => self.dir.to_owned(),
        }
    }
    pub fn output_dir(&self) -> PathBuf {
        if let Some(ref p) = self.export.filesystem_path {
            return self.dir.join(p)
        }

        let prefix = self.export.prefix.as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_PREFIX));

        self.source_dir().join(prefix)
    }
    /// Fixed list of badge file names, `None` means the source dir gets scanned.
    pub fn include(&self) -> Option<&[PathBuf]> {
        self.import.include.as_deref()
    }
    pub fn is_excluded(&self, name: &Path) -> bool {
        self.import.exclude.iter().any(|e| name.ends_with(e))
    }
}
