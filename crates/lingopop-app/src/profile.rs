use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use lingopop_config::Config;
use serde::{Deserialize, Serialize};

const APP_DIR: &str = "LingoPop";

/// Platform config folder, current directory when the platform has none
fn config_root() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

fn profiles_dir() -> PathBuf {
    config_root().join("profiles")
}

/// Where the notebook and audio clips live unless overridden
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Represents a user profile
#[derive(Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub value: Config,
}

/// Named configs stored as `<name>.json`
#[derive(Debug, Clone)]
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Profiles under the user's config folder
    pub fn user() -> Self {
        Self::new(profiles_dir())
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    /// Create the profile folder and the main profile if missing
    pub fn init(&self) -> anyhow::Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating {}", self.dir.display()))?;

        let main_profile = self.path("main");
        if !main_profile.exists() {
            write_profile(&main_profile, "main", &Config::default())?;
            tracing::info!("Created main profile at {}", main_profile.display());
        }

        Ok(())
    }

    /// Load a profile by name. Unknown names are created from main.
    pub fn load(&self, name: &str) -> anyhow::Result<Config> {
        let file = self.path(name);
        if !file.exists() {
            tracing::warn!("Profile {name} not found, creating it from main");
            self.add_from_main(name)?;
        }

        read_profile(&file)
    }

    /// Overwrite a profile with `config`
    pub fn save(&self, name: &str, config: &Config) -> anyhow::Result<PathBuf> {
        let file = self.path(name);
        write_profile(&file, name, config)?;
        tracing::debug!("Saved profile {name}");
        Ok(file)
    }

    /// Add a new profile cloned from main (or defaults if main is missing)
    pub fn add_from_main(&self, new_name: &str) -> anyhow::Result<PathBuf> {
        let main_file = self.path("main");
        let config = if main_file.exists() {
            read_profile(&main_file)?
        } else {
            Config::default()
        };

        let file = self.save(new_name, &config)?;
        tracing::info!("Created new profile: {new_name}");
        Ok(file)
    }
}

fn read_profile(path: &Path) -> anyhow::Result<Config> {
    let data =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let profile: Profile = serde_json::from_str(&data)
        .with_context(|| format!("parsing profile {}", path.display()))?;
    Ok(profile.value)
}

fn write_profile(path: &Path, name: &str, config: &Config) -> anyhow::Result<()> {
    let profile = Profile {
        name: name.into(),
        value: config.clone(),
    };
    fs::write(path, serde_json::to_string_pretty(&profile)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
