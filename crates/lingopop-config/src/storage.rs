use serde::{Deserialize, Serialize};

fn default_notebook_key() -> String {
    "lingopop-notebook".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    /// Data directory override, platform data dir when unset
    pub data_dir: Option<String>,
    #[serde(default = "default_notebook_key")]
    pub notebook_key: String,
}

impl StorageConfig {
    /// Key holding a copy of unreadable notebook data
    pub fn backup_key(&self) -> String {
        format!("{}.corrupt", self.notebook_key)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            notebook_key: default_notebook_key(),
        }
    }
}
