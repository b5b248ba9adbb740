use anyhow::{Context, Result};
use chrono::Utc;
use directories::ProjectDirs;
use docforge_core::AuthContext;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use crate::ports::AuthRepo;

const QUALIFIER: &str = "dev";
const ORG: &str = "docforge";
const APP: &str = "client";

/// Persists the auth token and user id under two fixed keys in
/// `auth.json`, read once at startup and written on login/logout.
pub struct AuthFileStore {
    root: Option<PathBuf>,
}

impl Default for AuthFileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthFileStore {
    pub fn new() -> Self {
        Self { root: None }
    }

    /// Store under an explicit directory instead of the platform config
    /// dir. Used by tests.
    pub fn with_root(root: PathBuf) -> Self {
        Self { root: Some(root) }
    }

    fn config_dir(&self) -> Result<PathBuf> {
        let dir = match &self.root {
            Some(root) => root.clone(),
            None => ProjectDirs::from(QUALIFIER, ORG, APP)
                .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
                .config_dir()
                .to_path_buf(),
        };
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }
        Ok(dir)
    }

    fn auth_path(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join("auth.json"))
    }
}

impl AuthRepo for AuthFileStore {
    fn load(&self) -> Result<Option<AuthContext>> {
        let path = self.auth_path()?;
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).context("Failed to read auth store")?;
        let value: serde_json::Value = serde_json::from_str(&content)?;

        let token = value
            .get(docforge_config::AUTH_TOKEN_KEY)
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        let user_id = value
            .get(docforge_config::USER_ID_KEY)
            .and_then(|v| v.as_str())
            .unwrap_or_default();

        let ctx = AuthContext::new(token, user_id);
        if ctx.is_complete() {
            Ok(Some(ctx))
        } else {
            Ok(None)
        }
    }

    fn save(&self, auth: &AuthContext) -> Result<()> {
        let path = self.auth_path()?;
        let mut value = serde_json::Map::new();
        value.insert(
            docforge_config::AUTH_TOKEN_KEY.to_string(),
            serde_json::Value::String(auth.token.clone()),
        );
        value.insert(
            docforge_config::USER_ID_KEY.to_string(),
            serde_json::Value::String(auth.user_id.clone()),
        );
        value.insert(
            "saved_at".to_string(),
            serde_json::Value::String(Utc::now().to_rfc3339()),
        );
        let json = serde_json::to_string_pretty(&value)?;
        atomic_write(&path, json.as_bytes()).context("Failed to write auth store")?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let path = self.auth_path()?;
        if path.exists() {
            fs::remove_file(&path).context("Failed to remove auth store")?;
        }
        Ok(())
    }
}

fn atomic_write(path: &std::path::Path, contents: &[u8]) -> Result<()> {
    let tmp_path = {
        let mut name = path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    };

    let mut file = fs::File::create(&tmp_path)
        .with_context(|| format!("Failed to create temp file {}", tmp_path.to_string_lossy()))?;

    file.write_all(contents)
        .with_context(|| format!("Failed to write temp file {}", tmp_path.to_string_lossy()))?;
    file.sync_all()
        .with_context(|| format!("Failed to sync temp file {}", tmp_path.to_string_lossy()))?;
    drop(file);

    match fs::rename(&tmp_path, path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            fs::remove_file(path).ok();
            fs::rename(&tmp_path, path).with_context(|| {
                format!(
                    "Failed to replace destination file {}",
                    path.to_string_lossy()
                )
            })?;
        }
        Err(e) => {
            return Err(e).with_context(|| {
                format!(
                    "Failed to rename temp file {} to {}",
                    tmp_path.to_string_lossy(),
                    path.to_string_lossy()
                )
            });
        }
    }

    if let Some(parent) = path.parent() {
        if let Ok(dir) = fs::File::open(parent) {
            let _ = dir.sync_all();
        }
    }

    Ok(())
}
