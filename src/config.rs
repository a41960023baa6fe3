use crate::error::{PickingError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// APIリソース種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Shipments,
    Pallets,
    Items,
}

impl Resource {
    pub fn name(&self) -> &'static str {
        match self {
            Resource::Shipments => "shipments",
            Resource::Pallets => "pallets",
            Resource::Items => "items",
        }
    }

    /// URLを上書きする環境変数
    pub fn env_var(&self) -> &'static str {
        match self {
            Resource::Shipments => "PICKING_SHIPMENTS_URL",
            Resource::Pallets => "PICKING_PALLETS_URL",
            Resource::Items => "PICKING_ITEMS_URL",
        }
    }
}

impl std::str::FromStr for Resource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "shipments" | "cargas" | "carga" => Ok(Resource::Shipments),
            "pallets" | "paletes" | "palete" => Ok(Resource::Pallets),
            "items" | "itens" => Ok(Resource::Items),
            _ => Err(format!("Unknown resource: {}. Use shipments, pallets, or items", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub shipments_url: Option<String>,
    pub pallets_url: Option<String>,
    pub items_url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shipments_url: None,
            pallets_url: None,
            items_url: None,
            username: None,
            password: None,
            timeout_seconds: 30,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| PickingError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("picking-list").join("config.json"))
    }

    fn configured(&self, resource: Resource) -> &Option<String> {
        match resource {
            Resource::Shipments => &self.shipments_url,
            Resource::Pallets => &self.pallets_url,
            Resource::Items => &self.items_url,
        }
    }

    fn slot(&mut self, resource: Resource) -> &mut Option<String> {
        match resource {
            Resource::Shipments => &mut self.shipments_url,
            Resource::Pallets => &mut self.pallets_url,
            Resource::Items => &mut self.items_url,
        }
    }

    /// リソースのURL（環境変数を優先）
    pub fn url(&self, resource: Resource) -> Result<String> {
        if let Ok(url) = std::env::var(resource.env_var()) {
            if !url.trim().is_empty() {
                return Ok(url);
            }
        }

        self.configured(resource)
            .clone()
            .ok_or(PickingError::MissingUrl(resource.name()))
    }

    /// Basic認証の資格情報（環境変数を優先）
    pub fn credentials(&self) -> Option<(String, String)> {
        let user = std::env::var("PICKING_API_USER").ok().or_else(|| self.username.clone())?;
        let password = std::env::var("PICKING_API_PASSWORD")
            .ok()
            .or_else(|| self.password.clone())
            .unwrap_or_default();
        Some((user, password))
    }

    /// `resource=URL` 形式の指定を反映
    pub fn set_url(&mut self, assignment: &str) -> Result<()> {
        let (resource, url) = assignment
            .split_once('=')
            .ok_or_else(|| PickingError::Config(format!("resource=URL 形式で指定してください: {}", assignment)))?;
        let resource: Resource = resource.trim().parse().map_err(PickingError::Config)?;
        let url = url.trim();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(PickingError::Config(format!("URLが不正です: {}", url)));
        }
        *self.slot(resource) = Some(url.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_url() {
        let mut config = Config::default();
        config.set_url("itens=https://erp.local/rest/PICK_ITENS").unwrap();
        assert_eq!(config.items_url.as_deref(), Some("https://erp.local/rest/PICK_ITENS"));

        assert!(config.set_url("itens").is_err());
        assert!(config.set_url("operadores=https://erp.local").is_err());
        assert!(config.set_url("pallets=ftp://erp.local").is_err());
    }

    #[test]
    fn test_partial_config_file() {
        let config: Config = serde_json::from_str(r#"{"pallets_url": "https://erp.local/PICK_PALETE"}"#).unwrap();
        assert_eq!(config.timeout_seconds, 30);
        assert!(config.username.is_none());
    }
}
