use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub sync: SyncConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub page_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    pub auto_sync: bool,
    pub max_retries: u32,
    pub retry_backoff_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub app_origin: String,
    pub partitions: Vec<CachePartitionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachePartitionConfig {
    pub name: String,
    pub max_entries: usize,
    pub max_age_secs: u64,
}

pub const STATIC_RESOURCES_PARTITION: &str = "static-resources";
pub const IMAGES_PARTITION: &str = "images";
pub const API_RESPONSES_PARTITION: &str = "api-responses";
pub const PAGES_PARTITION: &str = "pages";

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "https://story-api.dicoding.dev/v1".to_string(),
                timeout_secs: 30,
                page_size: 9,
            },
            database: DatabaseConfig {
                url: "sqlite:data/cerita.db?mode=rwc".to_string(),
                max_connections: 5,
                connection_timeout: 30,
            },
            sync: SyncConfig {
                auto_sync: true,
                max_retries: 3,
                retry_backoff_secs: 30,
            },
            cache: CacheConfig {
                app_origin: "https://app.cerita.dev".to_string(),
                partitions: vec![
                    CachePartitionConfig {
                        name: STATIC_RESOURCES_PARTITION.to_string(),
                        max_entries: 50,
                        max_age_secs: 30 * 24 * 3600, // 30 days
                    },
                    CachePartitionConfig {
                        name: IMAGES_PARTITION.to_string(),
                        max_entries: 60,
                        max_age_secs: 7 * 24 * 3600, // 7 days
                    },
                    CachePartitionConfig {
                        name: API_RESPONSES_PARTITION.to_string(),
                        max_entries: 100,
                        max_age_secs: 24 * 3600, // 1 day
                    },
                    CachePartitionConfig {
                        name: PAGES_PARTITION.to_string(),
                        max_entries: 50,
                        max_age_secs: 24 * 3600, // 1 day
                    },
                ],
            },
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("CERITA_API_BASE_URL") {
            if !v.trim().is_empty() {
                cfg.api.base_url = v.trim().trim_end_matches('/').to_string();
            }
        }
        if let Ok(v) = std::env::var("CERITA_API_TIMEOUT_SECS") {
            if let Some(value) = parse_u64(&v) {
                cfg.api.timeout_secs = value.max(1);
            }
        }
        if let Ok(v) = std::env::var("CERITA_API_PAGE_SIZE") {
            if let Some(value) = parse_u32(&v) {
                cfg.api.page_size = value.max(1);
            }
        }
        if let Ok(v) = std::env::var("CERITA_DATABASE_URL") {
            if !v.trim().is_empty() {
                cfg.database.url = v.trim().to_string();
            }
        }
        if let Ok(v) = std::env::var("CERITA_DATABASE_MAX_CONNECTIONS") {
            if let Some(value) = parse_u32(&v) {
                cfg.database.max_connections = value.max(1);
            }
        }
        if let Ok(v) = std::env::var("CERITA_AUTO_SYNC") {
            cfg.sync.auto_sync = parse_bool(&v, cfg.sync.auto_sync);
        }
        if let Ok(v) = std::env::var("CERITA_SYNC_MAX_RETRIES") {
            if let Some(value) = parse_u32(&v) {
                cfg.sync.max_retries = value.max(1);
            }
        }
        if let Ok(v) = std::env::var("CERITA_SYNC_RETRY_BACKOFF_SECS") {
            if let Some(value) = parse_u64(&v) {
                cfg.sync.retry_backoff_secs = value.max(1);
            }
        }
        if let Ok(v) = std::env::var("CERITA_APP_ORIGIN") {
            if !v.trim().is_empty() {
                cfg.cache.app_origin = v.trim().trim_end_matches('/').to_string();
            }
        }

        cfg
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.api.base_url.trim().is_empty() {
            return Err("API base_url must not be empty".to_string());
        }
        if self.api.timeout_secs == 0 {
            return Err("API timeout_secs must be greater than 0".to_string());
        }
        if self.api.page_size == 0 {
            return Err("API page_size must be greater than 0".to_string());
        }
        if self.database.max_connections == 0 {
            return Err("Database max_connections must be greater than 0".to_string());
        }
        if self.sync.max_retries == 0 {
            return Err("Sync max_retries must be greater than 0".to_string());
        }
        if self.cache.partitions.is_empty() {
            return Err("At least one cache partition must be configured".to_string());
        }
        for partition in &self.cache.partitions {
            if partition.name.trim().is_empty() {
                return Err("Cache partition names must not be empty".to_string());
            }
            if partition.max_entries == 0 {
                return Err(format!(
                    "Cache partition '{}' must allow at least one entry",
                    partition.name
                ));
            }
        }
        let mut names: Vec<&str> = self
            .cache
            .partitions
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        names.sort_unstable();
        names.dedup();
        if names.len() != self.cache.partitions.len() {
            return Err("Cache partition names must be unique".to_string());
        }
        Ok(())
    }
}

fn parse_bool(s: &str, default: bool) -> bool {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

fn parse_u64(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}

fn parse_u32(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn duplicate_partition_names_are_rejected() {
        let mut cfg = AppConfig::default();
        cfg.cache.partitions.push(CachePartitionConfig {
            name: IMAGES_PARTITION.to_string(),
            max_entries: 10,
            max_age_secs: 60,
        });
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn zero_entry_partition_is_rejected() {
        let mut cfg = AppConfig::default();
        cfg.cache.partitions[0].max_entries = 0;
        assert!(cfg.validate().is_err());
    }
}
