//! Configuration loader and typed settings.
//!
//! Uses Figment to merge serialized defaults, `config.toml`,
//! `config.<env>.toml` and `APP_*` env vars (`__` separates nested keys).

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElasticSettings {
    pub url: String,
    pub index_name: String,
    pub doc_type: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicSettings {
    /// Documents pooled per query.
    pub pool_depth: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSettings {
    pub content_field: String,
    /// Fields retrieved for pooled topic queries.
    pub pool_fields: Vec<String>,
    /// Fields retrieved for ad-hoc reviewer searches.
    pub result_fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub elastic: ElasticSettings,
    pub topics: TopicSettings,
    pub search: SearchSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            elastic: ElasticSettings {
                url: "http://localhost:9200".to_string(),
                index_name: "decisions".to_string(),
                doc_type: "decision".to_string(),
                timeout_secs: 30,
            },
            topics: TopicSettings { pool_depth: 100 },
            search: SearchSettings {
                content_field: "html".to_string(),
                pool_fields: vec!["id".to_string(), "name".to_string()],
                result_fields: ["id", "case_name", "date_filed", "html"].iter().map(|s| s.to_string()).collect(),
            },
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.topics.pool_depth == 0 {
            return Err(Error::InvalidConfig("topics.pool_depth must be greater than zero".to_string()));
        }
        if self.elastic.url.trim().is_empty() {
            return Err(Error::InvalidConfig("elastic.url is empty".to_string()));
        }
        if self.elastic.index_name.trim().is_empty() {
            return Err(Error::InvalidConfig("elastic.index_name is empty".to_string()));
        }
        if self.search.content_field.trim().is_empty() {
            return Err(Error::InvalidConfig("search.content_field is empty".to_string()));
        }
        Ok(())
    }
}

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::from(Serialized::defaults(Settings::default())).merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.settings()?;
        Ok(config)
    }

    /// Wraps an already assembled figment, layered over the defaults.
    pub fn from_figment(figment: Figment) -> Self {
        Self { figment: Figment::from(Serialized::defaults(Settings::default())).merge(figment) }
    }

    pub fn get<T>(&self, key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| Error::InvalidConfig(format!("Failed to get '{}': {}", key, e)))
    }

    pub fn settings(&self) -> Result<Settings> {
        let settings: Settings = self
            .figment
            .extract()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }
}
