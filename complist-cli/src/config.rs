//! Configuration loading.
//!
//! Values come from, in order of precedence: command-line flags, environment
//! variables (both handled by clap), the JSON config file, built-in defaults.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use complist_core::{Category, DateRange};
use complist_export::DEFAULT_ARCHIVE_NAME;
use complist_fetch::client::DEFAULT_TIMEOUT_SECS;
use complist_fetch::context::{DEFAULT_LIMIT, DEFAULT_PAGE_SIZE};
use complist_fetch::{CategorySpec, Endpoint, FetchContext, FetchError, HttpMethod};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use crate::Cli;

// ============================================================================
// Errors
// ============================================================================

/// Configuration errors. All of them stop a run before anything is fetched.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("Cannot read config file {path}: {source}")]
    Read {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Config file is not valid JSON for this schema.
    #[error("Invalid config file {path}: {source}")]
    Parse {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },

    /// Config file could not be written.
    #[error("Cannot write config file {path}: {source}")]
    Write {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Refused to overwrite an existing file.
    #[error("Config file {0} already exists (use --force to overwrite)")]
    Exists(PathBuf),

    /// No base URL anywhere.
    #[error("No base URL configured (use --base-url, COMPLIST_BASE_URL, or base_url in the config file)")]
    MissingBaseUrl,

    /// No token anywhere.
    #[error("No token configured (use --token or COMPLIST_TOKEN)")]
    MissingToken,

    /// A requested category has no endpoint.
    #[error("No endpoint configured for category {0}")]
    MissingEndpoint(Category),

    /// Data-manager was requested without a table-group endpoint.
    #[error("No table_group_endpoint configured (required for data_manager)")]
    MissingTableGroupEndpoint,

    /// The HTTP client could not be built.
    #[error(transparent)]
    Client(#[from] FetchError),
}

// ============================================================================
// File Schema
// ============================================================================

/// Per-category section of the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryConfig {
    /// Endpoint path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Maximum number of records.
    pub limit: usize,
    /// HTTP method.
    pub method: HttpMethod,
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            limit: DEFAULT_LIMIT,
            method: HttpMethod::Get,
        }
    }
}

/// The JSON config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Platform base URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Company id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<Value>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Multi-form page size.
    pub page_size: usize,
    /// Archive file name used when `--output` is not given.
    pub archive_name: String,
    /// Endpoint used to discover the company id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_pages_endpoint: Option<String>,
    /// Table-group lookup endpoint for data-manager.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_group_endpoint: Option<Endpoint>,
    /// Per-category sections keyed by category identifier.
    pub categories: BTreeMap<Category, CategoryConfig>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            company_id: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            page_size: DEFAULT_PAGE_SIZE,
            archive_name: DEFAULT_ARCHIVE_NAME.to_string(),
            application_pages_endpoint: None,
            table_group_endpoint: None,
            categories: BTreeMap::new(),
        }
    }
}

impl FileConfig {
    /// A starting point for `config init`.
    pub fn template() -> Self {
        let mut categories = BTreeMap::new();
        categories.insert(
            Category::SingleForm,
            CategoryConfig {
                endpoint: Some("/api/v1/single-exp-manager".into()),
                ..CategoryConfig::default()
            },
        );
        categories.insert(
            Category::MultiForm,
            CategoryConfig {
                endpoint: Some("/api/v1/multiple-exp-manager".into()),
                ..CategoryConfig::default()
            },
        );
        categories.insert(
            Category::DataManager,
            CategoryConfig {
                endpoint: Some("/api/v1/data-manager".into()),
                method: HttpMethod::Post,
                ..CategoryConfig::default()
            },
        );
        categories.insert(
            Category::Automations,
            CategoryConfig {
                endpoint: Some("/api/v1/visual-programming".into()),
                ..CategoryConfig::default()
            },
        );

        Self {
            base_url: Some("https://gateway.example.com".into()),
            application_pages_endpoint: Some("/api/v1/application/pages".into()),
            table_group_endpoint: Some(Endpoint::post("/api/v1/tablegroups")),
            categories,
            ..Self::default()
        }
    }

    /// Loads a config file.
    ///
    /// A missing file yields defaults unless `required` is set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] or [`ConfigError::Parse`].
    pub async fn load(path: &Path, required: bool) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "Loading config file");

        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => {
                debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Writes the config as pretty JSON, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Exists`] if the file exists and `force` is not
    /// set, or [`ConfigError::Write`].
    pub async fn save(&self, path: &Path, force: bool) -> Result<(), ConfigError> {
        if !force && path.exists() {
            return Err(ConfigError::Exists(path.to_path_buf()));
        }

        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| write_err(e.into()))?;
        tokio::fs::write(path, json).await.map_err(write_err)?;

        debug!(path = %path.display(), "Config file saved");
        Ok(())
    }
}

/// Returns the default config file path.
///
/// - Linux: `~/.config/complist/config.json`
/// - macOS: `~/Library/Application Support/complist/config.json`
/// - Windows: `%APPDATA%\complist\config.json`
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("complist")
        .join("config.json")
}

// ============================================================================
// Effective Configuration
// ============================================================================

/// Flag and environment values that override the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// `--base-url` / `COMPLIST_BASE_URL`.
    pub base_url: Option<String>,
    /// `--token` / `COMPLIST_TOKEN`.
    pub token: Option<String>,
    /// `--company-id` / `COMPLIST_COMPANY_ID`.
    pub company_id: Option<String>,
}

impl Overrides {
    /// Collects overrides from parsed arguments.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            base_url: cli.base_url.clone(),
            token: cli.token.clone(),
            company_id: cli.company_id.clone(),
        }
    }
}

/// Configuration after applying overrides.
#[derive(Clone)]
pub struct AppConfig {
    /// Where the file layer came from.
    pub path: PathBuf,
    /// File values with overrides applied.
    pub file: FileConfig,
    token: Option<String>,
}

impl AppConfig {
    /// Loads the file layer and applies overrides.
    ///
    /// # Errors
    ///
    /// Returns file errors from [`FileConfig::load`].
    pub async fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let (path, required) = match &cli.config {
            Some(path) => (path.clone(), true),
            None => (default_config_path(), false),
        };
        let file = FileConfig::load(&path, required).await?;
        Ok(Self::resolve(path, file, Overrides::from_cli(cli)))
    }

    /// Applies overrides to a file config.
    pub fn resolve(path: PathBuf, mut file: FileConfig, overrides: Overrides) -> Self {
        if let Some(base_url) = overrides.base_url.filter(|s| !s.trim().is_empty()) {
            file.base_url = Some(base_url);
        }
        if let Some(company_id) = overrides.company_id.filter(|s| !s.trim().is_empty()) {
            file.company_id = Some(parse_company_id(&company_id));
        }

        Self {
            path,
            file,
            token: overrides.token.filter(|s| !s.trim().is_empty()),
        }
    }

    /// Returns the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingBaseUrl`] if none is configured.
    pub fn base_url(&self) -> Result<&str, ConfigError> {
        self.file
            .base_url
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::MissingBaseUrl)
    }

    /// Returns the token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingToken`] if none is configured.
    pub fn token(&self) -> Result<&str, ConfigError> {
        self.token.as_deref().ok_or(ConfigError::MissingToken)
    }

    /// Returns the configured company id.
    pub fn company_id(&self) -> Option<&Value> {
        self.file.company_id.as_ref()
    }

    /// Builds the fetch spec for a category.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEndpoint`] if the category has no
    /// endpoint, or [`ConfigError::MissingTableGroupEndpoint`] for
    /// data-manager without a lookup endpoint.
    pub fn category_spec(
        &self,
        category: Category,
        limit: Option<usize>,
    ) -> Result<CategorySpec, ConfigError> {
        let section = self.file.categories.get(&category).cloned().unwrap_or_default();
        let path = section
            .endpoint
            .filter(|p| !p.trim().is_empty())
            .ok_or(ConfigError::MissingEndpoint(category))?;

        let spec = CategorySpec::new(
            Endpoint {
                path,
                method: section.method,
            },
            limit.unwrap_or(section.limit),
        );

        if category == Category::DataManager {
            let lookup = self
                .file
                .table_group_endpoint
                .clone()
                .ok_or(ConfigError::MissingTableGroupEndpoint)?;
            return Ok(spec.with_lookup(lookup));
        }
        Ok(spec)
    }

    /// Builds the fetch context.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingBaseUrl`], [`ConfigError::MissingToken`],
    /// or a client construction error.
    pub fn fetch_context(&self, range: DateRange) -> Result<FetchContext, ConfigError> {
        let mut builder = FetchContext::builder()
            .base_url(self.base_url()?)
            .token(self.token()?)
            .page_size(self.file.page_size)
            .timeout(Duration::from_secs(self.file.timeout_secs))
            .date_range(range);
        if let Some(company_id) = self.company_id() {
            builder = builder.company_id(company_id.clone());
        }
        Ok(builder.build()?)
    }

    /// The effective configuration as JSON, with the token redacted.
    pub fn redacted(&self) -> Value {
        let mut value = serde_json::to_value(&self.file).unwrap_or(Value::Null);
        if let Value::Object(map) = &mut value {
            let token = if self.token.is_some() { json!("********") } else { Value::Null };
            map.insert("token".into(), token);
            map.insert("config_path".into(), json!(self.path.display().to_string()));
        }
        value
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("path", &self.path)
            .field("file", &self.file)
            .field("token", &self.token.as_ref().map(|_| "********"))
            .finish()
    }
}

/// Numeric ids are sent as JSON numbers, anything else as text.
pub fn parse_company_id(input: &str) -> Value {
    let input = input.trim();
    input
        .parse::<i64>()
        .map_or_else(|_| Value::String(input.to_string()), Value::from)
}

// ============================================================================
// Tests
// ============================================================================
