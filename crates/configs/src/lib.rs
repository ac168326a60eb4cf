use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub quote: QuoteConfig,
    #[serde(default)]
    pub admin: AdminConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    #[serde(default = "default_frontend_dir")]
    pub frontend_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
            worker_threads: Some(4),
            frontend_dir: default_frontend_dir(),
        }
    }
}

/// Connection parameters for the hosted data/auth backend.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub anon_key: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self { url: String::new(), anon_key: String::new(), timeout_secs: default_timeout() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuoteConfig {
    #[serde(default = "default_draft_ttl")]
    pub draft_ttl_secs: u64,
    #[serde(default = "default_max_drafts")]
    pub max_drafts: u64,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self { draft_ttl_secs: default_draft_ttl(), max_drafts: default_max_drafts() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    #[serde(default = "default_workspace_ttl")]
    pub workspace_ttl_secs: u64,
    /// Upper bound on concurrently cached admin workspaces.
    #[serde(default = "default_max_workspaces")]
    pub max_workspaces: u64,
    #[serde(default)]
    pub secure_cookie: bool,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self { workspace_ttl_secs: default_workspace_ttl(), max_workspaces: default_max_workspaces(), secure_cookie: false }
    }
}

fn default_frontend_dir() -> String { "frontend".into() }
fn default_timeout() -> u64 { 30 }
fn default_draft_ttl() -> u64 { 1800 }
fn default_max_drafts() -> u64 { 10_000 }
fn default_workspace_ttl() -> u64 { 3600 }
fn default_max_workspaces() -> u64 { 1_000 }

/// Load `CONFIG_PATH` (default `config.toml`); a missing file yields the defaults.
pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    if std::fs::metadata(&path).is_err() {
        return Ok(AppConfig::default());
    }
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        // 归一化 server（环境变量覆盖 host/port/线程数）
        self.server.normalize_from_env();
        self.server.normalize()?;
        // 后端连接参数缺失属于致命错误
        self.backend.normalize_from_env();
        self.backend.validate()?;
        self.quote.validate()?;
        self.admin.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize_from_env(&mut self) {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            self.port = port;
        }
        if let Some(w) = std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok()) {
            self.worker_threads = Some(w);
        }
    }

    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port 必须在 1..=65535 范围内"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        if self.frontend_dir.trim().is_empty() {
            self.frontend_dir = default_frontend_dir();
        }
        Ok(())
    }
}

impl BackendConfig {
    pub fn normalize_from_env(&mut self) {
        // 仅在 TOML 中未提供时从环境变量填充，文件中的值优先
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("SUPABASE_URL") {
                self.url = url;
            }
        }
        if self.anon_key.trim().is_empty() {
            if let Ok(key) = std::env::var("SUPABASE_ANON_KEY") {
                self.anon_key = key;
            }
        }
        self.url = self.url.trim().trim_end_matches('/').to_string();
        self.anon_key = self.anon_key.trim().to_string();
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.is_empty() {
            return Err(anyhow!("backend.url 为空；请在 config.toml 或环境变量 SUPABASE_URL 中提供"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("https://") || lower.starts_with("http://")) {
            return Err(anyhow!("backend.url 必须以 http:// 或 https:// 开头"));
        }
        if self.anon_key.is_empty() {
            return Err(anyhow!("backend.anon_key 为空；请在 config.toml 或环境变量 SUPABASE_ANON_KEY 中提供"));
        }
        if self.timeout_secs == 0 {
            return Err(anyhow!("backend.timeout_secs 必须为正整数秒"));
        }
        Ok(())
    }
}

impl QuoteConfig {
    fn validate(&self) -> Result<()> {
        if self.draft_ttl_secs == 0 || self.max_drafts == 0 {
            return Err(anyhow!("quote.draft_ttl_secs 与 quote.max_drafts 必须 >= 1"));
        }
        Ok(())
    }
}

impl AdminConfig {
    fn validate(&self) -> Result<()> {
        if self.workspace_ttl_secs == 0 || self.max_workspaces == 0 {
            return Err(anyhow!("admin.workspace_ttl_secs 与 admin.max_workspaces 必须 >= 1"));
        }
        Ok(())
    }
}
