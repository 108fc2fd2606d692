//! # rt-client
//!
//! The client-side settings mirror: an explicitly constructed state object
//! that holds the display preferences for consumers, fetched from the
//! Settings API with an ordered fallback (server, then local cache, then
//! hard defaults) and written through optimistically on every mutation.
//!
//! Lifecycle: `init → fetch → ready`. The store is the source of truth;
//! the mirror overwrites its fields on every successful fetch.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use rt_core::models::{Settings, Theme};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server answered {0}")]
    Status(u16),
}

/// Transport to the Settings API.
#[async_trait]
pub trait SettingsApi: Send + Sync {
    async fn fetch(&self) -> Result<Settings, ClientError>;
    /// Pushes the full current triple (the upsert endpoint takes partials,
    /// but the mirror always sends everything it holds).
    async fn push(&self, settings: &Settings) -> Result<Settings, ClientError>;
}

/// Persisted side-channel, consulted only when the server is unreachable.
pub trait SettingsCache: Send + Sync {
    fn load(&self) -> Option<Settings>;
    fn save(&self, settings: &Settings);
}

/// Reflects the active theme into the global display context.
pub trait ThemeSink: Send + Sync {
    fn apply(&self, theme: Theme);
}

/// REST implementation of [`SettingsApi`].
pub struct HttpSettingsApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpSettingsApi {
    /// `base_url` is the API origin, e.g. `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/settings", self.base_url)
    }
}

#[async_trait]
impl SettingsApi for HttpSettingsApi {
    async fn fetch(&self) -> Result<Settings, ClientError> {
        let response = self.client.get(self.endpoint()).send().await?;
        if !response.status().is_success() {
            return Err(ClientError::Status(response.status().as_u16()));
        }
        Ok(response.json().await?)
    }

    async fn push(&self, settings: &Settings) -> Result<Settings, ClientError> {
        let response = self
            .client
            .put(self.endpoint())
            .json(settings)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ClientError::Status(response.status().as_u16()));
        }
        Ok(response.json().await?)
    }
}

/// JSON-file implementation of [`SettingsCache`] — the local-storage analog.
/// Cache faults are logged and ignored; the cache is best-effort by design.
pub struct JsonFileCache {
    path: PathBuf,
}

impl JsonFileCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SettingsCache for JsonFileCache {
    fn load(&self) -> Option<Settings> {
        let text = std::fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&text).ok()
    }

    fn save(&self, settings: &Settings) {
        let text = match serde_json::to_string_pretty(settings) {
            Ok(text) => text,
            Err(_) => return,
        };
        if let Err(err) = std::fs::write(&self.path, text) {
            log::warn!("settings cache write failed: {err}");
        }
    }
}

/// The reactive holder of `userName`, `theme` and `itemsPerPage`.
pub struct SettingsMirror {
    state: RwLock<Settings>,
    api: Arc<dyn SettingsApi>,
    cache: Arc<dyn SettingsCache>,
    sink: Arc<dyn ThemeSink>,
}

impl SettingsMirror {
    /// Constructs the mirror and performs the one initial fetch.
    pub async fn init(
        api: Arc<dyn SettingsApi>,
        cache: Arc<dyn SettingsCache>,
        sink: Arc<dyn ThemeSink>,
    ) -> Self {
        let mirror = Self {
            state: RwLock::new(Settings::default()),
            api,
            cache,
            sink,
        };
        mirror.refresh().await;
        mirror
    }

    /// Overwrites all three fields from the server, or from the fallback
    /// chain (cache, then defaults) when the fetch fails. The theme is
    /// reflected into the display context either way.
    pub async fn refresh(&self) {
        let settings = match self.api.fetch().await {
            Ok(fetched) => {
                self.cache.save(&fetched);
                fetched
            }
            Err(err) => {
                log::warn!("settings fetch failed, using local fallback: {err}");
                self.cache.load().unwrap_or_default()
            }
        };
        self.sink.apply(settings.theme);
        *self.state.write().unwrap() = settings;
    }

    pub fn user_name(&self) -> String {
        self.state.read().unwrap().user_name.clone()
    }

    pub fn theme(&self) -> Theme {
        self.state.read().unwrap().theme
    }

    pub fn items_per_page(&self) -> u32 {
        self.state.read().unwrap().items_per_page
    }

    /// The full current triple.
    pub fn snapshot(&self) -> Settings {
        self.state.read().unwrap().clone()
    }

    pub async fn update_user_name(&self, name: &str) {
        let snapshot = {
            let mut state = self.state.write().unwrap();
            state.user_name = name.to_string();
            state.clone()
        };
        self.write_through(snapshot).await;
    }

    pub async fn set_theme(&self, theme: Theme) {
        let snapshot = {
            let mut state = self.state.write().unwrap();
            state.theme = theme;
            state.clone()
        };
        self.sink.apply(theme);
        self.write_through(snapshot).await;
    }

    pub async fn set_items_per_page(&self, count: u32) {
        let snapshot = {
            let mut state = self.state.write().unwrap();
            state.items_per_page = count;
            state.clone()
        };
        self.write_through(snapshot).await;
    }

    /// The local field and the cache are already updated when the push
    /// starts; a push failure is logged and never rolled back, so client
    /// and server may diverge until the next successful fetch or write.
    /// Concurrent mutator calls race — last write to land wins.
    async fn write_through(&self, snapshot: Settings) {
        self.cache.save(&snapshot);
        if let Err(err) = self.api.push(&snapshot).await {
            log::warn!("settings push failed, keeping local state: {err}");
        }
    }
}
