//! Persisted player settings
//!
//! Only the difficulty survives a page reload. It is stored as a bare string
//! (`easy|normal|hard`) in LocalStorage; anything missing or unrecognized
//! falls back to `normal`.

use crate::sim::Difficulty;

/// Player settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Settings {
    /// Last chosen difficulty
    pub difficulty: Difficulty,
}

impl Settings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "goora_difficulty";

    /// Build settings from the raw stored value
    pub fn from_stored(value: Option<&str>) -> Self {
        let difficulty = match value {
            None => Difficulty::default(),
            Some(raw) => Difficulty::parse(raw).unwrap_or_else(|| {
                log::warn!("Unknown stored difficulty {:?}, using normal", raw);
                Difficulty::default()
            }),
        };
        Self { difficulty }
    }

    /// Value written to storage
    pub fn stored_value(&self) -> &'static str {
        self.difficulty.as_str()
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        let Some(storage) = storage else {
            log::warn!("LocalStorage unavailable, using default settings");
            return Self::default();
        };

        let stored = storage.get_item(Self::STORAGE_KEY).ok().flatten();
        let settings = Self::from_stored(stored.as_deref());
        log::info!("Loaded difficulty: {}", settings.stored_value());
        settings
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if storage.set_item(Self::STORAGE_KEY, self.stored_value()).is_ok() {
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
