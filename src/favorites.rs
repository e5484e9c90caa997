use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Mutex;

/// Where the favorites set lives between runs.
pub trait FavoritesStore: Send + Sync {
    fn load(&self) -> Result<BTreeSet<String>, AppError>;
    fn save(&self, favorites: &BTreeSet<String>) -> Result<(), AppError>;
}

impl<S: FavoritesStore + ?Sized> FavoritesStore for Box<S> {
    fn load(&self) -> Result<BTreeSet<String>, AppError> {
        (**self).load()
    }

    fn save(&self, favorites: &BTreeSet<String>) -> Result<(), AppError> {
        (**self).save(favorites)
    }
}

#[derive(Serialize, Deserialize, Default)]
struct FavoritesFile {
    #[serde(default)]
    favorites: Vec<String>,
}

/// Stores `{"favorites": [...]}` in a JSON file. A missing file reads as empty.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FavoritesStore for JsonFileStore {
    fn load(&self) -> Result<BTreeSet<String>, AppError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No favorites file at {}, starting empty", self.path.display());
                return Ok(BTreeSet::new());
            }
            Err(e) => return Err(e.into()),
        };

        let file: FavoritesFile = serde_json::from_str(&contents).map_err(|e| {
            AppError::StorageError(format!("{}: {}", self.path.display(), e))
        })?;
        Ok(file.favorites.into_iter().collect())
    }

    fn save(&self, favorites: &BTreeSet<String>) -> Result<(), AppError> {
        let file = FavoritesFile {
            favorites: favorites.iter().cloned().collect(),
        };
        let contents = serde_json::to_string_pretty(&file)?;
        std::fs::write(&self.path, contents)?;
        tracing::debug!("Saved {} favorites to {}", favorites.len(), self.path.display());
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    saved: Mutex<BTreeSet<String>>,
}

impl MemoryStore {
    pub fn with(names: &[&str]) -> Self {
        Self {
            saved: Mutex::new(names.iter().map(|name| name.to_string()).collect()),
        }
    }
}

impl FavoritesStore for MemoryStore {
    fn load(&self) -> Result<BTreeSet<String>, AppError> {
        self.saved
            .lock()
            .map(|saved| saved.clone())
            .map_err(|e| AppError::StorageError(e.to_string()))
    }

    fn save(&self, favorites: &BTreeSet<String>) -> Result<(), AppError> {
        let mut saved = self
            .saved
            .lock()
            .map_err(|e| AppError::StorageError(e.to_string()))?;
        *saved = favorites.clone();
        Ok(())
    }
}

/// The user's favorite entry names. Every mutation is written through to the store.
pub struct Favorites<S: FavoritesStore> {
    names: BTreeSet<String>,
    store: S,
}

impl<S: FavoritesStore> Favorites<S> {
    pub fn load(store: S) -> Result<Self, AppError> {
        let names = store.load()?;
        tracing::info!("Loaded {} favorites", names.len());
        Ok(Self { names, store })
    }

    pub fn is_favorite(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn list(&self) -> Vec<String> {
        self.names.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns whether the set changed.
    pub fn add(&mut self, name: &str) -> Result<bool, AppError> {
        if self.names.contains(name) {
            return Ok(false);
        }
        let mut next = self.names.clone();
        next.insert(name.to_string());
        self.commit(next)?;
        Ok(true)
    }

    /// Returns whether the set changed.
    pub fn remove(&mut self, name: &str) -> Result<bool, AppError> {
        if !self.names.contains(name) {
            return Ok(false);
        }
        let mut next = self.names.clone();
        next.remove(name);
        self.commit(next)?;
        Ok(true)
    }

    /// Returns whether `name` is a favorite afterwards.
    pub fn toggle(&mut self, name: &str) -> Result<bool, AppError> {
        if self.is_favorite(name) {
            self.remove(name)?;
            Ok(false)
        } else {
            self.add(name)?;
            Ok(true)
        }
    }

    pub fn clear(&mut self) -> Result<(), AppError> {
        self.commit(BTreeSet::new())
    }

    /// Replaces the set. Empty names are dropped and duplicates collapse.
    pub fn set_favorites<I, T>(&mut self, names: I) -> Result<(), AppError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let next = names
            .into_iter()
            .map(Into::into)
            .filter(|name| !name.is_empty())
            .collect();
        self.commit(next)
    }

    // The in-memory set only changes once the store has accepted it
    fn commit(&mut self, next: BTreeSet<String>) -> Result<(), AppError> {
        if let Err(e) = self.store.save(&next) {
            tracing::error!("Failed to persist favorites: {}", e);
            return Err(e);
        }
        self.names = next;
        Ok(())
    }
}
