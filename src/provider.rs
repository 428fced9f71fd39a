//! Asynchronous lookup of creature definitions.
//!
//! The resolver reaches creature data only through [`CreatureProvider`], so a
//! match can run against an in-memory roster, a remote service, or a test
//! fixture without changing the engine.
use crate::errors::{DataError, DataResult, ProviderError};
use async_trait::async_trait;
use schema::CreatureDefinition;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tokio::sync::RwLock;

/// Source of creature definitions, keyed by name.
///
/// `Ok(None)` means the provider answered and the creature does not exist;
/// `Err` means the provider could not answer.
#[async_trait]
pub trait CreatureProvider: Send + Sync {
    async fn fetch(&self, identifier: &str) -> Result<Option<CreatureDefinition>, ProviderError>;
}

/// In-memory roster. Lookups ignore case and never change the catalog.
#[derive(Debug, Clone, Default)]
pub struct CatalogProvider {
    definitions: HashMap<String, CreatureDefinition>,
}

impl CatalogProvider {
    /// Every definition has its moves normalized on the way in: damaging moves
    /// only, strongest first, at most four.
    pub fn from_definitions(definitions: impl IntoIterator<Item = CreatureDefinition>) -> Self {
        let definitions = definitions
            .into_iter()
            .map(|mut definition| {
                definition.normalize_moves();
                if definition.moves.is_empty() {
                    log::warn!("{} has no damaging moves", definition.name);
                }
                (definition.name.to_lowercase(), definition)
            })
            .collect();
        Self { definitions }
    }

    /// Parse a RON list of creature definitions.
    pub fn from_ron_str(source: &str) -> DataResult<Self> {
        let definitions: Vec<CreatureDefinition> = ron::from_str(source).map_err(|source| DataError::Parse {
            origin: "roster".to_string(),
            source,
        })?;
        Ok(Self::from_definitions(definitions))
    }

    pub fn load(path: &Path) -> DataResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_ron_str(&content)?;
        log::debug!("Loaded {} creatures from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    pub fn get(&self, name: &str) -> Option<&CreatureDefinition> {
        self.definitions.get(&name.to_lowercase())
    }

    /// All definitions, sorted by id.
    pub fn definitions(&self) -> Vec<&CreatureDefinition> {
        let mut all: Vec<&CreatureDefinition> = self.definitions.values().collect();
        all.sort_by_key(|definition| definition.id);
        all
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[async_trait]
impl CreatureProvider for CatalogProvider {
    async fn fetch(&self, identifier: &str) -> Result<Option<CreatureDefinition>, ProviderError> {
        Ok(self.get(identifier).cloned())
    }
}

/// Remembers every creature the inner provider finds, so repeated lookups
/// return the same definition without asking again. Misses and failures are
/// not remembered.
pub struct CachedProvider<P> {
    inner: P,
    cache: RwLock<HashMap<String, CreatureDefinition>>,
}

impl<P: CreatureProvider> CachedProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub async fn cached_len(&self) -> usize {
        self.cache.read().await.len()
    }
}

#[async_trait]
impl<P: CreatureProvider> CreatureProvider for CachedProvider<P> {
    async fn fetch(&self, identifier: &str) -> Result<Option<CreatureDefinition>, ProviderError> {
        let key = identifier.to_lowercase();
        if let Some(definition) = self.cache.read().await.get(&key) {
            log::trace!("Cache hit for '{}'", key);
            return Ok(Some(definition.clone()));
        }

        let found = self.inner.fetch(identifier).await?;
        if let Some(definition) = &found {
            self.cache.write().await.insert(key, definition.clone());
        }
        Ok(found)
    }
}
