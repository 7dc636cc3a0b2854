use crate::application::collaborators::{AppContext, Screen};
use crate::domain::{ScreenResult, ThemeVariant};
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Resolves the top-level screen of a theme.
#[async_trait(?Send)]
pub trait ThemeLoader {
    async fn resolve(&self, app: &AppContext<'_>) -> ScreenResult<Box<dyn Screen>>;
}

/// Variant -> loader table. The evolution theme needs no entry; it is
/// served by the regular screen registry.
#[derive(Default)]
pub struct ThemeRegistry {
    loaders: BTreeMap<ThemeVariant, Box<dyn ThemeLoader>>,
}

impl ThemeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, variant: ThemeVariant, loader: Box<dyn ThemeLoader>) {
        self.loaders.insert(variant, loader);
    }

    pub fn with(mut self, variant: ThemeVariant, loader: Box<dyn ThemeLoader>) -> Self {
        self.register(variant, loader);
        self
    }

    pub fn get(&self, variant: ThemeVariant) -> Option<&dyn ThemeLoader> {
        self.loaders.get(&variant).map(|loader| loader.as_ref())
    }
}
