use crate::models::settings::Settings;

use super::bitstamp::BitstampProvider;
use super::traits::PriceProvider;

/// Ordered list of price providers.
///
/// The first registered provider is the primary; the others are tried in
/// registration order when it fails.
pub struct PriceProviderRegistry {
    providers: Vec<Box<dyn PriceProvider>>,
}

impl PriceProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Create a registry with Bitstamp at its public endpoint.
    pub fn new_with_defaults() -> Self {
        Self::from_settings(&Settings::default())
    }

    /// Create a registry with Bitstamp configured from `settings`.
    pub fn from_settings(settings: &Settings) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(BitstampProvider::with_base_url(
            settings.api_base_url.clone(),
            settings.request_timeout_secs,
        )));
        registry
    }

    /// Register a new price provider after the existing ones.
    pub fn register(&mut self, provider: Box<dyn PriceProvider>) {
        self.providers.push(provider);
    }

    /// The primary provider, if any.
    pub fn primary(&self) -> Option<&dyn PriceProvider> {
        self.providers.first().map(|p| p.as_ref())
    }

    /// All providers in fallback order.
    pub fn providers(&self) -> Vec<&dyn PriceProvider> {
        self.providers.iter().map(|p| p.as_ref()).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for PriceProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
