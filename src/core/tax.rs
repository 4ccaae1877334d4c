//! Tax arithmetic and persisted tax settings.
//!
//! Rates are percentages. Results are not rounded; round at display time.

use crate::errors::Result;
use crate::storage::{Loaded, Storage, TAX_SETTINGS_KEY, load_json, save_json};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Tax owed on `price` at `tax_rate` percent.
#[must_use]
pub fn calculate_tax(price: f64, tax_rate: f64) -> f64 {
    price * (tax_rate / 100.0)
}

/// `price` plus the tax owed on it.
#[must_use]
pub fn calculate_price_with_tax(price: f64, tax_rate: f64) -> f64 {
    price + calculate_tax(price, tax_rate)
}

/// Store-wide tax configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxSettings {
    /// Apply tax to displayed prices
    pub enabled: bool,
    /// Rate in percent
    pub rate: f64,
}

impl TaxSettings {
    /// Tax-inclusive price when tax is enabled, else `price` unchanged.
    #[must_use]
    pub fn apply(&self, price: f64) -> f64 {
        if self.enabled {
            calculate_price_with_tax(price, self.rate)
        } else {
            price
        }
    }
}

/// Loads the tax settings, defaulting to disabled.
pub async fn get_tax_settings(storage: &dyn Storage) -> Loaded<TaxSettings> {
    load_json(storage, TAX_SETTINGS_KEY).await
}

/// Persists the tax settings.
pub async fn save_tax_settings(storage: &dyn Storage, settings: &TaxSettings) -> Result<()> {
    save_json(storage, TAX_SETTINGS_KEY, settings).await?;
    info!(
        "Saved tax settings (enabled: {}, rate: {}%)",
        settings.enabled, settings.rate
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::storage::{LoadSource, MemoryStorage};

    #[test]
    fn test_calculate_tax() {
        assert_eq!(calculate_tax(100.0, 20.0), 20.0);
        assert_eq!(calculate_tax(100.0, 0.0), 0.0);
        assert_eq!(calculate_tax(0.0, 20.0), 0.0);
    }

    #[test]
    fn test_calculate_price_with_tax() {
        assert_eq!(calculate_price_with_tax(100.0, 20.0), 120.0);
        assert_eq!(calculate_price_with_tax(100.0, 0.0), 100.0);
    }

    #[test]
    fn test_no_rounding_is_applied() {
        let tax = calculate_tax(9.99, 8.25);
        assert!((tax - 0.824_175).abs() < 1e-12);
    }

    #[test]
    fn test_settings_apply() {
        let disabled = TaxSettings {
            enabled: false,
            rate: 20.0,
        };
        assert_eq!(disabled.apply(100.0), 100.0);

        let enabled = TaxSettings {
            enabled: true,
            rate: 20.0,
        };
        assert_eq!(enabled.apply(100.0), 120.0);
    }

    #[tokio::test]
    async fn test_tax_settings_default_and_persist() -> Result<()> {
        let storage = MemoryStorage::new();

        let initial = get_tax_settings(&storage).await;
        assert_eq!(initial.source, LoadSource::Missing);
        assert_eq!(initial.value, TaxSettings::default());

        let settings = TaxSettings {
            enabled: true,
            rate: 7.5,
        };
        save_tax_settings(&storage, &settings).await?;
        assert_eq!(get_tax_settings(&storage).await.value, settings);
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupt_tax_settings_recover_to_disabled() -> Result<()> {
        let storage = MemoryStorage::new();
        storage.set(TAX_SETTINGS_KEY, "7.5%").await?;

        let loaded = get_tax_settings(&storage).await;
        assert!(loaded.was_recovered());
        assert!(!loaded.value.enabled);
        Ok(())
    }
}
