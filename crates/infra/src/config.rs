use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_CATALOG_PAGE_SIZE: usize = 3;

/// Runtime knobs for the storefront services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Page size for catalog item listings when the caller gives no limit.
    pub catalog_page_size: usize,
    /// Drop settled entries from the cart once their order is recorded.
    pub clear_cart_on_order: bool,
    /// Seed document loaded at startup, if any.
    pub seed_file: Option<PathBuf>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            catalog_page_size: DEFAULT_CATALOG_PAGE_SIZE,
            clear_cart_on_order: true,
            seed_file: None,
        }
    }
}

impl StorefrontConfig {
    /// Read `STOREFRONT_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unset keys keep their defaults; unparseable
    /// values are logged and also fall back to the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let catalog_page_size = parse_or(
            &lookup,
            "STOREFRONT_CATALOG_PAGE_SIZE",
            defaults.catalog_page_size,
        );
        let clear_cart_on_order = parse_or(
            &lookup,
            "STOREFRONT_CLEAR_CART_ON_ORDER",
            defaults.clear_cart_on_order,
        );
        let seed_file = lookup("STOREFRONT_SEED_FILE")
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from);

        Self {
            catalog_page_size,
            clear_cart_on_order,
            seed_file,
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Debug,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(
                key,
                value = %raw,
                default = ?default,
                "unparseable config value; using default"
            );
            default
        }
    }
}
