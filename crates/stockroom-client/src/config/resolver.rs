//! Overrides applied after loading.
//!
//! ```text
//! ConfigLoader.load()  →  StockroomConfig (base)
//!                              │
//!                              ▼
//!                     ConfigResolver.apply()   (CLI flags)
//!                              │
//!                              ▼
//!                     StockroomConfig (final)
//! ```

use super::StockroomConfig;

/// Applies overrides to a loaded configuration.
///
/// Implementors apply only the values they actually carry, leaving the
/// rest untouched.
pub trait ConfigResolver {
    fn apply(&self, config: &mut StockroomConfig);
}

/// Resolver that changes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpResolver;

impl ConfigResolver for NoOpResolver {
    fn apply(&self, _config: &mut StockroomConfig) {}
}
