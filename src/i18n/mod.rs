//! Bundled user-facing strings.

/// Static `en`/`fr` catalogs and lookup.
pub mod catalog;
