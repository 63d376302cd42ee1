//! Localized messages for herald.
//!
//! - [`MessageCatalog`]: the closed set of declared [`MessageKey`]s and their
//!   compiled-in default text.
//! - [`MessageRegistry`]: per-[`Locale`] overrides parsed from lang documents,
//!   falling back to the default text on any miss.
//! - [`LangDirectory`]: single-flight reload of a directory of
//!   `<lang>[_<REGION>].json` files into the registry.

mod catalog;
mod error;
mod lang;
mod locale;
mod registry;
mod report;

#[cfg(test)]
use tempfile as _;

pub use catalog::{MessageCatalog, MessageKey};
pub use error::{CatalogError, LocaleError, ReloadError};
pub use lang::{LangDirectory, ReloadState, SilentLog};
pub use locale::Locale;
pub use registry::MessageRegistry;
pub use report::{ExceptionHandler, ExceptionHandlers};
