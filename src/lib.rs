//! Core of the portfolio terminal app: the theme catalog, the persisted
//! preference store that rotates themes, the style variables it publishes,
//! localization and configuration.

pub mod config;
pub mod error;
pub mod i18n;
pub mod persistence;
pub mod preferences;
pub mod style;
pub mod theme;

pub use error::{Error, Result};
pub use preferences::{PreferenceSnapshot, PreferenceStore};
pub use style::StyleRoot;
pub use theme::{ThemeDefinition, THEMES};
