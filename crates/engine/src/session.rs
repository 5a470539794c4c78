//! Per-session user preferences.
//!
//! Shared by everything acting on behalf of one user session, usually
//! behind an `Arc`. Reads take a shared lock; writes are last-write-wins.

use std::fmt;
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::info;

use cartwheel_core::Theme;

/// Called with the new theme whenever it is set.
pub type ThemeHook = Box<dyn Fn(Theme) + Send + Sync>;

/// Point-in-time copy of the preferences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub is_admin: bool,
    pub theme: Theme,
}

pub struct SessionPreferences {
    state: RwLock<Preferences>,
    on_theme_change: Option<ThemeHook>,
}

impl SessionPreferences {
    /// Non-admin, light theme, no hook.
    #[must_use]
    pub fn new() -> Self {
        Self::from_preferences(Preferences::default())
    }

    #[must_use]
    pub fn from_preferences(preferences: Preferences) -> Self {
        Self {
            state: RwLock::new(preferences),
            on_theme_change: None,
        }
    }

    /// Install the hook that applies a theme to the presentation layer.
    #[must_use]
    pub fn with_theme_hook(mut self, hook: impl Fn(Theme) + Send + Sync + 'static) -> Self {
        self.on_theme_change = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.read().is_admin
    }

    pub fn set_admin(&self, is_admin: bool) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .is_admin = is_admin;
        info!(is_admin, "Updated admin preference");
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.read().theme
    }

    /// Store the theme, then run the hook (outside the lock).
    ///
    /// The hook runs even when the theme is unchanged so the presentation
    /// layer can be re-synced on demand.
    pub fn set_theme(&self, theme: Theme) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .theme = theme;
        info!(%theme, "Updated theme preference");
        if let Some(hook) = &self.on_theme_change {
            hook(theme);
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Preferences {
        self.read()
    }

    fn read(&self) -> Preferences {
        *self.state.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SessionPreferences {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SessionPreferences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionPreferences")
            .field("state", &self.read())
            .field("has_theme_hook", &self.on_theme_change.is_some())
            .finish()
    }
}
