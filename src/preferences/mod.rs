// src/preferences/mod.rs

use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

/// Key-value home for UI preferences. Only the theme flag exists today.
pub trait PreferenceStore: Send + Sync {
    fn get_dark_mode(&self) -> bool;
    fn set_dark_mode(&self, enabled: bool);
}

#[derive(Debug, Default)]
pub struct InMemoryPreferences {
    dark_mode: AtomicBool,
}

impl InMemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for InMemoryPreferences {
    fn get_dark_mode(&self) -> bool {
        self.dark_mode.load(Ordering::Relaxed)
    }

    fn set_dark_mode(&self, enabled: bool) {
        self.dark_mode.store(enabled, Ordering::Relaxed);
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct Theme {
    pub dark_mode: bool,
    pub primary_color: &'static str,
    pub secondary_color: &'static str,
}

impl Theme {
    pub fn for_mode(dark_mode: bool) -> Self {
        if dark_mode {
            Self { dark_mode, primary_color: "#669ffb", secondary_color: "#ffb639" }
        } else {
            Self { dark_mode, primary_color: "#3B82F6", secondary_color: "#F59E0B" }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ThemeUpdate {
    pub dark_mode: bool,
}
