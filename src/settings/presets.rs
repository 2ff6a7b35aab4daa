//! Named style bundles layered onto [`Settings`](crate::Settings).

use crate::settings::color::Color;
use crate::settings::model::{Layout, SettingsUpdate};

/// Preset used when a requested name is unknown.
pub const DEFAULT_PRESET: &str = "classic";

struct Preset {
    name: &'static str,
    build: fn() -> SettingsUpdate,
}

const PRESETS: &[Preset] = &[
    Preset {
        name: "classic",
        build: classic,
    },
    Preset {
        name: "modern",
        build: modern,
    },
    Preset {
        name: "comic",
        build: comic,
    },
    Preset {
        name: "infinity",
        build: infinity,
    },
    Preset {
        name: "multiverse",
        build: multiverse,
    },
    Preset {
        name: "inline",
        build: inline,
    },
];

fn hex(s: &str) -> Color {
    Color::from_hex(s).unwrap_or(Color::WHITE)
}

fn style(
    family: &str,
    size: u32,
    spacing: i32,
    text: &str,
    accent: &str,
    [vignette, scanlines, grain, shadow]: [bool; 4],
) -> SettingsUpdate {
    SettingsUpdate::new()
        .font_family(family)
        .font_size(size)
        .letter_spacing(spacing)
        .text_color(hex(text))
        .accent_color(hex(accent))
        .vignette(vignette)
        .scanlines(scanlines)
        .grain(grain)
        .text_shadow(shadow)
}

fn classic() -> SettingsUpdate {
    style(
        "'Neo Sans Std', sans-serif",
        100,
        12,
        "#FFFFFF",
        "#4A7C2C",
        [true, false, false, true],
    )
    .layout(Layout::Line)
}

fn modern() -> SettingsUpdate {
    style(
        "'Bebas Neue', sans-serif",
        120,
        15,
        "#FFFFFF",
        "#00FF88",
        [false, true, true, true],
    )
}

fn comic() -> SettingsUpdate {
    style(
        "'Anton', sans-serif",
        110,
        5,
        "#FFFF00",
        "#FF0000",
        [true, false, true, true],
    )
}

fn infinity() -> SettingsUpdate {
    style(
        "'Oswald', sans-serif",
        84,
        20,
        "#FFFFFF",
        "#9B51E0",
        [true, true, false, true],
    )
}

fn multiverse() -> SettingsUpdate {
    style(
        "'Roboto Condensed', sans-serif",
        96,
        10,
        "#00FFFF",
        "#FF00FF",
        [true, true, true, true],
    )
}

fn inline() -> SettingsUpdate {
    style(
        "'Neo Sans Std', sans-serif",
        50,
        10,
        "#FFFFFF",
        "#4A7C2C",
        [true, false, false, true],
    )
    .layout(Layout::Line)
}

/// Names of every built-in preset, in display order.
pub fn preset_names() -> impl Iterator<Item = &'static str> {
    PRESETS.iter().map(|p| p.name)
}

/// Look up a preset by exact (case-insensitive) name.
pub fn find_preset(name: &str) -> Option<SettingsUpdate> {
    PRESETS
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
        .map(|p| (p.build)())
}

/// Look up a preset, falling back to [`DEFAULT_PRESET`] for unknown names.
pub fn preset(name: &str) -> SettingsUpdate {
    find_preset(name).unwrap_or_else(|| {
        tracing::warn!(preset = name, fallback = DEFAULT_PRESET, "unknown preset");
        classic()
    })
}

#[cfg(test)]
#[path = "../../tests/unit/settings/presets.rs"]
mod tests;
