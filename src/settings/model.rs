use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::core::{Fps, Timing};
use crate::foundation::error::{TitleCardError, TitleCardResult};
use crate::settings::color::Color;

/// Name rendered when the configured character name is blank.
pub const PLACEHOLDER_NAME: &str = "CHARACTER NAME";
/// Maximum number of Unicode scalar values in a character name.
pub const MAX_NAME_CHARS: usize = 40;
/// Maximum number of units in a [`TitleSequence`].
pub const MAX_SEQUENCE_UNITS: usize = 16;
/// Largest accepted `round(duration * fps)`.
pub const MAX_TOTAL_FRAMES: u64 = 100_000;
/// Token inside a [`TitleUnit::text`] that expands to the character name.
pub const NAME_TOKEN: &str = "{name}";

/// CSS-style numeric font weight (`100..=900`).
///
/// Deserializes from a number or from the keywords `normal`, `bold` and `black`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FontWeight(pub u16);

impl FontWeight {
    /// `400`.
    pub const NORMAL: Self = Self(400);
    /// `700`.
    pub const BOLD: Self = Self(700);
    /// `900`.
    pub const BLACK: Self = Self(900);

    /// Parse a keyword or a numeric weight.
    pub fn parse(s: &str) -> TitleCardResult<Self> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "normal" | "regular" => Ok(Self::NORMAL),
            "bold" => Ok(Self::BOLD),
            "black" | "heavy" => Ok(Self::BLACK),
            other => other
                .parse::<u16>()
                .map(Self)
                .map_err(|_| TitleCardError::validation(format!("unknown font weight \"{s}\""))),
        }
    }
}

impl serde::Serialize for FontWeight {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.0)
    }
}

impl<'de> serde::Deserialize<'de> for FontWeight {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Num(u16),
            Name(String),
        }
        match Repr::deserialize(deserializer)? {
            Repr::Num(n) => Ok(Self(n)),
            Repr::Name(s) => Self::parse(&s).map_err(serde::de::Error::custom),
        }
    }
}

/// Which schedule drives the title text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// One unit at a time, cross-dissolving, each centered and zooming.
    #[default]
    Pieces,
    /// All units on a single line, revealed cumulatively.
    Line,
}

impl std::str::FromStr for Layout {
    type Err = TitleCardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pieces" => Ok(Self::Pieces),
            "line" => Ok(Self::Line),
            other => Err(TitleCardError::validation(format!(
                "unknown layout \"{other}\" (expected pieces|line)"
            ))),
        }
    }
}

/// Independent post-processing toggles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Effects {
    /// Radial darkening toward the edges.
    pub vignette: bool,
    /// Faint horizontal lines every 4 px.
    pub scanlines: bool,
    /// Per-pixel random luminance noise.
    pub grain: bool,
    /// Accent-colored glow behind text.
    pub text_shadow: bool,
}

impl Default for Effects {
    fn default() -> Self {
        Self {
            vignette: true,
            scanlines: false,
            grain: false,
            text_shadow: true,
        }
    }
}

/// One labeled piece of the title text.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleUnit {
    /// Literal text; [`NAME_TOKEN`] expands to the character name.
    pub text: String,
    /// Full opacity and glow throughout the line layout.
    #[serde(default)]
    pub highlight: bool,
    /// Weight override for the pieces layout; `None` uses [`Settings::font_weight`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<FontWeight>,
    /// Size multiplier for the pieces layout.
    #[serde(default = "one")]
    pub size_mult: f64,
}

fn one() -> f64 {
    1.0
}

impl TitleUnit {
    /// Unit with default highlight/weight/size.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            highlight: false,
            weight: None,
            size_mult: 1.0,
        }
    }

    /// Mark the unit as highlighted.
    pub fn highlighted(mut self) -> Self {
        self.highlight = true;
        self
    }

    /// Override the weight used by the pieces layout.
    pub fn weight(mut self, weight: FontWeight) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Set the pieces-layout size multiplier.
    pub fn size_mult(mut self, mult: f64) -> Self {
        self.size_mult = mult;
        self
    }

    /// Upper-cased text with the name token expanded.
    pub fn resolve(&self, name: &str) -> String {
        self.text.replace(NAME_TOKEN, name).to_uppercase()
    }
}

/// Ordered text units walked by both layouts.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct TitleSequence(pub Vec<TitleUnit>);

impl TitleSequence {
    /// Units in order.
    pub fn units(&self) -> &[TitleUnit] {
        &self.0
    }

    /// Number of units.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return `true` when the sequence has no units.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for TitleSequence {
    fn default() -> Self {
        Self(vec![
            TitleUnit::new(NAME_TOKEN).highlighted(),
            TitleUnit::new("WILL")
                .highlighted()
                .weight(FontWeight::BLACK)
                .size_mult(1.2),
            TitleUnit::new("RETURN")
                .highlighted()
                .weight(FontWeight::BLACK)
                .size_mult(1.2),
            TitleUnit::new("IN AVENGERS:").size_mult(0.8),
            TitleUnit::new("DOOMSDAY")
                .weight(FontWeight::BLACK)
                .size_mult(1.5),
        ])
    }
}

/// Immutable snapshot of everything a frame render depends on.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Name substituted into the sequence.
    pub character_name: String,
    /// CSS-style family stack; the first available family wins.
    pub font_family: String,
    /// Base weight.
    pub font_weight: FontWeight,
    /// Base size in pixels.
    pub font_size: u32,
    /// Extra pixels between characters; may be negative.
    pub letter_spacing: i32,
    /// Text fill.
    pub text_color: Color,
    /// Glow color.
    pub accent_color: Color,
    /// Background fill.
    pub bg_color: Color,
    /// Animation length in seconds.
    pub duration: f64,
    /// Frames per second.
    pub fps: u32,
    /// Text schedule.
    pub layout: Layout,
    /// Post-processing toggles.
    pub effects: Effects,
    /// Title text units.
    pub sequence: TitleSequence,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            character_name: "VICTOR VON DOOM".to_owned(),
            font_family: "Neo Sans Std".to_owned(),
            font_weight: FontWeight::BOLD,
            font_size: 120,
            letter_spacing: 12,
            text_color: Color::WHITE,
            accent_color: Color::rgba(
                f64::from(0x4Au8) / 255.0,
                f64::from(0x7Cu8) / 255.0,
                f64::from(0x2Cu8) / 255.0,
                1.0,
            ),
            bg_color: Color::BLACK,
            duration: 5.0,
            fps: 30,
            layout: Layout::Pieces,
            effects: Effects::default(),
            sequence: TitleSequence::default(),
        }
    }
}

impl Settings {
    /// Parse settings from a JSON reader and validate them.
    pub fn from_reader<R: std::io::Read>(r: R) -> TitleCardResult<Self> {
        let settings: Self = serde_json::from_reader(r)
            .map_err(|e| TitleCardError::validation(format!("parse settings JSON: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from a JSON file on disk and validate them.
    pub fn from_path(path: impl AsRef<Path>) -> TitleCardResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            TitleCardError::validation(format!("open settings JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check every invariant a render relies on.
    pub fn validate(&self) -> TitleCardResult<()> {
        let name_len = self.character_name.chars().count();
        if name_len > MAX_NAME_CHARS {
            return Err(TitleCardError::validation(format!(
                "characterName must be at most {MAX_NAME_CHARS} characters (got {name_len})"
            )));
        }
        if self.font_size == 0 {
            return Err(TitleCardError::validation("fontSize must be > 0"));
        }
        if self.font_family.trim().is_empty() {
            return Err(TitleCardError::validation("fontFamily must not be empty"));
        }
        if !(1..=1000).contains(&self.font_weight.0) {
            return Err(TitleCardError::validation(
                "fontWeight must be in 1..=1000",
            ));
        }
        let timing = self.timing()?;
        let total = timing.total_frames();
        if total == 0 {
            return Err(TitleCardError::validation(
                "duration * fps must round to at least one frame",
            ));
        }
        if total > MAX_TOTAL_FRAMES {
            return Err(TitleCardError::validation(format!(
                "duration * fps must be at most {MAX_TOTAL_FRAMES} frames (got {total})"
            )));
        }
        if self.sequence.is_empty() {
            return Err(TitleCardError::validation("sequence must not be empty"));
        }
        if self.sequence.len() > MAX_SEQUENCE_UNITS {
            return Err(TitleCardError::validation(format!(
                "sequence must have at most {MAX_SEQUENCE_UNITS} units"
            )));
        }
        let name = self.display_name();
        for (i, unit) in self.sequence.units().iter().enumerate() {
            if unit.resolve(name).trim().is_empty() {
                return Err(TitleCardError::validation(format!(
                    "sequence[{i}].text must not be blank"
                )));
            }
            if !unit.size_mult.is_finite() || unit.size_mult <= 0.0 {
                return Err(TitleCardError::validation(format!(
                    "sequence[{i}].sizeMult must be finite and > 0"
                )));
            }
        }
        Ok(())
    }

    /// Duration/fps pair driving progress.
    pub fn timing(&self) -> TitleCardResult<Timing> {
        Timing::new(self.duration, Fps::new(self.fps, 1)?)
    }

    /// `round(duration * fps)`, or 0 when the timing is invalid.
    pub fn total_frames(&self) -> u64 {
        self.timing().map(Timing::total_frames).unwrap_or(0)
    }

    /// Character name with the placeholder substituted for blank input.
    pub fn display_name(&self) -> &str {
        let trimmed = self.character_name.trim();
        if trimmed.is_empty() {
            PLACEHOLDER_NAME
        } else {
            trimmed
        }
    }

    /// Family names in the order they should be tried, quotes stripped.
    pub fn font_stack(&self) -> Vec<String> {
        parse_family_stack(&self.font_family)
    }

    /// Build a validated copy with `update` merged in. `self` is left untouched.
    pub fn apply(&self, update: &SettingsUpdate) -> TitleCardResult<Self> {
        let mut next = self.clone();
        update.merge_into(&mut next);
        next.validate()?;
        Ok(next)
    }

    /// Merge `update` in place, atomically: on error `self` keeps its previous value.
    pub fn merge(&mut self, update: &SettingsUpdate) -> TitleCardResult<()> {
        *self = self.apply(update)?;
        Ok(())
    }
}

pub(crate) fn parse_family_stack(stack: &str) -> Vec<String> {
    stack
        .split(',')
        .map(|f| f.trim().trim_matches(|c| c == '"' || c == '\'').trim())
        .filter(|f| !f.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Partial update of [`Effects`] flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EffectsUpdate {
    /// New vignette flag.
    pub vignette: Option<bool>,
    /// New scanlines flag.
    pub scanlines: Option<bool>,
    /// New grain flag.
    pub grain: Option<bool>,
    /// New text-shadow flag.
    pub text_shadow: Option<bool>,
}

/// Field-wise partial update of [`Settings`]; `None` keeps the current value.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsUpdate {
    /// New character name.
    pub character_name: Option<String>,
    /// New family stack.
    pub font_family: Option<String>,
    /// New base weight.
    pub font_weight: Option<FontWeight>,
    /// New base size.
    pub font_size: Option<u32>,
    /// New letter spacing.
    pub letter_spacing: Option<i32>,
    /// New text color.
    pub text_color: Option<Color>,
    /// New accent color.
    pub accent_color: Option<Color>,
    /// New background color.
    pub bg_color: Option<Color>,
    /// New duration in seconds.
    pub duration: Option<f64>,
    /// New frame rate.
    pub fps: Option<u32>,
    /// New layout.
    pub layout: Option<Layout>,
    /// Effect flag changes.
    pub effects: EffectsUpdate,
    /// Replacement sequence.
    pub sequence: Option<TitleSequence>,
}

macro_rules! update_setter {
    ($(#[$doc:meta] $field:ident: $ty:ty),* $(,)?) => {
        $(
            #[$doc]
            pub fn $field(mut self, v: $ty) -> Self {
                self.$field = Some(v);
                self
            }
        )*
    };
}

impl SettingsUpdate {
    /// Empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the character name.
    pub fn character_name(mut self, name: impl Into<String>) -> Self {
        self.character_name = Some(name.into());
        self
    }

    /// Set the family stack.
    pub fn font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }

    update_setter! {
        /// Set the base weight.
        font_weight: FontWeight,
        /// Set the base size.
        font_size: u32,
        /// Set the letter spacing.
        letter_spacing: i32,
        /// Set the text color.
        text_color: Color,
        /// Set the accent color.
        accent_color: Color,
        /// Set the background color.
        bg_color: Color,
        /// Set the duration in seconds.
        duration: f64,
        /// Set the frame rate.
        fps: u32,
        /// Set the layout.
        layout: Layout,
        /// Replace the sequence.
        sequence: TitleSequence,
    }

    /// Toggle the vignette.
    pub fn vignette(mut self, on: bool) -> Self {
        self.effects.vignette = Some(on);
        self
    }

    /// Toggle scanlines.
    pub fn scanlines(mut self, on: bool) -> Self {
        self.effects.scanlines = Some(on);
        self
    }

    /// Toggle grain.
    pub fn grain(mut self, on: bool) -> Self {
        self.effects.grain = Some(on);
        self
    }

    /// Toggle the text glow.
    pub fn text_shadow(mut self, on: bool) -> Self {
        self.effects.text_shadow = Some(on);
        self
    }

    /// Layer `other` on top of `self`; fields set in `other` win.
    pub fn then(mut self, other: &SettingsUpdate) -> Self {
        fn pick<T: Clone>(dst: &mut Option<T>, src: &Option<T>) {
            if src.is_some() {
                dst.clone_from(src);
            }
        }
        pick(&mut self.character_name, &other.character_name);
        pick(&mut self.font_family, &other.font_family);
        pick(&mut self.font_weight, &other.font_weight);
        pick(&mut self.font_size, &other.font_size);
        pick(&mut self.letter_spacing, &other.letter_spacing);
        pick(&mut self.text_color, &other.text_color);
        pick(&mut self.accent_color, &other.accent_color);
        pick(&mut self.bg_color, &other.bg_color);
        pick(&mut self.duration, &other.duration);
        pick(&mut self.fps, &other.fps);
        pick(&mut self.layout, &other.layout);
        pick(&mut self.sequence, &other.sequence);
        pick(&mut self.effects.vignette, &other.effects.vignette);
        pick(&mut self.effects.scanlines, &other.effects.scanlines);
        pick(&mut self.effects.grain, &other.effects.grain);
        pick(&mut self.effects.text_shadow, &other.effects.text_shadow);
        self
    }

    /// Return `true` when the update would change nothing.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    fn merge_into(&self, s: &mut Settings) {
        fn set<T: Clone>(dst: &mut T, src: &Option<T>) {
            if let Some(v) = src {
                dst.clone_from(v);
            }
        }
        set(&mut s.character_name, &self.character_name);
        set(&mut s.font_family, &self.font_family);
        set(&mut s.font_weight, &self.font_weight);
        set(&mut s.font_size, &self.font_size);
        set(&mut s.letter_spacing, &self.letter_spacing);
        set(&mut s.text_color, &self.text_color);
        set(&mut s.accent_color, &self.accent_color);
        set(&mut s.bg_color, &self.bg_color);
        set(&mut s.duration, &self.duration);
        set(&mut s.fps, &self.fps);
        set(&mut s.layout, &self.layout);
        set(&mut s.sequence, &self.sequence);
        set(&mut s.effects.vignette, &self.effects.vignette);
        set(&mut s.effects.scanlines, &self.effects.scanlines);
        set(&mut s.effects.grain, &self.effects.grain);
        set(&mut s.effects.text_shadow, &self.effects.text_shadow);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/settings/model.rs"]
mod tests;
