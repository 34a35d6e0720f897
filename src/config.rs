use color_eyre::eyre::eyre;
use color_eyre::Result;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use supports_color::Stream;

use crate::sequence::{DEFAULT_LENGTH, MAX_LENGTH, MIN_LENGTH};
use crate::strip::BoxMetrics;

/// Manages config directory and config file operations
#[derive(Clone)]
pub struct ConfigManager {
    pub(crate) config_dir: PathBuf,
}

impl ConfigManager {
    /// Create a ConfigManager with a custom config directory (primarily for testing)
    pub fn with_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Create a new ConfigManager for the given app name
    pub fn new(app_name: &str) -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| eyre!("Could not determine config directory"))?
            .join(app_name);

        Ok(Self { config_dir })
    }

    /// Get path to a specific config file or subdirectory
    pub fn config_path(&self, path: &str) -> PathBuf {
        self.config_dir.join(path)
    }

    /// Ensure the config directory exists
    pub fn ensure_config_dir(&self) -> Result<()> {
        if !self.config_dir.exists() {
            std::fs::create_dir_all(&self.config_dir)?;
        }
        Ok(())
    }

    /// Generate default configuration template as a string
    pub fn generate_default_config(&self) -> String {
        DEFAULT_CONFIG_TEMPLATE.to_string()
    }

    /// Write default configuration to config file
    pub fn write_default_config(&self, force: bool) -> Result<PathBuf> {
        let config_path = self.config_path("config.toml");

        if config_path.exists() && !force {
            return Err(eyre!(
                "Config file already exists at {}. Use --force to overwrite.",
                config_path.display()
            ));
        }

        self.ensure_config_dir()?;
        std::fs::write(&config_path, DEFAULT_CONFIG_TEMPLATE)?;

        Ok(config_path)
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Configuration format version (for future compatibility)
    pub version: String,
    pub strip: StripConfig,
    pub layout: LayoutConfig,
    pub performance: PerformanceConfig,
    pub theme: ThemeConfig,
    pub debug: DebugConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StripConfig {
    pub initial_length: usize,
    /// Inserted between groups of three digits; empty disables grouping
    pub thousands_separator: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub box_width: u16,
    pub box_height: u16,
    pub box_gap: u16,
    pub min_content_width: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    pub event_poll_interval_ms: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub colors: ColorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub primary: String,
    pub background: String,
    pub text_primary: String,
    pub text_secondary: String,
    pub dimmed: String,
    pub input_fg: String,
    pub input_bg: String,
    pub box_border: String,
    pub active_box_bg: String,
    pub active_box_fg: String,
    pub box_hover: String,
    pub controls_bg: String,
    pub keybind_hints: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_to_file: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: "0.1".to_string(),
            strip: StripConfig::default(),
            layout: LayoutConfig::default(),
            performance: PerformanceConfig::default(),
            theme: ThemeConfig::default(),
            debug: DebugConfig::default(),
        }
    }
}

impl Default for StripConfig {
    fn default() -> Self {
        Self {
            initial_length: DEFAULT_LENGTH,
            thousands_separator: ",".to_string(),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let metrics = BoxMetrics::default();
        Self {
            box_width: metrics.width,
            box_height: metrics.height,
            box_gap: metrics.gap,
            min_content_width: metrics.min_content_width,
        }
    }
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            event_poll_interval_ms: 25,
        }
    }
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            primary: "cyan".to_string(),
            background: "reset".to_string(),
            text_primary: "white".to_string(),
            text_secondary: "dark_gray".to_string(),
            dimmed: "dark_gray".to_string(),
            input_fg: "white".to_string(),
            input_bg: "black".to_string(),
            box_border: "light_gray".to_string(),
            active_box_bg: "green".to_string(),
            active_box_fg: "white".to_string(),
            box_hover: "white".to_string(),
            controls_bg: "indexed(236)".to_string(),
            keybind_hints: "cyan".to_string(),
        }
    }
}

// Configuration loading and merging
impl AppConfig {
    /// Load configuration from all layers (default → user)
    pub fn load(app_name: &str) -> Result<Self> {
        let config_manager = ConfigManager::new(app_name)?;
        Self::load_with_manager(&config_manager)
    }

    /// Load configuration using the config directory of `config_manager`
    pub fn load_with_manager(config_manager: &ConfigManager) -> Result<Self> {
        let mut config = AppConfig::default();

        let user_config = Self::load_user_config(config_manager)?;
        config.merge(user_config);

        config.validate()?;

        Ok(config)
    }

    fn load_user_config(config_manager: &ConfigManager) -> Result<AppConfig> {
        let config_path = config_manager.config_path("config.toml");

        if !config_path.exists() {
            return Ok(AppConfig::default());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| {
            eyre!(
                "Failed to read config file at {}: {}",
                config_path.display(),
                e
            )
        })?;

        toml::from_str(&content).map_err(|e| {
            eyre!(
                "Failed to parse config file at {}: {}",
                config_path.display(),
                e
            )
        })
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: AppConfig) {
        if other.version != AppConfig::default().version {
            self.version = other.version;
        }

        self.strip.merge(other.strip);
        self.layout.merge(other.layout);
        self.performance.merge(other.performance);
        self.theme.merge(other.theme);
        self.debug.merge(other.debug);
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !self.version.starts_with("0.1") {
            return Err(eyre!(
                "Unsupported config version: {}. Expected 0.1.x",
                self.version
            ));
        }

        if !(MIN_LENGTH..=MAX_LENGTH).contains(&self.strip.initial_length) {
            return Err(eyre!(
                "initial_length must be between {} and {}",
                MIN_LENGTH,
                MAX_LENGTH
            ));
        }

        if self.layout.box_width == 0 {
            return Err(eyre!("box_width must be greater than 0"));
        }
        if self.layout.box_height < 3 {
            return Err(eyre!("box_height must be at least 3"));
        }
        if self.layout.min_content_width == 0 {
            return Err(eyre!("min_content_width must be greater than 0"));
        }

        if self.performance.event_poll_interval_ms == 0 {
            return Err(eyre!("event_poll_interval_ms must be greater than 0"));
        }

        let parser = ColorParser::new();
        self.theme.colors.validate(&parser)?;

        Ok(())
    }
}

impl StripConfig {
    pub fn merge(&mut self, other: Self) {
        let default = StripConfig::default();
        if other.initial_length != default.initial_length {
            self.initial_length = other.initial_length;
        }
        if other.thousands_separator != default.thousands_separator {
            self.thousands_separator = other.thousands_separator;
        }
    }
}

impl LayoutConfig {
    pub fn merge(&mut self, other: Self) {
        let default = LayoutConfig::default();
        if other.box_width != default.box_width {
            self.box_width = other.box_width;
        }
        if other.box_height != default.box_height {
            self.box_height = other.box_height;
        }
        if other.box_gap != default.box_gap {
            self.box_gap = other.box_gap;
        }
        if other.min_content_width != default.min_content_width {
            self.min_content_width = other.min_content_width;
        }
    }

    pub fn metrics(&self) -> BoxMetrics {
        BoxMetrics {
            width: self.box_width,
            height: self.box_height,
            gap: self.box_gap,
            min_content_width: self.min_content_width,
        }
    }
}

impl PerformanceConfig {
    pub fn merge(&mut self, other: Self) {
        let default = PerformanceConfig::default();
        if other.event_poll_interval_ms != default.event_poll_interval_ms {
            self.event_poll_interval_ms = other.event_poll_interval_ms;
        }
    }
}

impl ThemeConfig {
    pub fn merge(&mut self, other: Self) {
        self.colors.merge(other.colors);
    }
}

impl ColorConfig {
    /// Name and value of every configurable color
    pub fn entries(&self) -> [(&'static str, &str); 13] {
        [
            ("primary", self.primary.as_str()),
            ("background", self.background.as_str()),
            ("text_primary", self.text_primary.as_str()),
            ("text_secondary", self.text_secondary.as_str()),
            ("dimmed", self.dimmed.as_str()),
            ("input_fg", self.input_fg.as_str()),
            ("input_bg", self.input_bg.as_str()),
            ("box_border", self.box_border.as_str()),
            ("active_box_bg", self.active_box_bg.as_str()),
            ("active_box_fg", self.active_box_fg.as_str()),
            ("box_hover", self.box_hover.as_str()),
            ("controls_bg", self.controls_bg.as_str()),
            ("keybind_hints", self.keybind_hints.as_str()),
        ]
    }

    /// Validate all color strings can be parsed
    fn validate(&self, parser: &ColorParser) -> Result<()> {
        for (name, value) in self.entries() {
            parser
                .parse(value)
                .map_err(|e| eyre!("Invalid color value for '{}': {}", name, e))?;
        }
        Ok(())
    }

    pub fn merge(&mut self, other: Self) {
        let default = ColorConfig::default();

        macro_rules! merge_color {
            ($($field:ident),* $(,)?) => {
                $(
                    if other.$field != default.$field {
                        self.$field = other.$field;
                    }
                )*
            };
        }

        merge_color!(
            primary,
            background,
            text_primary,
            text_secondary,
            dimmed,
            input_fg,
            input_bg,
            box_border,
            active_box_bg,
            active_box_fg,
            box_hover,
            controls_bg,
            keybind_hints,
        );
    }
}

impl DebugConfig {
    pub fn merge(&mut self, other: Self) {
        let default = DebugConfig::default();
        if other.enabled != default.enabled {
            self.enabled = other.enabled;
        }
        if other.log_to_file != default.log_to_file {
            self.log_to_file = other.log_to_file;
        }
    }
}

/// How many colors the terminal can show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorDepth {
    /// `NO_COLOR` is set; everything renders with the terminal defaults
    None,
    Basic,
    Indexed,
    TrueColor,
}

impl ColorDepth {
    pub fn detect() -> Self {
        if std::env::var_os("NO_COLOR").is_some() {
            return Self::None;
        }
        match supports_color::on(Stream::Stdout) {
            Some(level) if level.has_16m => Self::TrueColor,
            Some(level) if level.has_256 => Self::Indexed,
            _ => Self::Basic,
        }
    }

    /// Fit an RGB color into what this depth can display
    pub fn fit(self, r: u8, g: u8, b: u8) -> Color {
        match self {
            Self::None => Color::Reset,
            Self::Basic => rgb_to_basic_ansi(r, g, b),
            Self::Indexed => Color::Indexed(rgb_to_256_color(r, g, b)),
            Self::TrueColor => Color::Rgb(r, g, b),
        }
    }
}

/// Color names accepted in the theme, after normalizing case and separators
const NAMED_COLORS: &[(&str, Color)] = &[
    ("black", Color::Black),
    ("red", Color::Red),
    ("green", Color::Green),
    ("yellow", Color::Yellow),
    ("blue", Color::Blue),
    ("magenta", Color::Magenta),
    ("cyan", Color::Cyan),
    ("white", Color::White),
    ("bright_black", Color::Indexed(8)),
    ("bright_red", Color::Indexed(9)),
    ("bright_green", Color::Indexed(10)),
    ("bright_yellow", Color::Indexed(11)),
    ("bright_blue", Color::Indexed(12)),
    ("bright_magenta", Color::Indexed(13)),
    ("bright_cyan", Color::Indexed(14)),
    ("bright_white", Color::Indexed(15)),
    ("gray", Color::Indexed(8)),
    ("grey", Color::Indexed(8)),
    ("dark_gray", Color::Indexed(8)),
    ("dark_grey", Color::Indexed(8)),
    ("light_gray", Color::Indexed(7)),
    ("light_grey", Color::Indexed(7)),
    ("reset", Color::Reset),
    ("default", Color::Reset),
];

/// Turns theme color strings into terminal colors for a given [`ColorDepth`]
#[derive(Debug, Clone, Copy)]
pub struct ColorParser {
    depth: ColorDepth,
}

impl ColorParser {
    /// Parser for the current terminal
    pub fn new() -> Self {
        Self::with_depth(ColorDepth::detect())
    }

    pub fn with_depth(depth: ColorDepth) -> Self {
        Self { depth }
    }

    pub fn depth(&self) -> ColorDepth {
        self.depth
    }

    /// Parse `#rrggbb`, `indexed(N)` or a color name.
    ///
    /// Invalid strings are rejected at every depth; valid ones collapse to
    /// `Reset` when color is disabled.
    pub fn parse(&self, s: &str) -> Result<Color> {
        let color = parse_color(s.trim())?;
        Ok(match (self.depth, color) {
            (ColorDepth::None, _) => Color::Reset,
            (depth, Color::Rgb(r, g, b)) => depth.fit(r, g, b),
            (_, color) => color,
        })
    }
}

impl Default for ColorParser {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_color(s: &str) -> Result<Color> {
    if let Some(hex) = s.strip_prefix('#') {
        let (r, g, b) = parse_hex(hex)
            .ok_or_else(|| eyre!("Invalid hex color: '{}'. Expected #rrggbb", s))?;
        return Ok(Color::Rgb(r, g, b));
    }

    let name = s.to_lowercase().replace([' ', '-'], "_");
    if let Some(index) = name
        .strip_prefix("indexed(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return index
            .trim()
            .parse::<u8>()
            .map(Color::Indexed)
            .map_err(|_| eyre!("Invalid indexed color: '{}'. Expected indexed(0-255)", s));
    }

    NAMED_COLORS
        .iter()
        .find(|(known, _)| *known == name)
        .map(|&(_, color)| color)
        .ok_or_else(|| {
            eyre!(
                "Unknown color name: '{}'. Use a name like red or bright_blue, \
                 indexed(N), or #rrggbb",
                s
            )
        })
}

/// Six hex digits to RGB
fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let value = u32::from_str_radix(hex, 16).ok()?;
    Some(((value >> 16) as u8, (value >> 8) as u8, value as u8))
}

fn distance((r1, g1, b1): (u8, u8, u8), (r2, g2, b2): (u8, u8, u8)) -> u32 {
    let d = |a: u8, b: u8| (a as i32 - b as i32).pow(2) as u32;
    d(r1, r2) + d(g1, g2) + d(b1, b2)
}

/// Channel levels of the xterm 6x6x6 color cube
const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

/// Nearest entry of the xterm 256-color palette, searching the color cube
/// and the gray ramp
pub fn rgb_to_256_color(r: u8, g: u8, b: u8) -> u8 {
    let level = |v: u8| {
        (0..CUBE_LEVELS.len())
            .min_by_key(|&i| (CUBE_LEVELS[i] as i32 - v as i32).abs())
            .unwrap_or(0)
    };
    let (ri, gi, bi) = (level(r), level(g), level(b));
    let cube = (CUBE_LEVELS[ri], CUBE_LEVELS[gi], CUBE_LEVELS[bi]);
    let cube_index = 16 + 36 * ri as u8 + 6 * gi as u8 + bi as u8;

    let avg = ((r as u16 + g as u16 + b as u16) / 3) as u8;
    let gray_step = (avg.saturating_sub(3) / 10).min(23);
    let gray = 8 + 10 * gray_step;

    if distance((r, g, b), (gray, gray, gray)) < distance((r, g, b), cube) {
        232 + gray_step
    } else {
        cube_index
    }
}

/// xterm's default values for the eight basic colors
const BASIC_PALETTE: [((u8, u8, u8), Color); 8] = [
    ((0, 0, 0), Color::Black),
    ((205, 0, 0), Color::Red),
    ((0, 205, 0), Color::Green),
    ((205, 205, 0), Color::Yellow),
    ((0, 0, 238), Color::Blue),
    ((205, 0, 205), Color::Magenta),
    ((0, 205, 205), Color::Cyan),
    ((229, 229, 229), Color::White),
];

/// Nearest of the eight basic colors
pub fn rgb_to_basic_ansi(r: u8, g: u8, b: u8) -> Color {
    BASIC_PALETTE
        .iter()
        .min_by_key(|(rgb, _)| distance((r, g, b), *rgb))
        .map(|&(_, color)| color)
        .unwrap_or(Color::Reset)
}

/// Theme containing parsed colors ready for use
#[derive(Debug, Clone)]
pub struct Theme {
    pub colors: HashMap<String, Color>,
}

impl Theme {
    /// Create a Theme from a ThemeConfig by parsing all color strings
    pub fn from_config(config: &ThemeConfig) -> Result<Self> {
        let parser = ColorParser::new();
        let mut colors = HashMap::new();
        for (name, value) in config.colors.entries() {
            colors.insert(name.to_string(), parser.parse(value)?);
        }
        Ok(Self { colors })
    }

    /// Get a color by name, returns Reset if not found
    pub fn get(&self, name: &str) -> Color {
        self.colors.get(name).copied().unwrap_or(Color::Reset)
    }

    /// Get a color by name, returns None if not found
    pub fn get_optional(&self, name: &str) -> Option<Color> {
        self.colors.get(name).copied()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&ThemeConfig::default()).unwrap_or_else(|_| Self {
            colors: HashMap::new(),
        })
    }
}

const DEFAULT_CONFIG_TEMPLATE: &str = include_str!("../config/default.toml");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_to_256_grayscale() {
        assert_eq!(rgb_to_256_color(0, 0, 0), 16);
        assert_eq!(rgb_to_256_color(255, 255, 255), 231);
        assert_eq!(rgb_to_256_color(128, 128, 128), 244);
    }

    #[test]
    fn test_rgb_to_256_cube() {
        assert_eq!(rgb_to_256_color(255, 0, 0), 196);
        assert_eq!(rgb_to_256_color(0, 255, 0), 46);
        assert_eq!(rgb_to_256_color(0, 0, 255), 21);
    }

    #[test]
    fn test_rgb_to_256_prefers_gray_ramp_for_grays() {
        assert_eq!(rgb_to_256_color(30, 30, 30), 234);
        assert_eq!(rgb_to_256_color(95, 95, 95), 59);
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("1e90ff"), Some((0x1e, 0x90, 0xff)));
        assert_eq!(parse_hex("1E90FF"), Some((0x1e, 0x90, 0xff)));
        assert_eq!(parse_hex("1e90f"), None);
        assert_eq!(parse_hex("+1e90f"), None);
        assert_eq!(parse_hex("1e90fé"), None);
    }

    #[test]
    fn test_depth_fits_rgb() {
        assert_eq!(ColorDepth::TrueColor.fit(1, 2, 3), Color::Rgb(1, 2, 3));
        assert_eq!(ColorDepth::Indexed.fit(255, 0, 0), Color::Indexed(196));
        assert_eq!(ColorDepth::Basic.fit(255, 0, 0), Color::Red);
        assert_eq!(ColorDepth::None.fit(255, 0, 0), Color::Reset);
    }

    #[test]
    fn test_rgb_to_basic_ansi() {
        assert_eq!(rgb_to_basic_ansi(200, 20, 20), Color::Red);
        assert_eq!(rgb_to_basic_ansi(20, 200, 20), Color::Green);
        assert_eq!(rgb_to_basic_ansi(10, 10, 10), Color::Black);
        assert_eq!(rgb_to_basic_ansi(200, 200, 200), Color::White);
    }

    #[test]
    fn test_layout_metrics() {
        let layout = LayoutConfig::default();
        assert_eq!(layout.metrics(), BoxMetrics::default());
    }
}
