//! User configuration: keybindings, control tunables, and persistence.
//!
//! Settings are stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/scroll-top/config.toml` (default `~/.config/scroll-top/config.toml`).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use thiserror::Error;

use crate::core::controller::ControllerConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: invalid value {value:?} for `{key}`: {reason}")]
    InvalidValue {
        line: usize,
        key: String,
        value: String,
        reason: &'static str,
    },
}

// ───────────────────────────────────────── actions ───────────

/// All configurable user actions in the pager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    JumpBottom,
    FocusControl,
    BackToTop,
    Quit,
}

impl Action {
    /// Ordered list of all actions (used for serialisation).
    pub const ALL: &[Action] = &[
        Action::ScrollUp,
        Action::ScrollDown,
        Action::PageUp,
        Action::PageDown,
        Action::JumpBottom,
        Action::FocusControl,
        Action::BackToTop,
        Action::Quit,
    ];

    /// Key used in the config file.
    fn config_key(self) -> &'static str {
        match self {
            Action::ScrollUp => "scroll_up",
            Action::ScrollDown => "scroll_down",
            Action::PageUp => "page_up",
            Action::PageDown => "page_down",
            Action::JumpBottom => "jump_bottom",
            Action::FocusControl => "focus_control",
            Action::BackToTop => "back_to_top",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Action::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding: key code plus modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Does this binding match a key event?  Only CTRL/ALT/SHIFT modifiers
    /// are compared.
    pub fn matches(&self, event: KeyEvent) -> bool {
        let mask = KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT;
        self.code == event.code && (self.modifiers & mask) == (event.modifiers & mask)
    }

    /// User-friendly display string (e.g. `"↑"`, `"Ctrl+c"`, `"t"`).
    pub fn display(&self) -> String {
        let mut s = modifier_prefix(self.modifiers);
        s.push_str(&match self.code {
            KeyCode::Up => "↑".into(),
            KeyCode::Down => "↓".into(),
            KeyCode::PageUp => "PgUp".into(),
            KeyCode::PageDown => "PgDn".into(),
            other => key_name(other),
        });
        s
    }

    /// Serialise to config-file format (e.g. `"Alt+Up"`, `"Ctrl+c"`, `"q"`).
    fn to_config_string(&self) -> String {
        let mut s = modifier_prefix(self.modifiers);
        s.push_str(&key_name(self.code));
        s
    }

    /// Parse a key string like `"Ctrl+c"`, `"Alt+Up"`, `"q"`, `"Enter"`.
    fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let parts: Vec<&str> = s.split('+').collect();
        let key_part = parts.last()?;

        for &part in &parts[..parts.len() - 1] {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let code = match key_part.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backtab" => KeyCode::BackTab,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "space" => KeyCode::Char(' '),
            s if s.starts_with('f') && s.len() > 1 => {
                let n: u8 = s[1..].parse().ok()?;
                KeyCode::F(n)
            }
            _ if key_part.chars().count() == 1 => KeyCode::Char(key_part.chars().next()?),
            _ => return None,
        };

        Some(KeyBind { code, modifiers })
    }
}

fn modifier_prefix(modifiers: KeyModifiers) -> String {
    let mut s = String::new();
    if modifiers.contains(KeyModifiers::CONTROL) {
        s.push_str("Ctrl+");
    }
    if modifiers.contains(KeyModifiers::ALT) {
        s.push_str("Alt+");
    }
    if modifiers.contains(KeyModifiers::SHIFT) {
        s.push_str("Shift+");
    }
    s
}

fn key_name(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".into(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Up => "Up".into(),
        KeyCode::Down => "Down".into(),
        KeyCode::Left => "Left".into(),
        KeyCode::Right => "Right".into(),
        KeyCode::Enter => "Enter".into(),
        KeyCode::Esc => "Esc".into(),
        KeyCode::Tab => "Tab".into(),
        KeyCode::BackTab => "BackTab".into(),
        KeyCode::Home => "Home".into(),
        KeyCode::End => "End".into(),
        KeyCode::PageUp => "PageUp".into(),
        KeyCode::PageDown => "PageDown".into(),
        KeyCode::F(n) => format!("F{n}"),
        other => format!("{other:?}"),
    }
}

// ───────────────────────────────────────── tunables ──────────

/// Numeric knobs for the control and the pager.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tunables {
    /// Offset (distance units) past which the control appears.
    pub visibility_threshold: f64,
    pub pulse_delay_ms: u64,
    pub scroll_duration_ms: u64,
    /// Nominal frame interval for the scroll-to-top animation.
    pub frame_ms: u64,
    /// Distance units per text row.
    pub row_units: f64,
    /// Rows moved per mouse-wheel notch.
    pub wheel_rows: u16,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            visibility_threshold: 300.0,
            pulse_delay_ms: 5000,
            scroll_duration_ms: 500,
            frame_ms: 16,
            row_units: 16.0,
            wheel_rows: 3,
        }
    }
}

// ───────────────────────────────────────── config ────────────

/// Application configuration: keybindings and tunables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    pub tunables: Tunables,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            tunables: Tunables::default(),
        }
    }
}

impl AppConfig {
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let mut m = HashMap::new();

        m.insert(ScrollUp, vec![KeyBind::new(Up, n), KeyBind::new(Char('k'), n)]);
        m.insert(ScrollDown, vec![KeyBind::new(Down, n), KeyBind::new(Char('j'), n)]);
        m.insert(
            Action::PageUp,
            vec![KeyBind::new(KeyCode::PageUp, n), KeyBind::new(Char('b'), n)],
        );
        m.insert(
            Action::PageDown,
            vec![KeyBind::new(KeyCode::PageDown, n), KeyBind::new(Char(' '), n)],
        );
        m.insert(
            JumpBottom,
            vec![KeyBind::new(End, n), KeyBind::new(Char('G'), KeyModifiers::SHIFT)],
        );
        m.insert(FocusControl, vec![KeyBind::new(Tab, n)]);
        m.insert(BackToTop, vec![KeyBind::new(Home, n), KeyBind::new(Char('t'), n)]);
        m.insert(Quit, vec![KeyBind::new(Char('q'), n), KeyBind::new(Esc, n)]);

        m
    }

    /// Find the action that matches a key event.  When multiple bindings
    /// match, the one with the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        let mut best: Option<Action> = None;
        let mut best_mod_count = 0;

        for (&action, binds) in &self.bindings {
            for bind in binds {
                if bind.matches(event) {
                    let mc = bind.modifiers.bits().count_ones();
                    if best.is_none() || mc > best_mod_count {
                        best = Some(action);
                        best_mod_count = mc;
                    }
                }
            }
        }
        best
    }

    /// Short display of the first binding only (for the status bar).
    fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    /// Build the status-bar hint string from current bindings.
    pub fn status_bar_hint(&self) -> String {
        format!(
            "{}: scroll | {}: focus ↑ | {}: top | {}: quit",
            self.short_binding(Action::ScrollDown),
            self.short_binding(Action::FocusControl),
            self.short_binding(Action::BackToTop),
            self.short_binding(Action::Quit),
        )
    }

    pub fn controller_config(&self) -> ControllerConfig {
        let t = &self.tunables;
        ControllerConfig {
            threshold: t.visibility_threshold,
            pulse_delay: Duration::from_millis(t.pulse_delay_ms),
            scroll_duration: Duration::from_millis(t.scroll_duration_ms),
            frame_interval: self.frame_interval(),
        }
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.tunables.frame_ms)
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from disk, falling back to defaults.  A malformed file
    /// is reported in the log and otherwise ignored.
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "ignoring config file");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Persist current config to disk.
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = config_path();
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.serialise())?;
        Ok(())
    }

    /// Parse the config text.  Unknown keys and unparseable key bindings
    /// are skipped; bad tunable values are errors.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        for (idx, line) in s.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim().trim_matches('"');
            let invalid = |reason| ConfigError::InvalidValue {
                line: idx + 1,
                key: key.to_string(),
                value: value.to_string(),
                reason,
            };

            let t = &mut config.tunables;
            match key {
                "visibility_threshold" => {
                    let v: f64 = value.parse().map_err(|_| invalid("expected a number"))?;
                    if !(0.0..=1_000_000.0).contains(&v) {
                        return Err(invalid("must be between 0 and 1000000"));
                    }
                    t.visibility_threshold = v;
                    continue;
                }
                "pulse_delay_ms" => {
                    t.pulse_delay_ms = parse_bounded(value, 0, 600_000).map_err(invalid)?;
                    continue;
                }
                "scroll_duration_ms" => {
                    t.scroll_duration_ms = parse_bounded(value, 1, 10_000).map_err(invalid)?;
                    continue;
                }
                "frame_ms" => {
                    t.frame_ms = parse_bounded(value, 1, 1000).map_err(invalid)?;
                    continue;
                }
                "row_units" => {
                    let v: f64 = value.parse().map_err(|_| invalid("expected a number"))?;
                    if !(1.0..=1000.0).contains(&v) {
                        return Err(invalid("must be between 1 and 1000"));
                    }
                    t.row_units = v;
                    continue;
                }
                "wheel_rows" => {
                    t.wheel_rows = parse_bounded(value, 1, 100).map_err(invalid)? as u16;
                    continue;
                }
                _ => {}
            }

            let Some(action) = Action::from_config_key(key) else {
                tracing::debug!(key, "unknown config key");
                continue;
            };

            let parsed: Vec<KeyBind> = value
                .split(',')
                .filter_map(|part| KeyBind::parse(part.trim().trim_matches('"')))
                .collect();
            if !parsed.is_empty() {
                config.bindings.insert(action, parsed);
            }
        }

        Ok(config)
    }

    fn serialise(&self) -> String {
        let t = &self.tunables;
        let mut lines = vec![
            "# scroll-top configuration".to_string(),
            String::new(),
            "# Back-to-top control".to_string(),
            format!("visibility_threshold = {}", t.visibility_threshold),
            format!("pulse_delay_ms = {}", t.pulse_delay_ms),
            format!("scroll_duration_ms = {}", t.scroll_duration_ms),
            format!("frame_ms = {}", t.frame_ms),
            String::new(),
            "# Pager".to_string(),
            format!("row_units = {}", t.row_units),
            format!("wheel_rows = {}", t.wheel_rows),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            String::new(),
        ];

        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(|b| b.to_config_string()).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

fn parse_bounded(value: &str, min: u64, max: u64) -> Result<u64, &'static str> {
    let v: u64 = value.parse().map_err(|_| "expected a whole number")?;
    if v < min || v > max {
        return Err("out of range");
    }
    Ok(v)
}

/// Return the config file path (`$XDG_CONFIG_HOME/scroll-top/config.toml`).
fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("scroll-top").join("config.toml")
}
