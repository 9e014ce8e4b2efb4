//! Terminal styling and capability detection.
//!
//! Report and config listings are printed with a small ANSI palette. Color is
//! dropped when `NO_COLOR` is set or `TERM=dumb`, and the status markers fall
//! back to ASCII when the locale does not advertise UTF-8.

/// ANSI escape codes used by the report renderers.
pub mod colors {
    /// Reset all styling.
    pub const RESET: &str = "\x1b[0m";
    /// Bright bold white for section headings.
    pub const WHITE_BOLD: &str = "\x1b[1;97m";
    /// Gray for option names and secondary detail.
    pub const GRAY: &str = "\x1b[90m";
    /// Cyan for values.
    pub const CYAN: &str = "\x1b[36m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const RED: &str = "\x1b[31m";
}

/// Resolved color codes, either ANSI sequences or empty strings when color
/// is disabled.
#[derive(Debug, Clone, Copy)]
pub struct ColorPalette {
    pub reset: &'static str,
    pub heading: &'static str,
    pub muted: &'static str,
    pub value: &'static str,
    pub ok: &'static str,
    pub warning: &'static str,
    pub error: &'static str,
}

impl ColorPalette {
    #[must_use]
    pub const fn colored() -> Self {
        Self {
            reset: colors::RESET,
            heading: colors::WHITE_BOLD,
            muted: colors::GRAY,
            value: colors::CYAN,
            ok: colors::GREEN,
            warning: colors::YELLOW,
            error: colors::RED,
        }
    }

    #[must_use]
    pub const fn plain() -> Self {
        Self {
            reset: "",
            heading: "",
            muted: "",
            value: "",
            ok: "",
            warning: "",
            error: "",
        }
    }

    /// Pick `colored()` or `plain()` from the terminal capabilities.
    #[must_use]
    pub fn detect() -> Self {
        if supports_color() {
            Self::colored()
        } else {
            Self::plain()
        }
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::detect()
    }
}

/// Status markers printed in front of report lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Markers {
    pub ok: &'static str,
    pub warning: &'static str,
    pub error: &'static str,
}

impl Markers {
    #[must_use]
    pub const fn unicode() -> Self {
        Self {
            ok: "✓",
            warning: "⚠",
            error: "✗",
        }
    }

    #[must_use]
    pub const fn ascii() -> Self {
        Self {
            ok: "[ok]",
            warning: "[warn]",
            error: "[error]",
        }
    }

    #[must_use]
    pub fn detect() -> Self {
        if supports_unicode() {
            Self::unicode()
        } else {
            Self::ascii()
        }
    }
}

/// Check if the terminal supports ANSI color codes.
///
/// Respects the `NO_COLOR` environment variable (https://no-color.org/) and
/// the `TERM=dumb` convention.
#[must_use]
pub fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if let Ok(term) = std::env::var("TERM") {
        if term.eq_ignore_ascii_case("dumb") {
            return false;
        }
    }
    true
}

/// Check `LANG` and `LC_ALL` for a UTF-8 locale.
#[must_use]
pub fn supports_unicode() -> bool {
    ["LC_ALL", "LANG"].iter().any(|key| {
        std::env::var(key)
            .map(|value| value.to_uppercase().contains("UTF"))
            .unwrap_or(false)
    })
}

/// Format a number with thousand separators (commas).
///
/// # Examples
///
/// ```
/// # use hydrad_cli::terminal::format_with_separators;
/// assert_eq!(format_with_separators(999), "999");
/// assert_eq!(format_with_separators(30000), "30,000");
/// assert_eq!(format_with_separators(1234567), "1,234,567");
/// ```
#[must_use]
pub fn format_with_separators(n: u64) -> String {
    if n < 1000 {
        return n.to_string();
    }
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    /// Serializes tests that touch process-global environment variables.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn with_env_vars<F, R>(vars: &[(&str, Option<&str>)], f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let saved: Vec<_> = vars.iter().map(|(k, _)| (*k, env::var_os(k))).collect();

        for (key, value) in vars {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }

        let result = f();

        for (key, value) in saved {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }

        result
    }

    #[test]
    fn separators_for_cell_counts() {
        assert_eq!(format_with_separators(0), "0");
        assert_eq!(format_with_separators(60), "60");
        assert_eq!(format_with_separators(61_440), "61,440");
        assert_eq!(
            format_with_separators(u64::MAX),
            "18,446,744,073,709,551,615"
        );
    }

    #[test]
    fn plain_palette_is_empty() {
        let p = ColorPalette::plain();
        assert!(p.reset.is_empty());
        assert!(p.error.is_empty());
        assert!(!ColorPalette::colored().error.is_empty());
    }

    #[test]
    fn no_color_disables_palette() {
        with_env_vars(&[("NO_COLOR", Some("1")), ("TERM", None)], || {
            assert!(!supports_color());
        });
    }

    #[test]
    fn dumb_terminal_disables_palette() {
        with_env_vars(&[("NO_COLOR", None), ("TERM", Some("dumb"))], || {
            assert!(!supports_color());
        });
    }

    #[test]
    fn utf8_locale_selects_unicode_markers() {
        with_env_vars(&[("LANG", Some("en_US.UTF-8")), ("LC_ALL", None)], || {
            assert_eq!(Markers::detect(), Markers::unicode());
        });
        with_env_vars(&[("LANG", Some("C")), ("LC_ALL", None)], || {
            assert_eq!(Markers::detect(), Markers::ascii());
        });
    }
}
