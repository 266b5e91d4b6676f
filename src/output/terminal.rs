//! ANSI styling for terminal output

pub mod colors {
    pub const GREY: u8 = 102;      // #7D7D7D - Punctuation, secondary
    pub const AQUA: u8 = 109;      // #7A9EB5 - Numbers, info
    pub const ORANGE: u8 = 208;    // #F2913D - Warnings, PUT/PATCH
    pub const RED: u8 = 167;       // #E34F45 - Errors, DELETE
    pub const BLUE: u8 = 68;       // #426BD1 - Names, labels
    pub const PINK: u8 = 176;      // #DE85DE - Keys
    pub const GREEN: u8 = 71;      // #63C27A - Success, GET
    pub const YELLOW: u8 = 185;    // #CCCC3D - POST, redirects
}

/// ANSI escape code constants
pub const RESET: &str = "\x1b[0m";

/// Generate foreground color escape code
#[inline]
pub fn fg(color: u8) -> String {
    format!("\x1b[38;5;{}m", color)
}

/// Generate bold foreground color escape code
#[inline]
pub fn bold_fg(color: u8) -> String {
    format!("\x1b[1;38;5;{}m", color)
}

/// Whether stdout should receive ANSI colors
pub fn stdout_supports_color() -> bool {
    atty::is(atty::Stream::Stdout) && std::env::var_os("NO_COLOR").is_none()
}

/// Applies colors only when enabled, so callers never branch on it
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    enabled: bool,
}

impl Painter {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn detect() -> Self {
        Self::new(stdout_supports_color())
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    fn paint(&self, text: &str, code: String) -> String {
        if self.enabled {
            format!("{}{}{}", code, text, RESET)
        } else {
            text.to_string()
        }
    }

    /// Success message (green)
    pub fn success(&self, text: &str) -> String {
        self.paint(text, bold_fg(colors::GREEN))
    }

    /// Error message (red)
    pub fn error(&self, text: &str) -> String {
        self.paint(text, bold_fg(colors::RED))
    }

    /// Label/name (blue)
    pub fn label(&self, text: &str) -> String {
        self.paint(text, fg(colors::BLUE))
    }

    /// Key (pink)
    pub fn key(&self, text: &str) -> String {
        self.paint(text, fg(colors::PINK))
    }

    /// Secondary/muted text (grey)
    pub fn muted(&self, text: &str) -> String {
        self.paint(text, fg(colors::GREY))
    }

    /// HTTP status code color
    pub fn http_status(&self, code: u16, text: &str) -> String {
        let color = match code / 100 {
            1 => colors::AQUA,   // Informational
            2 => colors::GREEN,  // Success
            3 => colors::YELLOW, // Redirect
            4 => colors::ORANGE, // Client error
            5 => colors::RED,    // Server error
            _ => colors::RED,    // Network error
        };
        self.paint(text, bold_fg(color))
    }

    /// HTTP method color
    pub fn http_method(&self, method: &str) -> String {
        let color = match method.to_uppercase().as_str() {
            "GET" | "HEAD" | "OPTIONS" => colors::GREEN,
            "POST" => colors::YELLOW,
            "PUT" | "PATCH" => colors::ORANGE,
            "DELETE" => colors::RED,
            _ => colors::GREY,
        };
        self.paint(method, bold_fg(color))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fg_color() {
        assert_eq!(fg(71), "\x1b[38;5;71m");
    }

    #[test]
    fn test_disabled_painter_is_plain() {
        let painter = Painter::new(false);
        assert_eq!(painter.http_status(404, "404"), "404");
        assert_eq!(painter.http_method("POST"), "POST");
    }

    #[test]
    fn test_enabled_painter_colors() {
        let painter = Painter::new(true);
        let result = painter.http_status(200, "200");
        assert!(result.contains("1;38;5;71m")); // bold green
        assert!(result.ends_with(RESET));
        assert!(painter.http_status(0, "0").contains("1;38;5;167m"));
    }
}
