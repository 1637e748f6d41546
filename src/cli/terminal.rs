//! Terminal colouring for tree listings and validation reports

use owo_colors::{colors::css, OwoColorize};

/// Whether stdout takes colours
fn supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

fn paint(text: &str, style: impl FnOnce(&str) -> String) -> String {
    if supports_color() {
        style(text)
    } else {
        text.to_string()
    }
}

/// Extension trait for colorizing output
pub trait Colorize {
    /// Valid documents and concept names (green)
    fn success(&self) -> String;
    /// Invalid documents (red)
    fn error(&self) -> String;
    /// Missing or unsupported values (amber)
    fn warning(&self) -> String;
    /// Value types and document types (blue)
    fn info(&self) -> String;
    /// Positions, annotations and other secondary text
    fn dim(&self) -> String;
}

impl<T: AsRef<str> + ?Sized> Colorize for T {
    fn success(&self) -> String {
        paint(self.as_ref(), |text| text.fg::<css::Green>().to_string())
    }

    fn error(&self) -> String {
        paint(self.as_ref(), |text| text.fg::<css::Red>().to_string())
    }

    fn warning(&self) -> String {
        paint(self.as_ref(), |text| text.fg::<css::Orange>().to_string())
    }

    fn info(&self) -> String {
        paint(self.as_ref(), |text| text.fg::<css::LightBlue>().to_string())
    }

    fn dim(&self) -> String {
        paint(self.as_ref(), |text| text.dimmed().to_string())
    }
}
