//! Startup banner: "TRIP-LENS" in figlet's standard font, tinted column by column
//! across a pink -> violet -> cyan ramp.

use crossterm::queue;
use crossterm::style::{Color, Print, PrintStyledContent, Stylize};
use figlet_rs::FIGfont;
use std::io::{Write, stdout};

/// Colour stops of the horizontal ramp.
const RAMP: [(u8, u8, u8); 3] = [(0xff, 0x2f, 0xb9), (0x8a, 0x2b, 0xe2), (0x0f, 0xf0, 0xfc)];

/// Colour at position `t` in [0.0, 1.0] along [`RAMP`].
fn ramp_color(t: f64) -> (u8, u8, u8) {
    let t = t.clamp(0.0, 1.0);
    let segments = (RAMP.len() - 1) as f64;
    let idx = ((t * segments).floor() as usize).min(RAMP.len() - 2);
    let local = t * segments - idx as f64;
    let (a, b) = (RAMP[idx], RAMP[idx + 1]);
    let mix = |x: u8, y: u8| (f64::from(x) + (f64::from(y) - f64::from(x)) * local).round() as u8;
    (mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

/// Banner text, or the plain name if the font cannot be loaded.
fn banner_art() -> String {
    FIGfont::standard()
        .ok()
        .and_then(|font| font.convert("TRIP-LENS").map(|fig| fig.to_string()))
        .unwrap_or_else(|| "TRIP-LENS\n".to_string())
}

/// Print the banner and version line. Terminal write errors are ignored.
pub fn print_welcome() {
    let art = banner_art();
    let width = art.lines().map(|l| l.chars().count()).max().unwrap_or(1).max(2);

    let mut out = stdout().lock();
    for line in art.lines() {
        for (col, ch) in line.chars().enumerate() {
            let (r, g, b) = ramp_color(col as f64 / (width - 1) as f64);
            let _ = queue!(out, PrintStyledContent(ch.with(Color::Rgb { r, g, b }).bold()));
        }
        let _ = queue!(out, Print("\r\n"));
    }
    let (r, g, b) = RAMP[RAMP.len() - 1];
    let tagline = format!("v{}  trip report analysis", env!("CARGO_PKG_VERSION"));
    let _ = queue!(
        out,
        PrintStyledContent(tagline.with(Color::Rgb { r, g, b })),
        Print("\r\n")
    );
    let _ = out.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_hits_every_stop() {
        assert_eq!(ramp_color(0.0), RAMP[0]);
        assert_eq!(ramp_color(0.5), RAMP[1]);
        assert_eq!(ramp_color(1.0), RAMP[2]);
        assert_eq!(ramp_color(7.0), RAMP[2]);
    }

    #[test]
    fn test_banner_art_is_multiline() {
        assert!(banner_art().lines().count() > 1);
    }
}
