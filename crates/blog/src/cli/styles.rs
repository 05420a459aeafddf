//! Terminal styles.
//!
//! Code asks for styles by meaning (`title`, `muted`, `tag`, ...) and never
//! by colour. Two palettes define the actual colours, one per display mode;
//! the active one follows the dark-mode preference the library applies to
//! the display root (see [`super::terminal::TerminalRoot`]).
//!
//! Style tokens:
//!
//!     * title: post titles, bold
//!     * muted: metadata such as authors and dates
//!     * faint: separators and hints
//!     * accent: ids and the current page
//!     * tag: tag names
//!     * success, info, warning, error: notices
//!
//! Both palettes are built once through `once_cell::sync::Lazy`. `console`
//! drops the colours by itself when the output is not a terminal.

use console::Style;
use once_cell::sync::Lazy;

pub struct Palette {
    pub title: Style,
    pub muted: Style,
    pub faint: Style,
    pub accent: Style,
    pub tag: Style,
    pub success: Style,
    pub info: Style,
    pub warning: Style,
    pub error: Style,
}

static LIGHT: Lazy<Palette> = Lazy::new(|| Palette {
    title: Style::new().black().bold(),
    muted: Style::new().color256(244),
    faint: Style::new().color256(250),
    accent: Style::new().blue(),
    tag: Style::new().magenta(),
    success: Style::new().green(),
    info: Style::new().color256(240),
    warning: Style::new().color256(136),
    error: Style::new().red(),
});

static DARK: Lazy<Palette> = Lazy::new(|| Palette {
    title: Style::new().white().bold(),
    muted: Style::new().color256(246),
    faint: Style::new().color256(239),
    accent: Style::new().cyan(),
    tag: Style::new().color256(213),
    success: Style::new().color256(114),
    info: Style::new().color256(250),
    warning: Style::new().yellow(),
    error: Style::new().color256(203),
});

pub fn palette(dark: bool) -> &'static Palette {
    if dark {
        &DARK
    } else {
        &LIGHT
    }
}
