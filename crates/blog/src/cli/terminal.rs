//! The terminal as the library's display root and notice sink.

use super::styles::{palette, Palette};
use blogapp::notice::{Notice, NoticeLevel, Notifier};
use blogapp::preference::{DisplayRoot, DARK_FLAG};
use std::cell::Cell;
use std::rc::Rc;

/// Remembers the dark flag so rendering can pick a palette.
#[derive(Debug, Default)]
pub struct TerminalRoot {
    dark: Cell<bool>,
}

impl TerminalRoot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dark(&self) -> bool {
        self.dark.get()
    }

    pub fn palette(&self) -> &'static Palette {
        palette(self.is_dark())
    }
}

impl DisplayRoot for TerminalRoot {
    fn set_flag(&self, flag: &str, on: bool) {
        if flag == DARK_FLAG {
            self.dark.set(on);
        }
    }
}

/// Prints notices to stderr, one per line, and counts the errors.
pub struct TerminalNotifier {
    root: Rc<TerminalRoot>,
    errors: Cell<usize>,
}

impl TerminalNotifier {
    pub fn new(root: Rc<TerminalRoot>) -> Self {
        Self {
            root,
            errors: Cell::new(0),
        }
    }

    pub fn error_count(&self) -> usize {
        self.errors.get()
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: Notice) {
        let palette = self.root.palette();
        let (style, marker) = match notice.level {
            NoticeLevel::Info => (&palette.info, "·"),
            NoticeLevel::Success => (&palette.success, "✓"),
            NoticeLevel::Warning => (&palette.warning, "!"),
            NoticeLevel::Error => {
                self.errors.set(self.errors.get() + 1);
                (&palette.error, "✗")
            }
        };
        let style = style.clone().for_stderr();
        eprintln!("{}", style.apply_to(format!("{} {}", marker, notice.content)));
    }
}
