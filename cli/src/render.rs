use linkwords_core::{CategoryIndex, CategoryView, EngineState, GROUP_SIZE, RoundView, TileStatus, TileView};
use std::fmt::Write;

/// Row colours by category slot, yellow to purple.
const CATEGORY_COLORS: [(u8, u8, u8); 4] = [
    (0xF9, 0xE2, 0x56),
    (0xA0, 0xC1, 0x6B),
    (0xB7, 0xC8, 0xEB),
    (0xB4, 0x8E, 0xAD),
];

const RESET: &str = "\x1b[0m";

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn render(&self, view: &RoundView) -> String {
        let mut out = String::new();

        if view.is_empty() {
            out.push_str("No puzzle loaded. Type /new <theme> to start one.\n");
            self.render_message(&mut out, view);
            return out;
        }

        if let Some(theme) = &view.theme {
            let _ = writeln!(out, "== {theme} ==");
        }

        for category in &view.found {
            self.render_category(&mut out, category);
        }

        // a lost round reveals the answers in their colours
        let reveal = view.state == EngineState::Lost;
        let open: Vec<&TileView> = view.open_tiles().collect();
        let width = open.iter().map(|tile| tile.word.as_str().chars().count()).max().unwrap_or(0);
        for row in open.chunks(GROUP_SIZE) {
            let cells: Vec<String> = row
                .iter()
                .map(|tile| self.render_tile(tile, width, reveal))
                .collect();
            let _ = writeln!(out, "{}", cells.join(" "));
        }

        for category in &view.unsolved {
            self.render_category(&mut out, category);
        }

        let _ = writeln!(out, "Tries left: {}/{}", view.tries_remaining, view.max_tries);
        self.render_message(&mut out, view);
        out
    }

    fn render_tile(&self, tile: &TileView, width: usize, reveal: bool) -> String {
        let word = tile.word.as_str();
        let padded = match tile.status {
            TileStatus::Selected => format!("[{word:^width$}]"),
            TileStatus::Available | TileStatus::Found => format!(" {word:^width$} "),
        };
        if reveal {
            self.paint(tile.category, &padded)
        } else {
            padded
        }
    }

    fn render_category(&self, out: &mut String, category: &CategoryView) {
        let words: Vec<&str> = category.words.iter().map(|word| word.as_str()).collect();
        let line = format!(" {}: {} ", category.name.to_uppercase(), words.join(", "));
        let _ = writeln!(out, "{}", self.paint(category.index, &line));
    }

    fn render_message(&self, out: &mut String, view: &RoundView) {
        if let Some(message) = &view.message {
            let _ = writeln!(out, "{message}");
        }
    }

    fn paint(&self, index: CategoryIndex, text: &str) -> String {
        match CATEGORY_COLORS.get(usize::from(index)) {
            Some((r, g, b)) if self.color => format!("\x1b[48;2;{r};{g};{b}m\x1b[30m{text}{RESET}"),
            _ => text.to_string(),
        }
    }
}
