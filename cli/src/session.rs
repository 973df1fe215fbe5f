use anyhow::Result;
use linkwords_core::{PuzzleEngine, RoundView, ToggleOutcome};
use std::io::{BufRead, Write};

use crate::render::Renderer;
use crate::source::PuzzleSource;

const HELP: &str = "\
Type board words to select or deselect them, several at once separated by commas.
Four selected words are checked automatically.
  /shuffle       reorder the board
  /clear         unselect every word
  /new [theme]   start over with a new puzzle
  /help          show this help
  /quit          leave the game
";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Toggle(Vec<String>),
    Shuffle,
    Clear,
    New(Option<String>),
    Show,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let Some(rest) = line.strip_prefix('/') else {
            let words: Vec<String> = line
                .split(',')
                .map(str::trim)
                .filter(|word| !word.is_empty())
                .map(String::from)
                .collect();
            return if words.is_empty() {
                Self::Show
            } else {
                Self::Toggle(words)
            };
        };

        let (name, argument) = match rest.split_once(char::is_whitespace) {
            Some((name, argument)) => (name, argument.trim()),
            None => (rest, ""),
        };
        match name.to_ascii_lowercase().as_str() {
            "shuffle" | "s" => Self::Shuffle,
            "clear" | "c" => Self::Clear,
            "new" | "n" => Self::New((!argument.is_empty()).then(|| argument.to_string())),
            "help" | "h" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            _ => Self::Unknown(name.to_string()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue(String),
    Quit,
}

/// Drives one engine from text commands, fetching new puzzles from `source`.
pub struct Session<S> {
    engine: PuzzleEngine,
    source: S,
    renderer: Renderer,
    theme: String,
}

impl<S: PuzzleSource> Session<S> {
    pub fn new(engine: PuzzleEngine, source: S, renderer: Renderer) -> Self {
        Self {
            engine,
            source,
            renderer,
            theme: String::new(),
        }
    }

    pub fn engine(&self) -> &PuzzleEngine {
        &self.engine
    }

    /// Fetches and loads a puzzle. Any failure leaves the current round untouched.
    pub fn start(&mut self, theme: &str) -> String {
        match self.fetch_and_load(theme) {
            Ok(()) => {
                self.theme = theme.to_string();
                self.render()
            }
            Err(err) => {
                log::warn!("Could not load puzzle for theme {theme:?}: {err:#}");
                format!("Error: Could not generate game. {err:#}\n")
            }
        }
    }

    pub fn handle(&mut self, command: Command) -> Flow {
        use Command::*;

        let text = match command {
            Toggle(words) => self.toggle(&words),
            Shuffle => {
                self.engine.shuffle_board();
                self.render()
            }
            Clear => {
                self.engine.unselect_all();
                self.render()
            }
            New(theme) => {
                let theme = theme.unwrap_or_else(|| self.theme.clone());
                self.engine.reset_round();
                self.start(&theme)
            }
            Show => self.render(),
            Help => HELP.to_string(),
            Quit => return Flow::Quit,
            Unknown(name) => format!("Unknown command /{name}, type /help for a list.\n"),
        };
        Flow::Continue(text)
    }

    pub fn run(&mut self, input: impl BufRead, mut output: impl Write) -> Result<()> {
        write!(output, "{}", self.render())?;
        write!(output, "> ")?;
        output.flush()?;

        for line in input.lines() {
            match self.handle(Command::parse(&line?)) {
                Flow::Continue(text) => write!(output, "{text}")?,
                Flow::Quit => break,
            }
            write!(output, "> ")?;
            output.flush()?;
        }

        writeln!(output)?;
        Ok(())
    }

    fn fetch_and_load(&mut self, theme: &str) -> Result<()> {
        let payload = self.source.fetch(theme)?;
        self.engine.load_puzzle(payload)?;
        Ok(())
    }

    fn toggle(&mut self, words: &[String]) -> String {
        if self.engine.state().is_empty() {
            return self.render();
        }

        for word in words {
            if self.engine.word_status(word).is_none() {
                return format!("{} is not on the board.\n{}", word.trim(), self.render());
            }
            match self.engine.toggle_word(word) {
                Ok(outcome) if outcome.is_evaluation() => break,
                Ok(ToggleOutcome::NoChange) => log::debug!("Toggle of {word:?} had no effect"),
                Ok(_) => {}
                Err(err) => return format!("Error: {err}\n{}", self.render()),
            }
        }
        self.render()
    }

    fn render(&self) -> String {
        let mut text = self.renderer.render(&RoundView::from_engine(&self.engine));
        if self.engine.is_finished() {
            text.push_str("Type /new <theme> to play again.\n");
        }
        text
    }
}
