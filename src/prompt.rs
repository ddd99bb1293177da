//! Interactive input for the poster generator. [`Terminal`] prompts through
//! `dialoguer` when a user is at the keyboard; [`Lines`] reads plain lines
//! from any reader, which covers piped input and tests.

use crate::generate::PosterContent;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Input;
use std::io::{self, BufRead, Write};

/// A source of answers to the generator's questions.
pub trait Prompt {
    /// Asks for a single line. The line ending is not included.
    fn line(&mut self, prompt: &str) -> io::Result<String>;

    /// Asks for several lines, ending at the first empty line (or end of
    /// input). The lines are joined with `\n`.
    fn lines(&mut self, prompt: &str) -> io::Result<String>;
}

/// Everything the generator asks for, in the order it asks.
pub struct Answers {
    pub content: PosterContent,

    /// The output file name as typed, before normalization.
    pub output: String,
}

pub fn ask(prompt: &mut dyn Prompt) -> io::Result<Answers> {
    let quote = prompt.lines(
        "▶︎ Quote (Enter for a new line, Enter on an empty line to finish):",
    )?;
    let author = prompt.line("▶︎ Author or source (e.g. 'Plato')")?;
    let number = prompt.line("▶︎ Poster number (e.g. 'Số 02')")?;
    let output = prompt.line("▶︎ Output file name (e.g. 'poster_plato.html')")?;
    Ok(Answers {
        content: PosterContent {
            quote,
            author,
            number,
        },
        output,
    })
}

/// Prompts on the terminal with `dialoguer`.
pub struct Terminal {
    theme: ColorfulTheme,
}

impl Terminal {
    pub fn new() -> Terminal {
        Terminal {
            theme: ColorfulTheme::default(),
        }
    }

    fn input(&self, prompt: &str) -> io::Result<String> {
        Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Terminal::new()
    }
}

impl Prompt for Terminal {
    fn line(&mut self, prompt: &str) -> io::Result<String> {
        self.input(prompt)
    }

    fn lines(&mut self, prompt: &str) -> io::Result<String> {
        println!("{}", prompt);
        let mut lines = Vec::new();
        loop {
            let line = self.input("│")?;
            if line.is_empty() {
                break;
            }
            lines.push(line);
        }
        Ok(lines.join("\n"))
    }
}

/// Reads answers line by line from `input`, echoing prompts to `output`.
pub struct Lines<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Lines<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Lines { input, output }
    }

    /// Reads one line without its line ending; `None` at end of input.
    fn read(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(&['\n', '\r'][..]).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}

impl<R: BufRead, W: Write> Prompt for Lines<R, W> {
    fn line(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.output, "{}: ", prompt)?;
        self.output.flush()?;
        Ok(self.read()?.unwrap_or_default())
    }

    fn lines(&mut self, prompt: &str) -> io::Result<String> {
        writeln!(self.output, "{}", prompt)?;
        self.output.flush()?;
        let mut lines = Vec::new();
        while let Some(line) = self.read()? {
            if line.is_empty() {
                break;
            }
            lines.push(line);
        }
        Ok(lines.join("\n"))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn ask_from(input: &str) -> Answers {
        let mut prompt = Lines::new(input.as_bytes(), Vec::new());
        ask(&mut prompt).unwrap()
    }

    #[test]
    fn test_ask_reads_quote_until_blank_line() {
        let answers = ask_from("Know thyself\r\nand be humble\n\nPlato\nSố 02\nposter_plato\n");
        assert_eq!("Know thyself\nand be humble", answers.content.quote);
        assert_eq!("Plato", answers.content.author);
        assert_eq!("Số 02", answers.content.number);
        assert_eq!("poster_plato", answers.output);
    }

    #[test]
    fn test_end_of_input_ends_quote_and_empties_the_rest() {
        let answers = ask_from("Only a quote");
        assert_eq!("Only a quote", answers.content.quote);
        assert_eq!("", answers.content.author);
        assert_eq!("", answers.output);
    }

    #[test]
    fn test_prompts_are_echoed() {
        let mut out = Vec::new();
        {
            let mut prompt = Lines::new("a\n".as_bytes(), &mut out);
            assert_eq!("a", prompt.line("Name").unwrap());
        }
        assert_eq!("Name: ", String::from_utf8(out).unwrap());
    }
}
