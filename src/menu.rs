// Console prompts and choice validation.
//
// Options are keyed by letters A..Z, so a chooser can never offer more than
// 26 items. Free-text answers are matched with the same normalization used
// for filtering.
use crate::error::{Result, ReviewError};
use crate::util::{display_name, same_text};
use std::io::{BufRead, Write};

pub const MAX_OPTIONS: usize = 26;

/// Pair each item with a letter starting at `A`.
pub fn letter_options<T: AsRef<str>>(items: &[T]) -> Result<Vec<(char, String)>> {
    if items.len() > MAX_OPTIONS {
        return Err(ReviewError::TooManyOptions {
            count: items.len(),
            max: MAX_OPTIONS,
        });
    }
    Ok(items
        .iter()
        .zip('A'..='Z')
        .map(|(item, letter)| (letter, item.as_ref().to_string()))
        .collect())
}

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn say(&mut self, msg: impl AsRef<str>) -> Result<()> {
        writeln!(self.output, "{}", msg.as_ref())?;
        Ok(())
    }

    pub fn print_title(&mut self, title: &str) -> Result<()> {
        let line = "-".repeat(title.chars().count());
        self.say(format!("{line}\n{title}\n{line}"))
    }

    /// Read one trimmed line. Empty lines are reported and yield `None`.
    pub fn read_input(&mut self) -> Result<Option<String>> {
        self.output.flush()?;
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Err(ReviewError::InputClosed);
        }
        let input = buf.trim();
        if input.is_empty() {
            self.say("Input cannot be empty!")?;
            return Ok(None);
        }
        Ok(Some(input.to_string()))
    }

    fn print_options(&mut self, options: &[(char, String)], indent: usize) -> Result<()> {
        let tabs = "\t".repeat(indent);
        for (key, value) in options {
            writeln!(self.output, "{tabs}[{key}] {}", display_name(value))?;
        }
        Ok(())
    }

    fn print_list<T: AsRef<str>>(&mut self, items: &[T], indent: usize) -> Result<()> {
        let tabs = "\t".repeat(indent);
        for item in items {
            writeln!(self.output, "{tabs}- {}", display_name(item.as_ref()))?;
        }
        Ok(())
    }

    fn confirm(&mut self, key: Option<char>, value: &str) -> Result<()> {
        match key {
            Some(k) => self.say(format!("You have chosen option {k} - {value}")),
            None => self.say(format!("You have chosen option - {value}")),
        }
    }

    /// Letter-keyed menu; repeats until a listed letter is entered.
    ///
    /// `extra` options (e.g. `X` for exit) are shown after the lettered ones.
    pub fn choose_letter<T: AsRef<str>>(
        &mut self,
        msg: &str,
        items: &[T],
        extra: &[(char, &str)],
        indent: usize,
    ) -> Result<char> {
        let mut options = letter_options(items)?;
        options.extend(extra.iter().map(|(k, v)| (*k, v.to_string())));
        loop {
            self.say(msg)?;
            self.print_options(&options, indent)?;
            let Some(choice) = self.read_input()? else {
                continue;
            };
            let choice = choice.to_uppercase();
            let found = options
                .iter()
                .find(|(k, _)| choice.chars().eq(std::iter::once(*k)))
                .cloned();
            match found {
                Some((key, value)) => {
                    self.confirm(Some(key), &value)?;
                    return Ok(key);
                }
                None => self.say("Input does not correspond with any option!")?,
            }
        }
    }

    /// Pick one of the known branch names by letter.
    pub fn validate_branch<T: AsRef<str>>(&mut self, msg: &str, branches: &[T]) -> Result<String> {
        let options = letter_options(branches)?;
        loop {
            self.say(msg)?;
            self.print_options(&options, 3)?;
            let Some(choice) = self.read_input()? else {
                continue;
            };
            let choice = choice.to_uppercase();
            match options
                .iter()
                .find(|(k, _)| choice.chars().eq(std::iter::once(*k)))
            {
                Some((_, branch)) => {
                    let branch = branch.clone();
                    self.confirm(None, &display_name(&branch))?;
                    return Ok(branch);
                }
                None => self.say("Input does not correspond with any option!")?,
            }
        }
    }

    /// Free-text pick from `options`, compared in normalized form.
    ///
    /// Returns the option as listed, not as typed.
    pub fn validate_multi_choice<T: AsRef<str>>(
        &mut self,
        msg: &str,
        options: &[T],
    ) -> Result<String> {
        loop {
            self.print_list(options, 3)?;
            self.say(msg)?;
            let Some(choice) = self.read_input()? else {
                continue;
            };
            match options.iter().find(|o| same_text(o.as_ref(), &choice)) {
                Some(option) => {
                    let option = option.as_ref().to_string();
                    self.confirm(None, &option)?;
                    return Ok(option);
                }
                None => self.say("Input does not correspond with any option!")?,
            }
        }
    }
}
