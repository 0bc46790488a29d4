//! Choosing which browser tab to attach to.

use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};

use parking_lot::Mutex;
use tracing::info;

use tilebot_protocols::ControlError;

/// Longest title shown in the selection prompt, in characters.
pub const MAX_TITLE_CHARS: usize = 100;

/// Something that can be offered in a target list.
pub trait TargetDescriptor {
    fn title(&self) -> &str;
}

/// Picks one target out of several.
pub trait TargetSelector: Send + Sync {
    /// Return the 0-based index of the chosen title.
    fn select(&self, titles: &[String]) -> Result<usize, ControlError>;
}

/// Resolve the target list to a single target.
///
/// A single target is chosen without consulting `selector`.
pub fn choose_target<T: TargetDescriptor>(
    mut targets: Vec<T>,
    selector: &dyn TargetSelector,
) -> Result<T, ControlError> {
    match targets.len() {
        0 => Err(ControlError::NoTargets),
        1 => Ok(targets.remove(0)),
        count => {
            let titles: Vec<String> = targets.iter().map(|t| display_title(t.title())).collect();
            let index = selector.select(&titles)?;
            if index >= count {
                return Err(ControlError::InvalidSelection(format!(
                    "index {} out of range for {} targets",
                    index + 1,
                    count
                )));
            }
            let target = targets.swap_remove(index);
            info!("Attaching to {}", display_title(target.title()));
            Ok(target)
        }
    }
}

/// Escape control and non-ASCII characters, then cut long titles down for
/// display. Truncation counts the escaped text.
pub fn display_title(title: &str) -> String {
    let mut escaped = String::new();
    for c in title.chars() {
        push_escaped(&mut escaped, c);
    }
    match escaped.char_indices().nth(MAX_TITLE_CHARS) {
        Some((cut, _)) => {
            escaped.truncate(cut);
            escaped.push_str("...");
            escaped
        }
        None => escaped,
    }
}

fn push_escaped(out: &mut String, c: char) {
    match c {
        '\\' => out.push_str("\\\\"),
        '\t' => out.push_str("\\t"),
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        ' '..='~' => out.push(c),
        '\0'..='\u{ff}' => out.push_str(&format!("\\x{:02x}", u32::from(c))),
        '\u{100}'..='\u{ffff}' => out.push_str(&format!("\\u{:04x}", u32::from(c))),
        _ => out.push_str(&format!("\\U{:08x}", u32::from(c))),
    }
}

/// Parse a 1-based selection typed by the user.
fn parse_selection(input: &str, count: usize) -> Result<usize, String> {
    let choice: usize = input.parse().map_err(|e| format!("{:?}: {}", input, e))?;
    if choice == 0 || choice > count {
        return Err(format!("{} is not between 1 and {}", choice, count));
    }
    Ok(choice - 1)
}

/// Asks the user on a terminal, re-prompting until the answer is valid.
pub struct PromptSelector<R, W> {
    io: Mutex<(R, W)>,
}

impl<R, W> PromptSelector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            io: Mutex::new((input, output)),
        }
    }

    /// Hand back the reader and writer.
    pub fn into_inner(self) -> (R, W) {
        self.io.into_inner()
    }
}

impl PromptSelector<BufReader<Stdin>, Stdout> {
    /// Prompt on the process's stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R, W> TargetSelector for PromptSelector<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    fn select(&self, titles: &[String]) -> Result<usize, ControlError> {
        let mut io = self.io.lock();
        let (input, output) = &mut *io;

        writeln!(output, "Select a page to attach to:")?;
        for (i, title) in titles.iter().enumerate() {
            writeln!(output, "{}) {}", i + 1, title)?;
        }

        loop {
            write!(output, "Selection? ")?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                return Err(ControlError::InvalidSelection(
                    "input closed before a page was selected".to_string(),
                ));
            }

            match parse_selection(line.trim(), titles.len()) {
                Ok(index) => return Ok(index),
                Err(reason) => writeln!(output, "Invalid selection: {}", reason)?,
            }
        }
    }
}

/// Always picks the same 1-based position.
#[derive(Debug, Clone, Copy)]
pub struct FixedSelector(pub usize);

impl TargetSelector for FixedSelector {
    fn select(&self, titles: &[String]) -> Result<usize, ControlError> {
        parse_selection(&self.0.to_string(), titles.len()).map_err(ControlError::InvalidSelection)
    }
}

#[cfg(test)]
#[path = "selection_tests.rs"]
mod tests;
