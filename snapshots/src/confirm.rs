use std::io::{self, BufRead, StdinLock, Stdout, Write};

/// The `Prompt` trait asks the user a yes/no question.
pub trait Prompt {
    fn confirm(&mut self, question: &str) -> io::Result<bool>;
}

/// `Confirmation` asks on `output` and reads answers line by line from `input`.
///
/// `y` accepts, `n` or an empty answer declines, case-insensitively. Anything else
/// asks again. Running out of input declines, so a closed stdin never hangs.
pub struct Confirmation<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Confirmation<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Confirmation { input, output }
    }
}

impl Confirmation<StdinLock<'static>, Stdout> {
    /// Ask on the terminal.
    pub fn stdio() -> Self {
        Confirmation::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompt for Confirmation<R, W> {
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        loop {
            write!(self.output, "{} [y/N]: ", question)?;
            self.output.flush()?;

            let mut answer = String::new();
            if self.input.read_line(&mut answer)? == 0 {
                writeln!(self.output)?;
                return Ok(false);
            }

            match answer.trim().to_lowercase().as_str() {
                "y" => return Ok(true),
                "n" | "" => return Ok(false),
                _ => writeln!(self.output, "Invalid input. Please enter 'y' or 'n'.")?,
            }
        }
    }
}
