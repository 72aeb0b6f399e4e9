//! Output abstraction shared across CLI commands.

/// Trait for outputting messages to the user.
///
/// Command handlers write through this instead of calling `println!`
/// directly, so their output can be captured in tests.
pub trait Output: Send + Sync {
    /// Print a line of text.
    fn println(&self, message: &str);

    /// Print text without a newline.
    fn print(&self, message: &str);

    /// Print an empty line.
    fn newline(&self) {
        self.println("");
    }

    /// Print a section header.
    fn header(&self, title: &str) {
        self.println(title);
        self.println(&"=".repeat(title.len()));
    }

    /// Print an indented line.
    fn indented(&self, message: &str) {
        self.println(&format!("  {}", message));
    }
}

/// Console output implementation using stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleOutput;

impl ConsoleOutput {
    /// Create a new console output.
    pub fn new() -> Self {
        Self
    }
}

impl Output for ConsoleOutput {
    fn println(&self, message: &str) {
        println!("{}", message);
    }

    fn print(&self, message: &str) {
        use std::io::Write;

        print!("{}", message);
        let _ = std::io::stdout().flush();
    }
}
