//! CLI progress display utilities
//!
//! Step indicators with emoji and a completion line, matching the style of
//! the other command-line tools.

use std::time::Duration;

use console::{Emoji, style};
use indicatif::HumanDuration;

/// Magnifying glass - for reading/scanning operations
pub static LOOKING_GLASS: Emoji<'_, '_> = Emoji("🔍 ", "");
/// Floppy disk - for writing/saving operations
pub static DISK: Emoji<'_, '_> = Emoji("💾 ", "");
/// Gear - for processing/conversion operations
pub static GEAR: Emoji<'_, '_> = Emoji("⚙️  ", "");
/// Sparkles - for completion
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "");
/// Picture - for texture operations
pub static PICTURE: Emoji<'_, '_> = Emoji("🖼️  ", "");
/// Cube - for mesh operations
pub static CUBE: Emoji<'_, '_> = Emoji("📐 ", "");

/// Print a step indicator: `[1/3] 🔍 Message...`
///
/// # Example
/// ```ignore
/// print_step(1, 3, LOOKING_GLASS, "Reading GLO file...");
/// print_step(2, 3, PICTURE, "Renaming textures...");
/// print_step(3, 3, DISK, "Writing GLO file...");
/// ```
pub fn print_step(current: usize, total: usize, emoji: Emoji, msg: &str) {
    println!(
        "{} {}{}",
        style(format!("[{current}/{total}]")).bold().dim(),
        emoji,
        msg
    );
}

/// Print completion message: `✨ Done in 2s`
pub fn print_done(elapsed: Duration) {
    println!("{} Done in {}", SPARKLE, HumanDuration(elapsed));
}

/// Step printer that goes quiet when asked to.
pub struct Steps {
    total: usize,
    current: usize,
    quiet: bool,
}

impl Steps {
    #[must_use]
    pub fn new(total: usize, quiet: bool) -> Self {
        Self {
            total,
            current: 0,
            quiet,
        }
    }

    /// Print the next step.
    pub fn step(&mut self, emoji: Emoji, msg: &str) {
        self.current += 1;
        if !self.quiet {
            print_step(self.current, self.total, emoji, msg);
        }
    }

    pub fn done(&self, elapsed: Duration) {
        if !self.quiet {
            print_done(elapsed);
        }
    }
}
