//! Console output helpers shared by the commands.

use colored::Colorize;

/// Plain progress line, indented under the current set.
pub fn info(msg: &str) {
    println!("   {msg}");
}

pub fn warn(msg: &str) {
    println!("{} {msg}", "warning:".yellow());
}

pub fn error(msg: &str) {
    eprintln!("{} {msg}", "error:".red());
}

pub fn skip(msg: &str) {
    println!("{} {msg}", "skipped:".yellow());
}

pub fn complete(msg: &str) {
    println!("{} {msg}", "✓".green());
}

pub fn blank() {
    println!();
}
