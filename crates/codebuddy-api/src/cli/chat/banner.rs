//! Welcome banner for the terminal tutor.

use console::style;

/// Print the title, tagline, model, and the starter suggestions.
pub fn print_welcome_banner(provider: &str, model: &str, suggestions: &[&str]) {
    println!();
    println!("  🤖 {}", style("CodeBuddy").cyan().bold());
    println!(
        "  {}",
        style("Your friendly AI-powered tutor for mastering any coding concept!").dim()
    );
    println!();
    println!("  {}  {} / {}", style("Model:").bold(), style(provider).dim(), style(model).dim());
    println!();

    if !suggestions.is_empty() {
        println!("  {}", style("Try one of these, or ask your own:").bold());
        for (i, suggestion) in suggestions.iter().enumerate() {
            println!("  {} {}", style(format!("[{}]", i + 1)).cyan(), suggestion);
        }
        println!();
    }

    println!("  {}", style("Type /help for commands, Ctrl+D to exit").dim());
    println!("  {}", style("---").dim());
    println!();
}
