use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

pub struct OutputFormatter;

impl OutputFormatter {
    pub fn print_banner() {
        println!("{}", "=".repeat(70).bright_cyan());
        println!(
            "{}",
            "  Sub Hunter - SecurityTrails Subdomain Discovery"
                .bright_cyan()
                .bold()
        );
        println!("{}", "=".repeat(70).bright_cyan());
        println!();
    }

    /// Spinner shown while a discovery operation is in flight.
    pub fn discovery_spinner(message: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    }

    pub fn print_summary(count: usize, domain: &str, method: &str) {
        println!(
            "Found {} subdomains for {} via securitytrails ({})",
            count.to_string().bright_white(),
            domain.bright_cyan(),
            method.bright_green()
        );
    }

    pub fn print_error(message: &str) {
        eprintln!("{} {}", "❌".bright_red(), message.red());
    }

    pub fn print_warning(message: &str) {
        println!("{} {}", "⚠️".bright_yellow(), message.yellow());
    }

    pub fn print_success(message: &str) {
        println!("{} {}", "✓".bright_green(), message.green());
    }

    pub fn print_info(message: &str) {
        println!("{} {}", "ℹ️".bright_blue(), message);
    }
}
