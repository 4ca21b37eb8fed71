//! Output formatting and progress bars for the CLI.

use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar over learning episodes.
pub fn create_episode_progress(total_episodes: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(total_episodes);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
            .expect("Invalid progress bar template")
            .progress_chars("=>-"),
    );
    pb.set_message(label.to_string());
    pb
}

/// Print a section header.
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a key-value pair.
pub fn print_kv(key: &str, value: &str) {
    println!("  {:24} {}", format!("{key}:"), value);
}
