use crate::paper::Paper;
use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;

pub fn header(text: &str) {
    println!("{} {}", Icons::ROCKET, text.style(theme().header.clone()));
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(theme().success.clone()));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, label.style(theme().warn.clone()));
}

pub fn info(label: &str, value: &str) {
    println!(
        "{} {}: {}",
        Icons::INFO.style(theme().info.clone()),
        label.style(theme().dim.clone()),
        value
    );
}

pub fn section(title: &str) {
    println!();
    println!("━{}━", title.style(theme().header.clone()));
}

pub fn summary_row(label: &str, value: &str) {
    println!("  {} {}", label.style(theme().dim.clone()), value);
}

/// One-line listing of a Paper.
pub fn paper_line(index: usize, paper: &Paper) {
    let keys = paper
        .natural_keys()
        .into_iter()
        .map(|(name, value)| format!("{}:{}", name, value))
        .collect::<Vec<_>>()
        .join(" ");
    println!(
        "{:>6}  {}  {}",
        index,
        paper.short_description().style(theme().title.clone()),
        keys.style(theme().key.clone())
    );
}

/// Full listing of a Paper and the Papers it cites.
pub fn paper_detail(index: usize, paper: &Paper) {
    println!("{} [{}] {}", Icons::PAPER, index, paper.short_description().style(theme().title.clone()));
    for (name, value) in paper.fields() {
        if value.is_null() {
            continue;
        }
        summary_row(&format!("{:<13}", name), &format!("{:?}", value));
    }

    match &paper.citations {
        None => summary_row(&format!("{:<13}", "citations"), "unknown"),
        Some(citations) => {
            section(&format!(" {} {} citations ", Icons::LINK, citations.len()));
            for (i, cited) in citations.iter().enumerate() {
                paper_line(i, cited);
            }
        }
    }
}
