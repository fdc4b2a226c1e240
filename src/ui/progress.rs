use crate::ui::{theme, Icons};
use indicatif::{HumanDuration, ProgressBar};
use owo_colors::OwoColorize;
use std::time::{Duration, Instant};

pub struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    pub fn new(message: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_message(message.to_string());
        if console::Term::stdout().is_term() {
            pb.enable_steady_tick(Duration::from_millis(100));
        }
        Self { pb }
    }

    pub fn set_message(&self, msg: &str) {
        self.pb.set_message(msg.to_string());
    }

    pub fn finish_with_message(&self, msg: &str) {
        self.pb.finish_with_message(msg.to_string());
    }
}

/// Running counts for `papertable import`.
pub struct ImportProgress {
    spinner: Spinner,
    started: Instant,
    appended: usize,
    duplicates: usize,
}

impl ImportProgress {
    pub fn new() -> Self {
        Self {
            spinner: Spinner::new("Importing Papers"),
            started: Instant::now(),
            appended: 0,
            duplicates: 0,
        }
    }

    pub fn appended(&mut self) {
        self.appended += 1;
        self.refresh();
    }

    pub fn duplicate(&mut self) {
        self.duplicates += 1;
        self.refresh();
    }

    fn refresh(&self) {
        self.spinner
            .set_message(&format!("Importing: {} appended, {} duplicates", self.appended, self.duplicates));
    }

    pub fn finish(self) -> (usize, usize) {
        self.spinner.finish_with_message("Done");
        println!(
            "{} {}  {} {}  {} {}",
            Icons::CLOCK.style(theme().dim.clone()),
            HumanDuration(self.started.elapsed()),
            Icons::PAPER.style(theme().info.clone()),
            self.appended,
            Icons::SKIP.style(theme().info.clone()),
            self.duplicates
        );
        (self.appended, self.duplicates)
    }
}

impl Default for ImportProgress {
    fn default() -> Self {
        Self::new()
    }
}
