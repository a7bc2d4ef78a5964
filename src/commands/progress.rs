//! Progress display for the flash engines

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;
use xenflash_core::flash::{SessionProgress, Verification};
use xenflash_core::region::FlashRegion;

/// Create a progress bar with custom phase message
fn create_progress_bar_with_phase(
    total: u64,
    phase: &str,
) -> Result<ProgressBar, Box<dyn std::error::Error>> {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{bytes}}/{{total_bytes}} ({{bytes_per_sec}}, {{eta}}) {} {{msg}}",
                phase
            ))?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

/// Create a standard spinner style
fn create_spinner_style() -> Result<ProgressStyle, Box<dyn std::error::Error>> {
    Ok(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?)
}

/// Indicatif-backed session progress
pub struct IndicatifProgress {
    multi: MultiProgress,
    current_bar: Option<ProgressBar>,
}

impl IndicatifProgress {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            current_bar: None,
        }
    }

    fn create_bar(&mut self, total: u64, phase: &'static str) {
        let pb = self.multi.add(
            create_progress_bar_with_phase(total, phase)
                .unwrap_or_else(|_| ProgressBar::new(total)),
        );
        self.current_bar = Some(pb);
    }

    fn create_spinner(&mut self, message: String) {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(create_spinner_style().unwrap_or_else(|_| ProgressStyle::default_spinner()));
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(100));
        self.current_bar = Some(pb);
    }

    /// Close the current bar, if any
    pub(crate) fn finish(&mut self, message: &str) {
        if let Some(pb) = self.current_bar.take() {
            pb.finish_with_message(message.to_string());
        }
    }
}

impl Default for IndicatifProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionProgress for IndicatifProgress {
    fn erasing(&mut self) {
        self.create_spinner("Erasing full 2 MiB flash...".to_string());
    }

    fn erase_complete(&mut self) {
        self.finish("Erase complete");
    }

    fn reading(&mut self, total_bytes: usize) {
        self.create_bar(total_bytes as u64, "Reading");
    }

    fn writing(&mut self, total_bytes: usize) {
        self.finish("Erase complete");
        self.create_bar(total_bytes as u64, "Writing");
    }

    fn verifying(&mut self, total_bytes: usize) {
        self.finish("Write complete");
        self.create_bar(total_bytes as u64, "Verifying");
    }

    fn region(&mut self, region: &FlashRegion) {
        if let Some(pb) = &self.current_bar {
            pb.set_message(region.name);
        }
    }

    fn progress(&mut self, bytes_done: usize) {
        if let Some(pb) = &self.current_bar {
            pb.set_position(bytes_done as u64);
        }
    }

    fn complete(&mut self, outcome: Verification) {
        match outcome {
            Verification::Verified => self.finish("Verified"),
            Verification::Mismatch => self.finish("Mismatch"),
        }
    }
}
