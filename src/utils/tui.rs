use indicatif::{ProgressBar, ProgressStyle};

pub fn create_spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["-", "\\", "|", "/"])
            .template("{msg} {spinner}")
            .unwrap(),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}

/// Spinner message for a fetch over the given stage names.
pub fn fetch_message(stage_names: &[String]) -> String {
    match stage_names {
        [] => "Fetching matches...".to_string(),
        [one] => format!("Fetching {one}..."),
        many => format!("Fetching {} stages...", many.len()),
    }
}
