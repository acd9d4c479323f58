//! Interactive entry picker.

use indicatif::ProgressBar;
use inquire::{InquireError, Select};
use sfref_core::{Error, Picker, Result, Selection};

/// Fuzzy-filterable terminal list backed by `inquire`.
///
/// Esc and Ctrl-C both count as a cancelled selection.
#[derive(Default)]
pub struct InquirePicker {
    spinner: Option<ProgressBar>,
}

impl InquirePicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear `spinner` before the list is drawn.
    #[must_use]
    pub fn with_spinner(mut self, spinner: ProgressBar) -> Self {
        self.spinner = Some(spinner);
        self
    }
}

impl Picker for InquirePicker {
    fn pick(&self, prompt: &str, titles: &[String]) -> Result<Selection> {
        if let Some(spinner) = &self.spinner {
            spinner.finish_and_clear();
        }

        let answer = Select::new(prompt, titles.to_vec())
            .with_page_size(15)
            .raw_prompt_skippable();

        match answer {
            Ok(Some(option)) => Ok(Selection::Index(option.index)),
            Ok(None) | Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                Ok(Selection::Cancelled)
            },
            Err(e) => Err(Error::Other(format!("Picker failed: {e}"))),
        }
    }
}
