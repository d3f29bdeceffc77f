/// A modal the screen is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialog {
    /// Leaving with unsaved content: stay, discard or save as draft.
    UnsavedChanges,
    /// "Cancel this order?"
    ConfirmCancel,
}

/// Result of the unsaved-changes dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackChoice {
    Cancel,
    Discard,
    Save,
    /// Closed some other way (tapped outside, system back).
    Dismissed,
}

impl BackChoice {
    /// Maps the raw value a dialog resolved with. Anything unrecognised,
    /// including no value at all, keeps the user on the screen.
    pub fn from_result(result: Option<&str>) -> Self {
        match result {
            Some("cancel") => BackChoice::Cancel,
            Some("discard") => BackChoice::Discard,
            Some("save") => BackChoice::Save,
            _ => BackChoice::Dismissed,
        }
    }
}

/// What the view should do after a back request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackOutcome {
    Leave,
    Stay,
    /// The unsaved-changes dialog is open; resolve it with a [`BackChoice`].
    AwaitingChoice,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialog_results_map_to_choices() {
        assert_eq!(BackChoice::from_result(Some("cancel")), BackChoice::Cancel);
        assert_eq!(BackChoice::from_result(Some("discard")), BackChoice::Discard);
        assert_eq!(BackChoice::from_result(Some("save")), BackChoice::Save);
        assert_eq!(BackChoice::from_result(Some("SAVE")), BackChoice::Dismissed);
        assert_eq!(BackChoice::from_result(None), BackChoice::Dismissed);
    }
}
