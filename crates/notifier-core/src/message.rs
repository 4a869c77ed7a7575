//! Notification message composition.

use crate::outcome::BuildOutcome;

/// Compose the message sent for a finished build.
///
/// An empty template yields the bare status line; otherwise the template is
/// prepended, separated by a comma.
pub fn compose_message(outcome: &BuildOutcome, template: &str) -> String {
    let status = format!(
        "Project {} has finished build. Build status is {}",
        outcome.display_name,
        outcome.result_label()
    );

    if template.is_empty() {
        status
    } else {
        format!("{}, {}", template, status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::BuildResult;

    #[test]
    fn test_message_without_template() {
        let outcome = BuildOutcome::new("X", BuildResult::Success);
        assert_eq!(
            compose_message(&outcome, ""),
            "Project X has finished build. Build status is SUCCESS"
        );
    }

    #[test]
    fn test_message_with_template() {
        let outcome = BuildOutcome::new("X", BuildResult::Success);
        assert_eq!(
            compose_message(&outcome, "T"),
            "T, Project X has finished build. Build status is SUCCESS"
        );
    }

    #[test]
    fn test_message_uses_result_label() {
        let outcome = BuildOutcome::new("backend #17", BuildResult::NotBuilt);
        assert_eq!(
            compose_message(&outcome, "Heads up"),
            "Heads up, Project backend #17 has finished build. Build status is NOT_BUILT"
        );
    }

    #[test]
    fn test_whitespace_template_is_kept() {
        // Only a truly empty template is treated as absent.
        let outcome = BuildOutcome::new("X", BuildResult::Failure);
        assert_eq!(
            compose_message(&outcome, " "),
            " , Project X has finished build. Build status is FAILURE"
        );
    }
}
