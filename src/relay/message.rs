//! Notification text.

use crate::api::Homework;
use crate::error::RelayError;

/// Longest text Telegram's `sendMessage` accepts, in characters.
pub const MAX_MESSAGE_CHARS: usize = 4096;

const ELLIPSIS: &str = "...";

/// Text announcing the current status of `homework`.
///
/// Never longer than [`MAX_MESSAGE_CHARS`]: an oversized reviewer comment is
/// cut first so the name and verdict survive.
///
/// # Examples
///
/// ```rust
/// use homework_relay::api::{Homework, HomeworkStatus};
/// use homework_relay::relay::status_message;
///
/// let homework = Homework {
///     id: 1,
///     name: "hw.zip".to_string(),
///     status: HomeworkStatus::Approved,
///     reviewer_comment: None,
///     lesson_name: None,
///     date_updated: None,
/// };
/// let text = status_message(&homework);
/// assert!(text.starts_with("Review status changed for \"hw.zip\"."));
/// assert!(text.ends_with("the reviewer liked everything. Hooray!"));
/// ```
pub fn status_message(homework: &Homework) -> String {
    let mut text = format!(
        "Review status changed for \"{}\". {}",
        homework.name,
        homework.status.verdict()
    );
    if let Some(comment) = homework
        .reviewer_comment
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
    {
        text.push_str("\nReviewer comment: ");
        text.push_str(comment);
    }
    truncate_chars(text, MAX_MESSAGE_CHARS)
}

/// Cut `text` to at most `limit` characters, marking the cut with `...`.
fn truncate_chars(mut text: String, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text;
    }
    let keep = limit.saturating_sub(ELLIPSIS.len());
    if let Some((at, _)) = text.char_indices().nth(keep) {
        text.truncate(at);
    }
    text.push_str(ELLIPSIS);
    text
}

/// Text reporting a failed cycle to the chat.
pub fn failure_message(error: &RelayError) -> String {
    let text = format!("Bot failure: {}", error.to_string().trim_end());
    truncate_chars(text, MAX_MESSAGE_CHARS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::HomeworkStatus;

    fn homework(status: HomeworkStatus, comment: Option<&str>) -> Homework {
        Homework {
            id: 3,
            name: "student__hw05_final.zip".to_string(),
            status,
            reviewer_comment: comment.map(str::to_string),
            lesson_name: None,
            date_updated: None,
        }
    }

    #[test]
    fn test_message_with_comment() {
        let text = status_message(&homework(HomeworkStatus::Rejected, Some("Tests are red. ")));
        assert_eq!(
            text,
            "Review status changed for \"student__hw05_final.zip\". \
             The work has been reviewed: the reviewer has remarks.\n\
             Reviewer comment: Tests are red."
        );
    }

    #[test]
    fn test_blank_comment_is_skipped() {
        let text = status_message(&homework(HomeworkStatus::Reviewing, Some("   ")));
        assert!(!text.contains("Reviewer comment"));
        assert!(text.ends_with("The work has been taken for review."));
    }

    #[test]
    fn test_long_comment_is_cut_to_telegram_limit() {
        let comment = "x".repeat(5000);
        let text = status_message(&homework(HomeworkStatus::Rejected, Some(&comment)));

        assert_eq!(text.chars().count(), MAX_MESSAGE_CHARS);
        assert!(text.contains("the reviewer has remarks.\nReviewer comment: xxx"));
        assert!(text.ends_with("x..."));
    }

    #[test]
    fn test_cut_respects_char_boundaries() {
        let comment = "ё".repeat(5000);
        let text = status_message(&homework(HomeworkStatus::Approved, Some(&comment)));

        assert_eq!(text.chars().count(), MAX_MESSAGE_CHARS);
        assert!(text.contains("Hooray!"));
        assert!(text.ends_with("ё..."));
    }

    #[test]
    fn test_short_text_is_untouched() {
        assert_eq!(truncate_chars("abc".to_string(), 3), "abc");
        assert_eq!(truncate_chars("abcdef".to_string(), 5), "ab...");
    }

    #[test]
    fn test_failure_message() {
        let text = failure_message(&RelayError::Delivery("timeout".to_string()));
        assert_eq!(text, "Bot failure: Failed to deliver message: timeout");
    }
}
