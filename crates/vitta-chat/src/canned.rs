//! Canned replies for a fixed set of trigger phrases
//!
//! Matching is exact, case- and whitespace-sensitive: a trigger typed
//! with different casing or stray whitespace goes to the backend instead.

use vitta_api::AssistantReply;

/// Comparison question answered without a backend round-trip
pub const COMPARISON_TRIGGER: &str = "How are you better than ChatGPT?";
/// Starts the email-capture sub-flow
pub const WAITLIST_TRIGGER: &str = "Join the Waitlist";
/// Starts the feedback-capture sub-flow
pub const FEEDBACK_TRIGGER: &str = "Share Feedback";

/// Return the canned reply for a recognized trigger phrase, or `None`
pub fn static_response(input: &str) -> Option<AssistantReply> {
    let content = match input {
        // Reply text kept exactly as shipped, typos included
        COMPARISON_TRIGGER => {
            "Our data is stored on Indian server using 256 bit encryption and i am \
             a better expert on indian financial instruments and data."
        }
        WAITLIST_TRIGGER => "Please provide your email id in the chat.",
        FEEDBACK_TRIGGER => {
            "Please share your feedback! We'd love to hear your thoughts on how we can improve."
        }
        _ => return None,
    };

    Some(AssistantReply {
        content: content.to_string(),
        metadata: None,
        source: Some("static".to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triggers_resolve() {
        for trigger in [COMPARISON_TRIGGER, WAITLIST_TRIGGER, FEEDBACK_TRIGGER] {
            let reply = static_response(trigger).expect("trigger should resolve");
            assert_eq!(reply.source.as_deref(), Some("static"));
            assert!(!reply.content.is_empty());
        }
    }

    #[test]
    fn test_comparison_reply_is_verbatim() {
        let reply = static_response(COMPARISON_TRIGGER).unwrap();
        assert_eq!(
            reply.content,
            "Our data is stored on Indian server using 256 bit encryption and i am \
             a better expert on indian financial instruments and data."
        );
    }

    #[test]
    fn test_non_triggers_miss() {
        assert!(static_response("What is my networth?").is_none());
        assert!(static_response("").is_none());
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        assert!(static_response("join the waitlist").is_none());
        assert!(static_response("JOIN THE WAITLIST").is_none());
    }

    #[test]
    fn test_matching_is_whitespace_sensitive() {
        assert!(static_response("Join the Waitlist ").is_none());
        assert!(static_response(" Share Feedback").is_none());
    }
}
