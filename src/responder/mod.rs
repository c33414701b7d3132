//! Assistant replies.
//!
//! The chat talks to its assistant through the [`Responder`] trait. The only
//! implementation shipped is [`KnowledgeBase`], a static topic table; a hosted
//! model would slot in behind the same trait.

pub mod knowledge_base;

use anyhow::Result;
pub use knowledge_base::KnowledgeBase;

/// First entry of every session
pub const WELCOME_MESSAGE: &str = "Hello! I'm your AI assistant. How can I help you today?";
/// Appended in place of a reply when the responder fails
pub const FALLBACK_REPLY: &str = "Sorry, I encountered an error. Please try again.";

pub trait Responder {
    fn respond(&mut self, prompt: &str) -> Result<String>;
}

/// Ask the responder, degrading to [`FALLBACK_REPLY`] on error or empty output
pub fn reply_or_fallback<R: Responder + ?Sized>(responder: &mut R, prompt: &str) -> String {
    match responder.respond(prompt) {
        Ok(reply) if !reply.trim().is_empty() => reply.trim().to_string(),
        Ok(_) => {
            tracing::warn!("responder returned an empty reply");
            FALLBACK_REPLY.to_string()
        }
        Err(e) => {
            tracing::error!(error = %e, "responder failed");
            FALLBACK_REPLY.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::bail;

    use super::*;

    struct Failing;

    impl Responder for Failing {
        fn respond(&mut self, _prompt: &str) -> Result<String> {
            bail!("service unavailable")
        }
    }

    struct Echo;

    impl Responder for Echo {
        fn respond(&mut self, prompt: &str) -> Result<String> {
            Ok(format!("  {}  ", prompt))
        }
    }

    #[test]
    fn test_fallback_on_error() {
        assert_eq!(reply_or_fallback(&mut Failing, "hi"), FALLBACK_REPLY);
    }

    #[test]
    fn test_fallback_on_blank_reply() {
        assert_eq!(reply_or_fallback(&mut Echo, "   "), FALLBACK_REPLY);
    }

    #[test]
    fn test_reply_is_trimmed() {
        assert_eq!(reply_or_fallback(&mut Echo, "ping"), "ping");
    }
}
