//! Copy message text to the system clipboard.

use anyhow::{Context, Result, bail};
use arboard::Clipboard;

use crate::models::ChatEntry;

/// Largest text we hand to the clipboard (1MB)
const MAX_CLIPBOARD_BYTES: usize = 1024 * 1024;

/// Seam over the system clipboard so the copy path can be tested headless
pub trait ClipboardProvider {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// The real clipboard, via arboard
pub struct SystemClipboard {
    clipboard: Clipboard,
}

impl SystemClipboard {
    pub fn new() -> Result<Self> {
        let clipboard = Clipboard::new().context("Failed to initialize clipboard")?;
        Ok(Self { clipboard })
    }
}

impl ClipboardProvider for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.clipboard.set_text(text).context("Failed to set clipboard contents")?;
        Ok(())
    }
}

fn validate(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        bail!("Nothing to copy");
    }
    if text.len() > MAX_CLIPBOARD_BYTES {
        bail!("Message too large to copy ({} bytes, max {})", text.len(), MAX_CLIPBOARD_BYTES);
    }
    Ok(())
}

/// Copy an entry's plain text (what the user sees, without markup)
pub fn copy_entry_with<P: ClipboardProvider + ?Sized>(
    entry: &ChatEntry,
    provider: &mut P,
) -> Result<()> {
    validate(&entry.plain_text)?;
    provider.set_text(&entry.plain_text)
}

/// Copy an entry's plain text to the system clipboard
///
/// # Errors
///
/// Fails if the entry has no visible text, is over 1MB, or the system
/// clipboard is unavailable (headless sessions, locked clipboard).
pub fn copy_entry(entry: &ChatEntry) -> Result<()> {
    validate(&entry.plain_text)?;
    let mut clipboard = SystemClipboard::new()?;
    clipboard.set_text(&entry.plain_text)
}
