//! Modal prompts. Flows talk to the [`Prompt`] trait so they can be tested
//! with a scripted double; the real implementation shells out to zenity.

pub mod zenity;

pub use zenity::ZenityPrompt;

use crate::error::Result;

/// Blocking modal prompts. Every method returns `Ok(None)` when the user
/// cancels (closes the dialog, hits Escape, or submits nothing); only a
/// dialog binary that cannot run at all is an `Err`.
pub trait Prompt: Send + Sync {
    /// Pick one item from a list.
    fn choose(&self, title: &str, text: &str, items: &[String]) -> Result<Option<String>>;

    /// One line of free text, pre-filled with `initial`.
    fn input(&self, title: &str, text: &str, initial: &str) -> Result<Option<String>>;

    /// A multi-field form. Returns one value per field label, in order;
    /// fields the user left blank come back as empty strings.
    fn form(&self, title: &str, text: &str, fields: &[&str]) -> Result<Option<Vec<String>>>;
}
