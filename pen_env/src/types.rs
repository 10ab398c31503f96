//! Common types for the pen environment abstraction.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for a pen: its display title.
///
/// Titles are fixed at startup, so the title doubles as the registry key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PenId(String);

impl PenId {
    /// Creates a PenId from a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self(title.into())
    }
    
    /// Returns the title.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PenId {
    fn from(title: &str) -> Self {
        Self::new(title)
    }
}

impl From<String> for PenId {
    fn from(title: String) -> Self {
        Self(title)
    }
}

impl fmt::Display for PenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A popup message for the display subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Message text (may contain newlines)
    pub text: String,
}

impl Notification {
    /// Creates a notification.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Tag sent to the inventory subsystem when the carried item changes.
///
/// An empty tag means the actor's hands were cleared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemTag(String);

impl ItemTag {
    /// Creates a tag naming a carried item.
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }
    
    /// The "nothing carried" tag.
    pub fn cleared() -> Self {
        Self(String::new())
    }
    
    /// Returns true if this tag clears the carried item.
    pub fn is_cleared(&self) -> bool {
        self.0.is_empty()
    }
    
    /// Returns the raw tag.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_pen_id_display_and_order() {
        let a = PenId::from("Pen A");
        let b = PenId::new(String::from("Pen B"));
        
        assert_eq!(a.to_string(), "Pen A");
        assert_eq!(b.as_str(), "Pen B");
        assert!(a < b);
    }
    
    #[test]
    fn test_item_tag_cleared() {
        assert!(ItemTag::cleared().is_cleared());
        assert!(ItemTag::default().is_cleared());
        assert!(!ItemTag::new("human").is_cleared());
    }
}
