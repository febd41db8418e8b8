use crate::foundation::error::{PlaqueError, PlaqueResult};

/// Maximum message length in characters.
pub const MAX_MESSAGE_CHARS: usize = 25;

/// The overlay text typed by the user. Never longer than [`MAX_MESSAGE_CHARS`].
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct Message(String);

impl Message {
    pub fn new(text: impl Into<String>) -> PlaqueResult<Self> {
        let text = text.into();
        if text.chars().count() > MAX_MESSAGE_CHARS {
            return Err(PlaqueError::validation(format!(
                "Message cannot exceed {MAX_MESSAGE_CHARS} characters."
            )));
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len_chars(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn remaining(&self) -> usize {
        MAX_MESSAGE_CHARS.saturating_sub(self.len_chars())
    }

    /// Character-count hint shown under the input.
    pub fn alert(&self) -> Option<LengthAlert> {
        LengthAlert::for_length(self.len_chars(), MAX_MESSAGE_CHARS)
    }
}

/// Severity of the remaining-characters hint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum LengthAlert {
    /// A few characters left (orange).
    Warning { remaining: usize },
    /// One or two characters left (red).
    Critical { remaining: usize },
    /// No characters left.
    LimitReached,
}

impl LengthAlert {
    pub fn for_length(len: usize, max: usize) -> Option<Self> {
        let remaining = max.saturating_sub(len);
        if len >= max {
            Some(Self::LimitReached)
        } else if len + 2 >= max {
            Some(Self::Critical { remaining })
        } else if len + 6 >= max {
            Some(Self::Warning { remaining })
        } else {
            None
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/message.rs"]
mod tests;
