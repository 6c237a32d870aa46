//! Status display trait for boot messages

use core::fmt;

/// Errors that can occur writing to the status display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Display bus write failed
    Bus,
    /// Text does not fit the line
    Overflow,
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayError::Bus => f.write_str("display bus error"),
            DisplayError::Overflow => f.write_str("text too long"),
        }
    }
}

/// Trait for the on-device status display
///
/// A write-only text console, like the LCD's `println` during boot. Used
/// for short human-readable progress and error lines before the main UI
/// takes over.
pub trait StatusDisplay {
    /// Print one line of text
    fn println(&mut self, text: &str) -> Result<(), DisplayError>;

    /// Clear the screen and move back to the top line
    fn clear(&mut self) -> Result<(), DisplayError>;
}

/// Status display that drops everything (headless builds)
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDisplay;

impl StatusDisplay for NullDisplay {
    fn println(&mut self, _text: &str) -> Result<(), DisplayError> {
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }
}
