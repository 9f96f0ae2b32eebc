//! Identifier auto-increment: `prefix + digits` values step to the next
//! free number.

use once_cell::sync::Lazy;
use regex::Regex;

static TRAILING_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.*?)([0-9]+)$").unwrap());

/// An identifier split into its prefix and trailing digit run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierParts {
    /// Everything before the trailing digits (may be empty).
    pub prefix: String,
    /// The trailing digits exactly as written, leading zeros included.
    pub digits: String,
}

impl IdentifierParts {
    /// Split a value on its trailing digits; `None` if it has none.
    pub fn parse(value: &str) -> Option<Self> {
        let caps = TRAILING_DIGITS.captures(value)?;
        Some(Self {
            prefix: caps[1].to_string(),
            digits: caps[2].to_string(),
        })
    }

    /// Width of the digit run.
    pub fn width(&self) -> usize {
        self.digits.len()
    }

    /// True if the digit run carries leading zeros (`001`).
    pub fn is_zero_padded(&self) -> bool {
        self.digits.len() > 1 && self.digits.starts_with('0')
    }

    /// Step the number by one.
    ///
    /// Zero-padded numbers keep their width (`ID001 -> ID002`,
    /// `ID099 -> ID100`); plain numbers are rendered without padding
    /// (`Ref10 -> Ref11`). A carry past the width grows the number
    /// (`A999 -> A1000`).
    pub fn increment(&mut self) {
        let mut digits = self.digits.clone().into_bytes();
        let mut carry = true;
        for d in digits.iter_mut().rev() {
            if !carry {
                break;
            }
            if *d == b'9' {
                *d = b'0';
            } else {
                *d += 1;
                carry = false;
            }
        }
        if carry {
            digits.insert(0, b'1');
        }
        // Only ASCII digits are ever written above.
        self.digits = digits.into_iter().map(char::from).collect();
    }

    /// Render back to a single value.
    pub fn render(&self) -> String {
        format!("{}{}", self.prefix, self.digits)
    }
}

/// The next value after `value`, or `None` if it has no trailing digits.
pub fn next_identifier(value: &str) -> Option<String> {
    let mut parts = IdentifierParts::parse(value)?;
    parts.increment();
    Some(parts.render())
}

/// Outcome of searching for a free identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Increment {
    /// The value has no trailing digits; it should be copied as is.
    NotApplicable,
    /// A value not reported as taken.
    Found(String),
    /// Every candidate within the attempt budget was taken.
    Exhausted {
        /// The last value tried.
        last: String,
        attempts: usize,
    },
}

/// Increment `value` until `is_taken` reports a free value, trying at most
/// `max_attempts` candidates.
pub fn next_free_identifier<F>(value: &str, is_taken: F, max_attempts: usize) -> Increment
where
    F: Fn(&str) -> bool,
{
    let Some(mut parts) = IdentifierParts::parse(value) else {
        return Increment::NotApplicable;
    };

    let mut attempts = 0;
    loop {
        parts.increment();
        attempts += 1;
        let candidate = parts.render();
        if !is_taken(&candidate) {
            return Increment::Found(candidate);
        }
        if attempts >= max_attempts {
            return Increment::Exhausted {
                last: candidate,
                attempts,
            };
        }
    }
}
