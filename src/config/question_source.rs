//! Question source configuration constants.
//!
//! Defaults for the generative-language backend and the size of a deck.

/// Model used when `GEMINI_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";

/// API root used when `GEMINI_API_BASE` is not set.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Questions requested when the setup form does not say.
pub const DEFAULT_QUESTION_COUNT: usize = 40;

/// Upper bound on questions per deck.
pub const MAX_QUESTION_COUNT: usize = 100;

/// Timeout (seconds) for one generation request.
pub const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Largest response body accepted from the API, in bytes.
pub const MAX_RESPONSE_BYTES: usize = 2 * 1024 * 1024;

/// Safety thresholds sent with every request.
pub const SAFETY_SETTINGS: [(&str, &str); 2] = [
    ("HARM_CATEGORY_HARASSMENT", "BLOCK_MEDIUM_AND_ABOVE"),
    ("HARM_CATEGORY_HATE_SPEECH", "BLOCK_MEDIUM_AND_ABOVE"),
];
