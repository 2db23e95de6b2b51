//! Danger classification of generated commands.

use super::DangerPatterns;

/// Outcome of screening a command against the dangerous pattern list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Safe,
    /// `reason` names the first matching pattern in its original case.
    Dangerous { reason: String },
}

impl Verdict {
    pub fn is_dangerous(&self) -> bool {
        matches!(self, Verdict::Dangerous { .. })
    }
}

/// Screen `command` against `patterns`.
///
/// Matching is ASCII case-insensitive substring containment, nothing more: a
/// pattern matches mid-token, and regex-looking patterns are taken literally.
/// The first pattern (in list order) that matches decides the reason.
pub fn classify(command: &str, patterns: &DangerPatterns) -> Verdict {
    let command = command.to_ascii_lowercase();

    for pattern in patterns.iter() {
        if command.contains(&pattern.to_ascii_lowercase()) {
            return Verdict::Dangerous {
                reason: format!("Command contains dangerous pattern: {}", pattern),
            };
        }
    }

    Verdict::Safe
}
