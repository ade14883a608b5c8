//! The closed set of verdicts an adaptor may report for one verification run.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// Reason attached to an [`Verdict::Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCause {
    /// The tool reported an error without a more specific signature.
    Generic,
    /// Output ended with the Z3 backend's error code 9.
    Z3Error9,
    /// The Z3 backend failed to convert the formula.
    Z3Conversion,
}

/// Tool-specific exception markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExceptionKind {
    /// BLAST's internal "Ack! The gremlins again!" failure.
    Gremlins,
}

/// Final classification of a verification run.
///
/// The text form (see [`Verdict::as_str`]) is stable and is what the CLI
/// prints and serializes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// The property holds.
    True,
    /// An error location is reachable.
    FalseReach,
    /// Invalid pointer dereference.
    FalseDeref,
    /// Invalid `free`.
    FalseFree,
    /// Memory leak.
    FalseMemtrack,
    Unknown,
    Timeout,
    OutOfMemory,
    Error(ErrorCause),
    Exception(ExceptionKind),
}

impl Verdict {
    pub const ALL: [Verdict; 12] = [
        Verdict::True,
        Verdict::FalseReach,
        Verdict::FalseDeref,
        Verdict::FalseFree,
        Verdict::FalseMemtrack,
        Verdict::Unknown,
        Verdict::Timeout,
        Verdict::OutOfMemory,
        Verdict::Error(ErrorCause::Generic),
        Verdict::Error(ErrorCause::Z3Error9),
        Verdict::Error(ErrorCause::Z3Conversion),
        Verdict::Exception(ExceptionKind::Gremlins),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::True => "true",
            Verdict::FalseReach => "false(reach)",
            Verdict::FalseDeref => "false(valid-deref)",
            Verdict::FalseFree => "false(valid-free)",
            Verdict::FalseMemtrack => "false(valid-memtrack)",
            Verdict::Unknown => "unknown",
            Verdict::Timeout => "TIMEOUT",
            Verdict::OutOfMemory => "OUT OF MEMORY",
            Verdict::Error(ErrorCause::Generic) => "ERROR",
            Verdict::Error(ErrorCause::Z3Error9) => "ERROR (Z3 Error 9)",
            Verdict::Error(ErrorCause::Z3Conversion) => "ERROR (Z3 conversion error)",
            Verdict::Exception(ExceptionKind::Gremlins) => "EXCEPTION (Gremlins)",
        }
    }

    pub fn property_holds(&self) -> bool {
        matches!(self, Verdict::True)
    }

    pub fn property_violated(&self) -> bool {
        matches!(
            self,
            Verdict::FalseReach | Verdict::FalseDeref | Verdict::FalseFree | Verdict::FalseMemtrack
        )
    }

    /// True when the tool gave a definite answer about the property.
    pub fn is_conclusive(&self) -> bool {
        self.property_holds() || self.property_violated()
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Verdict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Returned when a string is not the text form of any verdict.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown verdict {0:?}")]
pub struct ParseVerdictError(pub String);

impl FromStr for Verdict {
    type Err = ParseVerdictError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Verdict::ALL
            .into_iter()
            .find(|verdict| verdict.as_str() == s)
            .ok_or_else(|| ParseVerdictError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_forms_are_distinct() {
        let mut seen: Vec<&str> = Verdict::ALL.iter().map(Verdict::as_str).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), Verdict::ALL.len());
    }

    #[test]
    fn parses_text_form() {
        assert_eq!(
            "ERROR (Z3 Error 9)".parse::<Verdict>(),
            Ok(Verdict::Error(ErrorCause::Z3Error9))
        );
        assert_eq!("false(reach)".parse::<Verdict>(), Ok(Verdict::FalseReach));
        assert!("maybe".parse::<Verdict>().is_err());
    }

    #[test]
    fn serializes_as_text_form() {
        let json = serde_json::to_string(&Verdict::OutOfMemory).expect("serialize");
        assert_eq!(json, "\"OUT OF MEMORY\"");
    }

    #[test]
    fn conclusive_only_for_true_and_false() {
        assert!(Verdict::True.is_conclusive());
        assert!(Verdict::FalseMemtrack.is_conclusive());
        assert!(!Verdict::Unknown.is_conclusive());
        assert!(!Verdict::Timeout.is_conclusive());
        assert!(!Verdict::Exception(ExceptionKind::Gremlins).is_conclusive());
    }
}
