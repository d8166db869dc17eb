use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Errors that can occur when decoding persisted answers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnswerError {
    #[error("invalid answer code: {0}")]
    InvalidCode(u8),
}

//
// ─── ANSWER ───────────────────────────────────────────────────────────────────
//

/// A respondent's choice for a single yes/no question.
///
/// Unanswered questions are represented as `Option::<Answer>::None`; only a
/// chosen answer ever reaches the results file, as its numeric code:
/// - `No`: serialized as 0
/// - `Yes`: serialized as 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    No,
    Yes,
}

impl Answer {
    /// Converts a persisted numeric code (0 or 1) to an `Answer`.
    ///
    /// # Errors
    ///
    /// Returns `AnswerError::InvalidCode` if the value is not 0 or 1.
    pub fn from_u8(value: u8) -> Result<Self, AnswerError> {
        match value {
            0 => Ok(Self::No),
            1 => Ok(Self::Yes),
            _ => Err(AnswerError::InvalidCode(value)),
        }
    }

    /// Maps this answer to its persisted numeric code.
    #[must_use]
    pub fn as_u8(self) -> u8 {
        match self {
            Answer::No => 0,
            Answer::Yes => 1,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_code_conversion_works() {
        assert_eq!(Answer::from_u8(0).unwrap(), Answer::No);
        assert_eq!(Answer::from_u8(1).unwrap(), Answer::Yes);
        let err = Answer::from_u8(7).unwrap_err();
        assert!(matches!(err, AnswerError::InvalidCode(7)));
    }

    #[test]
    fn code_mapping_round_trips() {
        assert_eq!(Answer::No.as_u8(), 0);
        assert_eq!(Answer::Yes.as_u8(), 1);
        assert_eq!(Answer::from_u8(Answer::Yes.as_u8()).unwrap(), Answer::Yes);
    }
}
