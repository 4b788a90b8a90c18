use super::TrackingError;
use std::fmt;

/// State of an asynchronous job as reported by `track.get`.
///
/// Negative codes are terminal, non-negative codes mean the job is still in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackStatus {
    IsNotModerated,
    OnModerate,
    WillBeDoneLater,
    Canceled,
    FinishedWithError,
    FinishedWithSuccess,
    Accepted,
    Started,
    InProcess,
    Sorting,
    Formating,
    GeneratingReport,
    CheckingForSpam,
}

impl TrackStatus {
    /// Every known status, ordered by code.
    pub const ALL: [TrackStatus; 13] = [
        TrackStatus::IsNotModerated,
        TrackStatus::OnModerate,
        TrackStatus::WillBeDoneLater,
        TrackStatus::Canceled,
        TrackStatus::FinishedWithError,
        TrackStatus::FinishedWithSuccess,
        TrackStatus::Accepted,
        TrackStatus::Started,
        TrackStatus::InProcess,
        TrackStatus::Sorting,
        TrackStatus::Formating,
        TrackStatus::GeneratingReport,
        TrackStatus::CheckingForSpam,
    ];

    /// Fails closed: codes outside -6..=6 are an error, never a guess.
    pub fn from_code(code: i64) -> Result<Self, TrackingError> {
        Ok(match code {
            -6 => TrackStatus::IsNotModerated,
            -5 => TrackStatus::OnModerate,
            -4 => TrackStatus::WillBeDoneLater,
            -3 => TrackStatus::Canceled,
            -2 => TrackStatus::FinishedWithError,
            -1 => TrackStatus::FinishedWithSuccess,
            0 => TrackStatus::Accepted,
            1 => TrackStatus::Started,
            2 => TrackStatus::InProcess,
            3 => TrackStatus::Sorting,
            4 => TrackStatus::Formating,
            5 => TrackStatus::GeneratingReport,
            6 => TrackStatus::CheckingForSpam,
            other => return Err(TrackingError::UnknownStatusCode { code: other }),
        })
    }

    pub fn code(self) -> i64 {
        match self {
            TrackStatus::IsNotModerated => -6,
            TrackStatus::OnModerate => -5,
            TrackStatus::WillBeDoneLater => -4,
            TrackStatus::Canceled => -3,
            TrackStatus::FinishedWithError => -2,
            TrackStatus::FinishedWithSuccess => -1,
            TrackStatus::Accepted => 0,
            TrackStatus::Started => 1,
            TrackStatus::InProcess => 2,
            TrackStatus::Sorting => 3,
            TrackStatus::Formating => 4,
            TrackStatus::GeneratingReport => 5,
            TrackStatus::CheckingForSpam => 6,
        }
    }

    /// Label used by the API documentation (spelling included).
    pub fn label(self) -> &'static str {
        match self {
            TrackStatus::IsNotModerated => "IS_NOT_MODERATED",
            TrackStatus::OnModerate => "ON_MODERATE",
            TrackStatus::WillBeDoneLater => "WILL_BE_DONE_LATER",
            TrackStatus::Canceled => "CANCELED",
            TrackStatus::FinishedWithError => "FINISHED_WITH_ERROR",
            TrackStatus::FinishedWithSuccess => "FINISHED_WITH_SUCCESS",
            TrackStatus::Accepted => "ACCEPTED",
            TrackStatus::Started => "STARTED",
            TrackStatus::InProcess => "IN_PROCESS",
            TrackStatus::Sorting => "SORTING",
            TrackStatus::Formating => "FORMATING",
            TrackStatus::GeneratingReport => "GENERATING_REPORT",
            TrackStatus::CheckingForSpam => "CHECKING_FOR_SPAM",
        }
    }

    pub fn is_finished(self) -> bool {
        self.code() < 0
    }
}

impl TryFrom<i64> for TrackStatus {
    type Error = TrackingError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

impl fmt::Display for TrackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_total_over_known_codes() {
        for code in -6..=6 {
            let status = TrackStatus::from_code(code).expect("known code");
            assert_eq!(status.code(), code);
        }
        let codes: Vec<i64> = TrackStatus::ALL.iter().map(|s| s.code()).collect();
        assert_eq!(codes, (-6..=6).collect::<Vec<_>>());
    }

    #[test]
    fn unknown_codes_fail_closed() {
        for code in [-7, 7, 100, i64::MIN, i64::MAX] {
            assert!(matches!(
                TrackStatus::from_code(code),
                Err(TrackingError::UnknownStatusCode { code: c }) if c == code
            ));
        }
    }

    #[test]
    fn finished_iff_negative() {
        for status in TrackStatus::ALL {
            assert_eq!(status.is_finished(), status.code() < 0, "{status}");
        }
    }

    #[test]
    fn labels_match_api_names() {
        assert_eq!(TrackStatus::FinishedWithSuccess.label(), "FINISHED_WITH_SUCCESS");
        assert_eq!(TrackStatus::Formating.to_string(), "FORMATING");
        assert_eq!(TrackStatus::try_from(-6i64).unwrap().label(), "IS_NOT_MODERATED");
        assert_eq!(TrackStatus::try_from(6i64).unwrap().label(), "CHECKING_FOR_SPAM");
    }
}
