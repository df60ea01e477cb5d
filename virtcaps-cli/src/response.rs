//! Output envelope for command results

use serde::{Deserialize, Serialize};
use virtcaps::Error;

#[derive(Debug, Serialize, Deserialize)]
pub struct Report<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ReportError>,
}

/// Failure detail: the library error classification plus its message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportError {
    /// `NotFound`, `Unsupported`, `Document` or `Source`.
    pub kind: String,
    pub message: String,
}

impl<T: Serialize> Report<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl Report<()> {
    pub fn failure(err: &Error) -> Self {
        Report {
            success: false,
            data: None,
            error: Some(ReportError {
                kind: err.kind().to_string(),
                message: err.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_success() {
        let report: Report<&str> = Report::success("test");
        assert!(report.success);
        assert_eq!(report.data, Some("test"));
        assert!(report.error.is_none());
    }

    #[test]
    fn test_report_failure_carries_kind() {
        let report = Report::failure(&Error::not_found("enum", "secure"));
        assert!(!report.success);
        assert!(report.data.is_none());
        let error = report.error.unwrap();
        assert_eq!(error.kind, "NotFound");
        assert!(error.message.contains("secure"));
    }

    #[test]
    fn test_report_json_shape() {
        let json = serde_json::to_string(&Report::failure(&Error::NoGuestCapability)).unwrap();
        assert_eq!(
            json,
            r#"{"success":false,"data":null,"error":{"kind":"Unsupported","message":"Host does not support any virtualization options: it supports no guest types"}}"#
        );
    }
}
