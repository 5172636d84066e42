//! Uniform HTTP response envelopes.
//!
//! Every success response carries `{ success: true, msg, data }`; every
//! failure carries `{ success: false, message, statusCode }` with the HTTP
//! status mirroring `statusCode`. The HTTP boundary is the only place these
//! are constructed.

use serde::{Deserialize, Serialize};

/// Success envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub msg: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(msg: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            msg: msg.into(),
            data,
        }
    }
}

/// Failure envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    pub success: bool,
    pub message: String,
    pub status_code: u16,
}

impl ApiErrorBody {
    pub fn new(message: impl Into<String>, status_code: u16) -> Self {
        Self {
            success: false,
            message: message.into(),
            status_code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_shape() {
        let body = ApiResponse::new("successfully created a challenge", 7);
        let json = serde_json::to_value(&body).expect("serialize");
        assert_eq!(json["success"], true);
        assert_eq!(json["msg"], "successfully created a challenge");
        assert_eq!(json["data"], 7);
    }

    #[test]
    fn test_error_envelope_shape() {
        let body = ApiErrorBody::new("This challenge does not exist", 404);
        let json = serde_json::to_value(&body).expect("serialize");
        assert_eq!(json["success"], false);
        assert_eq!(json["statusCode"], 404);
    }
}
