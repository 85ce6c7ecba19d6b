use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Envelope used by the auxiliary JSON routes.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_omits_message() {
        let json = serde_json::to_value(ApiResponse::success("ok")).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true, "data": "ok" }));
    }

    #[test]
    fn error_omits_data() {
        let json = serde_json::to_value(ApiResponse::<()>::error("boom")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "success": false, "message": "boom" })
        );
    }
}
