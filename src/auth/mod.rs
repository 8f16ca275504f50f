//! Admin authorization against the external user service.
//!
//! Every mutating catalog, vendor and purchase operation asks an
//! [`AdminValidator`] whether the acting admin may act for the target school.
//! The HTTP implementation fails closed: anything other than a well-formed,
//! matching, sufficiently privileged answer is a denial.

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
};
use serde::Deserialize;
use serde_json::Value;
use std::{convert::Infallible, time::Duration};
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::{config::AppConfig, errors::ServiceError};

/// Roles allowed to mutate store data, compared case-insensitively.
pub const ALLOWED_ROLES: [&str; 2] = ["super_admin", "store_admin"];

/// Path of the user-info lookup on the user service.
pub const USER_INFO_PATH: &str = "/api/user/get-user-info";

/// Why an admin was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdminDenial {
    #[error("AdminId is required.")]
    MissingAdminId,
    #[error("Admin not found in SMS.")]
    AdminNotFound,
    #[error("SMS response missing data.")]
    MissingData,
    #[error("Invalid or missing schoolId in SMS response.")]
    MissingSchool,
    #[error("Admin belongs to school {actual}, not {expected}.")]
    SchoolMismatch { actual: i64, expected: i32 },
    #[error("Roles missing in SMS response.")]
    MissingRoles,
    #[error("Admin does not have permission.")]
    InsufficientRole,
    #[error("Failed to validate admin user.")]
    Unreachable,
}

impl From<AdminDenial> for ServiceError {
    fn from(denial: AdminDenial) -> Self {
        ServiceError::Forbidden(denial.to_string())
    }
}

/// Decides whether `admin_id` may mutate data of `school_id`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminValidator: Send + Sync {
    /// `authorization` is the caller's `Authorization` header, forwarded verbatim.
    async fn validate(
        &self,
        admin_id: Uuid,
        school_id: i32,
        authorization: Option<String>,
    ) -> Result<(), AdminDenial>;
}

/// The inbound `Authorization` header, if any.
#[derive(Debug, Clone, Default)]
pub struct ForwardedAuth(pub Option<String>);

impl ForwardedAuth {
    pub fn header(&self) -> Option<String> {
        self.0.clone()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ForwardedAuth
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);
        Ok(ForwardedAuth(header))
    }
}

/// Wire shape of the user-info answer. Fields are optional so that each
/// absence maps to its own [`AdminDenial`].
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfoResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub data: Option<UserInfo>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    #[serde(default)]
    pub school_id: Option<Value>,
    #[serde(default)]
    pub roles: Option<Value>,
}

impl UserInfoResponse {
    /// Applies the admission rules to a decoded answer.
    pub fn evaluate(&self, school_id: i32) -> Result<(), AdminDenial> {
        if self.success != Some(true) {
            return Err(AdminDenial::AdminNotFound);
        }
        let data = self.data.as_ref().ok_or(AdminDenial::MissingData)?;

        let admin_school = data
            .school_id
            .as_ref()
            .and_then(Value::as_i64)
            .ok_or(AdminDenial::MissingSchool)?;
        if admin_school != i64::from(school_id) {
            return Err(AdminDenial::SchoolMismatch {
                actual: admin_school,
                expected: school_id,
            });
        }

        let roles = data
            .roles
            .as_ref()
            .and_then(Value::as_array)
            .ok_or(AdminDenial::MissingRoles)?;
        let permitted = roles.iter().filter_map(Value::as_str).any(|role| {
            ALLOWED_ROLES
                .iter()
                .any(|allowed| role.eq_ignore_ascii_case(allowed))
        });
        if permitted {
            Ok(())
        } else {
            Err(AdminDenial::InsufficientRole)
        }
    }
}

/// [`AdminValidator`] backed by the user service's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpAdminValidator {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAdminValidator {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::InternalError(format!("http client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(cfg: &AppConfig) -> Result<Self, ServiceError> {
        Self::new(
            cfg.user_service_url.clone(),
            Duration::from_secs(cfg.user_service_timeout_secs),
        )
    }

    fn user_info_url(&self, admin_id: Uuid) -> String {
        format!("{}{}/{}", self.base_url, USER_INFO_PATH, admin_id)
    }

    async fn fetch(
        &self,
        admin_id: Uuid,
        authorization: Option<String>,
    ) -> Result<UserInfoResponse, AdminDenial> {
        let mut request = self.client.get(self.user_info_url(admin_id));
        if let Some(token) = authorization {
            request = request.header(AUTHORIZATION, token);
        }

        let response = request.send().await.map_err(|e| {
            warn!(error = %e, "user service unreachable");
            AdminDenial::Unreachable
        })?;
        let status = response.status();

        match response.json::<UserInfoResponse>().await {
            Ok(body) => Ok(body),
            Err(_) if status == StatusCode::NOT_FOUND => Err(AdminDenial::AdminNotFound),
            Err(e) => {
                warn!(status = status.as_u16(), error = %e, "undecodable user service response");
                Err(AdminDenial::Unreachable)
            }
        }
    }
}

#[async_trait]
impl AdminValidator for HttpAdminValidator {
    #[instrument(skip(self, authorization))]
    async fn validate(
        &self,
        admin_id: Uuid,
        school_id: i32,
        authorization: Option<String>,
    ) -> Result<(), AdminDenial> {
        if admin_id.is_nil() {
            return Err(AdminDenial::MissingAdminId);
        }

        let result = self
            .fetch(admin_id, authorization)
            .await
            .and_then(|answer| answer.evaluate(school_id));

        if let Err(denial) = &result {
            metrics::counter!("estore_admin_validation.denied", 1);
            warn!(%admin_id, school_id, reason = %denial, "admin validation denied");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn answer(body: Value) -> UserInfoResponse {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn matching_school_and_role_is_accepted() {
        let a = answer(json!({"success": true, "data": {"schoolId": 7, "roles": ["librarian", "Store_Admin"]}}));
        assert_eq!(a.evaluate(7), Ok(()));
    }

    #[test]
    fn unsuccessful_answer_means_admin_not_found() {
        let a = answer(json!({"success": false}));
        assert_eq!(a.evaluate(7), Err(AdminDenial::AdminNotFound));
        assert_eq!(answer(json!({})).evaluate(7), Err(AdminDenial::AdminNotFound));
    }

    #[test]
    fn each_missing_field_has_its_own_denial() {
        assert_eq!(
            answer(json!({"success": true})).evaluate(7),
            Err(AdminDenial::MissingData)
        );
        assert_eq!(
            answer(json!({"success": true, "data": {"schoolId": "7", "roles": []}})).evaluate(7),
            Err(AdminDenial::MissingSchool)
        );
        assert_eq!(
            answer(json!({"success": true, "data": {"schoolId": 7}})).evaluate(7),
            Err(AdminDenial::MissingRoles)
        );
    }

    #[test]
    fn other_school_is_refused_with_both_ids() {
        let denial = answer(json!({"success": true, "data": {"schoolId": 3, "roles": ["super_admin"]}}))
            .evaluate(7)
            .unwrap_err();
        assert_eq!(denial.to_string(), "Admin belongs to school 3, not 7.");
    }

    #[test]
    fn unprivileged_role_is_refused() {
        let a = answer(json!({"success": true, "data": {"schoolId": 7, "roles": ["librarian", 42]}}));
        assert_eq!(a.evaluate(7), Err(AdminDenial::InsufficientRole));
    }

    #[tokio::test]
    async fn nil_admin_id_is_rejected_without_a_call() {
        let validator =
            HttpAdminValidator::new("http://127.0.0.1:9", Duration::from_millis(50)).unwrap();
        let denial = validator.validate(Uuid::nil(), 1, None).await.unwrap_err();
        assert_eq!(denial, AdminDenial::MissingAdminId);
    }

    #[test]
    fn denial_maps_to_forbidden() {
        let err: ServiceError = AdminDenial::InsufficientRole.into();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.response_message(), "Admin does not have permission.");
    }
}
