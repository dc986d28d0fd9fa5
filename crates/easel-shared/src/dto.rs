//! Data Transfer Objects - request/response types for the API.
//!
//! Request fields default to empty so that a missing key reaches
//! validation and is reported like any other missing field.

use serde::{Deserialize, Serialize};

/// A bare `{userId}` body: the duplicate-id checks, the id change and
/// the profile image removal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckIdRequest {
    #[serde(default)]
    pub user_id: String,
}

/// A bare `{userName}` body: the name checks and the nickname change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckNameRequest {
    #[serde(default)]
    pub user_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateResponse {
    pub is_duplicate: bool,
}

/// Request to register a regular user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterUserRequest {
    pub user_name: String,
    pub user_id: String,
    pub user_pwd: String,
    pub phone_num: String,
}

/// Request to register an author.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterAuthorRequest {
    pub author_name: String,
    pub author_id: String,
    pub author_pwd: String,
    pub author_phone_num: String,
    pub author_bio: String,
}

/// Request to login. Author clients may send `authorId`/`authorPwd`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginRequest {
    #[serde(alias = "authorId")]
    pub user_id: String,
    #[serde(alias = "authorPwd")]
    pub user_pwd: String,
}

/// Payload of a successful login, wrapped in `ApiResponse`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    pub user_id: String,
    pub user_name: String,
    pub token: String,
    pub is_author: bool,
    pub expires_in: u64,
}

/// Public view of an account. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user_id: String,
    pub user_name: String,
    pub phone_num: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_bio: Option<String>,
    pub is_author: bool,
}

/// `?userId=` on the profile lookup route.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileQuery {
    pub user_id: Option<String>,
}

/// Body of `PUT /api/users/profile/{userId}/phone`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdatePhoneRequest {
    pub phone_num: String,
}

/// Body of `PUT /api/users/profile/{userId}/password`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdatePasswordRequest {
    pub password: String,
}

/// Body of `POST /api/user/change-password`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangePasswordRequest {
    pub user_id: String,
    pub new_password: String,
}

/// Request to create a post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
}

/// `?query=` on the post listing routes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostSearchQuery {
    pub query: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub filename: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageUploadResponse {
    pub image_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationResponse {
    pub location: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_accepts_author_keys() {
        let req: LoginRequest =
            serde_json::from_str(r#"{"authorId":"lee","authorPwd":"pw12"}"#).unwrap();
        assert_eq!(req.user_id, "lee");
        assert_eq!(req.user_pwd, "pw12");
    }

    #[test]
    fn test_missing_keys_default_to_empty() {
        let req: RegisterUserRequest = serde_json::from_str(r#"{"userId":"kim"}"#).unwrap();
        assert_eq!(req.user_id, "kim");
        assert!(req.user_pwd.is_empty());
    }

    #[test]
    fn test_profile_response_is_camel_case() {
        let body = serde_json::to_value(ProfileResponse {
            user_id: "kim".to_string(),
            user_name: "Kim".to_string(),
            phone_num: "010".to_string(),
            profile_image: None,
            description: None,
            author_bio: None,
            is_author: false,
        })
        .unwrap();

        assert_eq!(body["userId"], "kim");
        assert_eq!(body["phoneNum"], "010");
        assert!(body.get("profileImage").is_none());
    }
}
