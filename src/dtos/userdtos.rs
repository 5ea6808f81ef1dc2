// dtos/userdtos.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

use crate::db::userdb::ReferralStats;
use crate::models::usermodel::User;

pub fn validate_phone_number(phone: &str) -> Result<(), ValidationError> {
    // Kenyan mobile formats: +2547XXXXXXXX, 2547XXXXXXXX, 07XXXXXXXX, 01XXXXXXXX
    let phone_regex = regex::Regex::new(r"^(\+254|254|0)(7|1)\d{8}$")
        .map_err(|_| ValidationError::new("Invalid phone regex"))?;

    if !phone_regex.is_match(phone) {
        let mut error = ValidationError::new("invalid_phone");
        error.message = Some(Cow::from(
            "Phone number must be a valid Kenyan mobile number (e.g., +254712345678 or 0712345678)",
        ));
        return Err(error);
    }
    Ok(())
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct RegisterUserDto {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(
        length(min = 1, message = "Password is required"),
        length(min = 6, message = "Password must be at least 6 characters")
    )]
    pub password: String,

    #[validate(
        length(min = 1, message = "Confirm Password is required"),
        must_match(other = "password", message = "passwords do not match")
    )]
    #[serde(rename = "passwordConfirm")]
    pub password_confirm: String,

    #[validate(custom = "validate_phone_number")]
    pub phone_number: Option<String>,

    pub referral_code: Option<String>,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct LoginUserDto {
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(
        length(min = 1, message = "Password is required"),
        length(min = 6, message = "Password must be at least 6 characters")
    )]
    pub password: String,
}

#[derive(Serialize, Deserialize, Validate)]
pub struct RequestQueryDto {
    #[validate(range(min = 1))]
    pub page: Option<usize>,
    #[validate(range(min = 1, max = 50))]
    pub limit: Option<usize>,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct SetWithdrawalPinDto {
    #[validate(length(min = 4, max = 6, message = "PIN must be 4 to 6 digits"))]
    pub pin: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilterUserDto {
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub role: String,
    pub referral_code: Option<String>,
    pub has_withdrawal_pin: bool,
    pub verified: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl FilterUserDto {
    pub fn filter_user(user: &User) -> Self {
        FilterUserDto {
            id: user.id.to_string(),
            name: user.name.to_owned(),
            username: user.username.to_owned(),
            email: user.email.to_owned(),
            phone_number: user.phone_number.clone(),
            role: user.role.to_str().to_string(),
            referral_code: user.referral_code.clone(),
            has_withdrawal_pin: user.has_withdrawal_pin(),
            verified: user.verified,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserData {
    pub user: FilterUserDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponseDto {
    pub status: String,
    pub data: UserData,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserListResponseDto {
    pub status: String,
    pub users: Vec<FilterUserDto>,
    pub results: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserLoginResponseDto {
    pub status: String,
    pub token: String,
}

#[derive(Serialize, Deserialize)]
pub struct Response {
    pub status: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReferralLinkResponseDto {
    pub referral_code: String,
    pub referral_link: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReferralStatsResponseDto {
    pub total_referrals: i64,
    pub total_commission: f64,
    pub referred_users: Vec<ReferredUserDto>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReferredUserDto {
    pub username: String,
    pub joined_at: DateTime<Utc>,
}

impl From<ReferralStats> for ReferralStatsResponseDto {
    fn from(stats: ReferralStats) -> Self {
        Self {
            total_referrals: stats.total_referrals,
            total_commission: stats.total_commission as f64 / 100.0,
            referred_users: stats
                .referred_users
                .into_iter()
                .map(|u| ReferredUserDto {
                    username: u.username,
                    joined_at: u.joined_at,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_validation() {
        assert!(validate_phone_number("+254712345678").is_ok());
        assert!(validate_phone_number("254712345678").is_ok());
        assert!(validate_phone_number("0712345678").is_ok());
        assert!(validate_phone_number("0112345678").is_ok());
        assert!(validate_phone_number("12345").is_err());
        assert!(validate_phone_number("+254812345678").is_err());
        assert!(validate_phone_number("071234567").is_err());
    }
}
