use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::photo::PhotoResponse;
use super::shared::double_option;
use crate::entity::{photo, user};
use crate::error::AppError;
use crate::models::auth::validate_known_as;
use crate::services::directory::{
    AgeRange, DEFAULT_MAX_AGE, DEFAULT_MIN_AGE, DEFAULT_PAGE_SIZE, DirectoryQuery, LikesMode,
    MAX_PAGE_SIZE, ProfilePatch, UserOrder, age_on,
};

/// Query parameters for the user directory.
#[derive(Deserialize, Default, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserListQuery {
    /// Page number (default: 1).
    pub page: Option<u64>,
    /// Items per page (default: 10, max: 50).
    pub page_size: Option<u64>,
    /// Minimum age, inclusive (default 18 when only `max_age` is given).
    pub min_age: Option<u32>,
    /// Maximum age, inclusive (default 99 when only `min_age` is given).
    pub max_age: Option<u32>,
    /// Gender to list; defaults to the opposite of the caller's.
    pub gender: Option<String>,
    /// Sort key, always descending.
    pub order_by: Option<UserOrder>,
    /// Restrict to users who liked the caller or whom the caller liked.
    pub likes: Option<LikesMode>,
}

impl UserListQuery {
    pub fn into_directory_query(self) -> Result<DirectoryQuery, AppError> {
        let page = Ord::max(self.page.unwrap_or(1), 1);
        let page_size = self
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        let ages = match (self.min_age, self.max_age) {
            (None, None) => None,
            (min, max) => {
                let min = min.unwrap_or(DEFAULT_MIN_AGE);
                let max = max.unwrap_or(DEFAULT_MAX_AGE);
                if min > max {
                    return Err(AppError::Validation(
                        "min_age must not exceed max_age".into(),
                    ));
                }
                Some(AgeRange { min, max })
            }
        };

        let gender = self
            .gender
            .map(|g| g.trim().to_lowercase())
            .filter(|g| !g.is_empty());

        let query = DirectoryQuery {
            page,
            page_size,
            ages,
            gender,
            order_by: self.order_by.unwrap_or_default(),
            likes: self.likes.unwrap_or_default(),
        };
        if query.offset().is_none() {
            return Err(AppError::Validation("page is out of range".into()));
        }
        Ok(query)
    }
}

/// A user as shown in directory listings.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UserListItem {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "Alice")]
    pub known_as: String,
    #[schema(example = "female")]
    pub gender: Option<String>,
    /// Age in whole years, if a birth date is known.
    #[schema(example = 31)]
    pub age: Option<u32>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub created: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
    /// URL of the main photo, if any.
    pub photo_url: Option<String>,
}

impl UserListItem {
    pub fn new(user: user::Model, photo_url: Option<String>, today: NaiveDate) -> Self {
        Self {
            id: user.id,
            username: user.username,
            known_as: user.known_as,
            gender: user.gender,
            age: user.date_of_birth.map(|dob| age_on(dob, today)),
            city: user.city,
            country: user.country,
            created: user.created,
            last_active: user.last_active,
            photo_url,
        }
    }

    /// Build list items, looking main photo URLs up by user id.
    pub fn from_page(
        users: Vec<user::Model>,
        main_photos: &HashMap<i32, String>,
        today: NaiveDate,
    ) -> Vec<Self> {
        users
            .into_iter()
            .map(|u| {
                let url = main_photos.get(&u.id).cloned();
                Self::new(u, url, today)
            })
            .collect()
    }
}

/// A user's full profile, including photos.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UserDetail {
    pub id: i32,
    pub username: String,
    pub known_as: String,
    pub gender: Option<String>,
    pub age: Option<u32>,
    #[schema(value_type = Option<String>, format = Date)]
    pub date_of_birth: Option<NaiveDate>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub introduction: Option<String>,
    pub looking_for: Option<String>,
    pub interests: Option<String>,
    pub created: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
    pub photo_url: Option<String>,
    pub photos: Vec<PhotoResponse>,
}

impl UserDetail {
    pub fn new(user: user::Model, photos: Vec<photo::Model>, today: NaiveDate) -> Self {
        let photo_url = photos.iter().find(|p| p.is_main).map(|p| p.url.clone());
        Self {
            id: user.id,
            username: user.username,
            known_as: user.known_as,
            gender: user.gender,
            age: user.date_of_birth.map(|dob| age_on(dob, today)),
            date_of_birth: user.date_of_birth,
            city: user.city,
            country: user.country,
            introduction: user.introduction,
            looking_for: user.looking_for,
            interests: user.interests,
            created: user.created,
            last_active: user.last_active,
            photo_url,
            photos: photos.into_iter().map(PhotoResponse::from).collect(),
        }
    }
}

/// Partial profile update. Omitted fields are left unchanged; `null` clears.
#[derive(Deserialize, Default, utoipa::ToSchema)]
pub struct UpdateUserRequest {
    #[schema(example = "Ally")]
    pub known_as: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub introduction: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub looking_for: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub interests: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub city: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub country: Option<Option<String>>,
}

const MAX_TEXT_LEN: usize = 4000;
const MAX_PLACE_LEN: usize = 100;

pub fn validate_update_user(payload: &UpdateUserRequest) -> Result<(), AppError> {
    if let Some(known_as) = &payload.known_as {
        validate_known_as(known_as)?;
    }
    let long_fields = [
        ("introduction", &payload.introduction),
        ("looking_for", &payload.looking_for),
        ("interests", &payload.interests),
    ];
    for (name, value) in long_fields {
        if let Some(Some(text)) = value
            && text.chars().count() > MAX_TEXT_LEN
        {
            return Err(AppError::Validation(format!(
                "{name} must be at most {MAX_TEXT_LEN} characters"
            )));
        }
    }
    for (name, value) in [("city", &payload.city), ("country", &payload.country)] {
        if let Some(Some(text)) = value
            && text.chars().count() > MAX_PLACE_LEN
        {
            return Err(AppError::Validation(format!(
                "{name} must be at most {MAX_PLACE_LEN} characters"
            )));
        }
    }
    Ok(())
}

impl From<UpdateUserRequest> for ProfilePatch {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            known_as: req.known_as,
            introduction: req.introduction,
            looking_for: req.looking_for,
            interests: req.interests,
            city: req.city,
            country: req.country,
        }
    }
}
