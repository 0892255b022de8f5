use std::collections::HashMap;

use chrono::{Days, Months, NaiveDate, Utc};
use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde::Deserialize;

use crate::entity::{photo, user, user_like};
use crate::error::AppError;
use crate::models::shared::Pagination;

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 50;
pub const DEFAULT_MIN_AGE: u32 = 18;
pub const DEFAULT_MAX_AGE: u32 = 99;

/// Restrict a listing to one side of the requester's like edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LikesMode {
    #[default]
    None,
    /// Users who liked the requester.
    Likers,
    /// Users the requester liked.
    Likees,
}

/// Sort key for listings; always descending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UserOrder {
    #[default]
    LastActive,
    Created,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgeRange {
    pub min: u32,
    pub max: u32,
}

/// A validated directory query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryQuery {
    pub page: u64,
    pub page_size: u64,
    pub ages: Option<AgeRange>,
    /// `None` means "the opposite of the requester's gender".
    pub gender: Option<String>,
    pub order_by: UserOrder,
    pub likes: LikesMode,
}

impl Default for DirectoryQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            ages: None,
            gender: None,
            order_by: UserOrder::default(),
            likes: LikesMode::default(),
        }
    }
}

impl DirectoryQuery {
    /// Rows to skip for the requested page, if it fits a database offset.
    pub fn offset(&self) -> Option<u64> {
        self.page
            .checked_sub(1)?
            .checked_mul(self.page_size)
            .filter(|&offset| offset <= i64::MAX as u64)
    }
}

/// One page of a directory listing.
pub struct DirectoryPage {
    pub users: Vec<user::Model>,
    /// Main photo URL per user id, for users on this page that have one.
    pub main_photos: HashMap<i32, String>,
    pub pagination: Pagination,
}

/// Fields of a profile update; `None` leaves the field unchanged.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProfilePatch {
    pub known_as: Option<String>,
    pub introduction: Option<Option<String>>,
    pub looking_for: Option<Option<String>>,
    pub interests: Option<Option<String>>,
    pub city: Option<Option<String>>,
    pub country: Option<Option<String>>,
}

/// Whole years between `dob` and `today`.
pub fn age_on(dob: NaiveDate, today: NaiveDate) -> u32 {
    let Some(years) = today.years_since(dob) else {
        return 0;
    };
    years
}

/// Inclusive birth-date bounds for people aged `min..=max` on `today`.
pub fn birth_date_range(ages: &AgeRange, today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let years_ago = |years: u32| today.checked_sub_months(Months::new(years.saturating_mul(12)));
    let earliest = years_ago(ages.max.saturating_add(1))
        .and_then(|d| d.checked_add_days(Days::new(1)))
        .unwrap_or(NaiveDate::MIN);
    let latest = years_ago(ages.min).unwrap_or(NaiveDate::MIN);
    (earliest, latest)
}

/// Default gender filter: the opposite of the requester's.
pub fn opposite_gender(gender: Option<&str>) -> &'static str {
    if gender == Some("male") {
        "female"
    } else {
        "male"
    }
}

/// Paginated, filtered discovery of other users, plus profile reads and updates.
pub struct DirectoryService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> DirectoryService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: i32) -> Result<user::Model, AppError> {
        user::Entity::find_by_id(id)
            .one(self.conn)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }

    /// List users other than the requester matching `query`.
    pub async fn list(
        &self,
        requester_id: i32,
        query: &DirectoryQuery,
    ) -> Result<DirectoryPage, AppError> {
        let requester = self.get(requester_id).await?;

        let gender = query
            .gender
            .clone()
            .unwrap_or_else(|| opposite_gender(requester.gender.as_deref()).to_string());

        let mut select = user::Entity::find()
            .filter(user::Column::Id.ne(requester_id))
            .filter(user::Column::Gender.eq(gender));

        if let Some(ages) = &query.ages {
            let (earliest, latest) = birth_date_range(ages, Utc::now().date_naive());
            select = select
                .filter(user::Column::DateOfBirth.gte(earliest))
                .filter(user::Column::DateOfBirth.lte(latest));
        }

        select = match query.likes {
            LikesMode::None => select,
            LikesMode::Likers => select.filter(
                user::Column::Id.in_subquery(
                    Query::select()
                        .column(user_like::Column::LikerId)
                        .from(user_like::Entity)
                        .and_where(user_like::Column::LikeeId.eq(requester_id))
                        .to_owned(),
                ),
            ),
            LikesMode::Likees => select.filter(
                user::Column::Id.in_subquery(
                    Query::select()
                        .column(user_like::Column::LikeeId)
                        .from(user_like::Entity)
                        .and_where(user_like::Column::LikerId.eq(requester_id))
                        .to_owned(),
                ),
            ),
        };

        let offset = query
            .offset()
            .ok_or_else(|| AppError::Validation("page is out of range".into()))?;

        let total = select.clone().count(self.conn).await?;

        let sort_column = match query.order_by {
            UserOrder::LastActive => user::Column::LastActive,
            UserOrder::Created => user::Column::Created,
        };

        let users = select
            .order_by_desc(sort_column)
            .order_by_asc(user::Column::Id)
            .offset(Some(offset))
            .limit(Some(query.page_size))
            .all(self.conn)
            .await?;

        let main_photos = self
            .main_photo_urls(users.iter().map(|u| u.id).collect())
            .await?;

        Ok(DirectoryPage {
            users,
            main_photos,
            pagination: Pagination::new(query.page, query.page_size, total),
        })
    }

    async fn main_photo_urls(&self, user_ids: Vec<i32>) -> Result<HashMap<i32, String>, AppError> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let photos = photo::Entity::find()
            .filter(photo::Column::UserId.is_in(user_ids))
            .filter(photo::Column::IsMain.eq(true))
            .all(self.conn)
            .await?;
        Ok(photos.into_iter().map(|p| (p.user_id, p.url)).collect())
    }

    /// Apply the fields present in `patch` to user `id`.
    pub async fn update(&self, id: i32, patch: ProfilePatch) -> Result<(), AppError> {
        let mut active: user::ActiveModel = self.get(id).await?.into();

        if let Some(known_as) = patch.known_as {
            active.known_as = Set(known_as.trim().to_string());
        }
        if let Some(introduction) = patch.introduction {
            active.introduction = Set(introduction);
        }
        if let Some(looking_for) = patch.looking_for {
            active.looking_for = Set(looking_for);
        }
        if let Some(interests) = patch.interests {
            active.interests = Set(interests);
        }
        if let Some(city) = patch.city {
            active.city = Set(city);
        }
        if let Some(country) = patch.country {
            active.country = Set(country);
        }

        if !active.is_changed() {
            return Ok(());
        }

        active.update(self.conn).await?;
        Ok(())
    }
}
