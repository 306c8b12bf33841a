use crate::error::{Result, ReviewError};
use crate::util::display_name;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use tabled::Tabled;

/// Sentinel `year_month` for reviews with an unknown date.
pub const MISSING_DATE: &str = "missing";

/// One dataset row before integer coercion, fields in file order.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRow {
    pub review_id: String,
    pub rating: String,
    pub year_month: String,
    pub reviewer_location: String,
    pub branch: String,
}

impl RawRow {
    pub fn new(
        review_id: impl Into<String>,
        rating: impl Into<String>,
        year_month: impl Into<String>,
        reviewer_location: impl Into<String>,
        branch: impl Into<String>,
    ) -> Self {
        Self {
            review_id: review_id.into(),
            rating: rating.into(),
            year_month: year_month.into(),
            reviewer_location: reviewer_location.into(),
            branch: branch.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    review_id: i64,
    rating: i32,
    year_month: String,
    reviewer_location: String,
    branch: String,
}

impl Review {
    pub fn new(
        review_id: i64,
        rating: i32,
        year_month: impl Into<String>,
        reviewer_location: impl Into<String>,
        branch: impl Into<String>,
    ) -> Self {
        Self {
            review_id,
            rating,
            year_month: year_month.into(),
            reviewer_location: reviewer_location.into(),
            branch: branch.into(),
        }
    }

    pub fn review_id(&self) -> i64 {
        self.review_id
    }

    pub fn rating(&self) -> i32 {
        self.rating
    }

    pub fn year_month(&self) -> &str {
        &self.year_month
    }

    pub fn reviewer_location(&self) -> &str {
        &self.reviewer_location
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Year component of `year_month`: everything before the first `-`.
    pub fn year(&self) -> &str {
        self.year_month
            .split_once('-')
            .map_or(self.year_month.as_str(), |(year, _)| year)
    }

    /// Calendar month (1..=12), or `None` for the sentinel and unparseable dates.
    pub fn month(&self) -> Option<u32> {
        if self.year_month == MISSING_DATE {
            return None;
        }
        let (_, month) = self.year_month.split_once('-')?;
        month
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|m| (1..=12).contains(m))
    }

    /// Text value of a field, for generic filter matching.
    pub fn field(&self, field: ReviewField) -> Cow<'_, str> {
        match field {
            ReviewField::ReviewId => Cow::Owned(self.review_id.to_string()),
            ReviewField::Rating => Cow::Owned(self.rating.to_string()),
            ReviewField::YearMonth => Cow::Borrowed(&self.year_month),
            ReviewField::ReviewerLocation => Cow::Borrowed(&self.reviewer_location),
            ReviewField::Branch => Cow::Borrowed(&self.branch),
        }
    }
}

impl fmt::Display for Review {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Review ID: {}. Rating: {}. Date: {}. Reviewer Location: {}. Branch: {}",
            self.review_id,
            self.rating,
            self.year_month,
            self.reviewer_location,
            display_name(&self.branch)
        )
    }
}

/// Review attributes addressable by name in a filter specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewField {
    ReviewId,
    Rating,
    YearMonth,
    ReviewerLocation,
    Branch,
}

impl FromStr for ReviewField {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "review_id" => Ok(Self::ReviewId),
            "rating" => Ok(Self::Rating),
            "year_month" => Ok(Self::YearMonth),
            "reviewer_location" => Ok(Self::ReviewerLocation),
            "branch" => Ok(Self::Branch),
            other => Err(ReviewError::UnknownField(other.to_string())),
        }
    }
}

#[derive(Debug, Tabled, Clone)]
pub struct ReviewRow {
    #[tabled(rename = "Review ID")]
    pub review_id: i64,
    #[tabled(rename = "Rating")]
    pub rating: i32,
    #[tabled(rename = "Year-Month")]
    pub year_month: String,
    #[tabled(rename = "Reviewer Location")]
    pub reviewer_location: String,
}

impl From<&Review> for ReviewRow {
    fn from(r: &Review) -> Self {
        Self {
            review_id: r.review_id,
            rating: r.rating,
            year_month: r.year_month.clone(),
            reviewer_location: r.reviewer_location.clone(),
        }
    }
}

#[derive(Debug, Tabled, Clone, PartialEq)]
pub struct LocationRatingRow {
    #[tabled(rename = "Park")]
    pub park: String,
    #[tabled(rename = "Reviewer Location")]
    pub reviewer_location: String,
    #[tabled(rename = "Average Rating")]
    pub avg_rating: f64,
}

/// One review as it appears in the CSV and JSON exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedReview {
    #[serde(rename = "Review ID")]
    pub review_id: i64,
    #[serde(rename = "Rating")]
    pub rating: i32,
    #[serde(rename = "Year-Month")]
    pub year_month: String,
    #[serde(rename = "Reviewer Location")]
    pub reviewer_location: String,
}

impl From<&Review> for ExportedReview {
    fn from(r: &Review) -> Self {
        Self {
            review_id: r.review_id,
            rating: r.rating,
            year_month: r.year_month.clone(),
            reviewer_location: r.reviewer_location.clone(),
        }
    }
}

/// Flat CSV export row: the branch followed by the review columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    #[serde(rename = "Branch")]
    pub branch: String,
    #[serde(rename = "Review ID")]
    pub review_id: i64,
    #[serde(rename = "Rating")]
    pub rating: i32,
    #[serde(rename = "Year-Month")]
    pub year_month: String,
    #[serde(rename = "Reviewer Location")]
    pub reviewer_location: String,
}

impl From<&Review> for ExportRow {
    fn from(r: &Review) -> Self {
        Self {
            branch: r.branch.clone(),
            review_id: r.review_id,
            rating: r.rating,
            year_month: r.year_month.clone(),
            reviewer_location: r.reviewer_location.clone(),
        }
    }
}
