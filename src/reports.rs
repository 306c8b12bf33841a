use crate::branch::Branch;
use crate::error::Result;
use crate::loader::Repository;
use crate::types::{LocationRatingRow, Review, ReviewField};
use crate::util::{mean_rating, same_text};

pub fn total_review_count(repo: &Repository) -> usize {
    repo.branches().iter().map(Branch::review_count).sum()
}

pub fn branch_review_counts(repo: &Repository) -> Vec<(String, usize)> {
    repo.branches()
        .iter()
        .map(|b| (b.name().to_string(), b.review_count()))
        .collect()
}

pub fn branch_avg_ratings(repo: &Repository) -> Vec<(String, f64)> {
    repo.branches()
        .iter()
        .map(|b| (b.name().to_string(), b.avg_rating()))
        .collect()
}

/// Park × reviewer location table across every branch.
pub fn avg_score_by_location(repo: &Repository) -> Vec<LocationRatingRow> {
    repo.branches()
        .iter()
        .flat_map(|b| {
            let park = b.display_name();
            b.avg_rating_by_loc()
                .into_iter()
                .map(move |(loc, avg)| LocationRatingRow {
                    park: park.clone(),
                    reviewer_location: loc,
                    avg_rating: avg,
                })
        })
        .collect()
}

/// Mean rating of a branch's reviews dated in `year`; 0 when there are none.
pub fn avg_rating_for_year(branch: &Branch, year: &str) -> f64 {
    let filter = ReviewFilter::new().year(year);
    let matched = filter_reviews(branch.reviews(), &filter);
    let sum: i64 = matched.iter().map(|r| i64::from(r.rating())).sum();
    mean_rating(sum, matched.len())
}

/// Conjunction of field criteria with an optional year prefix.
///
/// Field values are compared in normalized form; the year is a plain prefix
/// of `year_month`. An empty filter matches every review.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewFilter {
    year: Option<String>,
    criteria: Vec<(ReviewField, String)>,
}

impl ReviewFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(key, value)` pairs; the reserved key `year` sets the
    /// year prefix, every other key must name a review field.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut filter = Self::new();
        for (key, value) in pairs {
            filter = if key == "year" {
                filter.year(value)
            } else {
                filter.field(key.parse()?, value)
            };
        }
        Ok(filter)
    }

    pub fn year(mut self, year: impl Into<String>) -> Self {
        self.year = Some(year.into());
        self
    }

    pub fn field(mut self, field: ReviewField, value: impl Into<String>) -> Self {
        self.criteria.push((field, value.into()));
        self
    }

    pub fn matches(&self, review: &Review) -> bool {
        if let Some(year) = &self.year {
            if !review.year_month().starts_with(year.as_str()) {
                return false;
            }
        }
        self.criteria
            .iter()
            .all(|(field, value)| same_text(&review.field(*field), value))
    }
}

pub fn filter_reviews<'a>(reviews: &'a [Review], filter: &ReviewFilter) -> Vec<&'a Review> {
    reviews.iter().filter(|r| filter.matches(r)).collect()
}
