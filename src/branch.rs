//! Per-park aggregate and every statistic derived from its reviews.
//!
//! All queries are recomputed from the review list on each call. The list is
//! append-only while loading and frozen afterwards, so nothing is cached.

use crate::types::Review;
use crate::util::{display_name, mean_rating};
use chrono::Month;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Maximum length of [`Branch::top_locations`].
pub const TOP_LOCATIONS: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    name: String,
    reviews: Vec<Review>,
}

impl Branch {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reviews: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, review: Review) {
        debug_assert_eq!(review.branch(), self.name);
        self.reviews.push(review);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display_name(&self) -> String {
        display_name(&self.name)
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    pub fn review_count(&self) -> usize {
        self.reviews.len()
    }

    pub fn avg_rating(&self) -> f64 {
        let sum: i64 = self.reviews.iter().map(|r| i64::from(r.rating())).sum();
        mean_rating(sum, self.reviews.len())
    }

    /// Distinct reviewer locations in first-seen order.
    pub fn locations(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for r in &self.reviews {
            if !seen.contains(&r.reviewer_location()) {
                seen.push(r.reviewer_location());
            }
        }
        seen
    }

    /// Distinct year components, sorted ascending.
    pub fn reviews_years(&self) -> Vec<&str> {
        let mut years: Vec<&str> = self.reviews.iter().map(Review::year).collect();
        years.sort_unstable();
        years.dedup();
        years
    }

    pub fn avg_rating_by_loc(&self) -> Vec<(String, f64)> {
        let sums = self.location_sums();
        self.locations()
            .into_iter()
            .map(|loc| {
                let (sum, count) = sums.get(loc).copied().unwrap_or((0, 0));
                (loc.to_string(), mean_rating(sum, count))
            })
            .collect()
    }

    /// Best-rated reviewer locations, highest mean first.
    ///
    /// Only locations with at least one review take part. Equal means keep
    /// their first-seen order.
    pub fn top_locations(&self) -> Vec<(String, f64)> {
        let sums = self.location_sums();
        let mut ranked: Vec<(String, f64)> = self
            .locations()
            .into_iter()
            .filter_map(|loc| {
                let (sum, count) = sums.get(loc).copied()?;
                (count > 0).then(|| (loc.to_string(), mean_rating(sum, count)))
            })
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        ranked.truncate(TOP_LOCATIONS);
        ranked
    }

    /// Mean rating per calendar month, January through December.
    ///
    /// Always twelve entries; empty months read 0. Reviews without a usable
    /// month (including the `missing` sentinel) are left out.
    pub fn avg_popularity_by_month(&self) -> Vec<(String, f64)> {
        let mut buckets = [(0i64, 0usize); 12];
        for r in &self.reviews {
            if let Some(month) = r.month() {
                let slot = &mut buckets[(month - 1) as usize];
                slot.0 += i64::from(r.rating());
                slot.1 += 1;
            }
        }
        let mut month = Month::January;
        buckets
            .iter()
            .map(|(sum, count)| {
                let entry = (month.name().to_string(), mean_rating(*sum, *count));
                month = month.succ();
                entry
            })
            .collect()
    }

    fn location_sums(&self) -> HashMap<&str, (i64, usize)> {
        let mut sums: HashMap<&str, (i64, usize)> = HashMap::new();
        for r in &self.reviews {
            let e = sums.entry(r.reviewer_location()).or_insert((0, 0));
            e.0 += i64::from(r.rating());
            e.1 += 1;
        }
        sums
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MISSING_DATE;

    fn branch_with(name: &str, rows: &[(i32, &str, &str)]) -> Branch {
        let mut b = Branch::new(name);
        for (i, (rating, ym, loc)) in rows.iter().enumerate() {
            b.push(Review::new(i as i64 + 1, *rating, *ym, *loc, name));
        }
        b
    }

    #[test]
    fn test_count_and_average() {
        let b = branch_with(
            "Disneyland_HongKong",
            &[(5, "2019-01", "Canada"), (3, "2019-02", "Canada"), (4, "2019-03", "Japan")],
        );
        assert_eq!(b.review_count(), 3);
        assert_eq!(b.avg_rating(), 4.0);
        assert_eq!(b.display_name(), "Disneyland HongKong");
    }

    #[test]
    fn test_empty_branch_averages_to_zero() {
        let b = Branch::new("Disneyland_Paris");
        assert_eq!(b.review_count(), 0);
        assert_eq!(b.avg_rating(), 0.0);
        assert!(b.avg_rating_by_loc().is_empty());
        assert!(b.top_locations().is_empty());
        assert!(b.avg_popularity_by_month().iter().all(|(_, v)| *v == 0.0));
    }

    #[test]
    fn test_locations_first_seen_order() {
        let b = branch_with(
            "P",
            &[(5, "2019-01", "Japan"), (3, "2019-02", "Canada"), (4, "2019-03", "Japan")],
        );
        assert_eq!(b.locations(), vec!["Japan", "Canada"]);
    }

    #[test]
    fn test_reviews_years_sorted_distinct() {
        let b = branch_with(
            "P",
            &[(5, "2019-01", "A"), (3, "2015-02", "A"), (4, "2019-03", "A"), (2, MISSING_DATE, "A")],
        );
        assert_eq!(b.reviews_years(), vec!["2015", "2019", "missing"]);
    }

    #[test]
    fn test_avg_rating_by_loc() {
        let b = branch_with(
            "P",
            &[(5, "2019-01", "Japan"), (2, "2019-02", "Canada"), (4, "2019-03", "Japan")],
        );
        assert_eq!(
            b.avg_rating_by_loc(),
            vec![("Japan".to_string(), 4.5), ("Canada".to_string(), 2.0)]
        );
    }

    #[test]
    fn test_top_locations_sorted_and_stable() {
        let b = branch_with(
            "P",
            &[
                (3, "2019-01", "Japan"),
                (5, "2019-01", "Canada"),
                (3, "2019-01", "Peru"),
                (4, "2019-01", "Chile"),
            ],
        );
        let top = b.top_locations();
        let names: Vec<&str> = top.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(names, vec!["Canada", "Chile", "Japan", "Peru"]);
    }

    #[test]
    fn test_top_locations_capped_at_ten() {
        let rows: Vec<(i32, String, String)> = (0..15)
            .map(|i| (1 + i % 5, "2019-01".to_string(), format!("Country{i}")))
            .collect();
        let borrowed: Vec<(i32, &str, &str)> =
            rows.iter().map(|(r, ym, l)| (*r, ym.as_str(), l.as_str())).collect();
        let b = branch_with("P", &borrowed);
        let top = b.top_locations();
        assert_eq!(top.len(), TOP_LOCATIONS);
        assert!(top.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn test_month_buckets() {
        let b = branch_with(
            "P",
            &[(5, "2019-01", "A"), (4, "2019-01", "A"), (1, MISSING_DATE, "A")],
        );
        let months = b.avg_popularity_by_month();
        assert_eq!(months.len(), 12);
        assert_eq!(months[0], ("January".to_string(), 4.5));
        assert_eq!(months[11].0, "December");
        assert!(months[1..].iter().all(|(_, v)| *v == 0.0));
    }

    #[test]
    fn test_queries_are_idempotent() {
        let b = branch_with("P", &[(5, "2019-01", "A"), (2, "2018-07", "B")]);
        assert_eq!(b.avg_rating(), b.avg_rating());
        assert_eq!(b.top_locations(), b.top_locations());
        assert_eq!(b.avg_popularity_by_month(), b.avg_popularity_by_month());
        assert_eq!(b.reviews_years(), b.reviews_years());
    }
}
