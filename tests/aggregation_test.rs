use park_reviews::reports::{self, filter_reviews};
use park_reviews::util::same_text;
use park_reviews::{RawRow, Repository, Review, ReviewError, ReviewFilter};
use rstest::rstest;
use std::io::Write;

const DATASET: &str = "\
Review_ID,Rating,Year_Month,Reviewer_Location,Branch
1,5,2019-01,United States,Disneyland_HongKong
2,3,2019-01,Canada,Disneyland_HongKong
3,4,missing,Canada,Disneyland_HongKong
4,2,2018-06,Japan,Disneyland_Paris
5,4,2018-07,Japan,Disneyland_Paris
";

fn load() -> Repository {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(DATASET.as_bytes()).unwrap();
    Repository::load(file.path()).unwrap()
}

#[test]
fn test_hong_kong_scenario() {
    let repo = Repository::from_rows(vec![
        RawRow::new("1", "5", "2019-01", "A", "Disneyland_HongKong"),
        RawRow::new("2", "3", "2019-02", "B", "Disneyland_HongKong"),
        RawRow::new("3", "4", "2019-03", "C", "Disneyland_HongKong"),
    ])
    .unwrap();
    let hk = repo.get("Disneyland_HongKong").unwrap();
    assert_eq!(hk.avg_rating(), 4.0);
    assert_eq!(hk.review_count(), 3);
}

#[test]
fn test_month_scenario_excludes_missing() {
    let repo = load();
    let hk = repo.get("Disneyland_HongKong").unwrap();
    let months = hk.avg_popularity_by_month();
    assert_eq!(months.len(), 12);
    assert_eq!(months[0], ("January".to_string(), 4.0));
    assert!(months[1..].iter().all(|(_, v)| *v == 0.0));
}

#[test]
fn test_load_preserves_order_and_counts() {
    let repo = load();
    assert_eq!(repo.names(), vec!["Disneyland_HongKong", "Disneyland_Paris"]);
    assert_eq!(reports::total_review_count(&repo), 5);
    assert_eq!(
        reports::branch_avg_ratings(&repo),
        vec![
            ("Disneyland_HongKong".to_string(), 4.0),
            ("Disneyland_Paris".to_string(), 3.0)
        ]
    );
}

#[test]
fn test_bad_integer_exposes_no_dataset() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"id,r,ym,loc,b\n1,5,2019-01,A,P\nx,5,2019-01,A,P\n")
        .unwrap();
    let err = Repository::load(file.path()).unwrap_err();
    assert!(matches!(
        err,
        ReviewError::InvalidInteger { field: "review_id", line: 3, .. }
    ));
}

#[rstest]
#[case("United_States", "united states")]
#[case("united states", "UnitedStates")]
#[case("UnitedStates", "United_States")]
#[case("  UNITED states ", "United_States")]
fn test_normalization_equivalence(#[case] a: &str, #[case] b: &str) {
    assert!(same_text(a, b));
}

#[test]
fn test_filter_branch_and_year() {
    let reviews = vec![
        Review::new(1, 5, "2019-03", "United States", "Park_A"),
        Review::new(2, 4, "2020-01", "Canada", "Park_A"),
    ];
    let filter = ReviewFilter::from_pairs([("branch", "park a"), ("year", "2019")]).unwrap();
    let matched = filter_reviews(&reviews, &filter);
    assert_eq!(matched, vec![&reviews[0]]);
}

#[rstest]
#[case(&[("reviewer_location", "japan")], 2)]
#[case(&[("reviewer_location", "japan"), ("year", "2018-07")], 1)]
#[case(&[("rating", "2")], 1)]
#[case(&[("year", "2017")], 0)]
fn test_filter_paris(#[case] pairs: &[(&str, &str)], #[case] expected: usize) {
    let repo = load();
    let paris = repo.get("Disneyland_Paris").unwrap();
    let filter = ReviewFilter::from_pairs(pairs.iter().copied()).unwrap();
    assert_eq!(filter_reviews(paris.reviews(), &filter).len(), expected);
}

#[test]
fn test_top_locations_skip_nothing_enumerated() {
    let repo = load();
    let hk = repo.get("Disneyland_HongKong").unwrap();
    assert_eq!(
        hk.top_locations(),
        vec![
            ("United States".to_string(), 5.0),
            ("Canada".to_string(), 3.5)
        ]
    );
    assert_eq!(hk.avg_rating_by_loc().len(), hk.locations().len());
}
