use crate::branch::Branch;
use crate::error::{Result, ReviewError};
use crate::types::{RawRow, Review};
use csv::{ReaderBuilder, StringRecord};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

const FIELDS: usize = 5;

/// Every branch in the dataset, in the order its name was first seen.
///
/// Built once by [`Repository::from_rows`] and read-only afterwards.
#[derive(Debug, Default, Clone)]
pub struct Repository {
    branches: Vec<Branch>,
    index: HashMap<String, usize>,
}

impl Repository {
    /// Group raw rows by branch name.
    ///
    /// Branch names are used verbatim as keys. Rows are neither dropped nor
    /// deduplicated. The first row whose id or rating is not an integer
    /// aborts the whole build.
    pub fn from_rows<I>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = RawRow>,
    {
        let mut repo = Repository::default();
        // Data rows start on line 2, after the header.
        for (line, row) in (2u64..).zip(rows) {
            let review = coerce(row, line)?;
            repo.push(review);
        }
        Ok(repo)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ReviewError::DatasetNotFound(path.to_path_buf()));
        }
        info!(path = %path.display(), "Loading reviews");
        let file = std::fs::File::open(path)?;
        let repo = Self::from_reader(file)?;
        info!(
            branches = repo.len(),
            reviews = repo.total_reviews(),
            "Loading finished"
        );
        Ok(repo)
    }

    /// Read a CSV source whose first line is a header and whose rows carry
    /// five positional fields.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result?;
            rows.push(raw_row(&record)?);
        }
        Self::from_rows(rows)
    }

    fn push(&mut self, review: Review) {
        let idx = match self.index.get(review.branch()) {
            Some(&idx) => idx,
            None => {
                debug!(branch = review.branch(), "New branch");
                self.branches.push(Branch::new(review.branch()));
                let idx = self.branches.len() - 1;
                self.index.insert(review.branch().to_string(), idx);
                idx
            }
        };
        self.branches[idx].push(review);
    }

    pub fn get(&self, name: &str) -> Option<&Branch> {
        self.index.get(name).map(|&idx| &self.branches[idx])
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn names(&self) -> Vec<&str> {
        self.branches.iter().map(Branch::name).collect()
    }

    pub fn len(&self) -> usize {
        self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    pub fn total_reviews(&self) -> usize {
        self.branches.iter().map(Branch::review_count).sum()
    }
}

fn raw_row(record: &StringRecord) -> Result<RawRow> {
    let line = record.position().map_or(0, |p| p.line());
    if record.len() != FIELDS {
        return Err(ReviewError::MalformedRow {
            line,
            found: record.len(),
        });
    }
    // Positional, whatever the header says.
    Ok(record.deserialize::<RawRow>(None)?)
}

fn coerce(row: RawRow, line: u64) -> Result<Review> {
    let review_id = parse_int::<i64>(&row.review_id, "review_id", line)?;
    let rating = parse_int::<i32>(&row.rating, "rating", line)?;
    Ok(Review::new(
        review_id,
        rating,
        row.year_month,
        row.reviewer_location,
        row.branch,
    ))
}

fn parse_int<T: std::str::FromStr>(s: &str, field: &'static str, line: u64) -> Result<T> {
    s.trim()
        .parse::<T>()
        .map_err(|_| ReviewError::InvalidInteger {
            line,
            field,
            value: s.to_string(),
        })
}
