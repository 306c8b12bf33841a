//! Export of the grouped dataset and console table previews.
//!
//! Three export forms, all in ingestion order:
//! - TXT: a `Branch: <name>` line, one line per review, blank separator line.
//! - CSV: header row then one row per review, branch first.
//! - JSON: object keyed by branch name, each an array of review objects.

use crate::error::{Result, ReviewError};
use crate::loader::Repository;
use crate::types::{ExportRow, ExportedReview};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tabled::{settings::Style, Table, Tabled};
use tracing::{info, warn};

pub const EXPORT_STEM: &str = "exported_data";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Txt,
    Csv,
    Json,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [Self::Txt, Self::Csv, Self::Json];

    pub fn extension(self) -> &'static str {
        match self {
            Self::Txt => "txt",
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Txt => "TXT",
            Self::Csv => "CSV",
            Self::Json => "JSON",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "TXT" => Ok(Self::Txt),
            "CSV" => Ok(Self::Csv),
            "JSON" => Ok(Self::Json),
            _ => {
                warn!(format = s, "Rejected export format");
                Err(ReviewError::UnsupportedFormat(s.to_string()))
            }
        }
    }
}

/// Write `exported_data.<ext>` into `dir` and return its path.
pub fn export(repo: &Repository, format: ExportFormat, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(format!("{}.{}", EXPORT_STEM, format.extension()));
    let file = std::fs::File::create(&path)?;
    let mut writer = std::io::BufWriter::new(file);
    match format {
        ExportFormat::Txt => write_txt(&mut writer, repo)?,
        ExportFormat::Csv => write_csv(&mut writer, repo)?,
        ExportFormat::Json => write_json(&mut writer, repo)?,
    }
    writer.flush()?;
    info!(path = %path.display(), format = format.label(), "Data exported");
    Ok(path)
}

pub fn write_txt<W: Write>(mut w: W, repo: &Repository) -> Result<()> {
    for branch in repo.branches() {
        writeln!(w, "Branch: {}", branch.name())?;
        for r in branch.reviews() {
            writeln!(
                w,
                "{}, {}, {}, {}",
                r.review_id(),
                r.rating(),
                r.year_month(),
                r.reviewer_location()
            )?;
        }
        writeln!(w)?;
    }
    Ok(())
}

pub fn write_csv<W: Write>(w: W, repo: &Repository) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(w);
    for branch in repo.branches() {
        for r in branch.reviews() {
            wtr.serialize(ExportRow::from(r))?;
        }
    }
    if repo.total_reviews() == 0 {
        // serialize() writes the header lazily; keep it for empty exports.
        wtr.write_record(["Branch", "Review ID", "Rating", "Year-Month", "Reviewer Location"])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(w: W, repo: &Repository) -> Result<()> {
    serde_json::to_writer_pretty(w, &JsonExport(repo))?;
    Ok(())
}

/// Branch-keyed JSON object that keeps ingestion order.
struct JsonExport<'a>(&'a Repository);

impl Serialize for JsonExport<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for branch in self.0.branches() {
            let reviews: Vec<ExportedReview> =
                branch.reviews().iter().map(ExportedReview::from).collect();
            map.serialize_entry(branch.name(), &reviews)?;
        }
        map.end()
    }
}

/// Branch-keyed JSON object read back in document order.
struct JsonImport(Vec<(String, Vec<ExportedReview>)>);

impl<'de> Deserialize<'de> for JsonImport {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct OrderedBranches;

        impl<'de> Visitor<'de> for OrderedBranches {
            type Value = JsonImport;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object of branch name to review array")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut branches = Vec::new();
                while let Some((name, reviews)) = access.next_entry()? {
                    branches.push((name, reviews));
                }
                Ok(JsonImport(branches))
            }
        }

        deserializer.deserialize_map(OrderedBranches)
    }
}

pub fn read_json<R: Read>(r: R) -> Result<Vec<ExportRow>> {
    let JsonImport(branches) = serde_json::from_reader(r)?;
    Ok(branches
        .into_iter()
        .flat_map(|(branch, reviews)| {
            reviews.into_iter().map(move |rev| ExportRow {
                branch: branch.clone(),
                review_id: rev.review_id,
                rating: rev.rating,
                year_month: rev.year_month,
                reviewer_location: rev.reviewer_location,
            })
        })
        .collect())
}

pub fn read_csv<R: Read>(r: R) -> Result<Vec<ExportRow>> {
    let mut rdr = csv::Reader::from_reader(r);
    let mut rows = Vec::new();
    for result in rdr.deserialize::<ExportRow>() {
        rows.push(result?);
    }
    Ok(rows)
}

pub fn read_txt(text: &str) -> Result<Vec<ExportRow>> {
    let mut rows = Vec::new();
    let mut branch: Option<&str> = None;
    for line in text.lines() {
        if line.is_empty() {
            branch = None;
            continue;
        }
        if let Some(name) = line.strip_prefix("Branch: ") {
            branch = Some(name);
            continue;
        }
        let Some(current) = branch else {
            return Err(ReviewError::MalformedExport(format!(
                "review line outside a branch: {line}"
            )));
        };
        // The location is free text and may itself contain ", ".
        let mut parts = line.splitn(4, ", ");
        let (Some(id), Some(rating), Some(ym), Some(loc)) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(ReviewError::MalformedExport(line.to_string()));
        };
        rows.push(ExportRow {
            branch: current.to_string(),
            review_id: parse_field(id, line)?,
            rating: parse_field(rating, line)?,
            year_month: ym.to_string(),
            reviewer_location: loc.to_string(),
        });
    }
    Ok(rows)
}

fn parse_field<T: FromStr>(s: &str, line: &str) -> Result<T> {
    s.parse::<T>()
        .map_err(|_| ReviewError::MalformedExport(line.to_string()))
}

/// Render rows as a markdown-style table, or `empty` when there are none.
pub fn render_table<T: Tabled>(rows: Vec<T>, empty: &str) -> String {
    if rows.is_empty() {
        return empty.to_string();
    }
    let table_str = Table::new(rows).with(Style::markdown()).to_string();
    format!("{}\n", table_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawRow;

    fn repo() -> Repository {
        Repository::from_rows(vec![
            RawRow::new("10", "4", "2019-4", "Australia", "Disneyland_HongKong"),
            RawRow::new("11", "2", "missing", "Korea, Republic of", "Disneyland_HongKong"),
            RawRow::new("12", "5", "2015-4", "United Kingdom", "Disneyland_Paris"),
        ])
        .unwrap()
    }

    #[test]
    fn test_format_parse_case_insensitive() {
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("Txt".parse::<ExportFormat>().unwrap(), ExportFormat::Txt);
        assert!(matches!(
            "xml".parse::<ExportFormat>(),
            Err(ReviewError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_txt_layout() {
        let mut buf = Vec::new();
        write_txt(&mut buf, &repo()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "Branch: Disneyland_HongKong\n\
             10, 4, 2019-4, Australia\n\
             11, 2, missing, Korea, Republic of\n\
             \n\
             Branch: Disneyland_Paris\n\
             12, 5, 2015-4, United Kingdom\n\
             \n"
        );
    }

    #[test]
    fn test_csv_header() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &repo()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text.lines().next().unwrap(),
            "Branch,Review ID,Rating,Year-Month,Reviewer Location"
        );
        assert_eq!(text.lines().count(), 4);
    }

    #[test]
    fn test_csv_header_on_empty_repository() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &Repository::default()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn test_json_keeps_branch_order() {
        let mut buf = Vec::new();
        write_json(&mut buf, &repo()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let hk = text.find("Disneyland_HongKong").unwrap();
        let paris = text.find("Disneyland_Paris").unwrap();
        assert!(hk < paris);
        assert!(text.contains("\"Review ID\": 10"));
        assert!(text.contains("\"Reviewer Location\": \"Korea, Republic of\""));
    }

    #[test]
    fn test_render_table() {
        let rows: Vec<crate::types::ReviewRow> = repo()
            .branches()[1]
            .reviews()
            .iter()
            .map(Into::into)
            .collect();
        let table = render_table(rows, "No reviews available.");
        assert!(table.contains("| Review ID | Rating | Year-Month | Reviewer Location |"));
        assert!(table.contains("United Kingdom"));
        let empty: Vec<crate::types::ReviewRow> = Vec::new();
        assert_eq!(render_table(empty, "No reviews available."), "No reviews available.");
    }

    #[test]
    fn test_txt_review_outside_branch_rejected() {
        assert!(matches!(
            read_txt("1, 2, 2019-01, X\n"),
            Err(ReviewError::MalformedExport(_))
        ));
    }
}
