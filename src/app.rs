// Menu controller: every action reads from the frozen repository and prints
// through the console.
use crate::branch::Branch;
use crate::chart::{ChartKind, ChartRequest};
use crate::error::{Result, ReviewError};
use crate::loader::Repository;
use crate::menu::Console;
use crate::output::{self, ExportFormat};
use crate::reports::{self, ReviewFilter};
use crate::types::{ReviewField, ReviewRow};
use crate::util::{display_name, format_int};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::{debug, error};

pub const TITLE: &str = "Disneyland Reviews Analyser";

const MAIN_MENU: [&str; 3] = ["View Data", "Visualise Data", "Export Data"];
const VIEW_MENU: [&str; 4] = [
    "View Reviews by Park",
    "Number of Reviews by Park and Reviewer Location",
    "Average Score per year by Park",
    "Average Score per Park by Reviewer Location",
];
const VISUAL_MENU: [&str; 4] = [
    "Most Reviewed Parks",
    "Average Scores",
    "Park Ranking by Nationality",
    "Most Popular Month by Park",
];

pub struct App<'a, R, W> {
    repo: &'a Repository,
    console: Console<R, W>,
    export_dir: PathBuf,
}

impl<'a, R: BufRead, W: Write> App<'a, R, W> {
    pub fn new(repo: &'a Repository, console: Console<R, W>, export_dir: PathBuf) -> Self {
        Self {
            repo,
            console,
            export_dir,
        }
    }

    pub fn into_console(self) -> Console<R, W> {
        self.console
    }

    /// Run until the user exits or input ends.
    pub fn run(&mut self) -> Result<()> {
        self.console.print_title(TITLE)?;
        self.console.say(format!(
            "There are {} reviews.",
            format_int(reports::total_review_count(self.repo))
        ))?;
        loop {
            match self.main_menu() {
                Ok(true) => continue,
                Ok(false) => return Ok(()),
                Err(ReviewError::InputClosed) => {
                    debug!("Input closed, leaving menu");
                    return Ok(());
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// One pass through the main menu; `false` means exit.
    fn main_menu(&mut self) -> Result<bool> {
        let choice = self.console.choose_letter(
            "Please enter the letter which corresponds with your desired menu choice:",
            &MAIN_MENU,
            &[('X', "Exit")],
            1,
        )?;
        match choice {
            'A' => self.view_menu()?,
            'B' => self.visual_menu()?,
            'C' => self.export_data()?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn view_menu(&mut self) -> Result<()> {
        let choice = self.console.choose_letter(
            "Please enter one of the following options:",
            &VIEW_MENU,
            &[],
            2,
        )?;
        match choice {
            'A' => self.view_reviews_by_park(),
            'B' => self.reviews_by_park_and_location(),
            'C' => self.avg_score_per_year(),
            _ => self.avg_score_by_location(),
        }
    }

    fn visual_menu(&mut self) -> Result<()> {
        let choice = self.console.choose_letter(
            "Please enter one of the following options:",
            &VISUAL_MENU,
            &[],
            2,
        )?;
        let chart = match choice {
            'A' => self.most_reviewed_parks()?,
            'B' => self.average_scores(),
            'C' => self.ranking_by_nationality()?,
            _ => self.popular_months()?,
        };
        self.console.say(chart.render())
    }

    fn choose_branch(&mut self, msg: &str) -> Result<&'a Branch> {
        let names = self.repo.names();
        let name = self.console.validate_branch(msg, &names)?;
        self.repo
            .get(&name)
            .ok_or(ReviewError::UnknownBranch(name))
    }

    fn view_reviews_by_park(&mut self) -> Result<()> {
        let branch = self.choose_branch("For which branch would you like to see reviews?")?;
        let rows: Vec<ReviewRow> = branch.reviews().iter().map(ReviewRow::from).collect();
        self.console
            .say(output::render_table(rows, "No reviews available."))
    }

    fn reviews_by_park_and_location(&mut self) -> Result<()> {
        let branch = self.choose_branch(
            "For which branch would you like to see number of reviews?",
        )?;
        let location = self.console.validate_multi_choice(
            "For which reviewer location would you like to see number of reviews?",
            &branch.locations(),
        )?;
        let filter = ReviewFilter::new()
            .field(ReviewField::Branch, branch.name())
            .field(ReviewField::ReviewerLocation, location.as_str());
        let count = reports::filter_reviews(branch.reviews(), &filter).len();
        self.console.say(format!(
            "There are {} reviews from reviewers in {} for {} branch.",
            format_int(count),
            location,
            branch.display_name()
        ))
    }

    fn avg_score_per_year(&mut self) -> Result<()> {
        let branch = self.choose_branch("Select one of the following branches:")?;
        let year = self
            .console
            .validate_multi_choice("Select one of the following years:", &branch.reviews_years())?;
        self.console.say(format!(
            "The average rating for {} branch in year {} is {}",
            branch.display_name(),
            year,
            reports::avg_rating_for_year(branch, &year)
        ))
    }

    fn avg_score_by_location(&mut self) -> Result<()> {
        self.console.say(output::render_table(
            reports::avg_score_by_location(self.repo),
            "No reviews available.",
        ))
    }

    fn most_reviewed_parks(&self) -> Result<ChartRequest> {
        let counts = reports::branch_review_counts(self.repo);
        let labels: Vec<String> = counts.iter().map(|(_, c)| c.to_string()).collect();
        let values: Vec<f64> = counts.iter().map(|(_, c)| *c as f64).collect();
        let legend: Vec<String> = counts.iter().map(|(n, _)| display_name(n)).collect();
        ChartRequest::new(
            ChartKind::Pie,
            "Most Reviewed Parks",
            labels,
            values,
            Some(legend),
        )
    }

    fn average_scores(&self) -> ChartRequest {
        let ratings: Vec<(String, f64)> = reports::branch_avg_ratings(self.repo)
            .into_iter()
            .map(|(n, avg)| (display_name(&n), avg))
            .collect();
        ChartRequest::from_pairs(ChartKind::Bar, "Average Scores", ratings)
    }

    fn ranking_by_nationality(&mut self) -> Result<ChartRequest> {
        let branch = self.choose_branch("Please enter one of the following options:")?;
        Ok(ChartRequest::from_pairs(
            ChartKind::Bar,
            format!("Park Ranking by Nationality: {}", branch.display_name()),
            branch.top_locations(),
        ))
    }

    fn popular_months(&mut self) -> Result<ChartRequest> {
        let branch = self.choose_branch("Please enter one of the following options:")?;
        Ok(ChartRequest::from_pairs(
            ChartKind::Bar,
            format!("Most Popular Month by Park: {}", branch.display_name()),
            branch.avg_popularity_by_month(),
        ))
    }

    fn export_data(&mut self) -> Result<()> {
        let labels: Vec<&str> = ExportFormat::ALL.iter().map(|f| f.label()).collect();
        let choice = self
            .console
            .validate_multi_choice("Which format would you like to export to?", &labels)?;
        let format: ExportFormat = choice.parse()?;
        match output::export(self.repo, format, &self.export_dir) {
            Ok(path) => self.console.say(format!(
                "Data exported successfully to {} ({} format).",
                path.display(),
                format.label()
            )),
            Err(e) => {
                error!(error = %e, "Export failed");
                self.console.say(format!("Export failed: {e}"))
            }
        }
    }
}
