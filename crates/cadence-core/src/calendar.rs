//! Month grid projection of the registry.

use std::fmt;

use chrono::{Datelike, FixedOffset, Months, NaiveDate};

use crate::domain::Post;
use crate::error::DomainError;
use crate::query::effective_date;

const WEEK: usize = 7;
const SHORT_GRID: usize = 5 * WEEK;
const LONG_GRID: usize = 6 * WEEK;

/// A calendar month, always valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth(NaiveDate);

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, DomainError> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(YearMonth)
            .ok_or_else(|| DomainError::validation(format!("invalid month {year}-{month:02}")))
    }

    /// The month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        YearMonth(date.with_day(1).unwrap_or(date))
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    pub fn month(self) -> u32 {
        self.0.month()
    }

    pub fn first_day(self) -> NaiveDate {
        self.0
    }

    pub fn next(self) -> Option<Self> {
        self.0.checked_add_months(Months::new(1)).map(YearMonth)
    }

    pub fn previous(self) -> Option<Self> {
        self.0.checked_sub_months(Months::new(1)).map(YearMonth)
    }

    pub fn days(self) -> u32 {
        match self.next() {
            Some(next) => next.0.signed_duration_since(self.0).num_days() as u32,
            // December of chrono's last representable year.
            None => 31,
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

/// One square of the grid. Padding cells have no date and no posts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CalendarCell {
    pub date: Option<NaiveDate>,
    pub posts: Vec<Post>,
}

/// A month laid out in Sunday-first weeks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarMonth {
    pub month: YearMonth,
    pub cells: Vec<CalendarCell>,
}

impl CalendarMonth {
    /// Lay `posts` onto the grid of `month`, matching each post by its
    /// effective date in `offset`.
    pub fn project(month: YearMonth, posts: &[Post], offset: FixedOffset) -> Self {
        let leading = month.first_day().weekday().num_days_from_sunday() as usize;
        let days = month.days() as usize;
        let size = if leading + days > SHORT_GRID {
            LONG_GRID
        } else {
            SHORT_GRID
        };

        let mut cells: Vec<CalendarCell> = (0..size)
            .map(|i| {
                let date = i
                    .checked_sub(leading)
                    .filter(|d| *d < days)
                    .and_then(|d| month.first_day().with_day(d as u32 + 1));
                CalendarCell {
                    date,
                    posts: Vec::new(),
                }
            })
            .collect();

        for post in posts {
            let Some(date) = effective_date(post, offset) else {
                continue;
            };
            if YearMonth::of(date) != month {
                continue;
            }
            cells[leading + date.day0() as usize].posts.push(post.clone());
        }
        for cell in &mut cells {
            cell.posts.sort_by_key(Post::effective_at);
        }

        Self { month, cells }
    }

    /// Cells that belong to the month, in day order.
    pub fn days(&self) -> impl Iterator<Item = &CalendarCell> {
        self.cells.iter().filter(|c| c.date.is_some())
    }

    pub fn cell(&self, date: NaiveDate) -> Option<&CalendarCell> {
        self.cells.iter().find(|c| c.date == Some(date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ContentType, NewPost, Network};
    use chrono::{TimeZone, Utc};

    fn scheduled_at(title: &str, day: u32, hour: u32) -> Post {
        let created = Utc.with_ymd_and_hms(2023, 12, 1, 0, 0, 0).unwrap();
        let mut post = Post::new(
            NewPost {
                title: title.to_string(),
                client_ref: "c".to_string(),
                content: "body".to_string(),
                content_type: ContentType::Text,
                networks: vec![Network::Linkedin],
                scheduled_for: None,
                urgent: false,
            },
            created,
        )
        .unwrap();
        post.submit_for_approval(created).unwrap();
        post.approve(created).unwrap();
        post.schedule(Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap(), created)
            .unwrap();
        post
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn test_january_2024_layout() {
        // 2024-01-01 is a Monday: one leading blank, 31 days, 35 cells.
        let month = YearMonth::new(2024, 1).unwrap();
        let grid = CalendarMonth::project(month, &[], utc());

        assert_eq!(grid.cells.len(), 35);
        assert_eq!(grid.cells[0].date, None);
        assert_eq!(grid.cells[1].date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(grid.cells[31].date, NaiveDate::from_ymd_opt(2024, 1, 31));
        assert!(grid.cells[32..].iter().all(|c| c.date.is_none()));
        assert_eq!(grid.days().count(), 31);
    }

    #[test]
    fn test_long_month_uses_six_weeks() {
        // 2024-03-01 is a Friday: 5 leading blanks + 31 days > 35.
        let grid = CalendarMonth::project(YearMonth::new(2024, 3).unwrap(), &[], utc());
        assert_eq!(grid.cells.len(), 42);
        assert_eq!(grid.days().count(), 31);
    }

    #[test]
    fn test_february_2026_fits_short_grid() {
        // Starts on a Sunday and has 28 days.
        let grid = CalendarMonth::project(YearMonth::new(2026, 2).unwrap(), &[], utc());
        assert_eq!(grid.cells.len(), 35);
        assert_eq!(grid.cells[0].date, NaiveDate::from_ymd_opt(2026, 2, 1));
    }

    #[test]
    fn test_posts_land_on_their_day_in_time_order() {
        let posts = vec![
            scheduled_at("flash sale", 21, 20),
            scheduled_at("tech tips", 21, 10),
            scheduled_at("news", 23, 9),
        ];
        let grid = CalendarMonth::project(YearMonth::new(2024, 1).unwrap(), &posts, utc());

        let day = grid.cell(NaiveDate::from_ymd_opt(2024, 1, 21).unwrap()).unwrap();
        let titles: Vec<&str> = day.posts.iter().map(Post::title).collect();
        assert_eq!(titles, ["tech tips", "flash sale"]);
        assert_eq!(grid.days().map(|c| c.posts.len()).sum::<usize>(), 3);
        assert!(grid.cells.iter().filter(|c| c.date.is_none()).all(|c| c.posts.is_empty()));
    }

    #[test]
    fn test_posts_outside_month_are_ignored() {
        let posts = vec![scheduled_at("january", 5, 9)];
        let grid = CalendarMonth::project(YearMonth::new(2024, 2).unwrap(), &posts, utc());
        assert!(grid.cells.iter().all(|c| c.posts.is_empty()));
    }

    #[test]
    fn test_navigation_crosses_years() {
        let dec = YearMonth::new(2023, 12).unwrap();
        assert_eq!(dec.next(), Some(YearMonth::new(2024, 1).unwrap()));
        assert_eq!(YearMonth::new(2024, 1).unwrap().previous(), Some(dec));
        assert_eq!(YearMonth::new(2024, 2).unwrap().days(), 29);
        assert_eq!(dec.to_string(), "2023-12");
    }

    #[test]
    fn test_invalid_month_is_rejected() {
        assert!(matches!(
            YearMonth::new(2024, 13),
            Err(DomainError::Validation(_))
        ));
    }
}
