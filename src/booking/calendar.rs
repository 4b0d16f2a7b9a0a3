use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use crate::models::Language;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub day: u32,
    pub weekday: &'static str,
}

/// Displayed (month, year) of the booking calendar. Never moves before the
/// month containing `today`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCursor {
    month: u32,
    year: i32,
    today: NaiveDate,
}

impl MonthCursor {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            month: today.month(),
            year: today.year(),
            today,
        }
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn is_current_month(&self) -> bool {
        self.month == self.today.month() && self.year == self.today.year()
    }

    pub fn next_month(&mut self) {
        if self.month == 12 {
            self.month = 1;
            self.year += 1;
        } else {
            self.month += 1;
        }
    }

    pub fn prev_month(&mut self) {
        if (self.year, self.month) <= (self.today.year(), self.today.month()) {
            return;
        }
        if self.month == 1 {
            self.month = 12;
            self.year -= 1;
        } else {
            self.month -= 1;
        }
    }

    /// Selectable days of the displayed month, in order.
    pub fn days(&self, language: Language) -> Vec<CalendarDay> {
        let first_day = if self.is_current_month() {
            self.today.day()
        } else {
            1
        };
        (first_day..=days_in_month(self.year, self.month))
            .filter_map(|day| NaiveDate::from_ymd_opt(self.year, self.month, day))
            .map(|date| CalendarDay {
                date,
                day: date.day(),
                weekday: weekday_short(date.weekday(), language),
            })
            .collect()
    }

    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(0)
}

pub fn weekday_short(weekday: Weekday, language: Language) -> &'static str {
    match (language, weekday) {
        (Language::En, Weekday::Mon) => "Mon",
        (Language::En, Weekday::Tue) => "Tue",
        (Language::En, Weekday::Wed) => "Wed",
        (Language::En, Weekday::Thu) => "Thu",
        (Language::En, Weekday::Fri) => "Fri",
        (Language::En, Weekday::Sat) => "Sat",
        (Language::En, Weekday::Sun) => "Sun",
        (Language::Ar, Weekday::Mon) => "الإثنين",
        (Language::Ar, Weekday::Tue) => "الثلاثاء",
        (Language::Ar, Weekday::Wed) => "الأربعاء",
        (Language::Ar, Weekday::Thu) => "الخميس",
        (Language::Ar, Weekday::Fri) => "الجمعة",
        (Language::Ar, Weekday::Sat) => "السبت",
        (Language::Ar, Weekday::Sun) => "الأحد",
    }
}
