//! Validate-or-reprompt input loops for the interactive session.
//!
//! Every question is asked in a loop until the answer parses; input is read
//! from any [`BufRead`] so sessions can be scripted.

use chrono::Weekday;
use std::io::{BufRead, Write};
use tracing::debug;

use crate::city::City;
use crate::error::{BikeshareError, Result};
use crate::filter::{FilterSpec, MONTHS, parse_day};

/// How the user wants to narrow the trips by time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFilter {
    Month,
    Day,
    Both,
    None,
}

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Writes `question` and returns the next line, trimmed and lowercased.
    fn read_answer(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(BikeshareError::InputClosed);
        }
        Ok(line.trim().to_lowercase())
    }

    /// Asks until `parse` accepts the answer, printing `invalid` after each rejection.
    fn ask<T>(
        &mut self,
        question: &str,
        invalid: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<T> {
        loop {
            let answer = self.read_answer(question)?;
            if let Some(value) = parse(&answer) {
                return Ok(value);
            }
            debug!(answer = %answer, "Rejected answer");
            writeln!(self.output, "{invalid}")?;
        }
    }

    pub fn ask_city(&mut self) -> Result<City> {
        let city = self.ask(
            "\nWould you like to see data for Chicago, New York City, or Washington?\n",
            "Invalid city choice. Check spelling and ensure you are selecting one of the three cities provided.",
            |s| s.parse::<City>().ok(),
        )?;
        writeln!(self.output, "Will filter data within the {city} dataset.")?;
        Ok(city)
    }

    pub fn ask_time_filter(&mut self) -> Result<TimeFilter> {
        self.ask(
            "\nWould you like to filter the data by \"month\", \"day\", \"both\", or \"none\" for no time filter?\n",
            "Invalid choice. Select one of the inputs listed in quotation marks.",
            |s| match s {
                "month" => Some(TimeFilter::Month),
                "day" => Some(TimeFilter::Day),
                "both" => Some(TimeFilter::Both),
                "none" => Some(TimeFilter::None),
                _ => None,
            },
        )
    }

    /// Month number 1-6 from a full month name.
    pub fn ask_month(&mut self) -> Result<u32> {
        self.ask(
            "\nWhich month? January, February, March, April, May, or June?\n",
            "An invalid month was chosen. Check spelling and ensure you are choosing from the first six months of the year.",
            |s| MONTHS.iter().position(|m| *m == s).map(|i| i as u32 + 1),
        )
    }

    pub fn ask_day(&mut self) -> Result<Weekday> {
        self.ask(
            "\nWhich day? Please type a day M, Tu, W, Th, F, Sa, Su.\n",
            "An invalid day choice was entered. Check spelling and ensure you are typing the desired day in the proper format.",
            |s| parse_day(s).ok().flatten(),
        )
    }

    pub fn ask_yes_no(&mut self, question: &str) -> Result<bool> {
        self.ask(question, "An invalid input was provided. Try again.", |s| match s {
            "yes" | "y" => Some(true),
            "no" | "n" => Some(false),
            _ => None,
        })
    }

    /// Asks which time filter to apply, then the month and/or day it needs.
    pub fn ask_filters(&mut self) -> Result<FilterSpec> {
        let (month, day) = match self.ask_time_filter()? {
            TimeFilter::Month => (Some(self.ask_month()?), None),
            TimeFilter::Day => (None, Some(self.ask_day()?)),
            TimeFilter::Both => {
                writeln!(self.output, "Filtering for both day and month")?;
                (Some(self.ask_month()?), Some(self.ask_day()?))
            }
            TimeFilter::None => {
                writeln!(
                    self.output,
                    "No filter will be applied. All available days and months will be considered."
                )?;
                (None, None)
            }
        };
        FilterSpec::new(month, day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(script: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(script.as_bytes().to_vec()), Vec::new())
    }

    fn transcript(p: Prompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(p.into_output()).unwrap()
    }

    #[test]
    fn test_city_reprompts_until_valid() {
        let mut p = prompter("boston\n\n  New York City \n");
        assert_eq!(p.ask_city().unwrap(), City::NewYorkCity);

        let out = transcript(p);
        assert_eq!(out.matches("Invalid city choice").count(), 2);
        assert!(out.contains("Will filter data within the New York City dataset."));
    }

    #[test]
    fn test_month_by_name_only() {
        let mut p = prompter("july\n3\nMarch\n");
        assert_eq!(p.ask_month().unwrap(), 3);
        assert_eq!(transcript(p).matches("An invalid month").count(), 2);
    }

    #[test]
    fn test_day_abbreviations() {
        let mut p = prompter("all\nTh\n");
        assert_eq!(p.ask_day().unwrap(), Weekday::Thu);
    }

    #[test]
    fn test_filters_both() {
        let mut p = prompter("weekly\nboth\nfebruary\nsu\n");
        let spec = p.ask_filters().unwrap();
        assert_eq!(spec.month(), Some(2));
        assert_eq!(spec.day(), Some(Weekday::Sun));
    }

    #[test]
    fn test_filters_none() {
        let mut p = prompter("none\n");
        assert_eq!(p.ask_filters().unwrap(), FilterSpec::default());
    }

    #[test]
    fn test_yes_no() {
        let mut p = prompter("maybe\nYES\nno\n");
        assert!(p.ask_yes_no("Again? ").unwrap());
        assert!(!p.ask_yes_no("Again? ").unwrap());
    }

    #[test]
    fn test_eof_is_input_closed() {
        let mut p = prompter("maybe\n");
        assert!(matches!(
            p.ask_yes_no("Again? "),
            Err(BikeshareError::InputClosed)
        ));
    }
}
