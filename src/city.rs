//! The cities with published trip data.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::BikeshareError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum City {
    Chicago,
    NewYorkCity,
    Washington,
}

impl City {
    /// File name of the city's trip export inside the data directory.
    pub fn file_name(self) -> &'static str {
        match self {
            City::Chicago => "chicago.csv",
            City::NewYorkCity => "new_york_city.csv",
            City::Washington => "washington.csv",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            City::Chicago => "Chicago",
            City::NewYorkCity => "New York City",
            City::Washington => "Washington",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for City {
    type Err = BikeshareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chicago" => Ok(City::Chicago),
            "new york city" | "new-york-city" | "new_york_city" | "nyc" => Ok(City::NewYorkCity),
            "washington" => Ok(City::Washington),
            _ => Err(BikeshareError::UnknownCity(s.trim().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("  Chicago ".parse::<City>().unwrap(), City::Chicago);
        assert_eq!("NEW YORK CITY".parse::<City>().unwrap(), City::NewYorkCity);
        assert_eq!("nyc".parse::<City>().unwrap(), City::NewYorkCity);
    }

    #[test]
    fn test_unknown_city() {
        let err = "boston".parse::<City>().unwrap_err();
        assert!(matches!(err, BikeshareError::UnknownCity(ref c) if c == "boston"));
    }

    #[test]
    fn test_file_names() {
        assert_eq!(City::NewYorkCity.file_name(), "new_york_city.csv");
        assert_eq!(City::Washington.to_string(), "Washington");
    }
}
