use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::TaxError;

/// Canadian provinces and territories, identified by their two-letter codes.
///
/// Having a variant does not mean the engine has rates for it; schedules
/// are registered per tax year in a [`crate::JurisdictionTaxTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Province {
    Alberta,
    BritishColumbia,
    Manitoba,
    NewBrunswick,
    NewfoundlandAndLabrador,
    NovaScotia,
    NorthwestTerritories,
    Nunavut,
    Ontario,
    PrinceEdwardIsland,
    Quebec,
    Saskatchewan,
    Yukon,
}

impl Province {
    pub const ALL: [Province; 13] = [
        Self::Alberta,
        Self::BritishColumbia,
        Self::Manitoba,
        Self::NewBrunswick,
        Self::NewfoundlandAndLabrador,
        Self::NovaScotia,
        Self::NorthwestTerritories,
        Self::Nunavut,
        Self::Ontario,
        Self::PrinceEdwardIsland,
        Self::Quebec,
        Self::Saskatchewan,
        Self::Yukon,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alberta => "AB",
            Self::BritishColumbia => "BC",
            Self::Manitoba => "MB",
            Self::NewBrunswick => "NB",
            Self::NewfoundlandAndLabrador => "NL",
            Self::NovaScotia => "NS",
            Self::NorthwestTerritories => "NT",
            Self::Nunavut => "NU",
            Self::Ontario => "ON",
            Self::PrinceEdwardIsland => "PE",
            Self::Quebec => "QC",
            Self::Saskatchewan => "SK",
            Self::Yukon => "YT",
        }
    }

    /// Parses a two-letter code. Matching is case-insensitive and ignores
    /// surrounding whitespace.
    pub fn parse(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|province| province.as_str().eq_ignore_ascii_case(code))
    }
}

impl fmt::Display for Province {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Province {
    type Err = TaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| TaxError::UnknownJurisdictionCode(s.to_string()))
    }
}

impl TryFrom<String> for Province {
    type Error = TaxError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Province> for String {
    fn from(province: Province) -> Self {
        province.as_str().to_string()
    }
}

/// A taxing authority: the federal government or one province/territory.
///
/// The text form is `federal` or the province code, which is also the key
/// used in rule files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Jurisdiction {
    Federal,
    Provincial(Province),
}

impl Jurisdiction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Federal => "federal",
            Self::Provincial(province) => province.as_str(),
        }
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Jurisdiction {
    type Err = TaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("federal") {
            return Ok(Self::Federal);
        }
        s.parse().map(Self::Provincial)
    }
}

impl TryFrom<String> for Jurisdiction {
    type Error = TaxError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Jurisdiction> for String {
    fn from(jurisdiction: Jurisdiction) -> Self {
        jurisdiction.as_str().to_string()
    }
}

impl From<Province> for Jurisdiction {
    fn from(province: Province) -> Self {
        Self::Provincial(province)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn every_province_round_trips_through_its_code() {
        for province in Province::ALL {
            assert_eq!(Province::parse(province.as_str()), Some(province));
        }
    }

    #[test]
    fn province_parse_is_case_insensitive() {
        assert_eq!(Province::parse("on"), Some(Province::Ontario));
        assert_eq!(Province::parse(" bc "), Some(Province::BritishColumbia));
    }

    #[test]
    fn unknown_province_code_is_an_error() {
        let result = "XX".parse::<Province>();

        assert_eq!(result, Err(TaxError::UnknownJurisdictionCode("XX".to_string())));
    }

    #[test]
    fn jurisdiction_parses_federal_and_provinces() {
        assert_eq!("federal".parse::<Jurisdiction>(), Ok(Jurisdiction::Federal));
        assert_eq!("FEDERAL".parse::<Jurisdiction>(), Ok(Jurisdiction::Federal));
        assert_eq!(
            "ON".parse::<Jurisdiction>(),
            Ok(Jurisdiction::Provincial(Province::Ontario))
        );
    }

    #[test]
    fn jurisdiction_display_uses_codes() {
        assert_eq!(Jurisdiction::Federal.to_string(), "federal");
        assert_eq!(Jurisdiction::from(Province::Quebec).to_string(), "QC");
    }
}
