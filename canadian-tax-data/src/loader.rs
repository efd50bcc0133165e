use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use canadian_tax_core::{
    BracketSchedule, CcaConfig, CorporateConfig, DividendConfig, Jurisdiction,
    JurisdictionTaxTable, PayrollConfig, PersonalCreditConfig, TaxBracket, TaxError, TaxRules,
    TaxYearConfig, TaxYearRules,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

/// File holding every year's bracket schedules in a rules directory.
pub const BRACKETS_FILE: &str = "brackets.csv";

/// Errors that can occur when loading rule data.
#[derive(Debug, Error)]
pub enum RulesLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("brackets are defined for tax year {0} but no <year>.toml parameters were found")]
    MissingYearConfig(i32),

    #[error("{file} declares tax year {tax_year}")]
    YearMismatch { file: String, tax_year: i32 },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid rules: {0}")]
    Rules(#[from] TaxError),
}

impl From<csv::Error> for RulesLoaderError {
    fn from(err: csv::Error) -> Self {
        RulesLoaderError::CsvParse(err.to_string())
    }
}

impl From<toml::de::Error> for RulesLoaderError {
    fn from(err: toml::de::Error) -> Self {
        RulesLoaderError::TomlParse(err.to_string())
    }
}

/// A single record from the brackets CSV file.
///
/// - `tax_year`: the tax year (e.g., 2025)
/// - `jurisdiction`: `federal` or a province code (`ON`, `BC`, ...)
/// - `upper_limit`: the bracket's exclusive ceiling (empty for the top bracket)
/// - `rate`: the bracket rate as a decimal (e.g., 0.15 for 15%)
///
/// Rows for one schedule must appear in ascending order.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub tax_year: i32,
    pub jurisdiction: Jurisdiction,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_limit: Option<Decimal>,
    pub rate: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Contents of a `<year>.toml` parameter file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct YearConfigFile {
    pub tax_year: i32,
    pub basic_personal_amounts: BTreeMap<Jurisdiction, Decimal>,
    pub personal_credits: PersonalCreditConfig,
    pub dividends: DividendConfig,
    pub corporate: CorporateConfig,
    pub payroll: PayrollConfig,
    pub cca: CcaConfig,
}

impl YearConfigFile {
    fn into_parts(self) -> (BTreeMap<Jurisdiction, Decimal>, TaxYearConfig) {
        let config = TaxYearConfig {
            tax_year: self.tax_year,
            personal_credits: self.personal_credits,
            dividends: self.dividends,
            corporate: self.corporate,
            payroll: self.payroll,
            cca: self.cca,
        };
        (self.basic_personal_amounts, config)
    }
}

/// Loader for rule tables from CSV bracket data and TOML parameter files.
///
/// Parsed data goes through the same validating constructors as the
/// built-in rules, so a loaded [`TaxRules`] satisfies every schedule and
/// parameter invariant.
pub struct RulesLoader;

impl RulesLoader {
    /// Parse bracket records from a CSV reader.
    pub fn parse_brackets<R: Read>(reader: R) -> Result<Vec<BracketRecord>, RulesLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Parse one year's parameters from TOML text.
    pub fn parse_year_config(text: &str) -> Result<YearConfigFile, RulesLoaderError> {
        Ok(toml::from_str(text)?)
    }

    /// Build one year's rules from the bracket records for that year.
    ///
    /// Records for other years are ignored.
    ///
    /// # Errors
    ///
    /// [`RulesLoaderError::Rules`] wrapping the [`TaxError`] of the first
    /// schedule, table or parameter that fails validation. A year with no
    /// federal rows fails as an empty federal schedule.
    pub fn build_year(
        records: &[BracketRecord],
        config: YearConfigFile,
    ) -> Result<TaxYearRules, RulesLoaderError> {
        let tax_year = config.tax_year;
        let mut grouped: BTreeMap<Jurisdiction, Vec<TaxBracket>> = BTreeMap::new();

        for record in records.iter().filter(|r| r.tax_year == tax_year) {
            let bracket = match record.upper_limit {
                Some(limit) => TaxBracket::bounded(limit, record.rate),
                None => TaxBracket::unbounded(record.rate),
            };
            grouped.entry(record.jurisdiction).or_default().push(bracket);
        }

        let federal = BracketSchedule::new(
            Jurisdiction::Federal,
            grouped.remove(&Jurisdiction::Federal).unwrap_or_default(),
        )?;

        let mut provincial = BTreeMap::new();
        for (jurisdiction, brackets) in grouped {
            if let Jurisdiction::Provincial(province) = jurisdiction {
                provincial.insert(province, BracketSchedule::new(jurisdiction, brackets)?);
            }
        }

        debug!(
            tax_year,
            provinces = provincial.len(),
            "built bracket schedules"
        );

        let (basic_personal_amounts, config) = config.into_parts();
        let table = JurisdictionTaxTable::new(tax_year, federal, provincial, basic_personal_amounts)?;

        Ok(TaxYearRules::new(table, config)?)
    }

    /// Build a registry from bracket records and one parameter file per year.
    ///
    /// # Errors
    ///
    /// - [`RulesLoaderError::MissingYearConfig`] when bracket rows exist for
    ///   a year without parameters.
    /// - Anything [`RulesLoader::build_year`] returns.
    pub fn build(
        records: &[BracketRecord],
        configs: Vec<YearConfigFile>,
    ) -> Result<TaxRules, RulesLoaderError> {
        if let Some(year) = records
            .iter()
            .map(|r| r.tax_year)
            .find(|year| !configs.iter().any(|c| c.tax_year == *year))
        {
            return Err(RulesLoaderError::MissingYearConfig(year));
        }

        let mut rules = TaxRules::new();
        for config in configs {
            let tax_year = config.tax_year;
            if rules.register(Self::build_year(records, config)?).is_some() {
                warn!(tax_year, "duplicate parameters for tax year, keeping the last");
            }
        }

        Ok(rules)
    }

    /// Load every year from a rules directory: `brackets.csv` plus one
    /// `<year>.toml` per tax year.
    ///
    /// # Errors
    ///
    /// - [`RulesLoaderError::Io`] if a file cannot be read.
    /// - [`RulesLoaderError::YearMismatch`] if a `<year>.toml` declares a
    ///   different `tax_year` than its name.
    /// - Anything [`RulesLoader::build`] returns.
    pub fn load_dir(dir: &Path) -> Result<TaxRules, RulesLoaderError> {
        let brackets_path = dir.join(BRACKETS_FILE);
        let brackets = fs::File::open(&brackets_path).map_err(|source| RulesLoaderError::Io {
            path: brackets_path.clone(),
            source,
        })?;
        let records = Self::parse_brackets(brackets)?;

        let entries = fs::read_dir(dir).map_err(|source| RulesLoaderError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut configs = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|source| RulesLoaderError::Io {
                    path: dir.to_path_buf(),
                    source,
                })?
                .path();

            let Some(stem_year) = year_file_stem(&path) else {
                continue;
            };

            let text = fs::read_to_string(&path).map_err(|source| RulesLoaderError::Io {
                path: path.clone(),
                source,
            })?;
            let config = Self::parse_year_config(&text)?;

            if config.tax_year != stem_year {
                return Err(RulesLoaderError::YearMismatch {
                    file: path.display().to_string(),
                    tax_year: config.tax_year,
                });
            }
            configs.push(config);
        }

        let rules = Self::build(&records, configs)?;
        info!(
            dir = %dir.display(),
            years = ?rules.available_years(),
            "loaded tax rules"
        );

        Ok(rules)
    }
}

/// The year named by a `<year>.toml` path, if it is one.
fn year_file_stem(path: &Path) -> Option<i32> {
    if path.extension()? != "toml" {
        return None;
    }
    path.file_stem()?.to_str()?.parse().ok()
}
