//! Resolution of NWM forecast file references.
//!
//! Run parameters (run type, variable, geography, member, reference time
//! range, forecast cycles, lead times) map deterministically onto the
//! operational NWM object layout, one reference per (date, cycle, lead
//! time) combination.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::time_utils::{compact_date, daily_dates, parse_minute_timestamp};

/// Default base URL of the operational NWM object store.
pub const DEFAULT_URL_BASE: &str = "https://storage.googleapis.com/national-water-model/";

/// Error type for file reference resolution
#[derive(Error, Debug)]
pub enum UrlGenError {
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("empty time range: end {end} precedes start {start}")]
    EmptyRange { start: String, end: String },
}

/// Forecast run categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NwmRun {
    ShortRange,
    MediumRange,
    MediumRangeNoDa,
    LongRange,
    AnalysisAssim,
    AnalysisAssimExtend,
    AnalysisAssimExtendNoDa,
    AnalysisAssimNoDa,
}

impl NwmRun {
    /// Directory and file-name token for this run.
    pub fn token(&self) -> &'static str {
        match self {
            NwmRun::ShortRange => "short_range",
            NwmRun::MediumRange => "medium_range",
            NwmRun::MediumRangeNoDa => "medium_range_no_da",
            NwmRun::LongRange => "long_range",
            NwmRun::AnalysisAssim => "analysis_assim",
            NwmRun::AnalysisAssimExtend => "analysis_assim_extend",
            NwmRun::AnalysisAssimExtendNoDa => "analysis_assim_extend_no_da",
            NwmRun::AnalysisAssimNoDa => "analysis_assim_no_da",
        }
    }

    /// Analysis-and-assimilation runs address lookback (`tm`) files instead
    /// of forecast lead times.
    pub fn is_analysis(&self) -> bool {
        matches!(
            self,
            NwmRun::AnalysisAssim
                | NwmRun::AnalysisAssimExtend
                | NwmRun::AnalysisAssimExtendNoDa
                | NwmRun::AnalysisAssimNoDa
        )
    }

    /// Ensemble runs carry a member id in directory and file names.
    pub fn supports_members(&self) -> bool {
        matches!(
            self,
            NwmRun::MediumRange | NwmRun::MediumRangeNoDa | NwmRun::LongRange
        )
    }
}

impl std::fmt::Display for NwmRun {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

impl std::str::FromStr for NwmRun {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "short_range" => Ok(NwmRun::ShortRange),
            "medium_range" => Ok(NwmRun::MediumRange),
            "medium_range_no_da" => Ok(NwmRun::MediumRangeNoDa),
            "long_range" => Ok(NwmRun::LongRange),
            "analysis_assim" => Ok(NwmRun::AnalysisAssim),
            "analysis_assim_extend" => Ok(NwmRun::AnalysisAssimExtend),
            "analysis_assim_extend_no_da" => Ok(NwmRun::AnalysisAssimExtendNoDa),
            "analysis_assim_no_da" => Ok(NwmRun::AnalysisAssimNoDa),
            _ => Err(format!("Unknown run type: {}", s)),
        }
    }
}

/// Physical quantity groups stored in separate output files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NwmVar {
    ChannelRt,
    Land,
    Reservoir,
    TerrainRt,
    Forcing,
}

impl NwmVar {
    pub fn token(&self) -> &'static str {
        match self {
            NwmVar::ChannelRt => "channel_rt",
            NwmVar::Land => "land",
            NwmVar::Reservoir => "reservoir",
            NwmVar::TerrainRt => "terrain_rt",
            NwmVar::Forcing => "forcing",
        }
    }
}

impl std::fmt::Display for NwmVar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

impl std::str::FromStr for NwmVar {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "channel_rt" => Ok(NwmVar::ChannelRt),
            "land" => Ok(NwmVar::Land),
            "reservoir" => Ok(NwmVar::Reservoir),
            "terrain_rt" => Ok(NwmVar::TerrainRt),
            "forcing" => Ok(NwmVar::Forcing),
            _ => Err(format!("Unknown variable group: {}", s)),
        }
    }
}

/// Spatial domains the model is run over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NwmGeo {
    Conus,
    Hawaii,
    PuertoRico,
}

impl NwmGeo {
    pub fn token(&self) -> &'static str {
        match self {
            NwmGeo::Conus => "conus",
            NwmGeo::Hawaii => "hawaii",
            NwmGeo::PuertoRico => "puertorico",
        }
    }

    // CONUS is the unmarked domain in directory names
    fn dir_suffix(&self) -> &'static str {
        match self {
            NwmGeo::Conus => "",
            NwmGeo::Hawaii => "_hawaii",
            NwmGeo::PuertoRico => "_puertorico",
        }
    }
}

impl std::fmt::Display for NwmGeo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

/// Ensemble member id, valid for medium- and long-range runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NwmMember(u8);

impl NwmMember {
    pub fn new(member: u8) -> Result<Self, UrlGenError> {
        if !(1..=7).contains(&member) {
            return Err(UrlGenError::InvalidParameter(format!(
                "ensemble member {} is out of range (1-7)",
                member
            )));
        }
        Ok(NwmMember(member))
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

/// Parameters identifying a set of NWM forecast files.
#[derive(Debug, Clone)]
pub struct FileListParams {
    pub run: NwmRun,
    pub variable: NwmVar,
    pub geography: NwmGeo,
    pub member: Option<NwmMember>,
    /// Inclusive start of the reference-date range.
    pub start_time: NaiveDateTime,
    /// Inclusive end of the reference-date range.
    pub end_time: NaiveDateTime,
    /// Forecast cycle hours (UTC, 0-23).
    pub fcst_cycles: Vec<u8>,
    /// Forecast lead times in hours; lookback hours for analysis runs.
    pub lead_times: Vec<u16>,
}

impl FileListParams {
    /// Build parameters from compact `YYYYMMDDHHMM` timestamps and validate
    /// them.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        run: NwmRun,
        variable: NwmVar,
        geography: NwmGeo,
        member: Option<NwmMember>,
        start_time: &str,
        end_time: &str,
        fcst_cycles: Vec<u8>,
        lead_times: Vec<u16>,
    ) -> Result<Self, UrlGenError> {
        let start = parse_minute_timestamp(start_time).map_err(UrlGenError::InvalidTimestamp)?;
        let end = parse_minute_timestamp(end_time).map_err(UrlGenError::InvalidTimestamp)?;

        let params = Self {
            run,
            variable,
            geography,
            member,
            start_time: start,
            end_time: end,
            fcst_cycles,
            lead_times,
        };
        params.validate()?;
        Ok(params)
    }

    /// Validate parameter combinations
    pub fn validate(&self) -> Result<(), UrlGenError> {
        if self.end_time < self.start_time {
            return Err(UrlGenError::EmptyRange {
                start: self.start_time.format("%Y%m%d%H%M").to_string(),
                end: self.end_time.format("%Y%m%d%H%M").to_string(),
            });
        }
        if self.fcst_cycles.is_empty() {
            return Err(UrlGenError::InvalidParameter(
                "at least one forecast cycle is required".to_string(),
            ));
        }
        if let Some(cycle) = self.fcst_cycles.iter().find(|cycle| **cycle > 23) {
            return Err(UrlGenError::InvalidParameter(format!(
                "forecast cycle {} is out of range (0-23)",
                cycle
            )));
        }
        if self.lead_times.is_empty() {
            return Err(UrlGenError::InvalidParameter(
                "at least one lead time is required".to_string(),
            ));
        }
        if !self.run.is_analysis() && self.lead_times.contains(&0) {
            return Err(UrlGenError::InvalidParameter(
                "lead time 0 is only addressable for analysis runs".to_string(),
            ));
        }
        match (&self.member, self.run.supports_members()) {
            (Some(_), false) => {
                return Err(UrlGenError::InvalidParameter(format!(
                    "run {} does not take an ensemble member",
                    self.run
                )));
            }
            (None, true) => {
                return Err(UrlGenError::InvalidParameter(format!(
                    "run {} requires an ensemble member",
                    self.run
                )));
            }
            _ => {}
        }
        Ok(())
    }
}

/// Resolve the ordered list of NWM file references for `params` against the
/// default object store.
pub fn create_default_file_list(params: &FileListParams) -> Result<Vec<String>, UrlGenError> {
    create_file_list(params, DEFAULT_URL_BASE)
}

/// Resolve the ordered list of NWM file references for `params`.
///
/// Deterministic for identical inputs: reference dates iterate outermost,
/// then forecast cycles, then lead times.
pub fn create_file_list(
    params: &FileListParams,
    url_base: &str,
) -> Result<Vec<String>, UrlGenError> {
    params.validate()?;

    let member_dir = params
        .member
        .map(|member| format!("_mem{}", member.get()))
        .unwrap_or_default();
    let member_file = params
        .member
        .map(|member| format!("_{}", member.get()))
        .unwrap_or_default();

    let mut files = Vec::new();
    for date in daily_dates(params.start_time.date(), params.end_time.date()) {
        let day = compact_date(date);
        for &cycle in &params.fcst_cycles {
            for &lead in &params.lead_times {
                let range_token = if params.run.is_analysis() {
                    format!("tm{:02}", lead)
                } else {
                    format!("f{:03}", lead)
                };
                files.push(format!(
                    "{}nwm.{}/{}{}{}/nwm.t{:02}z.{}.{}{}.{}.{}.nc",
                    url_base,
                    day,
                    params.run.token(),
                    member_dir,
                    params.geography.dir_suffix(),
                    cycle,
                    params.run.token(),
                    params.variable.token(),
                    member_file,
                    range_token,
                    params.geography.token(),
                ));
            }
        }
    }

    Ok(files)
}

/// Append the kerchunk reference suffix to each resolved file reference,
/// making it addressable through the JSON sidecar protocol.
pub fn append_jsons(file_list: &[String]) -> Vec<String> {
    file_list
        .iter()
        .map(|file| format!("{}.json", file))
        .collect()
}
