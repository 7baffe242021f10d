//! Loading of resolved forecast file references.
//!
//! The gridded format itself is handled entirely by the netcdf crate; this
//! module only adapts its view of a file into the labeled summary the rest
//! of the pipeline works with.

use std::fmt;
use std::path::Path;

use ndarray::{ArrayD, IxDyn};
use thiserror::Error;

use crate::display::ShowValue;

/// Error type for dataset loading
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("NetCDF error: {0}")]
    Netcdf(#[from] netcdf::Error),

    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("variable not found: {0}")]
    MissingVariable(String),

    #[error("unsupported location: {0}")]
    UnsupportedLocation(String),

    #[error("data conversion error: {0}")]
    ConversionError(String),
}

/// A resolvable source of forecast datasets.
///
/// Load failures propagate unmodified; there is no retry or caching at this
/// layer.
pub trait DatasetSource {
    fn load(&self, location: &str) -> Result<ForecastDataset, LoadError>;
}

/// Loads forecast files from the local filesystem through the netcdf crate.
pub struct NetcdfSource;

impl DatasetSource for NetcdfSource {
    fn load(&self, location: &str) -> Result<ForecastDataset, LoadError> {
        if location.starts_with("http://") || location.starts_with("https://") {
            return Err(LoadError::UnsupportedLocation(format!(
                "remote references must be mirrored locally before loading: {}",
                location
            )));
        }

        let path = Path::new(location);
        if !path.exists() {
            return Err(LoadError::FileNotFound(location.to_string()));
        }

        let file = netcdf::open(path)?;
        ForecastDataset::from_file(file)
    }
}

/// Summary of one dimension in a loaded dataset.
#[derive(Debug, Clone)]
pub struct DimensionSummary {
    pub name: String,
    pub size: usize,
}

/// Summary of one variable in a loaded dataset.
#[derive(Debug, Clone)]
pub struct VariableSummary {
    pub name: String,
    pub dimensions: Vec<String>,
    pub shape: Vec<usize>,
    pub units: Option<String>,
    pub long_name: Option<String>,
}

/// A loaded labeled dataset: the open file plus its structural summary.
pub struct ForecastDataset {
    file: netcdf::File,
    pub dimensions: Vec<DimensionSummary>,
    pub coordinates: Vec<VariableSummary>,
    pub data_vars: Vec<VariableSummary>,
    pub attributes: Vec<(String, String)>,
}

impl ForecastDataset {
    pub(crate) fn from_file(file: netcdf::File) -> Result<Self, LoadError> {
        let dimensions: Vec<DimensionSummary> = file
            .dimensions()
            .map(|dim| DimensionSummary {
                name: dim.name().to_string(),
                size: dim.len(),
            })
            .collect();

        let mut coordinates = Vec::new();
        let mut data_vars = Vec::new();
        for var in file.variables() {
            let summary = VariableSummary {
                name: var.name().to_string(),
                dimensions: var
                    .dimensions()
                    .iter()
                    .map(|dim| dim.name().to_string())
                    .collect(),
                shape: var.dimensions().iter().map(|dim| dim.len()).collect(),
                units: string_attribute(&var, "units"),
                long_name: string_attribute(&var, "long_name"),
            };
            // A variable sharing its name with a dimension labels that
            // dimension; everything else is payload.
            if dimensions.iter().any(|dim| dim.name == summary.name) {
                coordinates.push(summary);
            } else {
                data_vars.push(summary);
            }
        }

        let attributes = file
            .attributes()
            .map(|attr| (attr.name().to_string(), attribute_text(&attr)))
            .collect();

        Ok(Self {
            file,
            dimensions,
            coordinates,
            data_vars,
            attributes,
        })
    }

    /// Read a variable's full payload as a dynamic-dimensional f64 array.
    pub fn variable_values(&self, variable_name: &str) -> Result<ArrayD<f64>, LoadError> {
        let var = self
            .file
            .variable(variable_name)
            .ok_or_else(|| LoadError::MissingVariable(variable_name.to_string()))?;

        let raw: Vec<f64> = var.get_values(..)?;
        let shape: Vec<usize> = var.dimensions().iter().map(|dim| dim.len()).collect();

        ArrayD::from_shape_vec(IxDyn(&shape), raw)
            .map_err(|error| LoadError::ConversionError(error.to_string()))
    }
}

impl fmt::Display for ForecastDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dimensions:")?;
        for dim in &self.dimensions {
            writeln!(f, "    {}: {}", dim.name, dim.size)?;
        }

        writeln!(f, "Coordinates:")?;
        for var in &self.coordinates {
            writeln!(f, "    {} ({})", var.name, var.dimensions.join(", "))?;
        }

        writeln!(f, "Data variables:")?;
        for var in &self.data_vars {
            write!(f, "    {} ({})", var.name, var.dimensions.join(", "))?;
            if let Some(units) = &var.units {
                write!(f, " [{}]", units)?;
            }
            if let Some(long_name) = &var.long_name {
                write!(f, " {}", long_name)?;
            }
            writeln!(f)?;
        }

        writeln!(f, "Attributes:")?;
        for (name, value) in &self.attributes {
            writeln!(f, "    {}: {}", name, value)?;
        }

        Ok(())
    }
}

impl From<&ForecastDataset> for ShowValue {
    fn from(dataset: &ForecastDataset) -> Self {
        ShowValue::Dataset(dataset.to_string())
    }
}

fn string_attribute(var: &netcdf::Variable, name: &str) -> Option<String> {
    let attr = var.attribute(name)?;
    match attr.value() {
        Ok(netcdf::AttrValue::Str(value)) => Some(value),
        _ => None,
    }
}

fn attribute_text(attr: &netcdf::Attribute) -> String {
    match attr.value() {
        Ok(netcdf::AttrValue::Str(value)) => value,
        Ok(netcdf::AttrValue::Int(value)) => value.to_string(),
        Ok(netcdf::AttrValue::Float(value)) => value.to_string(),
        Ok(netcdf::AttrValue::Double(value)) => value.to_string(),
        Ok(other) => format!("{:?}", other),
        Err(_) => String::from("<unreadable>"),
    }
}
