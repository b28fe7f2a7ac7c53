//! Equipment records and the numeric parameters measured on them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three numeric parameters carried by every equipment record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parameter {
    Flowrate,
    Pressure,
    Temperature,
}

impl Parameter {
    /// All parameters in their canonical order (row/column order of the correlation matrix).
    pub const ALL: [Parameter; 3] = [
        Parameter::Flowrate,
        Parameter::Pressure,
        Parameter::Temperature,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Parameter::Flowrate => "flowrate",
            Parameter::Pressure => "pressure",
            Parameter::Temperature => "temperature",
        }
    }

    /// Position of this parameter in [`Parameter::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Parameter::Flowrate => 0,
            Parameter::Pressure => 1,
            Parameter::Temperature => 2,
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field of an [`EquipmentRecord`] that failed validation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RecordField {
    Name,
    Parameter(Parameter),
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordField::Name => f.write_str("name"),
            RecordField::Parameter(p) => write!(f, "{}", p),
        }
    }
}

/// A record violating the equipment invariant reached the analytics boundary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid equipment record{}: field `{field}` {reason}", index_suffix(.index))]
pub struct InvalidRecordError {
    /// Position of the record in the submitted sequence, when known.
    pub index: Option<usize>,
    pub field: RecordField,
    pub reason: String,
}

fn index_suffix(index: &Option<usize>) -> String {
    match index {
        Some(i) => format!(" #{}", i),
        None => String::new(),
    }
}

impl InvalidRecordError {
    pub fn new(field: RecordField, reason: impl Into<String>) -> Self {
        Self {
            index: None,
            field,
            reason: reason.into(),
        }
    }

    pub fn at_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }
}

/// One row of equipment data.
///
/// The type is an open category and is kept verbatim: `"Pump"` and `"pump"`
/// are distinct types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub equipment_type: String,
    pub flowrate: f64,
    pub pressure: f64,
    pub temperature: f64,
}

impl EquipmentRecord {
    /// Build a record, rejecting empty names and non-finite parameters.
    pub fn new(
        name: impl Into<String>,
        equipment_type: impl Into<String>,
        flowrate: f64,
        pressure: f64,
        temperature: f64,
    ) -> Result<Self, InvalidRecordError> {
        let record = Self {
            name: name.into(),
            equipment_type: equipment_type.into(),
            flowrate,
            pressure,
            temperature,
        };
        record.validate()?;
        Ok(record)
    }

    /// Value of the given parameter.
    pub fn value(&self, parameter: Parameter) -> f64 {
        match parameter {
            Parameter::Flowrate => self.flowrate,
            Parameter::Pressure => self.pressure,
            Parameter::Temperature => self.temperature,
        }
    }

    /// Check the record invariant: non-empty name, finite numeric fields.
    pub fn validate(&self) -> Result<(), InvalidRecordError> {
        if self.name.trim().is_empty() {
            return Err(InvalidRecordError::new(RecordField::Name, "must not be empty"));
        }
        for parameter in Parameter::ALL {
            let value = self.value(parameter);
            if !value.is_finite() {
                return Err(InvalidRecordError::new(
                    RecordField::Parameter(parameter),
                    format!("must be a finite number, got {}", value),
                ));
            }
        }
        Ok(())
    }
}
