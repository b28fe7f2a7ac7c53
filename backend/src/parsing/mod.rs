//! Parsers for uploaded equipment data.
//!
//! # Parsers
//!
//! - [`csv_parser`]: Parse the five-column equipment CSV into validated records
//!
//! # Example
//!
//! ```
//! use equipment_analytics::parsing::csv_parser::parse_equipment_csv;
//!
//! let csv = "Equipment Name,Type,Flowrate,Pressure,Temperature\nP-1,Pump,120,5.2,110\n";
//! let parsed = parse_equipment_csv(csv.as_bytes()).unwrap();
//! assert_eq!(parsed.records.len(), 1);
//! ```

pub mod csv_parser;


pub use csv_parser::{parse_equipment_csv, CsvIngestError, ParsedCsv};
