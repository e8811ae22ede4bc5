//! CSV-based life table loader
//!
//! Reads every category from a single long-format file:
//!
//! ```text
//! table,x,lx
//! Hombre_No_Invalido,0,1000000
//! Hombre_No_Invalido,1,999120.5
//! Mujer_Invalido,0,1000000
//! ```

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::{LifeTable, LifeTables, TableKey};
use crate::error::TableLoadError;

/// Default path to the table file
pub const DEFAULT_TABLES_PATH: &str = "data/tables.csv";

/// How survivor counts are written in the source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberFormat {
    /// `1234567.89`
    #[default]
    Plain,
    /// Colombian display format with `.` thousands and `,` decimals: `1.234.567,89`
    Colombian,
}

/// Raw CSV row
#[derive(Debug, Deserialize)]
struct CsvRow {
    table: String,
    x: u32,
    lx: String,
}

/// Parse a survivor count written in the given number format
pub fn parse_survivors(raw: &str, format: NumberFormat) -> Option<f64> {
    let raw = raw.trim();
    match format {
        NumberFormat::Plain => raw.parse().ok(),
        NumberFormat::Colombian => raw.replace('.', "").replace(',', ".").parse().ok(),
    }
}

/// Load all tables from a CSV file
pub fn load_tables<P: AsRef<Path>>(path: P, format: NumberFormat) -> Result<LifeTables, TableLoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| TableLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let tables = load_tables_from_reader(file, format)?;
    info!("Loaded {} life tables from {}", tables.len(), path.display());
    Ok(tables)
}

/// Load tables from any reader (e.g. string buffer)
pub fn load_tables_from_reader<R: Read>(reader: R, format: NumberFormat) -> Result<LifeTables, TableLoadError> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    // BTreeMap keeps load order deterministic for logging
    let mut rows: BTreeMap<String, Vec<(u32, f64)>> = BTreeMap::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        let lx = parse_survivors(&row.lx, format).ok_or_else(|| TableLoadError::InvalidSurvivors {
            key: row.table.clone(),
            age: row.x,
            value: row.lx.clone(),
        })?;
        rows.entry(row.table).or_default().push((row.x, lx));
    }

    let mut tables = LifeTables::new();
    for (name, pairs) in rows {
        let key: TableKey = name.parse()?;
        let table = LifeTable::from_pairs(pairs).map_err(|err| match err {
            TableLoadError::RepeatedAge { age } => TableLoadError::DuplicateAge {
                key: name.clone(),
                age,
            },
            other => other,
        })?;
        debug!("Table {}: {} ages", key, table.len());
        tables.insert(key, table);
    }

    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{Condition, Gender, TableProvider};

    const SAMPLE: &str = "\
table,x,lx
Hombre_No_Invalido,60,1000
Hombre_No_Invalido,61,990.5
Hombre_No_Invalido,62,975
Mujer_No_Invalido,60,1000
Mujer_No_Invalido,62,985
";

    #[test]
    fn test_load_from_reader() {
        let tables = load_tables_from_reader(SAMPLE.as_bytes(), NumberFormat::Plain).unwrap();
        assert_eq!(tables.len(), 2);

        let men = tables
            .table(&TableKey::new(Gender::Hombre, Condition::NoInvalido))
            .unwrap();
        assert_eq!(men.lookup(61), Some(990.5));

        // Gaps in the file stay gaps in the table
        let women = tables
            .table(&TableKey::new(Gender::Mujer, Condition::NoInvalido))
            .unwrap();
        assert_eq!(women.lookup(61), None);
        assert_eq!(women.lookup(62), Some(985.0));
    }

    #[test]
    fn test_colombian_number_format() {
        assert_eq!(parse_survivors("96.534,12", NumberFormat::Colombian), Some(96534.12));
        assert_eq!(parse_survivors("1.000.000", NumberFormat::Colombian), Some(1_000_000.0));
        assert_eq!(parse_survivors("96534.12", NumberFormat::Plain), Some(96534.12));
        assert_eq!(parse_survivors("abc", NumberFormat::Plain), None);

        let data = "table,x,lx\nMujer_Invalido,70,\"45.120,5\"\n";
        let tables = load_tables_from_reader(data.as_bytes(), NumberFormat::Colombian).unwrap();
        let table = tables
            .table(&TableKey::new(Gender::Mujer, Condition::Invalido))
            .unwrap();
        assert_eq!(table.lookup(70), Some(45120.5));
    }

    #[test]
    fn test_load_errors() {
        let unknown = "table,x,lx\nNinguno,60,1000\n";
        assert!(matches!(
            load_tables_from_reader(unknown.as_bytes(), NumberFormat::Plain),
            Err(TableLoadError::UnknownKey(_))
        ));

        let bad_lx = "table,x,lx\nHombre_Invalido,60,mil\n";
        assert!(matches!(
            load_tables_from_reader(bad_lx.as_bytes(), NumberFormat::Plain),
            Err(TableLoadError::InvalidSurvivors { age: 60, .. })
        ));

        let duplicate = "table,x,lx\nHombre_Invalido,60,1000\nHombre_Invalido,60,999\n";
        match load_tables_from_reader(duplicate.as_bytes(), NumberFormat::Plain) {
            Err(TableLoadError::DuplicateAge { key, age }) => {
                assert_eq!(key, "Hombre_Invalido");
                assert_eq!(age, 60);
                let message = TableLoadError::DuplicateAge { key, age }.to_string();
                assert_eq!(message, "age 60 appears more than once in table Hombre_Invalido");
            }
            other => panic!("expected duplicate age error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file() {
        let result = load_tables("does/not/exist.csv", NumberFormat::Plain);
        assert!(matches!(result, Err(TableLoadError::Io { .. })));
    }
}
