use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::MarinaRecord;
use crate::error::OutputError;

pub const RECORD_COLUMNS: [&str; 6] = [
    "city",
    "marina_number",
    "latitude",
    "longitude",
    "water_capacity",
    "land_capacity",
];

pub const ENRICHED_COLUMNS: [&str; 3] = [
    "nearby_grocery_stores",
    "nearby_cultural_attractions",
    "nearby_hotels",
];

const COUNT_COLUMNS: [&str; 2] = ["city", "marina_count"];

// Field order must match RECORD_COLUMNS / ENRICHED_COLUMNS
#[derive(Serialize)]
struct Row<'a> {
    city: &'a str,
    marina_number: usize,
    latitude: Option<f64>,
    longitude: Option<f64>,
    water_capacity: Option<&'a str>,
    land_capacity: Option<&'a str>,
}

#[derive(Serialize)]
struct EnrichedRow<'a> {
    city: &'a str,
    marina_number: usize,
    latitude: Option<f64>,
    longitude: Option<f64>,
    water_capacity: Option<&'a str>,
    land_capacity: Option<&'a str>,
    nearby_grocery_stores: Option<u32>,
    nearby_cultural_attractions: Option<u32>,
    nearby_hotels: Option<u32>,
}

impl<'a> From<&'a MarinaRecord> for Row<'a> {
    fn from(record: &'a MarinaRecord) -> Self {
        Self {
            city: &record.city,
            marina_number: record.marina_number,
            latitude: record.latitude(),
            longitude: record.longitude(),
            water_capacity: record.water_capacity.as_deref(),
            land_capacity: record.land_capacity.as_deref(),
        }
    }
}

impl<'a> From<&'a MarinaRecord> for EnrichedRow<'a> {
    fn from(record: &'a MarinaRecord) -> Self {
        let amenities = record.amenities.unwrap_or_default();
        Self {
            city: &record.city,
            marina_number: record.marina_number,
            latitude: record.latitude(),
            longitude: record.longitude(),
            water_capacity: record.water_capacity.as_deref(),
            land_capacity: record.land_capacity.as_deref(),
            nearby_grocery_stores: amenities.grocery,
            nearby_cultural_attractions: amenities.culture,
            nearby_hotels: amenities.hotel,
        }
    }
}

fn writer<W: Write>(inner: W) -> ::csv::Writer<W> {
    // Header is written explicitly so an empty table still gets one
    ::csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(inner)
}

/// Serialize records to any writer. `None` values become empty fields.
pub fn write_records_to<W: Write>(
    inner: W,
    records: &[MarinaRecord],
    enriched: bool,
) -> Result<(), OutputError> {
    let mut wtr = writer(inner);

    if enriched {
        wtr.write_record(RECORD_COLUMNS.iter().chain(ENRICHED_COLUMNS.iter()))?;
        for record in records {
            wtr.serialize(EnrichedRow::from(record))?;
        }
    } else {
        wtr.write_record(RECORD_COLUMNS)?;
        for record in records {
            wtr.serialize(Row::from(record))?;
        }
    }

    wtr.flush()?;
    Ok(())
}

/// Write the detailed table, replacing any existing file at `path`.
pub fn write_records(path: &Path, records: &[MarinaRecord], enriched: bool) -> Result<(), OutputError> {
    let file = File::create(path)?;
    write_records_to(file, records, enriched)
}

/// Write the single-row `city,marina_count` summary, replacing any existing file.
pub fn write_count(path: &Path, city: &str, count: usize) -> Result<(), OutputError> {
    let mut wtr = writer(File::create(path)?);
    wtr.write_record(COUNT_COLUMNS)?;
    wtr.serialize((city, count))?;
    wtr.flush()?;
    Ok(())
}
