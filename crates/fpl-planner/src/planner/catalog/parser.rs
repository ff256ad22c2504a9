use super::RawCandidateRecord;
use std::io::Read;

/// Reads a flat player table whose headers use the raw field names
/// (`id`, `web_name`, `element_type`, `team`, `now_cost`, ...). Unknown columns are ignored.
pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<RawCandidateRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for record in csv_reader.deserialize::<RawCandidateRecord>() {
        records.push(record?);
    }

    Ok(records)
}
