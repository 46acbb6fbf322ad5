//! CSV rendering of the index

use crate::error::ExportError;
use crate::HEADERS;
use shared_types::Row;

pub fn write_csv(rows: &[Row]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADERS)?;

    for row in rows {
        let page_number = row.page_number.to_string();
        writer.write_record([
            row.bate_number.as_str(),
            row.repair_order_number.as_str(),
            page_number.as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.to_string()))
}
