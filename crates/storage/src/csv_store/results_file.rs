//! Append-only writer for the results file.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use tempo_core::model::CompletedResponse;

use crate::csv_store::OutputEncoding;
use crate::repository::StorageError;

/// Append one response, creating the file with a header row on first use.
///
/// The header comes from the response's own column list; later appends
/// never re-check it. If the question set changes after the file exists,
/// the columns diverge and the file has to be reset by hand.
pub(crate) fn append(
    path: &Path,
    encoding: OutputEncoding,
    response: &CompletedResponse,
) -> Result<(), StorageError> {
    let is_new = !path.exists();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    if is_new {
        writer.write_record(response.columns())?;
    }
    writer.write_record(response.values())?;
    let buffer = writer
        .into_inner()
        .map_err(|e| StorageError::Serialization(e.to_string()))?;

    let encoded = encode(&buffer, encoding)?;

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(&encoded)?;
    Ok(())
}

fn encode(buffer: &[u8], encoding: OutputEncoding) -> Result<Vec<u8>, StorageError> {
    match encoding {
        OutputEncoding::Utf8 => Ok(buffer.to_vec()),
        OutputEncoding::ShiftJis => {
            let text = std::str::from_utf8(buffer)
                .map_err(|e| StorageError::Serialization(e.to_string()))?;
            let (encoded, _, had_errors) = encoding_rs::SHIFT_JIS.encode(text);
            if had_errors {
                return Err(StorageError::Serialization(
                    "row contains text with no Shift-JIS representation".into(),
                ));
            }
            Ok(encoded.into_owned())
        }
    }
}
