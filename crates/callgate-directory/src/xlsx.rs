//! Minimal reader for the cell values of one worksheet in an `.xlsx` file.
//!
//! An `.xlsx` workbook is a zip archive of XML parts. The reader resolves a
//! sheet by its position in `xl/workbook.xml` through the workbook
//! relationships, loads the shared string table, and returns the sheet as a
//! grid of optional cell strings. Formatting, formulas and styles are
//! ignored; a formula cell yields its cached value.

use crate::error::DirectoryError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{Read, Seek};
use zip::result::ZipError;
use zip::ZipArchive;

const WORKBOOK_PART: &str = "xl/workbook.xml";
const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";
const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";

/// One worksheet row: cell values indexed by column, `None` for blank cells.
pub type Row = Vec<Option<String>>;

/// Reads every row of the sheet at `sheet_index` (0-based, workbook order).
///
/// Rows are returned in document order; rows the file omits entirely are
/// not materialized.
pub fn read_sheet<R: Read + Seek>(reader: R, sheet_index: usize) -> Result<Vec<Row>, DirectoryError> {
    let mut archive = ZipArchive::new(reader)?;

    let sheet_part = resolve_sheet_part(&mut archive, sheet_index)?;
    let shared_strings = match read_part(&mut archive, SHARED_STRINGS_PART)? {
        Some(xml) => parse_shared_strings(&xml)?,
        None => Vec::new(),
    };
    let sheet_xml = read_part(&mut archive, &sheet_part)?
        .ok_or(DirectoryError::Archive(ZipError::FileNotFound))?;

    parse_sheet(&sheet_part, &sheet_xml, &shared_strings)
}

fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<String>, DirectoryError> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(Some(contents))
}

/// Maps a sheet position to the archive path of its worksheet part.
fn resolve_sheet_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    sheet_index: usize,
) -> Result<String, DirectoryError> {
    let workbook = read_part(archive, WORKBOOK_PART)?;
    let relationships = match read_part(archive, WORKBOOK_RELS_PART)? {
        Some(xml) => parse_relationships(&xml)?,
        None => HashMap::new(),
    };

    let Some(workbook) = workbook else {
        // Not every writer emits a workbook part; fall back to the
        // conventional worksheet naming.
        return Ok(format!("xl/worksheets/sheet{}.xml", sheet_index + 1));
    };

    let sheet_ids = parse_sheet_ids(&workbook)?;
    let count = sheet_ids.len();
    let relationship_id = sheet_ids
        .into_iter()
        .nth(sheet_index)
        .ok_or(DirectoryError::SheetOutOfRange {
            index: sheet_index,
            count,
        })?;

    Ok(match relationships.get(&relationship_id) {
        Some(target) => match target.strip_prefix('/') {
            Some(absolute) => absolute.to_string(),
            None => format!("xl/{}", target),
        },
        None => format!("xl/worksheets/sheet{}.xml", sheet_index + 1),
    })
}

fn attribute(
    part: &str,
    element: &BytesStart<'_>,
    local_name: &[u8],
) -> Result<Option<String>, DirectoryError> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| DirectoryError::xml(part, e))?;
        if attr.key.local_name().as_ref() == local_name {
            let value = attr
                .unescape_value()
                .map_err(|e| DirectoryError::xml(part, e))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Relationship ids of the `<sheet>` entries, in workbook order.
fn parse_sheet_ids(xml: &str) -> Result<Vec<String>, DirectoryError> {
    let mut reader = Reader::from_str(xml);
    let mut ids = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.local_name().as_ref() == b"sheet" => {
                if let Some(id) = attribute(WORKBOOK_PART, &e, b"id")? {
                    ids.push(id);
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(DirectoryError::xml(WORKBOOK_PART, e)),
        }
    }
    Ok(ids)
}

fn parse_relationships(xml: &str) -> Result<HashMap<String, String>, DirectoryError> {
    let mut reader = Reader::from_str(xml);
    let mut targets = HashMap::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let id = attribute(WORKBOOK_RELS_PART, &e, b"Id")?;
                let target = attribute(WORKBOOK_RELS_PART, &e, b"Target")?;
                if let (Some(id), Some(target)) = (id, target) {
                    targets.insert(id, target);
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(DirectoryError::xml(WORKBOOK_RELS_PART, e)),
        }
    }
    Ok(targets)
}

/// Parses `xl/sharedStrings.xml` into the string table.
///
/// Rich-text runs are concatenated; phonetic runs (`<rPh>`) are skipped.
fn parse_shared_strings(xml: &str) -> Result<Vec<String>, DirectoryError> {
    let mut reader = Reader::from_str(xml);
    let mut strings = Vec::new();
    let mut current: Option<String> = None;
    let mut in_text = false;
    let mut phonetic_depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"si" => current = Some(String::new()),
                b"rPh" => phonetic_depth += 1,
                b"t" => in_text = phonetic_depth == 0,
                _ => {}
            },
            Ok(Event::Empty(e)) if e.local_name().as_ref() == b"si" => {
                strings.push(String::new());
            }
            Ok(Event::Text(t)) if in_text => {
                let text = t
                    .unescape()
                    .map_err(|e| DirectoryError::xml(SHARED_STRINGS_PART, e))?;
                if let Some(current) = current.as_mut() {
                    current.push_str(&text);
                }
            }
            Ok(Event::CData(t)) if in_text => {
                if let Some(current) = current.as_mut() {
                    current.push_str(&String::from_utf8_lossy(&t));
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"si" => strings.push(current.take().unwrap_or_default()),
                b"rPh" => phonetic_depth = phonetic_depth.saturating_sub(1),
                b"t" => in_text = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(DirectoryError::xml(SHARED_STRINGS_PART, e)),
        }
    }
    Ok(strings)
}

/// Highest column index a worksheet can hold (column `XFD`).
const MAX_COLUMN: usize = 16_383;

/// Converts a cell reference such as `AB12` to a 0-based column index.
///
/// Returns `None` for references without a column part or past `XFD`.
fn column_index(reference: &str) -> Option<usize> {
    let mut index = 0usize;
    let mut seen = false;
    for ch in reference.chars().take_while(|c| c.is_ascii_alphabetic()) {
        let digit = ch.to_ascii_uppercase() as usize - 'A' as usize + 1;
        index = index.checked_mul(26)?.checked_add(digit)?;
        if index > MAX_COLUMN + 1 {
            return None;
        }
        seen = true;
    }
    seen.then(|| index - 1)
}

/// Renders a numeric cell. Integral values drop the fractional part and any
/// exponent, so a phone number stored as a number reads back as digits.
fn format_number(raw: &str) -> String {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 => {
            format!("{:.0}", value)
        }
        _ => raw.to_string(),
    }
}

#[derive(Default)]
struct PendingCell {
    column: usize,
    kind: Option<String>,
    value: String,
    inline: String,
}

impl PendingCell {
    fn resolve(self, shared_strings: &[String]) -> Option<String> {
        let value = match self.kind.as_deref() {
            Some("s") => self
                .value
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|i| shared_strings.get(i).cloned())?,
            Some("inlineStr") => self.inline,
            Some("b") => match self.value.trim() {
                "1" => "TRUE".to_string(),
                _ => "FALSE".to_string(),
            },
            Some("str") | Some("e") => self.value,
            _ => format_number(self.value.trim()),
        };
        let value = value.trim();
        (!value.is_empty()).then(|| value.to_string())
    }
}

fn parse_sheet(part: &str, xml: &str, shared_strings: &[String]) -> Result<Vec<Row>, DirectoryError> {
    let mut reader = Reader::from_str(xml);
    let mut rows: Vec<Row> = Vec::new();
    let mut row: Option<Row> = None;
    let mut cell: Option<PendingCell> = None;
    let mut next_column = 0usize;
    let mut in_value = false;
    let mut in_inline_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"row" => {
                    row = Some(Vec::new());
                    next_column = 0;
                }
                b"c" => {
                    let column = attribute(part, &e, b"r")?
                        .and_then(|r| column_index(&r))
                        .unwrap_or(next_column);
                    cell = Some(PendingCell {
                        column,
                        kind: attribute(part, &e, b"t")?,
                        ..PendingCell::default()
                    });
                }
                b"v" => in_value = true,
                b"t" => in_inline_text = cell.is_some(),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"row" => rows.push(Vec::new()),
                b"c" => {
                    next_column = attribute(part, &e, b"r")?
                        .and_then(|r| column_index(&r))
                        .unwrap_or(next_column)
                        + 1;
                }
                _ => {}
            },
            Ok(Event::Text(t)) if in_value || in_inline_text => {
                let text = t.unescape().map_err(|e| DirectoryError::xml(part, e))?;
                if let Some(cell) = cell.as_mut() {
                    if in_value {
                        cell.value.push_str(&text);
                    } else {
                        cell.inline.push_str(&text);
                    }
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"v" => in_value = false,
                b"t" => in_inline_text = false,
                b"c" => {
                    if let (Some(pending), Some(row)) = (cell.take(), row.as_mut()) {
                        let column = pending.column;
                        next_column = column + 1;
                        if let Some(value) = pending.resolve(shared_strings) {
                            if row.len() <= column {
                                row.resize(column + 1, None);
                            }
                            row[column] = Some(value);
                        }
                    }
                }
                b"row" => {
                    if let Some(row) = row.take() {
                        rows.push(row);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(DirectoryError::xml(part, e)),
        }
    }
    Ok(rows)
}
