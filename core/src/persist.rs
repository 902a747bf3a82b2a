use crate::{Record, COLUMNS};
use anyhow::{Context, Result};
use std::fs::{create_dir_all, File};
use std::io::{Read, Write};
use std::path::Path;

/// Read every row of a dataset file. Columns are matched by header name,
/// so extra columns (such as a leftover index) are ignored.
pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("opening dataset {}", path.display()))?;
    read_records(f).with_context(|| format!("reading dataset {}", path.display()))
}

/// Like `load_dataset`, but a missing file is `None` instead of an error.
pub fn load_existing<P: AsRef<Path>>(path: P) -> Result<Option<Vec<Record>>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }
    load_dataset(path).map(Some)
}

/// Overwrite `path` with a header row followed by every record.
pub fn save_dataset<P: AsRef<Path>>(path: P, records: &[Record]) -> Result<()> {
    let path = path.as_ref();
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        create_dir_all(dir)?;
    }
    let f = File::create(path).with_context(|| format!("creating dataset {}", path.display()))?;
    write_records(f, records).with_context(|| format!("writing dataset {}", path.display()))
}

pub fn read_records<R: Read>(reader: R) -> Result<Vec<Record>> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    let mut out = Vec::new();
    for (row, rec) in rdr.deserialize::<Record>().enumerate() {
        out.push(rec.with_context(|| format!("row {}", row + 1))?);
    }
    Ok(out)
}

pub fn write_records<W: Write>(writer: W, records: &[Record]) -> Result<()> {
    // header is written by hand so an empty dataset still has one
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(COLUMNS)?;
    for rec in records {
        wtr.serialize(rec)?;
    }
    wtr.flush()?;
    Ok(())
}

/// `YYYY-MM-DD HH:MM:SS`; a trailing `+HH:MM` offset is accepted on read.
pub mod datetime {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::macros::format_description;
    use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

    pub fn format(dt: &PrimitiveDateTime) -> Result<String, time::error::Format> {
        dt.format(format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"))
    }

    pub fn parse(s: &str) -> Result<PrimitiveDateTime, time::error::Parse> {
        let s = s.trim();
        let naive = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
        let with_offset = format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]"
        );
        match PrimitiveDateTime::parse(s, naive) {
            Ok(dt) => Ok(dt),
            Err(_) => {
                let dt = OffsetDateTime::parse(s, with_offset)?.to_offset(UtcOffset::UTC);
                Ok(PrimitiveDateTime::new(dt.date(), dt.time()))
            }
        }
    }

    pub fn serialize<S: Serializer>(dt: &PrimitiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        let text = format(dt).map_err(serde::ser::Error::custom)?;
        s.serialize_str(&text)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<PrimitiveDateTime, D::Error> {
        let s = String::deserialize(d)?;
        parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Python-style list text, e.g. `['vaksin', 'covid19']`; `None` is an empty field.
pub mod hashtags {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn format(tags: &[String]) -> String {
        let items: Vec<String> = tags.iter().map(|t| quote(t)).collect();
        format!("[{}]", items.join(", "))
    }

    /// Single quotes unless the text holds a `'` and no `"`; backslashes and
    /// the chosen quote are escaped with `\`.
    fn quote(t: &str) -> String {
        let q = if t.contains('\'') && !t.contains('"') { '"' } else { '\'' };
        let mut out = String::with_capacity(t.len() + 2);
        out.push(q);
        for c in t.chars() {
            if c == '\\' || c == q {
                out.push('\\');
            }
            out.push(c);
        }
        out.push(q);
        out
    }

    pub fn parse(s: &str) -> Result<Vec<String>, String> {
        let inner = s
            .trim()
            .strip_prefix('[')
            .and_then(|r| r.strip_suffix(']'))
            .ok_or_else(|| format!("not a list: {s:?}"))?;
        let mut out = Vec::new();
        let mut chars = inner.chars().peekable();
        loop {
            while chars.peek().is_some_and(|c| c.is_whitespace() || *c == ',') {
                chars.next();
            }
            let quote = match chars.next() {
                None => break,
                Some(q @ ('\'' | '"')) => q,
                Some(c) => return Err(format!("unexpected {c:?} in {s:?}")),
            };
            let mut item = String::new();
            loop {
                match chars.next() {
                    Some(c) if c == quote => break,
                    Some('\\') => item.extend(chars.next()),
                    Some(c) => item.push(c),
                    None => return Err(format!("unterminated item in {s:?}")),
                }
            }
            out.push(item);
        }
        Ok(out)
    }

    pub fn serialize<S: Serializer>(tags: &Option<Vec<String>>, s: S) -> Result<S::Ok, S::Error> {
        match tags {
            Some(t) if !t.is_empty() => s.serialize_str(&format(t)),
            _ => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<String>>, D::Error> {
        match Option::<String>::deserialize(d)? {
            Some(s) if !s.trim().is_empty() => {
                let tags = parse(&s).map_err(serde::de::Error::custom)?;
                Ok(if tags.is_empty() { None } else { Some(tags) })
            }
            _ => Ok(None),
        }
    }
}

/// `True` / `False`, with lowercase and `1`/`0` accepted on read.
pub mod pybool {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(b: &bool, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(if *b { "True" } else { "False" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        let s = String::deserialize(d)?;
        match s.trim() {
            "True" | "true" | "1" => Ok(true),
            "False" | "false" | "0" => Ok(false),
            other => Err(serde::de::Error::custom(format!("invalid boolean {other:?}"))),
        }
    }
}

/// Optional status id. Older files may hold it as a float (`1.35e+18`,
/// `123.0`); those are truncated to an integer.
pub mod status_id {
    use crate::StatusId;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(s: &str) -> Result<StatusId, String> {
        let s = s.trim();
        if let Ok(id) = s.parse::<StatusId>() {
            return Ok(id);
        }
        match s.parse::<f64>() {
            Ok(f) if f.is_finite() && f >= 0.0 && f <= StatusId::MAX as f64 => Ok(f as StatusId),
            _ => Err(format!("invalid status id {s:?}")),
        }
    }

    pub fn serialize<S: Serializer>(id: &Option<StatusId>, s: S) -> Result<S::Ok, S::Error> {
        match id {
            Some(id) => s.serialize_u64(*id),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<StatusId>, D::Error> {
        match Option::<String>::deserialize(d)? {
            Some(s) if !s.trim().is_empty() => parse(&s).map(Some).map_err(serde::de::Error::custom),
            _ => Ok(None),
        }
    }
}
