//! Streaming RSS/Atom entry parser built on `quick-xml`.
//!
//! Only entries are read: RSS 0.9x/2.0 and RSS 1.0 `<item>` elements and Atom
//! `<entry>` elements. Channel metadata is skipped. The parser never fails; an
//! empty or broken payload produces a [`FeedDocument`] with whatever complete
//! entries were read before the damage, flagged as `malformed`.
//!
//! # Field Mapping
//!
//! | Field | Elements |
//! |-------|----------|
//! | `title` | `title` |
//! | `link` | `link` text, Atom `link[rel=alternate]@href`, permalink `guid` |
//! | `published` | `pubDate`, `published`, `issued`, `dcterms:issued` |
//! | `updated` | `updated`, `modified`, `dc:date`, `dcterms:modified` |
//! | `summary` | `description`, `summary`, else `content` / `content:encoded` |
//!
//! The first occurrence of each field inside an entry wins. An Atom `source`
//! element describes the feed an entry was copied from and is skipped whole.
//!
//! The reader is lenient: stray `&`, unescaped HTML inside a field and
//! mismatched end tags do not stop the parse.

use super::fetch::RawFeedPayload;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

const ENTRY_ELEMENTS: &[&str] = &["item", "entry"];

/// Timestamp layouts carrying an offset, tried after RFC 2822 and RFC 3339.
const OFFSET_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S %z",
    "%d %b %Y %H:%M:%S %z",
];

/// Layouts without an offset. These are read as UTC.
const NAIVE_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A parsed feed: its entries in document order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FeedDocument {
    pub entries: Vec<RawEntry>,
    /// Set when the payload was empty, not XML, or broke off mid-document.
    pub malformed: bool,
}

/// The optional text fields an entry may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryField {
    Title,
    Link,
    Published,
    Updated,
    Summary,
}

impl EntryField {
    /// Value to use when an entry lacks the field.
    pub const fn default_value(self) -> &'static str {
        match self {
            Self::Title | Self::Link | Self::Published | Self::Updated | Self::Summary => "",
        }
    }
}

/// A UTC calendar time broken into `(year, month, day, hour, minute, second)`.
///
/// Components are not validated on construction; [`TimeTuple::to_iso8601`]
/// is where an impossible date is detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeTuple {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl TimeTuple {
    pub const fn new(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Render as `YYYY-MM-DDTHH:MM:SS`, or `None` if the components do not
    /// name a real instant.
    pub fn to_iso8601(&self) -> Option<String> {
        let datetime = NaiveDate::from_ymd_opt(self.year, self.month, self.day)?
            .and_hms_opt(self.hour, self.minute, self.second)?;
        Some(datetime.format("%Y-%m-%dT%H:%M:%S").to_string())
    }
}

impl From<NaiveDateTime> for TimeTuple {
    fn from(datetime: NaiveDateTime) -> Self {
        Self::new(
            datetime.year(),
            datetime.month(),
            datetime.day(),
            datetime.hour(),
            datetime.minute(),
            datetime.second(),
        )
    }
}

/// One raw feed entry before normalization.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    pub published: Option<String>,
    pub updated: Option<String>,
    pub summary: Option<String>,
    /// Structured form of `published`, when its text could be read as a date.
    pub published_parsed: Option<TimeTuple>,
}

impl RawEntry {
    pub fn get(&self, field: EntryField) -> Option<&str> {
        match field {
            EntryField::Title => self.title.as_deref(),
            EntryField::Link => self.link.as_deref(),
            EntryField::Published => self.published.as_deref(),
            EntryField::Updated => self.updated.as_deref(),
            EntryField::Summary => self.summary.as_deref(),
        }
    }

    pub fn get_or_default(&self, field: EntryField) -> &str {
        self.get(field).unwrap_or(field.default_value())
    }
}

/// Parse a feed payload into its entries. Never fails.
pub fn parse(payload: &RawFeedPayload) -> FeedDocument {
    let mut document = FeedDocument::default();
    if payload.as_bytes().trim_ascii().is_empty() {
        document.malformed = true;
        return document;
    }

    let mut reader = Reader::from_reader(payload.as_bytes());
    let config = reader.config_mut();
    config.allow_dangling_amp = true;
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    let mut buf = Vec::new();
    let mut entry: Option<EntryBuilder> = None;
    let mut saw_element = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                saw_element = true;
                let name = element_name(&reader, &e);
                if ENTRY_ELEMENTS.contains(&name.as_str()) {
                    entry.get_or_insert_with(EntryBuilder::default);
                } else if let Some(builder) = entry.as_mut() {
                    builder.open(&name, &Attrs::read(&reader, &e));
                }
            }
            Ok(Event::Empty(e)) => {
                saw_element = true;
                if let Some(builder) = entry.as_mut() {
                    builder.empty(&element_name(&reader, &e), &Attrs::read(&reader, &e));
                }
            }
            Ok(Event::End(e)) => {
                let name = decode(&reader, e.name().as_ref()).to_ascii_lowercase();
                if ENTRY_ELEMENTS.contains(&name.as_str()) {
                    if let Some(builder) = entry.take() {
                        document.entries.push(builder.finish());
                    }
                } else if let Some(builder) = entry.as_mut() {
                    builder.close(&name);
                }
            }
            Ok(Event::Text(e)) => {
                if let Some(builder) = entry.as_mut() {
                    builder.push_text(&resolve_entities(&decode(&reader, &e)));
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(builder) = entry.as_mut() {
                    builder.push_text(&decode(&reader, &e));
                }
            }
            Ok(Event::GeneralRef(e)) => {
                if let Some(builder) = entry.as_mut() {
                    builder.push_text(&resolve_reference(&decode(&reader, &e)));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(_) => {
                document.malformed = true;
                break;
            }
        }
        buf.clear();
    }

    if entry.is_some() || !saw_element {
        document.malformed = true;
    }
    document
}

/// Read a feed date as a UTC [`TimeTuple`].
///
/// Accepts RFC 2822 (RSS), RFC 3339 (Atom) and a few ISO-like layouts.
/// Text without an offset is taken to be UTC already.
pub fn parse_timestamp(text: &str) -> Option<TimeTuple> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let with_offset = DateTime::parse_from_rfc2822(text)
        .or_else(|_| DateTime::parse_from_rfc3339(text))
        .ok()
        .or_else(|| {
            // Feeds get the weekday wrong often enough that it is not trusted.
            without_weekday(text).and_then(|rest| DateTime::parse_from_rfc2822(rest).ok())
        })
        .or_else(|| {
            OFFSET_LAYOUTS
                .iter()
                .find_map(|layout| DateTime::parse_from_str(text, layout).ok())
        });
    if let Some(datetime) = with_offset {
        return Some(datetime.naive_utc().into());
    }

    NAIVE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(text, layout).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(TimeTuple::from)
}

/// `"Mon, 15 Mar 2024 ..."` without its leading `"Mon, "`.
fn without_weekday(text: &str) -> Option<&str> {
    let (day, rest) = text.split_once(',')?;
    let day = day.trim();
    (!day.is_empty() && day.chars().all(|c| c.is_ascii_alphabetic())).then_some(rest.trim_start())
}

fn decode(reader: &Reader<&[u8]>, bytes: &[u8]) -> String {
    reader
        .decoder()
        .decode(bytes)
        .map(|text| text.into_owned())
        .unwrap_or_else(|_| String::from_utf8_lossy(bytes).into_owned())
}

fn element_name(reader: &Reader<&[u8]>, element: &BytesStart) -> String {
    decode(reader, element.name().as_ref()).to_ascii_lowercase()
}

/// Resolve one `&name;` reference. Unknown names are kept verbatim so HTML
/// entities survive until markup extraction.
fn resolve_reference(name: &str) -> String {
    let resolved = match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => name
            .strip_prefix('#')
            .and_then(|code| match code.strip_prefix(|c| c == 'x' || c == 'X') {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => code.parse().ok(),
            })
            .and_then(char::from_u32),
    };
    resolved.map_or_else(|| format!("&{name};"), String::from)
}

fn resolve_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find(';') {
            Some(end)
                if end > 0 && !after[..end].contains(|c: char| c.is_whitespace() || c == '&') =>
            {
                out.push_str(&resolve_reference(&after[..end]));
                rest = &after[end + 1..];
            }
            _ => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[derive(Debug, Default)]
struct Attrs {
    href: Option<String>,
    rel: Option<String>,
    is_perma_link: Option<String>,
}

impl Attrs {
    fn read(reader: &Reader<&[u8]>, element: &BytesStart) -> Self {
        let get = |key: &str| {
            element
                .try_get_attribute(key)
                .ok()
                .flatten()
                .map(|attr| resolve_entities(&decode(reader, &attr.value)))
        };
        Self {
            href: get("href"),
            rel: get("rel"),
            is_perma_link: get("isPermaLink"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Target {
    Title,
    Link,
    Guid { perma_link: bool },
    Published,
    Updated,
    Summary,
    Content,
    Source,
}

impl Target {
    fn for_element(name: &str, attrs: &Attrs) -> Option<Self> {
        let target = match name {
            "title" => Self::Title,
            "link" => Self::Link,
            "guid" => Self::Guid {
                perma_link: attrs
                    .is_perma_link
                    .as_deref()
                    .is_none_or(|value| !value.trim().eq_ignore_ascii_case("false")),
            },
            "pubdate" | "published" | "issued" | "dcterms:issued" => Self::Published,
            "updated" | "modified" | "dc:date" | "dcterms:modified" => Self::Updated,
            "description" | "summary" => Self::Summary,
            "content" | "content:encoded" => Self::Content,
            "source" => Self::Source,
            _ => return None,
        };
        Some(target)
    }
}

#[derive(Debug)]
struct Capture {
    target: Target,
    element: String,
    /// Elements with the captured element's name opened inside it and not
    /// yet closed. Other nested tags may be unbalanced and are not counted.
    depth: usize,
    text: String,
}

#[derive(Debug, Default)]
struct EntryBuilder {
    entry: RawEntry,
    content: Option<String>,
    guid_link: Option<String>,
    capture: Option<Capture>,
}

impl EntryBuilder {
    fn open(&mut self, name: &str, attrs: &Attrs) {
        if let Some(capture) = self.capture.as_mut() {
            if capture.element == name {
                capture.depth += 1;
            }
            return;
        }
        if name == "link" && attrs.href.is_some() {
            self.atom_link(attrs);
            return;
        }
        self.capture = Target::for_element(name, attrs).map(|target| Capture {
            target,
            element: name.to_string(),
            depth: 0,
            text: String::new(),
        });
    }

    fn empty(&mut self, name: &str, attrs: &Attrs) {
        if self.capture.is_none() && name == "link" {
            self.atom_link(attrs);
        }
    }

    fn atom_link(&mut self, attrs: &Attrs) {
        let alternate = attrs
            .rel
            .as_deref()
            .is_none_or(|rel| rel.eq_ignore_ascii_case("alternate"));
        if alternate && self.entry.link.is_none() {
            self.entry.link.clone_from(&attrs.href);
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some(capture) = self.capture.as_mut() {
            capture.text.push_str(text);
        }
    }

    fn close(&mut self, name: &str) {
        let Some(capture) = self.capture.as_mut() else {
            return;
        };
        if capture.element != name {
            return;
        }
        if capture.depth > 0 {
            capture.depth -= 1;
            return;
        }
        if let Some(capture) = self.capture.take() {
            self.store(capture.target, capture.text);
        }
    }

    fn store(&mut self, target: Target, text: String) {
        let slot = match target {
            Target::Title => &mut self.entry.title,
            Target::Link => &mut self.entry.link,
            Target::Guid { perma_link: true } => &mut self.guid_link,
            Target::Guid { perma_link: false } => return,
            Target::Published => &mut self.entry.published,
            Target::Updated => &mut self.entry.updated,
            Target::Summary => &mut self.entry.summary,
            Target::Content => &mut self.content,
            Target::Source => return,
        };
        if slot.is_none() {
            *slot = Some(text);
        }
    }

    fn finish(mut self) -> RawEntry {
        // A field left open when its entry ends still counts.
        if let Some(capture) = self.capture.take() {
            self.store(capture.target, capture.text);
        }
        if self.entry.link.is_none() {
            self.entry.link = self.guid_link;
        }
        if self.entry.summary.is_none() {
            self.entry.summary = self.content;
        }
        self.entry.published_parsed = self.entry.published.as_deref().and_then(parse_timestamp);
        self.entry
    }
}
