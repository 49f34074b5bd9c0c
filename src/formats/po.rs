//! Support for the gettext `.po` text format.
//!
//! Parsing is a line-oriented state machine over the entry under construction.
//! Writing renders entries back with one blank line between them, keeping only the
//! last entry for each source key.

use std::collections::HashMap;
use std::fmt::Display;
use std::fs::File;
use std::io::{BufRead, Read};
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, trace};

use crate::{
    error::{Error, ParseError},
    traits::{Parser, Writer},
    types::{CatalogHeader, Entry, Field, Source, Target},
};

lazy_static! {
    static ref DIRECTIVE_REGEX: Regex = Regex::new(r"^\s*([a-z][a-z0-9_\[\]]*)(.*)$").unwrap();
    static ref QUOTED_REGEX: Regex = Regex::new(r#"^['"](.*)['"]$"#).unwrap();
}

/// An in-memory `.po` catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoFile {
    /// Complete entries in file order. Duplicated source keys are kept here and
    /// only collapsed when writing.
    pub entries: Vec<Entry>,
}

impl PoFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing set of entries, e.g. ones decoded from a `.mo` file.
    pub fn with_entries(entries: Vec<Entry>) -> Self {
        PoFile { entries }
    }

    /// Parses a whole catalog.
    ///
    /// ```rust
    /// use pomocodec::formats::PoFile;
    /// let po = PoFile::parse("msgid \"xxx\"\nmsgstr \"yyy\"").unwrap();
    /// assert_eq!(po.entries.len(), 1);
    /// assert_eq!(po.to_text(), "msgid \"xxx\"\nmsgstr \"yyy\"");
    /// ```
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut po = PoFile::new();
        po.add_entries_from_text(text)?;
        Ok(po)
    }

    /// Parses `text` and appends its entries. On error nothing is appended.
    pub fn add_entries_from_text(&mut self, text: &str) -> Result<&[Entry], ParseError> {
        let mut parser = TextParser::new();
        for (index, line) in text.lines().enumerate() {
            parser.feed(index + 1, line)?;
        }
        let parsed = parser.finish();
        debug!("parsed {} entries from text catalog", parsed.len());
        self.entries.extend(parsed);
        Ok(&self.entries)
    }

    /// Header values from the metadata entry, or defaults if there is none.
    pub fn header(&self) -> CatalogHeader {
        CatalogHeader::from_entries(&self.entries)
    }

    /// Renders the catalog as `.po` text without a trailing newline.
    pub fn to_text(&self) -> String {
        unique_entries(&self.entries)
            .into_iter()
            .filter_map(render_entry)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl Display for PoFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

impl Parser for PoFile {
    fn from_reader<R: BufRead>(mut reader: R) -> Result<Self, Error> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Ok(PoFile::parse(&text)?)
    }

    /// Override default file reading to strip a byte order mark (UTF-8 or UTF-16).
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let file = File::open(path).map_err(Error::Io)?;
        let mut decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
            .bom_override(true)
            .strip_bom(true)
            .build(file);

        let mut decoded = String::new();
        decoder.read_to_string(&mut decoded).map_err(Error::Io)?;

        Ok(PoFile::parse(&decoded)?)
    }
}

impl Writer for PoFile {
    fn to_writer<W: std::io::Write>(&self, mut writer: W) -> Result<(), Error> {
        writer.write_all(self.to_text().as_bytes())?;
        writer.flush().map_err(Error::Io)
    }
}

/// Keeps the last entry for every source key, at the position of that last occurrence.
pub fn unique_entries(entries: &[Entry]) -> Vec<&Entry> {
    let last_index: HashMap<&Option<Source>, usize> = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| (&entry.source, index))
        .collect();

    entries
        .iter()
        .enumerate()
        .filter(|(index, entry)| last_index.get(&entry.source) == Some(index))
        .map(|(_, entry)| entry)
        .collect()
}

/// The directives the parser understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Directive {
    Msgid,
    MsgidPlural,
    Msgstr,
    MsgstrIndex(usize),
}

/// Highest `msgstr[N]` index accepted; larger ones would only allocate empty slots.
const MAX_PLURAL_INDEX: usize = u16::MAX as usize;

impl Directive {
    fn from_name(name: &str, line: usize) -> Result<Self, ParseError> {
        let unknown = || ParseError::UnknownDirective {
            line,
            directive: name.to_string(),
        };
        match name {
            "msgid" => Ok(Directive::Msgid),
            "msgid_plural" => Ok(Directive::MsgidPlural),
            "msgstr" => Ok(Directive::Msgstr),
            _ => {
                let index = name
                    .strip_prefix("msgstr[")
                    .and_then(|rest| rest.strip_suffix(']'))
                    .filter(|index| {
                        !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit())
                    })
                    .ok_or_else(unknown)?;
                match index.parse::<usize>() {
                    Ok(value) if value <= MAX_PLURAL_INDEX => Ok(Directive::MsgstrIndex(value)),
                    _ => Err(ParseError::PluralIndexOutOfRange {
                        line,
                        index: index.to_string(),
                        max: MAX_PLURAL_INDEX,
                    }),
                }
            }
        }
    }

    fn field(self) -> Field {
        match self {
            Directive::Msgid => Field::Source,
            Directive::MsgidPlural => Field::SourcePlural,
            Directive::Msgstr => Field::Target,
            Directive::MsgstrIndex(index) => Field::TargetIndex(index),
        }
    }
}

/// How a single input line is interpreted. Checked in declaration order.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Blank,
    Comment(&'a str),
    Directive { name: &'a str, argument: &'a str },
    Literal(&'a str),
}

fn classify(line: &str) -> Line<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Line::Blank;
    }
    if let Some(comment) = trimmed.strip_prefix('#') {
        return Line::Comment(comment);
    }
    match DIRECTIVE_REGEX.captures(line) {
        Some(caps) => Line::Directive {
            name: caps.get(1).map_or("", |m| m.as_str()),
            argument: caps.get(2).map_or("", |m| m.as_str()),
        },
        None => Line::Literal(line),
    }
}

/// Extracts a quoted literal, `None` for an empty argument.
fn parse_literal(text: &str, line: usize) -> Result<Option<String>, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match QUOTED_REGEX.captures(trimmed) {
        Some(caps) => Ok(Some(caps[1].replace("\\n", "\n"))),
        None => Err(ParseError::NotStringFormat {
            line,
            text: trimmed.to_string(),
        }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Fresh entry, nothing read yet.
    AwaitingDirective,
    /// Fresh entry with comment lines but no directive yet.
    CollectingComment,
    /// The last directive targeted this slot; bare literals continue it.
    AccumulatingValue(Field),
}

struct TextParser {
    entries: Vec<Entry>,
    entry: Entry,
    state: State,
}

impl TextParser {
    fn new() -> Self {
        TextParser {
            entries: Vec::new(),
            entry: Entry::new(),
            state: State::AwaitingDirective,
        }
    }

    fn feed(&mut self, line_number: usize, line: &str) -> Result<(), ParseError> {
        match classify(line) {
            Line::Blank => {}
            Line::Comment(text) => {
                if self.entry.is_complete() {
                    self.start_new_entry();
                }
                if self.state == State::AwaitingDirective {
                    self.state = State::CollectingComment;
                }
                self.entry.add_text(Field::Comment, &format!("{}\n", text));
            }
            Line::Directive { name, argument } => {
                let directive = Directive::from_name(name, line_number)?;
                if directive == Directive::Msgid && self.entry.is_complete() {
                    self.start_new_entry();
                }
                let field = directive.field();
                self.state = State::AccumulatingValue(field);
                self.add_literal(field, argument, line_number)?;
            }
            Line::Literal(text) => match self.state {
                State::AccumulatingValue(field) => self.add_literal(field, text, line_number)?,
                State::AwaitingDirective | State::CollectingComment => {
                    return Err(ParseError::OrphanString { line: line_number });
                }
            },
        }
        Ok(())
    }

    fn add_literal(&mut self, field: Field, text: &str, line: usize) -> Result<(), ParseError> {
        if let Some(value) = parse_literal(text, line)? {
            self.entry.add_text(field, &value);
        }
        Ok(())
    }

    fn start_new_entry(&mut self) {
        let mut entry = std::mem::take(&mut self.entry);
        if entry.is_complete() {
            entry.trim_values();
            self.entries.push(entry);
        } else if entry.source.is_some() || entry.target.is_some() || entry.comment.is_some() {
            trace!("discarding incomplete entry {}", entry);
        }
        self.state = State::AwaitingDirective;
    }

    fn finish(mut self) -> Vec<Entry> {
        self.start_new_entry();
        self.entries
    }
}

fn render_entry(entry: &Entry) -> Option<String> {
    let (Some(source), Some(target)) = (&entry.source, &entry.target) else {
        trace!("skipping incomplete entry {}", entry);
        return None;
    };

    let mut lines = Vec::new();

    if let Some(comment) = &entry.comment {
        let mut comment_lines = comment.lines().collect::<Vec<_>>();
        while comment_lines.last().is_some_and(|line| line.is_empty()) {
            comment_lines.pop();
        }
        lines.extend(comment_lines.into_iter().map(|line| format!("#{}", line)));
    }

    match source {
        Source::Singular(value) => lines.push(format!("msgid {}", quote(value))),
        Source::Plural { singular, plural } => {
            lines.push(format!("msgid {}", quote(singular)));
            lines.push(format!("msgid_plural {}", quote(plural)));
        }
    }

    match target {
        Target::Singular(value) => lines.push(format!("msgstr {}", quote(value))),
        Target::Plural(forms) => {
            for (index, form) in forms.iter().enumerate() {
                if let Some(value) = form {
                    lines.push(format!("msgstr[{}] {}", index, quote(value)));
                }
            }
        }
    }

    Some(lines.join("\n"))
}

/// One line becomes a single literal; more lines become `""` plus one
/// continuation literal per line.
fn quote(text: &str) -> String {
    let lines = text.split_inclusive('\n').collect::<Vec<_>>();
    if let [line] = lines.as_slice() {
        return match line.strip_suffix('\n') {
            Some(line) => format!("\"{}\\n\"", line),
            None => format!("\"{}\"", line),
        };
    }

    let mut quoted = String::from("\"\"");
    for line in lines {
        quoted.push_str(&format!("\n\"{}\\n\"", line.trim_end()));
    }
    quoted
}
