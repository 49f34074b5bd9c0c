//! Core, format-agnostic types for pomocodec.
//! The `.po` parser and the `.mo` decoder produce these; the `.po` writer consumes them.

use std::fmt::Display;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref FUZZY_REGEX: Regex = Regex::new(r"^,\s*fuzzy\s*$").unwrap();
    static ref CHARSET_REGEX: Regex =
        Regex::new(r"(?i)^Content-Type:.*?charset=([\w-]+)").unwrap();
    static ref PLURAL_FORMS_REGEX: Regex =
        Regex::new(r"^Plural-Forms:\s*nplurals\s*=\s*(\d*);\s*plural\s*=\s*([^;]*)").unwrap();
}

/// The untranslated side of an entry (`msgid`, plus `msgid_plural` for plurals).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Singular(String),
    Plural { singular: String, plural: String },
}

/// The translated side of an entry (`msgstr`, or `msgstr[N]` for plurals).
///
/// Plural slots that were never written stay `None`, which is not the same as `Some("")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    Singular(String),
    Plural(Vec<Option<String>>),
}

/// A slot of an [`Entry`] that text can be appended to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Source,
    SourcePlural,
    Target,
    TargetIndex(usize),
    Comment,
}

/// A single catalog entry.
///
/// Two entries are equal when their source and target are equal; the comment
/// is not part of the comparison.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Entry {
    #[serde(default)]
    pub source: Option<Source>,

    #[serde(default)]
    pub target: Option<Target>,

    /// Comment lines without their `#` marker, each terminated by `\n`.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub comment: Option<String>,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.target == other.target
    }
}

impl Eq for Entry {}

impl Entry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A complete singular entry.
    pub fn singular(source: impl Into<String>, target: impl Into<String>) -> Self {
        Entry {
            source: Some(Source::Singular(source.into())),
            target: Some(Target::Singular(target.into())),
            comment: None,
        }
    }

    /// A complete plural entry with every target slot populated.
    pub fn plural(
        singular: impl Into<String>,
        plural: impl Into<String>,
        targets: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Entry {
            source: Some(Source::Plural {
                singular: singular.into(),
                plural: plural.into(),
            }),
            target: Some(Target::Plural(
                targets.into_iter().map(|t| Some(t.into())).collect(),
            )),
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Appends `text` to the given slot, creating or reshaping it as needed.
    pub fn add_text(&mut self, field: Field, text: &str) {
        match field {
            Field::Source => match &mut self.source {
                None => self.source = Some(Source::Singular(text.to_string())),
                Some(Source::Singular(value)) => value.push_str(text),
                Some(Source::Plural { singular, .. }) => singular.push_str(text),
            },
            Field::SourcePlural => {
                self.source = Some(match self.source.take() {
                    None => Source::Plural {
                        singular: String::new(),
                        plural: text.to_string(),
                    },
                    Some(Source::Singular(singular)) => Source::Plural {
                        singular,
                        plural: text.to_string(),
                    },
                    Some(Source::Plural {
                        singular,
                        mut plural,
                    }) => {
                        plural.push_str(text);
                        Source::Plural { singular, plural }
                    }
                });
            }
            Field::Target => match &mut self.target {
                None => self.target = Some(Target::Singular(text.to_string())),
                Some(Target::Singular(value)) => value.push_str(text),
                Some(Target::Plural(forms)) => append_to_slot(forms, 0, text),
            },
            Field::TargetIndex(index) => {
                let mut forms = match self.target.take() {
                    None => Vec::new(),
                    Some(Target::Singular(value)) => vec![Some(value)],
                    Some(Target::Plural(forms)) => forms,
                };
                append_to_slot(&mut forms, index, text);
                self.target = Some(Target::Plural(forms));
            }
            Field::Comment => self
                .comment
                .get_or_insert_with(String::new)
                .push_str(text),
        }
    }

    /// Both source and target have been written.
    pub fn is_complete(&self) -> bool {
        self.source.is_some() && self.target.is_some()
    }

    pub fn is_plural(&self) -> bool {
        matches!(self.source, Some(Source::Plural { .. }))
            || matches!(self.target, Some(Target::Plural(_)))
    }

    /// The catalog header entry has an empty singular source.
    pub fn is_metadata(&self) -> bool {
        matches!(&self.source, Some(Source::Singular(s)) if s.is_empty())
    }

    pub fn is_fuzzy(&self) -> bool {
        self.comment
            .as_deref()
            .is_some_and(|comment| comment.lines().any(|line| FUZZY_REGEX.is_match(line)))
    }

    /// Adds or removes the `, fuzzy` comment line.
    pub fn set_fuzzy(&mut self, fuzzy: bool) {
        if fuzzy {
            if self.is_fuzzy() {
                return;
            }
            let comment = self.comment.get_or_insert_with(String::new);
            if !comment.is_empty() && !comment.ends_with('\n') {
                comment.push('\n');
            }
            comment.push_str(", fuzzy\n");
        } else if let Some(comment) = self.comment.take() {
            let kept = comment
                .lines()
                .filter(|line| !FUZZY_REGEX.is_match(line))
                .map(|line| format!("{}\n", line))
                .collect::<String>();
            if !kept.is_empty() {
                self.comment = Some(kept);
            }
        }
    }

    /// Strips surrounding whitespace from every line of every source and target string.
    pub(crate) fn trim_values(&mut self) {
        self.source = self.source.take().map(|source| match source {
            Source::Singular(value) => Source::Singular(trim_lines(&value)),
            Source::Plural { singular, plural } => Source::Plural {
                singular: trim_lines(&singular),
                plural: trim_lines(&plural),
            },
        });
        self.target = self.target.take().map(|target| match target {
            Target::Singular(value) => Target::Singular(trim_lines(&value)),
            Target::Plural(forms) => Target::Plural(
                forms
                    .into_iter()
                    .map(|form| form.map(|value| trim_lines(&value)))
                    .collect(),
            ),
        });
    }
}

fn trim_lines(value: &str) -> String {
    value
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn append_to_slot(forms: &mut Vec<Option<String>>, index: usize, text: &str) {
    if forms.len() <= index {
        forms.resize(index + 1, None);
    }
    forms[index].get_or_insert_with(String::new).push_str(text);
}

impl Display for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let source = match &self.source {
            Some(Source::Singular(value)) => value.as_str(),
            Some(Source::Plural { singular, .. }) => singular.as_str(),
            None => "<absent>",
        };
        write!(
            f,
            "Entry {{ source: {:?}, plural: {}, fuzzy: {} }}",
            source,
            self.is_plural(),
            self.is_fuzzy()
        )
    }
}

/// Catalog-wide settings declared by the metadata entry.
///
/// Values are kept as opaque text; the plural expression is never evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CatalogHeader {
    pub charset: Option<String>,
    pub plural_count: String,
    pub plural_expression: String,
}

impl Default for CatalogHeader {
    fn default() -> Self {
        CatalogHeader {
            charset: None,
            plural_count: "1".to_string(),
            plural_expression: "0".to_string(),
        }
    }
}

impl CatalogHeader {
    /// Scans metadata text for `Content-Type` and `Plural-Forms` lines.
    pub fn from_metadata(text: &str) -> Self {
        let mut header = CatalogHeader::default();
        let mut plural_found = false;

        for line in text.lines() {
            if let Some(caps) = CHARSET_REGEX.captures(line) {
                header.charset = Some(caps[1].to_string());
            } else if let Some(caps) = PLURAL_FORMS_REGEX.captures(line) {
                header.plural_count = caps[1].to_string();
                header.plural_expression = caps[2].to_string();
                plural_found = true;
            }
            if header.charset.is_some() && plural_found {
                break;
            }
        }

        header
    }

    /// Header from the last metadata entry in `entries`, or defaults if there is none.
    pub fn from_entries(entries: &[Entry]) -> Self {
        entries
            .iter()
            .rev()
            .find(|entry| entry.is_metadata())
            .and_then(|entry| match &entry.target {
                Some(Target::Singular(text)) => Some(CatalogHeader::from_metadata(text)),
                _ => None,
            })
            .unwrap_or_default()
    }
}
