/**
This module converts mentions into per-token tags and back. The conversion is implemented once for
every scheme: decoding scans the tags and tracks the mention currently open, encoding assigns a
boundary role to each token of each mention. The scheme only decides which prefix spells each role.
*/
use crate::document::{Document, DocumentError, Mention, Sentence};
use itertools::Itertools;
use log::debug;
use std::{error::Error, fmt::Display, iter::Enumerate, slice::Iter};

mod schemes;

use schemes::{InnerTag, Role, DELIMITER, OUTSIDE};
// Re-exporting
pub use schemes::{
    get_mention_encoder, ParsingError, SchemeType, UnknownSchemeError, SUPPORTED_ENCODINGS,
};

/// Mention type given to decoded mentions when none is specified.
pub const DEFAULT_MENTION_TYPE: &str = "name";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Error raised when a sentence cannot be encoded or decoded.
pub enum ConversionError {
    /// The number of tags differs from the number of tokens
    LengthMismatch {
        sentence_index: usize,
        tokens: usize,
        tags: usize,
    },
    /// A tag could not be parsed. `position` is the index of the tag in the sentence.
    Parsing {
        sentence_index: usize,
        position: usize,
        error: ParsingError,
    },
    /// Two mentions share at least one token. Tags cannot represent them.
    OverlappingMentions { first: Mention, second: Mention },
    /// The mention belongs to another sentence
    WrongSentence {
        mention: Mention,
        sentence_index: usize,
    },
    /// The mention ends after the last token of the sentence
    MentionOutOfBounds { mention: Mention, len: usize },
    /// A decoded mention could not be built
    Mention(DocumentError),
}

impl From<DocumentError> for ConversionError {
    fn from(value: DocumentError) -> Self {
        Self::Mention(value)
    }
}

impl Display for ConversionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LengthMismatch {
                sentence_index,
                tokens,
                tags,
            } => write!(
                f,
                "Sentence {} has {} token(s) but received {} tag(s)",
                sentence_index, tokens, tags
            ),
            Self::Parsing {
                sentence_index,
                position,
                error,
            } => write!(
                f,
                "Invalid tag at position {} of sentence {}: {}",
                position, sentence_index, error
            ),
            Self::OverlappingMentions { first, second } => write!(
                f,
                "Mentions {} and {} overlap and cannot be encoded",
                first, second
            ),
            Self::WrongSentence {
                mention,
                sentence_index,
            } => write!(
                f,
                "Mention {} does not belong to sentence {}",
                mention, sentence_index
            ),
            Self::MentionOutOfBounds { mention, len } => write!(
                f,
                "Mention {} goes past the end of its sentence ({} token(s))",
                mention, len
            ),
            Self::Mention(e) => std::fmt::Display::fmt(e, f),
        }
    }
}

impl Error for ConversionError {}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Error raised when converting a whole document. Identifies the document.
pub enum DocumentConversionError {
    /// The number of tag sequences differs from the number of sentences
    SentenceCount {
        document_id: String,
        sentences: usize,
        tag_sequences: usize,
    },
    /// One sentence of the document could not be converted
    Sentence {
        document_id: String,
        error: ConversionError,
    },
    /// The decoded mentions could not be attached to the document
    Document(DocumentError),
}

impl From<DocumentError> for DocumentConversionError {
    fn from(value: DocumentError) -> Self {
        Self::Document(value)
    }
}

impl Display for DocumentConversionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SentenceCount {
                document_id,
                sentences,
                tag_sequences,
            } => write!(
                f,
                "Document {} has {} sentence(s) but received {} tag sequence(s)",
                document_id, sentences, tag_sequences
            ),
            Self::Sentence { document_id, error } => {
                write!(f, "Error in document {}: {}", document_id, error)
            }
            Self::Document(e) => std::fmt::Display::fmt(e, f),
        }
    }
}

impl Error for DocumentConversionError {}

/// Conversion between the mentions of a sentence and one tag per token.
pub trait MentionEncoder {
    /// Returns one tag per token of `sentence`. Tokens outside of every mention are tagged `"O"`.
    /// The order of `mentions` does not matter. Fails if two mentions overlap.
    fn encode_mentions(
        &self,
        sentence: &Sentence,
        mentions: &[Mention],
    ) -> Result<Vec<String>, ConversionError>;

    /// Decodes the tags of `sentence` into mentions of type `mention_type`, sorted in canonical
    /// order. Malformed sequences (continuation without a beginning, type change, orphan end) are
    /// repaired, never rejected. Only unparsable tags and length mismatches fail.
    fn decode_mentions_as<S: AsRef<str>>(
        &self,
        sentence: &Sentence,
        tags: &[S],
        mention_type: &str,
    ) -> Result<Vec<Mention>, ConversionError>;

    /// Same as `decode_mentions_as`, using `DEFAULT_MENTION_TYPE`.
    fn decode_mentions<S: AsRef<str>>(
        &self,
        sentence: &Sentence,
        tags: &[S],
    ) -> Result<Vec<Mention>, ConversionError> {
        self.decode_mentions_as(sentence, tags, DEFAULT_MENTION_TYPE)
    }
}

impl MentionEncoder for SchemeType {
    fn encode_mentions(
        &self,
        sentence: &Sentence,
        mentions: &[Mention],
    ) -> Result<Vec<String>, ConversionError> {
        let mut sorted: Vec<&Mention> = mentions.iter().collect();
        sorted.sort_unstable();
        for mention in sorted.iter() {
            if mention.sentence_index() != sentence.index() {
                return Err(ConversionError::WrongSentence {
                    mention: (*mention).clone(),
                    sentence_index: sentence.index(),
                });
            }
            if mention.end() > sentence.len() {
                return Err(ConversionError::MentionOutOfBounds {
                    mention: (*mention).clone(),
                    len: sentence.len(),
                });
            }
        }
        // Sorted by start: any overlap shows up between neighbours
        if let Some((first, second)) = sorted
            .iter()
            .tuple_windows()
            .find(|(a, b)| b.start() < a.end())
        {
            return Err(ConversionError::OverlappingMentions {
                first: (*first).clone(),
                second: (*second).clone(),
            });
        }

        let mut tags = vec![String::from(OUTSIDE); sentence.len()];
        let mut previous: Option<&Mention> = None;
        for mention in sorted {
            let touching = previous.is_some_and(|p| {
                p.end() == mention.start() && p.entity_type() == mention.entity_type()
            });
            for (offset, role) in self.mention_roles(mention.len(), touching).enumerate() {
                tags[mention.start() + offset] = format!(
                    "{}{}{}",
                    self.prefix_for(role),
                    DELIMITER,
                    mention.entity_type()
                );
            }
            previous = Some(mention);
        }
        Ok(tags)
    }

    fn decode_mentions_as<S: AsRef<str>>(
        &self,
        sentence: &Sentence,
        tags: &[S],
        mention_type: &str,
    ) -> Result<Vec<Mention>, ConversionError> {
        if tags.len() != sentence.len() {
            return Err(ConversionError::LengthMismatch {
                sentence_index: sentence.index(),
                tokens: sentence.len(),
                tags: tags.len(),
            });
        }
        let mut mentions = Vec::new();
        for span in LenientSpanIter::new(tags, *self) {
            let span = span.map_err(|(position, error)| ConversionError::Parsing {
                sentence_index: sentence.index(),
                position,
                error,
            })?;
            mentions.push(Mention::new(
                sentence.index(),
                span.start,
                span.end,
                mention_type,
                span.entity_type,
            )?);
        }
        mentions.sort_unstable();
        Ok(mentions)
    }
}

impl SchemeType {
    /// Roles of the tokens of a mention of `len` tokens. `touching` is true when the mention
    /// starts right after a mention of the same entity type.
    fn mention_roles(&self, len: usize, touching: bool) -> impl Iterator<Item = Role> {
        let opener = if self.opens_every_span() || touching {
            Role::Begin
        } else {
            Role::Inside
        };
        let unit = if self.has_role(Role::Unit) {
            Role::Unit
        } else {
            opener
        };
        let has_last = self.has_role(Role::Last);
        (0..len).map(move |i| match i {
            0 if len == 1 => unit,
            0 => opener,
            i if i == len - 1 && has_last => Role::Last,
            _ => Role::Inside,
        })
    }
}

/// Span found by the decoder, before it is turned into a `Mention`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RawSpan<'a> {
    start: usize,
    end: usize,
    entity_type: &'a str,
}

/// This struct iterates over the tags of a *single* sentence and returns the spans found in it,
/// in order. It never fails on a sequence of valid tags: inconsistent sequences are repaired.
struct LenientSpanIter<'a, S: AsRef<str>> {
    tags: Enumerate<Iter<'a, S>>,
    scheme: SchemeType,
    /// Start and entity type of the span currently open
    open: Option<(usize, &'a str)>,
    /// A single tag can close a span and emit another one
    pending: Option<RawSpan<'a>>,
    len: usize,
}

impl<'a, S: AsRef<str>> LenientSpanIter<'a, S> {
    fn new(tags: &'a [S], scheme: SchemeType) -> Self {
        LenientSpanIter {
            tags: tags.iter().enumerate(),
            scheme,
            open: None,
            pending: None,
            len: tags.len(),
        }
    }

    /// Closes the open span, if any, right before `index`.
    fn close(&mut self, index: usize) -> Option<RawSpan<'a>> {
        self.open.take().map(|(start, entity_type)| RawSpan {
            start,
            end: index,
            entity_type,
        })
    }

    /// Consumes one tag. Returns the span it closed and the span it emitted, in that order.
    fn step(
        &mut self,
        index: usize,
        tag: InnerTag<'a>,
    ) -> (Option<RawSpan<'a>>, Option<RawSpan<'a>>) {
        let single = RawSpan {
            start: index,
            end: index + 1,
            entity_type: tag.entity_type,
        };
        match tag.role {
            Role::Outside => (self.close(index), None),
            Role::Begin => {
                let closed = self.close(index);
                self.open = Some((index, tag.entity_type));
                (closed, None)
            }
            Role::Unit => (self.close(index), Some(single)),
            Role::Inside => match self.open {
                Some((_, open_type)) if open_type == tag.entity_type => (None, None),
                _ => {
                    if self.scheme.opens_every_span() {
                        debug!(
                            "{} tag {}{}{} at position {} opens a new mention",
                            self.scheme, tag.prefix, DELIMITER, tag.entity_type, index
                        );
                    }
                    let closed = self.close(index);
                    self.open = Some((index, tag.entity_type));
                    (closed, None)
                }
            },
            Role::Last => match self.open {
                Some((start, open_type)) if open_type == tag.entity_type => {
                    self.open = None;
                    (
                        None,
                        Some(RawSpan {
                            start,
                            end: index + 1,
                            entity_type: open_type,
                        }),
                    )
                }
                _ => {
                    debug!(
                        "{} tag {}{}{} at position {} ends nothing, kept as a single token mention",
                        self.scheme, tag.prefix, DELIMITER, tag.entity_type, index
                    );
                    (self.close(index), Some(single))
                }
            },
        }
    }
}

impl<'a, S: AsRef<str>> Iterator for LenientSpanIter<'a, S> {
    type Item = Result<RawSpan<'a>, (usize, ParsingError)>;
    fn next(&mut self) -> Option<Self::Item> {
        if let Some(span) = self.pending.take() {
            return Some(Ok(span));
        }
        loop {
            let (index, raw) = match self.tags.next() {
                Some(v) => v,
                // End of the sentence closes the open span
                None => return self.close(self.len).map(Ok),
            };
            let tag = match InnerTag::try_new(raw.as_ref(), self.scheme) {
                Ok(t) => t,
                Err(e) => return Some(Err((index, e))),
            };
            match self.step(index, tag) {
                (Some(closed), emitted) => {
                    self.pending = emitted;
                    return Some(Ok(closed));
                }
                (None, Some(emitted)) => return Some(Ok(emitted)),
                (None, None) => continue,
            }
        }
    }
}

/// Encodes every sentence of `document`. Returns one tag sequence per sentence.
pub fn encode_document<E: MentionEncoder>(
    encoder: &E,
    document: &Document,
) -> Result<Vec<Vec<String>>, DocumentConversionError> {
    document
        .sentences_with_mentions()
        .map(|(sentence, mentions)| {
            encoder
                .encode_mentions(sentence, mentions)
                .map_err(|error| DocumentConversionError::Sentence {
                    document_id: document.id().to_string(),
                    error,
                })
        })
        .collect()
}

/// Decodes one tag sequence per sentence and returns a copy of `document` holding the decoded
/// mentions. The mentions already present in `document` are dropped.
pub fn decode_document<E: MentionEncoder, S: AsRef<str>>(
    encoder: &E,
    document: &Document,
    tags: &[Vec<S>],
) -> Result<Document, DocumentConversionError> {
    decode_document_as(encoder, document, tags, DEFAULT_MENTION_TYPE)
}

pub(crate) fn decode_document_as<E: MentionEncoder, S: AsRef<str>>(
    encoder: &E,
    document: &Document,
    tags: &[Vec<S>],
    mention_type: &str,
) -> Result<Document, DocumentConversionError> {
    if tags.len() != document.len() {
        return Err(DocumentConversionError::SentenceCount {
            document_id: document.id().to_string(),
            sentences: document.len(),
            tag_sequences: tags.len(),
        });
    }
    let mut mentions = Vec::new();
    for (sentence, sentence_tags) in document.iter().zip(tags.iter()) {
        let decoded = encoder
            .decode_mentions_as(sentence, sentence_tags, mention_type)
            .map_err(|error| DocumentConversionError::Sentence {
                document_id: document.id().to_string(),
                error,
            })?;
        mentions.extend(decoded);
    }
    Ok(document.copy_with_mentions(mentions)?)
}

/// Rewrites the tags of a sentence from one scheme into another.
///
/// * `sentence`: The sentence the tags belong to.
/// * `tags`: Tags written with the `from` scheme.
/// * `from`: Scheme used to decode `tags`.
/// * `to`: Scheme used to write the returned tags.
pub fn convert_tags<F, T, S>(
    sentence: &Sentence,
    tags: &[S],
    from: &F,
    to: &T,
) -> Result<Vec<String>, ConversionError>
where
    F: MentionEncoder,
    T: MentionEncoder,
    S: AsRef<str>,
{
    let mentions = from.decode_mentions(sentence, tags)?;
    to.encode_mentions(sentence, &mentions)
}
