/**
This module contains the minimal span model shared by the encoders and the scorer: tokens,
sentences, mentions and the documents holding them. Every structure is validated when it is built
and is immutable afterwards.
*/
use ahash::AHashSet;
use itertools::Itertools;
use std::error::Error;
use std::fmt::Display;
use std::ops::{Index, Range};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Error raised when building one of the structures of the span model.
pub enum DocumentError {
    /// A token was given an empty text
    EmptyText(usize),
    /// A document was given an empty identifier
    EmptyIdentifier,
    /// A mention was given an empty mention type or entity type. The content is the name of the
    /// field.
    EmptyLabel(&'static str),
    /// The end of a span is not strictly greater than its start
    EmptySpan { start: usize, end: usize },
    /// A mention was built from an empty list of tokens
    NoTokens,
    /// The token indices are not contiguous. Contains the indices received.
    NonContiguousTokens(Vec<usize>),
    /// A sentence was added out of order
    UnexpectedSentenceIndex { expected: usize, found: usize },
    /// A mention refers to a sentence that is not (yet) part of the document
    SentenceOutOfRange {
        sentence_index: usize,
        sentences: usize,
    },
    /// A mention ends after the last token of its sentence
    SpanOutOfRange {
        sentence_index: usize,
        end: usize,
        len: usize,
    },
    /// A mention was resolved against a sentence with another index
    SentenceMismatch { mention: usize, sentence: usize },
    /// The same mention was added twice to a builder
    DuplicateMention(Mention),
    /// The sentence does not belong to this document
    ForeignSentence(usize),
}

impl Display for DocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText(index) => write!(f, "Token at index {} has an empty text", index),
            Self::EmptyIdentifier => write!(f, "Document identifier is empty"),
            Self::EmptyLabel(field) => write!(f, "The {} of a mention cannot be empty", field),
            Self::EmptySpan { start, end } => write!(
                f,
                "End token index ({}) must be greater than start index ({})",
                end, start
            ),
            Self::NoTokens => write!(f, "Token sequence is empty"),
            Self::NonContiguousTokens(indices) => {
                write!(f, "Tokens are not in correct order: {:?}", indices)
            }
            Self::UnexpectedSentenceIndex { expected, found } => write!(
                f,
                "Expected sentence to have index {} but found index {}",
                expected, found
            ),
            Self::SentenceOutOfRange {
                sentence_index,
                sentences,
            } => write!(
                f,
                "Mention has sentence index {} but the document only has {} sentence(s)",
                sentence_index, sentences
            ),
            Self::SpanOutOfRange {
                sentence_index,
                end,
                len,
            } => write!(
                f,
                "Mention ends at token {} but sentence {} only has {} token(s)",
                end, sentence_index, len
            ),
            Self::SentenceMismatch { mention, sentence } => write!(
                f,
                "Mention is from sentence with index {} but sentence has index {}",
                mention, sentence
            ),
            Self::DuplicateMention(mention) => {
                write!(f, "Cannot add duplicate mention: {}", mention)
            }
            Self::ForeignSentence(index) => {
                write!(f, "Sentence with index {} is not from this document", index)
            }
        }
    }
}

impl Error for DocumentError {}

/// A single token of a sentence. Its index is its position inside the sentence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Token {
    text: String,
    index: usize,
}

impl Token {
    pub fn new<S: Into<String>>(text: S, index: usize) -> Result<Self, DocumentError> {
        let text = text.into();
        if text.is_empty() {
            return Err(DocumentError::EmptyText(index));
        }
        Ok(Self { text, index })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Ordered sequence of tokens. The token indices are always `0..len`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sentence {
    index: usize,
    tokens: Vec<Token>,
}

impl Sentence {
    /// Builds a sentence from its tokens. Fails if the token indices are not exactly `0..n`, in
    /// order.
    ///
    /// * `tokens`: Tokens of the sentence.
    /// * `index`: Position of the sentence inside its document.
    pub fn from_tokens(tokens: Vec<Token>, index: usize) -> Result<Self, DocumentError> {
        let is_contiguous = tokens.iter().enumerate().all(|(i, t)| t.index == i);
        if !is_contiguous {
            return Err(DocumentError::NonContiguousTokens(
                tokens.iter().map(|t| t.index).collect(),
            ));
        }
        Ok(Self { index, tokens })
    }

    /// Convenience constructor building the tokens from their texts.
    pub fn from_texts<S: AsRef<str>>(texts: &[S], index: usize) -> Result<Self, DocumentError> {
        let tokens: Result<Vec<Token>, DocumentError> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| Token::new(t.as_ref(), i))
            .collect();
        Self::from_tokens(tokens?, index)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }
}

impl<'a> IntoIterator for &'a Sentence {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;
    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

impl Index<usize> for Sentence {
    type Output = Token;
    fn index(&self, index: usize) -> &Self::Output {
        &self.tokens[index]
    }
}

impl Display for Sentence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tokens.iter().join(" "))
    }
}

/// A mention is a span of tokens `[start, end)` inside a single sentence, labelled with a mention
/// type (e.g. `"name"`) and an entity type (e.g. `"PER"`, `"LOC"`).
///
/// The field order is the canonical ordering of mentions: sentence index, start, end, mention type
/// and entity type. Equality and hashing use all five fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Mention {
    sentence_index: usize,
    start: usize,
    end: usize,
    mention_type: String,
    entity_type: String,
}

impl Mention {
    pub fn new<M, E>(
        sentence_index: usize,
        start: usize,
        end: usize,
        mention_type: M,
        entity_type: E,
    ) -> Result<Self, DocumentError>
    where
        M: Into<String>,
        E: Into<String>,
    {
        if end <= start {
            return Err(DocumentError::EmptySpan { start, end });
        }
        let mention_type = mention_type.into();
        if mention_type.is_empty() {
            return Err(DocumentError::EmptyLabel("mention type"));
        }
        let entity_type = entity_type.into();
        if entity_type.is_empty() {
            return Err(DocumentError::EmptyLabel("entity type"));
        }
        Ok(Self {
            sentence_index,
            start,
            end,
            mention_type,
            entity_type,
        })
    }

    /// Builds a mention covering the given tokens of `sentence`. The tokens must be non-empty and
    /// contiguous.
    pub fn from_tokens<M, E>(
        sentence: &Sentence,
        tokens: &[Token],
        mention_type: M,
        entity_type: E,
    ) -> Result<Self, DocumentError>
    where
        M: Into<String>,
        E: Into<String>,
    {
        let first = tokens.first().ok_or(DocumentError::NoTokens)?.index;
        let is_contiguous = tokens
            .iter()
            .enumerate()
            .all(|(offset, t)| t.index == first + offset);
        if !is_contiguous {
            return Err(DocumentError::NonContiguousTokens(
                tokens.iter().map(|t| t.index).collect(),
            ));
        }
        Self::new(
            sentence.index,
            first,
            first + tokens.len(),
            mention_type,
            entity_type,
        )
    }

    pub fn sentence_index(&self) -> usize {
        self.sentence_index
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn mention_type(&self) -> &str {
        &self.mention_type
    }

    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    /// Number of tokens covered. Always at least 1.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub(crate) fn span(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Returns the tokens of `sentence` covered by this mention.
    pub fn tokens<'s>(&self, sentence: &'s Sentence) -> Result<&'s [Token], DocumentError> {
        if sentence.index != self.sentence_index {
            return Err(DocumentError::SentenceMismatch {
                mention: self.sentence_index,
                sentence: sentence.index,
            });
        }
        sentence
            .tokens
            .get(self.span())
            .ok_or(DocumentError::SpanOutOfRange {
                sentence_index: self.sentence_index,
                end: self.end,
                len: sentence.len(),
            })
    }

    /// Text of the covered tokens, joined by a single space.
    pub fn tokenized_text(&self, document: &Document) -> Result<String, DocumentError> {
        let sentence = document
            .sentences
            .get(self.sentence_index)
            .ok_or(DocumentError::SentenceOutOfRange {
                sentence_index: self.sentence_index,
                sentences: document.len(),
            })?;
        Ok(self.tokens(sentence)?.iter().map(Token::text).join(" "))
    }
}

impl Display for Mention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}, {}, {}, {})",
            self.sentence_index, self.start, self.end, self.mention_type, self.entity_type
        )
    }
}

/// A document is a list of sentences and the mentions found in them. Mentions are kept in their
/// canonical order, which also groups them by sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    id: String,
    sentences: Vec<Sentence>,
    mentions: Vec<Mention>,
    /// Range of `mentions` belonging to each sentence
    sentence_mentions: Vec<Range<usize>>,
}

impl Document {
    /// Builds a document and validates every mention against the sentences.
    pub fn new<S: Into<String>>(
        id: S,
        sentences: Vec<Sentence>,
        mentions: Vec<Mention>,
    ) -> Result<Self, DocumentError> {
        let id = id.into();
        if id.is_empty() {
            return Err(DocumentError::EmptyIdentifier);
        }
        for (expected, sentence) in sentences.iter().enumerate() {
            if sentence.index != expected {
                return Err(DocumentError::UnexpectedSentenceIndex {
                    expected,
                    found: sentence.index,
                });
            }
        }
        for mention in mentions.iter() {
            check_mention_bounds(mention, &sentences)?;
        }
        Ok(Self::from_parts(id, sentences, mentions))
    }

    /// Assumes every part was already validated.
    fn from_parts(id: String, sentences: Vec<Sentence>, mut mentions: Vec<Mention>) -> Self {
        mentions.sort_unstable();
        let mut sentence_mentions = Vec::with_capacity(sentences.len());
        let mut cursor = 0;
        for sentence in sentences.iter() {
            let start = cursor;
            while cursor < mentions.len() && mentions[cursor].sentence_index == sentence.index {
                cursor += 1;
            }
            sentence_mentions.push(start..cursor);
        }
        Self {
            id,
            sentences,
            mentions,
            sentence_mentions,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    /// Every mention of the document, in canonical order.
    pub fn mentions(&self) -> &[Mention] {
        &self.mentions
    }

    pub fn get(&self, index: usize) -> Option<&Sentence> {
        self.sentences.get(index)
    }

    /// Number of sentences.
    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sentence> {
        self.sentences.iter()
    }

    /// Iterates over the sentences, each paired with its mentions.
    pub fn sentences_with_mentions(&self) -> impl Iterator<Item = (&Sentence, &[Mention])> {
        self.sentences
            .iter()
            .zip(self.sentence_mentions.iter())
            .map(|(s, range)| (s, &self.mentions[range.clone()]))
    }

    /// Mentions of a given sentence. Fails if the sentence is not part of this document.
    pub fn mentions_for_sentence(&self, sentence: &Sentence) -> Result<&[Mention], DocumentError> {
        match self.sentences.get(sentence.index) {
            Some(own) if own == sentence => {
                Ok(&self.mentions[self.sentence_mentions[sentence.index].clone()])
            }
            _ => Err(DocumentError::ForeignSentence(sentence.index)),
        }
    }

    /// Same document, with its mentions replaced.
    pub fn copy_with_mentions<I>(&self, mentions: I) -> Result<Self, DocumentError>
    where
        I: IntoIterator<Item = Mention>,
    {
        let mentions: Vec<Mention> = mentions.into_iter().collect();
        for mention in mentions.iter() {
            check_mention_bounds(mention, &self.sentences)?;
        }
        Ok(Self::from_parts(
            self.id.clone(),
            self.sentences.clone(),
            mentions,
        ))
    }

    pub fn copy_without_mentions(&self) -> Self {
        Self::from_parts(self.id.clone(), self.sentences.clone(), vec![])
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Sentence;
    type IntoIter = std::slice::Iter<'a, Sentence>;
    fn into_iter(self) -> Self::IntoIter {
        self.sentences.iter()
    }
}

impl Index<usize> for Document {
    type Output = Sentence;
    fn index(&self, index: usize) -> &Self::Output {
        &self.sentences[index]
    }
}

/// One sentence per line, tokens separated by a space.
impl Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.sentences.iter().join("\n"))
    }
}

fn check_mention_bounds(mention: &Mention, sentences: &[Sentence]) -> Result<(), DocumentError> {
    let sentence =
        sentences
            .get(mention.sentence_index)
            .ok_or(DocumentError::SentenceOutOfRange {
                sentence_index: mention.sentence_index,
                sentences: sentences.len(),
            })?;
    if mention.end > sentence.len() {
        return Err(DocumentError::SpanOutOfRange {
            sentence_index: mention.sentence_index,
            end: mention.end,
            len: sentence.len(),
        });
    }
    Ok(())
}

/// Accumulates the sentences and mentions of a document. Sentences must be added in order and a
/// mention can only be added once its sentence is known.
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    id: String,
    sentences: Vec<Sentence>,
    mentions: Vec<Mention>,
    mention_set: AHashSet<Mention>,
}

impl DocumentBuilder {
    pub fn new<S: Into<String>>(id: S) -> Result<Self, DocumentError> {
        let id = id.into();
        if id.is_empty() {
            return Err(DocumentError::EmptyIdentifier);
        }
        Ok(Self {
            id,
            sentences: vec![],
            mentions: vec![],
            mention_set: AHashSet::default(),
        })
    }

    /// Index the next sentence must have.
    pub fn next_sentence_index(&self) -> usize {
        self.sentences.len()
    }

    /// Creates a sentence with the next sentence index, adds it and returns a copy of it.
    pub fn create_sentence(&mut self, tokens: Vec<Token>) -> Result<Sentence, DocumentError> {
        let sentence = Sentence::from_tokens(tokens, self.next_sentence_index())?;
        self.sentences.push(sentence.clone());
        Ok(sentence)
    }

    pub fn add_sentence(&mut self, sentence: Sentence) -> Result<&mut Self, DocumentError> {
        let expected = self.next_sentence_index();
        if sentence.index != expected {
            return Err(DocumentError::UnexpectedSentenceIndex {
                expected,
                found: sentence.index,
            });
        }
        self.sentences.push(sentence);
        Ok(self)
    }

    pub fn add_sentences<I>(&mut self, sentences: I) -> Result<&mut Self, DocumentError>
    where
        I: IntoIterator<Item = Sentence>,
    {
        for sentence in sentences {
            self.add_sentence(sentence)?;
        }
        Ok(self)
    }

    pub fn add_mention(&mut self, mention: Mention) -> Result<&mut Self, DocumentError> {
        if self.mention_set.contains(&mention) {
            return Err(DocumentError::DuplicateMention(mention));
        }
        check_mention_bounds(&mention, &self.sentences)?;
        self.mention_set.insert(mention.clone());
        self.mentions.push(mention);
        Ok(self)
    }

    pub fn add_mentions<I>(&mut self, mentions: I) -> Result<&mut Self, DocumentError>
    where
        I: IntoIterator<Item = Mention>,
    {
        for mention in mentions {
            self.add_mention(mention)?;
        }
        Ok(self)
    }

    pub fn contains_mention(&self, mention: &Mention) -> bool {
        self.mention_set.contains(mention)
    }

    /// Number of sentences added so far.
    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    pub fn build(self) -> Document {
        Document::from_parts(self.id, self.sentences, self.mentions)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rstest::rstest;

    pub(crate) fn tokens(texts: &[&str]) -> Vec<Token> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Token::new(*t, i).unwrap())
            .collect()
    }

    #[test]
    fn test_full_document() {
        let mut builder = DocumentBuilder::new("test").unwrap();
        let s1 = builder.create_sentence(tokens(&["foo", "bar"])).unwrap();
        let m1 = Mention::from_tokens(&s1, &s1.tokens()[0..1], "name", "PER").unwrap();
        let m2 = Mention::from_tokens(&s1, &s1.tokens()[1..2], "name", "ORG.COM").unwrap();
        let m3 = Mention::from_tokens(&s1, s1.tokens(), "desc", "MISC").unwrap();
        builder.add_mention(m1.clone()).unwrap();
        builder.add_mentions([m2.clone(), m3.clone()]).unwrap();
        let d = builder.build();

        assert_eq!(d.get(0), Some(&s1));
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].len(), 2);
        assert_eq!(d.mentions().len(), 3);
        assert_eq!(d.mentions()[0].tokens(&s1).unwrap(), &s1.tokens()[0..1]);
        // Canonical order: (0, 0, 1), (0, 0, 2), (0, 1, 2)
        assert_eq!(d.mentions()[1].len(), 2);
        assert_eq!(d.mentions()[1].mention_type(), "desc");
        assert_eq!(
            d.sentences_with_mentions().collect::<Vec<_>>(),
            vec![(&s1, &[m1, m3, m2][..])]
        );

        let m4 = Mention::from_tokens(&s1, s1.tokens(), "name", "PER").unwrap();
        let copy = d.copy_with_mentions([m4.clone()]).unwrap();
        assert_eq!(copy.mentions(), &[m4]);
        assert_eq!(copy.id(), "test");
        assert!(d.copy_without_mentions().mentions().is_empty());
        assert_eq!(d.to_string(), "foo bar");
    }

    #[test]
    fn test_sentence_mentions() {
        let mut builder = DocumentBuilder::new("test").unwrap();
        let s1 = builder.create_sentence(tokens(&["a", "b"])).unwrap();
        let m1 = Mention::new(0, 0, 1, "name", "PER").unwrap();
        let m2 = Mention::new(0, 1, 2, "name", "MISC").unwrap();
        let s2 = builder.create_sentence(tokens(&["c"])).unwrap();
        let s3 = builder.create_sentence(tokens(&["d"])).unwrap();
        let m3 = Mention::new(2, 0, 1, "name", "PER").unwrap();
        // Order of insertion does not matter
        builder
            .add_mentions([m3.clone(), m1.clone(), m2.clone()])
            .unwrap();
        let d = builder.build();

        let grouped: Vec<_> = d.sentences_with_mentions().collect();
        assert_eq!(
            grouped,
            vec![
                (&s1, &[m1.clone(), m2.clone()][..]),
                (&s2, &[][..]),
                (&s3, &[m3.clone()][..])
            ]
        );
        assert_eq!(d.mentions_for_sentence(&s1).unwrap(), &[m1, m2]);
        assert!(d.mentions_for_sentence(&s2).unwrap().is_empty());
        assert_eq!(d.mentions_for_sentence(&s3).unwrap(), &[m3]);

        let foreign = Sentence::from_tokens(tokens(&["z"]), 0).unwrap();
        assert_eq!(
            d.mentions_for_sentence(&foreign),
            Err(DocumentError::ForeignSentence(0))
        );
        assert_eq!(d.to_string(), "a b\nc\nd");
    }

    #[test]
    fn test_bad_token() {
        assert_eq!(Token::new("", 0), Err(DocumentError::EmptyText(0)));
    }

    #[rstest]
    #[case(vec![("foo", 0), ("baz", 2), ("bar", 1)])]
    #[case(vec![("bar", 1), ("baz", 2)])]
    fn test_bad_sentence(#[case] raw: Vec<(&str, usize)>) {
        let toks: Vec<Token> = raw
            .into_iter()
            .map(|(t, i)| Token::new(t, i).unwrap())
            .collect();
        assert!(matches!(
            Sentence::from_tokens(toks, 0),
            Err(DocumentError::NonContiguousTokens(_))
        ));
    }

    #[test]
    fn test_bad_mention() {
        let s1 = Sentence::from_texts(&["foo", "bar", "baz"], 0).unwrap();
        let t = s1.tokens();
        assert_eq!(
            Mention::from_tokens(&s1, &[], "name", "PER"),
            Err(DocumentError::NoTokens)
        );
        for bad in [
            vec![t[0].clone(), t[0].clone(), t[1].clone()],
            vec![t[0].clone(), t[2].clone(), t[1].clone()],
            vec![t[0].clone(), t[2].clone()],
        ] {
            assert!(matches!(
                Mention::from_tokens(&s1, &bad, "name", "PER"),
                Err(DocumentError::NonContiguousTokens(_))
            ));
        }
        assert_eq!(
            Mention::new(0, 1, 1, "name", "PER"),
            Err(DocumentError::EmptySpan { start: 1, end: 1 })
        );
        assert_eq!(
            Mention::new(0, 0, 1, "", "PER"),
            Err(DocumentError::EmptyLabel("mention type"))
        );
        assert_eq!(
            Mention::new(0, 0, 1, "name", ""),
            Err(DocumentError::EmptyLabel("entity type"))
        );
    }

    #[test]
    fn test_mention_ordering() {
        let mut mentions = vec![
            Mention::new(1, 0, 1, "name", "PER").unwrap(),
            Mention::new(0, 2, 3, "name", "LOC").unwrap(),
            Mention::new(0, 0, 2, "name", "ORG").unwrap(),
            Mention::new(0, 0, 1, "name", "PER").unwrap(),
            Mention::new(0, 0, 1, "desc", "PER").unwrap(),
        ];
        mentions.sort();
        let keys: Vec<_> = mentions
            .iter()
            .map(|m| (m.sentence_index(), m.start(), m.end(), m.mention_type()))
            .collect();
        assert_eq!(
            keys,
            vec![
                (0, 0, 1, "desc"),
                (0, 0, 1, "name"),
                (0, 0, 2, "name"),
                (0, 2, 3, "name"),
                (1, 0, 1, "name")
            ]
        );
    }

    #[test]
    fn test_builder_rejections() {
        let mut builder = DocumentBuilder::new("test").unwrap();
        assert!(builder.is_empty());
        let m = Mention::new(0, 0, 1, "name", "PER").unwrap();
        assert_eq!(
            builder.add_mention(m.clone()).err(),
            Some(DocumentError::SentenceOutOfRange {
                sentence_index: 0,
                sentences: 0
            })
        );
        builder.create_sentence(tokens(&["a", "b"])).unwrap();
        builder.add_mention(m.clone()).unwrap();
        assert!(builder.contains_mention(&m));
        assert_eq!(
            builder.add_mention(m.clone()).err(),
            Some(DocumentError::DuplicateMention(m))
        );
        assert_eq!(
            builder
                .add_mention(Mention::new(0, 1, 3, "name", "PER").unwrap())
                .err(),
            Some(DocumentError::SpanOutOfRange {
                sentence_index: 0,
                end: 3,
                len: 2
            })
        );
        let wrong = Sentence::from_texts(&["x"], 3).unwrap();
        assert_eq!(
            builder.add_sentence(wrong).err(),
            Some(DocumentError::UnexpectedSentenceIndex {
                expected: 1,
                found: 3
            })
        );
        assert_eq!(builder.len(), 1);
        assert_eq!(
            DocumentBuilder::new("").err(),
            Some(DocumentError::EmptyIdentifier)
        );
    }

    #[test]
    fn test_tokenized_text() {
        let mut builder = DocumentBuilder::new("test").unwrap();
        builder.create_sentence(tokens(&["foo", "bar", "baz"])).unwrap();
        let m = Mention::new(0, 1, 3, "name", "LOC").unwrap();
        builder.add_mention(m.clone()).unwrap();
        let d = builder.build();
        assert_eq!(m.tokenized_text(&d).unwrap(), "bar baz");
        let other = Mention::new(4, 0, 1, "name", "LOC").unwrap();
        assert!(other.tokenized_text(&d).is_err());
    }
}
