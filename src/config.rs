/*
 * This modules contains some quality of life structs and alias. Most importantly, it contains the
 * `NerConfig` struct, which implements the default trait. This config can be passed to the
 * `score_prf_conf` function or the `count_conf` function to simplify their arguments, and can
 * decode or encode the mentions of a sentence with its scheme and mention type.
*/
use crate::document::{Document, Mention, Sentence};
use crate::encoding::{
    decode_document_as, encode_document, ConversionError, DocumentConversionError,
    MentionEncoder, SchemeType, DEFAULT_MENTION_TYPE,
};
use either::Either as LeftOrRight;
use std::fmt::{Debug, Display};

/// Reasonable default configuration when transcoding and scoring mentions.
pub type DefaultNerConfig = NerConfig<SchemeType>;

impl DefaultNerConfig {
    pub fn new() -> Self {
        Self {
            scheme: SchemeType::BIO,
            mention_type: String::from(DEFAULT_MENTION_TYPE),
            check_docids: false,
            parallel: false,
        }
    }

    pub fn scheme(&self) -> SchemeType {
        self.scheme
    }

    pub fn mention_type(&self) -> &str {
        &self.mention_type
    }

    pub fn check_docids(&self) -> bool {
        self.check_docids
    }

    pub fn parallel(&self) -> bool {
        self.parallel
    }

    /// Decodes the tags of `sentence` with the configured scheme. Every mention gets the configured
    /// mention type.
    pub fn decode_mentions<S: AsRef<str>>(
        &self,
        sentence: &Sentence,
        tags: &[S],
    ) -> Result<Vec<Mention>, ConversionError> {
        self.scheme
            .decode_mentions_as(sentence, tags, &self.mention_type)
    }

    /// Encodes the mentions of `sentence` with the configured scheme.
    pub fn encode_mentions(
        &self,
        sentence: &Sentence,
        mentions: &[Mention],
    ) -> Result<Vec<String>, ConversionError> {
        self.scheme.encode_mentions(sentence, mentions)
    }

    /// Decodes one tag sequence per sentence of `document` and returns a copy of the document
    /// holding the decoded mentions.
    pub fn decode_document<S: AsRef<str>>(
        &self,
        document: &Document,
        tags: &[Vec<S>],
    ) -> Result<Document, DocumentConversionError> {
        decode_document_as(&self.scheme, document, tags, &self.mention_type)
    }

    /// Encodes the mentions of every sentence of `document`.
    pub fn encode_document(
        &self,
        document: &Document,
    ) -> Result<Vec<Vec<String>>, DocumentConversionError> {
        encode_document(&self.scheme, document)
    }
}

impl<Scheme> From<(Scheme, String, bool, bool)> for NerConfig<Scheme>
where
    Scheme: Into<SchemeType>,
{
    fn from(value: (Scheme, String, bool, bool)) -> Self {
        Self {
            scheme: value.0,
            mention_type: value.1,
            check_docids: value.2,
            parallel: value.3,
        }
    }
}

impl<Scheme> From<NerConfigBuilder<Scheme>> for NerConfig<SchemeType>
where
    Scheme: Into<SchemeType>,
{
    fn from(value: NerConfigBuilder<Scheme>) -> Self {
        Self {
            scheme: value.scheme.either_into(),
            mention_type: value.mention_type,
            check_docids: value.check_docids,
            parallel: value.parallel,
        }
    }
}

impl<Scheme> From<NerConfig<Scheme>> for (SchemeType, String, bool, bool)
where
    Scheme: Into<SchemeType>,
{
    fn from(value: NerConfig<Scheme>) -> Self {
        (
            value.scheme.into(),
            value.mention_type,
            value.check_docids,
            value.parallel,
        )
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
/// Config struct used to simplify the inputs of parameters to the main functions of `nerspan`. It
/// Implements the default trait.
pub struct NerConfig<Scheme>
where
    Scheme: Into<SchemeType>,
{
    /// Scheme used to encode and decode the tags. The default is `BIO`.
    scheme: Scheme,
    /// Mention type given to the decoded mentions.
    mention_type: String,
    /// Must the paired gold and system documents have the same identifier?
    check_docids: bool,
    /// Can we use multiple cores to reduce the document pairs? This option should be benched.
    parallel: bool,
}

impl Default for DefaultNerConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl<Scheme> Display for NerConfig<Scheme>
where
    Scheme: Into<SchemeType> + Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let string = format!("Scheme: {:?}\n Mention type: {}\n Checking document identifiers: {}\n Using parallel computations: {}", self.scheme, self.mention_type, self.check_docids, self.parallel);
        write!(f, "{}", string)
    }
}

/// This builder can be used to build and customize a `NerConfig` stucture.
pub struct NerConfigBuilder<Scheme>
where
    Scheme: Into<SchemeType>,
{
    scheme: LeftOrRight<Scheme, SchemeType>,
    mention_type: String,
    check_docids: bool,
    parallel: bool,
}

impl Default for NerConfigBuilder<SchemeType> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Scheme> NerConfigBuilder<Scheme>
where
    Scheme: Into<SchemeType>,
{
    pub fn scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = LeftOrRight::Left(scheme);
        self
    }
    pub fn mention_type<S: Into<String>>(mut self, mention_type: S) -> Self {
        self.mention_type = mention_type.into();
        self
    }
    pub fn check_docids(mut self, check_docids: bool) -> Self {
        self.check_docids = check_docids;
        self
    }
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
    pub fn new() -> Self {
        Self {
            scheme: LeftOrRight::Right(SchemeType::BIO),
            mention_type: String::from(DEFAULT_MENTION_TYPE),
            check_docids: false,
            parallel: false,
        }
    }
    pub fn build(self) -> NerConfig<SchemeType> {
        NerConfig::from(self)
    }
}
