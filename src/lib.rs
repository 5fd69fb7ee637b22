/*!
This library converts named entity mentions between token level tags and spans, for the most
common tagging schemes, and scores system mentions against gold mentions with exact matching. It is
built with a focus on performance and soudness.
# SCHEMES
The current schemes are supported:
* IO: Every token of a mention is tagged `I`. Two adjacent mentions of the same type can not be
    told apart.
* IOB1: Here, `I` is a token inside a mention, `O` is a token outside a mention and `B` is the
    beginning of a mention immediately following another mention of the same type.
* BIO (or IOB2): It is same as IOB1, except that a `B` tag is given to the first token of every
    mention.
* BIOU: Same as BIO, but a single token mention is tagged `U`.
* BILOU: `L` denotes the last token of a mention and `U` a unit (single token) mention.
* BMES: `B`egin, `M`iddle, `E`nd and `S`ingle. `O` is also accepted outside of mentions.
* BIOES (or IOBES): Same as BILOU, with `E` instead of `L` and `S` instead of `U`.

The schemes can be looked up by name with `get_mention_encoder` or `str::parse`. The names in
`SUPPORTED_ENCODINGS` are recognized, and the lookup is case sensitive.

Decoding is lenient: a sequence that does not follow the rules of its scheme (such as an `I` tag
following an `O` in BIO) is still decoded into mentions, with the most natural interpretation.
Tags that can not be parsed at all (unknown prefix, missing entity type, prefix foreign to the
scheme) are errors.

## More information about schemes
* [Wikipedia](https://en.wikipedia.org/wiki/Inside%E2%80%93outside%E2%80%93beginning_(tagging))
* [Article](https://cs229.stanford.edu/proj2005/KrishnanGanapathy-NamedEntityRecognition.pdf), chapter 2

# Terminology
* A token is a single word of a sentence. A sentence is a list of at least one token and a document
    is an ordered list of sentences with an identifier.
* A mention is a span of contiguous tokens of a sentence, with a mention type (such as `name`) and
    an entity type (such as `PER`, `LOC` or `ORG`). Its end is exclusive.
* A tag is a string made of a prefix, a `-` and an entity type, such as `B-PER`, or the outside tag
    `O`. For a given scheme, the possible prefixes are the letters of the scheme.
* Scoring is exact: a system mention is a true positive only if a gold mention of the paired
    document has the same sentence index, start, end, mention type and entity type.
*/

mod config;
mod document;
mod encoding;
mod metrics;
mod reporter;

// The public api starts here
pub use document::{Document, DocumentBuilder, DocumentError, Mention, Sentence, Token};

pub use encoding::{
    convert_tags, decode_document, encode_document, get_mention_encoder, ConversionError,
    DocumentConversionError, MentionEncoder, ParsingError, SchemeType, UnknownSchemeError,
    DEFAULT_MENTION_TYPE, SUPPORTED_ENCODINGS,
};

pub use metrics::{count, score_prf, ComputationError, InconsistentLengthError};

pub use reporter::{MentionCounts, Score, ScoringCounts, ScoringResult};

pub use config::{DefaultNerConfig, NerConfig, NerConfigBuilder};

/// Computes the exact-match precision, recall and f-score of the system documents against the gold
/// documents, overall and per entity type. Instead of taking in the raw parameters, this function
/// takes a `NerConfig` struct and uses sensible defaults.
///
/// * `gold_docs`: Reference documents
/// * `system_docs`: Predicted documents
/// * `config`: Whether to check the document identifiers and to use multiple cores.
///
/// #Example
/// ```rust
/// use nerspan::{score_prf_conf, DefaultNerConfig, NerConfigBuilder, SchemeType, Sentence};
/// use nerspan::DocumentBuilder;
///
/// let config: DefaultNerConfig = NerConfigBuilder::default()
///     .scheme(SchemeType::BIOES)
///     .check_docids(true)
///     .build();
///
/// let mut builder = DocumentBuilder::new("doc").unwrap();
/// let index = builder.next_sentence_index();
/// let sentence = Sentence::from_texts(&["Ada", "Lovelace", "visited", "London"], index).unwrap();
/// builder.add_sentence(sentence).unwrap();
/// let document = builder.build();
///
/// let gold_tags = vec![vec!["B-PER", "E-PER", "O", "S-LOC"]];
/// let system_tags = vec![vec!["S-PER", "S-PER", "O", "S-LOC"]];
/// let gold = config.decode_document(&document, &gold_tags).unwrap();
/// let system = config.decode_document(&document, &system_tags).unwrap();
///
/// let result = score_prf_conf(&[gold], &[system], &config).unwrap();
/// let expected_report = "Type, Precision, Recall, Fscore
/// Overall, 0.3333333333333333, 0.5, 0.4
/// LOC, 1, 1, 1
/// PER, 0, 0, 0\n";
///
/// assert_eq!(expected_report, result.to_string());
/// ```
pub fn score_prf_conf<Scheme>(
    gold_docs: &[Document],
    system_docs: &[Document],
    config: &NerConfig<Scheme>,
) -> Result<ScoringResult, ComputationError>
where
    Scheme: Into<SchemeType> + Clone,
{
    let (_, _, check_docids, parallel): (SchemeType, String, bool, bool) = config.clone().into();
    metrics::score_prf_inner(gold_docs, system_docs, check_docids, parallel)
}

/// Counts the true positives, false positives and false negatives of every mention text, grouped
/// by entity type. Instead of taking in the raw parameters, this function takes a `NerConfig`
/// struct and uses sensible defaults.
///
/// * `system_docs`: Predicted documents
/// * `gold_docs`: Reference documents
/// * `config`: Whether to check the document identifiers and to use multiple cores.
pub fn count_conf<Scheme>(
    system_docs: &[Document],
    gold_docs: &[Document],
    config: &NerConfig<Scheme>,
) -> Result<MentionCounts, ComputationError>
where
    Scheme: Into<SchemeType> + Clone,
{
    let (_, _, check_docids, parallel): (SchemeType, String, bool, bool) = config.clone().into();
    metrics::count_inner(system_docs, gold_docs, check_docids, parallel)
}
