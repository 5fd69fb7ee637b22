/**
This module compares two parallel collections of documents (gold and system) and computes the
exact-match precision, recall and f-score of their mentions, overall and per entity type. It also
counts the true positives, false positives and false negatives per mention text.
*/
use crate::document::{Document, DocumentError, Mention};
use crate::reporter::{MentionCounts, Score, ScoringCounts, ScoringResult};
use ahash::{AHashMap, AHashSet};
use itertools::multizip;
use log::trace;
use ndarray::{prelude::*, Zip};
use num::{Float, NumCast};
use rayon::prelude::*;
use std::{
    collections::BTreeSet,
    error::Error,
    fmt::{self, Debug, Display},
};

#[derive(Debug, PartialEq, Clone, Copy)]
/// Error type to represent when the two collections of documents are not of the same length.
pub struct InconsistentLengthError(usize, usize);

impl Display for InconsistentLengthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Inconsistent length between the document collections. The gold collection has length {}, the system collection has length {}",
            self.0, self.1
        )
    }
}
impl Error for InconsistentLengthError {}

#[derive(Debug, PartialEq, Clone)]
/// Error returned when the metrics cannot be computed.
pub enum ComputationError {
    InconsistentLength(InconsistentLengthError),
    /// The documents at position `index` do not have the same identifier
    DocumentIdMismatch {
        index: usize,
        gold: String,
        system: String,
    },
    /// A mention could not be resolved against its document
    Document(DocumentError),
}

impl Display for ComputationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InconsistentLength(length_err) => std::fmt::Display::fmt(length_err, f),
            Self::DocumentIdMismatch {
                index,
                gold,
                system,
            } => write!(
                f,
                "Documents at position {} have different identifiers: gold is {}, system is {}",
                index, gold, system
            ),
            Self::Document(doc_err) => std::fmt::Display::fmt(doc_err, f),
        }
    }
}
impl Error for ComputationError {}

impl From<InconsistentLengthError> for ComputationError {
    fn from(value: InconsistentLengthError) -> Self {
        Self::InconsistentLength(value)
    }
}

impl From<DocumentError> for ComputationError {
    fn from(value: DocumentError) -> Self {
        Self::Document(value)
    }
}

fn check_consistent_length(
    gold_docs: &[Document],
    system_docs: &[Document],
) -> Result<(), InconsistentLengthError> {
    if gold_docs.len() != system_docs.len() {
        return Err(InconsistentLengthError(gold_docs.len(), system_docs.len()));
    }
    Ok(())
}

fn check_document_ids(
    gold_docs: &[Document],
    system_docs: &[Document],
) -> Result<(), ComputationError> {
    for (index, (gold, system)) in gold_docs.iter().zip(system_docs.iter()).enumerate() {
        if gold.id() != system.id() {
            return Err(ComputationError::DocumentIdMismatch {
                index,
                gold: gold.id().to_string(),
                system: system.id().to_string(),
            });
        }
    }
    Ok(())
}

fn check_inputs(
    gold_docs: &[Document],
    system_docs: &[Document],
    check_docids: bool,
) -> Result<(), ComputationError> {
    check_consistent_length(gold_docs, system_docs)?;
    if check_docids {
        check_document_ids(gold_docs, system_docs)?;
    }
    Ok(())
}

/// Outcome of the exact matching of a single mention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    TruePositive,
    FalsePositive,
    FalseNegative,
}

impl From<Outcome> for ScoringCounts {
    fn from(value: Outcome) -> Self {
        let mut counts = ScoringCounts::default();
        match value {
            Outcome::TruePositive => counts.true_positives = 1,
            Outcome::FalsePositive => counts.false_positives = 1,
            Outcome::FalseNegative => counts.false_negatives = 1,
        }
        counts
    }
}

/// Matches the mentions of a gold document with those of a system document. Every mention is
/// returned once, with the document it comes from: system mentions are either true or false
/// positives, gold mentions without a system counterpart are false negatives.
fn match_mentions<'a>(
    gold: &'a Document,
    system: &'a Document,
) -> Vec<(&'a Mention, &'a Document, Outcome)> {
    let gold_set: AHashSet<&Mention> = gold.mentions().iter().collect();
    let system_set: AHashSet<&Mention> = system.mentions().iter().collect();
    let mut matched = Vec::with_capacity(gold_set.len() + system_set.len());
    for mention in system_set.iter() {
        let outcome = if gold_set.contains(mention) {
            Outcome::TruePositive
        } else {
            Outcome::FalsePositive
        };
        matched.push((*mention, system, outcome));
    }
    for mention in gold_set.difference(&system_set) {
        matched.push((*mention, gold, Outcome::FalseNegative));
    }
    matched
}

type TypeCounts<'a> = AHashMap<&'a str, ScoringCounts>;

fn count_types<'a>(gold: &'a Document, system: &'a Document) -> TypeCounts<'a> {
    let mut counts = TypeCounts::default();
    for (mention, _, outcome) in match_mentions(gold, system) {
        *counts.entry(mention.entity_type()).or_default() += ScoringCounts::from(outcome);
    }
    trace!("Document {}: {:?}", gold.id(), counts);
    counts
}

fn merge_type_counts<'a>(mut left: TypeCounts<'a>, right: TypeCounts<'a>) -> TypeCounts<'a> {
    for (entity_type, counts) in right {
        *left.entry(entity_type).or_default() += counts;
    }
    left
}

/// Sums the counts of every document pair. TP, FP and FN are summed before any ratio is computed.
fn collect_type_counts<'a>(
    gold_docs: &'a [Document],
    system_docs: &'a [Document],
    parallel: bool,
) -> TypeCounts<'a> {
    if parallel {
        gold_docs
            .par_iter()
            .zip(system_docs.par_iter())
            .map(|(gold, system)| count_types(gold, system))
            .reduce(TypeCounts::default, merge_type_counts)
    } else {
        gold_docs
            .iter()
            .zip(system_docs.iter())
            .map(|(gold, system)| count_types(gold, system))
            .fold(TypeCounts::default(), merge_type_counts)
    }
}

/// Divides `numerator` by `denominator`, element wise. Elements with a null denominator are set
/// to 0.
///
/// * `numerator`: Numerator of the division
/// * `denominator`: Denominator of the division
/// * `parallel`: Should we replace the null denominators in parallel?
fn prf_divide<F: Float + Send + Sync, D: Dimension>(
    numerator: Array<F, D>,
    mut denominator: Array<F, D>,
    parallel: bool,
) -> Array<F, D> {
    let zero_mask = Zip::from(&denominator).map_collect(|d| {
        if d.is_zero() {
            F::zero()
        } else {
            F::one()
        }
    });
    if parallel {
        denominator.par_mapv_inplace(|v| if v.is_zero() { F::one() } else { v });
    } else {
        denominator.mapv_inplace(|v| if v.is_zero() { F::one() } else { v });
    }
    numerator / denominator * zero_mask
}

/// Precision, recall and f-score for each row of counts.
type PrecisionRecallFScore<F> = (Array1<F>, Array1<F>, Array1<F>);

fn precision_recall_fscore<F: Float + Send + Sync + Debug>(
    counts: &[ScoringCounts],
    parallel: bool,
) -> PrecisionRecallFScore<F> {
    let to_float = |v: usize| -> F { <F as NumCast>::from(v).unwrap_or_else(F::zero) };
    let tp: Array1<F> = counts.iter().map(|c| to_float(c.true_positives)).collect();
    let fp: Array1<F> = counts.iter().map(|c| to_float(c.false_positives)).collect();
    let fn_: Array1<F> = counts.iter().map(|c| to_float(c.false_negatives)).collect();
    let two = F::one() + F::one();

    let precision = prf_divide(tp.clone(), &tp + &fp, parallel);
    let recall = prf_divide(tp.clone(), &tp + &fn_, parallel);
    let fscore = prf_divide(
        precision.mapv(|p| two * p) * &recall,
        &precision + &recall,
        parallel,
    );
    (precision, recall, fscore)
}

fn build_result(type_counts: TypeCounts, parallel: bool) -> ScoringResult {
    let target_names: BTreeSet<&str> = type_counts.keys().copied().collect();
    let mut rows: Vec<ScoringCounts> = target_names
        .iter()
        .map(|name| type_counts.get(name).copied().unwrap_or_default())
        .collect();
    // The last row holds the totals
    let total: ScoringCounts = rows.iter().copied().sum();
    rows.push(total);

    let (p, r, f) = precision_recall_fscore::<f64>(&rows, parallel);
    let mut result = ScoringResult::default();
    for (name, precision, recall, fscore) in multizip((
        target_names.iter().map(Some).chain(std::iter::once(None)),
        p.into_iter(),
        r.into_iter(),
        f.into_iter(),
    )) {
        let score = Score {
            precision,
            recall,
            fscore,
        };
        match name {
            Some(name) => {
                result.type_scores.insert(name.to_string(), score);
            }
            None => result.score = score,
        }
    }
    result
}

/// Computes the exact-match precision, recall and f-score of the system mentions against the gold
/// mentions, overall and per entity type. Documents are paired by position. A system mention is a
/// true positive only if a gold mention of the paired document has the same sentence index, start,
/// end, mention type and entity type.
///
/// * `gold_docs`: Reference documents.
/// * `system_docs`: Predicted documents, one per reference document.
/// * `check_docids`: If true, paired documents must have the same identifier.
///
/// # Example
///
/// ```rust
/// use nerspan::{score_prf, DocumentBuilder, Mention, Token};
///
/// let mut builder = DocumentBuilder::new("doc").unwrap();
/// let tokens = vec![Token::new("New", 0).unwrap(), Token::new("York", 1).unwrap()];
/// builder.create_sentence(tokens).unwrap();
/// builder.add_mention(Mention::new(0, 0, 2, "name", "LOC").unwrap()).unwrap();
/// let gold = builder.build();
/// let system = gold.copy_without_mentions();
///
/// let result = score_prf(&[gold], &[system], true).unwrap();
/// assert_eq!(result.score.precision, 0.0);
/// assert_eq!(result.score.recall, 0.0);
/// assert_eq!(result.type_scores["LOC"].fscore, 0.0);
/// ```
pub fn score_prf(
    gold_docs: &[Document],
    system_docs: &[Document],
    check_docids: bool,
) -> Result<ScoringResult, ComputationError> {
    score_prf_inner(gold_docs, system_docs, check_docids, false)
}

pub(crate) fn score_prf_inner(
    gold_docs: &[Document],
    system_docs: &[Document],
    check_docids: bool,
    parallel: bool,
) -> Result<ScoringResult, ComputationError> {
    check_inputs(gold_docs, system_docs, check_docids)?;
    let type_counts = collect_type_counts(gold_docs, system_docs, parallel);
    Ok(build_result(type_counts, parallel))
}

fn count_texts(gold: &Document, system: &Document) -> Result<MentionCounts, ComputationError> {
    let mut counts = MentionCounts::default();
    for (mention, document, outcome) in match_mentions(gold, system) {
        let text = mention.tokenized_text(document)?;
        counts.record(mention.entity_type(), text, outcome.into());
    }
    Ok(counts)
}

/// Counts the true positives, false positives and false negatives of every mention, keyed by
/// entity type and by the text of the mention (its tokens joined by a space). The text of a system
/// mention is read from the system document, the text of a gold mention from the gold document.
///
/// * `system_docs`: Predicted documents.
/// * `gold_docs`: Reference documents, one per predicted document.
/// * `check_docids`: If true, paired documents must have the same identifier.
pub fn count(
    system_docs: &[Document],
    gold_docs: &[Document],
    check_docids: bool,
) -> Result<MentionCounts, ComputationError> {
    count_inner(system_docs, gold_docs, check_docids, false)
}

pub(crate) fn count_inner(
    system_docs: &[Document],
    gold_docs: &[Document],
    check_docids: bool,
    parallel: bool,
) -> Result<MentionCounts, ComputationError> {
    check_inputs(gold_docs, system_docs, check_docids)?;
    if parallel {
        gold_docs
            .par_iter()
            .zip(system_docs.par_iter())
            .map(|(gold, system)| count_texts(gold, system))
            .try_reduce(MentionCounts::default, |left, right| Ok(left.merge(right)))
    } else {
        let mut counts = MentionCounts::default();
        for (gold, system) in gold_docs.iter().zip(system_docs.iter()) {
            counts = counts.merge(count_texts(gold, system)?);
        }
        Ok(counts)
    }
}
