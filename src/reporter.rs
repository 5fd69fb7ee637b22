/**
This modules holds the results of the scoring functions and gives a few tools to prettyprint them.
*/
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Deref};

/// Precision, recall and f-score of a set of mentions.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct Score {
    /// Precision metric
    pub precision: f64,
    /// Recall metric
    pub recall: f64,
    /// Fscore metric
    pub fscore: f64,
}

impl Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}, {}", self.precision, self.recall, self.fscore)
    }
}

/// Overall score and score of every entity type found in the gold or system documents. It is
/// built by the `score_prf` function and acts as a dataframe when displayed.
///
/// # Example
///
/// ```rust
/// use nerspan::{score_prf, DocumentBuilder, Mention, Token};
///
/// let mut gold = DocumentBuilder::new("doc").unwrap();
/// let tokens = vec![Token::new("Ada", 0).unwrap(), Token::new("Lovelace", 1).unwrap()];
/// gold.create_sentence(tokens).unwrap();
/// gold.add_mention(Mention::new(0, 0, 2, "name", "PER").unwrap()).unwrap();
/// let gold = gold.build();
///
/// let system = gold
///     .copy_with_mentions(vec![
///         Mention::new(0, 0, 2, "name", "PER").unwrap(),
///         Mention::new(0, 1, 2, "name", "LOC").unwrap(),
///     ])
///     .unwrap();
///
/// let result = score_prf(&[gold], &[system], true).unwrap();
///
/// let expected_report = "Type, Precision, Recall, Fscore
/// Overall, 0.5, 1, 0.6666666666666666
/// LOC, 0, 0, 0
/// PER, 1, 1, 1\n";
///
/// assert_eq!(expected_report, result.to_string());
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct ScoringResult {
    /// Score computed over every mention, whatever its entity type
    pub score: Score,
    /// Score of the mentions of each entity type
    pub type_scores: BTreeMap<String, Score>,
}

impl ScoringResult {
    pub fn type_score(&self, entity_type: &str) -> Option<&Score> {
        self.type_scores.get(entity_type)
    }
}

impl Display for ScoringResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Type, Precision, Recall, Fscore")?;
        writeln!(f, "Overall, {}", self.score)?;
        for (entity_type, score) in self.type_scores.iter() {
            writeln!(f, "{}, {}", entity_type, score)?
        }
        Ok(())
    }
}

/// Number of true positives, false positives and false negatives.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScoringCounts {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl Add for ScoringCounts {
    type Output = Self;
    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

impl AddAssign for ScoringCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.true_positives += rhs.true_positives;
        self.false_positives += rhs.false_positives;
        self.false_negatives += rhs.false_negatives;
    }
}

impl Sum for ScoringCounts {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl Display for ScoringCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}, {}, {}",
            self.true_positives, self.false_positives, self.false_negatives
        )
    }
}

/// Counts of every mention text, grouped by entity type. The text of a mention is its tokens
/// joined by a single space. It is built by the `count` function.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct MentionCounts {
    counts: BTreeMap<String, BTreeMap<String, ScoringCounts>>,
}

impl Deref for MentionCounts {
    type Target = BTreeMap<String, BTreeMap<String, ScoringCounts>>;
    fn deref(&self) -> &Self::Target {
        &self.counts
    }
}

impl From<MentionCounts> for BTreeMap<String, BTreeMap<String, ScoringCounts>> {
    fn from(value: MentionCounts) -> Self {
        value.counts
    }
}

impl MentionCounts {
    /// Counts of the mention `text` of type `entity_type`, if it was seen.
    pub fn get(&self, entity_type: &str, text: &str) -> Option<&ScoringCounts> {
        self.counts.get(entity_type)?.get(text)
    }

    /// Sum of the counts of every mention text.
    pub fn totals(&self) -> ScoringCounts {
        self.counts
            .values()
            .flat_map(|texts| texts.values().copied())
            .sum()
    }

    pub(crate) fn record(&mut self, entity_type: &str, text: String, counts: ScoringCounts) {
        *self
            .counts
            .entry(entity_type.to_string())
            .or_default()
            .entry(text)
            .or_default() += counts;
    }

    pub(crate) fn merge(mut self, other: Self) -> Self {
        for (entity_type, texts) in other.counts {
            let entry = self.counts.entry(entity_type).or_default();
            for (text, counts) in texts {
                *entry.entry(text).or_default() += counts;
            }
        }
        self
    }
}

/// The MentionCounts struct acts as a dataframe when displayed.
impl Display for MentionCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Type, Mention, TP, FP, FN")?;
        for (entity_type, texts) in self.counts.iter() {
            for (text, counts) in texts.iter() {
                writeln!(f, "{}, {}, {}", entity_type, text, counts)?
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::tests::{gold_doc, system_doc};
    use crate::metrics::{count, score_prf};

    #[test]
    fn test_scoring_result_display() {
        let result = score_prf(&[gold_doc()], &[system_doc()], true).unwrap();
        let expected = "Type, Precision, Recall, Fscore
Overall, 0.75, 0.6, 0.6666666666666665
LOC, 0.5, 1, 0.6666666666666666
ORG, 1, 0.5, 0.6666666666666666
PER, 1, 0.5, 0.6666666666666666\n";
        assert_eq!(expected, result.to_string());
        assert_eq!(result.type_score("LOC").unwrap().precision, 0.5);
        assert!(result.type_score("MISC").is_none());
    }

    #[test]
    fn test_mention_counts_display() {
        let counts = count(&[system_doc()], &[gold_doc()], true).unwrap();
        let expected = "Type, Mention, TP, FP, FN
LOC, bar baz, 0, 1, 0
LOC, foo bar baz, 1, 0, 0
ORG, bar, 1, 0, 0
ORG, bar baz, 0, 0, 1
PER, baz, 0, 0, 1
PER, foo, 1, 0, 0\n";
        assert_eq!(expected, counts.to_string());
    }

    #[test]
    fn test_merge_mention_counts() {
        let one = ScoringCounts {
            true_positives: 1,
            false_positives: 0,
            false_negatives: 0,
        };
        let two = ScoringCounts {
            true_positives: 0,
            false_positives: 2,
            false_negatives: 1,
        };
        let mut left = MentionCounts::default();
        left.record("PER", String::from("Ada"), one);
        let mut right = MentionCounts::default();
        right.record("PER", String::from("Ada"), two);
        right.record("LOC", String::from("Paris"), one);
        let merged = left.merge(right);
        assert_eq!(merged.get("PER", "Ada"), Some(&(one + two)));
        assert_eq!(merged.get("LOC", "Paris"), Some(&one));
        assert_eq!(merged.totals(), one + two + one);
        assert_eq!(merged.len(), 2);
    }
}
