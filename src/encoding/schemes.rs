/**
This module describes the tagging schemes: the prefixes each of them accepts, the boundary role
each prefix encodes and the parsing of a raw tag (e.g. `"B-PER"`) against a scheme.
*/
use enum_iterator::{all, Sequence};
use std::error::Error;
use std::fmt::Display;
use std::str::FromStr;

/// Tag used for tokens outside of any mention. It is accepted by every scheme.
pub(crate) const OUTSIDE: &str = "O";
/// Character separating the prefix from the entity type.
pub(crate) const DELIMITER: char = '-';

/// Every name accepted by `get_mention_encoder` and by the `FromStr` implementation of
/// `SchemeType`.
pub const SUPPORTED_ENCODINGS: [&str; 10] = [
    "IO", "IOB", "IOB1", "BIO", "IOB2", "BIOU", "BILOU", "BMES", "BIOES", "IOBES",
];

#[derive(Debug, PartialEq, Hash, Clone, Copy, Sequence, Eq)]
/// Prefix of a tag, indicating where the token is located inside a mention. Every prefix is a
/// single ascii character.
pub(crate) enum Prefix {
    I,
    O,
    B,
    E,
    S,
    U,
    L,
    M,
}

impl FromStr for Prefix {
    type Err = ParsingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "I" => Ok(Self::I),
            "O" => Ok(Self::O),
            "B" => Ok(Self::B),
            "E" => Ok(Self::E),
            "S" => Ok(Self::S),
            "U" => Ok(Self::U),
            "L" => Ok(Self::L),
            "M" => Ok(Self::M),
            _ => Err(ParsingError::PrefixError(String::from(s))),
        }
    }
}

impl Prefix {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Prefix::I => "I",
            Prefix::O => "O",
            Prefix::B => "B",
            Prefix::E => "E",
            Prefix::S => "S",
            Prefix::U => "U",
            Prefix::L => "L",
            Prefix::M => "M",
        }
    }
}

impl Display for Prefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, PartialEq, Hash, Clone, Copy, Eq)]
/// The boundary information carried by a prefix. Different schemes use different letters for the
/// same role (e.g. `L` in BILOU and `E` in BIOES are both `Last`).
pub(crate) enum Role {
    /// Opens a new mention
    Begin,
    /// Continues the mention currently open. Opens one if nothing compatible is open.
    Inside,
    /// Last token of the mention currently open
    Last,
    /// Mention made of a single token
    Unit,
    Outside,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Could not parse a tag against a scheme.
pub enum ParsingError {
    /// The prefix is not one of the known prefixes
    PrefixError(String),
    /// The tag has a prefix that requires an entity type, but has no entity type (e.g. `"I"` or
    /// `"I-"`)
    MissingEntityType(String),
    /// The outside tag carries an entity type (e.g. `"O-PER"`)
    UnexpectedEntityType(String),
    /// The prefix is valid but not part of the scheme's alphabet
    PrefixNotAllowed { tag: String, scheme: SchemeType },
}

impl Display for ParsingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PrefixError(s) => write!(
                f,
                "Could not parse the following string into a Prefix: {}",
                s
            ),
            Self::MissingEntityType(tag) => write!(f, "Tag {:?} has no entity type", tag),
            Self::UnexpectedEntityType(tag) => {
                write!(f, "Outside tag {:?} cannot have an entity type", tag)
            }
            Self::PrefixNotAllowed { tag, scheme } => write!(
                f,
                "The prefix of tag {:?} is not allowed by the {} scheme",
                tag, scheme
            ),
        }
    }
}

impl Error for ParsingError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// The requested scheme name is not registered.
pub struct UnknownSchemeError(pub String);

impl Display for UnknownSchemeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Unknown mention encoding: {}. Supported encodings are: {}",
            self.0,
            SUPPORTED_ENCODINGS.join(", ")
        )
    }
}

impl Error for UnknownSchemeError {}

/// A tag parsed against a scheme. The entity type borrows from the raw tag and is empty for the
/// outside tag.
#[derive(Debug, PartialEq, Clone, Copy)]
pub(crate) struct InnerTag<'a> {
    pub(crate) prefix: Prefix,
    pub(crate) role: Role,
    pub(crate) entity_type: &'a str,
}

impl<'a> InnerTag<'a> {
    /// Parses `tag` into a prefix and an entity type. The prefix is everything before the first
    /// delimiter, the entity type everything after it.
    pub(crate) fn try_new(tag: &'a str, scheme: SchemeType) -> Result<Self, ParsingError> {
        let (raw_prefix, entity_type) = match tag.split_once(DELIMITER) {
            Some((p, t)) => (p, t),
            None => (tag, ""),
        };
        let prefix = Prefix::from_str(raw_prefix)?;
        match (prefix, entity_type.is_empty()) {
            (Prefix::O, false) => return Err(ParsingError::UnexpectedEntityType(tag.into())),
            (Prefix::O, true) if tag != OUTSIDE => {
                return Err(ParsingError::UnexpectedEntityType(tag.into()))
            }
            (Prefix::O, true) => (),
            (_, true) => return Err(ParsingError::MissingEntityType(tag.into())),
            (_, false) => (),
        };
        let role = scheme
            .role_of(prefix)
            .ok_or_else(|| ParsingError::PrefixNotAllowed {
                tag: tag.into(),
                scheme,
            })?;
        Ok(Self {
            prefix,
            role,
            entity_type,
        })
    }
}

#[derive(Debug, Clone, Copy, Sequence, Hash, Eq, PartialEq, PartialOrd, Ord)]
/// The supported tagging schemes. Each scheme is described by the prefixes it accepts and the role
/// of each prefix. The outside prefix `O` is accepted by every scheme, BMES included.
///
/// * IO: `I` and `O` only. No explicit boundary.
/// * IOB1: `B` is used only between two touching mentions of the same type.
/// * BIO (IOB2): every mention starts with `B`.
/// * BIOU: BIO plus `U` for single-token mentions.
/// * BILOU: BIOU plus `L` for the last token of multi-token mentions.
/// * BMES: `B`, `M` (middle), `E` (end) and `S` (single).
/// * BIOES (IOBES): BIO plus `E` (end) and `S` (single).
pub enum SchemeType {
    IO,
    IOB1,
    BIO,
    BIOU,
    BILOU,
    BMES,
    BIOES,
}

impl SchemeType {
    const IO_TABLE: [(Prefix, Role); 2] = [(Prefix::I, Role::Inside), (Prefix::O, Role::Outside)];
    const IOB1_TABLE: [(Prefix, Role); 3] = [
        (Prefix::I, Role::Inside),
        (Prefix::B, Role::Begin),
        (Prefix::O, Role::Outside),
    ];
    const BIO_TABLE: [(Prefix, Role); 3] = [
        (Prefix::B, Role::Begin),
        (Prefix::I, Role::Inside),
        (Prefix::O, Role::Outside),
    ];
    const BIOU_TABLE: [(Prefix, Role); 4] = [
        (Prefix::B, Role::Begin),
        (Prefix::I, Role::Inside),
        (Prefix::O, Role::Outside),
        (Prefix::U, Role::Unit),
    ];
    const BILOU_TABLE: [(Prefix, Role); 5] = [
        (Prefix::B, Role::Begin),
        (Prefix::I, Role::Inside),
        (Prefix::L, Role::Last),
        (Prefix::O, Role::Outside),
        (Prefix::U, Role::Unit),
    ];
    const BMES_TABLE: [(Prefix, Role); 5] = [
        (Prefix::B, Role::Begin),
        (Prefix::M, Role::Inside),
        (Prefix::E, Role::Last),
        (Prefix::S, Role::Unit),
        (Prefix::O, Role::Outside),
    ];
    const BIOES_TABLE: [(Prefix, Role); 5] = [
        (Prefix::B, Role::Begin),
        (Prefix::I, Role::Inside),
        (Prefix::O, Role::Outside),
        (Prefix::E, Role::Last),
        (Prefix::S, Role::Unit),
    ];

    /// The prefixes accepted by the scheme and their role.
    pub(crate) fn table(&self) -> &'static [(Prefix, Role)] {
        match self {
            Self::IO => &Self::IO_TABLE,
            Self::IOB1 => &Self::IOB1_TABLE,
            Self::BIO => &Self::BIO_TABLE,
            Self::BIOU => &Self::BIOU_TABLE,
            Self::BILOU => &Self::BILOU_TABLE,
            Self::BMES => &Self::BMES_TABLE,
            Self::BIOES => &Self::BIOES_TABLE,
        }
    }

    pub(crate) fn role_of(&self, prefix: Prefix) -> Option<Role> {
        self.table()
            .iter()
            .find(|(p, _)| *p == prefix)
            .map(|(_, r)| *r)
    }

    pub(crate) fn has_role(&self, role: Role) -> bool {
        self.table().iter().any(|(_, r)| *r == role)
    }

    /// Prefix used to write `role`. Roles the scheme cannot express are written as `Inside`, which
    /// every scheme has.
    pub(crate) fn prefix_for(&self, role: Role) -> Prefix {
        let lookup = |wanted: Role| {
            self.table()
                .iter()
                .find(|(_, r)| *r == wanted)
                .map(|(p, _)| *p)
        };
        lookup(role)
            .or_else(|| lookup(Role::Inside))
            .unwrap_or(Prefix::I)
    }

    /// Does every mention start with an explicit `Begin` (or `Unit`) prefix? IO and IOB1 only use
    /// `B` (if at all) to separate touching mentions of the same type.
    pub(crate) fn opens_every_span(&self) -> bool {
        !matches!(self, Self::IO | Self::IOB1)
    }

    /// The prefixes of the scheme, e.g. `["B", "I", "L", "O", "U"]` for BILOU.
    pub fn alphabet(&self) -> Vec<&'static str> {
        self.table().iter().map(|(p, _)| p.as_str()).collect()
    }

    /// Canonical name of the scheme.
    pub fn name(&self) -> &'static str {
        match self {
            Self::IO => "IO",
            Self::IOB1 => "IOB1",
            Self::BIO => "BIO",
            Self::BIOU => "BIOU",
            Self::BILOU => "BILOU",
            Self::BMES => "BMES",
            Self::BIOES => "BIOES",
        }
    }

    /// Every scheme, in declaration order.
    pub fn list_schemes() -> Vec<SchemeType> {
        all::<SchemeType>().collect()
    }
}

impl Display for SchemeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Registry of the scheme names. The lookup is case sensitive.
impl FromStr for SchemeType {
    type Err = UnknownSchemeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IO" => Ok(Self::IO),
            "IOB" | "IOB1" => Ok(Self::IOB1),
            "BIO" | "IOB2" => Ok(Self::BIO),
            "BIOU" => Ok(Self::BIOU),
            "BILOU" => Ok(Self::BILOU),
            "BMES" => Ok(Self::BMES),
            "BIOES" | "IOBES" => Ok(Self::BIOES),
            _ => Err(UnknownSchemeError(String::from(s))),
        }
    }
}

/// Returns the encoder registered under `name`.
pub fn get_mention_encoder(name: &str) -> Result<SchemeType, UnknownSchemeError> {
    SchemeType::from_str(name)
}
