//! In-memory triple set.
//!
//! Only IRIs can be subjects and predicates; blank nodes are not modelled.
//! Triples live in a `BTreeSet`, so iteration order (and therefore the
//! serialized file) depends only on content.

use std::collections::BTreeSet;

/// A literal value with its optional language tag or datatype IRI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    pub lexical: String,
    pub language: Option<String>,
    pub datatype: Option<String>,
}

impl Literal {
    pub fn plain(lexical: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            language: None,
            datatype: None,
        }
    }
}

/// An object position value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    Iri(String),
    Literal(Literal),
}

impl Term {
    pub fn iri(iri: impl Into<String>) -> Self {
        Self::Iri(iri.into())
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Self::Iri(iri) => Some(iri),
            Self::Literal(_) => None,
        }
    }

    /// The IRI or the literal's lexical form.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Iri(iri) => iri,
            Self::Literal(literal) => &literal.lexical,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: impl Into<String>, predicate: impl Into<String>, object: Term) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    triples: BTreeSet<Triple>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Returns `false` if the triple was already present.
    pub fn insert(&mut self, triple: Triple) -> bool {
        self.triples.insert(triple)
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    /// All triples, ordered by subject, predicate, object.
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    pub fn objects<'a>(&'a self, subject: &'a str, predicate: &'a str) -> impl Iterator<Item = &'a Term> {
        self.with_subject(subject)
            .filter(move |t| t.predicate == predicate)
            .map(|t| &t.object)
    }

    /// First object of `subject predicate ?`.
    pub fn value(&self, subject: &str, predicate: &str) -> Option<&Term> {
        self.triples
            .iter()
            .find(|t| t.subject == subject && t.predicate == predicate)
            .map(|t| &t.object)
    }

    pub fn subjects<'a>(&'a self, predicate: &'a str, object: &'a Term) -> impl Iterator<Item = &'a str> {
        self.triples
            .iter()
            .filter(move |t| t.predicate == predicate && &t.object == object)
            .map(|t| t.subject.as_str())
    }

    /// Triples whose subject is `subject`, using the set's ordering.
    pub fn with_subject<'a>(&'a self, subject: &'a str) -> impl Iterator<Item = &'a Triple> {
        self.triples
            .iter()
            .skip_while(move |t| t.subject.as_str() < subject)
            .take_while(move |t| t.subject == subject)
    }

    /// Remove every triple about `subject`. Returns how many were removed.
    pub fn remove_subject(&mut self, subject: &str) -> usize {
        let before = self.triples.len();
        self.triples.retain(|t| t.subject != subject);
        before - self.triples.len()
    }
}

impl FromIterator<Triple> for Graph {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        Self {
            triples: iter.into_iter().collect(),
        }
    }
}
