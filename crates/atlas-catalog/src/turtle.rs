//! Turtle reading and writing for the subset the catalog needs.
//!
//! Supported on read: `@prefix`/`PREFIX`, `@base`/`BASE`, IRI references
//! with `\u`/`\U` escapes, prefixed names, `a`, predicate lists (`;`),
//! object lists (`,`), string literals in all four quoting styles with a
//! language tag or datatype, numbers, booleans and comments. Blank nodes and
//! collections are parsed but not modelled: any statement that has one as
//! subject or object is dropped.
//!
//! The writer emits subjects in sorted order with their predicates grouped,
//! so equal graphs always serialize to identical text.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::Write as _;

use crate::graph::{Graph, Literal, Term, Triple};
use crate::vocab::RDF_TYPE;

const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

/// A syntax error with the 1-based line it was detected on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {message}")]
pub struct SyntaxError {
    pub line: usize,
    pub message: String,
}

/// Parse a Turtle document.
pub fn parse(input: &str) -> Result<Graph, SyntaxError> {
    Parser::new(input).document()
}

struct Parser {
    src: Vec<char>,
    pos: usize,
    line: usize,
    prefixes: HashMap<String, String>,
    base: Option<String>,
    graph: Graph,
    dropped: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        Self {
            src: input.chars().collect(),
            pos: 0,
            line: 1,
            prefixes: HashMap::new(),
            base: None,
            graph: Graph::new(),
            dropped: 0,
        }
    }

    fn error(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError {
            line: self.line,
            message: message.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.src.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.src.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char, context: &str) -> Result<(), SyntaxError> {
        match self.peek() {
            Some(found) if found == c => {
                self.bump();
                Ok(())
            }
            Some(found) => Err(self.error(format!("expected '{c}' {context}, found '{found}'"))),
            None => Err(self.error(format!("expected '{c}' {context}, found end of input"))),
        }
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
            } else if c == '#' {
                while let Some(c) = self.peek()
                    && c != '\n'
                {
                    self.bump();
                }
            } else {
                break;
            }
        }
    }

    fn document(mut self) -> Result<Graph, SyntaxError> {
        loop {
            self.skip_ws();
            if self.peek().is_none() {
                if self.dropped > 0 {
                    tracing::debug!(statements = self.dropped, "Dropped statements involving blank nodes");
                }
                return Ok(self.graph);
            }
            self.statement()?;
        }
    }

    fn statement(&mut self) -> Result<(), SyntaxError> {
        if self.eat('@') {
            let word = self.word();
            match word.as_str() {
                "prefix" => self.prefix_declaration()?,
                "base" => self.base_declaration()?,
                other => return Err(self.error(format!("unknown directive '@{other}'"))),
            }
            self.skip_ws();
            return self.expect('.', "after directive");
        }

        // SPARQL-style directives carry no trailing dot
        let (pos, line) = (self.pos, self.line);
        let word = self.word();
        if self.peek().is_some_and(char::is_whitespace) {
            if word.eq_ignore_ascii_case("prefix") {
                return self.prefix_declaration();
            }
            if word.eq_ignore_ascii_case("base") {
                return self.base_declaration();
            }
        }
        self.pos = pos;
        self.line = line;

        self.triples()
    }

    fn word(&mut self) -> String {
        let mut word = String::new();
        while let Some(c) = self.peek()
            && c.is_ascii_alphabetic()
        {
            word.push(c);
            self.bump();
        }
        word
    }

    fn prefix_declaration(&mut self) -> Result<(), SyntaxError> {
        self.skip_ws();
        let mut prefix = String::new();
        while let Some(c) = self.peek()
            && is_prefix_char(c)
        {
            prefix.push(c);
            self.bump();
        }
        self.expect(':', "after prefix label")?;
        self.skip_ws();
        if self.peek() != Some('<') {
            return Err(self.error("expected IRI in prefix declaration"));
        }
        let namespace = self.iri_ref()?;
        self.prefixes.insert(prefix, namespace);
        Ok(())
    }

    fn base_declaration(&mut self) -> Result<(), SyntaxError> {
        self.skip_ws();
        if self.peek() != Some('<') {
            return Err(self.error("expected IRI in base declaration"));
        }
        let base = self.iri_ref()?;
        self.base = Some(base);
        Ok(())
    }

    fn triples(&mut self) -> Result<(), SyntaxError> {
        let subject = self.subject()?;
        self.skip_ws();
        // `[ ... ] .` is a complete statement
        if subject.is_none() && self.eat('.') {
            return Ok(());
        }
        self.predicate_objects(subject.as_deref())?;
        self.skip_ws();
        self.expect('.', "at end of triples")
    }

    /// Predicate-object list of one subject. Without a subject the
    /// statements are parsed and dropped.
    fn predicate_objects(&mut self, subject: Option<&str>) -> Result<(), SyntaxError> {
        loop {
            self.skip_ws();
            let predicate = self.verb()?;
            loop {
                self.skip_ws();
                match (subject, self.object()?) {
                    (Some(subject), Some(object)) => {
                        self.graph
                            .insert(Triple::new(subject, predicate.clone(), object));
                    }
                    _ => self.dropped += 1,
                }
                self.skip_ws();
                if !self.eat(',') {
                    break;
                }
            }
            self.skip_ws();
            if !self.eat(';') {
                break;
            }
            // Repeated and trailing semicolons are allowed
            loop {
                self.skip_ws();
                if !self.eat(';') {
                    break;
                }
            }
            if matches!(self.peek(), Some('.' | ']')) {
                break;
            }
        }
        Ok(())
    }

    fn subject(&mut self) -> Result<Option<String>, SyntaxError> {
        if self.at_blank_node() {
            self.blank_node()?;
            return Ok(None);
        }
        self.iri().map(Some)
    }

    fn verb(&mut self) -> Result<String, SyntaxError> {
        if self.peek() == Some('a') && self.peek_at(1).is_none_or(|c| c.is_whitespace() || c == '<') {
            self.bump();
            return Ok(RDF_TYPE.to_string());
        }
        self.iri()
    }

    /// An object term, or `None` for a blank node or collection.
    fn object(&mut self) -> Result<Option<Term>, SyntaxError> {
        if self.at_blank_node() {
            self.blank_node()?;
            return Ok(None);
        }
        let term = match self.peek() {
            Some('"' | '\'') => Term::Literal(self.literal()?),
            Some(c) if c.is_ascii_digit() || c == '+' || c == '-' => Term::Literal(self.numeric()?),
            Some('.') if self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) => {
                Term::Literal(self.numeric()?)
            }
            Some('t' | 'f') => {
                let word: String = self.src[self.pos..]
                    .iter()
                    .take_while(|c| c.is_ascii_alphabetic())
                    .collect();
                let after = self.peek_at(word.len());
                if (word == "true" || word == "false") && after != Some(':') {
                    self.pos += word.len();
                    Term::Literal(Literal {
                        lexical: word,
                        language: None,
                        datatype: Some(format!("{XSD}boolean")),
                    })
                } else {
                    Term::Iri(self.iri()?)
                }
            }
            _ => Term::Iri(self.iri()?),
        };
        Ok(Some(term))
    }

    fn at_blank_node(&self) -> bool {
        match self.peek() {
            Some('[' | '(') => true,
            Some('_') => self.peek_at(1) == Some(':'),
            _ => false,
        }
    }

    /// Consume a labelled blank node, an anonymous property list or a
    /// collection. The graph does not model blank nodes.
    fn blank_node(&mut self) -> Result<(), SyntaxError> {
        if self.eat('(') {
            loop {
                self.skip_ws();
                if self.eat(')') {
                    return Ok(());
                }
                if self.peek().is_none() {
                    return Err(self.error("unterminated collection"));
                }
                self.object()?;
            }
        }
        if self.eat('[') {
            self.skip_ws();
            if !self.eat(']') {
                self.predicate_objects(None)?;
                self.skip_ws();
                self.expect(']', "to close blank node")?;
            }
            return Ok(());
        }

        self.pos += 2;
        while let Some(c) = self.peek()
            && (c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
        {
            self.bump();
        }
        while self.src[self.pos - 1] == '.' {
            self.pos -= 1;
        }
        Ok(())
    }

    fn iri(&mut self) -> Result<String, SyntaxError> {
        match self.peek() {
            Some('<') => self.iri_ref(),
            Some('[' | '(') => Err(self.error("blank node where an IRI is required")),
            Some('_') if self.peek_at(1) == Some(':') => {
                Err(self.error("blank node where an IRI is required"))
            }
            Some(_) => self.prefixed_name(),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn iri_ref(&mut self) -> Result<String, SyntaxError> {
        self.expect('<', "to open IRI")?;
        let mut iri = String::new();
        loop {
            if matches!(self.peek(), None | Some('\n')) {
                return Err(self.error("unterminated IRI"));
            }
            match self.bump() {
                None => return Err(self.error("unterminated IRI")),
                Some('>') => break,
                Some(c @ ('<' | '"' | '{' | '}' | '|' | '^' | '`')) => {
                    return Err(self.error(format!("invalid character '{c}' in IRI")));
                }
                Some('\\') => {
                    let c = match self.bump() {
                        Some('u') => self.hex_escape(4)?,
                        Some('U') => self.hex_escape(8)?,
                        _ => return Err(self.error("invalid escape in IRI")),
                    };
                    iri.push(c);
                }
                Some(c) => iri.push(c),
            }
        }
        Ok(self.resolve(iri))
    }

    fn hex_escape(&mut self, digits: usize) -> Result<char, SyntaxError> {
        let mut hex = String::with_capacity(digits);
        for _ in 0..digits {
            match self.bump() {
                Some(c) if c.is_ascii_hexdigit() => hex.push(c),
                _ => return Err(self.error("invalid unicode escape")),
            }
        }
        u32::from_str_radix(&hex, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| self.error(format!("invalid code point U+{hex}")))
    }

    fn prefixed_name(&mut self) -> Result<String, SyntaxError> {
        let mut prefix = String::new();
        while let Some(c) = self.peek()
            && is_prefix_char(c)
        {
            prefix.push(c);
            self.bump();
        }
        if self.peek() != Some(':') {
            return Err(match self.peek() {
                Some(c) if prefix.is_empty() => self.error(format!("unexpected character '{c}'")),
                _ => self.error(format!("unexpected token '{prefix}'")),
            });
        }
        self.bump();

        let mut local = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                self.bump();
                match self.bump() {
                    Some(escaped) if !escaped.is_whitespace() => local.push(escaped),
                    _ => return Err(self.error("invalid escape in prefixed name")),
                }
            } else if c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':' | '%') {
                local.push(c);
                self.bump();
            } else {
                break;
            }
        }
        // A trailing dot ends the statement
        while local.ends_with('.') {
            local.pop();
            self.pos -= 1;
        }

        let namespace = self
            .prefixes
            .get(&prefix)
            .ok_or_else(|| self.error(format!("undefined prefix '{prefix}:'")))?;
        Ok(format!("{namespace}{local}"))
    }

    fn literal(&mut self) -> Result<Literal, SyntaxError> {
        let lexical = self.string()?;
        let mut literal = Literal::plain(lexical);
        if self.eat('@') {
            let mut tag = String::new();
            while let Some(c) = self.peek()
                && (c.is_ascii_alphanumeric() || c == '-')
            {
                tag.push(c);
                self.bump();
            }
            if tag.is_empty() {
                return Err(self.error("empty language tag"));
            }
            literal.language = Some(tag);
        } else if self.peek() == Some('^') && self.peek_at(1) == Some('^') {
            self.pos += 2;
            literal.datatype = Some(self.iri()?);
        }
        Ok(literal)
    }

    fn string(&mut self) -> Result<String, SyntaxError> {
        let Some(quote) = self.bump() else {
            return Err(self.error("expected string"));
        };
        let long = self.peek() == Some(quote) && self.peek_at(1) == Some(quote);
        if long {
            self.pos += 2;
        }
        let start_line = self.line;

        let mut out = String::new();
        loop {
            let c = match self.peek() {
                None => {
                    return Err(SyntaxError {
                        line: start_line,
                        message: "unterminated string literal".into(),
                    });
                }
                Some('\n' | '\r') if !long => return Err(self.error("newline in string literal")),
                Some(c) => {
                    self.bump();
                    c
                }
            };
            match c {
                c if c == quote && !long => break,
                c if c == quote && self.peek() == Some(quote) && self.peek_at(1) == Some(quote) => {
                    self.pos += 2;
                    break;
                }
                '\\' => {
                    let escaped = match self.bump() {
                        Some('t') => '\t',
                        Some('b') => '\u{8}',
                        Some('n') => '\n',
                        Some('r') => '\r',
                        Some('f') => '\u{c}',
                        Some('"') => '"',
                        Some('\'') => '\'',
                        Some('\\') => '\\',
                        Some('u') => self.hex_escape(4)?,
                        Some('U') => self.hex_escape(8)?,
                        _ => return Err(self.error("invalid escape in string literal")),
                    };
                    out.push(escaped);
                }
                c => out.push(c),
            }
        }
        Ok(out)
    }

    fn numeric(&mut self) -> Result<Literal, SyntaxError> {
        let mut lexical = String::new();
        while let Some(c) = self.peek()
            && (c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
        {
            lexical.push(c);
            self.bump();
        }
        while lexical.ends_with('.') {
            lexical.pop();
            self.pos -= 1;
        }
        if !lexical.chars().any(|c| c.is_ascii_digit()) {
            return Err(self.error(format!("invalid number '{lexical}'")));
        }
        let kind = if lexical.contains(['e', 'E']) {
            "double"
        } else if lexical.contains('.') {
            "decimal"
        } else {
            "integer"
        };
        Ok(Literal {
            lexical,
            language: None,
            datatype: Some(format!("{XSD}{kind}")),
        })
    }

    /// Resolve a relative IRI reference against the current base.
    fn resolve(&self, iri: String) -> String {
        match &self.base {
            Some(base) if !has_scheme(&iri) => resolve_against(base, &iri),
            _ => iri,
        }
    }
}

fn is_prefix_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.')
}

fn has_scheme(iri: &str) -> bool {
    let Some((scheme, _)) = iri.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn resolve_against(base: &str, reference: &str) -> String {
    let without_fragment = base.split('#').next().unwrap_or(base);
    if reference.is_empty() {
        return without_fragment.to_string();
    }
    if reference.starts_with('#') {
        return format!("{without_fragment}{reference}");
    }
    if let Some(rest) = reference.strip_prefix("//") {
        let scheme = base.split(':').next().unwrap_or("");
        return format!("{scheme}://{rest}");
    }
    let without_query = without_fragment.split('?').next().unwrap_or(without_fragment);
    if reference.starts_with('/') {
        let authority_end = without_query
            .find("://")
            .map(|i| {
                let after = i + 3;
                without_query[after..]
                    .find('/')
                    .map_or(without_query.len(), |j| after + j)
            })
            .unwrap_or_else(|| without_query.find(':').map_or(0, |i| i + 1));
        return format!("{}{reference}", &without_query[..authority_end]);
    }
    match without_query.rfind('/') {
        Some(i) => format!("{}{reference}", &without_query[..=i]),
        None => format!("{without_query}{reference}"),
    }
}

/// Serialize `graph`, abbreviating IRIs with `prefixes` (label, namespace).
///
/// Only prefixes that end up used are declared.
pub fn write(graph: &Graph, prefixes: &[(&str, &str)]) -> String {
    let mut used = BTreeSet::new();
    let mut body = String::new();

    let mut by_subject: BTreeMap<&str, BTreeMap<&str, Vec<&Term>>> = BTreeMap::new();
    for triple in graph.iter() {
        by_subject
            .entry(triple.subject.as_str())
            .or_default()
            .entry(triple.predicate.as_str())
            .or_default()
            .push(&triple.object);
    }

    for (subject, predicates) in &by_subject {
        if !body.is_empty() {
            body.push('\n');
        }
        body.push_str(&format_iri(subject, prefixes, &mut used));
        for (i, (predicate, objects)) in predicates.iter().enumerate() {
            if i > 0 {
                body.push_str(" ;\n   ");
            }
            body.push(' ');
            if *predicate == RDF_TYPE {
                body.push('a');
            } else {
                body.push_str(&format_iri(predicate, prefixes, &mut used));
            }
            let rendered: Vec<String> = objects
                .iter()
                .map(|object| format_term(object, prefixes, &mut used))
                .collect();
            let _ = write!(body, " {}", rendered.join(", "));
        }
        body.push_str(" .\n");
    }

    let mut out = String::new();
    for (label, namespace) in prefixes {
        if used.contains(label) {
            let _ = writeln!(out, "@prefix {label}: <{}> .", escape_iri(namespace));
        }
    }
    if !out.is_empty() && !body.is_empty() {
        out.push('\n');
    }
    out.push_str(&body);
    out
}

fn format_term<'a>(term: &Term, prefixes: &[(&'a str, &str)], used: &mut BTreeSet<&'a str>) -> String {
    match term {
        Term::Iri(iri) => format_iri(iri, prefixes, used),
        Term::Literal(literal) => {
            let mut out = format!("\"{}\"", escape_string(&literal.lexical));
            if let Some(language) = &literal.language {
                let _ = write!(out, "@{language}");
            } else if let Some(datatype) = &literal.datatype {
                let _ = write!(out, "^^{}", format_iri(datatype, prefixes, used));
            }
            out
        }
    }
}

fn format_iri<'a>(iri: &str, prefixes: &[(&'a str, &str)], used: &mut BTreeSet<&'a str>) -> String {
    for &(label, namespace) in prefixes {
        if let Some(local) = iri.strip_prefix(namespace)
            && is_simple_local(local)
        {
            used.insert(label);
            return format!("{label}:{local}");
        }
    }
    format!("<{}>", escape_iri(iri))
}

fn is_simple_local(local: &str) -> bool {
    let mut chars = local.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-'))
}

fn escape_iri(iri: &str) -> String {
    let mut out = String::with_capacity(iri.len());
    for c in iri.chars() {
        if c <= ' ' || matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\') {
            let _ = write!(out, "\\u{:04X}", c as u32);
        } else {
            out.push(c);
        }
    }
    out
}

fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}
