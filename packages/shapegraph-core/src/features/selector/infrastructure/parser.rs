// Infrastructure: selector text parser
//
// Hand-written recursive descent over the raw text. Positions in errors are
// byte offsets into the input.
//
// Grammar (informal):
//   list      := pipeline ("," pipeline)*
//   pipeline  := stage+
//   stage     := "*" | type | "[" attribute "]" | ">" | "<" | "~>"
//              | "-[" labels "]->" | "<-[" labels "]-"
//              | ":" name "(" list ")" | "$" name ("(" list ")")? | "${" name "}"
//   attribute := key (comparator value ("," value)* "i"?)?
//   key       := "id" ("|" part)? | "service" ("|version")?
//              | "trait|" shape_id ("|" segment)*
// `//` starts a comment running to the end of the line.

use std::collections::BTreeSet;
use std::str::FromStr;

use crate::features::model::RelationshipType;
use crate::features::selector::domain::stages::{
    AttributeFilter, AttributeKey, Comparator, Comparison, FunctionKind, FunctionStage,
    NeighborDirection, NeighborStep, PathSegment, TypeFilter, VariableStage,
};
use crate::features::selector::domain::{
    Pipeline, SelectorError, SelectorList, SelectorResult, SemanticError, Stage, SyntaxError,
};
use crate::shared::models::{ShapeId, PRELUDE_NAMESPACE};

/// Parse selector text into a compiled selector list
pub fn parse_selector(input: &str) -> SelectorResult<SelectorList> {
    SelectorParser::new(input).parse()
}

struct SelectorParser<'a> {
    input: &'a str,
    pos: usize,
    /// Variables captured so far, in text order
    captured: BTreeSet<String>,
}

impl<'a> SelectorParser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            captured: BTreeSet::new(),
        }
    }

    fn parse(mut self) -> SelectorResult<SelectorList> {
        let list = self.parse_list()?;
        self.skip_whitespace();
        match self.peek_char() {
            None => Ok(list),
            Some(c) => Err(self.error(format!("unexpected `{c}`"))),
        }
    }

    // ------------------------------------------------------------------
    // Characters
    // ------------------------------------------------------------------

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn starts_with(&self, text: &str) -> bool {
        self.input[self.pos..].starts_with(text)
    }

    fn skip_whitespace(&mut self) {
        loop {
            match self.peek_char() {
                Some(c) if c.is_whitespace() => {
                    self.next_char();
                }
                Some('/') if self.starts_with("//") => {
                    while let Some(c) = self.next_char() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                _ => break,
            }
        }
    }

    fn expect(&mut self, text: &str) -> SelectorResult<()> {
        if self.starts_with(text) {
            self.pos += text.len();
            Ok(())
        } else {
            Err(self.error(format!("expected `{text}`")))
        }
    }

    fn read_while(&mut self, accept: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if !accept(c) {
                break;
            }
            self.next_char();
        }
        &self.input[start..self.pos]
    }

    fn read_ident(&mut self) -> SelectorResult<&'a str> {
        match self.peek_char() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                Ok(self.read_while(|c| c.is_ascii_alphanumeric() || c == '_'))
            }
            _ => Err(self.error("expected an identifier")),
        }
    }

    fn error(&self, message: impl Into<String>) -> SelectorError {
        SyntaxError {
            position: self.pos,
            message: message.into(),
            expression: self.input.to_string(),
        }
        .into()
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    /// Alternatives each start from the variables bound before the list;
    /// afterwards only variables bound on every alternative remain
    fn parse_list(&mut self) -> SelectorResult<SelectorList> {
        let before = self.captured.clone();
        let mut pipelines = Vec::new();
        let mut on_every_path: Option<BTreeSet<String>> = None;
        loop {
            self.captured = before.clone();
            pipelines.push(self.parse_pipeline()?);
            let bound = std::mem::take(&mut self.captured);
            on_every_path = Some(match on_every_path {
                None => bound,
                Some(common) => common.intersection(&bound).cloned().collect(),
            });

            self.skip_whitespace();
            if self.peek_char() != Some(',') {
                break;
            }
            self.next_char();
        }
        self.captured = on_every_path.unwrap_or(before);
        Ok(SelectorList::new(pipelines))
    }

    fn parse_pipeline(&mut self) -> SelectorResult<Pipeline> {
        let mut stages = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek_char() {
                None | Some(',') | Some(')') => break,
                Some(_) => stages.push(self.parse_stage()?),
            }
        }
        if stages.is_empty() {
            return Err(self.error("expected a selector"));
        }
        Ok(Pipeline::new(stages))
    }

    fn parse_stage(&mut self) -> SelectorResult<Stage> {
        let Some(c) = self.peek_char() else {
            return Err(self.error("unexpected end of selector"));
        };

        match c {
            '*' => {
                self.next_char();
                Ok(Stage::Type(TypeFilter::Any))
            }
            '[' => self.parse_attribute(),
            '>' => {
                self.next_char();
                Ok(Stage::Neighbor(NeighborStep::new(NeighborDirection::Forward, None)))
            }
            '~' => {
                self.expect("~>")?;
                Ok(Stage::Neighbor(NeighborStep::new(NeighborDirection::Recursive, None)))
            }
            '-' => {
                self.expect("-[")?;
                let labels = self.parse_labels()?;
                self.expect("]->")?;
                Ok(Stage::Neighbor(NeighborStep::new(NeighborDirection::Forward, Some(labels))))
            }
            '<' => {
                if self.starts_with("<-[") {
                    self.pos += "<-[".len();
                    let labels = self.parse_labels()?;
                    self.expect("]-")?;
                    Ok(Stage::Neighbor(NeighborStep::new(NeighborDirection::Reverse, Some(labels))))
                } else {
                    self.next_char();
                    Ok(Stage::Neighbor(NeighborStep::new(NeighborDirection::Reverse, None)))
                }
            }
            ':' => self.parse_function(),
            '$' => self.parse_variable(),
            c if c.is_ascii_alphabetic() => {
                let name = self.read_ident()?;
                TypeFilter::from_name(name)
                    .map(Stage::Type)
                    .ok_or_else(|| SemanticError::UnknownShapeType(name.to_string()).into())
            }
            other => Err(self.error(format!("unexpected `{other}`"))),
        }
    }

    fn parse_labels(&mut self) -> SelectorResult<Vec<RelationshipType>> {
        let mut labels = Vec::new();
        loop {
            self.skip_whitespace();
            let label = self.read_ident()?;
            let rel = RelationshipType::from_str(label)
                .map_err(|_| SemanticError::UnknownRelationship(label.to_string()))?;
            if !labels.contains(&rel) {
                labels.push(rel);
            }
            self.skip_whitespace();
            if self.peek_char() != Some(',') {
                return Ok(labels);
            }
            self.next_char();
        }
    }

    fn parse_function(&mut self) -> SelectorResult<Stage> {
        self.expect(":")?;
        let name = self.read_ident()?;
        let kind = FunctionKind::from_name(name)
            .ok_or_else(|| SemanticError::UnknownFunction(name.to_string()))?;

        self.skip_whitespace();
        self.expect("(")?;
        let before = self.captured.clone();
        if kind == FunctionKind::Root {
            // Evaluated over the whole model with no bindings
            self.captured.clear();
        }
        let list = self.parse_list()?;
        self.skip_whitespace();
        self.expect(")")?;
        // Only `:is` forwards its arguments' paths downstream
        if kind != FunctionKind::Is {
            self.captured = before;
        }

        let args: Vec<SelectorList> = list
            .pipelines()
            .iter()
            .map(|pipeline| SelectorList::new(vec![pipeline.clone()]))
            .collect();
        if let Some(expected) = kind.arity() {
            if args.len() != expected {
                return Err(SemanticError::InvalidArity {
                    function: name.to_string(),
                    expected,
                    found: args.len(),
                }
                .into());
            }
        }
        Ok(Stage::Function(FunctionStage::new(kind, args)))
    }

    fn parse_variable(&mut self) -> SelectorResult<Stage> {
        self.expect("$")?;

        if self.peek_char() == Some('{') {
            self.next_char();
            let name = self.read_ident()?.to_string();
            self.expect("}")?;
            if !self.captured.contains(&name) {
                return Err(SemanticError::UnboundVariable(name).into());
            }
            return Ok(Stage::Variable(VariableStage::Get { name }));
        }

        let name = self.read_ident()?.to_string();
        if self.peek_char() != Some('(') {
            self.captured.insert(name.clone());
            return Ok(Stage::Variable(VariableStage::BindCurrent { name }));
        }

        self.next_char();
        let before = self.captured.clone();
        let selector = self.parse_list()?;
        self.skip_whitespace();
        self.expect(")")?;
        self.captured = before;
        self.captured.insert(name.clone());
        Ok(Stage::Variable(VariableStage::Capture { name, selector }))
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    fn parse_attribute(&mut self) -> SelectorResult<Stage> {
        self.expect("[")?;
        self.skip_whitespace();
        let key = self.parse_attribute_key()?;
        self.skip_whitespace();

        if self.peek_char() == Some(']') {
            self.next_char();
            return Ok(Stage::Attribute(AttributeFilter::new(key, None)));
        }

        let comparator = self.parse_comparator()?;
        let mut values = Vec::new();
        loop {
            self.skip_whitespace();
            values.push(self.parse_value()?);
            self.skip_whitespace();
            if self.peek_char() != Some(',') {
                break;
            }
            self.next_char();
        }

        let mut case_insensitive = false;
        if self.peek_char() == Some('i') {
            self.next_char();
            case_insensitive = true;
            self.skip_whitespace();
        }
        self.expect("]")?;

        Ok(Stage::Attribute(AttributeFilter::new(
            key,
            Some(Comparison {
                comparator,
                values,
                case_insensitive,
            }),
        )))
    }

    fn parse_attribute_key(&mut self) -> SelectorResult<AttributeKey> {
        let name = self.read_ident()?;
        match name {
            "id" => {
                if self.peek_char() != Some('|') {
                    return Ok(AttributeKey::Id);
                }
                self.next_char();
                let part = self.read_ident()?;
                match part {
                    "namespace" => Ok(AttributeKey::IdNamespace),
                    "name" => Ok(AttributeKey::IdName),
                    "member" => Ok(AttributeKey::IdMember),
                    other => Err(SemanticError::UnknownAttribute(format!("id|{other}")).into()),
                }
            }
            "service" => {
                if self.peek_char() != Some('|') {
                    return Ok(AttributeKey::Service);
                }
                self.next_char();
                match self.read_ident()? {
                    "version" => Ok(AttributeKey::ServiceVersion),
                    other => {
                        Err(SemanticError::UnknownAttribute(format!("service|{other}")).into())
                    }
                }
            }
            "trait" => {
                self.expect("|")?;
                let start = self.pos;
                let text = self.read_while(|c| {
                    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '#' | '$')
                });
                let id = ShapeId::from_relative(text, PRELUDE_NAMESPACE).map_err(|err| {
                    let mut error = SyntaxError {
                        position: start,
                        message: err.to_string(),
                        expression: self.input.to_string(),
                    };
                    if text.is_empty() {
                        error.message = "expected a trait shape id".to_string();
                    }
                    error
                })?;

                let mut path = Vec::new();
                while self.peek_char() == Some('|') {
                    self.next_char();
                    path.push(self.parse_path_segment()?);
                }
                Ok(AttributeKey::Trait { id, path })
            }
            other => Err(SemanticError::UnknownAttribute(other.to_string()).into()),
        }
    }

    fn parse_path_segment(&mut self) -> SelectorResult<PathSegment> {
        match self.peek_char() {
            Some('(') => {
                for (text, segment) in [
                    ("(keys)", PathSegment::Keys),
                    ("(values)", PathSegment::Values),
                    ("(length)", PathSegment::Length),
                ] {
                    if self.starts_with(text) {
                        self.pos += text.len();
                        return Ok(segment);
                    }
                }
                Err(self.error("expected `(keys)`, `(values)` or `(length)`"))
            }
            Some('"') | Some('\'') => Ok(PathSegment::Key(self.parse_quoted()?)),
            _ => {
                let key = self.read_while(|c| c.is_ascii_alphanumeric() || c == '_');
                if key.is_empty() {
                    return Err(self.error("expected a path segment"));
                }
                Ok(PathSegment::Key(key.to_string()))
            }
        }
    }

    fn parse_comparator(&mut self) -> SelectorResult<Comparator> {
        let rest = &self.input[self.pos..];
        for len in [2, 1] {
            if let Some(symbol) = rest.get(..len) {
                if let Some(comparator) = Comparator::from_symbol(symbol) {
                    self.pos += len;
                    return Ok(comparator);
                }
            }
        }
        Err(self.error("expected a comparator or `]`"))
    }

    fn parse_value(&mut self) -> SelectorResult<String> {
        match self.peek_char() {
            Some('"') | Some('\'') => self.parse_quoted(),
            _ => {
                let value = self.read_while(|c| !c.is_whitespace() && c != ',' && c != ']');
                if value.is_empty() {
                    return Err(self.error("expected a value"));
                }
                Ok(value.to_string())
            }
        }
    }

    fn parse_quoted(&mut self) -> SelectorResult<String> {
        let start = self.pos;
        let Some(quote) = self.next_char() else {
            return Err(self.error("expected a quoted string"));
        };

        let mut value = String::new();
        loop {
            match self.next_char() {
                None => {
                    return Err(SyntaxError {
                        position: start,
                        message: "unterminated string".to_string(),
                        expression: self.input.to_string(),
                    }
                    .into())
                }
                Some('\\') => match self.next_char() {
                    Some(escaped) => value.push(escaped),
                    None => return Err(self.error("unterminated escape")),
                },
                Some(c) if c == quote => return Ok(value),
                Some(c) => value.push(c),
            }
        }
    }
}
