//! Query string front end.
//!
//! Compiles a compact textual syntax into a `Path`:
//!
//! - `room` - name test
//! - `room/rate` - one step per tree level
//! - `room[@type='single']` - name and attribute test in one step
//! - `[@type='single' and @floor="2"]` - attribute tests only
//! - `rate[?cheap]` - registered predicate
//!
//! A leading `/` is accepted and ignored. Filters on one step may be
//! chained (`room[@a='1'][@b='2']`) or joined with `and` / `,`.

use super::error::QueryParseError;
use super::path::Path;
use super::step::{Predicate, Step};
use crate::document::node::XmlNode;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Named predicates that queries can reference with `?name`.
pub struct PredicateRegistry<N = XmlNode> {
    predicates: HashMap<String, Predicate<N>>,
}

impl<N> PredicateRegistry<N> {
    pub fn new() -> Self {
        Self {
            predicates: HashMap::new(),
        }
    }

    /// Registers an infallible predicate under `name`, replacing any
    /// previous registration.
    pub fn register<F>(&mut self, name: impl Into<String>, func: F) -> &mut Self
    where
        F: Fn(&N) -> bool + Send + Sync + 'static,
    {
        let name = name.into();
        self.predicates
            .insert(name.clone(), Predicate::new(name, func));
        self
    }

    /// Registers a fallible predicate under `name`.
    pub fn register_fallible<F>(&mut self, name: impl Into<String>, func: F) -> &mut Self
    where
        F: Fn(&N) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        let name = name.into();
        self.predicates
            .insert(name.clone(), Predicate::fallible(name, func));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Predicate<N>> {
        self.predicates.get(name)
    }
}

impl<N> Default for PredicateRegistry<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Parser for query strings.
pub struct Parser<'r, N = XmlNode> {
    input: Vec<char>,
    position: usize,
    registry: Option<&'r PredicateRegistry<N>>,
}

impl<'r, N> Parser<'r, N> {
    /// Creates a parser; `?name` tests resolve against `registry`.
    pub fn new(query: &str, registry: Option<&'r PredicateRegistry<N>>) -> Self {
        Self {
            input: query.chars().collect(),
            position: 0,
            registry,
        }
    }

    /// Parses a query that uses no predicates.
    pub fn parse(query: &str) -> Result<Path<N>, QueryParseError> {
        Parser::new(query, None).parse_path()
    }

    /// Parses a query whose `?name` tests resolve against `registry`.
    pub fn parse_with(
        query: &str,
        registry: &'r PredicateRegistry<N>,
    ) -> Result<Path<N>, QueryParseError> {
        Parser::new(query, Some(registry)).parse_path()
    }

    /// Parses the whole input into a path.
    pub fn parse_path(&mut self) -> Result<Path<N>, QueryParseError> {
        let mut steps = Vec::new();

        self.skip_whitespace();
        if self.peek() == Some('/') {
            self.next();
        }

        loop {
            steps.push(self.parse_step()?);
            self.skip_whitespace();
            match self.peek() {
                Some('/') => {
                    self.next();
                }
                None => break,
                Some(ch) => {
                    return Err(QueryParseError::UnexpectedToken {
                        position: self.position,
                        found: ch.to_string(),
                        expected: "'/' or end of query".to_string(),
                    })
                }
            }
        }

        Ok(Path::new(steps))
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Returns the next character and advances position.
    fn next(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;
        Some(ch)
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.next();
            } else {
                break;
            }
        }
    }

    /// Expects a specific character and advances, or returns an error.
    fn expect(&mut self, expected: char) -> Result<(), QueryParseError> {
        self.skip_whitespace();
        let pos = self.position;
        match self.next() {
            Some(ch) if ch == expected => Ok(()),
            Some(ch) => Err(QueryParseError::UnexpectedToken {
                position: pos,
                found: ch.to_string(),
                expected: format!("'{}'", expected),
            }),
            None => Err(QueryParseError::UnexpectedEnd {
                expected: format!("'{}'", expected),
            }),
        }
    }

    fn is_identifier_char(ch: char) -> bool {
        ch.is_alphanumeric() || matches!(ch, '_' | '-' | '.' | ':')
    }

    /// Parses an element, attribute or predicate name.
    fn parse_identifier(&mut self) -> Result<String, QueryParseError> {
        self.skip_whitespace();
        let mut name = String::new();
        while let Some(ch) = self.peek() {
            if Self::is_identifier_char(ch) {
                name.push(ch);
                self.next();
            } else {
                break;
            }
        }
        if !name.is_empty() {
            return Ok(name);
        }
        match self.peek() {
            Some(ch) => Err(QueryParseError::UnexpectedToken {
                position: self.position,
                found: ch.to_string(),
                expected: "a name".to_string(),
            }),
            None => Err(QueryParseError::UnexpectedEnd {
                expected: "a name".to_string(),
            }),
        }
    }

    /// Parses one step: `name`, `name[...]...` or `[...]...`.
    fn parse_step(&mut self) -> Result<Step<N>, QueryParseError> {
        self.skip_whitespace();

        let name = match self.peek() {
            Some(ch) if Self::is_identifier_char(ch) => Some(self.parse_identifier()?),
            Some('[') => None,
            Some(ch) => {
                return Err(QueryParseError::UnexpectedToken {
                    position: self.position,
                    found: ch.to_string(),
                    expected: "an element name or '['".to_string(),
                })
            }
            None => {
                return Err(QueryParseError::UnexpectedEnd {
                    expected: "an element name or '['".to_string(),
                })
            }
        };

        let mut attributes = IndexMap::new();
        let mut predicates = Vec::new();
        loop {
            self.skip_whitespace();
            if self.peek() != Some('[') {
                break;
            }
            self.parse_filter(&mut attributes, &mut predicates)?;
        }

        let mut parts = Vec::new();
        if let Some(name) = name {
            parts.push(Step::Name(name));
        }
        if !attributes.is_empty() {
            parts.push(Step::Attributes(attributes));
        }
        parts.extend(predicates.into_iter().map(Step::Predicate));

        if parts.len() == 1 {
            Ok(parts.remove(0))
        } else {
            Ok(Step::Conjunction(parts))
        }
    }

    /// Parses a bracketed filter: `[test (and|,) test ...]`.
    fn parse_filter(
        &mut self,
        attributes: &mut IndexMap<String, String>,
        predicates: &mut Vec<Predicate<N>>,
    ) -> Result<(), QueryParseError> {
        self.expect('[')?;
        loop {
            self.skip_whitespace();
            self.parse_test(attributes, predicates)?;
            self.skip_whitespace();
            match self.peek() {
                Some(']') => {
                    self.next();
                    return Ok(());
                }
                Some(',') => {
                    self.next();
                }
                Some(ch) if Self::is_identifier_char(ch) => {
                    let pos = self.position;
                    let word = self.parse_identifier()?;
                    if word != "and" {
                        return Err(QueryParseError::UnexpectedToken {
                            position: pos,
                            found: word,
                            expected: "'and', ',' or ']'".to_string(),
                        });
                    }
                }
                Some(ch) => {
                    return Err(QueryParseError::UnexpectedToken {
                        position: self.position,
                        found: ch.to_string(),
                        expected: "'and', ',' or ']'".to_string(),
                    })
                }
                None => {
                    return Err(QueryParseError::UnexpectedEnd {
                        expected: "']'".to_string(),
                    })
                }
            }
        }
    }

    /// Parses `@name='value'` or `?predicate`.
    fn parse_test(
        &mut self,
        attributes: &mut IndexMap<String, String>,
        predicates: &mut Vec<Predicate<N>>,
    ) -> Result<(), QueryParseError> {
        match self.peek() {
            Some('@') => {
                self.next();
                let key = self.parse_identifier()?;
                self.expect('=')?;
                self.skip_whitespace();
                let value = self.parse_quoted()?;
                if attributes.contains_key(&key) {
                    return Err(QueryParseError::DuplicateAttribute { name: key });
                }
                attributes.insert(key, value);
                Ok(())
            }
            Some('?') => {
                self.next();
                let name = self.parse_identifier()?;
                let predicate = self
                    .registry
                    .and_then(|registry| registry.get(&name))
                    .ok_or_else(|| QueryParseError::UnknownPredicate { name: name.clone() })?;
                predicates.push(predicate.clone());
                Ok(())
            }
            Some(ch) => Err(QueryParseError::UnexpectedToken {
                position: self.position,
                found: ch.to_string(),
                expected: "'@' or '?'".to_string(),
            }),
            None => Err(QueryParseError::UnexpectedEnd {
                expected: "'@' or '?'".to_string(),
            }),
        }
    }

    /// Parses a single- or double-quoted string with backslash escapes.
    fn parse_quoted(&mut self) -> Result<String, QueryParseError> {
        let quote = match self.peek() {
            Some(ch @ ('\'' | '"')) => {
                self.next();
                ch
            }
            Some(ch) => {
                return Err(QueryParseError::UnexpectedToken {
                    position: self.position,
                    found: ch.to_string(),
                    expected: "a quoted value".to_string(),
                })
            }
            None => {
                return Err(QueryParseError::UnexpectedEnd {
                    expected: "a quoted value".to_string(),
                })
            }
        };

        let mut value = String::new();
        loop {
            match self.next() {
                Some(ch) if ch == quote => return Ok(value),
                Some('\\') => match self.next() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('r') => value.push('\r'),
                    Some('\\') => value.push('\\'),
                    Some('\'') => value.push('\''),
                    Some('"') => value.push('"'),
                    Some(_) | None => {
                        return Err(QueryParseError::InvalidSyntax {
                            message: "Invalid escape sequence".to_string(),
                        })
                    }
                },
                Some(ch) => value.push(ch),
                None => {
                    return Err(QueryParseError::UnexpectedEnd {
                        expected: format!("closing quote {}", quote),
                    })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::node::Element;

    fn parse(query: &str) -> Result<Path, QueryParseError> {
        Parser::parse(query)
    }

    #[test]
    fn test_parse_single_name() {
        let path = parse("room").unwrap();
        assert_eq!(path.steps, vec![Step::name("room")]);
    }

    #[test]
    fn test_parse_nested_names() {
        let path = parse("/results/room/rate").unwrap();
        assert_eq!(
            path.steps,
            vec![Step::name("results"), Step::name("room"), Step::name("rate")]
        );
    }

    #[test]
    fn test_parse_name_with_attribute() {
        let path = parse("room[@type='single']/rate").unwrap();
        assert_eq!(path.steps.len(), 2);
        assert_eq!(
            path.steps[0],
            Step::Conjunction(vec![Step::name("room"), Step::attribute("type", "single")])
        );
        assert_eq!(path.steps[1], Step::name("rate"));
    }

    #[test]
    fn test_parse_attribute_only_step() {
        let path = parse(r#"[@type="2 queen" and @floor='3']"#).unwrap();
        assert_eq!(
            path.steps,
            vec![Step::attributes([("type", "2 queen"), ("floor", "3")])]
        );
    }

    #[test]
    fn test_parse_chained_filters_merge_attributes() {
        let chained = parse("rate[@price='1'][@qualifier='aarp']").unwrap();
        let comma = parse("rate[@price='1', @qualifier='aarp']").unwrap();
        assert_eq!(chained, comma);
    }

    #[test]
    fn test_parse_whitespace_handling() {
        let path = parse("  room [ @type = 'single' ] / rate ").unwrap();
        assert_eq!(path.to_string(), "room[@type='single']/rate");
    }

    #[test]
    fn test_parse_escaped_quote() {
        let path = parse(r"item[@title='it\'s']").unwrap();
        assert_eq!(
            path.steps[0],
            Step::Conjunction(vec![Step::name("item"), Step::attribute("title", "it's")])
        );
    }

    #[test]
    fn test_parse_predicate_from_registry() {
        let mut registry = PredicateRegistry::new();
        registry.register("aarp", |n: &XmlNode| n.attribute("qualifier") == Some("aarp"));

        let path = Parser::parse_with("room/rate[?aarp]", &registry).unwrap();
        match &path.steps[1] {
            Step::Conjunction(parts) => {
                assert_eq!(parts[0], Step::name("rate"));
                assert!(matches!(&parts[1], Step::Predicate(p) if p.label() == "aarp"));
            }
            other => panic!("Expected conjunction, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_unknown_predicate_fails() {
        assert_eq!(
            parse("rate[?cheap]"),
            Err(QueryParseError::UnknownPredicate {
                name: "cheap".to_string()
            })
        );
    }

    #[test]
    fn test_parse_duplicate_attribute_fails() {
        assert_eq!(
            parse("rate[@price='1'][@price='2']"),
            Err(QueryParseError::DuplicateAttribute {
                name: "price".to_string()
            })
        );
    }

    #[test]
    fn test_parse_empty_fails() {
        assert!(matches!(
            parse(""),
            Err(QueryParseError::UnexpectedEnd { .. })
        ));
        assert!(parse("/").is_err());
    }

    #[test]
    fn test_parse_trailing_slash_fails() {
        assert!(parse("room/").is_err());
    }

    #[test]
    fn test_parse_unclosed_filter_fails() {
        assert!(matches!(
            parse("room[@type='single'"),
            Err(QueryParseError::UnexpectedEnd { .. })
        ));
        assert!(parse("room[@type='single").is_err());
    }

    #[test]
    fn test_parse_empty_filter_fails() {
        assert!(parse("room[]").is_err());
    }

    #[test]
    fn test_parse_unexpected_token_position() {
        assert_eq!(
            parse("room|rate"),
            Err(QueryParseError::UnexpectedToken {
                position: 4,
                found: "|".to_string(),
                expected: "'/' or end of query".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_unquoted_value_fails() {
        assert!(parse("room[@type=single]").is_err());
    }
}
