//! Tag parser: raw tag string to [`Chunk`] chain.

use std::{fmt, mem};

use crate::foundation::ParseError;
use crate::funcs::{Func, FuncMap};
use crate::tag::scanner::{ParamScanner, TagScanner, Token};
use crate::tag::{Chunk, OPTIONAL, OR_TAG, Params, Tag};

/// Parses raw tags against a predicate registry.
///
/// Every rule name is resolved while parsing, so an unknown rule fails here
/// rather than at validation time. Alternatives of an `or` rule are parsed
/// too, for the same reason.
#[derive(Clone, Copy)]
pub struct TagParser<'f> {
    funcs: &'f FuncMap,
}

impl fmt::Debug for TagParser<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagParser")
            .field("funcs", &self.funcs.len())
            .finish()
    }
}

impl<'f> TagParser<'f> {
    pub fn new(funcs: &'f FuncMap) -> Self {
        Self { funcs }
    }

    /// Parses `raw` into a chunk chain, one chunk per `;`-separated level.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nebula_tagval::funcs::builtin_funcs;
    /// use nebula_tagval::tag::TagParser;
    ///
    /// let funcs = builtin_funcs();
    /// let chunk = TagParser::new(&funcs).parse("len(3); required,alpha").unwrap();
    ///
    /// assert_eq!(chunk.tags()[0].to_string(), "len(3)");
    /// assert_eq!(chunk.next().unwrap().tags().len(), 2);
    /// ```
    pub fn parse(&self, raw: &str) -> Result<Chunk, ParseError> {
        let mut levels: Vec<Chunk> = Vec::new();
        let mut current = Chunk::default();
        let mut or_parsing = false;
        let mut scanner = TagScanner::new(raw);

        loop {
            let (token, literal) = scanner.next_token();
            let modifier = literal == OPTIONAL && !or_parsing;
            if modifier {
                current.optional = true;
            }

            match token {
                Token::TagSeparator => {
                    if !modifier {
                        if literal.is_empty() {
                            return Err(ParseError::EmptyTagLiteral { tag: raw.to_owned() });
                        }
                        self.flush(&mut current, literal, or_parsing)?;
                    }
                    or_parsing = false;
                }
                Token::OrSeparator => {
                    if modifier {
                        continue;
                    }
                    if literal.is_empty() {
                        return Err(ParseError::EmptyOrLiteral { tag: raw.to_owned() });
                    }
                    self.push_alternative(&mut current, literal, or_parsing)?;
                    or_parsing = true;
                }
                Token::NextSeparator => {
                    if !modifier && !literal.is_empty() {
                        self.flush(&mut current, literal, or_parsing)?;
                    }
                    levels.push(mem::take(&mut current));
                    or_parsing = false;
                }
                Token::EndOfInput => {
                    if !modifier && !literal.is_empty() {
                        self.flush(&mut current, literal, or_parsing)?;
                    }
                    break;
                }
                Token::Illegal => {
                    return Err(ParseError::IllegalToken { tag: raw.to_owned() });
                }
            }
        }

        let mut chain = current;
        while let Some(mut parent) = levels.pop() {
            parent.next = Some(Box::new(chain));
            chain = parent;
        }
        Ok(chain)
    }

    /// Appends `literal` as a rule, or as one more alternative of the open
    /// `or` group.
    fn flush(&self, chunk: &mut Chunk, literal: String, or_parsing: bool) -> Result<(), ParseError> {
        if or_parsing {
            self.push_alternative(chunk, literal, true)
        } else {
            chunk.tags.push(self.new_tag(&literal)?);
            Ok(())
        }
    }

    /// Adds `literal` to the open `or` group, or opens a new group.
    fn push_alternative(
        &self,
        chunk: &mut Chunk,
        literal: String,
        extend: bool,
    ) -> Result<(), ParseError> {
        self.check_alternative(&literal)?;
        match chunk.tags.last_mut() {
            Some(tag) if extend && tag.name() == OR_TAG => tag.push_param(literal),
            _ => {
                let or = self.lookup(OR_TAG)?;
                chunk.tags.push(Tag::new(OR_TAG, [literal], or));
            }
        }
        Ok(())
    }

    /// Builds a tag from `name` or `name(p1|p2|...)`.
    fn new_tag(&self, literal: &str) -> Result<Tag, ParseError> {
        let (name, params) = match literal.find('(') {
            None => (literal, Params::new()),
            Some(idx) => {
                let Some(close) = literal.rfind(')').filter(|close| *close > idx) else {
                    return Err(ParseError::UnclosedParams {
                        literal: literal.to_owned(),
                    });
                };
                if close + 1 != literal.len() {
                    return Err(ParseError::TrailingCharacters {
                        literal: literal.to_owned(),
                    });
                }
                let inner = &literal[idx + 1..close];
                let params: Params = ParamScanner::new(inner).map(|(_, param)| param).collect();
                (&literal[..idx], params)
            }
        };

        let func = self.lookup(name)?;
        if name == OR_TAG {
            for alternative in &params {
                self.check_alternative(alternative)?;
            }
        }
        Ok(Tag::new(name, params, func))
    }

    fn check_alternative(&self, raw: &str) -> Result<(), ParseError> {
        self.parse(raw).map(drop)
    }

    fn lookup(&self, name: &str) -> Result<Func, ParseError> {
        self.funcs
            .get(name)
            .cloned()
            .ok_or_else(|| ParseError::FunctionNotFound {
                name: name.to_owned(),
            })
    }
}
