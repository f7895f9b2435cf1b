use syn::{
    Attribute, Ident, Lit, LitStr, Meta, Result, Token,
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
};

use crate::support::diag;

/// Parsed attribute arguments container.
#[derive(Debug, Clone, Default)]
pub struct AttrArgs {
    pub items: Vec<AttrItem>,
}

/// A single attribute item.
#[derive(Debug, Clone)]
pub enum AttrItem {
    /// A flag like `skip`
    Flag(Ident),
    /// Key-value pair like `valid = "required"`
    KeyValue { key: Ident, value: Lit },
}

impl AttrArgs {
    /// Find a literal by key name.
    pub fn get_lit(&self, key: &str) -> Option<&Lit> {
        self.items.iter().find_map(|item| match item {
            AttrItem::KeyValue { key: k, value } if k == key => Some(value),
            _ => None,
        })
    }

    /// Get a string value by key.
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get_lit(key).and_then(|lit| match lit {
            Lit::Str(s) => Some(s.value()),
            _ => None,
        })
    }

    /// Check if a flag is present.
    pub fn has_flag(&self, flag: &str) -> bool {
        self.items
            .iter()
            .any(|item| matches!(item, AttrItem::Flag(f) if f == flag))
    }

    /// Every `key = "..."` pair except the `reserved` keys, in source order.
    ///
    /// Non-string values are an error.
    pub fn string_pairs(&self, reserved: &[&str]) -> Result<Vec<(Ident, LitStr)>> {
        let mut pairs = Vec::new();
        for item in &self.items {
            let AttrItem::KeyValue { key, value } = item else {
                continue;
            };
            if reserved.iter().any(|r| key == r) {
                continue;
            }
            match value {
                Lit::Str(s) => pairs.push((key.clone(), s.clone())),
                other => {
                    return Err(diag::error_spanned(
                        other,
                        format!("expected a string literal for `{key}`"),
                    ));
                }
            }
        }
        Ok(pairs)
    }

    /// Flags other than the `allowed` ones.
    pub fn unknown_flags<'a>(&'a self, allowed: &'a [&str]) -> impl Iterator<Item = &'a Ident> {
        self.items.iter().filter_map(move |item| match item {
            AttrItem::Flag(f) if !allowed.iter().any(|a| f == a) => Some(f),
            _ => None,
        })
    }
}

/// Parse attribute like `#[tag(...)]` (the whole Attribute, not only args).
pub fn parse_attr(attr: &Attribute, expected: &str) -> Result<Option<AttrArgs>> {
    if !attr.path().is_ident(expected) {
        return Ok(None);
    }

    match &attr.meta {
        Meta::Path(_) => Ok(Some(AttrArgs::default())),
        Meta::List(list) => {
            let args = syn::parse2::<AttrArgsParser>(list.tokens.clone())?;
            Ok(Some(args.0))
        }
        Meta::NameValue(nv) => Err(diag::error_spanned(
            nv,
            format!("#[{expected}] must be #[{expected}(...)] or #[{expected}] (not name-value)"),
        )),
    }
}

/// Parse all attributes of a given type and merge them.
pub fn parse_attrs(attrs: &[Attribute], name: &str) -> Result<AttrArgs> {
    let mut result = AttrArgs::default();

    for attr in attrs {
        if let Some(args) = parse_attr(attr, name)? {
            result.items.extend(args.items);
        }
    }

    Ok(result)
}

struct AttrArgsParser(AttrArgs);

impl Parse for AttrArgsParser {
    fn parse(input: ParseStream) -> Result<Self> {
        let items = if input.is_empty() {
            vec![]
        } else {
            Punctuated::<AttrItemParser, Token![,]>::parse_terminated(input)?
                .into_iter()
                .map(|x| x.0)
                .collect()
        };
        Ok(Self(AttrArgs { items }))
    }
}

struct AttrItemParser(AttrItem);

impl Parse for AttrItemParser {
    fn parse(input: ParseStream) -> Result<Self> {
        let key: Ident = input.parse()?;

        if input.peek(Token![=]) {
            input.parse::<Token![=]>()?;
            let value: Lit = input.parse()?;
            return Ok(Self(AttrItem::KeyValue { key, value }));
        }

        Ok(Self(AttrItem::Flag(key)))
    }
}
