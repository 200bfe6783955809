//! Inline `style` declarations and a minimal stylesheet cascade.
//!
//! Declaration blocks and `<style>` sheets are tokenized with `cssparser`, so
//! quoted strings, functions such as `url(...)` and comments never split a
//! value. Values are kept as written.

use cssparser::{
    parse_important, AtRuleParser, CowRcStr, DeclarationListParser, DeclarationParser, ParseError,
    Parser, ParserInput, QualifiedRuleParser, RuleListParser, SourceLocation, Token,
};
use kuchiki::traits::*;
use kuchiki::{ElementData, NodeRef, Selectors};
use tracing::trace;

/// Converts `backgroundColor` style names to `background-color`.
pub(crate) fn normalize_property(name: &str) -> String {
    let mut normalized = String::with_capacity(name.len() + 4);
    for ch in name.trim().chars() {
        if ch.is_ascii_uppercase() {
            normalized.push('-');
            normalized.push(ch.to_ascii_lowercase());
        } else {
            normalized.push(ch);
        }
    }
    normalized
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Declaration {
    property: String,
    value: String,
    important: bool,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct Declarations(Vec<Declaration>);

impl Declarations {
    fn parse(raw: &str) -> Self {
        let mut input = ParserInput::new(raw);
        let mut parser = Parser::new(&mut input);
        Self::from_parser(&mut parser)
    }

    /// Malformed declarations are dropped, the rest of the block survives.
    fn from_parser(input: &mut Parser<'_, '_>) -> Self {
        let entries = DeclarationListParser::new(input, DeclarationReader)
            .filter_map(Result::ok)
            .collect();
        Self(entries)
    }

    /// The last important declaration of `property`, else the last one.
    fn get(&self, property: &str) -> Option<&Declaration> {
        let mut found: Option<&Declaration> = None;
        for decl in self.0.iter().filter(|decl| decl.property == property) {
            if found.map_or(true, |current| decl.important || !current.important) {
                found = Some(decl);
            }
        }
        found
    }

    /// Replaces the first declaration of `property` in place and drops any
    /// repeats. An empty value removes the property.
    fn set(&mut self, property: String, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            self.0.retain(|decl| decl.property != property);
            return;
        }
        let mut kept = false;
        self.0.retain_mut(|decl| {
            if decl.property != property {
                return true;
            }
            if kept {
                return false;
            }
            decl.value = value.to_string();
            decl.important = false;
            kept = true;
            true
        });
        if !kept {
            self.0.push(Declaration {
                property,
                value: value.to_string(),
                important: false,
            });
        }
    }

    fn to_attribute(&self) -> String {
        self.0
            .iter()
            .map(|decl| {
                let priority = if decl.important { " !important" } else { "" };
                format!("{}: {}{};", decl.property, decl.value, priority)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

struct DeclarationReader;

impl<'i> DeclarationParser<'i> for DeclarationReader {
    type Declaration = Declaration;
    type Error = ();

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Declaration, ParseError<'i, ()>> {
        let start = input.position();
        let mut end = start;
        let mut important = false;
        loop {
            if input.try_parse(parse_important).is_ok() {
                input.expect_exhausted()?;
                important = true;
                break;
            }
            let opens_block = match input.next() {
                Ok(token) => matches!(
                    token,
                    Token::Function(_)
                        | Token::ParenthesisBlock
                        | Token::SquareBracketBlock
                        | Token::CurlyBracketBlock
                ),
                Err(_) => break,
            };
            if opens_block {
                input.parse_nested_block(skip_block)?;
            }
            end = input.position();
        }

        let value = input.slice(start..end).trim();
        if value.is_empty() {
            return Err(input.new_custom_error(()));
        }
        Ok(Declaration {
            property: name.to_ascii_lowercase(),
            value: value.to_string(),
            important,
        })
    }
}

impl<'i> AtRuleParser<'i> for DeclarationReader {
    type PreludeNoBlock = ();
    type PreludeBlock = ();
    type AtRule = Declaration;
    type Error = ();
}

fn skip_block<'i>(block: &mut Parser<'i, '_>) -> Result<(), ParseError<'i, ()>> {
    while block.next().is_ok() {}
    Ok(())
}

struct Rule {
    selectors: Selectors,
    declarations: Declarations,
}

/// Style rules of a sheet. At-rules and rules with selectors the engine
/// cannot match are skipped whole.
struct RuleReader;

impl<'i> QualifiedRuleParser<'i> for RuleReader {
    type Prelude = Selectors;
    type QualifiedRule = Rule;
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Selectors, ParseError<'i, ()>> {
        let start = input.position();
        while input.next().is_ok() {}
        let text = input.slice_from(start).trim();
        Selectors::compile(text).map_err(|_| input.new_custom_error(()))
    }

    fn parse_block<'t>(
        &mut self,
        selectors: Selectors,
        _location: SourceLocation,
        input: &mut Parser<'i, 't>,
    ) -> Result<Rule, ParseError<'i, ()>> {
        Ok(Rule {
            selectors,
            declarations: Declarations::from_parser(input),
        })
    }
}

impl<'i> AtRuleParser<'i> for RuleReader {
    type PreludeNoBlock = ();
    type PreludeBlock = ();
    type AtRule = Rule;
    type Error = ();
}

fn parse_rules(sheet: &str) -> Vec<Rule> {
    let mut input = ParserInput::new(sheet);
    let mut parser = Parser::new(&mut input);
    let rules = RuleListParser::new_for_stylesheet(&mut parser, RuleReader)
        .filter_map(|rule| match rule {
            Ok(rule) => Some(rule),
            Err((_, text)) => {
                trace!(target = "tinyquery", rule = %text.trim(), "skipping unsupported rule");
                None
            }
        })
        .collect();
    rules
}

pub(crate) fn set_inline_properties<'a>(
    element: &ElementData,
    properties: impl IntoIterator<Item = (&'a str, &'a str)>,
) {
    let mut attributes = element.attributes.borrow_mut();
    let mut declarations = Declarations::parse(attributes.get("style").unwrap_or(""));
    for (property, value) in properties {
        declarations.set(normalize_property(property), value);
    }
    attributes.insert("style", declarations.to_attribute());
}

fn inline_declaration(element: &ElementData, property: &str) -> Option<Declaration> {
    let attributes = element.attributes.borrow();
    let declarations = Declarations::parse(attributes.get("style")?);
    declarations.get(property).cloned()
}

/// Cascade order, strongest first: important inline, important sheet rule,
/// inline, sheet rule. Among sheet rules higher specificity wins, then the
/// later rule.
pub(crate) fn computed_value(root: &NodeRef, element: &NodeRef, property: &str) -> String {
    let property = normalize_property(property);
    let Some(target) = element.clone().into_element_ref() else {
        return String::new();
    };
    let inline = inline_declaration(&target, &property);
    if let Some(decl) = inline.as_ref().filter(|decl| decl.important) {
        return decl.value.clone();
    }

    let sheets: Vec<String> = root
        .descendants()
        .elements()
        .filter(|el| &*el.name.local == "style")
        .map(|el| el.as_node().text_contents())
        .collect();

    let mut best = None;
    for rule in sheets.iter().flat_map(|sheet| parse_rules(sheet)) {
        let Some(decl) = rule.declarations.get(&property) else {
            continue;
        };
        let specificity = rule
            .selectors
            .0
            .iter()
            .filter(|selector| selector.matches(&target))
            .map(|selector| selector.specificity())
            .max();
        let Some(specificity) = specificity else {
            continue;
        };
        let rank = (decl.important, specificity);
        if best.as_ref().map_or(true, |(current, _)| rank >= *current) {
            best = Some((rank, decl.value.clone()));
        }
    }

    match (best, inline) {
        (Some(((true, _), value)), _) => value,
        (_, Some(decl)) => decl.value,
        (Some((_, value)), None) => value,
        (None, None) => String::new(),
    }
}
