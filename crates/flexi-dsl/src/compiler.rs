//! Converts layout attributes on layout elements into CSS classes.
//!
//! ```text
//! <box align="center" vertical sm="12 visible">
//!   → <box class="flexi-vertical align-center col-sm-12 visible-sm">
//! ```
//!
//! Classes are accumulated per element in a fixed order: the existing
//! literal `class` value, then layout attributes in configured order, then
//! breakpoints in configured order with their tokens in source order.

use flexi_syntax::ast::{AttrValue, ConcatPart, ElementNode};
use flexi_syntax::printer::print_attr_value;
use flexi_syntax::{Template, builders, walker};

use crate::attributes::{get_attribute, get_attribute_mut, remove_attribute};
use crate::config::{Breakpoint, DslConfig, LayoutAttribute};
use crate::error::{DslError, Location};

const MIN_COLUMN_COUNT: u32 = 1;
const OFFSET_PREFIX: &str = "offset-";

pub struct AttributeClassCompiler<'c> {
    config: &'c DslConfig,
}

impl<'c> AttributeClassCompiler<'c> {
    pub const NAME: &'static str = "flexi-attribute-conversion";

    pub fn new(config: &'c DslConfig) -> Self {
        Self { config }
    }

    /// Rewrite every matching element of `template` in place.
    ///
    /// Stops at the first invalid attribute or token; elements converted
    /// before the failure keep their new classes.
    pub fn transform(&self, template: &mut Template) -> Result<(), DslError> {
        walker::visit(template, |template, id| {
            let Some(element) = template.element_mut(id) else {
                return Ok(());
            };
            if !self.config.converts(&element.tag) {
                return Ok(());
            }
            self.convert_element(element)
        })
    }

    fn convert_element(&self, element: &mut ElementNode) -> Result<(), DslError> {
        log::debug!("converting attributes for <{}>", element.tag);

        let mut class_names = Vec::new();

        if let Some(chars) = get_attribute(element, "class").and_then(|attr| attr.value.chars())
            && !chars.is_empty()
        {
            log::trace!("starting with original class string: {chars}");
            class_names.push(chars.to_string());
        }

        for attribute in self.config.attributes() {
            if let Some(class_name) = self.convert_attribute(element, attribute)? {
                class_names.push(class_name);
            }
        }

        for breakpoint in self.config.breakpoints() {
            self.convert_breakpoint(element, breakpoint, &mut class_names)?;
        }

        if class_names.is_empty() {
            return Ok(());
        }

        let joined = class_names.join(" ");
        log::debug!("final class for <{}>: {joined}", element.tag);
        write_class(element, joined);
        Ok(())
    }

    fn convert_attribute(
        &self,
        element: &mut ElementNode,
        attribute: &LayoutAttribute,
    ) -> Result<Option<String>, DslError> {
        let name = attribute.name();
        let Some(attr) = get_attribute(element, name) else {
            return Ok(None);
        };

        let value = match (attribute, attr.value.chars()) {
            (LayoutAttribute::Simple(_), Some("")) => None,
            (LayoutAttribute::Complex { .. }, Some(chars)) if attribute.allows(chars) => {
                Some(chars)
            }
            _ => {
                return Err(DslError::InvalidAttributeValue {
                    attribute: name.to_string(),
                    value: describe_value(&attr.value),
                    at: location(element),
                });
            }
        };

        let class_name = self.config.generator().attribute_class(name, value);
        log::trace!("generated class: {class_name}");

        remove_attribute(element, name);
        Ok(Some(class_name))
    }

    fn convert_breakpoint(
        &self,
        element: &mut ElementNode,
        breakpoint: &Breakpoint,
        class_names: &mut Vec<String>,
    ) -> Result<(), DslError> {
        let Some(attr) = get_attribute(element, &breakpoint.prefix) else {
            return Ok(());
        };
        let Some(chars) = attr.value.chars() else {
            return Err(DslError::InvalidBreakpointToken {
                token: describe_value(&attr.value),
                breakpoint: breakpoint.prefix.clone(),
                at: location(element),
            });
        };

        for token in chars.split_whitespace() {
            class_names.push(self.convert_token(element, breakpoint, token)?);
        }

        remove_attribute(element, &breakpoint.prefix);
        Ok(())
    }

    /// Convert one breakpoint token: a grid column count, a `name=value`
    /// responder, a plain responder, or `offset-<n>`.
    fn convert_token(
        &self,
        element: &ElementNode,
        breakpoint: &Breakpoint,
        token: &str,
    ) -> Result<String, DslError> {
        let generator = self.config.generator();
        let columns = self.config.columns();
        let column_prefix = self.config.column_prefix();

        if let Some(value) = parse_integer(token) {
            return match u32::try_from(value) {
                Ok(n) if (MIN_COLUMN_COUNT..=columns).contains(&n) => {
                    let class_name = generator.grid_class(breakpoint, n, column_prefix, columns);
                    log::trace!("generated column class: {class_name}");
                    Ok(class_name)
                }
                _ => Err(DslError::InvalidColumnRange {
                    value,
                    breakpoint: breakpoint.prefix.clone(),
                    columns,
                    at: location(element),
                }),
            };
        }

        if let Some((name, value)) = token.split_once('=') {
            let Some(responder) = self.config.complex_responder(name) else {
                return Err(self.invalid_token(element, breakpoint, token));
            };
            if !responder.allows(value) {
                return Err(DslError::InvalidAttributeValue {
                    attribute: format!("{}:{name}", breakpoint.prefix),
                    value: value.to_string(),
                    at: location(element),
                });
            }
            let class_name = generator.responder_class(breakpoint, name, Some(value));
            log::trace!("generated responsive class: {class_name}");
            return Ok(class_name);
        }

        if self.config.simple_responder(token).is_some() {
            let class_name = generator.responder_class(breakpoint, token, None);
            log::trace!("generated responsive class: {class_name}");
            return Ok(class_name);
        }

        if let Some(rest) = token.strip_prefix(OFFSET_PREFIX) {
            let Some(value) = parse_integer(rest) else {
                return Err(self.invalid_token(element, breakpoint, token));
            };
            return match u32::try_from(value) {
                Ok(offset) if offset < columns => {
                    let class_name =
                        generator.offset_class(breakpoint, offset, column_prefix, columns);
                    log::trace!("generated offset class: {class_name}");
                    Ok(class_name)
                }
                _ => Err(DslError::InvalidOffsetRange {
                    value,
                    breakpoint: breakpoint.prefix.clone(),
                    columns,
                    at: location(element),
                }),
            };
        }

        Err(self.invalid_token(element, breakpoint, token))
    }

    fn invalid_token(
        &self,
        element: &ElementNode,
        breakpoint: &Breakpoint,
        token: &str,
    ) -> DslError {
        DslError::InvalidBreakpointToken {
            token: token.to_string(),
            breakpoint: breakpoint.prefix.clone(),
            at: location(element),
        }
    }
}

/// Write the accumulated classes back onto the element.
///
/// A literal `class` is replaced (its original text is already the first
/// accumulated entry); a dynamic one gains a trailing literal part.
fn write_class(element: &mut ElementNode, joined: String) {
    let Some(attr) = get_attribute_mut(element, "class") else {
        element.attributes.push(builders::attr("class", joined));
        return;
    };

    match &mut attr.value {
        AttrValue::Text(text) => text.chars = joined,
        AttrValue::Concat(concat) => {
            concat.parts.push(ConcatPart::Text(builders::text(format!(" {joined}"))));
        }
        AttrValue::Mustache(mustache) => {
            let loc = mustache.loc;
            let parts = vec![
                ConcatPart::Mustache(mustache.clone()),
                ConcatPart::Text(builders::text(format!(" {joined}"))),
            ];
            attr.value = AttrValue::Concat(builders::concat(parts, loc));
        }
    }
}

/// An optionally signed run of ASCII digits, saturated to the `i64` range so
/// oversized values still fail as out-of-range numbers.
fn parse_integer(token: &str) -> Option<i64> {
    let digits = token.strip_prefix(['-', '+']).unwrap_or(token);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let saturated = if token.starts_with('-') { i64::MIN } else { i64::MAX };
    Some(token.parse().unwrap_or(saturated))
}

fn location(element: &ElementNode) -> Location {
    Location { tag: element.tag.clone(), position: element.loc.start }
}

fn describe_value(value: &AttrValue) -> String {
    value.chars().map(str::to_string).unwrap_or_else(|| print_attr_value(value))
}
