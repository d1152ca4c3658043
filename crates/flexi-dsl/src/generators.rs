//! Class-name generation.
//!
//! The four operations are independently overridable: implement
//! [`ClassNameGenerator`] and override only the methods whose output should
//! change; the rest keep the default naming scheme.
//!
//! | Input | Default output |
//! |-------|----------------|
//! | grid column `12` at `sm`, prefix `col` | `col-sm-12` |
//! | offset `3` at `md`, prefix `col` | `col-offset-md-3` |
//! | responder `visible` at `sm` | `visible-sm` |
//! | responder `align=center` at `sm` | `align-center-sm` |
//! | attribute `vertical` | `flexi-vertical` |
//! | attribute `align="center"` | `align-center` |

use std::fmt;

use crate::config::Breakpoint;

pub trait ClassNameGenerator {
    /// Class for a grid column count inside a breakpoint.
    fn grid_class(
        &self,
        breakpoint: &Breakpoint,
        columns: u32,
        column_prefix: Option<&str>,
        total_columns: u32,
    ) -> String {
        default_grid_class(breakpoint, columns, column_prefix, total_columns)
    }

    /// Class for a responder inside a breakpoint, optionally with a value.
    fn responder_class(
        &self,
        breakpoint: &Breakpoint,
        responder: &str,
        value: Option<&str>,
    ) -> String {
        default_responder_class(breakpoint, responder, value)
    }

    /// Class for a layout attribute set directly on the element.
    fn attribute_class(&self, attribute: &str, value: Option<&str>) -> String {
        default_attribute_class(attribute, value)
    }

    /// Class for a column offset inside a breakpoint.
    fn offset_class(
        &self,
        breakpoint: &Breakpoint,
        offset: u32,
        column_prefix: Option<&str>,
        total_columns: u32,
    ) -> String {
        default_offset_class(breakpoint, offset, column_prefix, total_columns)
    }
}

/// The built-in naming scheme.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultClassNames;

impl ClassNameGenerator for DefaultClassNames {}

impl fmt::Debug for dyn ClassNameGenerator + Send + Sync {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("dyn ClassNameGenerator")
    }
}

fn prefixed(column_prefix: Option<&str>) -> String {
    match column_prefix {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}-"),
        _ => String::new(),
    }
}

pub fn default_grid_class(
    breakpoint: &Breakpoint,
    columns: u32,
    column_prefix: Option<&str>,
    _total_columns: u32,
) -> String {
    format!("{}{}-{}", prefixed(column_prefix), breakpoint.prefix, columns)
}

pub fn default_responder_class(
    breakpoint: &Breakpoint,
    responder: &str,
    value: Option<&str>,
) -> String {
    match value {
        Some(value) if !value.is_empty() => format!("{responder}-{value}-{}", breakpoint.prefix),
        _ => format!("{responder}-{}", breakpoint.prefix),
    }
}

pub fn default_attribute_class(attribute: &str, value: Option<&str>) -> String {
    match value {
        Some(value) if !value.is_empty() => format!("{attribute}-{value}"),
        _ => format!("flexi-{attribute}"),
    }
}

pub fn default_offset_class(
    breakpoint: &Breakpoint,
    offset: u32,
    column_prefix: Option<&str>,
    _total_columns: u32,
) -> String {
    format!("{}offset-{}-{}", prefixed(column_prefix), breakpoint.prefix, offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sm() -> Breakpoint {
        Breakpoint::new("sm")
    }

    #[test]
    fn grid_and_offset_classes() {
        let names = DefaultClassNames;
        assert_eq!(names.grid_class(&sm(), 12, Some("col"), 12), "col-sm-12");
        assert_eq!(names.grid_class(&sm(), 4, None, 12), "sm-4");
        assert_eq!(names.grid_class(&sm(), 4, Some(""), 12), "sm-4");
        assert_eq!(names.offset_class(&Breakpoint::new("md"), 3, Some("col"), 12), "col-offset-md-3");
        assert_eq!(names.offset_class(&sm(), 0, None, 12), "offset-sm-0");
    }

    #[test]
    fn responder_and_attribute_classes() {
        let names = DefaultClassNames;
        assert_eq!(names.responder_class(&sm(), "visible", None), "visible-sm");
        assert_eq!(names.responder_class(&sm(), "align", Some("center")), "align-center-sm");
        assert_eq!(names.attribute_class("vertical", None), "flexi-vertical");
        assert_eq!(names.attribute_class("vertical", Some("")), "flexi-vertical");
        assert_eq!(names.attribute_class("align", Some("center")), "align-center");
    }

    #[test]
    fn overriding_one_operation_keeps_the_others() {
        struct Bem;
        impl ClassNameGenerator for Bem {
            fn attribute_class(&self, attribute: &str, value: Option<&str>) -> String {
                match value {
                    Some(v) => format!("layout--{attribute}-{v}"),
                    None => format!("layout--{attribute}"),
                }
            }
        }

        assert_eq!(Bem.attribute_class("fit", None), "layout--fit");
        assert_eq!(Bem.grid_class(&sm(), 6, Some("col"), 12), "col-sm-6");
    }
}
