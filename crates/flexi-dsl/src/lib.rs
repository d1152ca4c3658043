//! Build-time compiler for the **flexi** layout DSL.
//!
//! Two passes rewrite a parsed [`flexi_syntax::Template`] in place:
//!
//! 1. [`AttributeClassCompiler`] turns layout attributes and breakpoint
//!    attributes on layout elements into CSS classes.
//! 2. [`ElementComponentRewriter`] turns `<container>` and `<grid responsive>`
//!    into `{{#flexi-…}}` component invocations.
//!
//! Both read one immutable [`DslConfig`], merged once per build from the
//! built-in defaults and the project's [`ProjectConfig`]. [`Pipeline`] runs
//! the passes in their required order.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`attributes`] | attribute lookup and removal |
//! | [`compiler`] | `AttributeClassCompiler` |
//! | [`config`] | `DslConfig`, `ProjectConfig`, `Breakpoint`, `LayoutAttribute` |
//! | [`error`] | `DslError`, `ConfigError` |
//! | [`generators`] | `ClassNameGenerator` and the default naming scheme |
//! | [`pipeline`] | `Pipeline`, `AstPlugin` |
//! | [`rewriter`] | `ElementComponentRewriter` |
//!
//! # Quick start
//!
//! ```rust
//! use flexi_dsl::{Breakpoint, DslConfig, Pipeline, ProjectConfig};
//! use flexi_syntax::{parse_str, print};
//!
//! let config = DslConfig::from_project(
//!     ProjectConfig::new()
//!         .with_columns(12)
//!         .with_column_prefix("col")
//!         .with_breakpoint(Breakpoint::new("sm")),
//! );
//!
//! let mut template = parse_str(r#"<box align="center" vertical sm="12 visible"></box>"#).unwrap();
//! Pipeline::new(config).run(&mut template).unwrap();
//! assert_eq!(
//!     print(&template),
//!     r#"<box class="flexi-vertical align-center col-sm-12 visible-sm"></box>"#
//! );
//! ```

pub mod attributes;
pub mod compiler;
pub mod config;
pub mod error;
pub mod generators;
pub mod pipeline;
pub mod rewriter;

pub use compiler::AttributeClassCompiler;
pub use config::{Breakpoint, DslConfig, DslDefaults, LayoutAttribute, ProjectConfig};
pub use error::{ConfigError, DslError};
pub use generators::{ClassNameGenerator, DefaultClassNames};
pub use pipeline::{AstPlugin, Pipeline};
pub use rewriter::ElementComponentRewriter;
