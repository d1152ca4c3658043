use flexi_syntax::Template;

use crate::compiler::AttributeClassCompiler;
use crate::config::DslConfig;
use crate::error::DslError;
use crate::rewriter::ElementComponentRewriter;

/// A tree transform run as part of a template build.
pub trait AstPlugin {
    fn name(&self) -> &'static str;

    fn transform(&self, template: &mut Template) -> Result<(), DslError>;
}

impl AstPlugin for AttributeClassCompiler<'_> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn transform(&self, template: &mut Template) -> Result<(), DslError> {
        AttributeClassCompiler::transform(self, template)
    }
}

impl AstPlugin for ElementComponentRewriter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn transform(&self, template: &mut Template) -> Result<(), DslError> {
        ElementComponentRewriter::transform(self, template);
        Ok(())
    }
}

/// Owns the build's configuration and runs both passes in their fixed order:
/// attribute conversion completes before component conversion starts.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: DslConfig,
}

impl Pipeline {
    pub fn new(config: DslConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DslConfig {
        &self.config
    }

    pub fn compiler(&self) -> AttributeClassCompiler<'_> {
        AttributeClassCompiler::new(&self.config)
    }

    pub fn rewriter(&self) -> ElementComponentRewriter {
        ElementComponentRewriter::new()
    }

    /// The passes in the order they run.
    pub fn plugins(&self) -> Vec<Box<dyn AstPlugin + '_>> {
        let compiler: Box<dyn AstPlugin + '_> = Box::new(self.compiler());
        let rewriter: Box<dyn AstPlugin + '_> = Box::new(self.rewriter());
        vec![compiler, rewriter]
    }

    /// Run every pass over `template`, stopping at the first error.
    pub fn run(&self, template: &mut Template) -> Result<(), DslError> {
        for plugin in self.plugins() {
            log::debug!("running {}", plugin.name());
            plugin.transform(template)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Breakpoint, ProjectConfig};
    use flexi_syntax::{parse_str, print};
    use pretty_assertions::assert_eq;

    fn pipeline() -> Pipeline {
        Pipeline::new(DslConfig::from_project(
            ProjectConfig::new()
                .with_columns(12)
                .with_column_prefix("col")
                .with_breakpoint(Breakpoint::new("sm"))
                .with_breakpoint(Breakpoint::new("md")),
        ))
    }

    #[test]
    fn plugins_run_in_order() {
        let names: Vec<_> = pipeline().plugins().iter().map(|p| p.name()).collect();
        assert_eq!(names, [AttributeClassCompiler::NAME, ElementComponentRewriter::NAME]);
    }

    #[test_log::test]
    fn container_gets_classes_before_becoming_a_component() {
        let mut template = parse_str(r#"<container fit md="6"><hbox vertical></hbox></container>"#).unwrap();
        pipeline().run(&mut template).unwrap();

        assert_eq!(
            print(&template),
            r#"{{#flexi-container class="flexi-fit col-md-6"}}<hbox class="flexi-vertical"></hbox>{{/flexi-container}}"#
        );
    }

    #[test_log::test]
    fn responsive_attribute_survives_into_the_component() {
        let mut template = parse_str(r#"<grid responsive sm="offset-1 11"></grid><grid wrap></grid>"#).unwrap();
        pipeline().run(&mut template).unwrap();

        assert_eq!(
            print(&template),
            r#"{{#flexi-grid responsive="" class="col-offset-sm-1 col-sm-11"}}{{/flexi-grid}}<grid class="flexi-wrap"></grid>"#
        );
    }

    #[test_log::test]
    fn compile_error_stops_before_rewrite() {
        let mut template = parse_str(r#"<container sm="huge"></container>"#).unwrap();
        let err = pipeline().run(&mut template).unwrap_err();

        assert!(matches!(err, DslError::InvalidBreakpointToken { .. }));
        assert_eq!(print(&template), r#"<container sm="huge"></container>"#);
    }
}
