use anyhow::Context;

use crate::ast::nodes::Root;
use crate::parse::parse;

/// A transform over a whole stylesheet tree.
pub trait Plugin {
  fn name(&self) -> &str;

  fn run(&self, root: &Root) -> anyhow::Result<()>;
}

/// Runs plugins in registration order over one parsed stylesheet.
#[derive(Default)]
pub struct Processor {
  plugins: Vec<Box<dyn Plugin>>,
}

impl Processor {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_plugin<P>(mut self, plugin: P) -> Self
  where
    P: Plugin + 'static,
  {
    self.plugins.push(Box::new(plugin));
    self
  }

  pub fn plugin_names(&self) -> Vec<&str> {
    self.plugins.iter().map(|plugin| plugin.name()).collect()
  }

  pub fn run(&self, root: &Root) -> anyhow::Result<()> {
    for plugin in &self.plugins {
      tracing::debug!(plugin = plugin.name(), "Running plugin");
      plugin
        .run(root)
        .with_context(|| format!("plugin `{}` failed", plugin.name()))?;
    }
    Ok(())
  }

  /// Parse `css`, run every plugin and serialize the result.
  pub fn process(&self, css: &str) -> anyhow::Result<String> {
    let root = parse(css)?;
    self.run(&root)?;
    Ok(root.to_css())
  }
}
