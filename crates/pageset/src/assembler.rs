// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Template set assembly.
//!
//! Builds one [`TemplateSet`] from the discovered layouts and partials plus a
//! single page file. Each layout and partial is registered under its file name
//! (`base.layout.tmpl`), which is how pages refer to them:
//!
//! ```jinja
//! {% extends "base.layout.tmpl" %}
//! {% block content %}{% include "footer.partial.tmpl" %}{% endblock %}
//! ```
//!
//! When two discovered files share a file name, the one listed later wins.

use minijinja::{AutoEscape, Environment, UndefinedBehavior};

use crate::cache::TemplateSet;
use crate::error::{PageError, Result};
use crate::functions::FunctionMap;
use crate::locator::{file_name, TemplateSource};

/// Engine settings applied to every set a renderer builds.
#[derive(Debug, Clone, Copy)]
pub struct BuildOptions {
    /// Fail rendering when a template references an undefined value.
    pub strict: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self { strict: true }
    }
}

/// Compiles the partials and the page at `page_path` into one set named `name`.
///
/// # Errors
///
/// Returns [`PageError::Compile`] if any file cannot be read or contains a
/// syntax error. Nothing is cached here; storing the result is up to the
/// caller.
pub fn compile_set<S: TemplateSource + ?Sized>(
    source: &S,
    name: &str,
    partials: &[String],
    page_path: &str,
    functions: &FunctionMap,
    options: BuildOptions,
) -> Result<TemplateSet> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::Html);
    if options.strict {
        env.set_undefined_behavior(UndefinedBehavior::Strict);
    }
    functions.bind(&mut env);

    for path in partials {
        let text = read(source, name, path)?;
        env.add_template_owned(file_name(path).to_string(), text)
            .map_err(|e| PageError::compile(name, format!("{}: {}", path, e)))?;
    }

    let page = read(source, name, page_path)?;
    env.add_template_owned(name.to_string(), page)
        .map_err(|e| PageError::compile(name, format!("{}: {}", page_path, e)))?;

    let mut files = partials.to_vec();
    files.push(page_path.to_string());

    Ok(TemplateSet::new(name.to_string(), files, env))
}

fn read<S: TemplateSource + ?Sized>(source: &S, name: &str, path: &str) -> Result<String> {
    source
        .read(path)
        .map_err(|e| PageError::compile(name, format!("cannot read {}: {}", path, e)))
}
