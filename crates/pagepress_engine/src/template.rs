//! Document templating.
//!
//! A template receives the flat front matter fields (`Title`, `Date`, `Tags`,
//! ...) and the rendered body as `Content`.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use minijinja::Environment;
use thiserror::Error;

use crate::frontmatter::{OutputDocument, TemplateFields};

const TEMPLATE_NAME: &str = "archetype";

/// Hugo-style YAML front matter followed by the body.
pub const DEFAULT_ARCHETYPE: &str = r#"---
title: "{{ Title }}"
metaTitle: "{{ MetaTitle }}"
description: "{{ Description }}"
date: {{ Date }}
lastmod: {{ Lastmod }}
image: "{{ Image }}"
author: "{{ Author }}"
draft: {{ Draft }}
weight: {{ Weight }}
toc: {{ Toc }}
comments: {{ Comments }}
slug: "{{ Slug }}"
categories: {{ Categories }}
tags: {{ Tags }}
---

{{ Content }}
"#;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to read template {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),
}

pub trait DocumentTemplate: Send + Sync {
    fn render(&self, document: &OutputDocument) -> Result<String, TemplateError>;
}

pub struct JinjaTemplate {
    env: Environment<'static>,
}

impl JinjaTemplate {
    /// Compiles `source`; syntax errors surface here rather than per page.
    pub fn from_source(source: impl Into<String>) -> Result<Self, TemplateError> {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        env.add_template_owned(TEMPLATE_NAME, source.into())?;
        Ok(Self { env })
    }

    pub fn from_file(path: &Path) -> Result<Self, TemplateError> {
        let source = fs::read_to_string(path).map_err(|source| TemplateError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_source(source)
    }

    pub fn builtin() -> Result<Self, TemplateError> {
        Self::from_source(DEFAULT_ARCHETYPE)
    }
}

impl DocumentTemplate for JinjaTemplate {
    fn render(&self, document: &OutputDocument) -> Result<String, TemplateError> {
        let template = self.env.get_template(TEMPLATE_NAME)?;
        Ok(template.render(TemplateFields::from(document))?)
    }
}
