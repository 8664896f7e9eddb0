//! Turns a background's script source into a copy-paste snippet: a fixed
//! full-page container, an inline script that mounts the background, and the
//! matching inline style.
//!
//! Sources are looked up as `<dir>/<key>.js` in each configured directory. When
//! none is found the snippet is a clearly marked placeholder telling the user
//! where to get the code.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

mod minify;

pub use minify::{minify, strip_module_syntax};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("no source for background `{key}` in {searched:?}")]
    NotFound { key: String, searched: Vec<PathBuf> },
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// Word splits for keys written as one lowercase run.
const KNOWN_WORDS: &[(&str, &[&str])] = &[
    ("crackinjection", &["crack", "injection"]),
    ("crackinjectionblue", &["crack", "injection", "blue"]),
    ("crackinjectiongreen", &["crack", "injection", "green"]),
    ("crackinjectionpurple", &["crack", "injection", "purple"]),
    ("crackinjectionorange", &["crack", "injection", "orange"]),
    ("crackpattern", &["crack", "pattern"]),
    ("crackrepair", &["crack", "repair"]),
    ("crackhealing", &["crack", "healing"]),
    ("cracksealing", &["crack", "sealing"]),
    ("injectionflow", &["injection", "flow"]),
    ("injectionpattern", &["injection", "pattern"]),
    ("epoxyinjection", &["epoxy", "injection"]),
    ("polyurethaneflow", &["polyurethane", "flow"]),
    ("foundationgrid", &["foundation", "grid"]),
    ("foundationlines", &["foundation", "lines"]),
    ("foundationmesh", &["foundation", "mesh"]),
    ("foundationstructure", &["foundation", "structure"]),
    ("structuralmesh", &["structural", "mesh"]),
    ("structuralrepair", &["structural", "repair"]),
    ("concreteblocks", &["concrete", "blocks"]),
    ("concretesurface", &["concrete", "surface"]),
    ("concretetexture2", &["concrete", "texture", "2"]),
    ("waterbarrier", &["water", "barrier"]),
    ("waterproofmembrane", &["waterproof", "membrane"]),
    ("repairparticles", &["repair", "particles"]),
    ("repairprocess", &["repair", "process"]),
    ("interactivecracks", &["interactive", "cracks"]),
    ("particles2", &["particles", "2"]),
    ("particles3", &["particles", "3"]),
    ("particles4", &["particles", "4"]),
    ("waves2", &["waves", "2"]),
    ("geometric2", &["geometric", "2"]),
    ("geometric3", &["geometric", "3"]),
    ("gradient2", &["gradient", "2"]),
    ("parallax2", &["parallax", "2"]),
];

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Script class name for a background key, e.g. `crackinjection` becomes
/// `CrackInjectionBackground`.
///
/// Keys with underscores split on them, camel-case keys split before each
/// capital, and lowercase runs use a table of known words. Anything else is
/// treated as a single word.
pub fn class_name(key: &str) -> String {
    let words: Vec<&str> = if key.contains('_') {
        key.split('_').collect()
    } else if key.chars().any(|c| c.is_ascii_uppercase()) {
        let mut words = Vec::new();
        let mut start = 0;
        for (i, c) in key.char_indices().skip(1) {
            if c.is_ascii_uppercase() {
                words.push(&key[start..i]);
                start = i;
            }
        }
        words.push(&key[start..]);
        words
    } else if let Some((_, words)) = KNOWN_WORDS.iter().find(|(k, _)| *k == key) {
        words.to_vec()
    } else {
        vec![key]
    };
    let mut name: String = words.into_iter().map(capitalize).collect();
    name.push_str("Background");
    name
}

const STYLE_TEMPLATE: &str = "position:fixed;top:0;left:0;width:100%;height:100%;z-index:-1;pointer-events:none;";

fn container(key: &str) -> String {
    format!("<div id=\"bg-{key}\" style=\"{STYLE_TEMPLATE}\"></div>")
}

fn style(key: &str) -> String {
    format!(
        "<style>\n#bg-{key}{{{STYLE_TEMPLATE}}}\n#bg-{key} canvas{{display:block;width:100%;height:100%;}}\n</style>"
    )
}

/// Build the snippet for `key` from its script source.
pub fn generate_from_source(key: &str, source: &str) -> String {
    let class = class_name(key);
    let code = minify(&strip_module_syntax(source));
    format!(
        "<!-- Interactive background: {key} -->\n\
         <!-- Paste this block into your page -->\n\
         \n\
         {container}\n\
         \n\
         <script>\n\
         (function(){{\n\
         'use strict';\n\
         {code}\n\
         const container=document.getElementById('bg-{key}');\n\
         if(container){{\n  \
         const bg=new {class}(container);\n  \
         window.addEventListener('beforeunload',function(){{if(bg&&bg.destroy)bg.destroy();}});\n\
         }}\n\
         }})();\n\
         </script>\n\
         \n\
         {style}",
        container = container(key),
        style = style(key),
    )
}

/// Snippet shown when the source for `key` could not be found.
pub fn placeholder(key: &str) -> String {
    let class = class_name(key);
    format!(
        "<!-- Interactive background: {key} -->\n\
         <!-- WARNING: the source for this background could not be loaded. -->\n\
         <!-- Copy it from backgrounds/{key}.js instead. -->\n\
         \n\
         {container}\n\
         \n\
         <script>\n\
         // Paste the code of backgrounds/{key}.js here, replacing `export default`\n\
         // with a plain class declaration.\n\
         //\n\
         // Usage:\n\
         // const container=document.getElementById('bg-{key}');\n\
         // const bg=new {class}(container);\n\
         </script>\n\
         \n\
         {style}",
        container = container(key),
        style = style(key),
    )
}

/// First `<dir>/<key>.js` that exists.
pub fn locate_source(key: &str, source_dirs: &[PathBuf]) -> Result<PathBuf, ExportError> {
    let file = format!("{key}.js");
    source_dirs
        .iter()
        .map(|dir| dir.join(&file))
        .find(|path| path.is_file())
        .ok_or_else(|| ExportError::NotFound {
            key: key.to_string(),
            searched: source_dirs.to_vec(),
        })
}

fn read_source(key: &str, source_dirs: &[PathBuf]) -> Result<String, ExportError> {
    let path = locate_source(key, source_dirs)?;
    tracing::debug!(path = %path.display(), "reading background source");
    fs::read_to_string(&path).map_err(|source| ExportError::Read { path, source })
}

/// A generated snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Snippet {
    Standalone(String),
    Placeholder(String),
}

impl Snippet {
    pub fn html(&self) -> &str {
        match self {
            Snippet::Standalone(html) | Snippet::Placeholder(html) => html,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Snippet::Placeholder(_))
    }

    pub fn write_to(&self, path: &Path) -> Result<(), ExportError> {
        fs::write(path, self.html()).map_err(|source| ExportError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Generate the snippet for `key`, falling back to a placeholder when its
/// source can't be read from any of `source_dirs`.
pub fn generate_standalone(key: &str, source_dirs: &[PathBuf]) -> Snippet {
    match read_source(key, source_dirs) {
        Ok(source) => Snippet::Standalone(generate_from_source(key, &source)),
        Err(err) => {
            tracing::warn!(key, error = %err, "falling back to placeholder snippet");
            Snippet::Placeholder(placeholder(key))
        }
    }
}
