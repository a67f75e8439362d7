//! Documentation class path table

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;
use walkdir::WalkDir;

use crate::dispatch::{ArgShape, CommandArgs, Generator};
use crate::env::BuildEnv;
use crate::error::Result;
use crate::modules::{ConfigRegistry, detect_modules_within_searchpath};

/// Class name -> documentation directory for every `*.xml` directly inside
/// `<root>/<relative_dir>`
pub fn collect_doc_classes(root: &Path, relative_dir: &str) -> Result<BTreeMap<String, String>> {
    let dir = root.join(relative_dir);
    let mut found = BTreeMap::new();
    if !dir.is_dir() {
        return Ok(found);
    }

    for entry in WalkDir::new(&dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "xml") {
            continue;
        }
        if let Some(stem) = path.file_stem() {
            found.insert(stem.to_string_lossy().into_owned(), relative_dir.to_string());
        }
    }

    debug!("{} documented classes in {}", found.len(), dir.display());
    Ok(found)
}

pub fn render_doc_data_class_path(docs: &BTreeMap<String, String>) -> String {
    let mut out = format!("static const int _doc_data_class_path_count = {};\n", docs.len());
    out.push_str("struct _DocDataClassPath { const char* name; const char* path; };\n");
    out.push_str(&format!(
        "static const _DocDataClassPath _doc_data_class_paths[{}] = {{\n",
        docs.len() + 1
    ));
    for (class, path) in docs {
        out.push_str(&format!("\t{{\"{}\", \"{}\"}},\n", class, path));
    }
    out.push_str("\t{nullptr, nullptr}\n");
    out.push_str("};\n");
    out
}

/// `make_data_class_path --input <engine root> --output <header>`
pub struct DataClassPath {
    configs: Arc<ConfigRegistry>,
}

impl DataClassPath {
    pub fn new(configs: Arc<ConfigRegistry>) -> Self {
        Self { configs }
    }
}

impl Generator for DataClassPath {
    fn name(&self) -> &'static str {
        "make_data_class_path"
    }

    fn shape(&self) -> Option<ArgShape> {
        Some(ArgShape::InputOutput)
    }

    fn generate(&self, args: &CommandArgs, env: &mut BuildEnv) -> Result<()> {
        let root = Path::new(args.input()?);
        let platform = env.platform().to_string();
        let modules =
            detect_modules_within_searchpath(&root.join("modules"), env, &platform, &self.configs)?;

        let mut docs = BTreeMap::new();
        for name in modules.keys() {
            docs.extend(collect_doc_classes(root, &format!("modules/{}/doc_classes", name))?);
        }

        fs::write(args.output()?, render_doc_data_class_path(&docs))?;
        Ok(())
    }
}
