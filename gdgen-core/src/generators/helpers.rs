//! Bridge to the engine's own build-helper library
//!
//! Most headers are produced by generator functions that live in the
//! engine's build scripts. For those commands we render a short program
//! that imports the helper from the engine source tree and calls it with
//! literal arguments, then run it with the engine's interpreter.

use std::fs;
use std::process::Command;

use tracing::{debug, info};

use crate::dispatch::{ArgShape, CommandArgs, Generator};
use crate::env::BuildEnv;
use crate::error::{GenError, Result};

/// Env key naming the engine source directory (required)
pub const ENGINE_DIR_KEY: &str = "engine_source_dir";
/// Env key naming the helper interpreter
pub const INTERPRETER_KEY: &str = "python";
const DEFAULT_INTERPRETER: &str = "python3";

/// A literal argument passed to a helper function
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelperArg {
    Str(String),
    List(Vec<String>),
    /// Build nodes exposing `path`, `abspath` and `srcnode()`
    Nodes(Vec<String>),
    /// The build environment as a dictionary
    Env,
    None,
}

/// A fully resolved helper invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelperCall {
    pub module: &'static str,
    pub function: &'static str,
    pub args: Vec<(Option<&'static str>, HelperArg)>,
}

impl HelperCall {
    /// The program that performs this call
    pub fn render(&self, engine_dir: &str, env: &BuildEnv) -> Result<String> {
        let mut args = Vec::with_capacity(self.args.len());
        for (keyword, arg) in &self.args {
            let value = render_arg(arg, env)?;
            args.push(match keyword {
                Some(keyword) => format!("{}={}", keyword, value),
                None => value,
            });
        }

        let mut script = String::new();
        script.push_str("import json\nimport sys\n");
        script.push_str(&format!("sys.path.insert(0, {})\n", py_str(engine_dir)?));
        script.push_str(
            "class Node:\n\
             \x20   def __init__(self, path):\n\
             \x20       self.path = path\n\
             \x20       self.abspath = path\n\
             \x20   def srcnode(self):\n\
             \x20       return self\n",
        );
        script.push_str(&format!("from {} import {}\n", self.module, self.function));
        script.push_str(&format!("{}({})\n", self.function, args.join(", ")));
        Ok(script)
    }

    /// The interpreter command for this call. It runs in the caller's
    /// working directory so relative `--input` and `--output` paths resolve
    /// against the directories created for them.
    pub fn command(&self, env: &BuildEnv) -> Result<Command> {
        let engine_dir = env.require_str(ENGINE_DIR_KEY)?;
        let interpreter = env.str(INTERPRETER_KEY).unwrap_or(DEFAULT_INTERPRETER);
        let script = self.render(engine_dir, env)?;
        debug!("Helper program:\n{}", script);

        let mut command = Command::new(interpreter);
        command.arg("-c").arg(script);
        Ok(command)
    }

    pub fn run(&self, env: &BuildEnv) -> Result<()> {
        let mut command = self.command(env)?;
        let qualified = format!("{}.{}", self.module, self.function);
        info!("Calling build helper {}", qualified);

        let status = command.status().map_err(|e| GenError::HelperFailed {
            function: qualified.clone(),
            reason: format!("cannot start {:?}: {}", command.get_program(), e),
        })?;

        if !status.success() {
            return Err(GenError::HelperFailed { function: qualified, reason: status.to_string() });
        }
        Ok(())
    }
}

fn py_str(text: &str) -> Result<String> {
    Ok(serde_json::to_string(text)?)
}

fn py_list(items: &[String]) -> Result<String> {
    let items: Result<Vec<String>> = items.iter().map(|s| py_str(s)).collect();
    Ok(format!("[{}]", items?.join(", ")))
}

fn render_arg(arg: &HelperArg, env: &BuildEnv) -> Result<String> {
    Ok(match arg {
        HelperArg::Str(s) => py_str(s)?,
        HelperArg::List(items) => py_list(items)?,
        HelperArg::Nodes(items) => {
            let nodes: Result<Vec<String>> =
                items.iter().map(|s| Ok(format!("Node({})", py_str(s)?))).collect();
            format!("[{}]", nodes?.join(", "))
        }
        HelperArg::Env => {
            let json = serde_json::to_string(&env.to_json())?;
            format!("json.loads({})", py_str(&json)?)
        }
        HelperArg::None => "None".to_string(),
    })
}

/// How the `--input` flag becomes the helper's `source`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// `[input]`
    Single,
    /// every `--input` value
    List,
    /// the lines of the input file
    Lines,
    /// the input split on whitespace
    Words,
}

/// Lines of `content` without their trailing `\n`
pub fn split_lines(content: &str) -> Vec<String> {
    content
        .split_inclusive('\n')
        .map(|line| line.strip_suffix('\n').unwrap_or(line).to_string())
        .collect()
}

fn source_arg(args: &CommandArgs, kind: SourceKind) -> Result<HelperArg> {
    Ok(HelperArg::List(match kind {
        SourceKind::Single => vec![args.input()?.to_string()],
        SourceKind::List => args.inputs()?.to_vec(),
        SourceKind::Lines => split_lines(&fs::read_to_string(args.input()?)?),
        SourceKind::Words => args.input()?.split_whitespace().map(str::to_string).collect(),
    }))
}

fn output_str(args: &CommandArgs) -> Result<String> {
    Ok(args.output()?.to_string_lossy().into_owned())
}

type CallBuilder = fn(&CommandArgs) -> Result<Vec<(Option<&'static str>, HelperArg)>>;

enum CallStyle {
    /// `target=[output], source=..., env=None`
    TargetSource(SourceKind),
    /// `target=[output], source=None, env=None`
    TargetOnly,
    Custom(CallBuilder),
}

/// A command served by an engine helper function
pub struct HelperGenerator {
    name: &'static str,
    shape: Option<ArgShape>,
    module: &'static str,
    function: &'static str,
    style: CallStyle,
}

impl HelperGenerator {
    /// Resolve the helper call for `args`
    pub fn call(&self, args: &CommandArgs) -> Result<HelperCall> {
        let call_args = match &self.style {
            CallStyle::TargetSource(kind) => vec![
                (Some("target"), HelperArg::List(vec![output_str(args)?])),
                (Some("source"), source_arg(args, *kind)?),
                (Some("env"), HelperArg::None),
            ],
            CallStyle::TargetOnly => vec![
                (Some("target"), HelperArg::List(vec![output_str(args)?])),
                (Some("source"), HelperArg::None),
                (Some("env"), HelperArg::None),
            ],
            CallStyle::Custom(build) => build(args)?,
        };

        Ok(HelperCall { module: self.module, function: self.function, args: call_args })
    }
}

impl Generator for HelperGenerator {
    fn name(&self) -> &'static str {
        self.name
    }

    fn shape(&self) -> Option<ArgShape> {
        self.shape
    }

    fn generate(&self, args: &CommandArgs, env: &mut BuildEnv) -> Result<()> {
        self.call(args)?.run(env)
    }
}

const fn target_source(
    name: &'static str,
    module: &'static str,
    function: &'static str,
    kind: SourceKind,
) -> HelperGenerator {
    HelperGenerator {
        name,
        shape: Some(ArgShape::InputOutput),
        module,
        function,
        style: CallStyle::TargetSource(kind),
    }
}

const fn target_only(
    name: &'static str,
    module: &'static str,
    function: &'static str,
) -> HelperGenerator {
    HelperGenerator {
        name,
        shape: Some(ArgShape::Output),
        module,
        function,
        style: CallStyle::TargetOnly,
    }
}

const fn custom(
    name: &'static str,
    shape: Option<ArgShape>,
    module: &'static str,
    function: &'static str,
    build: CallBuilder,
) -> HelperGenerator {
    HelperGenerator { name, shape, module, function, style: CallStyle::Custom(build) }
}

/// Every helper-backed command
pub fn helper_generators() -> Vec<HelperGenerator> {
    use SourceKind::*;

    vec![
        custom("glsl", Some(ArgShape::InputOutput), "glsl_builders", "build_rd_header", |args| {
            Ok(vec![
                (None, HelperArg::Str(args.input()?.to_string())),
                (None, HelperArg::Str(output_str(args)?)),
                (None, HelperArg::None),
            ])
        }),
        custom("gles3", Some(ArgShape::InputOutput), "gles3_builders", "build_gles3_header", |args| {
            Ok(vec![
                (None, HelperArg::Str(args.input()?.to_string())),
                (Some("include"), HelperArg::Str("drivers/gles3/shader_gles3.h".to_string())),
                (Some("class_suffix"), HelperArg::Str("GLES3".to_string())),
                (Some("optional_output_filename"), HelperArg::Str(output_str(args)?)),
            ])
        }),
        custom("glsl_raw", Some(ArgShape::InputOutput), "glsl_builders", "build_raw_header", |args| {
            Ok(vec![
                (Some("filename"), HelperArg::Str(args.input()?.to_string())),
                (Some("optional_output_filename"), HelperArg::Str(output_str(args)?)),
            ])
        }),
        custom(
            "certs_header",
            Some(ArgShape::InputOutput),
            "core.core_builders",
            "make_certs_header",
            |args| {
                Ok(vec![
                    (Some("target"), HelperArg::List(vec![output_str(args)?])),
                    (Some("source"), HelperArg::List(vec![args.input()?.to_string()])),
                    (Some("env"), HelperArg::Env),
                ])
            },
        ),
        target_source("authors_header", "core.core_builders", "make_authors_header", Single),
        target_source("donors_header", "core.core_builders", "make_donors_header", Single),
        custom("license_header", None, "core.core_builders", "make_license_header", |args| {
            Ok(vec![
                (Some("target"), HelperArg::List(vec![output_str(args)?])),
                (
                    Some("source"),
                    HelperArg::List(vec![
                        args.extra("input_copyright")?.to_string(),
                        args.extra("input_license")?.to_string(),
                    ]),
                ),
                (Some("env"), HelperArg::None),
            ])
        }),
        target_source(
            "controller_mappings",
            "core.input.input_builders",
            "make_default_controller_mappings",
            List,
        ),
        target_source(
            "gdextension_interface_dumper",
            "core.extension.make_interface_dumper",
            "run",
            Single,
        ),
        target_source("make_app_icon", "main.main_builders", "make_app_icon", Single),
        target_source("make_app_splash", "main.main_builders", "make_splash", Single),
        target_source(
            "resource_scene_make_fonts_header",
            "scene.theme.default_theme_builders",
            "make_fonts_header",
            Single,
        ),
        target_source(
            "resource_make_default_theme_icons",
            "scene.theme.icons.default_theme_icons_builders",
            "make_default_theme_icons_action",
            List,
        ),
        custom(
            "make_icu_data",
            Some(ArgShape::InputOutput),
            "modules.text_server_adv.gdextension_build.methods",
            "make_icu_data",
            |args| {
                Ok(vec![
                    (Some("target"), HelperArg::Nodes(vec![output_str(args)?])),
                    (Some("source"), HelperArg::Nodes(vec![args.input()?.to_string()])),
                    (Some("env"), HelperArg::None),
                ])
            },
        ),
        target_source(
            "godot_editor_builtin_fonts",
            "scene.theme.default_theme_builders",
            "make_fonts_header",
            Words,
        ),
        target_source(
            "make_documentation_header_compressed",
            "editor.editor_builders",
            "make_doc_header",
            Lines,
        ),
        target_source(
            "make_editor_icons_action",
            "editor.icons.editor_icons_builders",
            "make_editor_icons_action",
            Lines,
        ),
        target_source(
            "make_editor_translations",
            "editor.editor_builders",
            "make_editor_translations_header",
            List,
        ),
        target_source(
            "make_editor_properties_translations",
            "editor.editor_builders",
            "make_property_translations_header",
            List,
        ),
        target_source(
            "make_editor_documentation_translations",
            "editor.editor_builders",
            "make_doc_translations_header",
            List,
        ),
        target_source(
            "make_editor_themes_fonts",
            "editor.themes.editor_theme_builders",
            "make_fonts_header",
            Lines,
        ),
        custom(
            "make_version_data_headers",
            Some(ArgShape::Outputs),
            "methods",
            "generate_version_header",
            |args| {
                Ok(vec![
                    (Some("module_version_string"), HelperArg::Str(String::new())),
                    (Some("optional_version_outpath"), HelperArg::Str(output_str(args)?)),
                    (
                        Some("optional_version_hash_output"),
                        HelperArg::Str(args.output2()?.to_string_lossy().into_owned()),
                    ),
                ])
            },
        ),
        target_only("make_extension_wrapper", "core.extension.make_wrappers", "run"),
        target_only("make_gdscript_virtuals", "core.object.make_virtuals", "run"),
        target_source(
            "make_editor_gdscript_templates",
            "editor.template_builders",
            "make_templates",
            List,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn find(name: &str) -> HelperGenerator {
        helper_generators().into_iter().find(|g| g.name == name).unwrap()
    }

    #[test]
    fn test_names_are_unique() {
        let generators = helper_generators();
        let mut names: Vec<&str> = generators.iter().map(|g| g.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), generators.len());
    }

    #[test]
    fn test_render_target_source_call() {
        let args = CommandArgs::new().with_input("AUTHORS.md").with_output("gen/authors.gen.h");
        let call = find("authors_header").call(&args).unwrap();
        let script = call.render("/src/engine", &BuildEnv::new()).unwrap();

        assert!(script.contains("sys.path.insert(0, \"/src/engine\")\n"));
        assert!(script.contains("from core.core_builders import make_authors_header\n"));
        assert!(script.ends_with(
            "make_authors_header(target=[\"gen/authors.gen.h\"], source=[\"AUTHORS.md\"], env=None)\n"
        ));
    }

    #[test]
    fn test_render_escapes_strings() {
        let args = CommandArgs::new().with_input("dir with \"quotes\"\\x.glsl").with_output("o.h");
        let call = find("glsl").call(&args).unwrap();
        let script = call.render("/e", &BuildEnv::new()).unwrap();
        assert!(script.contains(r#"build_rd_header("dir with \"quotes\"\\x.glsl", "o.h", None)"#));
    }

    #[test]
    fn test_render_env_and_nodes() {
        let args = CommandArgs::new().with_input("certs.crt").with_output("certs.gen.h");
        let script = find("certs_header").call(&args).unwrap().render("/e", &BuildEnv::new()).unwrap();
        assert!(script.contains("env=json.loads(\""));
        assert!(script.contains("builtin_certs"));

        let args = CommandArgs::new().with_input("icu.dat").with_output("icu.gen.h");
        let script = find("make_icu_data").call(&args).unwrap().render("/e", &BuildEnv::new()).unwrap();
        assert!(script.contains("target=[Node(\"icu.gen.h\")], source=[Node(\"icu.dat\")]"));
    }

    #[test]
    fn test_line_and_word_sources() {
        let temp_dir = TempDir::new().unwrap();
        let list = temp_dir.path().join("icons.txt");
        fs::write(&list, "a.svg\nb.svg\n").unwrap();

        let args = CommandArgs::new().with_input(list.to_string_lossy()).with_output("icons.gen.h");
        let call = find("make_editor_icons_action").call(&args).unwrap();
        assert_eq!(call.args[1].1, HelperArg::List(vec!["a.svg".to_string(), "b.svg".to_string()]));

        let args = CommandArgs::new().with_input("f1.ttf  f2.woff2").with_output("fonts.gen.h");
        let call = find("godot_editor_builtin_fonts").call(&args).unwrap();
        assert_eq!(call.args[1].1, HelperArg::List(vec!["f1.ttf".to_string(), "f2.woff2".to_string()]));
    }

    #[test]
    fn test_split_lines_keeps_last_unterminated_line() {
        assert_eq!(split_lines("a\nb"), vec!["a", "b"]);
        assert_eq!(split_lines("a\r\n"), vec!["a\r"]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_run_requires_engine_dir() {
        let args = CommandArgs::new().with_output("virtuals.gen.h");
        let call = find("make_gdscript_virtuals").call(&args).unwrap();
        let err = call.run(&BuildEnv::new()).unwrap_err();
        assert!(matches!(err, GenError::MissingEnvKey(ref k) if k == ENGINE_DIR_KEY));
    }

    #[test]
    fn test_version_headers_take_two_outputs() {
        let args = CommandArgs::new().with_output("version_generated.gen.h").with_output2("version_hash.gen.cpp");
        let call = find("make_version_data_headers").call(&args).unwrap();
        assert_eq!(call.args[2].1, HelperArg::Str("version_hash.gen.cpp".to_string()));
    }

    #[test]
    fn test_helper_runs_in_callers_directory() {
        let mut env = BuildEnv::new();
        env.set(ENGINE_DIR_KEY, "/src/engine");
        env.set(INTERPRETER_KEY, "python3.11");
        let args = CommandArgs::new().with_output("gen/virtuals.gen.h");
        let command = find("make_gdscript_virtuals").call(&args).unwrap().command(&env).unwrap();

        assert_eq!(command.get_program(), "python3.11");
        assert_eq!(command.get_current_dir(), None);
        let script: Vec<_> = command.get_args().collect();
        assert_eq!(script[0], "-c");
        let script = script[1].to_string_lossy();
        assert!(script.contains("sys.path.insert(0, \"/src/engine\")"));
        assert!(script.contains("run(target=[\"gen/virtuals.gen.h\"], source=None, env=None)"));
    }
}
