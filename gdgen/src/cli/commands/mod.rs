// Command execution
//
// Every subcommand goes through the same path: load the build environment,
// normalise the arguments and hand them to the generator registry.

use anyhow::{Context, Result};
use tracing::debug;

use gdgen_core::{BuildEnv, standard_registry};

use super::Invocation;

pub fn execute(invocation: Invocation) -> Result<()> {
    let Invocation { cli, command } = invocation;

    let mut env = BuildEnv::load(&cli.env)
        .with_context(|| format!("Failed to load build environment {}", cli.env.display()))?;

    let args = cli.command.into_args();
    debug!("{} arguments: {:?}", command, args);

    standard_registry().run(&command, &args, &mut env)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gdgen_core::GenError;
    use std::fs;
    use tempfile::TempDir;

    fn invoke(args: &[&str]) -> Result<()> {
        let mut argv = vec!["gdgen"];
        argv.extend_from_slice(args);
        execute(Invocation::try_parse_from(argv)?)
    }

    #[test]
    fn test_disabled_classes_end_to_end() {
        let dir = TempDir::new().unwrap();
        let env = dir.path().join("env.json");
        fs::write(&env, r#"{"disable_classes": ["Sprite3D", "Label3D"]}"#).unwrap();
        let output = dir.path().join("core/disabled_classes.gen.h");

        invoke(&[
            "--env",
            &env.to_string_lossy(),
            "disabled_classes",
            "--output",
            &output.to_string_lossy(),
        ])
        .unwrap();

        let text = fs::read_to_string(&output).unwrap();
        assert!(text.contains("#define ClassDB_Disable_Sprite3D 1\n"));
        assert!(text.contains("#define ClassDB_Disable_Label3D 1\n"));
    }

    #[test]
    fn test_platform_apis_from_env() {
        let dir = TempDir::new().unwrap();
        let env = dir.path().join("env.json");
        fs::write(&env, r#"{"platform_apis": ["android"]}"#).unwrap();
        let output = dir.path().join("platform/register_platform_apis.gen.cpp");

        invoke(&[
            "--env",
            &env.to_string_lossy(),
            "make_register_platform_apis",
            "--output",
            &output.to_string_lossy(),
        ])
        .unwrap();

        assert!(fs::read_to_string(&output).unwrap().contains("android"));
    }

    #[test]
    fn test_missing_output_is_unrecognized() {
        let dir = TempDir::new().unwrap();
        let env = dir.path().join("env.json");
        fs::write(&env, "{}").unwrap();

        let err = invoke(&["--env", &env.to_string_lossy(), "make_data_class_path", "--input", "."])
            .unwrap_err();
        let err = err.downcast_ref::<GenError>().unwrap();
        assert!(matches!(err, GenError::UnrecognizedArguments(_)));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_missing_env_file() {
        let err = invoke(&["--env", "/nonexistent/env.json", "disabled_classes", "--output", "o.h"])
            .unwrap_err();
        assert!(err.to_string().contains("Failed to load build environment"));
    }
}
