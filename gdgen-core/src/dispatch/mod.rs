//! Command dispatch
//!
//! Maps a command name to a registered [`Generator`], validates the
//! argument shape, makes sure the output directories exist and runs the
//! generator. Every invocation is one-shot and synchronous.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::env::BuildEnv;
use crate::error::{GenError, Result};
use crate::output::ensure_output_dir;

/// Normalised command-line arguments of one invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandArgs {
    pub input: Option<Vec<String>>,
    pub input2: Option<String>,
    pub output: Option<PathBuf>,
    pub output2: Option<PathBuf>,
    /// Command specific flags such as `platform_name`
    pub extra: BTreeMap<String, String>,
}

/// Which positional paths an invocation carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgShape {
    /// input, input2, output, output2
    InputsOutputs,
    /// input, input2, output
    InputsOutput,
    /// output, output2
    Outputs,
    /// input, output
    InputOutput,
    /// output only
    Output,
}

impl fmt::Display for ArgShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ArgShape::InputsOutputs => "input, input2, output, output2",
            ArgShape::InputsOutput => "input, input2, output",
            ArgShape::Outputs => "output, output2",
            ArgShape::InputOutput => "input, output",
            ArgShape::Output => "output",
        };
        f.write_str(text)
    }
}

impl CommandArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = Some(vec![input.into()]);
        self
    }

    pub fn with_inputs<I, S>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.input = Some(inputs.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_input2(mut self, input2: impl Into<String>) -> Self {
        self.input2 = Some(input2.into());
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn with_output2(mut self, output2: impl Into<PathBuf>) -> Self {
        self.output2 = Some(output2.into());
        self
    }

    pub fn with_extra(mut self, key: &str, value: impl Into<String>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }

    /// Classify the argument set, most specific shape first
    pub fn shape(&self) -> Result<ArgShape> {
        let i1 = self.input.is_some();
        let i2 = self.input2.is_some();
        let o1 = self.output.is_some();
        let o2 = self.output2.is_some();

        match (i1, i2, o1, o2) {
            (true, true, true, true) => Ok(ArgShape::InputsOutputs),
            (true, true, true, false) => Ok(ArgShape::InputsOutput),
            (_, _, true, true) => Ok(ArgShape::Outputs),
            (true, _, true, _) => Ok(ArgShape::InputOutput),
            (_, _, true, _) => Ok(ArgShape::Output),
            _ => Err(self.unrecognized()),
        }
    }

    /// The single `--input` path
    pub fn input(&self) -> Result<&str> {
        match self.input.as_deref() {
            Some([one]) => Ok(one),
            _ => Err(self.unrecognized()),
        }
    }

    /// Every `--input` path
    pub fn inputs(&self) -> Result<&[String]> {
        self.input.as_deref().ok_or_else(|| self.unrecognized())
    }

    pub fn output(&self) -> Result<&Path> {
        self.output.as_deref().ok_or_else(|| self.unrecognized())
    }

    pub fn output2(&self) -> Result<&Path> {
        self.output2.as_deref().ok_or_else(|| self.unrecognized())
    }

    /// A command specific flag
    pub fn extra(&self, key: &str) -> Result<&str> {
        self.extra.get(key).map(String::as_str).ok_or_else(|| self.unrecognized())
    }

    pub fn unrecognized(&self) -> GenError {
        GenError::UnrecognizedArguments(format!("{:?}", self))
    }
}

/// A header generator reachable from the command line
pub trait Generator {
    /// Command name, e.g. `make_register_platform_apis`
    fn name(&self) -> &'static str;

    /// The argument shape this generator takes, or `None` when it reads
    /// its own named flags
    fn shape(&self) -> Option<ArgShape>;

    /// Produce the output files
    fn generate(&self, args: &CommandArgs, env: &mut BuildEnv) -> Result<()>;
}

/// Static dispatch table from command name to generator
#[derive(Default)]
pub struct GeneratorRegistry {
    generators: BTreeMap<&'static str, Box<dyn Generator>>,
}

impl GeneratorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a generator, replacing one with the same name
    pub fn register(&mut self, generator: Box<dyn Generator>) {
        self.generators.insert(generator.name(), generator);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Generator> {
        self.generators.get(name).map(|g| g.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.generators.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.generators.keys().copied()
    }

    /// Run `command`: check arguments, create output directories, generate
    pub fn run(&self, command: &str, args: &CommandArgs, env: &mut BuildEnv) -> Result<()> {
        let generator =
            self.get(command).ok_or_else(|| GenError::UnknownCommand(command.to_string()))?;

        if let Some(expected) = generator.shape() {
            let actual = args.shape()?;
            if actual != expected {
                debug!("{} expects ({}), got ({})", command, expected, actual);
                return Err(args.unrecognized());
            }
        }

        for output in [&args.output, &args.output2].into_iter().flatten() {
            ensure_output_dir(output)?;
        }

        info!("Running {}", command);
        generator.generate(args, env)
    }
}
