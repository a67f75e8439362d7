use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;

use gdgen_core::CommandArgs;

#[derive(Parser, Debug)]
#[command(
    name = "gdgen",
    version,
    about = "gdgen - engine build-time header generators",
    long_about = "gdgen produces the engine's generated C++ headers and sources. Each invocation runs one generator against a build environment file written by the build system."
)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Build environment (JSON object)
    #[arg(long, value_name = "FILE")]
    pub env: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

/// Paths shared by most generators
#[derive(clap::Args, Debug, Clone, Default)]
pub struct PathArgs {
    /// Input file, directory or list
    #[arg(long, num_args = 1..)]
    pub input: Option<Vec<String>>,

    /// Secondary input
    #[arg(long)]
    pub input2: Option<String>,

    /// Output file
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Secondary output file
    #[arg(long)]
    pub output2: Option<PathBuf>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct LicenseArgs {
    /// COPYRIGHT.txt
    #[arg(long)]
    pub input_copyright: String,

    /// LICENSE.txt
    #[arg(long)]
    pub input_license: String,

    #[arg(long)]
    pub output: PathBuf,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ExportIconArgs {
    /// Platform the icon belongs to, e.g. `android`
    #[arg(long)]
    pub platform_name: String,

    /// `logo` or `run_icon`
    #[arg(long)]
    pub icon_type: String,

    /// SVG source
    #[arg(long)]
    pub input: String,

    #[arg(long)]
    pub output: PathBuf,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "snake_case")]
pub enum Commands {
    /// Rendering-device shader header
    Glsl(PathArgs),
    /// OpenGL ES 3 shader header
    Gles3(PathArgs),
    /// Raw GLSL header
    GlslRaw(PathArgs),
    /// Bundled TLS certificates
    CertsHeader(PathArgs),
    AuthorsHeader(PathArgs),
    DonorsHeader(PathArgs),
    LicenseHeader(LicenseArgs),
    /// `#define ClassDB_Disable_<class> 1` per disabled class
    DisabledClasses(PathArgs),
    ControllerMappings(PathArgs),
    GdextensionInterfaceDumper(PathArgs),
    MakeAppIcon(PathArgs),
    MakeAppSplash(PathArgs),
    ResourceSceneMakeFontsHeader(PathArgs),
    ResourceMakeDefaultThemeIcons(PathArgs),
    MakeIcuData(PathArgs),
    GodotEditorBuiltinFonts(PathArgs),
    MakeDocumentationHeaderCompressed(PathArgs),
    MakeEditorIconsAction(PathArgs),
    MakeEditorTranslations(PathArgs),
    MakeEditorPropertiesTranslations(PathArgs),
    MakeEditorDocumentationTranslations(PathArgs),
    MakeEditorThemesFonts(PathArgs),
    MakeVersionDataHeaders(PathArgs),
    /// Embed the AES256 key from SCRIPT_AES256_ENCRYPTION_KEY
    MakeScriptEncryptionHeader(PathArgs),
    MakeExtensionWrapper(PathArgs),
    MakeGdscriptVirtuals(PathArgs),
    MakeEditorGdscriptTemplates(PathArgs),
    MakeRegisterPlatformApis(PathArgs),
    MakeEditorPlatformExporters(PathArgs),
    /// Detect modules, order them and write their registration sources
    MakeModulesEnabledAndTypes(PathArgs),
    MakeDataClassPath(PathArgs),
    GenerateExportIcon(ExportIconArgs),
}

impl From<PathArgs> for CommandArgs {
    fn from(args: PathArgs) -> Self {
        CommandArgs {
            input: args.input,
            input2: args.input2,
            output: args.output,
            output2: args.output2,
            ..CommandArgs::default()
        }
    }
}

impl Commands {
    /// Normalised arguments for the dispatcher
    pub fn into_args(self) -> CommandArgs {
        match self {
            Commands::LicenseHeader(args) => CommandArgs::new()
                .with_output(args.output)
                .with_extra("input_copyright", args.input_copyright)
                .with_extra("input_license", args.input_license),
            Commands::GenerateExportIcon(args) => CommandArgs::new()
                .with_input(args.input)
                .with_output(args.output)
                .with_extra("platform_name", args.platform_name)
                .with_extra("icon_type", args.icon_type),
            Commands::Glsl(args)
            | Commands::Gles3(args)
            | Commands::GlslRaw(args)
            | Commands::CertsHeader(args)
            | Commands::AuthorsHeader(args)
            | Commands::DonorsHeader(args)
            | Commands::DisabledClasses(args)
            | Commands::ControllerMappings(args)
            | Commands::GdextensionInterfaceDumper(args)
            | Commands::MakeAppIcon(args)
            | Commands::MakeAppSplash(args)
            | Commands::ResourceSceneMakeFontsHeader(args)
            | Commands::ResourceMakeDefaultThemeIcons(args)
            | Commands::MakeIcuData(args)
            | Commands::GodotEditorBuiltinFonts(args)
            | Commands::MakeDocumentationHeaderCompressed(args)
            | Commands::MakeEditorIconsAction(args)
            | Commands::MakeEditorTranslations(args)
            | Commands::MakeEditorPropertiesTranslations(args)
            | Commands::MakeEditorDocumentationTranslations(args)
            | Commands::MakeEditorThemesFonts(args)
            | Commands::MakeVersionDataHeaders(args)
            | Commands::MakeScriptEncryptionHeader(args)
            | Commands::MakeExtensionWrapper(args)
            | Commands::MakeGdscriptVirtuals(args)
            | Commands::MakeEditorGdscriptTemplates(args)
            | Commands::MakeRegisterPlatformApis(args)
            | Commands::MakeEditorPlatformExporters(args)
            | Commands::MakeModulesEnabledAndTypes(args)
            | Commands::MakeDataClassPath(args) => args.into(),
        }
    }
}

/// A parsed command line and the name of its subcommand
#[derive(Debug)]
pub struct Invocation {
    pub cli: Cli,
    pub command: String,
}

impl Invocation {
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = Cli::command().try_get_matches_from(args)?;
        Self::from_matches(&matches)
    }

    fn from_matches(matches: &ArgMatches) -> Result<Self, clap::Error> {
        let cli = Cli::from_arg_matches(matches)?;
        let command = matches.subcommand_name().unwrap_or_default().to_string();
        Ok(Self { cli, command })
    }
}
