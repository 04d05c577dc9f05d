//! Command-line interface for the archdiagram utility
//!
//! Running `archdiagram` with no arguments renders the platform architecture
//! diagram to `docs/diagrams/architecture.png`.

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing::debug;

use archdiagram::blueprints::ecommerce;
use archdiagram::core::logging::init_logging;
use archdiagram::graphviz::{GraphvizRenderer, DEFAULT_ENGINE};
use archdiagram::{Diagram, Direction, OutputFormat, Renderer};

/// Archdiagram - Render the data platform architecture diagram
#[derive(Parser)]
#[command(name = "archdiagram")]
#[command(about = "Renders the e-commerce data platform architecture diagram through Graphviz")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, global = true)]
    pub log_format: Option<LogFormat>,
}

/// Log level options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the diagram to an image file (the default)
    Render(RenderArgs),

    /// Print the Graphviz DOT source to stdout
    Dot {
        #[command(flatten)]
        icons: IconsArgs,
    },

    /// Validate the diagram and its icons without rendering
    Check {
        #[command(flatten)]
        icons: IconsArgs,
    },

    /// List clusters, nodes and edges
    Describe {
        /// Show in JSON format
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        icons: IconsArgs,
    },
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct IconsArgs {
    /// Directory holding the custom icon images
    #[arg(long, default_value = ecommerce::ICONS_DIR)]
    pub icons_dir: PathBuf,
}

impl Default for IconsArgs {
    fn default() -> Self {
        Self {
            icons_dir: PathBuf::from(ecommerce::ICONS_DIR),
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct RenderArgs {
    /// Output path without extension
    #[arg(short, long, default_value = ecommerce::OUTPUT_STEM)]
    pub output: PathBuf,

    /// Output file format
    #[arg(short, long, value_enum, default_value_t = FormatChoice::Png)]
    pub format: FormatChoice,

    /// Layout direction (LR|RL|TB|BT), overriding the diagram's own
    #[arg(short, long, value_parser = parse_direction)]
    pub direction: Option<Direction>,

    /// Graphviz engine binary
    #[arg(long, default_value = DEFAULT_ENGINE)]
    pub engine: String,

    #[command(flatten)]
    pub icons: IconsArgs,
}

fn parse_direction(value: &str) -> Result<Direction, String> {
    Direction::parse(value)
        .ok_or_else(|| format!("unknown direction '{value}' (expected LR, RL, TB or BT)"))
}

impl Default for RenderArgs {
    fn default() -> Self {
        Self {
            output: PathBuf::from(ecommerce::OUTPUT_STEM),
            format: FormatChoice::Png,
            direction: None,
            engine: DEFAULT_ENGINE.to_string(),
            icons: IconsArgs::default(),
        }
    }
}

/// Supported output formats
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum FormatChoice {
    #[default]
    Png,
    Jpg,
    Svg,
    Pdf,
    Dot,
}

impl From<FormatChoice> for OutputFormat {
    fn from(value: FormatChoice) -> Self {
        match value {
            FormatChoice::Png => OutputFormat::Png,
            FormatChoice::Jpg => OutputFormat::Jpg,
            FormatChoice::Svg => OutputFormat::Svg,
            FormatChoice::Pdf => OutputFormat::Pdf,
            FormatChoice::Dot => OutputFormat::Dot,
        }
    }
}

/// Main CLI application
#[derive(Default)]
pub struct ArchdiagramApp;

impl ArchdiagramApp {
    pub fn new() -> Self {
        Self
    }

    /// Run the application with the given CLI arguments
    pub fn run(&self, cli: Cli) -> Result<()> {
        // Flags win; otherwise ARCHDIAGRAM_LOG_* / RUST_LOG apply inside init_logging.
        if let Err(e) = init_logging(
            cli.log_level.map(|l| l.as_str()),
            cli.log_format.map(|f| f.as_str()),
        ) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("archdiagram v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            None => self.render_command(RenderArgs::default(), cli.verbose),
            Some(Commands::Render(args)) => self.render_command(args, cli.verbose),
            Some(Commands::Dot { icons }) => self.dot_command(icons),
            Some(Commands::Check { icons }) => self.check_command(icons, cli.verbose),
            Some(Commands::Describe { json, icons }) => self.describe_command(json, icons),
        }
    }

    fn platform(&self, icons: &IconsArgs, render: Option<&RenderArgs>) -> Result<Diagram> {
        let mut config = ecommerce::config();
        if let Some(args) = render {
            config = config
                .filename(args.output.clone())
                .format(args.format.into());
            if let Some(direction) = args.direction {
                config = config.direction(direction);
            }
        }
        debug!(icons_dir = %icons.icons_dir.display(), "Describing platform");
        ecommerce::platform_with(config, &icons.icons_dir)
    }

    /// Handle the render command
    fn render_command(&self, args: RenderArgs, verbose: bool) -> Result<()> {
        let diagram = self.platform(&args.icons, Some(&args))?;
        let renderer = GraphvizRenderer::with_engine(args.engine.as_str());

        if verbose {
            eprintln!(
                "Rendering {} nodes, {} edges with {}",
                diagram.node_count(),
                diagram.edge_count(),
                renderer.engine()
            );
        }

        let rendered = renderer.render(&diagram)?;
        println!("{}", confirmation(&rendered.path));
        Ok(())
    }

    /// Handle the dot command
    fn dot_command(&self, icons: IconsArgs) -> Result<()> {
        let diagram = self.platform(&icons, None)?;
        print!("{}", archdiagram::to_dot(&diagram)?);
        Ok(())
    }

    /// Handle the check command
    fn check_command(&self, icons: IconsArgs, verbose: bool) -> Result<()> {
        let diagram = self.platform(&icons, None)?;
        let verified = archdiagram::check(&diagram)?;

        if verbose {
            for icon in &verified {
                eprintln!(
                    "  {} ({}, {}x{})",
                    icon.path.display(),
                    icon.format,
                    icon.width,
                    icon.height
                );
            }
        }
        println!(
            "✅ Diagram is valid: {} nodes, {} clusters, {} edges, {} icons",
            diagram.node_count(),
            diagram.cluster_count(),
            diagram.edge_count(),
            verified.len()
        );
        Ok(())
    }

    /// Handle the describe command
    fn describe_command(&self, json: bool, icons: IconsArgs) -> Result<()> {
        let diagram = self.platform(&icons, None)?;
        print!("{}", describe(&diagram, json)?);
        Ok(())
    }
}

/// Line printed after a successful render
pub fn confirmation(path: &std::path::Path) -> String {
    format!("✅ Architecture diagram generated: {}", path.display())
}

fn one_line(label: &str) -> String {
    label.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Summarize a diagram as indented text or JSON
pub fn describe(diagram: &Diagram, json: bool) -> Result<String> {
    if json {
        let mut out = serde_json::to_string_pretty(diagram)?;
        out.push('\n');
        return Ok(out);
    }

    let mut out = String::new();
    writeln!(out, "{}", diagram.title())?;
    writeln!(out, "  output: {}", diagram.output_path().display())?;
    writeln!(out)?;
    for cluster in diagram.clusters() {
        let indent = "  ".repeat(cluster.depth + 1);
        writeln!(out, "{indent}[{}]", cluster.label)?;
        for node in diagram.nodes_in(Some(cluster.id)) {
            writeln!(out, "{indent}  {} {} <{}>", node.id, one_line(&node.label), node.icon)?;
        }
    }
    for node in diagram.nodes_in(None) {
        writeln!(out, "  {} {} <{}>", node.id, one_line(&node.label), node.icon)?;
    }
    writeln!(out)?;
    for edge in diagram.edges() {
        write!(out, "  {} -> {}", edge.from, edge.to)?;
        if let Some(label) = &edge.label {
            write!(out, " \"{}\"", label)?;
        }
        if !edge.style.is_solid() {
            write!(out, " ({})", edge.style)?;
        }
        writeln!(out)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn platform() -> Diagram {
        ecommerce::platform(Path::new(ecommerce::ICONS_DIR)).unwrap()
    }

    #[test]
    fn test_cli_parsing_no_arguments() {
        let cli = Cli::try_parse_from(["archdiagram"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
        assert!(cli.log_level.is_none());
    }

    #[test]
    fn test_cli_parsing_render_defaults_match_default_impl() {
        let cli = Cli::try_parse_from(["archdiagram", "render"]).unwrap();
        match cli.command {
            Some(Commands::Render(args)) => assert_eq!(args, RenderArgs::default()),
            _ => panic!("Expected Render command"),
        }
    }

    #[test]
    fn test_cli_parsing_render_options() {
        let cli = Cli::try_parse_from([
            "archdiagram",
            "render",
            "--output",
            "out/arch",
            "--format",
            "svg",
            "--engine",
            "/opt/graphviz/bin/dot",
            "--direction",
            "tb",
            "--icons-dir",
            "assets",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Render(args)) => {
                assert_eq!(args.output, PathBuf::from("out/arch"));
                assert_eq!(args.format, FormatChoice::Svg);
                assert_eq!(args.engine, "/opt/graphviz/bin/dot");
                assert_eq!(args.direction, Some(Direction::TopBottom));
                assert_eq!(args.icons.icons_dir, PathBuf::from("assets"));
            }
            _ => panic!("Expected Render command"),
        }
    }

    #[test]
    fn test_cli_parsing_describe_json() {
        let cli = Cli::try_parse_from(["archdiagram", "describe", "--json"]).unwrap();
        match cli.command {
            Some(Commands::Describe { json, icons }) => {
                assert!(json);
                assert_eq!(icons, IconsArgs::default());
            }
            _ => panic!("Expected Describe command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["archdiagram", "check", "--verbose", "--log-level", "debug"])
            .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.log_level, Some(LogLevel::Debug));
    }

    #[test]
    fn test_cli_parsing_rejects_unknown_direction() {
        assert!(Cli::try_parse_from(["archdiagram", "render", "--direction", "diagonal"]).is_err());
    }

    #[test]
    fn test_direction_override_reaches_diagram() {
        let app = ArchdiagramApp::new();
        let args = RenderArgs {
            direction: Some(Direction::BottomTop),
            ..RenderArgs::default()
        };
        let diagram = app.platform(&args.icons, Some(&args)).unwrap();
        assert_eq!(diagram.config().direction, Direction::BottomTop);

        let default = app.platform(&IconsArgs::default(), None).unwrap();
        assert_eq!(default.config().direction, Direction::LeftRight);
    }

    #[test]
    fn test_format_choice_conversion() {
        assert_eq!(OutputFormat::from(FormatChoice::Png), OutputFormat::Png);
        assert_eq!(OutputFormat::from(FormatChoice::Dot), OutputFormat::Dot);
    }

    #[test]
    fn test_confirmation_line() {
        assert_eq!(
            confirmation(Path::new("docs/diagrams/architecture.png")),
            "✅ Architecture diagram generated: docs/diagrams/architecture.png"
        );
    }

    #[test]
    fn test_describe_text() {
        let text = describe(&platform(), false).unwrap();
        assert!(text.starts_with("E-Commerce Data Platform - Modern Architecture\n"));
        assert!(text.contains("    [Bronze Layer]"));
        assert!(text.contains("Kaggle Dataset (100k orders) <docs/icons/kaggle.png>"));
        assert!(text.contains("<aws.storage.s3>"));
        assert!(text.contains("\"trigger\" (dashed)"));
    }

    #[test]
    fn test_describe_json() {
        let json = describe(&platform(), true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["nodes"].as_array().unwrap().len(), 13);
        assert_eq!(value["edges"].as_array().unwrap().len(), 20);
        assert_eq!(value["edges"][0]["from"], "n0");
        assert_eq!(value["config"]["title"], ecommerce::TITLE);
    }
}
