use clap::{Parser, Subcommand};
use renderer::Antialiasing;

#[derive(Parser, Debug)]
#[command(
    name = "meshfield",
    author,
    version,
    about = "Mesh gradient generator",
    arg_required_else_help = false
)]
pub struct Cli {
    #[command(flatten)]
    pub run: RunArgs,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Total number of blended colors / control points (2-7).
    #[arg(long, value_name = "N", default_value_t = 4)]
    pub points: usize,

    /// User-picked hex colors, comma separated (e.g. `#a259ff,#ff6b6b`).
    /// The first `points / 2` picks are used; missing picks are filled with
    /// the default purple.
    #[arg(long, value_name = "HEX,..", value_delimiter = ',')]
    pub colors: Vec<String>,

    /// Animate the control points instead of rendering a static field.
    #[arg(long)]
    pub animate: bool,

    /// Override the surface resolution (e.g. `900x500`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_surface_size)]
    pub size: Option<(u32, u32)>,

    /// Optional FPS cap while animating (0=uncapped).
    #[arg(long, value_name = "FPS")]
    pub fps: Option<f32>,

    /// Seed for deterministic palette synthesis; omit for a fresh palette
    /// every run.
    #[arg(long, value_name = "SEED", env = "MESHFIELD_SEED")]
    pub seed: Option<u64>,

    /// Anti-aliasing policy: `auto`, `off`, or an explicit MSAA sample count (e.g. `4`).
    #[arg(
        long,
        value_name = "MODE",
        value_parser = parse_antialias,
        default_value = "auto"
    )]
    pub antialias: Antialiasing,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the synthesized palette as portable style code and exit.
    Export(ExportCommand),
}

#[derive(Parser, Debug)]
pub struct ExportCommand {
    #[command(subcommand)]
    pub format: ExportFormat,
}

#[derive(Subcommand, Debug)]
pub enum ExportFormat {
    /// CSS `background` approximation of the static field.
    Css,
    /// JSON configuration suitable for feeding back into a fresh pipeline
    /// instance.
    Config,
}

pub fn parse() -> Cli {
    Cli::parse()
}

fn parse_surface_size(value: &str) -> Result<(u32, u32), String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got `{value}`"))?;
    let width: u32 = width
        .trim()
        .parse()
        .map_err(|_| format!("invalid width in `{value}`"))?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|_| format!("invalid height in `{value}`"))?;
    if width == 0 || height == 0 {
        return Err(format!("surface size must be non-zero, got `{value}`"));
    }
    Ok((width, height))
}

fn parse_antialias(value: &str) -> Result<Antialiasing, String> {
    match value.to_ascii_lowercase().as_str() {
        "auto" => Ok(Antialiasing::Auto),
        "off" | "0" | "1" => Ok(Antialiasing::Off),
        other => other
            .parse::<u32>()
            .map(Antialiasing::Samples)
            .map_err(|_| format!("expected `auto`, `off`, or a sample count, got `{value}`")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_surface_size() {
        assert_eq!(parse_surface_size("900x500"), Ok((900, 500)));
        assert_eq!(parse_surface_size("1280X720"), Ok((1280, 720)));
        assert!(parse_surface_size("900").is_err());
        assert!(parse_surface_size("0x500").is_err());
        assert!(parse_surface_size("widexhigh").is_err());
    }

    #[test]
    fn parses_antialias_modes() {
        assert_eq!(parse_antialias("auto"), Ok(Antialiasing::Auto));
        assert_eq!(parse_antialias("off"), Ok(Antialiasing::Off));
        assert_eq!(parse_antialias("4"), Ok(Antialiasing::Samples(4)));
        assert!(parse_antialias("lots").is_err());
    }

    #[test]
    fn cli_defaults_are_static_four_point() {
        let cli = Cli::try_parse_from(["meshfield"]).expect("default parse");
        assert_eq!(cli.run.points, 4);
        assert!(cli.run.colors.is_empty());
        assert!(!cli.run.animate);
        assert!(cli.command.is_none());
    }

    #[test]
    fn comma_separated_colors_split() {
        let cli = Cli::try_parse_from(["meshfield", "--colors", "#a259ff,#ff6b6b"])
            .expect("color parse");
        assert_eq!(cli.run.colors, vec!["#a259ff", "#ff6b6b"]);
    }
}
