use super::Parser;

#[derive(Parser, Debug)]
#[command(about = "Taxonomy admin panel")]
pub struct Cli {
    /// Path to a TOML settings file.
    #[arg(long)]
    pub settings: Option<String>,
}
