use taxonomy_admin::settings::*;

fn main() -> anyhow::Result<()> {
    // Default location for this build profile
    let settings = parse_settings(None)?;
    println!("Loaded settings: {settings:?}");

    // Missing file
    println!("Error on invalid path: {:?}", parse_settings(Some("")).is_err());

    // $ cargo run --bin settings_demo -- --settings=settings/release.toml
    let cli = Cli::parse();
    let settings = parse_settings(cli.settings.as_deref())?;
    println!("Loaded settings: {settings:?}");
    Ok(())
}
