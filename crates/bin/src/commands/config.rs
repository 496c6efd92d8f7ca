//! Config command - shows the database configuration taken from the environment.

use gatehouse::config::DatabaseConfig;

use crate::output::{OutputFormat, print_fields};

/// Run the config command
pub fn run(format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let config = DatabaseConfig::from_env()?;
    let url = config.redacted_url();

    match format {
        OutputFormat::Human => print_fields(&[
            ("Database", url),
            ("Dialect", config.dialect.to_string()),
            ("Schema", config.schema_path.clone()),
            ("Strict", config.strict.to_string()),
            ("Verbose", config.verbose.to_string()),
        ]),
        OutputFormat::Json => {
            let value = serde_json::json!({
                "url": url,
                "dialect": config.dialect.as_str(),
                "schema": config.schema_path,
                "strict": config.strict,
                "verbose": config.verbose,
            });
            println!("{}", serde_json::to_string(&value)?);
        }
    }

    Ok(())
}
