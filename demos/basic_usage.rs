//! Basic usage example for typed-props
//!
//! Reads a configuration with every value family, queries it through the typed
//! getters, edits the tree, and deserializes a section into a Rust struct.

use serde::Deserialize;
use typed_props::{Properties, PropertiesError, Property, from_properties};

#[derive(Debug, Deserialize)]
struct DatabaseConfig {
    host: String,
    port: u16,
    pool: Vec<String>,
    timeout: f64,
}

fn main() -> Result<(), PropertiesError> {
    let text = r#"
        # application settings
        name     = "my app"
        workers  = 0x10
        umask    = 0022
        verbose  = Yes
        ratio    = 2.5e-1
        database = {
            host    = localhost
            port    = 5432
            pool    = primary, "replica one", replica-two
            timeout = 30
        }
    "#;

    let mut props: Properties = text.parse()?;

    println!("name:    {}", props.get_string("name", "unnamed")?);
    println!("workers: {}", props.get_int("workers", 1)?);
    println!("umask:   {:o}", props.get_int("umask", 0o022)?);
    println!("verbose: {}", props.get_bool("verbose", false)?);
    println!("ratio:   {}", props.get_float("ratio", 1.0)?);
    println!("missing: {}", props.get_int("retries", 3)?);

    if let Err(e) = props.get_int("name", 0) {
        println!("expected failure: {e}");
    }

    let database = props.search_property("database")?.struct_value()?;
    let config: DatabaseConfig = from_properties(database)?;
    println!("database: {config:?}");

    props.insert_property(Property::list("features", ["auth", "cache"]))?;
    props.delete_property("umask");

    println!("\nrendered configuration:\n{props}");
    Ok(())
}
