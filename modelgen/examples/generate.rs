//! Generates Rust and C++ sources plus an XSD from a model declaration.
//!
//! Run with: `cargo run --example generate -- [declaration.xml] [out_dir]`
//!
//! Without arguments a built-in declaration is used and the output goes to
//! `./generated`.

use modelgen::prelude::*;
use std::path::PathBuf;

const DEMO: &str = r#"<models>
  <model name="Person" doc="Someone with a postal address">
    <field name="name" type="string"/>
    <field name="age" type="u8"/>
    <field name="nickname" type="string?"/>
    <field name="tags" type="[string]"/>
    <field name="address" type="Address"/>
    <field name="friends" type="[Person]" doc="People this person knows"/>
    <field name="avatar" type="bytes?"/>
  </model>
  <model name="Address">
    <field name="street" type="string"/>
    <field name="city" type="string"/>
    <field name="zip" type="int"/>
  </model>
</models>"#;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let xml = match args.next() {
        Some(path) => std::fs::read_to_string(&path)?,
        None => DEMO.to_string(),
    };
    let out_dir = args
        .next()
        .map_or_else(|| PathBuf::from("generated"), PathBuf::from);
    std::fs::create_dir_all(&out_dir)?;

    let models = parse_models(&xml)?;
    let root = models
        .models()
        .first()
        .map(|model| model.name.clone())
        .ok_or_else(|| anyhow::anyhow!("declaration holds no models"))?;
    let ir = SchemaIr::new(models)?;

    let generator = Generator::new(&ir).with_options(
        GeneratorOptions::new()
            .cpp_namespace("demo")
            .xsd_target_namespace("urn:modelgen:demo"),
    );

    for definition in generator.generate_all()? {
        let path = definition.write_to(&out_dir)?;
        println!("{}: {}", definition.language, path.display());
        for omission in &definition.omitted {
            println!("  no {} routines for {}: {}", omission.format, omission.model, omission.reason);
        }
    }

    let xsd_path = out_dir.join(format!("{}.xsd", root));
    std::fs::write(&xsd_path, generator.to_xsd(&root)?)?;
    tracing::info!("Wrote XSD for {} to {}", root, xsd_path.display());
    println!("xsd: {}", xsd_path.display());

    Ok(())
}
