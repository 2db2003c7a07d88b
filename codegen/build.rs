// Generates the unit name table from the CSV file. Each row maps a lowercase, unaccented name to
// the symbol of a unit in the standard table.

use std::collections::BTreeMap;
use std::env;
use std::error::Error as StdError;
use std::fs::File;
use std::path::Path;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct NameRow {
    name: String,
    symbol: String,
}

fn escape(s: &str) -> String {
    s.escape_default().to_string()
}

fn main() -> Result<(), Box<dyn StdError>> {
    println!("cargo:rerun-if-changed=data/unit_names.csv");
    println!("cargo:rerun-if-changed=codegen/build.rs");

    let out_dir = env::var_os("OUT_DIR").ok_or(env::VarError::NotPresent)?;
    let mut names_path = env::current_dir()?;
    names_path.push("data/unit_names.csv");

    let mut reader = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(File::open(names_path)?);

    // phf_map! rejects duplicate keys, so keep the first row for each name.
    let mut names = BTreeMap::new();
    for row in reader.deserialize() {
        let row: NameRow = row?;
        let name = row.name.to_lowercase();
        if names.contains_key(&name) {
            println!("cargo:warning=duplicate unit name \"{}\"", name);
            continue;
        }
        names.insert(name, row.symbol);
    }

    let templ = r#"
/// Unit names and the symbols they stand for. Names are lowercase, without accents, and use single
/// spaces between words.
pub(crate) static UNIT_NAMES: phf::Map<&'static str, &'static str> = phf::phf_map! {
    //$entries
};
"#;
    let entries: Vec<String> = names
        .iter()
        .map(|(name, symbol)| format!("\"{}\" => \"{}\",", escape(name), escape(symbol)))
        .collect();
    let code = templ.replace("//$entries", &entries.join("\n    "));

    let dest_path = Path::new(&out_dir).join("unit_names.rs");
    std::fs::write(dest_path, code)?;
    Ok(())
}
