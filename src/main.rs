use std::error::Error as StdError;

use clap::{Parser, Subcommand};
use env_logger::Env;
use seshat::registry::UnitRegistry;
use seshat::{Quantity, QuantityFormat, Style, Unit, UnitFormat, Units};
use tabled::{Table, Tabled};

#[derive(Parser)]
#[command(name = "seshat")]
#[command(about = "Convert, parse and list units of measurement", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a value from one unit to another
    Convert {
        #[arg(allow_negative_numbers = true)]
        value: f64,
        /// Unit of the value: a symbol, an expression, a name, or an EPSG code
        from: String,
        /// Unit to convert to
        to: String,
    },

    /// Show what a unit expression resolves to
    Parse {
        expression: String,

        /// Write symbols in the ASCII style of UCUM
        #[arg(long)]
        ucum: bool,
    },

    /// List the known units
    List {
        /// Only units with the same dimension as this unit expression
        #[arg(long, value_name = "EXPR")]
        dimension: Option<String>,
    },
}

#[derive(Tabled)]
struct UnitRow {
    symbol: String,
    dimension: String,
    kind: String,
    scope: String,
    #[tabled(rename = "EPSG")]
    epsg: String,
    #[tabled(rename = "to system unit")]
    to_system: String,
}

impl UnitRow {
    fn new(unit: &Unit) -> Self {
        Self {
            symbol: unit.to_string(),
            dimension: unit.dimension().to_string(),
            kind: unit
                .quantity_kind()
                .map(|k| k.to_string())
                .unwrap_or_default(),
            scope: format!("{:?}", unit.scope()),
            epsg: Units::epsg_code(unit)
                .map(|c| c.to_string())
                .unwrap_or_default(),
            to_system: unit.converter_to_system().to_string(),
        }
    }
}

fn main() -> Result<(), Box<dyn StdError>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Convert { value, from, to } => {
            let quantity = Quantity::create(value, &Units::value_of(&from)?);
            let converted = quantity.to(&Units::value_of(&to)?)?;
            println!("{}", QuantityFormat::default().format(&converted));
        }
        Commands::Parse { expression, ucum } => {
            let style = if ucum { Style::Ucum } else { Style::Symbol };
            let fmt = UnitFormat::new(style);
            let unit = Units::value_of(&expression)?;
            println!("symbol:      {}", fmt.format(&unit));
            println!("dimension:   {}", unit.dimension());
            println!("system unit: {}", fmt.format(&unit.system_unit()));
            println!("conversion:  {}", unit.converter_to_system());
            if let Some(kind) = unit.quantity_kind() {
                println!("kind:        {}", kind);
            }
        }
        Commands::List { dimension } => {
            let registry = UnitRegistry::global();
            let units = match dimension {
                Some(expr) => registry.units_with_dimension(&Units::value_of(&expr)?.dimension()),
                None => registry.units(),
            };
            let rows: Vec<UnitRow> = units.iter().map(UnitRow::new).collect();
            println!("{}", Table::new(rows));
        }
    }
    Ok(())
}
