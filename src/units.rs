//! The standard units, and lookups by symbol, name, and authority code. The table is built once,
//! on first use, into the process-wide [`UnitRegistry`].

use std::f64::consts::PI;

use log::debug;
use once_cell::sync::Lazy;

use crate::converter::{LinearConverter, UnitConverter};
use crate::definition_uri;
use crate::dimension::Dimension;
use crate::error::UnitError;
use crate::format::{ascii_symbol, UnitFormat};
use crate::fraction::Fraction;
use crate::frac;
use crate::quantity_kind::QuantityKind;
use crate::registry::UnitRegistry;
use crate::unit::{Factor, Scope, Unit};

/// The registry together with the units it was populated with.
pub(crate) struct UnitSystem {
    pub(crate) registry: UnitRegistry,
    pub(crate) units: Units,
}

pub(crate) static SYSTEM: Lazy<UnitSystem> = Lazy::new(|| {
    let registry = UnitRegistry::new();
    let units = Units::define(&registry);
    debug!("defined {} standard units", registry.len());
    UnitSystem { registry, units }
});

/// The standard units.
#[derive(Debug, Clone)]
pub struct Units {
    // Dimensionless
    pub unity: Unit,
    pub radian: Unit,
    pub steradian: Unit,
    pub percent: Unit,
    pub ppm: Unit,
    pub pixel: Unit,

    // SI base units
    pub metre: Unit,
    pub kilogram: Unit,
    pub second: Unit,
    pub ampere: Unit,
    pub kelvin: Unit,
    pub mole: Unit,
    pub candela: Unit,

    // Derived units
    pub square_metre: Unit,
    pub cubic_metre: Unit,
    pub metres_per_second: Unit,
    pub metres_per_second_squared: Unit,
    pub hertz: Unit,
    pub newton: Unit,
    pub pascal: Unit,
    pub joule: Unit,
    /// Same system unit as the joule, measuring torque.
    pub newton_metre: Unit,
    pub watt: Unit,
    pub coulomb: Unit,
    pub volt: Unit,
    pub farad: Unit,
    pub ohm: Unit,
    pub siemens: Unit,
    pub weber: Unit,
    pub tesla: Unit,
    pub henry: Unit,
    pub lumen: Unit,
    pub lux: Unit,
    pub katal: Unit,

    // Conventional units
    pub kilometre: Unit,
    pub centimetre: Unit,
    pub millimetre: Unit,
    pub micrometre: Unit,
    pub nanometre: Unit,
    pub gram: Unit,
    pub tonne: Unit,
    pub millisecond: Unit,
    pub minute: Unit,
    pub hour: Unit,
    pub day: Unit,
    pub week: Unit,
    pub tropical_year: Unit,
    pub litre: Unit,
    pub hectare: Unit,
    pub kilometres_per_hour: Unit,
    pub gal: Unit,
    pub celsius: Unit,
    pub fahrenheit: Unit,
    pub degree: Unit,
    pub arc_minute: Unit,
    pub arc_second: Unit,
    pub grad: Unit,
    pub microradian: Unit,
    pub foot: Unit,
    pub us_survey_foot: Unit,
    pub inch: Unit,
    pub statute_mile: Unit,
    pub nautical_mile: Unit,
    pub knot: Unit,
    pub bar: Unit,
    pub atmosphere: Unit,
    pub bel: Unit,
    pub decibel: Unit,
}

/// Defines units into one registry.
struct Definitions<'a> {
    registry: &'a UnitRegistry,
}

impl Definitions<'_> {
    fn system(&self, symbol: &str, kind: QuantityKind, factors: &[(&str, i64)], codes: &[u32]) -> Unit {
        let factors = factors
            .iter()
            .map(|(s, p)| Factor::new(s, Fraction::from_int(*p)))
            .collect();
        let unit = Unit::new_system(symbol, kind.dimension(), factors, Some(kind), Scope::Si, true);
        self.registry.define(&unit, codes);
        unit
    }

    /// A named atomic unit: its only factor is itself.
    fn named(&self, symbol: &str, kind: QuantityKind) -> Unit {
        self.system(symbol, kind, &[(symbol, 1)], &[])
    }

    fn conventional(
        &self,
        symbol: &str,
        target: &Unit,
        to_target: UnitConverter,
        scope: Scope,
        prefixable: bool,
        codes: &[u32],
    ) -> Unit {
        let unit = Unit::new_conventional(symbol, target, to_target, scope, prefixable);
        self.registry.define(&unit, codes);
        unit
    }
}

impl Units {
    fn define(registry: &UnitRegistry) -> Self {
        use QuantityKind as K;
        use Scope::*;

        let def = Definitions { registry };

        // The unity goes first so that it becomes the system unit of the dimensionless dimension,
        // ahead of the radian and steradian.
        let unity = Unit::new_system("", Dimension::NONE, vec![], Some(K::Dimensionless), Si, false);
        registry.define(&unity, &[9201, 9203]);
        let radian = def.system("rad", K::Angle, &[("rad", 1)], &[9101]);
        let steradian = def.named("sr", K::SolidAngle);
        let pixel = Unit::new_system("px", Dimension::NONE, vec![Factor::new("px", frac!(1))], None, Other, false);
        registry.define(&pixel, &[]);

        let metre = def.system("m", K::Length, &[("m", 1)], &[9001]);
        let kilogram = Unit::new_system(
            "kg",
            K::Mass.dimension(),
            vec![Factor::new("kg", frac!(1))],
            Some(K::Mass),
            Si,
            false,
        );
        registry.define(&kilogram, &[]);
        let second = def.system("s", K::Time, &[("s", 1)], &[1040]);
        let ampere = def.named("A", K::ElectricCurrent);
        let kelvin = def.named("K", K::Temperature);
        let mole = def.named("mol", K::AmountOfSubstance);
        let candela = def.named("cd", K::LuminousIntensity);

        let square_metre = def.system("m²", K::Area, &[("m", 2)], &[]);
        let cubic_metre = def.system("m³", K::Volume, &[("m", 3)], &[]);
        let metres_per_second = def.system("m∕s", K::Speed, &[("m", 1), ("s", -1)], &[]);
        let metres_per_second_squared =
            def.system("m∕s²", K::Acceleration, &[("m", 1), ("s", -2)], &[]);
        let hertz = def.named("Hz", K::Frequency);
        let newton = def.named("N", K::Force);
        let pascal = def.named("Pa", K::Pressure);
        let joule = def.named("J", K::Energy);
        // After the joule, so that N⋅m computed from arithmetic is still energy.
        let newton_metre = def.system("N⋅m", K::Torque, &[("N", 1), ("m", 1)], &[]);
        let watt = def.named("W", K::Power);
        let coulomb = def.named("C", K::ElectricCharge);
        let volt = def.named("V", K::ElectricPotential);
        let farad = def.named("F", K::ElectricCapacitance);
        let ohm = def.named("Ω", K::ElectricResistance);
        let siemens = def.named("S", K::ElectricConductance);
        let weber = def.named("Wb", K::MagneticFlux);
        let tesla = def.named("T", K::MagneticFluxDensity);
        let henry = def.named("H", K::ElectricInductance);
        let lumen = def.named("lm", K::LuminousFlux);
        let lux = def.named("lx", K::Illuminance);
        let katal = def.named("kat", K::CatalyticActivity);

        let percent = def.conventional("%", &unity, LinearConverter::scale(1, 100), Other, false, &[]);
        let ppm = def.conventional("ppm", &unity, LinearConverter::scale(1, 1_000_000), Other, false, &[9202]);

        let kilometre = def.conventional("km", &metre, LinearConverter::scale(1000, 1), Si, false, &[9036]);
        let centimetre = def.conventional("cm", &metre, LinearConverter::scale(1, 100), Si, false, &[]);
        let millimetre = def.conventional("mm", &metre, LinearConverter::scale(1, 1000), Si, false, &[]);
        let micrometre = def.conventional("µm", &metre, LinearConverter::scale(1, 1_000_000), Si, false, &[]);
        let nanometre = def.conventional("nm", &metre, LinearConverter::scale(1, 1_000_000_000), Si, false, &[]);
        let gram = def.conventional("g", &kilogram, LinearConverter::scale(1, 1000), Si, true, &[]);
        let tonne = def.conventional("t", &kilogram, LinearConverter::scale(1000, 1), Accepted, false, &[]);

        let millisecond = def.conventional("ms", &second, LinearConverter::scale(1, 1000), Si, false, &[]);
        let minute = def.conventional("min", &second, LinearConverter::scale(60, 1), Accepted, false, &[]);
        let hour = def.conventional("h", &second, LinearConverter::scale(3600, 1), Accepted, false, &[]);
        let day = def.conventional("d", &second, LinearConverter::scale(86400, 1), Accepted, false, &[]);
        let week = def.conventional("wk", &second, LinearConverter::scale(604_800, 1), Other, false, &[]);
        // 365.24219 days.
        let tropical_year = def.conventional(
            "a",
            &second,
            LinearConverter::scale(31_556_925_445, 1000),
            Other,
            false,
            &[1029],
        );

        let litre = def.conventional("L", &cubic_metre, LinearConverter::scale(1, 1000), Accepted, true, &[]);
        let hectare = def.conventional("ha", &square_metre, LinearConverter::scale(10_000, 1), Accepted, false, &[]);
        let kilometres_per_hour = def.conventional(
            "km∕h",
            &metres_per_second,
            LinearConverter::scale(1000, 3600),
            Accepted,
            false,
            &[],
        );
        let gal = def.conventional(
            "Gal",
            &metres_per_second_squared,
            LinearConverter::scale(1, 100),
            Other,
            true,
            &[],
        );

        let celsius = def.conventional("°C", &kelvin, LinearConverter::offset(27315, 100), Si, false, &[]);
        // K = (°F + 459.67) × 5/9
        let fahrenheit = def.conventional(
            "°F",
            &kelvin,
            LinearConverter::from_numbers(frac!(5 / 9).into(), frac!(45967 / 180).into()).into_converter(),
            Imperial,
            false,
            &[],
        );

        let degree = def.conventional("°", &radian, LinearConverter::create(PI / 180.0, 0.0), Accepted, false, &[9102, 9122]);
        let arc_minute = def.conventional("′", &radian, LinearConverter::create(PI / 10_800.0, 0.0), Accepted, false, &[9103]);
        let arc_second = def.conventional("″", &radian, LinearConverter::create(PI / 648_000.0, 0.0), Accepted, false, &[9104]);
        let grad = def.conventional("grad", &radian, LinearConverter::create(PI / 200.0, 0.0), Other, false, &[9105]);
        let microradian = def.conventional("µrad", &radian, LinearConverter::scale(1, 1_000_000), Si, false, &[9109]);

        let foot = def.conventional("ft", &metre, LinearConverter::scale(3048, 10_000), Imperial, false, &[9002]);
        let us_survey_foot = def.conventional("ftUS", &metre, LinearConverter::scale(1200, 3937), Imperial, false, &[9003]);
        let inch = def.conventional("in", &metre, LinearConverter::scale(254, 10_000), Imperial, false, &[]);
        let statute_mile = def.conventional("mi", &metre, LinearConverter::scale(1_609_344, 1000), Imperial, false, &[]);
        let nautical_mile = def.conventional("M", &metre, LinearConverter::scale(1852, 1), Other, false, &[9030]);
        let knot = def.conventional("kn", &metres_per_second, LinearConverter::scale(1852, 3600), Other, false, &[]);

        let bar = def.conventional("bar", &pascal, LinearConverter::scale(100_000, 1), Other, true, &[]);
        let atmosphere = def.conventional("atm", &pascal, LinearConverter::scale(101_325, 1), Other, false, &[]);

        // B → 1 is 10^(x/2): the bel measures a power ratio, here taken on a root-power quantity.
        let bel = def.conventional("B", &unity, UnitConverter::Exponential(0.5), Other, true, &[]);
        let decibel = def.conventional("dB", &bel, LinearConverter::scale(1, 10), Other, false, &[]);

        // UCUM spellings.
        registry.alias("Cel", &celsius);
        registry.alias("deg", &degree);
        registry.alias("l", &litre);
        registry.alias("'", &arc_minute);
        registry.alias("\"", &arc_second);
        registry.alias("Ohm", &ohm);
        for unit in registry.units() {
            if let Some(symbol) = unit.symbol() {
                let ascii = ascii_symbol(symbol);
                if ascii != symbol {
                    registry.alias(&ascii, &unit);
                }
            }
        }

        Self {
            unity,
            radian,
            steradian,
            percent,
            ppm,
            pixel,
            metre,
            kilogram,
            second,
            ampere,
            kelvin,
            mole,
            candela,
            square_metre,
            cubic_metre,
            metres_per_second,
            metres_per_second_squared,
            hertz,
            newton,
            pascal,
            joule,
            newton_metre,
            watt,
            coulomb,
            volt,
            farad,
            ohm,
            siemens,
            weber,
            tesla,
            henry,
            lumen,
            lux,
            katal,
            kilometre,
            centimetre,
            millimetre,
            micrometre,
            nanometre,
            gram,
            tonne,
            millisecond,
            minute,
            hour,
            day,
            week,
            tropical_year,
            litre,
            hectare,
            kilometres_per_hour,
            gal,
            celsius,
            fahrenheit,
            degree,
            arc_minute,
            arc_second,
            grad,
            microradian,
            foot,
            us_survey_foot,
            inch,
            statute_mile,
            nautical_mile,
            knot,
            bar,
            atmosphere,
            bel,
            decibel,
        }
    }

    /// The standard units, defined on first use.
    pub fn global() -> &'static Units {
        &SYSTEM.units
    }

    /// The unit for a symbol, an expression like `kg∕(m²⋅s)`, a name like `square metres`, or an
    /// EPSG code written as `EPSG:9001` or as an OGC URN or URL.
    pub fn value_of(text: &str) -> Result<Unit, UnitError> {
        let text = text.trim();
        if let Some(code) = definition_uri::code_of("EPSG", text) {
            let code = code
                .parse()
                .map_err(|_| UnitError::UnknownCode(code.to_string()))?;
            return Self::value_of_epsg(code);
        }
        UnitFormat::default().parse(text)
    }

    /// The unit registered under an EPSG code.
    pub fn value_of_epsg(code: u32) -> Result<Unit, UnitError> {
        UnitRegistry::global()
            .lookup_by_code(code)
            .ok_or_else(|| UnitError::UnknownCode(code.to_string()))
    }

    pub fn epsg_code(unit: &Unit) -> Option<u32> {
        UnitRegistry::global().code_of(unit)
    }

    /// The unit registered under exactly this symbol.
    pub fn get(symbol: &str) -> Option<Unit> {
        UnitRegistry::global().lookup_by_symbol(symbol)
    }

    /// The system unit of a quantity kind.
    pub fn for_quantity(kind: QuantityKind) -> Option<Unit> {
        UnitRegistry::global().for_quantity(kind)
    }

    pub fn for_dimension(dimension: &Dimension) -> Option<Unit> {
        UnitRegistry::global().for_dimension(dimension)
    }

    pub fn is_length(unit: &Unit) -> bool {
        unit.dimension() == QuantityKind::Length.dimension()
    }

    /// Whether the unit measures plane angles. The radian is dimensionless, so this is decided by
    /// the system unit rather than the dimension.
    pub fn is_angular(unit: &Unit) -> bool {
        unit.system_unit().quantity_kind() == Some(QuantityKind::Angle)
    }

    pub fn is_temporal(unit: &Unit) -> bool {
        unit.dimension() == QuantityKind::Time.dimension()
    }

    /// Whether the unit is a multiple of the unity, like `%` or `ppm`.
    pub fn is_scale(unit: &Unit) -> bool {
        unit.system_unit().is_unity()
    }

    pub fn is_pressure(unit: &Unit) -> bool {
        unit.dimension() == QuantityKind::Pressure.dimension()
    }

    /// The factor converting values in `unit` to its system unit: 1000 for the kilometre. NaN if
    /// the conversion is not a scaling.
    pub fn to_standard_unit(unit: &Unit) -> f64 {
        unit.converter_to_system().ratio().unwrap_or(f64::NAN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;

    fn u() -> &'static Units {
        Units::global()
    }

    #[test]
    fn test_epsg_codes() {
        let expected = [
            (9001, &u().metre),
            (9002, &u().foot),
            (9003, &u().us_survey_foot),
            (9030, &u().nautical_mile),
            (9036, &u().kilometre),
            (9101, &u().radian),
            (9102, &u().degree),
            (9122, &u().degree),
            (9103, &u().arc_minute),
            (9104, &u().arc_second),
            (9105, &u().grad),
            (9109, &u().microradian),
            (9201, &u().unity),
            (9203, &u().unity),
            (9202, &u().ppm),
            (1040, &u().second),
            (1029, &u().tropical_year),
        ];
        for (code, unit) in expected {
            assert!(Units::value_of_epsg(code).unwrap().is_same(unit), "{}", code);
        }
        assert_eq!(Units::epsg_code(&u().degree), Some(9102));
        assert_eq!(Units::epsg_code(&u().unity), Some(9201));
        assert_eq!(Units::epsg_code(&u().kelvin), None);
        assert_eq!(Units::value_of_epsg(1).unwrap_err().key(), "UnknownUnit");
    }

    #[test]
    fn test_value_of_codes() {
        assert!(Units::value_of("EPSG:9001").unwrap().is_same(&u().metre));
        assert!(Units::value_of("urn:ogc:def:uom:EPSG::9102")
            .unwrap()
            .is_same(&u().degree));
        assert!(Units::value_of("http://www.opengis.net/def/uom/EPSG/0/9036")
            .unwrap()
            .is_same(&u().kilometre));
        assert!(Units::value_of("EPSG:0").is_err());
    }

    #[test]
    fn test_value_of_names() {
        let expected = [
            ("degree", &u().degree),
            ("degrees", &u().degree),
            ("degrees_north", &u().degree),
            ("degree_N", &u().degree),
            ("degreeN", &u().degree),
            ("decimal_degree", &u().degree),
            ("arcsec", &u().arc_second),
            ("rad", &u().radian),
            ("radians", &u().radian),
            ("second", &u().second),
            ("seconds", &u().second),
            ("min", &u().minute),
            ("minute", &u().minute),
            ("minutes", &u().minute),
            ("h", &u().hour),
            ("hr", &u().hour),
            ("hour", &u().hour),
            ("hours", &u().hour),
            ("d", &u().day),
            ("day", &u().day),
            ("days", &u().day),
            ("metre", &u().metre),
            ("meter", &u().metre),
            ("mètres", &u().metre),
            ("km", &u().kilometre),
            ("kilometre", &u().kilometre),
            ("kilometres", &u().kilometre),
            ("K", &u().kelvin),
            ("degK", &u().kelvin),
            ("Celsius", &u().celsius),
            ("degree Celsius", &u().celsius),
            ("degree_Celcius", &u().celsius),
            ("Pa", &u().pascal),
            ("gal", &u().gal),
        ];
        for (name, unit) in expected {
            let parsed = Units::value_of(name).unwrap();
            assert!(parsed.is_same(unit), "{} gave {}", name, parsed);
        }
    }

    #[test]
    fn test_value_of_expressions() {
        let expected = [
            ("cm/s²", &u().gal),
            ("1/s", &u().hertz),
            ("s-1", &u().hertz),
            ("%", &u().percent),
            ("ppm", &u().ppm),
            ("kg/kg", &u().unity),
            ("kg.kg-1", &u().unity),
            ("m.s-1", &u().metres_per_second),
            ("m/s", &u().metres_per_second),
            ("N⋅m", &u().newton_metre),
            ("N.m", &u().newton_metre),
            ("m⋅N", &u().joule),
            ("[degF]", &u().fahrenheit),
            ("''", &u().arc_second),
            ("m/s2", &u().metres_per_second_squared),
        ];
        for (text, unit) in expected {
            let parsed = Units::value_of(text).unwrap();
            assert!(parsed.is_same(unit), "{} gave {}", text, parsed);
        }
        let speed_per_mass = Units::value_of("K.m2.kg-1.s-1").unwrap();
        assert_eq!(
            speed_per_mass.dimension(),
            Dimension::from_ints([-1, 2, -1, 0, 1, 0, 0])
        );
        assert_eq!(
            Units::value_of("m2.s-1").unwrap().dimension(),
            Dimension::from_ints([0, 2, -1, 0, 0, 0, 0])
        );
        assert_eq!(
            Units::value_of("kg.m-2").unwrap().dimension(),
            Dimension::from_ints([1, -2, 0, 0, 0, 0, 0])
        );
        assert_eq!(
            Units::value_of("J/kg").unwrap().dimension(),
            Dimension::from_ints([0, 2, -2, 0, 0, 0, 0])
        );
        assert_eq!(
            Units::value_of("Pa/s").unwrap().dimension(),
            Dimension::from_ints([1, -1, -3, 0, 0, 0, 0])
        );
    }

    #[test]
    fn test_predicates() {
        assert!(Units::is_length(&u().foot));
        assert!(!Units::is_length(&u().second));
        assert!(Units::is_angular(&u().degree));
        assert!(Units::is_angular(&u().radian));
        assert!(!Units::is_angular(&u().unity));
        assert!(Units::is_temporal(&u().day));
        assert!(Units::is_scale(&u().percent));
        assert!(Units::is_scale(&u().unity));
        assert!(!Units::is_scale(&u().radian));
        assert!(Units::is_pressure(&u().bar));
        assert_eq!(Units::to_standard_unit(&u().kilometre), 1000.0);
        assert_eq!(Units::to_standard_unit(&u().gal), 0.01);
        assert!(Units::to_standard_unit(&u().celsius).is_nan());
    }

    #[test]
    fn test_lookup() {
        assert!(Units::get("Cel").unwrap().is_same(&u().celsius));
        assert!(Units::for_quantity(QuantityKind::Torque)
            .unwrap()
            .is_same(&u().newton_metre));
        assert!(Units::for_dimension(&QuantityKind::Energy.dimension())
            .unwrap()
            .is_same(&u().joule));
        assert!(Units::for_dimension(&Dimension::NONE)
            .unwrap()
            .is_same(&u().unity));
    }

    #[test]
    fn test_torque() {
        let joule = &u().joule;
        let torque = &u().newton_metre;
        assert_ne!(joule, torque);
        assert!(joule.as_type(QuantityKind::Torque).unwrap().is_same(torque));
        assert!(torque.as_type(QuantityKind::Energy).unwrap().is_same(joule));
        assert!(u().newton.multiply(&u().metre).unwrap().is_same(joule));
        assert_eq!(torque.to_string(), "N⋅m");
        assert_eq!(torque.system_unit(), *torque);
        assert_eq!(joule.converter_to(torque).unwrap(), UnitConverter::Identity);
        assert!(joule.as_type(QuantityKind::Length).is_err());
    }

    #[test]
    fn test_logarithmic_units() {
        let to_unity = u().decibel.converter_to(&u().unity).unwrap();
        assert_eq!(to_unity, UnitConverter::Exponential(0.05));
        assert_relative_eq!(u().bel.converter_to(&u().unity).unwrap().convert(2.0), 10.0);
        assert_relative_eq!(to_unity.inverse().convert(100.0), 40.0);
        assert_eq!(u().decibel.multiply(&u().metre).unwrap_err().key(), "NonRatioUnit");
    }

    #[test]
    fn test_temperature_conversions() {
        let c_to_k = u().celsius.converter_to(&u().kelvin).unwrap();
        assert_eq!(c_to_k.convert(27.01), 300.16);
        let f_to_c = u().fahrenheit.converter_to(&u().celsius).unwrap();
        assert_relative_eq!(f_to_c.convert(212.0), 100.0, max_relative = 1e-12);
        assert_relative_eq!(f_to_c.convert(-40.0), -40.0, max_relative = 1e-12);
        assert_eq!(u().celsius.multiply(&u().metre).unwrap_err().key(), "NonRatioUnit");
    }

    #[test]
    fn test_prefixed_arithmetic() {
        let cm = &u().centimetre;
        assert_eq!(cm.multiply(&u().second).unwrap().to_string(), "cm⋅s");
        assert!(u().kilometre.divide(&u().hour).unwrap().is_same(&u().kilometres_per_hour));
        assert!(u().metre.multiply_by(1000.0).is_same(&u().kilometre));
        assert!(u().metre.divide_by(1000.0).is_same(&u().millimetre));
        assert_eq!(u().gram.divide_by(1000.0).to_string(), "mg");
        assert_eq!(u().litre.divide_by(1000.0).to_string(), "mL");
        assert_eq!(u().pascal.multiply_by(100.0).to_string(), "hPa");
        assert_eq!(u().square_metre.multiply_by(1e6).to_string(), "km²");
        assert!(u().kilometre.pow(2).unwrap().dimension() == QuantityKind::Area.dimension());
        assert_eq!(u().kilometre.pow(2).unwrap().to_string(), "km²");
        assert!(u().kilometre.pow(2).unwrap().root(2).unwrap().is_same(&u().kilometre));
        assert_eq!(u().pascal.multiply_by(1000.0).to_string(), "kPa");
        assert!(u().centimetre.multiply_by(2.54).is_equivalent(&u().inch));
    }

    #[test]
    fn test_interning_is_idempotent() {
        let millilitre = u().litre.divide_by(1000.0);
        assert!(Units::value_of("mL").unwrap().is_same(&millilitre));
        assert!(Units::value_of("ml").unwrap().is_same(&millilitre));
        assert!(Units::value_of("cL").unwrap().divide_by(10.0).is_same(&millilitre));
    }

    #[test]
    fn test_survey_foot_is_exact() {
        let to_metre = u().us_survey_foot.converter_to(&u().metre).unwrap();
        assert_eq!(to_metre.convert(656.16666666666667), 200.0);
        let to_foot = u().metre.converter_to(&u().us_survey_foot).unwrap();
        assert_eq!(to_foot.convert(200.0), 656.16666666666667);
    }

    #[test]
    fn test_converter_to_self_is_identity() {
        let derived = u().kilometre.divide(&u().hour).unwrap();
        for unit in [&u().foot, &u().celsius, &u().decibel, &u().kilometre, &derived] {
            assert_eq!(unit.converter_to(unit).unwrap(), UnitConverter::Identity);
        }
    }

    #[test]
    fn test_flux_order_independent() {
        let kg = &u().kilogram;
        let m2 = &u().square_metre;
        let s = &u().second;
        let first = kg.divide(m2).unwrap().multiply(&s.inverse().unwrap()).unwrap();
        let second = kg.divide(&m2.multiply(s).unwrap()).unwrap();
        assert!(first.is_same(&second));
        assert_eq!(first.to_string(), "kg∕(m²⋅s)");
        let parsed = Units::value_of("kg/(m²⋅s)").unwrap();
        assert!(parsed.is_same(&first));
        assert_eq!(UnitFormat::default().format(&parsed), "kg∕(m²⋅s)");
    }

    #[test]
    fn test_registry_enumeration() {
        let registry = UnitRegistry::global();
        let lengths = registry.units_with_dimension(&QuantityKind::Length.dimension());
        assert!(lengths.iter().any(|u| u.is_same(&Units::global().foot)));
        assert!(lengths.iter().all(Units::is_length));
        let imperial = registry.units_in_scope(Scope::Imperial);
        assert!(imperial.iter().any(|u| u.is_same(&Units::global().inch)));
        assert!(!imperial.iter().any(|u| u.is_same(&Units::global().metre)));
    }
}
