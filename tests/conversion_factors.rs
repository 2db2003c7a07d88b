//! The conversion factors of the standard units, checked against uom.

use approx::assert_relative_eq;
use seshat::{Unit, Units};
use uom::si::f64::{
    Angle, Area, Length, Mass, Pressure, ThermodynamicTemperature, Time, Velocity, Volume,
};
use uom::si::{
    angle, area, length, mass, pressure, thermodynamic_temperature, time, velocity, volume,
};

fn to_system(unit: &Unit, value: f64) -> f64 {
    unit.converter_to_system().convert(value)
}

#[test]
fn test_lengths() {
    let u = Units::global();
    let cases = [
        (&u.kilometre, Length::new::<length::kilometer>(1.0)),
        (&u.centimetre, Length::new::<length::centimeter>(1.0)),
        (&u.millimetre, Length::new::<length::millimeter>(1.0)),
        (&u.micrometre, Length::new::<length::micrometer>(1.0)),
        (&u.nanometre, Length::new::<length::nanometer>(1.0)),
        (&u.foot, Length::new::<length::foot>(1.0)),
        (&u.us_survey_foot, Length::new::<length::foot_survey>(1.0)),
        (&u.inch, Length::new::<length::inch>(1.0)),
        (&u.statute_mile, Length::new::<length::mile>(1.0)),
        (&u.nautical_mile, Length::new::<length::nautical_mile>(1.0)),
    ];
    for (unit, expected) in cases {
        assert_relative_eq!(
            to_system(unit, 1.0),
            expected.get::<length::meter>(),
            max_relative = 1e-12
        );
    }
}

#[test]
fn test_other_scales() {
    let u = Units::global();
    assert_relative_eq!(
        to_system(&u.gram, 1.0),
        Mass::new::<mass::gram>(1.0).get::<mass::kilogram>(),
        max_relative = 1e-12
    );
    assert_relative_eq!(
        to_system(&u.tonne, 1.0),
        Mass::new::<mass::ton>(1.0).get::<mass::kilogram>(),
        max_relative = 1e-12
    );
    for (unit, expected) in [
        (&u.minute, Time::new::<time::minute>(1.0)),
        (&u.hour, Time::new::<time::hour>(1.0)),
        (&u.day, Time::new::<time::day>(1.0)),
        (&u.millisecond, Time::new::<time::millisecond>(1.0)),
    ] {
        assert_relative_eq!(
            to_system(unit, 1.0),
            expected.get::<time::second>(),
            max_relative = 1e-12
        );
    }
    assert_relative_eq!(
        to_system(&u.litre, 1.0),
        Volume::new::<volume::liter>(1.0).get::<volume::cubic_meter>(),
        max_relative = 1e-12
    );
    assert_relative_eq!(
        to_system(&u.hectare, 1.0),
        Area::new::<area::hectare>(1.0).get::<area::square_meter>(),
        max_relative = 1e-12
    );
    assert_relative_eq!(
        to_system(&u.kilometres_per_hour, 1.0),
        Velocity::new::<velocity::kilometer_per_hour>(1.0).get::<velocity::meter_per_second>(),
        max_relative = 1e-12
    );
    assert_relative_eq!(
        to_system(&u.knot, 1.0),
        Velocity::new::<velocity::knot>(1.0).get::<velocity::meter_per_second>(),
        max_relative = 1e-12
    );
    assert_relative_eq!(
        to_system(&u.bar, 1.0),
        Pressure::new::<pressure::bar>(1.0).get::<pressure::pascal>(),
        max_relative = 1e-12
    );
    assert_relative_eq!(
        to_system(&u.atmosphere, 1.0),
        Pressure::new::<pressure::atmosphere>(1.0).get::<pressure::pascal>(),
        max_relative = 1e-12
    );
}

#[test]
fn test_angles() {
    let u = Units::global();
    assert_relative_eq!(
        to_system(&u.degree, 1.0),
        Angle::new::<angle::degree>(1.0).get::<angle::radian>(),
        max_relative = 1e-12
    );
    assert_relative_eq!(
        to_system(&u.grad, 1.0),
        Angle::new::<angle::gon>(1.0).get::<angle::radian>(),
        max_relative = 1e-12
    );
}

#[test]
fn test_temperatures() {
    let u = Units::global();
    for value in [-40.0, 0.0, 37.5, 100.0] {
        assert_relative_eq!(
            to_system(&u.celsius, value),
            ThermodynamicTemperature::new::<thermodynamic_temperature::degree_celsius>(value)
                .get::<thermodynamic_temperature::kelvin>(),
            max_relative = 1e-12
        );
        assert_relative_eq!(
            to_system(&u.fahrenheit, value),
            ThermodynamicTemperature::new::<thermodynamic_temperature::degree_fahrenheit>(value)
                .get::<thermodynamic_temperature::kelvin>(),
            max_relative = 1e-12
        );
    }
}
