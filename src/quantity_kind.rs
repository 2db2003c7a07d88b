//! Tags for the physical quantity a unit measures. Two quantities can share a dimension and still
//! be different kinds, like energy and torque.

use std::fmt::Display;

use crate::dimension::Dimension;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QuantityKind {
    Dimensionless,
    Length,
    Mass,
    Time,
    ElectricCurrent,
    Temperature,
    AmountOfSubstance,
    LuminousIntensity,
    Angle,
    SolidAngle,
    Area,
    Volume,
    Speed,
    Acceleration,
    Frequency,
    Force,
    Pressure,
    Energy,
    Torque,
    Power,
    ElectricCharge,
    ElectricPotential,
    ElectricCapacitance,
    ElectricResistance,
    ElectricConductance,
    MagneticFlux,
    MagneticFluxDensity,
    ElectricInductance,
    LuminousFlux,
    Illuminance,
    CatalyticActivity,
}

impl QuantityKind {
    pub const ALL: [QuantityKind; 31] = [
        Self::Dimensionless,
        Self::Length,
        Self::Mass,
        Self::Time,
        Self::ElectricCurrent,
        Self::Temperature,
        Self::AmountOfSubstance,
        Self::LuminousIntensity,
        Self::Angle,
        Self::SolidAngle,
        Self::Area,
        Self::Volume,
        Self::Speed,
        Self::Acceleration,
        Self::Frequency,
        Self::Force,
        Self::Pressure,
        Self::Energy,
        Self::Torque,
        Self::Power,
        Self::ElectricCharge,
        Self::ElectricPotential,
        Self::ElectricCapacitance,
        Self::ElectricResistance,
        Self::ElectricConductance,
        Self::MagneticFlux,
        Self::MagneticFluxDensity,
        Self::ElectricInductance,
        Self::LuminousFlux,
        Self::Illuminance,
        Self::CatalyticActivity,
    ];

    /// The dimension every unit of this kind has, as exponents of M, L, T, I, Θ, N, J.
    pub const fn dimension(&self) -> Dimension {
        let exps = match self {
            Self::Dimensionless | Self::Angle | Self::SolidAngle => [0, 0, 0, 0, 0, 0, 0],
            Self::Length => [0, 1, 0, 0, 0, 0, 0],
            Self::Mass => [1, 0, 0, 0, 0, 0, 0],
            Self::Time => [0, 0, 1, 0, 0, 0, 0],
            Self::ElectricCurrent => [0, 0, 0, 1, 0, 0, 0],
            Self::Temperature => [0, 0, 0, 0, 1, 0, 0],
            Self::AmountOfSubstance => [0, 0, 0, 0, 0, 1, 0],
            Self::LuminousIntensity | Self::LuminousFlux => [0, 0, 0, 0, 0, 0, 1],
            Self::Area => [0, 2, 0, 0, 0, 0, 0],
            Self::Volume => [0, 3, 0, 0, 0, 0, 0],
            Self::Speed => [0, 1, -1, 0, 0, 0, 0],
            Self::Acceleration => [0, 1, -2, 0, 0, 0, 0],
            Self::Frequency => [0, 0, -1, 0, 0, 0, 0],
            Self::Force => [1, 1, -2, 0, 0, 0, 0],
            Self::Pressure => [1, -1, -2, 0, 0, 0, 0],
            Self::Energy | Self::Torque => [1, 2, -2, 0, 0, 0, 0],
            Self::Power => [1, 2, -3, 0, 0, 0, 0],
            Self::ElectricCharge => [0, 0, 1, 1, 0, 0, 0],
            Self::ElectricPotential => [1, 2, -3, -1, 0, 0, 0],
            Self::ElectricCapacitance => [-1, -2, 4, 2, 0, 0, 0],
            Self::ElectricResistance => [1, 2, -3, -2, 0, 0, 0],
            Self::ElectricConductance => [-1, -2, 3, 2, 0, 0, 0],
            Self::MagneticFlux => [1, 2, -2, -1, 0, 0, 0],
            Self::MagneticFluxDensity => [1, 0, -2, -1, 0, 0, 0],
            Self::ElectricInductance => [1, 2, -2, -2, 0, 0, 0],
            Self::Illuminance => [0, -2, 0, 0, 0, 0, 1],
            Self::CatalyticActivity => [0, 0, -1, 0, 0, 1, 0],
        };
        Dimension::from_ints(exps)
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Dimensionless => "dimensionless",
            Self::Length => "length",
            Self::Mass => "mass",
            Self::Time => "time",
            Self::ElectricCurrent => "electric current",
            Self::Temperature => "temperature",
            Self::AmountOfSubstance => "amount of substance",
            Self::LuminousIntensity => "luminous intensity",
            Self::Angle => "angle",
            Self::SolidAngle => "solid angle",
            Self::Area => "area",
            Self::Volume => "volume",
            Self::Speed => "speed",
            Self::Acceleration => "acceleration",
            Self::Frequency => "frequency",
            Self::Force => "force",
            Self::Pressure => "pressure",
            Self::Energy => "energy",
            Self::Torque => "torque",
            Self::Power => "power",
            Self::ElectricCharge => "electric charge",
            Self::ElectricPotential => "electric potential",
            Self::ElectricCapacitance => "capacitance",
            Self::ElectricResistance => "resistance",
            Self::ElectricConductance => "conductance",
            Self::MagneticFlux => "magnetic flux",
            Self::MagneticFluxDensity => "magnetic flux density",
            Self::ElectricInductance => "inductance",
            Self::LuminousFlux => "luminous flux",
            Self::Illuminance => "illuminance",
            Self::CatalyticActivity => "catalytic activity",
        }
    }
}

impl Display for QuantityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
