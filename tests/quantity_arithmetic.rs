use dimsolve::prelude::*;
use dimsolve::quantity;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

fn velocity() -> Unit {
    (Unit::meter() / Unit::second()).unwrap()
}

fn measured(value: Decimal, unit: Unit, uncertainty: Decimal) -> Quantity {
    Quantity::with_uncertainty(value, unit, uncertainty)
}

// H0: uncertainty propagation ignores the selected mode
// Falsification: compute a kinetic-energy style chain in both modes

#[test]
fn kinetic_energy_chain() {
    let mass = measured(dec!(2), Unit::kilogram(), dec!(0.02));
    let speed = measured(dec!(3), velocity(), dec!(0.03));

    let energy = speed
        .pow(dec!(2))
        .and_then(|v2| mass.try_mul(v2))
        .and_then(|mv2| mv2.try_div(dec!(2)))
        .unwrap();

    let joule = Unit::parse_symbol("J").unwrap();
    assert_eq!(energy.unit(), joule);
    assert_eq!(energy.value(), dec!(9));
    // relative: 0.01 (mass) + 2 * 0.01 (speed squared) = 0.03
    assert_eq!(energy.uncertainty(), dec!(0.27));
}

#[test]
fn kinetic_energy_chain_in_quadrature() {
    let mass = measured(dec!(2), Unit::kilogram(), dec!(0.02))
        .in_mode(UncertaintyMode::RootSumSquare);
    let speed = measured(dec!(3), velocity(), dec!(0.03));

    let v2 = speed.pow(dec!(2)).unwrap();
    let energy = mass.try_mul(v2).unwrap().try_div(dec!(2)).unwrap();
    // sqrt(0.01² + 0.02²) ≈ 0.02236
    let expected = dec!(9) * dec!(0.0005).sqrt().unwrap();
    assert!((energy.uncertainty() - expected).abs() < dec!(0.00000000000000000001));
    assert!(energy.uncertainty() < dec!(0.27));
}

#[test]
fn subtraction_of_like_units_adds_errors() {
    let start = measured(dec!(12.5), Unit::meter(), dec!(0.5));
    let end = measured(dec!(20), Unit::meter(), dec!(0.5));
    let distance = (end - start).unwrap();
    assert_eq!(distance.value(), dec!(7.5));
    assert_eq!(distance.uncertainty(), dec!(1));
}

#[test]
fn mismatched_units_fail_loudly() {
    let length = measured(dec!(1), Unit::meter(), dec!(0));
    let time = measured(dec!(1), Unit::second(), dec!(0));
    let err = (length + time).unwrap_err();
    assert_eq!(err.to_string(), "Dimension mismatch in addition: m vs s");
    assert!((length + dec!(1)).is_err());
    assert!((dec!(1) - length).is_err());
}

#[test]
fn reverse_operations_on_dimensionless() {
    let x = measured(dec!(0.5), Unit::DIMENSIONLESS, dec!(0.05));
    assert_eq!(x.radd(dec!(1)).unwrap().value(), dec!(1.5));
    assert_eq!((dec!(1) - x).unwrap().value(), dec!(0.5));
    assert_eq!(x.rmul(dec!(4)).unwrap().uncertainty(), dec!(0.2));
    let inverse = x.reciprocal().unwrap();
    assert_eq!(inverse.value(), dec!(2));
    assert_eq!(inverse.uncertainty(), dec!(0.2));
}

#[test]
fn frequency_from_period() {
    let period = measured(dec!(0.5), Unit::second(), dec!(0.01));
    let frequency = (dec!(1) / period).unwrap();
    assert_eq!(frequency.unit(), Unit::parse_symbol("Hz").unwrap());
    assert_eq!(frequency.value(), dec!(2));
    assert_eq!(frequency.uncertainty(), dec!(0.04));
}

#[test]
fn exponential_growth_with_uncertain_exponent() {
    let generations = measured(dec!(10), Unit::DIMENSIONLESS, dec!(0.5));
    let population = generations.rpow(dec!(2)).unwrap();
    assert_eq!(population.value(), dec!(1024));
    let expected = dec!(1024) * dec!(2).ln() * dec!(0.5);
    assert!((population.uncertainty() - expected).abs() < dec!(0.0000000000000001));
}

#[test]
fn power_with_dimensioned_exponent_fails() {
    let base = measured(dec!(2), Unit::DIMENSIONLESS, dec!(0));
    let exponent = measured(dec!(2), Unit::second(), dec!(0));
    assert!(matches!(
        base.pow(exponent),
        Err(UnitsError::DimensionMismatch { .. })
    ));
}

#[test]
fn dispatch_functions_cover_all_kinds() {
    let config = UnitsConfig::default();
    let q = measured(dec!(3), Unit::meter(), dec!(0.1));
    let kinds = [
        (Operand::from(dec!(2)), Operand::from(dec!(3))),
        (Operand::from(q), Operand::from(dec!(2))),
        (Operand::from(dec!(2)), Operand::from(q)),
        (Operand::from(q), Operand::from(q)),
    ];
    for (lhs, rhs) in kinds {
        assert!(quantity::mul(lhs, rhs, &config).is_ok());
        assert!(quantity::div(lhs, rhs, &config).is_ok());
    }
    assert!(quantity::add(Operand::from(q), Operand::from(q), &config).is_ok());
    assert!(quantity::sub(Operand::from(dec!(1)), Operand::from(q), &config).is_err());
    assert!(quantity::pow(Operand::from(q), Operand::from(dec!(2)), &config).is_ok());
}

#[test]
fn explicit_config_threads_through_arithmetic() {
    let config = UnitsConfig::builder().decimal_precision(3).build();
    let a = Quantity::with_unit(dec!(2), Unit::meter());
    let b = Quantity::with_unit(dec!(3), Unit::second());
    let v = a.div_with(b, &config).unwrap();
    assert_eq!(v.value(), dec!(0.667));
    assert_eq!(v.display_with(&config), "0.667 m·s^(-1)");
}

#[test]
fn identity_ignores_uncertainty() {
    let a = measured(dec!(9.81), Unit::meter(), dec!(0.01));
    let b = a.plus_minus(dec!(0.5));
    assert_eq!(a, b);
    assert_eq!(a.to_string(), "9.81 ± 0.01 m");
    assert_eq!(b.to_string(), "9.81 ± 0.5 m");
}

#[test]
fn parse_and_attach_unit() {
    let q = Quantity::parse("1.5e3", Some("20"))
        .unwrap()
        .in_unit(Unit::parse_symbol("W").unwrap());
    assert_eq!(q.value(), dec!(1500));
    assert_eq!(q.uncertainty(), dec!(20));
    assert_eq!(q.to_string(), "1500 ± 20 m^2·kg·s^(-3)");
}
