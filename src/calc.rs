// calc.rs
//
// Pure calculation layer: discount, tax and tip. No I/O, no formatting.
// Every failure is a value, never a panic.

use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalcError {
    #[error("El monto debe ser un número finito")]
    NotFinite,
    #[error("El precio debe ser mayor que 0")]
    PriceNotPositive,
    #[error("El descuento debe estar entre 0 y 100")]
    DiscountOutOfRange,
    #[error("El monto base no puede ser negativo")]
    NegativeBase,
    #[error("El monto de la cuenta debe ser mayor que 0")]
    BillNotPositive,
    #[error("La propina debe estar entre 0 y 100")]
    TipOutOfRange,
    #[error("Modo inválido. Elige 'descuento', 'impuesto' o 'propina'.")]
    InvalidMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Discount,
    Tax,
    Tip,
}

impl Mode {
    /// Uppercase label used in reports and history lines.
    pub fn label(self) -> &'static str {
        match self {
            Mode::Discount => "DESCUENTO",
            Mode::Tax => "IMPUESTO",
            Mode::Tip => "PROPINA",
        }
    }
}

impl FromStr for Mode {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "descuento" | "discount" => Ok(Mode::Discount),
            "impuesto" | "tax" => Ok(Mode::Tax),
            "propina" | "tip" => Ok(Mode::Tip),
            _ => Err(CalcError::InvalidMode),
        }
    }
}

/// Result of a successful calculation, one variant per mode.
/// All amounts are already rounded to 2 decimals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Calculation {
    Discount { final_price: f64 },
    Tax { base: f64, tax_amount: f64, total: f64 },
    Tip { bill: f64, tip_amount: f64, total: f64 },
}

impl Calculation {
    pub fn total(&self) -> f64 {
        match *self {
            Calculation::Discount { final_price } => final_price,
            Calculation::Tax { total, .. } | Calculation::Tip { total, .. } => total,
        }
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn ensure_finite(value: f64) -> Result<(), CalcError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CalcError::NotFinite)
    }
}

/// `price * (1 - percent/100)`, rounded. Price must be positive and the
/// percent inside [0, 100].
pub fn apply_discount(price: f64, percent: f64) -> Result<Calculation, CalcError> {
    ensure_finite(price)?;
    ensure_finite(percent)?;
    if price <= 0.0 {
        return Err(CalcError::PriceNotPositive);
    }
    if !(0.0..=100.0).contains(&percent) {
        return Err(CalcError::DiscountOutOfRange);
    }
    Ok(Calculation::Discount {
        final_price: round2(price * (1.0 - percent / 100.0)),
    })
}

/// Tax over a non-negative base. The rate is deliberately unbounded: a
/// negative rate models a rebate and yields a total below the base.
pub fn apply_tax(base: f64, rate: f64) -> Result<Calculation, CalcError> {
    ensure_finite(base)?;
    ensure_finite(rate)?;
    if base < 0.0 {
        return Err(CalcError::NegativeBase);
    }
    let tax_amount = base * (rate / 100.0);
    Ok(Calculation::Tax {
        base,
        tax_amount: round2(tax_amount),
        total: round2(base + tax_amount),
    })
}

/// Tip over a positive bill, percent inside [0, 100].
pub fn apply_tip(bill: f64, percent: f64) -> Result<Calculation, CalcError> {
    ensure_finite(bill)?;
    ensure_finite(percent)?;
    if bill <= 0.0 {
        return Err(CalcError::BillNotPositive);
    }
    if !(0.0..=100.0).contains(&percent) {
        return Err(CalcError::TipOutOfRange);
    }
    let tip_amount = bill * (percent / 100.0);
    Ok(Calculation::Tip {
        bill,
        tip_amount: round2(tip_amount),
        total: round2(bill + tip_amount),
    })
}

/// Dispatches to the calculator for `mode`. Pure, no side effects.
pub fn calculate(mode: Mode, amount: f64, percent: f64) -> Result<Calculation, CalcError> {
    match mode {
        Mode::Discount => apply_discount(amount, percent),
        Mode::Tax => apply_tax(amount, percent),
        Mode::Tip => apply_tip(amount, percent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discount_basic() {
        assert_eq!(
            apply_discount(100.0, 20.0),
            Ok(Calculation::Discount { final_price: 80.0 })
        );
    }

    #[test]
    fn discount_rounds_to_two_decimals() {
        let Ok(Calculation::Discount { final_price }) = apply_discount(19.99, 33.0) else {
            panic!("expected a discount result");
        };
        assert_eq!(final_price, 13.39);
    }

    #[test]
    fn discount_rejects_out_of_range_percent() {
        assert_eq!(apply_discount(100.0, 150.0), Err(CalcError::DiscountOutOfRange));
        assert_eq!(apply_discount(100.0, -0.01), Err(CalcError::DiscountOutOfRange));
    }

    #[test]
    fn discount_rejects_non_positive_price() {
        assert_eq!(apply_discount(0.0, 10.0), Err(CalcError::PriceNotPositive));
        assert_eq!(apply_discount(-5.0, 10.0), Err(CalcError::PriceNotPositive));
    }

    #[test]
    fn discount_accepts_boundary_percents() {
        assert_eq!(
            apply_discount(50.0, 0.0),
            Ok(Calculation::Discount { final_price: 50.0 })
        );
        assert_eq!(
            apply_discount(50.0, 100.0),
            Ok(Calculation::Discount { final_price: 0.0 })
        );
    }

    #[test]
    fn tax_basic() {
        assert_eq!(
            apply_tax(200.0, 10.0),
            Ok(Calculation::Tax {
                base: 200.0,
                tax_amount: 20.0,
                total: 220.0
            })
        );
    }

    #[test]
    fn tax_total_is_base_plus_tax() {
        for (base, rate) in [(0.0, 21.0), (19.99, 7.25), (1234.56, 0.0)] {
            let Ok(Calculation::Tax {
                base: b,
                tax_amount,
                total,
            }) = apply_tax(base, rate)
            else {
                panic!("expected a tax result");
            };
            assert_eq!(total, round2(b + b * rate / 100.0));
            assert_eq!(tax_amount, round2(b * rate / 100.0));
        }
    }

    #[test]
    fn tax_rejects_negative_base() {
        assert_eq!(apply_tax(-1.0, 10.0), Err(CalcError::NegativeBase));
    }

    #[test]
    fn tax_permits_negative_rate() {
        assert_eq!(
            apply_tax(100.0, -10.0),
            Ok(Calculation::Tax {
                base: 100.0,
                tax_amount: -10.0,
                total: 90.0
            })
        );
    }

    #[test]
    fn tip_basic() {
        assert_eq!(
            apply_tip(50.0, 15.0),
            Ok(Calculation::Tip {
                bill: 50.0,
                tip_amount: 7.5,
                total: 57.5
            })
        );
    }

    #[test]
    fn tip_mirrors_discount_bounds() {
        assert_eq!(apply_tip(0.0, 10.0), Err(CalcError::BillNotPositive));
        assert_eq!(apply_tip(50.0, 101.0), Err(CalcError::TipOutOfRange));
        assert_eq!(apply_tip(50.0, -1.0), Err(CalcError::TipOutOfRange));
    }

    #[test]
    fn non_finite_inputs_rejected_everywhere() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(apply_discount(bad, 10.0), Err(CalcError::NotFinite));
            assert_eq!(apply_discount(10.0, bad), Err(CalcError::NotFinite));
            assert_eq!(apply_tax(bad, 10.0), Err(CalcError::NotFinite));
            assert_eq!(apply_tip(10.0, bad), Err(CalcError::NotFinite));
        }
    }

    #[test]
    fn mode_parses_known_names_only() {
        assert_eq!("descuento".parse::<Mode>(), Ok(Mode::Discount));
        assert_eq!("IMPUESTO".parse::<Mode>(), Ok(Mode::Tax));
        assert_eq!("tip".parse::<Mode>(), Ok(Mode::Tip));
        assert_eq!("interés".parse::<Mode>(), Err(CalcError::InvalidMode));
    }

    #[test]
    fn calculate_dispatches_by_mode() {
        assert_eq!(
            calculate(Mode::Discount, 100.0, 20.0).unwrap().total(),
            80.0
        );
        assert_eq!(calculate(Mode::Tax, 200.0, 10.0).unwrap().total(), 220.0);
        assert_eq!(calculate(Mode::Tip, 50.0, 15.0).unwrap().total(), 57.5);
    }
}
