//! Арифметика счёта: строки, НДС, итоги.
//!
//! Денежные суммы округляются до 2 знаков (half away from zero) на каждом
//! шаге, поэтому итоги счёта всегда равны сумме округлённых строк.

use serde::{Deserialize, Serialize};

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Строка счёта с рассчитанными суммами
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvoiceLine {
    /// Ссылка на a004_product
    pub product_id: String,
    pub description: String,
    pub quantity: i64,
    /// Цена за единицу без НДС
    pub unit_price: f64,
    /// Ставка НДС, %
    pub vat_rate: f64,
    /// Скидка, %
    pub discount_pct: f64,
    /// База (после скидки, без НДС)
    pub subtotal: f64,
    pub vat_amount: f64,
    pub total: f64,
}

impl InvoiceLine {
    pub fn compute(
        product_id: String,
        description: String,
        quantity: i64,
        unit_price: f64,
        vat_rate: f64,
        discount_pct: f64,
    ) -> Self {
        let gross = quantity as f64 * unit_price;
        let subtotal = round2(gross * (1.0 - discount_pct / 100.0));
        let vat_amount = round2(subtotal * vat_rate / 100.0);
        let total = round2(subtotal + vat_amount);

        Self {
            product_id,
            description,
            quantity,
            unit_price,
            vat_rate,
            discount_pct,
            subtotal,
            vat_amount,
            total,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.quantity <= 0 {
            return Err(format!(
                "Quantity for '{}' must be greater than zero",
                self.description
            ));
        }
        if !self.unit_price.is_finite() || self.unit_price < 0.0 {
            return Err(format!(
                "Unit price for '{}' cannot be negative",
                self.description
            ));
        }
        if !(0.0..=100.0).contains(&self.vat_rate) {
            return Err("VAT rate must be between 0 and 100".into());
        }
        if !(0.0..=100.0).contains(&self.discount_pct) {
            return Err("Discount must be between 0 and 100".into());
        }
        Ok(())
    }
}

/// Итоги счёта
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct InvoiceTotals {
    /// Налоговая база (base imponible)
    pub taxable_base: f64,
    pub vat_total: f64,
    pub total: f64,
}

impl InvoiceTotals {
    pub fn from_lines(lines: &[InvoiceLine]) -> Self {
        let taxable_base = round2(lines.iter().map(|l| l.subtotal).sum());
        let vat_total = round2(lines.iter().map(|l| l.vat_amount).sum());
        Self {
            taxable_base,
            vat_total,
            total: round2(taxable_base + vat_total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(qty: i64, price: f64, vat: f64, discount: f64) -> InvoiceLine {
        InvoiceLine::compute("p".into(), "item".into(), qty, price, vat, discount)
    }

    #[test]
    fn test_line_amounts() {
        let l = line(3, 10.0, 21.0, 0.0);
        assert_eq!(l.subtotal, 30.0);
        assert_eq!(l.vat_amount, 6.3);
        assert_eq!(l.total, 36.3);
    }

    #[test]
    fn test_line_discount() {
        let l = line(4, 25.0, 10.0, 10.0);
        assert_eq!(l.subtotal, 90.0);
        assert_eq!(l.vat_amount, 9.0);
        assert_eq!(l.total, 99.0);
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        assert_eq!(round2(2.675_000_1), 2.68);
        assert_eq!(round2(1.005_000_1), 1.01);
        assert_eq!(round2(-1.255_000_1), -1.26);
    }

    #[test]
    fn test_totals_equal_sum_of_lines() {
        let lines = vec![
            line(3, 1.99, 21.0, 0.0),
            line(7, 0.35, 10.0, 5.0),
            line(1, 149.9, 4.0, 12.5),
        ];
        let totals = InvoiceTotals::from_lines(&lines);

        let base: f64 = lines.iter().map(|l| l.subtotal).sum();
        let vat: f64 = lines.iter().map(|l| l.vat_amount).sum();
        assert_eq!(totals.taxable_base, round2(base));
        assert_eq!(totals.vat_total, round2(vat));
        assert_eq!(totals.total, round2(totals.taxable_base + totals.vat_total));
    }

    #[test]
    fn test_empty_lines_give_zero_totals() {
        assert_eq!(InvoiceTotals::from_lines(&[]), InvoiceTotals::default());
    }

    #[test]
    fn test_line_validation() {
        assert!(line(0, 1.0, 21.0, 0.0).validate().is_err());
        assert!(line(1, -1.0, 21.0, 0.0).validate().is_err());
        assert!(line(1, 1.0, 21.0, 120.0).validate().is_err());
        assert!(line(1, 1.0, 21.0, 0.0).validate().is_ok());
    }
}
