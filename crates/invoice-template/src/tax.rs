//! GST computation
//!
//! GST splits by place of supply: an intra-state sale levies CGST and SGST
//! at half the tax each, an inter-state sale levies the whole tax as IGST.
//! The split is decided by comparing the two parties' state names with a
//! case-sensitive equality check.

use crate::invoice::{round2, LineItem};

/// Tax amounts by GST component; exactly one side of the split is non-zero
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TaxBreakdown {
    pub cgst: f64,
    pub sgst: f64,
    pub igst: f64,
}

impl TaxBreakdown {
    /// Split the total tax across components by place of supply
    pub fn compute(items: &[LineItem], company_state: &str, customer_state: &str) -> Self {
        let total_tax: f64 = items.iter().map(LineItem::tax).sum();
        // Components stay unrounded here so cgst + sgst always equals the
        // total exactly; rounding happens at format time
        if company_state == customer_state {
            let half = total_tax / 2.0;
            TaxBreakdown {
                cgst: half,
                sgst: half,
                igst: 0.0,
            }
        } else {
            TaxBreakdown {
                cgst: 0.0,
                sgst: 0.0,
                igst: total_tax,
            }
        }
    }

    pub fn total(&self) -> f64 {
        self.cgst + self.sgst + self.igst
    }
}

/// Invoice-level money totals
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Totals {
    pub subtotal: f64,
    pub total_tax: f64,
    pub grand_total: f64,
}

impl Totals {
    pub fn compute(items: &[LineItem]) -> Self {
        let subtotal = round2(items.iter().map(LineItem::amount).sum());
        let total_tax = round2(items.iter().map(LineItem::tax).sum());
        Totals {
            subtotal,
            total_tax,
            grand_total: round2(subtotal + total_tax),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn items() -> Vec<LineItem> {
        vec![
            LineItem {
                description: "Widget".to_string(),
                hsn_sac: "8471".to_string(),
                quantity: 2.0,
                rate: 1000.0,
                tax_rate: 18.0,
            },
            LineItem {
                description: "Gadget".to_string(),
                hsn_sac: "8517".to_string(),
                quantity: 1.0,
                rate: 2000.0,
                tax_rate: 18.0,
            },
        ]
    }

    #[test]
    fn test_totals() {
        let totals = Totals::compute(&items());
        assert_eq!(totals.subtotal, 4000.0);
        assert_eq!(totals.total_tax, 720.0);
        assert_eq!(totals.grand_total, 4720.0);
    }

    #[test]
    fn test_intra_state_splits_cgst_sgst() {
        let breakdown = TaxBreakdown::compute(&items(), "Maharashtra", "Maharashtra");
        assert_eq!(breakdown.cgst, 360.0);
        assert_eq!(breakdown.sgst, 360.0);
        assert_eq!(breakdown.igst, 0.0);
        assert_eq!(breakdown.total(), 720.0);
    }

    #[test]
    fn test_inter_state_uses_igst() {
        let breakdown = TaxBreakdown::compute(&items(), "Maharashtra", "Karnataka");
        assert_eq!(breakdown.cgst, 0.0);
        assert_eq!(breakdown.sgst, 0.0);
        assert_eq!(breakdown.igst, 720.0);
    }

    #[test]
    fn test_state_comparison_is_case_sensitive() {
        let breakdown = TaxBreakdown::compute(&items(), "Maharashtra", "maharashtra");
        assert_eq!(breakdown.igst, 720.0);
        assert_eq!(breakdown.cgst, 0.0);
    }

    #[test]
    fn test_empty_items() {
        let totals = Totals::compute(&[]);
        assert_eq!(totals.grand_total, 0.0);
        let breakdown = TaxBreakdown::compute(&[], "Delhi", "Delhi");
        assert_eq!(breakdown.total(), 0.0);
    }
}
