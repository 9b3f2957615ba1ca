//! GST rate verification and tax splitting for extracted invoices.

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use crate::cache::lookup;
use crate::models::invoice::{RateVerification, TaxSplit};
use crate::models::rates::{format_percent, parse_percent, RateTable};

/// Keyword used for the reference lookup when the invoice has no HSN code.
pub const GENERAL_KEYWORD: &str = "general";

const FALLBACK_RATE: u32 = 18;

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Split a GST-inclusive total into taxable value and tax components.
///
/// Intra-state supply is assumed: the tax is shared equally between CGST and
/// SGST and IGST is zero.
pub fn split_tax(total: Decimal, rate: Decimal) -> TaxSplit {
    if total.is_zero() || rate <= Decimal::ZERO {
        return TaxSplit {
            taxable_value: round2(total),
            ..TaxSplit::default()
        };
    }

    let gst_amount = round2(total * rate / (Decimal::ONE_HUNDRED + rate));
    let half = round2(gst_amount / Decimal::TWO);
    TaxSplit {
        taxable_value: round2(total - gst_amount),
        gst_amount,
        cgst: half,
        sgst: half,
        igst: Decimal::ZERO,
    }
}

/// Reference rate for an invoice: looked up by HSN code, else by
/// [`GENERAL_KEYWORD`].
pub fn reference_rate(table: &RateTable, hsn: Option<&str>, default_rate: u32) -> Option<Decimal> {
    let keyword = hsn.unwrap_or(GENERAL_KEYWORD);
    let found = lookup(table, keyword, default_rate);
    debug!("Reference rate for {:?}: {}", keyword, found.rate);
    parse_percent(&found.rate)
}

/// Compare an invoice's claimed rate against a reference rate.
///
/// A missing or non-positive reference falls back to the invoice rate, then
/// to 18%.
pub fn verify_rate(
    total: Decimal,
    invoice_rate: Decimal,
    reference: Option<Decimal>,
) -> RateVerification {
    let verified_rate = reference
        .filter(|r| *r > Decimal::ZERO)
        .or_else(|| (invoice_rate > Decimal::ZERO).then_some(invoice_rate))
        .unwrap_or_else(|| Decimal::from(FALLBACK_RATE));

    let verified = invoice_rate > Decimal::ZERO && invoice_rate == verified_rate;
    let invoice_tax = split_tax(total, invoice_rate);

    let (adjusted_rate, adjusted_tax) = if !verified && !total.is_zero() {
        (verified_rate, split_tax(total, verified_rate))
    } else if invoice_rate.is_zero() {
        (verified_rate, invoice_tax)
    } else {
        (invoice_rate, invoice_tax)
    };

    let message = if verified {
        format!(
            "GST rate {} matches the reference rate",
            format_percent(invoice_rate)
        )
    } else if total.is_zero() {
        format!(
            "GST rate {} does not match the reference rate {}",
            format_percent(invoice_rate),
            format_percent(verified_rate)
        )
    } else {
        format!(
            "GST rate {} does not match the reference rate {}; tax recomputed at {}",
            format_percent(invoice_rate),
            format_percent(verified_rate),
            format_percent(verified_rate)
        )
    };

    RateVerification {
        invoice_rate,
        verified_rate,
        verified,
        invoice_tax,
        adjusted_rate,
        adjusted_tax,
        message,
    }
}
