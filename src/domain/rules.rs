//! Field derivation rules.
//!
//! Each rule takes a [`TradeView`] and produces one output cell. Numeric
//! fields stay decimal strings end to end; arithmetic happens only where a
//! value must be reconstructed (the zero-price/zero-proceeds
//! reconciliation). All failures are fatal to the whole conversion.

use crate::domain::error::ConvertError;
use crate::domain::record::TradeView;
use chrono::TimeZone;
use chrono::offset::LocalResult;
use chrono_tz::Tz;

/// The source's textual zero test: `"0"` or `"-0"` after trimming.
/// Anything else, including `"0.00"` and the empty string, is not zero
/// here; numerically-zero strings are caught later by [`normalize_zero`].
pub fn is_zero_string(s: &str) -> bool {
    let t = s.trim();
    t == "0" || t == "-0"
}

/// Collapse any numerically-zero value, `-0` included, to the literal
/// `"0"`. Non-numeric strings pass through verbatim.
pub fn normalize_zero(v: String) -> String {
    match v.trim().parse::<f64>() {
        Ok(n) if n == 0.0 => "0".to_string(),
        _ => v,
    }
}

fn fmt_float(x: f64) -> String {
    format!("{x}")
}

fn invalid(field: &str, value: &str, reason: &str) -> ConvertError {
    ConvertError::InvalidField {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn int_field(view: &TradeView, field: &str) -> Result<i64, ConvertError> {
    let raw = view.required(field)?;
    let t = raw.trim();
    if let Ok(n) = t.parse::<i64>() {
        return Ok(n);
    }
    t.parse::<f64>()
        .map(|f| f as i64)
        .map_err(|_| invalid(field, raw, "expected a number"))
}

fn parse_yyyymmdd(field: &str, raw: &str) -> Result<(i32, u32, u32), ConvertError> {
    if raw.len() != 8 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(field, raw, "expected 8 digits (YYYYMMDD)"));
    }
    let y = raw[0..4].parse().unwrap();
    let m = raw[4..6].parse().unwrap();
    let d = raw[6..8].parse().unwrap();
    Ok((y, m, d))
}

fn parse_hhmmss(field: &str, raw: &str) -> Result<(u32, u32, u32), ConvertError> {
    if raw.len() != 6 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(field, raw, "expected 6 digits (HHMMSS)"));
    }
    let h = raw[0..2].parse().unwrap();
    let m = raw[2..4].parse().unwrap();
    let s = raw[4..6].parse().unwrap();
    Ok((h, m, s))
}

/// Date column: `tradeDate` + `tradeTime` as a zoned timestamp,
/// `YYYY-MM-DDTHH:MM:SS±HHMM`.
pub fn build_date_time(view: &TradeView, tz: Tz) -> Result<String, ConvertError> {
    let date = view.required("tradeDate")?;
    let time = view.required("tradeTime")?;
    let (y, mo, d) = parse_yyyymmdd("tradeDate", date)?;
    let (h, mi, s) = parse_hhmmss("tradeTime", time)?;

    let local = match tz.with_ymd_and_hms(y, mo, d, h, mi, s) {
        LocalResult::Single(dt) => dt,
        // DST fall-back repeats an hour; take the earlier offset
        LocalResult::Ambiguous(dt, _) => dt,
        LocalResult::None => {
            return Err(invalid(
                "tradeTime",
                &format!("{date} {time}"),
                &format!("not a valid local time in {tz}"),
            ));
        }
    };
    Ok(local.format("%Y-%m-%dT%H:%M:%S%z").to_string())
}

/// Expiration Date column: 8-digit `expiry` as `MM/DD/YY`, the year taken
/// from the century's last two digits. Blank or absent input stays absent.
pub fn build_expiration(view: &TradeView) -> Result<Option<String>, ConvertError> {
    let raw = match view.get("expiry") {
        Some(s) if !s.trim().is_empty() => s,
        _ => return Ok(None),
    };
    if raw.len() != 8 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("expiry", raw, "expected 8 digits (YYYYMMDD)"));
    }
    Ok(Some(format!(
        "{}/{}/{}",
        &raw[4..6],
        &raw[6..8],
        &raw[2..4]
    )))
}

/// Action column: `{buySell}_TO_{OPEN|CLOSE}`. Any `openCloseIndicator`
/// other than `O` (absence included) closes.
pub fn build_action(view: &TradeView) -> Result<String, ConvertError> {
    let side = view.required("buySell")?;
    let leg = if view.get("openCloseIndicator") == Some("O") {
        "OPEN"
    } else {
        "CLOSE"
    };
    Ok(format!("{side}_TO_{leg}"))
}

pub fn build_instrument_type(view: &TradeView) -> Result<String, ConvertError> {
    match view.required("assetCategory")? {
        "OPT" => Ok("Equity Option".to_string()),
        "STK" => Ok("Equity".to_string()),
        other => Err(ConvertError::UnknownAssetCategory {
            category: other.to_string(),
        }),
    }
}

pub fn is_option(view: &TradeView) -> bool {
    view.get("assetCategory") == Some("OPT")
}

/// Call or Put column: absent for non-options; `P` means put, anything
/// else on an option is a call.
pub fn build_put_or_call(view: &TradeView) -> Option<String> {
    if !is_option(view) {
        return None;
    }
    Some(if view.get("putCall") == Some("P") {
        "PUT".to_string()
    } else {
        "CALL".to_string()
    })
}

fn is_assignment_event(view: &TradeView) -> bool {
    view.get("transactionType") == Some("BookTrade")
        && view.get("notes").is_some_and(|n| {
            n.eq_ignore_ascii_case("A") || n.eq_ignore_ascii_case("Ex") || n.eq_ignore_ascii_case("Ep")
        })
}

/// Value column. Non-zero `proceeds` pass through (normalized); zero
/// proceeds are only meaningful on an assignment/exercise/expiration
/// event, where the value is the negated mark-to-market P&L. Anything
/// else has no defensible value and aborts the conversion.
pub fn build_value(view: &TradeView) -> Result<String, ConvertError> {
    let proceeds = view.required("proceeds")?;
    if !is_zero_string(proceeds) {
        return Ok(normalize_zero(proceeds.to_string()));
    }
    if is_assignment_event(view) {
        let raw = view.required("mtmPnl")?;
        let mtm: f64 = raw
            .trim()
            .parse()
            .map_err(|_| invalid("mtmPnl", raw, "expected a number"))?;
        return Ok(normalize_zero(fmt_float(-mtm)));
    }
    Err(ConvertError::UnparseableTrade {
        symbol: view.get("symbol").unwrap_or("?").to_string(),
        trade_date: view.get("tradeDate").unwrap_or("?").to_string(),
    })
}

/// Average Price column and the description's inline price. A zeroed
/// `tradePrice` alongside a non-zero Value is reconstructed as
/// `abs(value / quantity / multiplier)`; otherwise the raw string passes
/// through untouched.
pub fn build_effective_price(view: &TradeView) -> Result<String, ConvertError> {
    let price = view.required("tradePrice")?;
    if !is_zero_string(price) {
        return Ok(price.to_string());
    }
    let value = build_value(view)?;
    if is_zero_string(&value) {
        return Ok(price.to_string());
    }
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| invalid("proceeds", &value, "expected a number"))?;
    let quantity = int_field(view, "quantity")?;
    let multiplier = int_field(view, "multiplier")?;
    Ok(fmt_float(
        (value / quantity as f64 / multiplier as f64).abs(),
    ))
}

/// Commissions column: `ibCommission` passthrough, any numerically-zero
/// value (absence included) rendered as `"0"`.
pub fn build_commission(view: &TradeView) -> String {
    let raw = view.get("ibCommission").unwrap_or("");
    if raw.trim().parse::<f64>().unwrap_or(0.0) == 0.0 {
        "0".to_string()
    } else {
        raw.to_string()
    }
}

/// Description column, e.g. `Sold 9 IAG 11/16/18 CALL 46 @ 1.5` for an
/// option and `Bought 100 AAPL @ 179.59` for an equity.
pub fn build_description(view: &TradeView) -> Result<String, ConvertError> {
    let verb = match view.required("buySell")? {
        "SELL" => "Sold",
        "BUY" => "Bought",
        other => {
            return Err(ConvertError::UnknownBuySell {
                side: other.to_string(),
            });
        }
    };
    let quantity = int_field(view, "quantity")?.abs();
    let symbol = view.required("symbol")?;
    let price = build_effective_price(view)?;

    if is_option(view) {
        let expiration = build_expiration(view)?.unwrap_or_default();
        let right = build_put_or_call(view).unwrap_or_default();
        let strike = view.get("strike").unwrap_or("");
        Ok(format!(
            "{verb} {quantity} {symbol} {expiration} {right} {strike} @ {price}"
        ))
    } else {
        Ok(format!("{verb} {quantity} {symbol} @ {price}"))
    }
}
