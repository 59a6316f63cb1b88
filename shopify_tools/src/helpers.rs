use crate::ShopifyApiError;

/// Shopify expresses money as decimal strings, e.g. `"129.90"`. Returns the amount in minor units (cents).
///
/// At most two decimal places are accepted; a single decimal digit is read as tenths (`"12.5"` is 1250 cents).
pub fn parse_shopify_price(price: &str) -> Result<i64, ShopifyApiError> {
    let invalid = |reason: &str| ShopifyApiError::InvalidCurrencyAmount(format!("Invalid price value: {price}. {reason}"));
    let trimmed = price.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
    if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("Expected a whole number of units."));
    }
    if fraction.len() > 2 || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("Expected at most two decimal places."));
    }
    let whole_units = whole.parse::<i64>().map_err(|e| invalid(&e.to_string()))?;
    let cents = match fraction.len() {
        0 => 0,
        1 => 10 * fraction.parse::<i64>().map_err(|e| invalid(&e.to_string()))?,
        _ => fraction.parse::<i64>().map_err(|e| invalid(&e.to_string()))?,
    };
    let amount = whole_units
        .checked_mul(100)
        .and_then(|v| v.checked_add(cents))
        .ok_or_else(|| invalid("Amount is out of range."))?;
    Ok(if negative { -amount } else { amount })
}

/// Extracts the `page_info` cursor of the `rel="next"` link from a REST `Link` header, e.g.
/// `<https://shop.myshopify.com/admin/api/2024-04/orders.json?limit=250&page_info=abc>; rel="next"`.
pub fn next_page_info(link_header: &str) -> Option<String> {
    link_header
        .split(',')
        .filter_map(|link| link.split_once(';'))
        .find(|(_, params)| params.split(';').any(|p| p.trim().eq_ignore_ascii_case(r#"rel="next""#)))
        .and_then(|(url, _)| url.trim().strip_prefix('<')?.strip_suffix('>'))
        .and_then(|url| url.split_once('?'))
        .and_then(|(_, query)| query.split('&').find_map(|param| param.strip_prefix("page_info=")))
        .filter(|cursor| !cursor.is_empty())
        .map(String::from)
}
