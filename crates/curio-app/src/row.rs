// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::Date;
use time::macros::format_description;
use url::form_urlencoded;

use crate::{ConversionRate, Grade, Item, format_cents};

pub const DEFAULT_PLACEHOLDER: &str = "N/A";
pub const DEFAULT_SOURCE_SYMBOL: &str = "¥";
pub const DEFAULT_DISPLAY_SYMBOL: &str = "€";
const JANCODE_SEARCH_URL: &str = "https://myfigurecollection.net/?keywords=";

#[derive(Debug, Clone, PartialEq)]
pub struct RowFormat {
    pub rate: ConversionRate,
    pub source_symbol: String,
    pub display_symbol: String,
    pub placeholder: String,
}

impl Default for RowFormat {
    fn default() -> Self {
        Self {
            rate: ConversionRate::default(),
            source_symbol: DEFAULT_SOURCE_SYMBOL.to_owned(),
            display_symbol: DEFAULT_DISPLAY_SYMBOL.to_owned(),
            placeholder: DEFAULT_PLACEHOLDER.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowCell {
    pub text: String,
    pub url: Option<String>,
}

impl RowCell {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: None,
        }
    }

    pub fn linked(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: Some(url.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRow {
    pub ordinal: String,
    pub image_url: String,
    pub name: String,
    pub gcode: RowCell,
    pub scode: RowCell,
    pub source_price: String,
    pub display_price: String,
    pub sale_status: String,
    pub release_date: String,
    pub jancode: RowCell,
    pub maker_name: String,
    pub item_condition: String,
    pub box_condition: String,
}

pub fn render_row(item: &Item, position: usize, total: usize, format: &RowFormat) -> RenderedRow {
    let placeholder = || format.placeholder.clone();

    let source_price = match item.price {
        Some(price) => format!("{}{price}", format.source_symbol),
        None => placeholder(),
    };
    let display_price = format!(
        "{} {}",
        format_cents(item.display_price_cents(format.rate)),
        format.display_symbol
    );

    RenderedRow {
        ordinal: format!("{position} / {total}"),
        image_url: item.image_url.clone(),
        name: item.name.clone(),
        gcode: RowCell::linked(&item.gcode, &item.gcode_url),
        scode: RowCell::linked(&item.scode, &item.scode_url),
        source_price,
        display_price,
        sale_status: item
            .sale_status()
            .map(str::to_owned)
            .unwrap_or_else(placeholder),
        release_date: item
            .release_date
            .map(format_release_date)
            .unwrap_or_else(placeholder),
        jancode: match item.jancode() {
            Some(code) => RowCell::linked(code, jancode_search_url(code)),
            None => RowCell::plain(placeholder()),
        },
        maker_name: if item.maker_name.trim().is_empty() {
            placeholder()
        } else {
            item.maker_name.clone()
        },
        item_condition: condition_label("ITEM", item.item_condition.as_ref()),
        box_condition: condition_label("BOX", item.box_condition.as_ref()),
    }
}

pub fn format_release_date(date: Date) -> String {
    date.format(&format_description!(
        "[day padding:none] [month repr:short] [year]"
    ))
    .unwrap_or_else(|_| date.to_string())
}

pub fn jancode_search_url(code: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(code.as_bytes()).collect();
    format!("{JANCODE_SEARCH_URL}{encoded}&_tb=item")
}

fn condition_label(prefix: &str, grade: Option<&Grade>) -> String {
    match grade {
        Some(grade) => format!("{prefix}: {}", grade.as_str()),
        None => "New".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::{RowCell, RowFormat, format_release_date, jancode_search_url, render_row};
    use crate::{Amount, Grade, Item};
    use time::{Date, Month};

    fn sample() -> Item {
        Item {
            gcode: "FIGURE-1".to_owned(),
            scode: "FIGURE-1-R".to_owned(),
            gcode_url: "https://shop.test/?gcode=FIGURE-1".to_owned(),
            scode_url: "https://shop.test/?scode=FIGURE-1-R".to_owned(),
            name: "Sample".to_owned(),
            image_url: "https://img.test/1.jpg".to_owned(),
            price: Some(Amount::from_whole(1000)),
            ..Item::default()
        }
    }

    #[test]
    fn row_uses_placeholders_for_absent_fields() {
        let row = render_row(&sample(), 3, 120, &RowFormat::default());
        assert_eq!(row.ordinal, "3 / 120");
        assert_eq!(row.source_price, "¥1000");
        assert_eq!(row.display_price, "6.11 €");
        assert_eq!(row.sale_status, "N/A");
        assert_eq!(row.release_date, "N/A");
        assert_eq!(row.jancode, RowCell::plain("N/A"));
        assert_eq!(row.maker_name, "N/A");
        assert_eq!(row.item_condition, "New");
        assert_eq!(row.box_condition, "New");
        assert_eq!(
            row.gcode,
            RowCell::linked("FIGURE-1", "https://shop.test/?gcode=FIGURE-1")
        );
    }

    #[test]
    fn row_renders_present_fields() -> anyhow::Result<()> {
        let item = Item {
            sale_status: "Pre-owned".to_owned(),
            release_date: Some(Date::from_calendar_date(2025, Month::March, 8)?),
            jancode: Some("4580416940238".to_owned()),
            item_condition: Some(Grade::AMinus),
            box_condition: Some(Grade::B),
            ..sample()
        };
        let row = render_row(&item, 1, 1, &RowFormat::default());
        assert_eq!(row.sale_status, "Pre-owned");
        assert_eq!(row.release_date, "8 Mar 2025");
        assert_eq!(
            row.jancode.url.as_deref(),
            Some("https://myfigurecollection.net/?keywords=4580416940238&_tb=item")
        );
        assert_eq!(row.item_condition, "ITEM: A-");
        assert_eq!(row.box_condition, "BOX: B");
        Ok(())
    }

    #[test]
    fn custom_symbols_and_placeholder_are_used() {
        let format = RowFormat {
            source_symbol: "JPY ".to_owned(),
            display_symbol: "EUR".to_owned(),
            placeholder: "-".to_owned(),
            ..RowFormat::default()
        };
        let item = Item {
            price: None,
            ..sample()
        };
        let row = render_row(&item, 1, 2, &format);
        assert_eq!(row.source_price, "-");
        assert_eq!(row.display_price, "0.00 EUR");
        assert_eq!(row.sale_status, "-");
    }

    #[test]
    fn release_date_format_has_no_day_padding() -> anyhow::Result<()> {
        let date = Date::from_calendar_date(2024, Month::December, 25)?;
        assert_eq!(format_release_date(date), "25 Dec 2024");
        Ok(())
    }

    #[test]
    fn jancode_url_encodes_query_characters() {
        assert_eq!(
            jancode_search_url("45 80&x"),
            "https://myfigurecollection.net/?keywords=45+80%26x&_tb=item"
        );
    }
}
