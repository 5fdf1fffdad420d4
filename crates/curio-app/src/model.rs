// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use time::Date;
use time::macros::format_description;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Grade {
    J,
    C,
    B,
    BPlus,
    AMinus,
    A,
    N,
    Other(String),
}

impl Grade {
    pub const ITEM_GRADES: [Self; 6] = [
        Self::J,
        Self::C,
        Self::B,
        Self::BPlus,
        Self::AMinus,
        Self::A,
    ];

    pub const BOX_GRADES: [Self; 4] = [Self::A, Self::B, Self::C, Self::N];

    pub fn as_str(&self) -> &str {
        match self {
            Self::J => "J",
            Self::C => "C",
            Self::B => "B",
            Self::BPlus => "B+",
            Self::AMinus => "A-",
            Self::A => "A",
            Self::N => "N",
            Self::Other(raw) => raw,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        match value {
            "" => None,
            "J" => Some(Self::J),
            "C" => Some(Self::C),
            "B" => Some(Self::B),
            "B+" => Some(Self::BPlus),
            "A-" => Some(Self::AMinus),
            "A" => Some(Self::A),
            "N" => Some(Self::N),
            other => Some(Self::Other(other.to_owned())),
        }
    }

    /// Position on the worst-to-best item scale. Absent and unrecognized
    /// grades share the slot right after `A`.
    pub fn item_rank(grade: Option<&Self>) -> usize {
        grade
            .and_then(|grade| Self::ITEM_GRADES.iter().position(|known| known == grade))
            .unwrap_or(Self::ITEM_GRADES.len())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BoolFacet {
    Preowned,
    Preorder,
    Backorder,
    StoreBonus,
    ShopLimited,
    AgeLimited,
    PreorderBonus,
    OnSale,
    PreownedSale,
}

impl BoolFacet {
    pub const ALL: [Self; 9] = [
        Self::Preowned,
        Self::Preorder,
        Self::Backorder,
        Self::StoreBonus,
        Self::ShopLimited,
        Self::AgeLimited,
        Self::PreorderBonus,
        Self::OnSale,
        Self::PreownedSale,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Preowned => "is_preowned",
            Self::Preorder => "is_preorder",
            Self::Backorder => "is_backorder",
            Self::StoreBonus => "has_store_bonus",
            Self::ShopLimited => "is_amiami_limited",
            Self::AgeLimited => "is_age_limited",
            Self::PreorderBonus => "has_preorder_bonus",
            Self::OnSale => "is_on_sale",
            Self::PreownedSale => "is_preowned_sale",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|facet| facet.as_str() == value)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Preowned => "pre-owned",
            Self::Preorder => "pre-order",
            Self::Backorder => "back-order",
            Self::StoreBonus => "store bonus",
            Self::ShopLimited => "shop limited",
            Self::AgeLimited => "age limited",
            Self::PreorderBonus => "pre-order bonus",
            Self::OnSale => "on sale",
            Self::PreownedSale => "pre-owned sale",
        }
    }

    pub fn value(self, item: &Item) -> bool {
        match self {
            Self::Preowned => item.is_preowned,
            Self::Preorder => item.is_preorder,
            Self::Backorder => item.is_backorder,
            Self::StoreBonus => item.has_store_bonus,
            Self::ShopLimited => item.is_amiami_limited,
            Self::AgeLimited => item.is_age_limited,
            Self::PreorderBonus => item.has_preorder_bonus,
            Self::OnSale => item.is_on_sale,
            Self::PreownedSale => item.is_preowned_sale,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Item {
    pub gcode: String,
    #[serde(default)]
    pub scode: String,
    pub name: String,
    #[serde(default)]
    pub gcode_url: String,
    #[serde(default)]
    pub scode_url: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub full_price: Amount,
    #[serde(default)]
    pub price: Option<Amount>,
    #[serde(default)]
    pub reward_point: i64,
    #[serde(default)]
    pub sale_status: String,
    #[serde(default, with = "release_date_field")]
    pub release_date: Option<Date>,
    #[serde(default)]
    pub jancode: Option<String>,
    #[serde(default)]
    pub maker_name: String,
    #[serde(default)]
    pub modeler_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub memo: String,
    #[serde(default)]
    pub copyright: String,
    #[serde(default, with = "grade_field")]
    pub item_condition: Option<Grade>,
    #[serde(default, with = "grade_field")]
    pub box_condition: Option<Grade>,
    #[serde(default)]
    pub is_preowned: bool,
    #[serde(default)]
    pub is_preorder: bool,
    #[serde(default)]
    pub is_backorder: bool,
    #[serde(default)]
    pub has_store_bonus: bool,
    #[serde(default)]
    pub is_amiami_limited: bool,
    #[serde(default)]
    pub is_age_limited: bool,
    #[serde(default)]
    pub has_preorder_bonus: bool,
    #[serde(default)]
    pub is_on_sale: bool,
    #[serde(default)]
    pub is_preowned_sale: bool,
    #[serde(default)]
    pub categories: Vec<i64>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Item {
    pub fn sale_status(&self) -> Option<&str> {
        let status = self.sale_status.trim();
        (!status.is_empty()).then_some(status)
    }

    pub fn jancode(&self) -> Option<&str> {
        self.jancode
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }

    /// Display price in hundredths of the target currency, rounded half-up.
    /// A missing source price counts as zero.
    pub fn display_price_cents(&self, rate: ConversionRate) -> i64 {
        rate.convert_cents(self.price.unwrap_or_default())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i64);

impl Amount {
    pub const fn from_whole(value: i64) -> Self {
        Self(value.saturating_mul(100))
    }

    pub const fn from_hundredths(hundredths: i64) -> Self {
        Self(hundredths)
    }

    pub fn from_decimal(value: f64) -> Option<Self> {
        value
            .is_finite()
            .then(|| Self((value * 100.0).round() as i64))
    }

    pub const fn hundredths(self) -> i64 {
        self.0
    }

    pub const fn is_whole(self) -> bool {
        self.0 % 100 == 0
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Self::from_whole(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_whole() {
            return write!(f, "{}", self.0 / 100);
        }
        f.write_str(format_cents(self.0).trim_end_matches('0'))
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_whole() {
            serializer.serialize_i64(self.0 / 100)
        } else {
            serializer.serialize_f64(cents_to_amount(self.0))
        }
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}

struct AmountVisitor;

impl Visitor<'_> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a whole or decimal amount")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Amount, E> {
        Ok(Amount::from_whole(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Amount, E> {
        i64::try_from(value)
            .map(Amount::from_whole)
            .map_err(|_| E::custom(format!("amount {value} is out of range")))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Amount, E> {
        Amount::from_decimal(value).ok_or_else(|| E::custom(format!("amount {value} is not finite")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionRate(f64);

pub const DEFAULT_CONVERSION_RATE: f64 = 0.006106;

impl ConversionRate {
    pub fn new(rate: f64) -> Result<Self> {
        if !rate.is_finite() || rate <= 0.0 {
            bail!("conversion rate must be a positive finite number, got {rate}");
        }
        Ok(Self(rate))
    }

    pub const fn get(self) -> f64 {
        self.0
    }

    pub fn convert_cents(self, amount: Amount) -> i64 {
        // f64::round is half-away-from-zero, i.e. half-up for prices.
        (amount.hundredths() as f64 * self.0).round() as i64
    }
}

impl Default for ConversionRate {
    fn default() -> Self {
        Self(DEFAULT_CONVERSION_RATE)
    }
}

pub fn cents_to_amount(cents: i64) -> f64 {
    cents as f64 / 100.0
}

pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

pub fn parse_release_date(raw: &str) -> Option<Date> {
    let raw = raw.trim();
    let day_part = raw.get(..10)?;
    Date::parse(day_part, &format_description!("[year]-[month]-[day]")).ok()
}

pub fn format_iso_date(value: Date) -> String {
    value
        .format(&format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| "1970-01-01".to_owned())
}

mod release_date_field {
    use super::{format_iso_date, parse_release_date};
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;

    pub fn serialize<S: Serializer>(value: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => serializer.serialize_str(&format_iso_date(*date)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Date>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse_release_date))
    }
}

mod grade_field {
    use super::Grade;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Grade>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.as_ref().map(Grade::as_str).unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Grade>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(Grade::parse))
    }
}
