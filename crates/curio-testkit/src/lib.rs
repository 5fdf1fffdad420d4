// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use curio_app::{Amount, Grade, Item};
use std::fs;
use std::path::PathBuf;
use time::{Date, Month};

pub const DEMO_MANIFEST: &str = "_data_files.txt";
const SHOP_URL: &str = "https://shop.example/detail/";

const CHARACTERS: [&str; 16] = [
    "Rem", "Asuka", "Miku", "Saber", "Nezuko", "Mikasa", "Frieren", "Makima", "Zero Two",
    "Power", "Yor", "Anya", "Megumin", "Aqua", "Kurumi", "Raiden",
];
const VARIANTS: [&str; 12] = [
    "Summer Ver.",
    "Bunny Ver.",
    "Maid Ver.",
    "Winter Ver.",
    "Racing Ver.",
    "Wedding Ver.",
    "Swimsuit Ver.",
    "Kimono Ver.",
    "Idol Ver.",
    "Battle Ver.",
    "School Uniform Ver.",
    "Casual Ver.",
];
const SCALES: [&str; 5] = ["1/4", "1/6", "1/7", "1/8", "Non-Scale"];
const MAKERS: [&str; 10] = [
    "Good Smile Company",
    "Kotobukiya",
    "Alter",
    "FuRyu",
    "Max Factory",
    "Aniplex",
    "Bandai Spirits",
    "Taito",
    "SEGA",
    "Phat!",
];
const MODELERS: [&str; 8] = [
    "Yoshi", "Nishimura", "Kanzaki", "Hoshino", "Mori", "Tanaka", "Ishida", "Sakurai",
];
const NEW_STATUSES: [&str; 4] = ["Released", "Pre-order", "Back-order", "Order Closed"];
const TAGS: [&str; 8] = [
    "scale", "prize", "nendoroid", "figma", "bishoujo", "mecha", "limited", "reissue",
];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn one_in(&mut self, n: usize) -> bool {
        self.int_n(n) == 0
    }
}

/// Deterministic catalog generator: the same seed always yields the same
/// items.
#[derive(Debug, Clone)]
pub struct CatalogFaker {
    rng: DeterministicRng,
    next_code: u64,
}

impl CatalogFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            next_code: 1,
        }
    }

    pub fn items(&mut self, count: usize) -> Vec<Item> {
        (0..count).map(|_| self.item()).collect()
    }

    pub fn item(&mut self) -> Item {
        let code = self.next_code;
        self.next_code += 1;

        let gcode = format!("FIGURE-{code:06}");
        let preowned = self.rng.one_in(3);
        let scode = if preowned {
            format!("{gcode}-R")
        } else {
            String::new()
        };
        let full_price = self.int_range(30, 600) * 100;
        let price = if self.rng.one_in(25) {
            None
        } else if preowned {
            Some(Amount::from_whole(full_price * self.int_range(40, 95) / 100))
        } else {
            Some(Amount::from_whole(full_price))
        };

        let (item_condition, box_condition, sale_status) = if preowned {
            let item_grade = Grade::ITEM_GRADES[self.rng.int_n(Grade::ITEM_GRADES.len())].clone();
            let box_grade = Grade::BOX_GRADES[self.rng.int_n(Grade::BOX_GRADES.len())].clone();
            (Some(item_grade), Some(box_grade), "Pre-owned".to_owned())
        } else {
            (None, None, self.pick(&NEW_STATUSES).to_owned())
        };
        let is_preorder = sale_status == "Pre-order";
        let is_backorder = sale_status == "Back-order";

        Item {
            gcode_url: format!("{SHOP_URL}?gcode={gcode}"),
            scode_url: if scode.is_empty() {
                String::new()
            } else {
                format!("{SHOP_URL}?scode={scode}")
            },
            image_url: format!("https://img.shop.example/{gcode}.jpg"),
            name: self.figure_name(),
            gcode,
            scode,
            full_price: Amount::from_whole(full_price),
            price,
            reward_point: full_price / 100,
            sale_status,
            release_date: self.release_date(),
            jancode: (!self.rng.one_in(5)).then(|| self.jancode()),
            maker_name: self.pick(&MAKERS).to_owned(),
            modeler_name: self.pick(&MODELERS).to_owned(),
            description: format!("Sculpted in {} scale.", self.pick(&SCALES)),
            memo: String::new(),
            copyright: format!("(C) {}", 2010 + self.rng.int_n(16)),
            item_condition,
            box_condition,
            is_preowned: preowned,
            is_preorder,
            is_backorder,
            has_store_bonus: self.rng.one_in(6),
            is_amiami_limited: self.rng.one_in(10),
            is_age_limited: self.rng.one_in(12),
            has_preorder_bonus: is_preorder && self.rng.one_in(2),
            is_on_sale: self.rng.one_in(8),
            is_preowned_sale: preowned && self.rng.one_in(4),
            categories: vec![self.int_range(1, 40)],
            tags: vec![self.pick(&TAGS).to_owned()],
        }
    }

    fn figure_name(&mut self) -> String {
        let character = self.pick(&CHARACTERS);
        let variant = self.pick(&VARIANTS);
        figure_name(character, variant, self.pick(&SCALES))
    }

    fn release_date(&mut self) -> Option<Date> {
        if self.rng.one_in(10) {
            return None;
        }
        let year = 2018 + self.rng.int_n(9) as i32;
        let month = Month::January.nth_next(self.rng.int_n(12) as u8);
        let day = 1 + self.rng.int_n(28) as u8;
        Date::from_calendar_date(year, month, day).ok()
    }

    fn jancode(&mut self) -> String {
        format!("45{:011}", self.rng.next_u64() % 100_000_000_000)
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn int_range(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = (max - min + 1) as u64;
        min + (self.rng.next_u64() % span) as i64
    }
}

fn figure_name(character: &str, variant: &str, scale: &str) -> String {
    if scale == "Non-Scale" {
        return format!("{character} {variant} Non-Scale Figure");
    }
    format!("{character} {variant} {scale} Scale Figure")
}

/// Minimal item with the required fields set. `price` is a whole amount.
pub fn sample_item(gcode: &str, name: &str, price: Option<i64>) -> Item {
    Item {
        gcode: gcode.to_owned(),
        name: name.to_owned(),
        gcode_url: format!("{SHOP_URL}?gcode={gcode}"),
        price: price.map(Amount::from_whole),
        ..Item::default()
    }
}

/// Payload JSON in the scraper's dump layout.
pub fn payload_json(items: &[Item]) -> Result<String> {
    let value = serde_json::json!({
        "current_index": items.len(),
        "items_length": items.len(),
        "items": items,
    });
    serde_json::to_string_pretty(&value).context("encode payload")
}

pub fn manifest_text(paths: &[String]) -> String {
    let mut out = String::from("# generated catalog\n");
    for path in paths {
        out.push_str(path);
        out.push('\n');
    }
    out
}

/// `(path, contents)` pairs for a generated catalog: the manifest first,
/// then `files` payloads of `per_file` items each.
pub fn demo_catalog_files(seed: u64, files: usize, per_file: usize) -> Result<Vec<(String, String)>> {
    let mut faker = CatalogFaker::new(seed);
    let paths: Vec<String> = (1..=files).map(|index| format!("items_{index:03}.json")).collect();

    let mut out = Vec::with_capacity(files + 1);
    out.push((DEMO_MANIFEST.to_owned(), manifest_text(&paths)));
    for path in paths {
        let items = faker.items(per_file);
        out.push((path, payload_json(&items)?));
    }
    Ok(out)
}

/// Writes a generated catalog into a fresh temp dir and returns it with the
/// directory path.
pub fn temp_catalog_dir(
    seed: u64,
    files: usize,
    per_file: usize,
) -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    for (path, contents) in demo_catalog_files(seed, files, per_file)? {
        let full = dir.path().join(&path);
        fs::write(&full, contents).with_context(|| format!("write {}", full.display()))?;
    }
    let root = dir.path().to_path_buf();
    Ok((dir, root))
}

#[cfg(test)]
mod tests {
    use super::{
        CatalogFaker, DEMO_MANIFEST, demo_catalog_files, figure_name, sample_item,
        temp_catalog_dir,
    };
    use curio_app::{Amount, Grade, Item};

    #[test]
    fn same_seed_same_items() {
        let left = CatalogFaker::new(42).items(20);
        let right = CatalogFaker::new(42).items(20);
        assert_eq!(left, right);
    }

    #[test]
    fn codes_are_unique_and_sequential() {
        let items = CatalogFaker::new(7).items(3);
        let codes: Vec<&str> = items.iter().map(|item| item.gcode.as_str()).collect();
        assert_eq!(codes, vec!["FIGURE-000001", "FIGURE-000002", "FIGURE-000003"]);
    }

    #[test]
    fn preowned_items_carry_grades() {
        let items = CatalogFaker::new(9).items(200);
        let preowned: Vec<&Item> = items.iter().filter(|item| item.is_preowned).collect();
        assert!(!preowned.is_empty());
        for item in preowned {
            assert!(item.item_condition.is_some());
            assert!(matches!(
                item.box_condition,
                Some(Grade::A | Grade::B | Grade::C | Grade::N)
            ));
            assert!(!item.scode.is_empty());
        }
        assert!(items.iter().any(|item| item.price.is_none()));
        assert!(items.iter().any(|item| item.release_date.is_none()));
    }

    #[test]
    fn demo_catalog_lists_every_payload() -> anyhow::Result<()> {
        let files = demo_catalog_files(1, 3, 4)?;
        assert_eq!(files.len(), 4);
        assert_eq!(files[0].0, DEMO_MANIFEST);
        for (path, _) in &files[1..] {
            assert!(files[0].1.contains(path.as_str()));
        }
        let payload: serde_json::Value = serde_json::from_str(&files[1].1)?;
        assert_eq!(payload["items_length"], 4);
        Ok(())
    }

    #[test]
    fn temp_catalog_dir_writes_files() -> anyhow::Result<()> {
        let (_dir, root) = temp_catalog_dir(3, 2, 5)?;
        assert!(root.join(DEMO_MANIFEST).exists());
        assert!(root.join("items_002.json").exists());
        Ok(())
    }

    #[test]
    fn sample_item_sets_required_fields() {
        let item = sample_item("G-1", "Sample", Some(1000));
        assert_eq!(item.gcode, "G-1");
        assert_eq!(item.price, Some(Amount::from_whole(1000)));
        assert!(item.jancode.is_none());
    }

    #[test]
    fn non_scale_names_do_not_repeat_scale() {
        assert_eq!(
            figure_name("Rem", "Maid Ver.", "Non-Scale"),
            "Rem Maid Ver. Non-Scale Figure"
        );
        assert_eq!(
            figure_name("Rem", "Maid Ver.", "1/7"),
            "Rem Maid Ver. 1/7 Scale Figure"
        );
        for item in CatalogFaker::new(12).items(100) {
            assert!(!item.name.contains("Non-Scale Scale"), "{}", item.name);
        }
    }
}
