// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::*;

const SHARED_MATERIALS: &str = "LED screen, 3D printing, silicone, steel";

fn record(slug: &str, title: &str) -> Record {
    Record {
        title: title.to_string(),
        ..Record::new(format!("https://example.com/{}", slug))
    }
}

#[test]
fn test_shared_materials_cleared_on_all_but_one() {
    let mut records = vec![
        record("a", "Alpha"),
        record("b", "Beta"),
        record("c", "Gamma"),
        record("d", "Delta"),
    ];
    assert_eq!(SHARED_MATERIALS.chars().count(), 40);
    for r in records.iter_mut().take(3) {
        r.materials = SHARED_MATERIALS.to_string();
    }
    records[3].materials = "wood and paper on canvas".to_string();

    let cleared = ContaminationCleaner::default().clean(&mut records);

    assert_eq!(cleared, 2);
    let kept: Vec<_> = records[..3].iter().filter(|r| !r.materials.is_empty()).collect();
    assert_eq!(kept.len(), 1);
    // 同分时保留第一条
    assert_eq!(kept[0].url, "https://example.com/a");
    assert_eq!(records[3].materials, "wood and paper on canvas");
}

#[test]
fn test_unique_batch_is_untouched() {
    let mut records = vec![record("a", "Alpha"), record("b", "Beta")];
    records[0].materials = "a long materials list number one".to_string();
    records[1].materials = "a long materials list number two".to_string();
    records[0].description_en = "a description that is certainly longer than thirty chars".to_string();
    records[1].description_en = "another description that is longer than thirty chars".to_string();
    let before = records.clone();

    assert_eq!(ContaminationCleaner::default().clean(&mut records), 0);
    assert_eq!(records, before);
}

#[test]
fn test_materials_owner_with_unique_description_wins() {
    let mut records = vec![
        record("a", "Alpha"),
        record("b", "Beta"),
        record("c", "Gamma"),
    ];
    for r in records.iter_mut() {
        r.materials = SHARED_MATERIALS.to_string();
    }
    records[2].description_en =
        "Gamma is a sculpture series exploring printed silicone bodies in steel frames.".to_string();

    let cleared = ContaminationCleaner::default().clean(&mut records);

    assert_eq!(cleared, 2);
    assert!(records[0].materials.is_empty());
    assert!(records[1].materials.is_empty());
    assert_eq!(records[2].materials, SHARED_MATERIALS);
}

#[test]
fn test_materials_below_group_threshold_are_kept() {
    let mut records = vec![record("a", "Alpha"), record("b", "Beta")];
    for r in records.iter_mut() {
        r.materials = SHARED_MATERIALS.to_string();
    }

    assert_eq!(ContaminationCleaner::default().clean(&mut records), 0);
}

#[test]
fn test_description_kept_by_title_match() {
    let text = "Absurd Reality Check examines the collapse of online consensus.";
    let mut records = vec![
        record("other-work", "Other Work"),
        record("absurd-reality-check", "Absurd Reality Check"),
    ];
    for r in records.iter_mut() {
        r.description_en = text.to_string();
    }

    let cleared = ContaminationCleaner::default().clean(&mut records);

    assert_eq!(cleared, 1);
    assert!(records[0].description_en.is_empty());
    assert_eq!(records[1].description_en, text);
}

#[test]
fn test_description_kept_by_slug_match() {
    let text = "作品 ai ai ai 关注语音助手与人的关系，以及其中的权力结构问题。这是一段很长的中文描述文本。";
    let mut records = vec![record("other", ""), record("ai-ai-ai", "")];
    for r in records.iter_mut() {
        r.description_cn = text.to_string();
    }

    let cleared = ContaminationCleaner::default().clean(&mut records);

    assert_eq!(cleared, 1);
    assert!(records[0].description_cn.is_empty());
    assert_eq!(records[1].description_cn, text);
}

#[test]
fn test_materials_owner_named_by_title_token_wins() {
    let materials = "Bronze, steel cable and reclaimed timber";
    let mut records = vec![
        record("a", "Alpha"),
        record("b", "Beta"),
        record("c", "Timber Study"),
    ];
    for r in records.iter_mut() {
        r.materials = materials.to_string();
    }

    let cleared = ContaminationCleaner::default().clean(&mut records);

    assert_eq!(cleared, 2);
    assert!(records[0].materials.is_empty());
    assert!(records[1].materials.is_empty());
    assert_eq!(records[2].materials, materials);
}

#[test]
fn test_short_title_tokens_do_not_score() {
    let materials = "Oak, iron nails and linseed oil paint";

    // "Oak" 只有三个字符，不计分，同分保留第一条
    let mut records = vec![record("a", "Alpha"), record("b", "Beta"), record("c", "Oak")];
    for r in records.iter_mut() {
        r.materials = materials.to_string();
    }
    ContaminationCleaner::default().clean(&mut records);
    assert_eq!(records[0].materials, materials);
    assert!(records[2].materials.is_empty());

    let mut records = vec![record("a", "Alpha"), record("b", "Beta"), record("c", "Iron Oak")];
    for r in records.iter_mut() {
        r.materials = materials.to_string();
    }
    ContaminationCleaner::default().clean(&mut records);
    assert!(records[0].materials.is_empty());
    assert_eq!(records[2].materials, materials);
}

#[test]
fn test_description_owner_with_unique_materials_wins() {
    let text = "A quiet study of light passing through coloured glass panes at noon.";
    let mut records = vec![
        record("a", "North"),
        record("b", "South"),
        record("c", "West"),
    ];
    records[0].materials = "oil on canvas".to_string();
    records[2].materials = "oil on canvas".to_string();
    records[1].materials = "stained glass".to_string();
    for r in records.iter_mut().take(2) {
        r.description_en = text.to_string();
    }

    let cleared = ContaminationCleaner::default().clean(&mut records);

    assert_eq!(cleared, 1);
    assert!(records[0].description_en.is_empty());
    assert_eq!(records[1].description_en, text);
    assert_eq!(records[0].materials, "oil on canvas");
}

#[test]
fn test_url_slug() {
    assert_eq!(url_slug("https://example.com/Absurd-Reality_Check/"), "absurd reality check");
    assert_eq!(url_slug("https://example.com/"), "");
}
