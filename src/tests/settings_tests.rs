//! 配置解析与视口缩放测试

use crate::engine::{GameConfig, GameSettings};
use crate::error::EngineError;
use crate::{Color, Point, Size};
use std::path::PathBuf;

fn settings() -> GameSettings {
    GameSettings::new(Size::new(1000.0, 800.0), true, Color::TABLE_GREEN)
}

/// 空配置全部取默认值
#[test]
fn test_config_defaults() {
    let config = GameConfig::from_json("{}").unwrap();
    assert_eq!(config.play_area_width, 1000.0);
    assert_eq!(config.play_area_height, 800.0);
    assert!(config.maximized);
    assert_eq!(config.background_color, "#59C551");
    assert!(!config.debug);
    assert_eq!(config.assets_dir, PathBuf::from("assets"));
    assert_eq!(config.seed, None);
    assert_eq!(config.background(), Color::TABLE_GREEN);
}

/// 字段名使用 camelCase
#[test]
fn test_config_camel_case_fields() {
    let json = r##"{
        "playAreaWidth": 1200,
        "playAreaHeight": 900,
        "maximized": false,
        "backgroundColor": "#000",
        "debug": true,
        "assetsDir": "art",
        "seed": 42
    }"##;
    let config = GameConfig::from_json(json).unwrap();
    assert_eq!(config.play_area_width, 1200.0);
    assert_eq!(config.play_area_height, 900.0);
    assert!(!config.maximized);
    assert_eq!(config.background(), Color::BLACK);
    assert!(config.debug);
    assert_eq!(config.assets_dir, PathBuf::from("art"));
    assert_eq!(config.seed, Some(42));

    let settings = GameSettings::from_config(&config);
    assert_eq!(settings.play_area, Size::new(1200.0, 900.0));
    assert!(settings.debug);
    assert!(!settings.maximized);
}

#[test]
fn test_config_errors() {
    let err = GameConfig::from_json("{ not json").unwrap_err();
    assert!(matches!(err, EngineError::Config(_)));

    let err = GameConfig::load("/nonexistent/solitaire.json").unwrap_err();
    assert!(matches!(err, EngineError::Io(_)));
}

/// 背景色写错时退回牌桌绿
#[test]
fn test_invalid_background_falls_back() {
    let config = GameConfig::from_json(r#"{"backgroundColor": "green"}"#).unwrap();
    assert_eq!(config.background(), Color::TABLE_GREEN);
}

/// 视口更宽：左右留边
#[test]
fn test_reload_pillarbox() {
    let mut s = settings();
    s.reload(Some(Size::new(2000.0, 800.0))).unwrap();

    assert_eq!(s.scale_x, 1.0);
    assert_eq!(s.scale_y, 1.0);
    assert_eq!(s.width, 1000.0);
    assert_eq!(s.height, 800.0);
    assert_eq!(s.left_offset, 500.0);
    assert_eq!(s.top_offset, 0.0);
    assert_eq!(s.to_play_area(600.0, 100.0), Point::new(100.0, 100.0));
}

/// 视口更高：上下留边，偏移按游戏区域单位
#[test]
fn test_reload_letterbox() {
    let mut s = settings();
    s.reload(Some(Size::new(500.0, 800.0))).unwrap();

    assert_eq!(s.scale_x, 0.5);
    assert_eq!(s.scale_y, 0.5);
    assert_eq!(s.width, 500.0);
    assert_eq!(s.height, 400.0);
    assert_eq!(s.left_offset, 0.0);
    assert_eq!(s.top_offset, 400.0);
    assert_eq!(s.to_play_area(250.0, 300.0), Point::new(500.0, 200.0));
}

/// 接近正方形但比游戏区域窄的视口也不会出现负偏移
#[test]
fn test_reload_near_square_viewport() {
    let mut s = settings();
    s.reload(Some(Size::new(900.0, 850.0))).unwrap();

    assert!(s.left_offset >= 0.0);
    assert!(s.top_offset >= 0.0);
    assert!(s.height <= 850.0);
    assert_eq!(s.width, 900.0);
}

/// 非最大化时 1:1
#[test]
fn test_reload_not_maximized() {
    let mut s = GameSettings::new(Size::new(1000.0, 800.0), false, Color::TABLE_GREEN);
    s.reload(Some(Size::new(3000.0, 3000.0))).unwrap();
    assert_eq!(s.scale_x, 1.0);
    assert_eq!(s.left_offset, 0.0);
    assert_eq!(s.to_play_area(10.0, 20.0), Point::new(10.0, 20.0));

    // 不需要视口
    assert!(s.reload(None).is_ok());
}

/// 视口无效时报错并保留上一次的缩放
#[test]
fn test_invalid_viewport_keeps_previous_scale() {
    let mut s = settings();
    s.reload(Some(Size::new(500.0, 800.0))).unwrap();

    let err = s.reload(Some(Size::new(0.0, 600.0))).unwrap_err();
    assert!(matches!(err, EngineError::InvalidViewport { width, height } if width == 0.0 && height == 600.0));
    assert_eq!(s.scale_x, 0.5);
    assert_eq!(s.top_offset, 400.0);

    assert!(matches!(s.reload(None), Err(EngineError::InvalidViewport { .. })));
    assert_eq!(s.scale_y, 0.5);
}
