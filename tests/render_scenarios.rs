use serde_json::{Map, Value, json};
use snippet_renderer::{Error, Renderer, ResolverSettings};

fn renderer() -> Renderer {
    Renderer::new(ResolverSettings {
        asset_root: concat!(env!("CARGO_MANIFEST_DIR"), "/assets").into(),
        ..ResolverSettings::default()
    })
}

fn options(extra: Value) -> Map<String, Value> {
    let mut base = json!({
        "width": 800,
        "height": 480,
        "tab_name": "main.py",
        "code": "print(1)",
        "language": "python",
    });
    if let (Some(base), Value::Object(extra)) = (base.as_object_mut(), extra) {
        base.extend(extra);
    }
    match base {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

fn validation_field(err: Error) -> String {
    match err {
        Error::Validation { field, .. } => field,
        other => panic!("expected a validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn default_config_renders_png_of_configured_size() {
    let png = renderer().render_png(&options(json!({}))).await.unwrap();
    let decoded = image::load_from_memory(&png).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (800, 480));
}

#[tokio::test]
async fn tab_name_too_long_is_rejected() {
    let err = renderer()
        .render(&options(json!({"tab_name": "a".repeat(31)})))
        .await
        .unwrap_err();
    assert_eq!(validation_field(err), "tab_name");
}

#[tokio::test]
async fn zero_blur_radius_is_rejected() {
    let err = renderer()
        .render(&options(json!({"blur_radius": 0})))
        .await
        .unwrap_err();
    assert_eq!(validation_field(err), "blur_radius");
}

#[tokio::test]
async fn drop_shadow_changes_bar_region() {
    let renderer = renderer();
    let extra = json!({"blur_color": [0, 0, 0, 200], "blur_radius": 8});
    let plain = renderer.render(&options(extra.clone())).await.unwrap();

    let mut shadowed_options = options(extra);
    shadowed_options.insert("show_blur".into(), Value::Bool(true));
    let shadowed = renderer.render(&shadowed_options).await.unwrap();

    // Rows between the bar and the code block only receive the shadow.
    let band = |image: &image::RgbImage| -> Vec<u8> {
        (40..56)
            .flat_map(|y| (0..800).map(move |x| (x, y)))
            .flat_map(|(x, y)| image.get_pixel(x, y).0)
            .collect()
    };
    assert_ne!(band(&plain), band(&shadowed));
    assert_eq!(plain.dimensions(), shadowed.dimensions());
}

#[tokio::test]
async fn missing_language_icon_is_not_found() {
    let err = renderer()
        .render(&options(json!({"language_icon": "icons/does-not-exist.png"})))
        .await
        .unwrap_err();
    match err {
        Error::ResourceNotFound { reference } => assert_eq!(reference, "icons/does-not-exist.png"),
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn output_dimensions_follow_options() {
    let renderer = renderer();
    for (width, height) in [(400, 240), (1024, 600), (1920, 1080)] {
        let image = renderer
            .render(&options(json!({"width": width, "height": height})))
            .await
            .unwrap();
        assert_eq!(image.dimensions(), (width, height));
    }
}

#[tokio::test]
async fn identical_input_gives_identical_bytes() {
    let renderer = renderer();
    let options = options(json!({
        "show_blur": true,
        "show_tab_line": true,
        "code": "def f(x):\n    return x * 2\n",
    }));
    let first = renderer.render_png(&options).await.unwrap();
    let second = renderer.render_png(&options).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn auto_detected_language_uses_default_icon() {
    let mut options = options(json!({"code": "just some words"}));
    options.remove("language");
    let image = renderer().render(&options).await.unwrap();
    assert_eq!(image.dimensions(), (800, 480));
}

#[tokio::test]
async fn svg_language_icon_renders() {
    let image = renderer()
        .render(&options(json!({"language": "c", "tab_name": "main.c", "language_icon": "icons/c.svg"})))
        .await
        .unwrap();
    assert_eq!(image.dimensions(), (800, 480));
}

#[tokio::test]
async fn oversized_label_is_clipped_not_rejected() {
    let image = renderer()
        .render(&options(json!({
            "width": 400,
            "tab_font_size": 60,
            "tab_name": "a_very_long_file_name_here.py",
        })))
        .await
        .unwrap();
    assert_eq!(image.dimensions(), (400, 480));
}

#[tokio::test]
async fn unknown_code_style_is_rejected() {
    let err = renderer()
        .render(&options(json!({"code_style": "no-such-style"})))
        .await
        .unwrap_err();
    assert_eq!(validation_field(err), "code_style");
}

#[tokio::test]
async fn named_code_styles_render() {
    let renderer = renderer();
    let light = renderer.render(&options(json!({"code_style": "default"}))).await.unwrap();
    let dark = renderer.render(&options(json!({"code_style": "ocean-dark"}))).await.unwrap();

    // Padding keeps the canvas background under every style.
    assert_eq!(light.get_pixel(45, 62).0, [255, 255, 255]);
    assert_eq!(dark.get_pixel(45, 62).0, [255, 255, 255]);

    // Only the tokens of the first code line change color.
    let tokens = |image: &image::RgbImage| -> Vec<[u8; 3]> {
        (70..90)
            .flat_map(|y| (40..200).map(move |x| (x, y)))
            .map(|(x, y)| image.get_pixel(x, y).0)
            .collect()
    };
    assert_ne!(tokens(&light), tokens(&dark));
}

#[tokio::test]
async fn code_block_uses_canvas_background() {
    let image = renderer()
        .render(&options(json!({"bg_color": "black", "code_style": "default"})))
        .await
        .unwrap();

    assert_eq!(image.get_pixel(790, 400).0, [0, 0, 0]);
    // Gutter and code area padding of the block.
    assert_eq!(image.get_pixel(2, 62).0, [0, 0, 0]);
    assert_eq!(image.get_pixel(60, 62).0, [0, 0, 0]);
}

#[tokio::test]
async fn translucent_chrome_colors_are_drawn_opaque() {
    let image = renderer()
        .render(&options(json!({
            "bar_color": [255, 0, 0, 0],
            "tab_color": [0, 0, 255, 0],
        })))
        .await
        .unwrap();

    assert_eq!(image.get_pixel(0, 0).0, [0, 0, 255]);
    assert_eq!(image.get_pixel(790, 1).0, [255, 0, 0]);
}
