use spriter_atlas::Atlas;

/// Canonical atlas text in exactly the shape export produces: a leading
/// blank line per page, `key: value` page lines, two-space-indented sites.
const ATLAS_TEXT: &str = "\nsheet.png\nsize: 1024,512\nformat: RGBA8888\nfilter: Linear,Linear\nrepeat: none\nhero/torso.png\n  rotate: false\n  xy: 2, 2\n  size: 64, 128\n  orig: 64, 128\n  offset: 0, 0\n  index: -1\nhero/head.png\n  rotate: true\n  xy: 70, 2\n  size: 32, 32\n  orig: 40, 40\n  offset: 4, 4\n  index: 2";

/// it should parse pages and sites from atlas text
#[test]
fn import_atlas_text_fields() {
    let mut atlas = Atlas::new();
    atlas.import_atlas_text(ATLAS_TEXT);

    assert_eq!(atlas.pages.len(), 1);
    let page = &atlas.pages[0];
    assert_eq!(page.name, "sheet.png");
    assert_eq!((page.w, page.h), (1024, 512));
    assert_eq!(page.format, "RGBA8888");
    assert_eq!(page.min_filter, "Linear");
    assert_eq!(page.mag_filter, "Linear");
    assert_eq!(page.wrap_s, "ClampToEdge");
    assert_eq!(page.wrap_t, "ClampToEdge");

    assert_eq!(atlas.site_keys, ["hero/torso.png", "hero/head.png"]);
    let torso = atlas.site("hero/torso.png").expect("torso site");
    assert_eq!(torso.page, 0);
    assert_eq!((torso.x, torso.y), (2, 2));
    assert_eq!((torso.w, torso.h), (64, 128));
    assert_eq!(torso.rotate, 0);
    assert_eq!(torso.index, -1);

    let head = atlas.site("hero/head.png").expect("head site");
    assert_eq!(head.rotate, -1);
    assert_eq!((head.original_w, head.original_h), (40, 40));
    assert_eq!((head.offset_x, head.offset_y), (4, 4));
    assert_eq!(head.index, 2);
}

/// it should round-trip atlas text byte for byte
#[test]
fn atlas_text_round_trip() {
    let mut atlas = Atlas::new();
    atlas.import_atlas_text(ATLAS_TEXT);
    assert_eq!(atlas.export_atlas_text(), ATLAS_TEXT);

    // and the export is a fixed point
    let mut again = Atlas::new();
    again.import_atlas_text(&atlas.export_atlas_text());
    assert_eq!(again.export_atlas_text(), ATLAS_TEXT);
}

/// it should map repeat modes onto wrap_s/wrap_t and back
#[test]
fn repeat_modes() {
    for (repeat, wrap_s, wrap_t) in [
        ("x", "Repeat", "ClampToEdge"),
        ("y", "ClampToEdge", "Repeat"),
        ("xy", "Repeat", "Repeat"),
        ("none", "ClampToEdge", "ClampToEdge"),
    ] {
        let text = format!(
            "\npage.png\nsize: 16,16\nformat: RGBA8888\nfilter: Linear,Linear\nrepeat: {repeat}"
        );
        let mut atlas = Atlas::new();
        atlas.import_atlas_text(&text);
        assert_eq!(atlas.pages[0].wrap_s, wrap_s, "repeat {repeat}");
        assert_eq!(atlas.pages[0].wrap_t, wrap_t, "repeat {repeat}");
        assert_eq!(atlas.export_atlas_text(), text);
    }
}

/// it should fall back to the packed size when a site omits its orig line
#[test]
fn original_size_fallback() {
    let text = "\npage.png\nsize: 16,16\nformat: RGBA8888\nfilter: Linear,Linear\nrepeat: none\na.png\n  rotate: false\n  xy: 0, 0\n  size: 8, 8\nb.png\n  rotate: false\n  xy: 8, 0\n  size: 4, 4\n  orig: 6, 6";
    let mut atlas = Atlas::new();
    atlas.import_atlas_text(text);

    // a.png is finalized when b.png opens and inherits its packed size
    let a = atlas.site("a.png").expect("a site");
    assert_eq!((a.original_w, a.original_h), (8, 8));
    let b = atlas.site("b.png").expect("b site");
    assert_eq!((b.original_w, b.original_h), (6, 6));
}

/// it should parse multiple pages delimited by blank lines
#[test]
fn multiple_pages() {
    let text = "\none.png\nsize: 8,8\nformat: RGBA8888\nfilter: Linear,Linear\nrepeat: none\na.png\n  rotate: false\n  xy: 0, 0\n  size: 8, 8\n  orig: 8, 8\n  offset: 0, 0\n  index: -1\n\ntwo.png\nsize: 16,16\nformat: RGBA8888\nfilter: Linear,Linear\nrepeat: none\nb.png\n  rotate: false\n  xy: 0, 0\n  size: 16, 16\n  orig: 16, 16\n  offset: 0, 0\n  index: -1";
    let mut atlas = Atlas::new();
    atlas.import_atlas_text(text);

    assert_eq!(atlas.pages.len(), 2);
    assert_eq!(atlas.site("a.png").unwrap().page, 0);
    assert_eq!(atlas.site("b.png").unwrap().page, 1);
    assert_eq!(atlas.export_atlas_text(), text);
}

/// it should import a TexturePacker JSON page
#[test]
fn import_tps() {
    let tps = r#"{
        "frames": {
            "hero/head.png": {
                "frame": { "x": 2, "y": 2, "w": 32, "h": 32 },
                "rotated": true,
                "spriteSourceSize": { "x": 4, "y": 4, "w": 32, "h": 32 },
                "sourceSize": { "w": 40, "h": 40 }
            },
            "hero/torso.png": {
                "frame": { "x": 40, "y": 2, "w": 64, "h": 128 }
            }
        },
        "meta": {
            "image": "sheet.png",
            "size": { "w": 1024, "h": 512 }
        }
    }"#;

    let mut atlas = Atlas::new();
    atlas.import_tps_text(tps).unwrap();

    assert_eq!(atlas.pages.len(), 1);
    assert_eq!(atlas.pages[0].name, "sheet.png");
    assert_eq!((atlas.pages[0].w, atlas.pages[0].h), (1024, 512));

    let head = atlas.site("hero/head.png").expect("head site");
    assert_eq!(head.rotate, 1);
    assert_eq!((head.offset_x, head.offset_y), (4, 4));
    assert_eq!((head.original_w, head.original_h), (40, 40));

    // missing sourceSize falls back to the packed size
    let torso = atlas.site("hero/torso.png").expect("torso site");
    assert_eq!(torso.rotate, 0);
    assert_eq!((torso.original_w, torso.original_h), (64, 128));
}

/// it should report malformed TexturePacker JSON as an error
#[test]
fn import_tps_error() {
    let mut atlas = Atlas::new();
    assert!(atlas.import_tps_text("not json").is_err());
}
